use shared::{CashIn, CashOut, SendMoney, User};

use crate::db::{Collection, DocumentStore};

pub mod cash_in;
pub mod cash_out;
pub mod send_money;
pub mod users;

/// Application state shared across all resource handlers.
///
/// Holds the one injected store handle; handlers get read-only access
/// and open typed collection handles on demand.
#[derive(Clone)]
pub struct AppState {
    store: DocumentStore,
}

impl AppState {
    /// Create new application state around the given store handle
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn users(&self) -> Collection<User> {
        self.store.collection("users")
    }

    pub fn cash_ins(&self) -> Collection<CashIn> {
        self.store.collection("cashins")
    }

    pub fn cash_outs(&self) -> Collection<CashOut> {
        self.store.collection("cashouts")
    }

    pub fn send_moneys(&self) -> Collection<SendMoney> {
        self.store.collection("sendmoneys")
    }
}

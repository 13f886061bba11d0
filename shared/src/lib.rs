use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered wallet holder.
///
/// `balance` is a plain recorded figure; no endpoint in this service
/// debits or credits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier (32 lowercase hex chars)
    pub id: String,
    pub name: String,
    pub pin: String,
    pub phone: String,
    pub email: String,
    pub role: String,
    /// Free-form status string, "pending" on creation
    pub status_of_user: String,
    pub balance: f64,
}

/// An agent-mediated deposit request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashIn {
    pub id: String,
    pub amount: f64,
    /// Opaque reference to the handling agent, not checked against users
    pub agent_id: String,
    pub requester_id: String,
    pub status: String,
    pub requested_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

/// An agent-mediated withdrawal request. Structurally identical to
/// [`CashIn`] but kept as its own collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashOut {
    pub id: String,
    pub amount: f64,
    pub agent_id: String,
    pub requester_id: String,
    pub status: String,
    pub requested_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

/// A peer-to-peer transfer record. Fire-and-forget: no status field and
/// no linkage to sender/receiver balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMoney {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub amount_sent: f64,
    pub fee: f64,
    pub sent_at: DateTime<Utc>,
}

/// Payload for POST /users.
///
/// Every field is optional so that partial payloads still deserialize;
/// required-field presence is checked in [`Self::into_user`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub pin: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status_of_user: Option<String>,
    pub balance: Option<f64>,
}

impl CreateUserRequest {
    /// Build the record to persist, applying creation defaults
    /// (statusOfUser "pending", balance 0). Returns `None` when any
    /// required field is absent; the store assigns the identifier.
    pub fn into_user(self) -> Option<User> {
        Some(User {
            id: String::new(),
            name: self.name?,
            pin: self.pin?,
            phone: self.phone?,
            email: self.email?,
            role: self.role?,
            status_of_user: self.status_of_user.unwrap_or_else(|| "pending".to_string()),
            balance: self.balance.unwrap_or(0.0),
        })
    }
}

/// Payload for POST /cashin. Only the three required fields are read;
/// status and timestamps always come from the creation defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCashInRequest {
    pub amount: Option<f64>,
    pub agent_id: Option<String>,
    pub requester_id: Option<String>,
}

impl CreateCashInRequest {
    /// Build the record to persist with status "pending" and
    /// requestedAt set to now. `None` when a required field is absent.
    pub fn into_cash_in(self) -> Option<CashIn> {
        Some(CashIn {
            id: String::new(),
            amount: self.amount?,
            agent_id: self.agent_id?,
            requester_id: self.requester_id?,
            status: "pending".to_string(),
            requested_at: Utc::now(),
            approved_at: None,
        })
    }
}

/// Payload for POST /cashout. Unlike cash-in, the optional status and
/// timestamp fields are honored when supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCashOutRequest {
    pub amount: Option<f64>,
    pub agent_id: Option<String>,
    pub requester_id: Option<String>,
    pub status: Option<String>,
    pub requested_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl CreateCashOutRequest {
    pub fn into_cash_out(self) -> Option<CashOut> {
        Some(CashOut {
            id: String::new(),
            amount: self.amount?,
            agent_id: self.agent_id?,
            requester_id: self.requester_id?,
            status: self.status.unwrap_or_else(|| "pending".to_string()),
            requested_at: self.requested_at.unwrap_or_else(Utc::now),
            approved_at: self.approved_at,
        })
    }
}

/// Payload for POST /sendmoney.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMoneyRequest {
    pub sender_id: Option<String>,
    pub receiver_id: Option<String>,
    pub amount_sent: Option<f64>,
    pub fee: Option<f64>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl SendMoneyRequest {
    /// Build the transfer record; fee defaults to 0 and sentAt to now.
    pub fn into_send_money(self) -> Option<SendMoney> {
        Some(SendMoney {
            id: String::new(),
            sender_id: self.sender_id?,
            receiver_id: self.receiver_id?,
            amount_sent: self.amount_sent?,
            fee: self.fee.unwrap_or(0.0),
            sent_at: self.sent_at.unwrap_or_else(Utc::now),
        })
    }
}

/// Payload for the status-only PUT endpoints on cash-in and cash-out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// Confirmation body for delete endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body: a message, plus the raw store error text on 500s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(message: impl Into<String>, error: impl ToString) -> Self {
        Self {
            message: message.into(),
            error: Some(error.to_string()),
        }
    }
}

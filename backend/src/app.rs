use axum::{routing::get, Router};

use crate::rest::{self, AppState};

/// Assemble the full application router: one sub-router per resource,
/// each mounted under its own path prefix.
pub fn build_app(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(
            "/",
            get(rest::users::get_all_users).post(rest::users::create_user),
        )
        .route(
            "/:id",
            get(rest::users::get_user_by_id)
                .put(rest::users::update_user)
                .delete(rest::users::delete_user),
        );

    let cash_in_routes = Router::new()
        .route(
            "/",
            get(rest::cash_in::get_all_cash_ins).post(rest::cash_in::create_cash_in),
        )
        .route(
            "/:id",
            get(rest::cash_in::get_cash_in_by_id)
                .put(rest::cash_in::update_cash_in_status)
                .delete(rest::cash_in::delete_cash_in),
        );

    let cash_out_routes = Router::new()
        .route(
            "/",
            get(rest::cash_out::get_all_cash_outs).post(rest::cash_out::create_cash_out),
        )
        .route(
            "/:id",
            get(rest::cash_out::get_cash_out_by_id)
                .put(rest::cash_out::update_cash_out_status)
                .delete(rest::cash_out::delete_cash_out),
        );

    // No update route: transfer records are fire-and-forget
    let send_money_routes = Router::new()
        .route(
            "/",
            get(rest::send_money::get_all_send_money_transactions)
                .post(rest::send_money::send_money),
        )
        .route(
            "/:id",
            get(rest::send_money::get_send_money_transaction_by_id)
                .delete(rest::send_money::delete_send_money_transaction),
        );

    Router::new()
        .nest("/users", user_routes)
        .nest("/cashin", cash_in_routes)
        .nest("/cashout", cash_out_routes)
        .nest("/sendmoney", send_money_routes)
        .with_state(state)
}

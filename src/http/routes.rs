use crate::http::handlers::{
    get_client_data, get_client_deliveries, get_client_deliveries_v2, get_client_lang_list,
    get_client_list, get_counterparty, get_rundeck_client_list, healthz, metrics,
    sync_customer_tf, HttpState,
};
use axum::{routing::get, routing::post, Router};

pub fn router(state: std::sync::Arc<HttpState>) -> Router {
    Router::new()
        .route("/clients", get(get_client_list))
        .route("/rundeck/clients", get(get_rundeck_client_list))
        .route("/client_lang", post(get_client_lang_list))
        .route("/deliveries", post(get_client_deliveries))
        .route("/v2/deliveries", post(get_client_deliveries_v2))
        .route("/get_client_data/:client_id", get(get_client_data))
        .route("/client_counterparty/:client_code", get(get_counterparty))
        .route(
            "/sync_customer_tf",
            get(sync_customer_tf)
                .put(sync_customer_tf)
                .delete(sync_customer_tf),
        )
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

// The router is returned so the caller can run the server and control
// graceful shutdown.
pub fn build_router(state: std::sync::Arc<HttpState>) -> Router {
    router(state)
}

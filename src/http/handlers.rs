use crate::backend::{ClientCounterparty, ClientGetter, ClientTf};
use crate::domain::{ArgMap, BackendError};
use crate::http::args::normalize_args;
use crate::http::encode::{csv_response, json_response};
use crate::http::extractors::RequestId;
use crate::http::types::DeliveriesIn;
use crate::Telemetry;
use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

pub struct HttpState {
    pub getter: Arc<dyn ClientGetter>,
    pub counterparty: Arc<dyn ClientCounterparty>,
    pub tf: Arc<dyn ClientTf>,
    pub telemetry: Telemetry,
}

/// Error channel for the collaborator calls no handler guards: `?` lands
/// here and renders a bare 500 without the `{"result": ...}` envelope.
#[derive(Debug)]
pub struct AppError(pub BackendError);

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "unhandled backend failure");
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

pub async fn get_client_list(State(state): State<Arc<HttpState>>, rid: RequestId) -> Response {
    state.telemetry.requests.inc();
    info!(request_id = %rid, "GET /clients");
    client_list_response(&state, false).await
}

pub async fn get_rundeck_client_list(
    State(state): State<Arc<HttpState>>,
    rid: RequestId,
) -> Response {
    state.telemetry.requests.inc();
    info!(request_id = %rid, "GET /rundeck/clients");
    client_list_response(&state, true).await
}

/// The rundeck alias differs from the plain route in exactly two ways:
/// clients are sorted alphabetically, and an empty list is a valid empty
/// success instead of a 404.
async fn client_list_response(state: &HttpState, rundeck: bool) -> Response {
    let mut client_list = match state.getter.get_clients().await {
        Ok(list) => list,
        Err(e) => {
            state.telemetry.backend_failures.inc();
            error!(error = %e, "get_clients failed");
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"result": e.to_string()}),
            );
        }
    };

    if client_list.is_empty() && !rundeck {
        return json_response(StatusCode::NOT_FOUND, json!({"result": "Client not found"}));
    }

    if rundeck {
        client_list.sort();
    }

    json_response(StatusCode::OK, Value::from(client_list))
}

pub async fn get_client_lang_list(
    State(state): State<Arc<HttpState>>,
    rid: RequestId,
    Json(client_list): Json<Vec<String>>,
) -> Response {
    state.telemetry.requests.inc();
    info!(request_id = %rid, "POST /client_lang");

    let lang_map = match state.getter.get_client_lang_list(&client_list).await {
        Ok(map) => map,
        Err(e) => {
            state.telemetry.backend_failures.inc();
            error!(error = %e, "get_client_lang_list failed");
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"result": e.to_string()}),
            );
        }
    };

    if lang_map.is_empty() {
        return json_response(StatusCode::NOT_FOUND, json!({"result": "Client not found"}));
    }

    json_response(
        StatusCode::OK,
        serde_json::to_value(&lang_map).unwrap_or_default(),
    )
}

pub async fn get_client_deliveries(
    State(state): State<Arc<HttpState>>,
    rid: RequestId,
    Json(body): Json<DeliveriesIn>,
) -> Response {
    state.telemetry.requests.inc();
    info!(request_id = %rid, "POST /deliveries");

    let need_csv = body.csv_wanted();
    let Some(client) = body.client() else {
        return json_response(
            StatusCode::BAD_REQUEST,
            json!({"result": "Client code must be specified"}),
        );
    };

    let (delivery_list, error) = state
        .getter
        .get_deliveries(client, &body.search_params(), &body.timezone())
        .await;

    if delivery_list.is_empty() && error.is_none() {
        return json_response(
            StatusCode::NOT_FOUND,
            json!({"result": format!("No deliveries found for client {client}")}),
        );
    }

    if let Some(error) = error {
        state.telemetry.backend_failures.inc();
        error!(error = %error, client = %client, "get_deliveries reported an error");
        return json_response(StatusCode::INTERNAL_SERVER_ERROR, json!({"result": error}));
    }

    if need_csv {
        state.telemetry.csv_responses.inc();
        return csv_response(StatusCode::CREATED, delivery_list);
    }

    json_response(
        StatusCode::CREATED,
        Value::Array(delivery_list.into_iter().map(Value::Object).collect()),
    )
}

pub async fn get_client_deliveries_v2(
    State(state): State<Arc<HttpState>>,
    rid: RequestId,
    Json(body): Json<DeliveriesIn>,
) -> Response {
    state.telemetry.requests.inc();
    info!(request_id = %rid, "POST /v2/deliveries");

    let Some(client) = body.client() else {
        return json_response(
            StatusCode::BAD_REQUEST,
            r#"{"result": "Client code must be specified"}"#,
        );
    };

    let (delivery_list, error) = state
        .getter
        .get_deliveries_v2(client, &body.search_params(), &body.timezone())
        .await;

    if delivery_list.is_empty() && error.is_none() {
        return json_response(
            StatusCode::NOT_FOUND,
            json!({"result": format!("No deliveries found for client {client}")}),
        );
    }

    if let Some(error) = error {
        state.telemetry.backend_failures.inc();
        error!(error = %error, client = %client, "get_deliveries_v2 reported an error");
        return json_response(StatusCode::INTERNAL_SERVER_ERROR, json!({"result": error}));
    }

    json_response(
        StatusCode::CREATED,
        Value::Array(delivery_list.into_iter().map(Value::Object).collect()),
    )
}

pub async fn get_client_data(
    State(state): State<Arc<HttpState>>,
    rid: RequestId,
    Path(client_id): Path<i64>,
) -> Response {
    state.telemetry.requests.inc();
    info!(request_id = %rid, client_id, "GET /get_client_data");

    let client_data = match state.getter.get_client_data(client_id).await {
        Ok(data) => data,
        Err(e) => {
            state.telemetry.backend_failures.inc();
            error!(error = %e, client_id, "get_client_data failed");
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"result": e.to_string()}),
            );
        }
    };

    match client_data {
        Some(data) if !data.is_empty() => json_response(StatusCode::OK, Value::Object(data)),
        _ => json_response(
            StatusCode::NOT_FOUND,
            json!({"result": format!("Client not found (id=[{client_id}])")}),
        ),
    }
}

/// Unlike its siblings this route does not guard the collaborator call;
/// a failure propagates into `AppError` and skips the JSON envelope.
pub async fn get_counterparty(
    State(state): State<Arc<HttpState>>,
    rid: RequestId,
    Path(client_code): Path<String>,
) -> Result<Response, AppError> {
    state.telemetry.requests.inc();
    info!(request_id = %rid, client_code = %client_code, "GET /client_counterparty");

    let counterparty = state.counterparty.client_counterparty(&client_code).await?;
    let mut body = ArgMap::new();
    body.insert(client_code, counterparty);
    Ok(json_response(StatusCode::OK, Value::Object(body)))
}

enum TfMutation {
    Put,
    Delete,
}

pub async fn sync_customer_tf(
    method: Method,
    State(state): State<Arc<HttpState>>,
    rid: RequestId,
    Query(query): Query<HashMap<String, String>>,
    body: Option<Json<ArgMap>>,
) -> Result<Response, AppError> {
    state.telemetry.requests.inc();
    info!(request_id = %rid, method = %method, "/sync_customer_tf");

    let rq_args = normalize_args(
        query
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect(),
    );
    debug!(args = ?rq_args, "query arguments");

    // explicit verb -> mutation table; only PUT and DELETE mutate before
    // the read-back
    let mutation = match method.as_str() {
        "PUT" => Some(TfMutation::Put),
        "DELETE" => Some(TfMutation::Delete),
        _ => None,
    };

    if let Some(mutation) = mutation {
        let rq_json = normalize_args(body.map(|Json(b)| b).unwrap_or_default());
        debug!(json = ?rq_json, "body arguments");

        let outcome = match mutation {
            TfMutation::Put => state.tf.put_client(&rq_json).await,
            TfMutation::Delete => state.tf.delete_client(&rq_json).await,
        };
        if let Err(e) = outcome {
            state.telemetry.backend_failures.inc();
            error!(error = %e, "client mutation failed");
            return Ok(json_response(
                StatusCode::BAD_REQUEST,
                json!({"result": format!("{e:?}")}),
            ));
        }
    }

    // PUT and DELETE answer with a post-mutation read, not the mutation's
    // own result
    let client = state.tf.get_client(&rq_args).await?;
    let status = if method == Method::PUT {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(json_response(status, Value::Object(client)))
}

pub async fn healthz(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let served = state.telemetry.requests.get();
    (StatusCode::OK, format!("ok - requests={served}"))
}

pub async fn metrics(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let body = state.telemetry.gather();
    (StatusCode::OK, body)
}

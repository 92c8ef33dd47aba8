use crate::domain::DeliveryRecord;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

/// Body of a JSON response: either pre-encoded text passed through
/// byte-for-byte, or a value serialized here.
pub enum JsonPayload {
    Raw(String),
    Value(Value),
}

impl From<Value> for JsonPayload {
    fn from(value: Value) -> Self {
        JsonPayload::Value(value)
    }
}

impl From<String> for JsonPayload {
    fn from(text: String) -> Self {
        JsonPayload::Raw(text)
    }
}

impl From<&str> for JsonPayload {
    fn from(text: &str) -> Self {
        JsonPayload::Raw(text.to_string())
    }
}

/// Body of a CSV response: nothing, one record, or a homogeneous list.
pub enum CsvPayload {
    Empty,
    One(DeliveryRecord),
    Many(Vec<DeliveryRecord>),
}

impl From<DeliveryRecord> for CsvPayload {
    fn from(record: DeliveryRecord) -> Self {
        CsvPayload::One(record)
    }
}

impl From<Vec<DeliveryRecord>> for CsvPayload {
    fn from(records: Vec<DeliveryRecord>) -> Self {
        CsvPayload::Many(records)
    }
}

/// JSON response carrying BOTH `Content-Type` and a literal `mimetype`
/// header; some downstream consumers (the Rundeck automation in
/// particular) only honor one of the two names.
pub fn json_response(status: StatusCode, payload: impl Into<JsonPayload>) -> Response {
    let text = match payload.into() {
        JsonPayload::Raw(text) => text,
        JsonPayload::Value(value) => serde_json::to_string(&value).unwrap_or_default(),
    };
    (
        status,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ),
            (
                HeaderName::from_static("mimetype"),
                HeaderValue::from_static("application/json"),
            ),
        ],
        text,
    )
        .into_response()
}

/// CSV response. The header row is the FIRST record's key order; records
/// are assumed homogeneous, so no key union is computed. An empty payload
/// yields an empty body with no header row.
pub fn csv_response(status: StatusCode, payload: impl Into<CsvPayload>) -> Response {
    let records = match payload.into() {
        CsvPayload::Empty => Vec::new(),
        CsvPayload::One(record) => vec![record],
        CsvPayload::Many(records) => records,
    };

    let mut body = String::new();
    if let Some(first) = records.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&headers).ok();
        for record in &records {
            let row: Vec<String> = headers.iter().map(|key| cell_text(record.get(key))).collect();
            writer.write_record(&row).ok();
        }
        body = writer
            .into_inner()
            .map(|buf| String::from_utf8(buf).unwrap_or_default())
            .unwrap_or_default();
    }

    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"))],
        body,
    )
        .into_response()
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

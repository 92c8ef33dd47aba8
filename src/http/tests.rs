#[cfg(test)]
mod tests {
    use crate::domain::{ArgMap, DeliveryRecord};
    use crate::http::args::normalize_args;
    use crate::http::encode::{csv_response, json_response, CsvPayload};
    use crate::http::extractors::RequestId;
    use crate::http::types::DeliveriesIn;
    use axum::body::to_bytes;
    use axum::extract::FromRequestParts;
    use axum::http::header::{HeaderName, CONTENT_TYPE};
    use axum::http::{HeaderValue, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};

    fn record(pairs: &[(&str, Value)]) -> ArgMap {
        let mut map = ArgMap::new();
        for (k, v) in pairs {
            map.insert((*k).to_string(), v.clone());
        }
        map
    }

    async fn body_string(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), 65_536).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn normalize_args_trims_and_underscores() {
        let args = record(&[
            ("name", json!("  Acme Inc ")),
            ("tabbed", json!("a\tb")),
        ]);
        let out = normalize_args(args);
        assert_eq!(out.get("name"), Some(&json!("Acme_Inc")));
        assert_eq!(out.get("tabbed"), Some(&json!("a_b")));
    }

    #[test]
    fn normalize_args_drops_entries_that_clean_to_nothing() {
        let args = record(&[("blank", json!("   \t  ")), ("kept", json!("x"))]);
        let out = normalize_args(args);
        assert!(!out.contains_key("blank"));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn normalize_args_leaves_non_strings_alone() {
        let args = record(&[
            ("count", json!(3)),
            ("flag", json!(true)),
            ("nothing", json!(null)),
        ]);
        let out = normalize_args(args.clone());
        assert_eq!(out, args);
    }

    #[test]
    fn normalize_args_is_idempotent() {
        let args = record(&[
            ("name", json!(" Acme Inc ")),
            ("blank", json!(" ")),
            ("count", json!(3)),
        ]);
        let once = normalize_args(args);
        let twice = normalize_args(once.clone());
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn json_response_sets_both_headers_and_round_trips() {
        let payload = json!({"result": ["a", "b"], "n": 7});
        let resp = json_response(StatusCode::OK, payload.clone());
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );
        assert_eq!(
            resp.headers().get("mimetype"),
            Some(&HeaderValue::from_static("application/json"))
        );
        let body = body_string(resp).await;
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, payload);
    }

    #[tokio::test]
    async fn json_response_passes_raw_text_through() {
        let raw = r#"{"result": "Client code must be specified"}"#;
        let resp = json_response(StatusCode::BAD_REQUEST, raw);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(resp).await, raw);
    }

    #[tokio::test]
    async fn csv_response_without_records_has_no_header_row() {
        let resp = csv_response(StatusCode::CREATED, CsvPayload::Empty);
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            resp.headers().get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("text/csv"))
        );
        assert_eq!(body_string(resp).await, "");

        let resp = csv_response(StatusCode::CREATED, Vec::<DeliveryRecord>::new());
        assert_eq!(body_string(resp).await, "");
    }

    #[tokio::test]
    async fn csv_single_record_matches_singleton_list() {
        let rec = record(&[("id", json!(1)), ("client", json!("ACME"))]);
        let single = csv_response(StatusCode::CREATED, rec.clone());
        let listed = csv_response(StatusCode::CREATED, vec![rec]);
        assert_eq!(body_string(single).await, body_string(listed).await);
    }

    #[tokio::test]
    async fn csv_header_follows_first_record_key_order() {
        let records = vec![
            record(&[("b", json!(1)), ("a", json!("x"))]),
            record(&[("b", json!(2))]),
        ];
        let resp = csv_response(StatusCode::CREATED, records);
        let body = body_string(resp).await;
        assert_eq!(body, "b,a\n1,x\n2,\n");
        assert_eq!(body.matches("b,a").count(), 1);
    }

    #[test]
    fn csv_flag_accepts_string_spellings() {
        let parse = |v: Value| -> DeliveriesIn { serde_json::from_value(v).unwrap() };
        assert!(parse(json!({"client": "ACME"})).csv_wanted());
        assert!(parse(json!({"client": "ACME", "csv": true})).csv_wanted());
        assert!(parse(json!({"client": "ACME", "csv": "YES"})).csv_wanted());
        assert!(parse(json!({"client": "ACME", "csv": " true "})).csv_wanted());
        assert!(parse(json!({"client": "ACME", "csv": ""})).csv_wanted());
        assert!(!parse(json!({"client": "ACME", "csv": false})).csv_wanted());
        assert!(!parse(json!({"client": "ACME", "csv": "no"})).csv_wanted());
        assert!(!parse(json!({"client": "ACME", "csv": null})).csv_wanted());
    }

    #[test]
    fn deliveries_body_defaults() {
        let body: DeliveriesIn = serde_json::from_value(json!({"client": "ACME"})).unwrap();
        assert_eq!(body.timezone(), "Etc/UTC");
        assert!(body.search_params().is_empty());

        let body: DeliveriesIn =
            serde_json::from_value(json!({"client": "ACME", "timezone": ""})).unwrap();
        assert_eq!(body.timezone(), "Etc/UTC");

        let body: DeliveriesIn = serde_json::from_value(json!({"client": ""})).unwrap();
        assert!(body.client().is_none());
    }

    #[tokio::test]
    async fn request_id_extractor_generates_uuid_when_missing() {
        let req = Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _body) = req.into_parts();
        let rid = RequestId::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(!rid.0.is_empty());
    }

    #[tokio::test]
    async fn request_id_extractor_uses_header() {
        let req = Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _body) = req.into_parts();
        parts.headers.insert(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("testid"),
        );
        let rid = RequestId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(rid.0, "testid");
    }
}

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

/// Per-request identity logged by every handler: the `x-request-id`
/// header when the caller supplies one, a fresh uuid otherwise.
#[derive(Clone)]
pub struct RequestId(pub String);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = ();

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(v) = parts.headers.get("x-request-id") {
            if let Ok(s) = v.to_str() {
                return Ok(RequestId(s.to_string()));
            }
        }
        Ok(RequestId(Uuid::new_v4().to_string()))
    }
}

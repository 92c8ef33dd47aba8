use crate::backend::{ClientCounterparty, ClientGetter, ClientTf};
use crate::domain::{ArgMap, BackendError, DeliveryRecord};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct BackendData {
    clients: Vec<String>,
    langs: BTreeMap<String, String>,
    deliveries: HashMap<String, Vec<DeliveryRecord>>,
    delivery_error: Option<String>,
    client_data: HashMap<i64, ArgMap>,
    counterparties: HashMap<String, Value>,
    tf_clients: HashMap<String, ArgMap>,
    failure: Option<String>,
}

/// In-process implementation of all three collaborator seams.
///
/// Serves local runs and tests; real deployments wire their own
/// collaborators into `HttpState`. Seeds go in through the async setters,
/// and `fail_backend` arms an `Unavailable` error for the guarded read
/// calls.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<RwLock<BackendData>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_client(&self, code: &str, lang: &str) {
        let mut data = self.inner.write().await;
        data.clients.push(code.to_string());
        data.langs.insert(code.to_string(), lang.to_string());
    }

    pub async fn insert_deliveries(&self, client: &str, deliveries: Vec<DeliveryRecord>) {
        let mut data = self.inner.write().await;
        data.deliveries.insert(client.to_string(), deliveries);
    }

    /// Arm the data-layer error string returned next to delivery data.
    pub async fn set_delivery_error(&self, error: &str) {
        self.inner.write().await.delivery_error = Some(error.to_string());
    }

    pub async fn insert_client_data(&self, client_id: i64, data: ArgMap) {
        self.inner.write().await.client_data.insert(client_id, data);
    }

    pub async fn insert_counterparty(&self, code: &str, counterparty: Value) {
        self.inner
            .write()
            .await
            .counterparties
            .insert(code.to_string(), counterparty);
    }

    pub async fn insert_tf_client(&self, code: &str, record: ArgMap) {
        self.inner
            .write()
            .await
            .tf_clients
            .insert(code.to_string(), record);
    }

    /// Make every guarded read call fail with `Unavailable(error)`.
    pub async fn fail_backend(&self, error: &str) {
        self.inner.write().await.failure = Some(error.to_string());
    }

    fn check(data: &BackendData) -> Result<(), BackendError> {
        match &data.failure {
            Some(err) => Err(BackendError::Unavailable(err.clone())),
            None => Ok(()),
        }
    }

    fn lookup_deliveries(
        data: &BackendData,
        client: &str,
        search_params: &ArgMap,
    ) -> (Vec<DeliveryRecord>, Option<String>) {
        let mut list = data.deliveries.get(client).cloned().unwrap_or_default();
        // search params are equality filters on record fields
        list.retain(|rec| search_params.iter().all(|(k, v)| rec.get(k) == Some(v)));
        (list, data.delivery_error.clone())
    }
}

#[async_trait]
impl ClientGetter for MemoryBackend {
    async fn get_clients(&self) -> Result<Vec<String>, BackendError> {
        let data = self.inner.read().await;
        Self::check(&data)?;
        Ok(data.clients.clone())
    }

    async fn get_client_lang_list(
        &self,
        clients: &[String],
    ) -> Result<BTreeMap<String, String>, BackendError> {
        let data = self.inner.read().await;
        Self::check(&data)?;
        let mut langs = BTreeMap::new();
        for client in clients {
            if let Some(lang) = data.langs.get(client) {
                langs.insert(client.clone(), lang.clone());
            }
        }
        Ok(langs)
    }

    async fn get_deliveries(
        &self,
        client: &str,
        search_params: &ArgMap,
        _timezone: &str,
    ) -> (Vec<DeliveryRecord>, Option<String>) {
        let data = self.inner.read().await;
        Self::lookup_deliveries(&data, client, search_params)
    }

    async fn get_deliveries_v2(
        &self,
        client: &str,
        search_params: &ArgMap,
        _timezone: &str,
    ) -> (Vec<DeliveryRecord>, Option<String>) {
        let data = self.inner.read().await;
        Self::lookup_deliveries(&data, client, search_params)
    }

    async fn get_client_data(&self, client_id: i64) -> Result<Option<ArgMap>, BackendError> {
        let data = self.inner.read().await;
        Self::check(&data)?;
        Ok(data.client_data.get(&client_id).cloned())
    }
}

#[async_trait]
impl ClientCounterparty for MemoryBackend {
    async fn client_counterparty(&self, client_code: &str) -> Result<Value, BackendError> {
        let data = self.inner.read().await;
        Self::check(&data)?;
        Ok(data
            .counterparties
            .get(client_code)
            .cloned()
            .unwrap_or(Value::Null))
    }
}

#[async_trait]
impl ClientTf for MemoryBackend {
    async fn get_client(&self, args: &ArgMap) -> Result<ArgMap, BackendError> {
        let data = self.inner.read().await;
        Self::check(&data)?;
        let code = args.get("code").and_then(Value::as_str);
        Ok(code
            .and_then(|c| data.tf_clients.get(c))
            .cloned()
            .unwrap_or_default())
    }

    async fn put_client(&self, args: &ArgMap) -> Result<(), BackendError> {
        let code = args
            .get("code")
            .and_then(Value::as_str)
            .ok_or_else(|| BackendError::Rejected("code is required".to_string()))?
            .to_string();
        let mut record = args.clone();
        record.insert(
            "updated_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        self.inner.write().await.tf_clients.insert(code, record);
        Ok(())
    }

    async fn delete_client(&self, args: &ArgMap) -> Result<(), BackendError> {
        let code = args
            .get("code")
            .and_then(Value::as_str)
            .ok_or_else(|| BackendError::Rejected("code is required".to_string()))?;
        self.inner.write().await.tf_clients.remove(code);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> ArgMap {
        let mut map = ArgMap::new();
        for (k, v) in pairs {
            map.insert((*k).to_string(), v.clone());
        }
        map
    }

    #[tokio::test]
    async fn clients_keep_insertion_order() {
        let backend = MemoryBackend::new();
        backend.insert_client("ZETA", "en").await;
        backend.insert_client("ALPHA", "de").await;
        let clients = backend.get_clients().await.unwrap();
        assert_eq!(clients, vec!["ZETA".to_string(), "ALPHA".to_string()]);
    }

    #[tokio::test]
    async fn lang_list_only_covers_known_clients() {
        let backend = MemoryBackend::new();
        backend.insert_client("ACME", "en").await;
        let langs = backend
            .get_client_lang_list(&["ACME".to_string(), "NOPE".to_string()])
            .await
            .unwrap();
        assert_eq!(langs.len(), 1);
        assert_eq!(langs.get("ACME").map(String::as_str), Some("en"));
    }

    #[tokio::test]
    async fn deliveries_apply_search_params() {
        let backend = MemoryBackend::new();
        backend
            .insert_deliveries(
                "ACME",
                vec![
                    record(&[("id", json!(1)), ("status", json!("open"))]),
                    record(&[("id", json!(2)), ("status", json!("closed"))]),
                ],
            )
            .await;

        let mut params = ArgMap::new();
        params.insert("status".to_string(), json!("open"));
        let (list, error) = backend.get_deliveries("ACME", &params, "Etc/UTC").await;
        assert!(error.is_none());
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].get("id"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn delivery_error_accompanies_data() {
        let backend = MemoryBackend::new();
        backend
            .insert_deliveries("ACME", vec![record(&[("id", json!(1))])])
            .await;
        backend.set_delivery_error("replica lag").await;
        let (list, error) = backend
            .get_deliveries("ACME", &ArgMap::new(), "Etc/UTC")
            .await;
        assert_eq!(list.len(), 1);
        assert_eq!(error.as_deref(), Some("replica lag"));
    }

    #[tokio::test]
    async fn tf_put_get_delete_cycle() {
        let backend = MemoryBackend::new();
        let args = record(&[("code", json!("ACME")), ("name", json!("Acme_Inc"))]);
        backend.put_client(&args).await.unwrap();

        let mut lookup = ArgMap::new();
        lookup.insert("code".to_string(), json!("ACME"));
        let stored = backend.get_client(&lookup).await.unwrap();
        assert_eq!(stored.get("name"), Some(&json!("Acme_Inc")));
        assert!(stored.contains_key("updated_at"));

        backend.delete_client(&lookup).await.unwrap();
        let gone = backend.get_client(&lookup).await.unwrap();
        assert!(gone.is_empty());
    }

    #[tokio::test]
    async fn tf_mutations_require_code() {
        let backend = MemoryBackend::new();
        let args = record(&[("name", json!("Acme"))]);
        let err = backend.put_client(&args).await.unwrap_err();
        assert!(matches!(err, BackendError::Rejected(_)));
        let err = backend.delete_client(&args).await.unwrap_err();
        assert!(matches!(err, BackendError::Rejected(_)));
    }

    #[tokio::test]
    async fn armed_failure_hits_guarded_reads() {
        let backend = MemoryBackend::new();
        backend.fail_backend("backend down").await;
        let err = backend.get_clients().await.unwrap_err();
        assert_eq!(err.to_string(), "backend down");
        assert!(backend.get_client_data(1).await.is_err());
        assert!(backend.client_counterparty("ACME").await.is_err());
    }
}

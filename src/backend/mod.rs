pub mod memory;

pub use memory::MemoryBackend;

use crate::domain::{ArgMap, BackendError, DeliveryRecord};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

/// Read-side collaborator for client and delivery data.
#[async_trait]
pub trait ClientGetter: Send + Sync {
    /// Active client codes in the backend's native order.
    async fn get_clients(&self) -> Result<Vec<String>, BackendError>;

    /// Map client code -> language for the requested clients.
    async fn get_client_lang_list(
        &self,
        clients: &[String],
    ) -> Result<BTreeMap<String, String>, BackendError>;

    /// Deliveries for one client. Domain errors travel in the second slot;
    /// a present error string overrides whatever data came with it.
    async fn get_deliveries(
        &self,
        client: &str,
        search_params: &ArgMap,
        timezone: &str,
    ) -> (Vec<DeliveryRecord>, Option<String>);

    async fn get_deliveries_v2(
        &self,
        client: &str,
        search_params: &ArgMap,
        timezone: &str,
    ) -> (Vec<DeliveryRecord>, Option<String>);

    async fn get_client_data(&self, client_id: i64) -> Result<Option<ArgMap>, BackendError>;
}

/// Counterparty lookup collaborator.
#[async_trait]
pub trait ClientCounterparty: Send + Sync {
    async fn client_counterparty(&self, client_code: &str) -> Result<Value, BackendError>;
}

/// TF synchronization collaborator: record mutations plus the read-back
/// lookup every sync request finishes with.
#[async_trait]
pub trait ClientTf: Send + Sync {
    async fn get_client(&self, args: &ArgMap) -> Result<ArgMap, BackendError>;

    async fn put_client(&self, args: &ArgMap) -> Result<(), BackendError>;

    async fn delete_client(&self, args: &ArgMap) -> Result<(), BackendError>;
}

use serde_json::{Map, Value};

/// Request arguments and client/TF records are schemaless JSON objects.
/// `serde_json` is built with `preserve_order`, so key order is insertion
/// order; the CSV header contract depends on that.
pub type ArgMap = Map<String, Value>;

/// One flat client shipment/order. The field set is assumed uniform across
/// all records of a single response.
pub type DeliveryRecord = Map<String, Value>;

use crate::domain::ArgMap;
use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /deliveries` and `POST /v2/deliveries` (v2 ignores the
/// `csv` flag).
#[derive(Clone, Debug, Deserialize)]
pub struct DeliveriesIn {
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub search_params: Option<ArgMap>,
    #[serde(default = "default_csv")]
    pub csv: Value,
}

fn default_csv() -> Value {
    Value::Bool(true)
}

impl DeliveriesIn {
    /// `client` is required and must be non-empty.
    pub fn client(&self) -> Option<&str> {
        self.client.as_deref().filter(|c| !c.is_empty())
    }

    pub fn timezone(&self) -> String {
        self.timezone
            .clone()
            .filter(|tz| !tz.is_empty())
            .unwrap_or_else(|| "Etc/UTC".to_string())
    }

    pub fn search_params(&self) -> ArgMap {
        self.search_params.clone().unwrap_or_default()
    }

    /// The `csv` flag defaults to true and tolerates string spellings:
    /// "", "yes" and "true" (any case, surrounding whitespace ignored)
    /// count as true. Other value types follow JSON truthiness.
    pub fn csv_wanted(&self) -> bool {
        match &self.csv {
            Value::Bool(b) => *b,
            Value::String(s) => {
                matches!(s.trim().to_lowercase().as_str(), "" | "yes" | "true")
            }
            Value::Null => false,
            Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
        }
    }
}

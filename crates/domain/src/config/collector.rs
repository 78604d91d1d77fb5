use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectorConfig {
    /// Identity stamped on every outbound dnstap message.
    #[serde(default = "default_server_id")]
    pub server_id: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            server_id: default_server_id(),
        }
    }
}

fn default_server_id() -> String {
    "dnstap-relay".to_string()
}

use serde::{Deserialize, Serialize};

/// The query every iteration sends.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetConfig {
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_domain")]
    pub domain: String,

    #[serde(default = "default_record_type")]
    pub record_type: String,

    #[serde(default = "default_protocol")]
    pub protocol: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            domain: default_domain(),
            record_type: default_record_type(),
            protocol: default_protocol(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:53".to_string()
}

fn default_domain() -> String {
    "example.com".to_string()
}

fn default_record_type() -> String {
    "A".to_string()
}

fn default_protocol() -> String {
    "udp".to_string()
}

//! StreamSinkConfig - Config Loader output
//!
//! Default destination stream plus the Redis connection parameters.

use serde::{Deserialize, Serialize};

/// Redis stream sink configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSinkConfig {
    /// Redis host
    #[serde(default = "default_host")]
    pub host: String,

    /// Redis port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logical database index
    #[serde(default)]
    pub db: u32,

    /// ACL username (optional)
    #[serde(default)]
    pub username: Option<String>,

    /// Password (optional)
    #[serde(default)]
    pub password: Option<String>,

    /// Stream used when a message carries no override
    pub write_stream: String,

    /// Store the encoded record as base64 text
    #[serde(default)]
    pub base64_encode: bool,

    /// Approximate cap on stream length (`XADD MAXLEN ~`)
    #[serde(default)]
    pub max_stream_length: Option<usize>,

    /// Per-command timeout in milliseconds (None = no timeout)
    #[serde(default)]
    pub command_timeout_ms: Option<u64>,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6379
}

impl StreamSinkConfig {
    /// Minimal config for a local Redis
    pub fn new(write_stream: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db: 0,
            username: None,
            password: None,
            write_stream: write_stream.into(),
            base64_encode: false,
            max_stream_length: None,
            command_timeout_ms: None,
        }
    }

    /// Display URL in `redis://[user:pass@]host:port/db` form
    ///
    /// Credentials are not escaped; use for logs and reports only.
    pub fn connection_url(&self) -> String {
        let auth = match (&self.username, &self.password) {
            (Some(user), Some(pass)) => format!("{user}:{pass}@"),
            (None, Some(pass)) => format!(":{pass}@"),
            (Some(user), None) => format!("{user}@"),
            (None, None) => String::new(),
        };
        format!("redis://{auth}{}:{}/{}", self.host, self.port, self.db)
    }

    /// Connection URL with the password masked, for logs
    pub fn redacted_url(&self) -> String {
        let mut redacted = self.clone();
        if redacted.password.is_some() {
            redacted.password = Some("***".to_string());
        }
        redacted.connection_url()
    }
}

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CACHE_LIFETIME_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// How long a cached response stays valid, in seconds.
    pub cache_lifetime_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            cache_lifetime_secs: DEFAULT_CACHE_LIFETIME_SECS,
        }
    }
}

impl ProxyConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Reads the config from `path`, or falls back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(Self::from_json(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn cache_lifetime(&self) -> Duration {
        Duration::from_secs(self.cache_lifetime_secs)
    }
}

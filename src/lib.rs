pub mod api;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used items
pub use api::subject::{EchoSubject, Subject};
pub use error::{ProxyError, Result};
pub use models::cache::{CacheEntry, ExpiringCache};
pub use models::config::ProxyConfig;
pub use services::access::{AccessGuard, AccessPolicy, AllowAll, DenyAll, EvenSecond};
pub use services::proxy::{Outcome, Proxy, ProxyStats};
pub use utils::clock::{Clock, ManualClock, SystemClock};

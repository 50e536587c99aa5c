use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

use crate::api::subject::Subject;
use crate::error::{ProxyError, Result};
use crate::models::cache::ExpiringCache;
use crate::services::access::AccessGuard;

/// Where a successful response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Hit,
    Miss,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProxyStats {
    pub hits: u64,
    pub misses: u64,
    pub denials: u64,
}

type Gate = Arc<AsyncMutex<()>>;

/// Holds a key's gate for one request and gives it back on drop, including
/// when the request future is cancelled mid-flight.
struct GateTicket<'a> {
    proxy: &'a Proxy,
    key: &'a str,
    gate: Gate,
}

impl Drop for GateTicket<'_> {
    fn drop(&mut self) {
        self.proxy.release_gate(self.key, &self.gate);
    }
}

/// Stands in front of a [`Subject`], checking access and serving cached
/// responses while they are fresh.
///
/// Concurrent misses for the same request share one subject call: the
/// second caller waits on the first and is then served from the cache.
pub struct Proxy {
    guard: AccessGuard,
    cache: Arc<ExpiringCache>,
    subject: Arc<dyn Subject>,
    gates: Mutex<HashMap<String, Gate>>,
    hits: AtomicU64,
    misses: AtomicU64,
    denials: AtomicU64,
}

impl Proxy {
    pub fn new(guard: AccessGuard, cache: Arc<ExpiringCache>, subject: Arc<dyn Subject>) -> Self {
        Self {
            guard,
            cache,
            subject,
            gates: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            denials: AtomicU64::new(0),
        }
    }

    pub async fn request(&self, input: &str) -> Result<String> {
        self.request_with_outcome(input).await.map(|(response, _)| response)
    }

    pub async fn request_with_outcome(&self, input: &str) -> Result<(String, Outcome)> {
        if !self.guard.check() {
            self.denials.fetch_add(1, Ordering::Relaxed);
            return Err(ProxyError::AccessDenied);
        }

        debug!("Checking cache for {}", input);
        if let Some(cached) = self.cache.get(input) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok((cached, Outcome::Hit));
        }

        let ticket = GateTicket {
            proxy: self,
            key: input,
            gate: self.gate_for(input),
        };
        let resolved = {
            let _held = ticket.gate.lock().await;
            // Another request may have filled the entry while we waited.
            match self.cache.get(input) {
                Some(cached) => (cached, Outcome::Hit),
                None => {
                    info!("Cache miss for {}, forwarding to subject", input);
                    let response = self.subject.handle(input).await;
                    self.cache.put(input, response.clone());
                    (response, Outcome::Miss)
                }
            }
        };
        drop(ticket);

        match resolved.1 {
            Outcome::Hit => self.hits.fetch_add(1, Ordering::Relaxed),
            Outcome::Miss => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        Ok(resolved)
    }

    pub fn stats(&self) -> ProxyStats {
        ProxyStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            denials: self.denials.load(Ordering::Relaxed),
        }
    }

    pub fn cache(&self) -> &Arc<ExpiringCache> {
        &self.cache
    }

    fn gate_for(&self, key: &str) -> Gate {
        let mut gates = self.gates.lock().unwrap_or_else(|e| e.into_inner());
        gates.entry(key.to_string()).or_default().clone()
    }

    // Gates are only cloned under the map lock, so the count is exact here.
    fn release_gate(&self, key: &str, gate: &Gate) {
        let mut gates = self.gates.lock().unwrap_or_else(|e| e.into_inner());
        let last_holder = gates
            .get(key)
            .is_some_and(|stored| Arc::ptr_eq(stored, gate) && Arc::strong_count(gate) == 2);
        if last_holder {
            gates.remove(key);
        }
    }

    #[cfg(test)]
    fn open_gates(&self) -> usize {
        self.gates.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Decides whether a caller may proceed.
///
/// Evaluated on every request and never memoized. Any
/// `Fn() -> bool + Send + Sync` closure is a policy.
pub trait AccessPolicy: Send + Sync {
    fn allows(&self) -> bool;
}

impl<F> AccessPolicy for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn allows(&self) -> bool {
        self()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn allows(&self) -> bool {
        true
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAll;

impl AccessPolicy for DenyAll {
    fn allows(&self) -> bool {
        false
    }
}

/// Lets callers through only during even wall-clock seconds.
///
/// A stand-in for a real authorization check; only the demo binary uses it.
#[derive(Debug, Default, Clone, Copy)]
pub struct EvenSecond;

impl AccessPolicy for EvenSecond {
    fn allows(&self) -> bool {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|since| since.as_secs() % 2 == 0)
            .unwrap_or(false)
    }
}

pub struct AccessGuard {
    policy: Box<dyn AccessPolicy>,
}

impl AccessGuard {
    pub fn new(policy: impl AccessPolicy + 'static) -> Self {
        Self {
            policy: Box::new(policy),
        }
    }

    pub fn check(&self) -> bool {
        debug!("Checking access");
        let allowed = self.policy.allows();
        if !allowed {
            warn!("Access denied");
        }
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn builtin_policies() {
        assert!(AccessGuard::new(AllowAll).check());
        assert!(!AccessGuard::new(DenyAll).check());
    }

    #[test]
    fn closure_is_evaluated_on_every_check() {
        let calls = Arc::new(AtomicUsize::new(0));
        let open = Arc::new(AtomicBool::new(true));
        let guard = {
            let calls = calls.clone();
            let open = open.clone();
            AccessGuard::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                open.load(Ordering::SeqCst)
            })
        };

        assert!(guard.check());
        open.store(false, Ordering::SeqCst);
        assert!(!guard.check());
        open.store(true, Ordering::SeqCst);
        assert!(guard.check());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}

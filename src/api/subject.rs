use async_trait::async_trait;
use tracing::info;

/// The real handler sitting behind the proxy.
///
/// Assumed infallible and deterministic for a given request.
#[async_trait]
pub trait Subject: Send + Sync {
    async fn handle(&self, request: &str) -> String;
}

pub struct EchoSubject;

impl EchoSubject {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EchoSubject {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Subject for EchoSubject {
    async fn handle(&self, request: &str) -> String {
        info!("RealSubject: handling request \"{}\"", request);
        format!("Response for \"{}\" from RealSubject.", request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echo_subject_names_the_request() {
        let response = EchoSubject::new().handle("Request 1").await;
        assert_eq!(response, "Response for \"Request 1\" from RealSubject.");
    }
}

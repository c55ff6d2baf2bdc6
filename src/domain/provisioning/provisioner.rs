//! External provisioning action

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by an external provisioning action
#[derive(Debug, Error)]
pub enum ProvisionerError {
    #[error("Failed to start provisioner: {0}")]
    Spawn(String),

    #[error("Provisioner exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("Provisioner timed out after {0} seconds")]
    Timeout(u64),
}

/// Arguments passed to the provisioning action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub name: String,
    pub address: String,
    pub port: u16,
}

/// Instantiates hosting resources for a new blog
///
/// Treated as a black box: any failure aborts blog creation.
#[async_trait]
pub trait Provisioner: Send + Sync + Debug {
    /// Run the action, returning whatever it printed
    async fn provision(&self, request: &ProvisionRequest) -> Result<Vec<u8>, ProvisionerError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock provisioner recording every request
    #[derive(Debug, Default)]
    pub struct MockProvisioner {
        requests: Mutex<Vec<ProvisionRequest>>,
        error: Mutex<Option<String>>,
        delay: Option<Duration>,
    }

    impl MockProvisioner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn requests(&self) -> Vec<ProvisionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Provisioner for MockProvisioner {
        async fn provision(
            &self,
            request: &ProvisionRequest,
        ) -> Result<Vec<u8>, ProvisionerError> {
            self.requests.lock().unwrap().push(request.clone());

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(ProvisionerError::Exit {
                    status: "exit status: 1".to_string(),
                    stderr: error,
                });
            }

            Ok(format!("80 -> {}", request.port).into_bytes())
        }
    }
}

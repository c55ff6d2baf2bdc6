//! Provisioner that runs an external executable

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::provisioning::{ProvisionRequest, Provisioner, ProvisionerError};

/// Runs `<program> [args..] <name> <address> <port>`
///
/// A non-zero exit status is a failure. The child is killed if the
/// returned future is dropped, so callers can bound it with a timeout.
#[derive(Debug, Clone)]
pub struct ScriptProvisioner {
    program: PathBuf,
    args: Vec<String>,
}

impl ScriptProvisioner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the blog name, address and port
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl Provisioner for ScriptProvisioner {
    async fn provision(&self, request: &ProvisionRequest) -> Result<Vec<u8>, ProvisionerError> {
        debug!(
            program = %self.program.display(),
            name = %request.name,
            port = request.port,
            "Running provisioner"
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&request.name)
            .arg(&request.address)
            .arg(request.port.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ProvisionerError::Spawn(format!("{}: {}", self.program.display(), e))
            })?;

        if !output.status.success() {
            return Err(ProvisionerError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn request() -> ProvisionRequest {
        ProvisionRequest {
            name: "MyBlog".to_string(),
            address: "MyBlog.goblog.pw".to_string(),
            port: 4242,
        }
    }

    #[tokio::test]
    async fn test_passes_name_address_port() {
        let provisioner = ScriptProvisioner::new("sh").with_args(["-c", "echo \"$1 $2 $3\"", "sh"]);

        let output = provisioner.provision(&request()).await.unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "MyBlog MyBlog.goblog.pw 4242\n");
    }

    #[tokio::test]
    async fn test_non_zero_exit_fails() {
        let provisioner =
            ScriptProvisioner::new("sh").with_args(["-c", "echo boom >&2; exit 3", "sh"]);

        let err = provisioner.provision(&request()).await.unwrap_err();
        match err {
            ProvisionerError::Exit { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("Expected exit error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program_fails() {
        let provisioner = ScriptProvisioner::new("./definitely-not-a-provisioner.sh");

        let err = provisioner.provision(&request()).await.unwrap_err();
        assert!(matches!(err, ProvisionerError::Spawn(_)));
    }
}

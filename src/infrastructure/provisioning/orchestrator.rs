//! Blog creation workflow
//!
//! Order of effects for a successful creation:
//! 1. the name is claimed in the directory (atomic check-and-set)
//! 2. a port is drawn
//! 3. the external provisioner runs, bounded by a timeout
//! 4. the blog is appended to the owner's registry list
//!
//! A failure in 2 or 3 rolls back the claim and any port reservation. Steps
//! 1 to 4 run on their own task, so a caller that stops waiting (client
//! disconnect, outer timeout) neither interrupts provisioning nor strands
//! the claim. A crash between 1 and 4 leaves a directory entry without an
//! owner, which `orphaned_names` reports.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::domain::provisioning::{
    PortAllocator, ProvisionError, ProvisionRequest, Provisioner, ProvisionerError,
};
use crate::domain::tenant::{BlogName, TenantBlog};
use crate::domain::{DomainError, Identity};
use crate::infrastructure::tenant::{TenantDirectory, TenantRegistry};

/// Default bound on a single provisioner run
pub const DEFAULT_PROVISION_TIMEOUT: Duration = Duration::from_secs(60);

/// Creates blogs on behalf of authenticated identities
#[derive(Debug, Clone)]
pub struct ProvisioningOrchestrator {
    directory: TenantDirectory,
    registry: TenantRegistry,
    ports: Arc<dyn PortAllocator>,
    provisioner: Arc<dyn Provisioner>,
    hosting_domain: String,
    timeout: Duration,
    in_flight: Arc<Mutex<HashMap<String, usize>>>,
}

/// Marks a name as being created until dropped
struct InFlight {
    names: Arc<Mutex<HashMap<String, usize>>>,
    name: String,
}

impl InFlight {
    fn enter(names: &Arc<Mutex<HashMap<String, usize>>>, name: &BlogName) -> Self {
        let mut guard = names.lock().unwrap_or_else(|e| e.into_inner());
        *guard.entry(name.to_string()).or_insert(0) += 1;

        Self {
            names: Arc::clone(names),
            name: name.to_string(),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let mut names = self.names.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(count) = names.get_mut(&self.name) {
            *count -= 1;
            if *count == 0 {
                names.remove(&self.name);
            }
        }
    }
}

impl ProvisioningOrchestrator {
    pub fn new(
        directory: TenantDirectory,
        registry: TenantRegistry,
        ports: Arc<dyn PortAllocator>,
        provisioner: Arc<dyn Provisioner>,
        hosting_domain: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            registry,
            ports,
            provisioner,
            hosting_domain: hosting_domain.into(),
            timeout: DEFAULT_PROVISION_TIMEOUT,
            in_flight: Arc::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn hosting_domain(&self) -> &str {
        &self.hosting_domain
    }

    /// Provision a new blog named after `raw_name` for `identity`
    pub async fn create_blog(
        &self,
        identity: &str,
        raw_name: &str,
    ) -> Result<TenantBlog, ProvisionError> {
        let identity = Identity::new(identity).map_err(|_| ProvisionError::Unauthenticated)?;
        let name = BlogName::sanitize(raw_name)
            .map_err(|e| ProvisionError::invalid_name(e.to_string()))?;

        // Detached from the caller: dropping this future leaves the task running
        let this = self.clone();
        let task_name = name.clone();
        let task = tokio::spawn(async move { this.create_claimed(identity, task_name).await });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                error!(name = %name, error = %e, "Blog creation task aborted");
                Err(ProvisionError::provisioning_failed(name.as_str(), e.to_string()))
            }
        }
    }

    async fn create_claimed(
        &self,
        identity: Identity,
        name: BlogName,
    ) -> Result<TenantBlog, ProvisionError> {
        let _in_flight = InFlight::enter(&self.in_flight, &name);
        let address = name.address(&self.hosting_domain);

        if !self.directory.claim(&name, &address)? {
            debug!(name = %name, "Blog name already taken");
            return Err(ProvisionError::name_taken(name.as_str()));
        }

        let port = match self.ports.allocate(&name) {
            Ok(port) => port,
            Err(e) => {
                self.roll_back(&name, None);
                return Err(e.into());
            }
        };

        let request = ProvisionRequest {
            name: name.to_string(),
            address: address.clone(),
            port,
        };

        match self.run_provisioner(&request).await {
            Ok(output) => {
                info!(name = %name, address = %address, "80 -> {}", port);
                debug!(output = %String::from_utf8_lossy(&output), "Provisioner output");
            }
            Err(e) => {
                warn!(name = %name, port, error = %e, "Provisioning failed");
                self.roll_back(&name, Some(port));
                return Err(ProvisionError::provisioning_failed(name.as_str(), e.to_string()));
            }
        }

        if let Err(e) = self.registry.add_blog(&identity, &name, &address) {
            error!(
                name = %name,
                identity = %identity,
                error = %e,
                "Blog provisioned but not recorded for its owner; directory entry is orphaned"
            );
            return Err(e.into());
        }

        Ok(TenantBlog::new(name.as_str(), address))
    }

    /// Blogs owned by `identity`, in creation order
    pub fn blogs_of(&self, identity: &Identity) -> Result<Vec<TenantBlog>, DomainError> {
        self.registry.blogs_of(identity)
    }

    /// Directory entries that no identity owns
    ///
    /// Names whose creation is still running in this process are left out.
    pub fn orphaned_names(&self) -> Result<Vec<String>, DomainError> {
        let owned: HashSet<String> = self.registry.owned_names()?.into_iter().collect();
        let names = self.directory.names()?;
        let in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());

        Ok(names
            .into_iter()
            .filter(|name| !owned.contains(name) && !in_flight.contains_key(name))
            .collect())
    }

    async fn run_provisioner(&self, request: &ProvisionRequest) -> Result<Vec<u8>, ProvisionerError> {
        match tokio::time::timeout(self.timeout, self.provisioner.provision(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProvisionerError::Timeout(self.timeout.as_secs())),
        }
    }

    fn roll_back(&self, name: &BlogName, port: Option<u16>) {
        if let Err(e) = self.directory.release(name) {
            error!(name = %name, error = %e, "Failed to release blog name");
        }

        if let Some(port) = port {
            if let Err(e) = self.ports.release(port) {
                error!(port, error = %e, "Failed to release port");
            }
        }
    }
}

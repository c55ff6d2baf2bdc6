//! Blog Panel
//!
//! Control panel for a multi-tenant blog host:
//! - Signup and login with Argon2 password hashes
//! - Cookie sessions stored server-side
//! - Blog creation through an external provisioning script, with globally
//!   unique blog names and per-user blog lists

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::middleware::SessionCookie;
use api::state::AppState;
use config::PortStrategy;
use domain::{PortAllocator, PortRange};
use infrastructure::{
    provisioning::{ProvisioningOrchestrator, ScriptProvisioner},
    session::SessionService,
    storage::StorageFactory,
    tenant::{RandomPortAllocator, ReservingPortAllocator, TenantDirectory, TenantRegistry},
    user::{Argon2Hasher, CredentialService},
};

/// Open the store and wire every service around the single handle
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let store = StorageFactory::create(&config.storage)?;

    let credentials = CredentialService::new(Arc::clone(&store), Arc::new(Argon2Hasher::new()));

    let mut sessions = SessionService::new(Arc::clone(&store));
    if let Some(ttl) = config.session.ttl() {
        sessions = sessions.with_ttl(ttl);
    }

    let provisioning = &config.provisioning;
    let range = PortRange::new(provisioning.port_min, provisioning.port_max)?;
    let ports: Arc<dyn PortAllocator> = match provisioning.port_strategy {
        PortStrategy::Random => Arc::new(RandomPortAllocator::new(range)),
        PortStrategy::Reserved => Arc::new(ReservingPortAllocator::new(Arc::clone(&store), range)),
    };

    let provisioner =
        ScriptProvisioner::new(&provisioning.command).with_args(provisioning.args.iter().cloned());

    let orchestrator = ProvisioningOrchestrator::new(
        TenantDirectory::new(Arc::clone(&store)),
        TenantRegistry::new(Arc::clone(&store)),
        ports,
        Arc::new(provisioner),
        provisioning.hosting_domain.clone(),
    )
    .with_timeout(provisioning.timeout());

    Ok(AppState::new(
        store,
        credentials,
        sessions,
        orchestrator,
        SessionCookie::from(&config.session),
    ))
}

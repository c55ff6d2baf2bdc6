//! Application state for shared services

use std::sync::Arc;

use crate::api::middleware::SessionCookie;
use crate::domain::KeyValueStore;
use crate::infrastructure::provisioning::ProvisioningOrchestrator;
use crate::infrastructure::session::SessionService;
use crate::infrastructure::user::CredentialService;

/// Services shared by every handler, all backed by one store handle
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub credentials: Arc<CredentialService>,
    pub sessions: Arc<SessionService>,
    pub orchestrator: Arc<ProvisioningOrchestrator>,
    pub cookie: SessionCookie,
}

impl AppState {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        credentials: CredentialService,
        sessions: SessionService,
        orchestrator: ProvisioningOrchestrator,
        cookie: SessionCookie,
    ) -> Self {
        Self {
            store,
            credentials: Arc::new(credentials),
            sessions: Arc::new(sessions),
            orchestrator: Arc::new(orchestrator),
            cookie,
        }
    }
}

//! Provisioning infrastructure module
//!
//! The external provisioning script and the blog creation workflow that
//! composes directory, registry, port allocation and provisioner.

mod orchestrator;
mod script;

pub use orchestrator::ProvisioningOrchestrator;
pub use script::ScriptProvisioner;

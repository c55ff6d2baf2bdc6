//! Infrastructure layer - Store-backed services and external actions

pub mod logging;
pub mod provisioning;
pub mod session;
pub mod storage;
pub mod tenant;
pub mod user;

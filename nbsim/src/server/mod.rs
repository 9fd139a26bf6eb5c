pub mod protocol;
pub mod gateway;
pub mod broadcast;
pub mod router;
#[allow(clippy::module_inception)]
pub mod server;

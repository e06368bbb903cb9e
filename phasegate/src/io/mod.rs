//! Side-effecting operations: phase persistence, deployment, request I/O.

pub mod deploy;
pub mod phase_store;
pub mod request;
pub mod settings;

//! Backend access and the in-memory view session.

pub mod backend;
pub mod session;

//! Shared plumbing for the optica services: health endpoints, request-id
//! middleware, datetime serialization, and tracing setup.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;

//! Reform HTTP Server
//!
//! JSON front end for the description improvement pipeline.

mod protocol;
mod server;

pub use protocol::{ErrorBody, ReformRequest};
pub use server::{router, serve, DEFAULT_HOST, DEFAULT_PORT};

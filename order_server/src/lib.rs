//! # Order service
//! This crate hosts the server side of the order service. It is responsible for:
//! * Rebuilding the order cache from the database at startup.
//! * Consuming order messages from a NATS JetStream stream and handing them to the ingestion loop.
//! * Serving single orders over HTTP.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/order/{order_uid}`: Returns the order as JSON, or a 404 if it does not exist.
pub mod cli;
pub mod config;
pub mod errors;
pub mod ingest_worker;
pub mod queue;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;

//! nimbus-api — HTTP client for the Nimbus control plane.
//!
//! Implements [`nimbus_core::ControlPlane`] over the platform REST
//! API. Retries and backoff, if any, live in the transport below this
//! layer; this crate only classifies failures (404 → not found,
//! everything else → remote).

pub mod client;
pub mod wire;

pub use client::HttpControlPlane;

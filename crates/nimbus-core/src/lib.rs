//! nimbus-core — the decision logic behind `nimbus scale`.
//!
//! Turns the backward-compatible positional grammar into a
//! [`ScalingIntent`] and drives the lookup → validate → update flow
//! against a [`ControlPlane`] implementation. The HTTP client lives in
//! `nimbus-api`; everything here is testable against stubs.

pub mod config;
pub mod error;
pub mod intent;
pub mod orchestrator;
pub mod regions;
pub mod types;

pub use error::{ScaleError, ScaleResult};
pub use orchestrator::{ControlPlane, ScaleReporter, VerifyPolicy, scale_deployment};
pub use types::{
    Deployment, DeploymentKind, DeploymentState, ScalingBound, ScalingBounds, ScalingIntent,
};

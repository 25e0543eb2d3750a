//! Wire types for the Nimbus control-plane API.
//!
//! Every endpoint wraps its payload in the `{success, data, error}`
//! envelope.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use nimbus_core::types::{ScalingBounds, ScalingIntent};

/// Response envelope shared by all endpoints.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `PATCH /v1/deployments/{id}/scale`: the full region map,
/// applied by the platform as one request.
#[derive(Debug, Serialize)]
pub struct ScaleUpdateRequest<'a> {
    pub regions: &'a ScalingIntent,
}

/// Payload of `GET /v1/deployments/{id}/scale`.
#[derive(Debug, Deserialize)]
pub struct ScaleSettings {
    pub regions: HashMap<String, ScalingBounds>,
}

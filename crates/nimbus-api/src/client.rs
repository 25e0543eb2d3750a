//! HTTP client for the Nimbus control plane.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, anyhow};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use nimbus_core::config::ClientConfig;
use nimbus_core::error::{ScaleError, ScaleResult};
use nimbus_core::orchestrator::ControlPlane;
use nimbus_core::types::{Deployment, ScalingBounds, ScalingIntent};

use crate::wire::{ApiEnvelope, ScaleSettings, ScaleUpdateRequest};

/// Control-plane client speaking the platform REST API.
pub struct HttpControlPlane {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    team: Option<String>,
}

impl HttpControlPlane {
    /// Build a client from resolved settings.
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("nimbus/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            team: config.team.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(team) = &self.team {
            req = req.query(&[("team", team.as_str())]);
        }
        req
    }
}

/// Decode the response envelope, turning HTTP- or API-level failures
/// into remote errors carrying the server's own message.
async fn read_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> ScaleResult<Option<T>> {
    let status = resp.status();
    let envelope: ApiEnvelope<T> = resp
        .json()
        .await
        .with_context(|| format!("failed to decode API response ({status})"))?;
    if !status.is_success() || !envelope.success {
        let detail = envelope
            .error
            .unwrap_or_else(|| format!("API request failed with status {status}"));
        return Err(ScaleError::Remote(anyhow!(detail)));
    }
    Ok(envelope.data)
}

impl ControlPlane for HttpControlPlane {
    async fn resolve_deployment(&self, id: &str) -> ScaleResult<Deployment> {
        debug!(deployment = id, "looking up deployment");
        let resp = self
            .request(Method::GET, &format!("/v1/deployments/{id}"))
            .send()
            .await
            .context("deployment lookup failed")?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ScaleError::NotFound(id.to_string()));
        }
        read_envelope::<Deployment>(resp)
            .await?
            .ok_or_else(|| ScaleError::Remote(anyhow!("deployment record missing from response")))
    }

    async fn update_scale(
        &self,
        deployment: &Deployment,
        intent: &ScalingIntent,
    ) -> ScaleResult<()> {
        debug!(
            deployment = %deployment.id,
            regions = intent.len(),
            "submitting scale update"
        );
        let resp = self
            .request(
                Method::PATCH,
                &format!("/v1/deployments/{}/scale", deployment.id),
            )
            .json(&ScaleUpdateRequest { regions: intent })
            .send()
            .await
            .context("scale update failed")?;
        read_envelope::<serde_json::Value>(resp).await?;
        Ok(())
    }

    async fn current_scale(
        &self,
        deployment: &Deployment,
    ) -> ScaleResult<HashMap<String, ScalingBounds>> {
        let resp = self
            .request(
                Method::GET,
                &format!("/v1/deployments/{}/scale", deployment.id),
            )
            .send()
            .await
            .context("scale settings fetch failed")?;
        let settings = read_envelope::<ScaleSettings>(resp)
            .await?
            .ok_or_else(|| ScaleError::Remote(anyhow!("scale settings missing from response")))?;
        Ok(settings.regions)
    }
}

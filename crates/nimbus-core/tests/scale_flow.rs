//! End-to-end flow: positional tokens through the resolver into the
//! orchestrator, against a recording stub control plane.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use nimbus_core::error::{ScaleError, ScaleResult};
use nimbus_core::intent;
use nimbus_core::orchestrator::{
    ControlPlane, SilentReporter, VerifyPolicy, scale_deployment,
};
use nimbus_core::types::{
    Deployment, DeploymentKind, DeploymentState, ScalingBounds, ScalingIntent,
};

/// Records every call and payload it receives.
#[derive(Default)]
struct RecordingControlPlane {
    lookups: AtomicUsize,
    payloads: Mutex<Vec<serde_json::Value>>,
}

impl ControlPlane for RecordingControlPlane {
    async fn resolve_deployment(&self, id: &str) -> ScaleResult<Deployment> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(Deployment {
            id: "dpl_777".to_string(),
            url: id.to_string(),
            kind: DeploymentKind::Container,
            state: DeploymentState::Ready,
        })
    }

    async fn update_scale(
        &self,
        _deployment: &Deployment,
        intent: &ScalingIntent,
    ) -> ScaleResult<()> {
        self.payloads
            .lock()
            .unwrap()
            .push(serde_json::to_value(intent).unwrap());
        Ok(())
    }

    async fn current_scale(
        &self,
        _deployment: &Deployment,
    ) -> ScaleResult<HashMap<String, ScalingBounds>> {
        // Settings apply immediately in the stub.
        let applied = self.payloads.lock().unwrap().last().cloned();
        match applied {
            Some(value) => Ok(serde_json::from_value(value).unwrap()),
            None => Ok(HashMap::new()),
        }
    }
}

fn tokens(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn current_form_flows_through_to_the_update_payload() {
    let control = RecordingControlPlane::default();
    let intent = intent::resolve(&tokens(&["dep.example", "sfo,iad", "1", "5"])).unwrap();

    scale_deployment(
        &control,
        &SilentReporter,
        "dep.example",
        &intent,
        VerifyPolicy::disabled(),
    )
    .await
    .unwrap();

    let payloads = control.payloads.lock().unwrap();
    assert_eq!(payloads.len(), 1);
    assert_eq!(
        payloads[0],
        serde_json::json!({
            "sfo": { "min": 1, "max": 5 },
            "iad": { "min": 1, "max": 5 },
        })
    );
}

#[tokio::test]
async fn verification_sees_the_stub_settings_apply() {
    let control = RecordingControlPlane::default();
    let intent = intent::resolve(&tokens(&["dep.example", "eu", "2"])).unwrap();

    scale_deployment(
        &control,
        &SilentReporter,
        "dep.example",
        &intent,
        VerifyPolicy::default(),
    )
    .await
    .unwrap();
    assert_eq!(control.lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn resubmitting_the_same_intent_sends_identical_payloads() {
    let control = RecordingControlPlane::default();
    let intent = intent::resolve(&tokens(&["dep.example", "auto"])).unwrap();

    for _ in 0..2 {
        scale_deployment(
            &control,
            &SilentReporter,
            "dep.example",
            &intent,
            VerifyPolicy::disabled(),
        )
        .await
        .unwrap();
    }

    let payloads = control.payloads.lock().unwrap();
    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[0], payloads[1]);
}

#[tokio::test]
async fn too_many_tokens_fail_before_any_lookup() {
    let control = RecordingControlPlane::default();

    let err = intent::resolve(&tokens(&["dep.example", "sfo", "1", "2", "3"])).unwrap_err();
    assert!(matches!(err, ScaleError::Usage(msg) if msg.contains("too many")));

    // Resolution failed, so the orchestrator is never entered.
    assert_eq!(control.lookups.load(Ordering::SeqCst), 0);
    assert!(control.payloads.lock().unwrap().is_empty());
}

//! The `scale` command: glue between the CLI surface and the core
//! resolver/orchestrator.
//!
//! Argument resolution runs before any configuration or network work,
//! so usage and region failures never touch the control plane.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use tracing::debug;

use nimbus_api::HttpControlPlane;
use nimbus_core::config::ClientConfig;
use nimbus_core::error::ScaleResult;
use nimbus_core::orchestrator::{ScaleReporter, VerifyPolicy, scale_deployment};
use nimbus_core::types::Deployment;
use nimbus_core::intent;

/// Arguments for `nimbus scale`.
#[derive(Debug, Args)]
pub struct ScaleArgs {
    /// Deployment identifier or alias, followed by regions and bounds.
    #[arg(required = true, num_args = 1..)]
    pub args: Vec<String>,

    /// Path to the auth config file (default: ~/.config/nimbus/auth.toml).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API token (overrides NIMBUS_TOKEN and the config file).
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Team scope for the request.
    #[arg(long, value_name = "SLUG")]
    pub team: Option<String>,

    /// Control-plane base URL (overrides NIMBUS_API).
    #[arg(long, value_name = "URL")]
    pub api: Option<String>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,

    /// Skip post-update verification of the applied settings.
    #[arg(long)]
    pub no_verify: bool,
}

/// Prints one line per completed step with its elapsed time.
struct ConsoleReporter;

impl ScaleReporter for ConsoleReporter {
    fn resolved(&self, deployment: &Deployment, elapsed: Duration) {
        println!(
            "✓ Found deployment {} ({:.2}s)",
            deployment.url,
            elapsed.as_secs_f64()
        );
    }

    fn updated(&self, regions: usize, elapsed: Duration) {
        println!(
            "✓ Scale settings updated in {regions} region(s) ({:.2}s)",
            elapsed.as_secs_f64()
        );
    }

    fn verified(&self, elapsed: Duration) {
        println!("✓ Settings verified ({:.2}s)", elapsed.as_secs_f64());
    }
}

pub async fn run(args: ScaleArgs) -> ScaleResult<()> {
    let intent = intent::resolve(&args.args)?;
    // resolve() guarantees at least two tokens.
    let deployment_id = args.args[0].as_str();
    debug!(
        deployment = deployment_id,
        regions = intent.len(),
        "resolved scaling intent"
    );

    let config = ClientConfig::resolve(args.config.as_deref(), args.token, args.team, args.api)?;
    let control = HttpControlPlane::new(&config)?;

    let verify = VerifyPolicy {
        enabled: !args.no_verify,
        ..VerifyPolicy::default()
    };
    scale_deployment(&control, &ConsoleReporter, deployment_id, &intent, verify).await?;
    Ok(())
}

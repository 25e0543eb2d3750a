use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use nimbus_core::ScaleError;

mod commands;

#[derive(Parser)]
#[command(
    name = "nimbus",
    about = "Nimbus — deployment platform CLI",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Adjust the per-region instance scaling of a deployment.
    ///
    /// Current form: nimbus scale <deployment> <regions> [min] [max]
    ///
    /// Legacy form:  nimbus scale <deployment> <min> [max] (all regions)
    ///
    /// <regions> is a comma-separated list of region codes or a group
    /// keyword (all, us, eu, ap). Bounds are instance counts or "auto".
    Scale(commands::scale::ScaleArgs),
    /// Deprecated alias for `scale`.
    #[command(hide = true)]
    Autoscale {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
        args: Vec<String>,
    },
}

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for target in ["nimbus_core", "nimbus_api", "nimbus_cli"] {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Exit code 2 is reserved for help invocations; anything
            // else that fails to parse is a plain usage failure.
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 2,
                ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    match cli.command {
        Commands::Scale(args) => {
            init_tracing(args.debug);
            match commands::scale::run(args).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    report_error(&err);
                    ExitCode::from(1)
                }
            }
        }
        Commands::Autoscale { .. } => {
            eprintln!(
                "`nimbus autoscale` has been deprecated; \
                 use `nimbus scale <deployment> <regions> [min] [max]`"
            );
            ExitCode::from(1)
        }
    }
}

fn report_error(err: &ScaleError) {
    match err {
        ScaleError::Usage(msg) => {
            eprintln!("Error: {msg}");
            eprintln!("Run `nimbus scale --help` for usage.");
        }
        // The alternate format prints the full cause chain.
        ScaleError::Remote(cause) => eprintln!("Error: {cause:#}"),
        other => eprintln!("Error: {other}"),
    }
}

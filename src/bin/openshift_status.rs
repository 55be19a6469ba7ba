//! openshift-client status binary.
//!
//! Connects to a broker, lists domains and applications with their
//! capabilities, and optionally waits for every application to become
//! reachable.
//!
//! # Usage
//!
//! ```bash
//! openshift_status [config.yaml] [--wait <seconds>]
//! ```
//!
//! # Environment Variables
//!
//! - `OPENSHIFT_SERVER`, `OPENSHIFT_USERNAME`, `OPENSHIFT_PASSWORD`,
//!   `OPENSHIFT_TIMEOUT` override the config file
//! - `RUST_LOG`: tracing filter (default: "info,openshift_client=debug")

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use openshift_client::{
    adapt, AccessibilityHandle, Capable, ClientConfig, Connection, HttpTransport, Transport,
};

struct Args {
    config: Option<String>,
    wait: Option<Duration>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        wait: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--wait" => {
                let secs = iter.next().context("--wait needs a number of seconds")?;
                let secs: u64 = secs.parse().with_context(|| format!("invalid --wait value: {}", secs))?;
                args.wait = Some(Duration::from_secs(secs));
            }
            flag if flag.starts_with("--") => bail!("unknown flag: {}", flag),
            path => args.config = Some(path.to_string()),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&str>) -> Result<ClientConfig> {
    let config = match path {
        Some(path) => ClientConfig::from_yaml_file(path).with_context(|| format!("reading {}", path))?,
        None => ClientConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,openshift_client=debug".into()),
        )
        .init();

    let args = parse_args()?;
    let config = load_config(args.config.as_deref())?;

    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config)?);
    tracing::info!("connecting to {}", transport.server_url());
    let mut connection = Connection::connect(transport)?;

    let mut pending: Vec<(String, AccessibilityHandle)> = Vec::new();
    for domain in connection.domains()?.handles() {
        let applications = domain.write().applications()?.handles();
        println!("{} ({} applications)", domain.read().id(), applications.len());

        for application in applications {
            let service = adapt(application.clone());
            let kinds: Vec<String> = service.capabilities().kinds().map(|k| k.to_string()).collect();
            {
                let app = application.read();
                println!(
                    "  {:<24} {:<40} [{}]",
                    app.name(),
                    app.app_url().unwrap_or("-"),
                    kinds.join(", ")
                );
            }

            if let Some(timeout) = args.wait {
                let waiting = application.read().wait_for_accessible_async(timeout);
                match waiting {
                    Ok(handle) => pending.push((service.name(), handle)),
                    Err(e) => tracing::warn!("cannot wait for {}: {}", service.name(), e),
                }
            }
        }
    }

    if pending.is_empty() {
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    runtime.block_on(async {
        for (name, handle) in pending {
            let report = handle.outcome().await;
            println!(
                "{:<24} {:?} after {} attempts ({:.1}s)",
                name,
                report.outcome,
                report.attempts,
                report.elapsed.as_secs_f64()
            );
        }
    });
    Ok(())
}

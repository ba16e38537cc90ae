use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use uptime_sync::config::AppConfig;
use uptime_sync::monitors::{MonitorService, MonitorServiceProxy};
use uptime_sync::sync::{self, SyncAction};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Provider to talk to (defaults to the first configured one)
    #[arg(short, long)]
    provider: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every monitor the provider knows about
    List,
    /// Create or update the monitors declared in the configuration
    Apply,
    /// Delete a monitor by name
    Delete {
        #[arg(long)]
        name: String,
    },
}

fn init_logging(log_dir: &str) {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, "uptime-sync.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref())?;
    init_logging(&config.log_dir);

    let provider = config.provider(args.provider.as_deref())?;
    let service = MonitorServiceProxy::with_cache_ttl(provider, config.cache_ttl())?;
    info!(provider = %service.provider_name(), "Monitor service ready.");

    match args.command {
        Command::List => {
            let monitors = service.get_all().await?;
            println!("{}", serde_json::to_string_pretty(&monitors)?);
        }
        Command::Apply => {
            let mut failures = 0;
            for desired in &config.monitors {
                match sync::apply(&service, desired).await {
                    Ok(action) => {
                        let (id, outcome) = match action {
                            SyncAction::Created(id) => (id, "Created."),
                            SyncAction::Updated(id) => (id, "Updated."),
                            SyncAction::Unchanged(id) => (id, "Unchanged."),
                        };
                        info!(monitor = %desired.name, id = %id, "{outcome}");
                    }
                    Err(e) => {
                        error!(
                            monitor = %desired.name,
                            error = %e,
                            "Failed to synchronize monitor."
                        );
                        failures += 1;
                    }
                }
            }
            if failures > 0 {
                return Err(format!("{failures} monitor(s) failed to synchronize").into());
            }
        }
        Command::Delete { name } => {
            if !config.enable_monitor_deletion {
                warn!(
                    monitor = %name,
                    "Monitor deletion is disabled, set enable_monitor_deletion to allow it."
                );
                return Ok(());
            }
            if !sync::delete(&service, &name).await? {
                warn!(monitor = %name, "No monitor with that name.");
            }
        }
    }

    Ok(())
}

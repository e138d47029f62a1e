use crate::components::display::LogDisplay;
use crate::components::google_calendar::GoogleCalendarClient;
use crate::components::network::{SystemClock, SystemNetwork};
use crate::components::power::{HostPower, PowerControl};
use crate::components::state_store::FileStateStore;
use crate::config::Config;
use crate::cycle::RefreshCycle;
use crate::error::Error;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and validate the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire the collaborators, run one refresh cycle and execute its power
/// directive. Does not return on success.
pub async fn run_appliance(config: Config) -> miette::Result<()> {
    let tz = config.tz()?;

    let mut network = SystemNetwork::new();
    let mut clock = SystemClock::new(tz);
    let mut store = FileStateStore::open(&config.state_path)?;
    let mut display = LogDisplay::new(config.panel_width, config.panel_height);
    let source = GoogleCalendarClient::from_config(&config);

    let cycle = RefreshCycle {
        network: &mut network,
        clock: &mut clock,
        source: &source,
        display: &mut display,
        store: &mut store,
        network_timeout: Duration::from_secs(config.network_timeout_secs),
        clock_sync_timeout: Duration::from_secs(config.clock_sync_timeout_secs),
    };

    let directive = cycle.run().await?;

    // State is already durably committed; this call never returns
    HostPower.power_down(directive)
}

//! TrustFlow Database Setup binary
//!
//! Probes the configured Supabase project for the TrustFlow schema,
//! prints manual instructions when it is missing, attempts one
//! best-effort apply through the `exec_sql` RPC, and reports the final
//! state. Setup failure is an operator message, not a process failure:
//! the binary exits zero for every outcome once configuration loads.
//!
//! ## Configuration
//!
//! Environment variables (a local `.env` file is honored):
//! - `SUPABASE_URL` - project base URL (required)
//! - `SUPABASE_SERVICE_KEY` - service-role key (required)
//! - `SETUP_PROBE_TABLE` - table used for the existence probe
//!   (default: spaces)

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use supabase::ApiSource;
use trustflow_setup::{SetupConfig, SetupError, SetupFlow};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trustflow_setup=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), SetupError> {
    dotenv().ok();
    init_tracing();

    println!("TrustFlow Database Setup");

    let config = match SetupConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration is incomplete");
            return Err(e);
        }
    };

    info!(url = %config.base_url, "Connecting to Supabase project");
    let api = ApiSource::live(&config.base_url, &config.service_key).into_api();

    let flow = SetupFlow::new(api, &config.base_url).with_probe_table(&config.probe_table);
    let report = flow.run().await;

    println!("Result: {}", report.outcome());
    Ok(())
}

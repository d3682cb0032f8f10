// ============================
// crates/backend-lib/src/telemetry.rs
// ============================
//! Tracing subscriber setup.
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Settings;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(settings: &Settings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if settings.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }

    tracing::debug!(level = %settings.log_level, json = settings.log_json, "tracing initialised");
    Ok(())
}

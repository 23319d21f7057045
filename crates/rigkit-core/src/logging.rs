//! Process-wide `tracing` subscriber setup.

use std::sync::Once;

use tracing::debug;

use crate::settings::Settings;

static INIT_LOG: Once = Once::new();

/// Install the fmt subscriber once per process at the configured level.
/// Later calls, or a subscriber installed by the embedding application,
/// leave the existing one in place.
pub fn init_logging(settings: &Settings) {
    INIT_LOG.call_once(|| {
        let installed = tracing_subscriber::fmt()
            .with_max_level(settings.level())
            .with_ansi(false)
            .try_init()
            .is_ok();
        if installed {
            debug!("Logging at {}", settings.level());
        }
    });
}

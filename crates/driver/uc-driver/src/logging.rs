//! Tracing setup

use std::env;
use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static TRACING_INIT: Once = Once::new();

/// Installs a global subscriber when `RUST_LOG` is set
///
/// Safe to call multiple times; only the first call has an effect.
/// Enable with e.g. `RUST_LOG=uc_ir_lower=debug`, or `trace` to also get the
/// IR dump of every lowered module.
pub fn init_tracing() {
    init_tracing_with(None);
}

/// Like [`init_tracing`], but `filter` takes precedence over `RUST_LOG`
pub fn init_tracing_with(filter: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let filter = match filter {
            Some(directives) => EnvFilter::new(directives),
            None if env::var_os("RUST_LOG").is_some() => EnvFilter::from_default_env(),
            None => return,
        };
        let installed = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(filter)
            .try_init();
        if installed.is_err() {
            tracing::debug!("keeping the subscriber installed by the embedding tool");
        }
    });
}

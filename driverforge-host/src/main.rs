//! # driverforge-host
//!
//! The driverforge host binary.
//!
//! Boot sequence:
//! - Load `config.toml` (created with documented defaults on first run)
//! - Construct the driver registry with every kind's fallback selected
//! - Apply persisted driver selections through the never-failing setter
//! - Scan the extensions root and load signed addon bundles in priority
//!   passes (core, then optional)
//!
//! The interactive front end attaches to the registry from here; this
//! binary owns only the boot and shutdown path. Shutdown finalizes every
//! started addon, then stops them in reverse start order.
//!
//! ## Running
//!
//! ```bash
//! # Start the host
//! cargo run --bin driverforge-host
//!
//! # With debug logging
//! RUST_LOG=debug cargo run --bin driverforge-host
//! ```

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use driverforge_addon_api::AddonLoader;
use driverforge_driver_core::DriverKind;
use driverforge_host::config::Config;
use driverforge_host::entry_types;
use driverforge_registry::DriverRegistry;

fn main() -> Result<()> {
    // Load configuration first; it carries the log level.
    let config = Config::load_default()?;

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.host.log_level.clone())),
        )
        .with_target(true)
        .init();

    info!("starting driverforge-host v{}", env!("CARGO_PKG_VERSION"));

    let registry = DriverRegistry::new();
    config.apply_driver_selections(&registry);

    let mut loader = match config.trust_anchor()? {
        Some(identity) => {
            let loader = AddonLoader::new(identity, Box::new(entry_types::builtin_linker()));
            Some(loader)
        }
        None => {
            warn!("no trust anchor configured, addon loading disabled");
            None
        }
    };

    if let (Some(loader), Some(root)) = (loader.as_mut(), config.addons_root()) {
        let report = loader.scan(&root)?;
        let started = loader.load_all(&report.accepted, &registry);
        info!(
            "addon load complete: {} started, {} rejected",
            started,
            report.rejected.len()
        );
    }

    for kind in DriverKind::ALL {
        info!("{}: {} selected", kind, registry.current(kind).name());
    }

    // The interactive shell would run here, issuing registry commands on
    // the user's behalf. Shutdown follows.

    if let Some(loader) = loader.as_mut() {
        if let Err(e) = loader.finalize_all() {
            warn!("addon finalization reported failures: {e}");
        }
        if let Err(e) = loader.stop_all(&registry) {
            warn!("addon shutdown reported failures: {e}");
        }
    }

    info!("driverforge-host shut down cleanly");
    Ok(())
}

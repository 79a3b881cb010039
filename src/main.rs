/*!
 * thpd - Main Entry Point
 *
 * Host-resident daemon that:
 * - Tracks processes matching a name pattern
 * - Measures their translation overhead and huge-page coverage
 * - Tells the kernel which priority to give each one for huge-page promotion
 */

use clap::Parser;
use std::process;
use tracing::{error, info};

use thpd::{
    daemonize, init_tracing, Cli, KernelNotifier, LinuxMetricsProvider, ProcScanner, Profiler,
};

fn main() {
    init_tracing();

    // Missing or unrecognized arguments exit non-zero here.
    let cli = Cli::parse();
    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            process::exit(2);
        }
    };

    if config.daemonize {
        if let Err(e) = daemonize() {
            error!(error = %e, "unable to daemonize");
            process::exit(1);
        }
    }

    info!(
        pattern = %config.pattern,
        family = %config.family,
        interval_secs = config.interval.as_secs(),
        "thpd starting"
    );

    let mut profiler = Profiler::new(
        ProcScanner::new(config.pattern),
        LinuxMetricsProvider::new(config.family),
        KernelNotifier::new(),
        config.interval,
    );

    // Strictly sequential by design: one task, one thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    if let Err(e) = runtime.block_on(profiler.run()) {
        error!(error = %e, "fatal error, exiting");
        process::exit(1);
    }

    info!("thpd stopped");
}

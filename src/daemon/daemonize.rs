/*!
 * Daemonization
 * Detach from the controlling terminal at startup
 */

use nix::unistd::{fork, setsid, ForkResult};

/// Fork and start a new session, leaving the child as the daemon
///
/// Must run before the async runtime is built; failure is fatal at startup
/// only.
pub fn daemonize() -> Result<(), nix::Error> {
    // SAFETY: called from the startup thread before any other thread or the
    // runtime exists.
    match unsafe { fork() }? {
        ForkResult::Parent { .. } => std::process::exit(0),
        ForkResult::Child => {}
    }
    setsid()?;
    Ok(())
}

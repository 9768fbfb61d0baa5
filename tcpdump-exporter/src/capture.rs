use std::process::Stdio;

use anyhow::Context as _;
use log::{debug, info};
use tokio::process::{Child, Command};

/// Arguments for a verbose, line-buffered capture on `interface`.
///
/// The filter expression is handed to the capture tool untouched.
pub fn tcpdump_args(interface: &str, filter: &str) -> Vec<String> {
    let mut args = vec![
        "-i".to_string(),
        interface.to_string(),
        "-v".to_string(),
        "-l".to_string(),
    ];
    if !filter.trim().is_empty() {
        args.push(filter.to_string());
    }
    args
}

/// Starts the capture tool with its stdout piped back to us.
///
/// The child is killed if the returned handle is dropped.
pub fn spawn_tcpdump(binary: &str, interface: &str, filter: &str) -> Result<Child, anyhow::Error> {
    let args = tcpdump_args(interface, filter);
    debug!("Spawning {} {}", binary, args.join(" "));

    let child = Command::new(binary)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("Failed to start `{}`", binary))?;

    info!(
        "Capturing on {} with {} (pid {:?})",
        interface,
        binary,
        child.id()
    );
    Ok(child)
}

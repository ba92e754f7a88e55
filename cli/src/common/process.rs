//! # Folio Process Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Thin wrappers around `std::process::Command` for the few places Folio hands
//! work to the host operating system:
//! - opening the booking link in the user's browser (`folio chat --open`),
//! - detecting a LAN address to print alongside the `folio srv` URLs.
//!
//! Both are best effort. Callers log failures and carry on.
//!
use crate::core::error::Result;
use anyhow::Context;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// # Open In Browser (`open_in_browser`)
///
/// Launches the platform's URL opener on `url` and returns without waiting for
/// it. Whether the page actually loads is not observed.
pub fn open_in_browser(url: &str) -> Result<()> {
    let mut command = opener_command(url);
    debug!("Opening URL with {:?}", command);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to launch a browser for {}", url))?;
    info!("Requested browser for {}", url);
    Ok(())
}

fn opener_command(url: &str) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        // The empty string is the window title `start` expects before the target.
        cmd.args(["/C", "start", "", url]);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

/// # Get Local IP Address (`get_local_ip`)
///
/// Tries common shell commands (macOS, then Linux) for a non-loopback address.
/// Falls back to `"localhost"`.
pub fn get_local_ip() -> String {
    let commands = [
        "ipconfig getifaddr en0",
        "ipconfig getifaddr en1",
        "ip addr show | grep 'inet ' | grep -v '127.0.0.1' | head -n 1 | awk '{print $2}' | cut -d/ -f1",
        "ifconfig | grep 'inet ' | grep -v '127.0.0.1' | head -n 1 | awk '{print $2}'",
    ];

    for cmd_str in commands {
        match Command::new("sh").arg("-c").arg(cmd_str).output() {
            Ok(output) if output.status.success() => {
                let ip = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !ip.is_empty() && ip != "localhost" {
                    debug!("Found local IP: {}", ip);
                    return ip;
                }
            }
            Ok(output) => debug!(
                "Command '{}' failed or returned empty: status={:?}",
                cmd_str,
                output.status.code()
            ),
            Err(e) => debug!("Error executing command '{}': {}", cmd_str, e),
        }
    }

    warn!("Could not detect local network IP, falling back to 'localhost'");
    "localhost".to_string()
}

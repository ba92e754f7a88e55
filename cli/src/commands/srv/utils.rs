//! # Folio Site Inspection
//!
//! File: cli/src/commands/srv/utils.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Startup diagnostics for `folio srv`: a look at the site directory before the
//! server binds, so a wrong path or a missing build shows up in the log instead
//! of as a wall of 404s in the browser.
//!
use std::path::Path;
use tracing::{debug, warn};

/// What was found in the site directory at startup.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SiteSummary {
    pub files: usize,
    pub directories: usize,
    pub has_index: bool,
}

/// # Inspect Site (`inspect_site`)
///
/// Counts the top-level entries of `dir` (each logged at debug level) and checks
/// for `index_file`, which is also what unknown paths fall back to. Unreadable
/// directories and entries are logged and skipped.
pub fn inspect_site(dir: &Path, index_file: &str) -> SiteSummary {
    let mut summary = SiteSummary {
        has_index: dir.join(index_file).is_file(),
        ..SiteSummary::default()
    };

    match std::fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries.filter_map(|e| e.ok()) {
                match entry.metadata() {
                    Ok(metadata) if metadata.is_dir() => {
                        summary.directories += 1;
                        debug!("  - DIR  : {}", entry.file_name().to_string_lossy());
                    }
                    Ok(_) => {
                        summary.files += 1;
                        debug!("  - FILE : {}", entry.file_name().to_string_lossy());
                    }
                    Err(e) => warn!("Could not read metadata for {}: {}", entry.path().display(), e),
                }
            }
        }
        Err(e) => warn!("Could not read directory contents for '{}': {}", dir.display(), e),
    }

    if !summary.has_index {
        warn!(
            "No '{}' in {}; the site root and unknown paths will return 404",
            index_file,
            dir.display()
        );
    }
    summary
}

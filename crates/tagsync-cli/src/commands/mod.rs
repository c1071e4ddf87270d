pub mod config;
pub mod diff;
pub mod reconcile;

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use tagsync_core::Resource;

/// Read a resource document from `path`, or from stdin when no path is given.
pub fn read_resource(path: Option<&str>) -> Result<Resource> {
    let content = match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    serde_json::from_str(&content).context("Invalid resource JSON")
}

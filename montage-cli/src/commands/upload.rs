//! Upload command handler

use anyhow::{Context, Result, bail};
use colored::*;
use montage_client::{CancellationToken, GatewayClient, UploadFile, UploadOutcome};
use std::path::Path;
use tracing::warn;

use crate::config::Config;

/// Upload a file and render the outcome
///
/// Ctrl-C stops the wait; the run then ends with a failed outcome.
pub async fn handle_upload(
    path: &Path,
    content_type: Option<String>,
    config: &Config,
) -> Result<()> {
    let owner = config.require_owner()?;
    let client = GatewayClient::new(config.client.clone())?;

    let mut file = UploadFile::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if let Some(content_type) = content_type {
        file = file.with_content_type(content_type);
    }

    println!(
        "{} {} ({}, {:.1} MB)",
        "Uploading".bold(),
        file.file_name.cyan(),
        file.content_type.dimmed(),
        file.len() as f64 / (1024.0 * 1024.0)
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping upload");
            on_interrupt.cancel();
        }
    });

    let outcome = client.uploader().upload(file, owner, Some(cancel)).await;
    print_outcome(&outcome);

    if !outcome.succeeded() {
        bail!("upload did not complete");
    }

    Ok(())
}

/// Print the terminal outcome of an upload
fn print_outcome(outcome: &UploadOutcome) {
    if outcome.succeeded() {
        println!("{}", "✓ Upload processed".green().bold());
        println!("  Key:      {}", outcome.resource_key().cyan());
        println!("  Location: {}", outcome.resource_location());
    } else {
        println!("{}", "✗ Upload failed".red().bold());
        if let Some(reason) = outcome.failure_reason() {
            println!("  Reason:   {}", reason.red());
        }
    }
}

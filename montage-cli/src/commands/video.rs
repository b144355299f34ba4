//! Video command handlers
//!
//! Handles listing processed videos, fetching playback links and deleting
//! videos.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use montage_client::GatewayClient;
use montage_core::domain::video::VideoRecord;
use uuid::Uuid;

use crate::config::Config;

/// Video subcommands
#[derive(Subcommand)]
pub enum VideoCommands {
    /// List processed videos, newest first
    List {
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print a temporary playback URL
    Url {
        /// Video ID
        id: Uuid,
    },
    /// Delete a video
    Delete {
        /// Video ID
        id: Uuid,
    },
}

/// Handle video commands
pub async fn handle_video_command(command: VideoCommands, config: &Config) -> Result<()> {
    let client = GatewayClient::new(config.client.clone())?;

    match command {
        VideoCommands::List { json } => list_videos(&client, config, json).await,
        VideoCommands::Url { id } => get_video_url(&client, id).await,
        VideoCommands::Delete { id } => delete_video(&client, id).await,
    }
}

/// List all videos of the configured owner
async fn list_videos(client: &GatewayClient, config: &Config, json: bool) -> Result<()> {
    let owner = config.require_owner()?;
    let videos = client
        .list_videos(owner)
        .await
        .context("Failed to list videos")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&videos)?);
        return Ok(());
    }

    if videos.is_empty() {
        println!("{}", "No videos found.".yellow());
    } else {
        println!("{}", format!("Found {} video(s):", videos.len()).bold());
        println!();
        for video in &videos {
            print_video_summary(video);
        }
    }

    Ok(())
}

/// Print a playback URL
async fn get_video_url(client: &GatewayClient, id: Uuid) -> Result<()> {
    let url = client
        .get_video_url(id)
        .await
        .with_context(|| format!("Failed to get URL for video {}", id))?;

    println!("{}", url.url);
    println!(
        "{}",
        format!("(expires in {} minutes)", url.expires_in / 60).dimmed()
    );

    Ok(())
}

/// Delete a video
async fn delete_video(client: &GatewayClient, id: Uuid) -> Result<()> {
    let deleted = client
        .delete_video(id)
        .await
        .with_context(|| format!("Failed to delete video {}", id))?;

    println!(
        "{} {}",
        "✓ Deleted".green(),
        deleted.video_id.to_string().cyan()
    );

    Ok(())
}

/// Print a one-entry summary of a video
fn print_video_summary(video: &VideoRecord) {
    println!("  {} {}", "●".cyan(), video.video_id.to_string().bold());
    println!("    Output:   {}", video.output_key);
    println!("    Job:      {}", video.job_id.dimmed());
    println!(
        "    Created:  {}",
        video
            .created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}

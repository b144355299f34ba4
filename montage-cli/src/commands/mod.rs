//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod upload;
mod video;

pub use video::VideoCommands;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Upload a clip and wait until it has been processed
    Upload {
        /// Path of the file to upload
        path: PathBuf,

        /// Override the detected content type
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Browse processed videos
    Videos {
        #[command(subcommand)]
        command: VideoCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Upload { path, content_type } => {
            upload::handle_upload(&path, content_type, config).await
        }
        Commands::Videos { command } => video::handle_video_command(command, config).await,
    }
}

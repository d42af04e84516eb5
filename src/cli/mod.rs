//! CLI Module
//!
//! Command-line interface for the lipsync layer generator.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lipsync Layer - generate the limited-lipsync viseme override layer
#[derive(Parser, Debug)]
#[command(name = "lipsync-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Regenerate the lipsync override layer
    #[command(name = "generate")]
    Generate {
        /// Animator controller JSON file (created if missing)
        #[arg(short, long)]
        controller: PathBuf,

        /// Asset store directory
        #[arg(short, long)]
        assets: PathBuf,

        /// Avatar descriptor JSON file
        #[arg(long)]
        avatar: PathBuf,

        /// Manifest bindings JSON file
        #[arg(short, long)]
        bindings: PathBuf,

        /// Lipsync configuration JSON file (defaults when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Remove the lipsync override layer
    #[command(name = "delete")]
    Delete {
        /// Animator controller JSON file
        #[arg(short, long)]
        controller: PathBuf,
    },

    /// Print the layers, states and transitions of a controller
    #[command(name = "inspect")]
    Inspect {
        /// Animator controller JSON file
        controller: PathBuf,
    },

    /// Write a default lipsync configuration
    #[command(name = "init-config")]
    InitConfig {
        /// Destination path
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check generated assets against their recorded checksums
    #[command(name = "verify")]
    Verify {
        /// Asset store directory
        assets: PathBuf,
    },
}

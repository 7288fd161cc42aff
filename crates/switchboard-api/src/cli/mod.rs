//! CLI command definitions for the `swb` binary.
//!
//! Uses clap derive macros. Every command except `completions` builds the
//! same [`AppState`](crate::state::AppState) the server uses, so a one-shot
//! `generate` goes through the exact dispatch path an HTTP request would.

pub mod generate;
pub mod providers;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use switchboard_types::capability::Capability;

/// Route AI generation requests across providers with quotas and fallback.
#[derive(Parser)]
#[command(name = "swb", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to $SWITCHBOARD_CONFIG, then ./switchboard.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Export spans through OpenTelemetry to stdout.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay and REST API server.
    Serve {
        /// Port to listen on (overrides the config file).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides the config file).
        #[arg(long)]
        host: Option<String>,
    },

    /// Dispatch one generation request.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Ask the assistant a question on the script capability.
    Chat {
        message: String,

        /// Replace the default assistant system prompt.
        #[arg(long)]
        system: Option<String>,
    },

    /// Write a four-scene ad script from a campaign brief.
    Script(ScriptArgs),

    /// Show the provider table for every capability.
    #[command(alias = "ls")]
    Providers,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// script, image, voice or music.
    pub capability: Capability,

    pub prompt: String,

    /// System prompt for script requests.
    #[arg(long)]
    pub system: Option<String>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Fixed image seed; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub temperature: Option<f64>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Voice name for voice requests.
    #[arg(long)]
    pub voice: Option<String>,

    /// Track length in seconds for music requests.
    #[arg(long)]
    pub duration: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ScriptArgs {
    #[arg(long)]
    pub product: String,

    #[arg(long)]
    pub audience: String,

    #[arg(long, default_value = "uplifting")]
    pub mood: String,

    #[arg(long, default_value = "Instagram Reels")]
    pub platform: String,

    #[arg(long)]
    pub emotional_core: Option<String>,

    #[arg(long)]
    pub human_truth: Option<String>,

    #[arg(long)]
    pub pain_point: Option<String>,

    /// Who actually pays, when that differs from the user.
    #[arg(long)]
    pub real_purchaser: Option<String>,
}

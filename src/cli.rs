use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

use crate::core::Engine;

#[derive(Parser)]
#[command(name = "eventflow")]
#[command(about = "Static event-flow analysis for publish/subscribe codebases")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Target file (defaults to Eventflow.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Analyze a semantic model and emit the event-flow diagram
    Analyze {
        /// Semantic model snapshot produced by an external indexer
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Output file for the diagram
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (mermaid, lines)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// List discovered event types and their resolved identities
    Events {
        /// Semantic model snapshot produced by an external indexer
        #[arg(short, long)]
        model: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Init { path } => {
                engine.init(path).await
            }
            Commands::Analyze { model, output, format } => {
                engine.analyze(model, output, format).await
            }
            Commands::Events { model } => {
                engine.events(model).await
            }
        }
    }
}

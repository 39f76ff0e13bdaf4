use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{EventflowError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Event-flow analysis settings
    pub analysis: AnalysisConfig,

    /// Output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Semantic model snapshot produced by an external indexer
    pub model: PathBuf,

    /// Diagram output file
    pub output: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Fully qualified name of the event bus interface
    pub bus_interface: String,

    /// Name of the bus member that publishes events
    pub publish_member: String,

    /// Name of the bus member that registers handlers
    pub subscribe_member: String,

    /// Marker interface implemented by every event type
    pub event_marker: String,

    /// Constant field that declares an event type's identity
    pub identity_field: String,

    /// Label substring identifying bootstrap/wiring code
    pub bootstrap_marker: String,

    /// Maximum caller-chain depth walked above a leaf
    pub max_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format (mermaid, lines)
    pub format: String,

    /// Include a generated-at metadata header
    pub include_metadata: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig {
                name: "Unnamed Project".to_string(),
                model: PathBuf::from("model.json"),
                output: PathBuf::from("eventflow.mmd"),
            },
            analysis: AnalysisConfig {
                bus_interface: "IEventBus".to_string(),
                publish_member: "Publish".to_string(),
                subscribe_member: "Subscribe".to_string(),
                event_marker: "IEvent".to_string(),
                identity_field: "Name".to_string(),
                bootstrap_marker: "Startup".to_string(),
                max_depth: 64,
            },
            output: OutputConfig {
                format: "mermaid".to_string(),
                include_metadata: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| EventflowError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| EventflowError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                // Try common config file locations
                let candidates = [
                    "Eventflow.toml",
                    "eventflow.toml",
                    ".eventflow.toml",
                ];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }
}

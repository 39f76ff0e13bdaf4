// src/core/engine.rs
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::EventflowError;
use super::flow::{CallGraphBuilder, EventCatalog, EventFlowLinker, FlowRegistry, IdentityResolver};
use super::graph::Graph;
use super::renderer::Renderer;
use super::semantic::{JsonSemanticSource, SemanticSource, SymbolRef};

/// Main orchestration engine for Eventflow
pub struct Engine {
    config: Config,
}

impl Engine {
    /// Create a new engine instance
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;

        debug!("Loaded configuration: {:?}", config);

        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Write a starter configuration file
    pub async fn init(&self, path: Option<PathBuf>) -> Result<()> {
        let target = path.unwrap_or_else(|| PathBuf::from("Eventflow.toml"));
        if target.exists() {
            return Err(
                EventflowError::Config(format!("{} already exists", target.display())).into(),
            );
        }

        self.config.save(&target)?;
        info!("Configuration written to {}", target.display());
        Ok(())
    }

    /// Run one analysis over a semantic model snapshot and write the diagram
    pub async fn analyze(
        &self,
        model: Option<PathBuf>,
        output: Option<PathBuf>,
        format: Option<String>,
    ) -> Result<()> {
        let model_path = model.unwrap_or_else(|| self.config.project.model.clone());
        let output_path = output.unwrap_or_else(|| self.config.project.output.clone());
        let format = format.unwrap_or_else(|| self.config.output.format.clone());

        info!("Analyzing semantic model {}", model_path.display());
        let source = JsonSemanticSource::load(&model_path)?;

        let lines = self.run_analysis(&source).await?;
        info!("Rendered {} diagram edges", lines.len());

        let document = self.format_document(&lines, &format);
        std::fs::write(&output_path, document).map_err(EventflowError::Io)?;
        info!("Event-flow diagram written to {}", output_path.display());

        Ok(())
    }

    /// Build, resolve, link and render the event-flow graph
    pub async fn run_analysis(&self, source: &dyn SemanticSource) -> Result<Vec<String>> {
        let analysis = &self.config.analysis;

        info!(
            "Discovering event types implementing {}",
            analysis.event_marker
        );
        let catalog = EventCatalog::discover(source, &analysis.event_marker).await;
        info!("Catalog holds {} event types", catalog.len());

        let resolver = IdentityResolver::new(source, &analysis.identity_field)?;
        let builder = CallGraphBuilder::new(source, &resolver, &catalog, analysis.max_depth);

        let mut graph = Graph::new();
        let mut registry = FlowRegistry::new();

        // producer family: one caller chain per publish call site
        let publish = SymbolRef::new(&analysis.bus_interface, &analysis.publish_member);
        let publish_sites = source.find_callers(&publish).await;
        info!("Found {} publish call sites", publish_sites.len());
        for site in &publish_sites {
            let identity = resolver.resolve_call_site(site).await;
            debug!(
                "Publish site in {} resolves to identity {:?}",
                site.caller.display, identity
            );
            let label = IdentityResolver::leaf_label(
                &analysis.bus_interface,
                &analysis.publish_member,
                &identity,
            );
            let leaf = builder
                .build_from_leaf(&mut graph, &label, site, &mut registry)
                .await;
            registry.record_producer(&identity, leaf);
        }

        // consumer family: one caller chain per subscribe call site
        let subscribe = SymbolRef::new(&analysis.bus_interface, &analysis.subscribe_member);
        let subscribe_sites = source.find_callers(&subscribe).await;
        info!("Found {} subscribe call sites", subscribe_sites.len());
        for site in &subscribe_sites {
            let identity = resolver.resolve_call_site(site).await;
            debug!(
                "Subscribe site in {} resolves to identity {:?}",
                site.caller.display, identity
            );
            let label = IdentityResolver::leaf_label(
                &analysis.bus_interface,
                &analysis.subscribe_member,
                &identity,
            );
            let leaf = builder
                .build_from_leaf(&mut graph, &label, site, &mut registry)
                .await;
            registry.record_consumer(&identity, leaf);
        }

        debug!(
            "Producer identities: {:?}; consumer identities: {:?}",
            registry.producer_identities().collect::<Vec<_>>(),
            registry.consumer_identities().collect::<Vec<_>>()
        );
        let linked = EventFlowLinker::link(&mut graph, &registry);
        info!(
            "Graph complete: {} nodes, {} cross-links",
            graph.len(),
            linked
        );

        let renderer = Renderer::new(analysis.bootstrap_marker.as_str());
        Ok(renderer.render(&graph))
    }

    /// List the event types known to the catalog with their identities
    pub async fn events(&self, model: Option<PathBuf>) -> Result<()> {
        let model_path = model.unwrap_or_else(|| self.config.project.model.clone());
        let analysis = &self.config.analysis;

        let source = JsonSemanticSource::load(&model_path)?;
        let catalog = EventCatalog::discover(&source, &analysis.event_marker).await;

        if catalog.is_empty() {
            println!("No event types implement {}", analysis.event_marker);
            return Ok(());
        }

        let resolver = IdentityResolver::new(&source, &analysis.identity_field)?;
        println!("Event types implementing {}:", analysis.event_marker);
        for ty in catalog.iter() {
            let identity = resolver.resolve_type(ty).await;
            if identity.is_empty() {
                println!("  {} (identity unresolved)", ty.name);
            } else {
                println!("  {} -> {}", ty.name, identity);
            }
        }

        Ok(())
    }

    /// Wrap rendered edge lines into the requested output document
    fn format_document(&self, lines: &[String], format: &str) -> String {
        let mut content = String::new();

        if self.config.output.include_metadata {
            content.push_str(&format!(
                "%% Generated by eventflow at {}\n",
                chrono::Utc::now().to_rfc3339()
            ));
        }

        match format {
            "mermaid" => {
                content.push_str("flowchart TD\n");
                for line in lines {
                    content.push_str("    ");
                    content.push_str(line);
                    content.push('\n');
                }
            }
            _ => {
                for line in lines {
                    content.push_str(line);
                    content.push('\n');
                }
            }
        }

        content
    }
}

// src/core/renderer.rs - Edge-line diagram emission
use std::collections::HashSet;

use crate::core::graph::{Graph, Node, NodeId};

/// Label characters that must not reach the diagram unescaped, with their
/// replacements. Applied in this fixed order as literal substring replaces.
const LABEL_ESCAPES: [(&str, &str); 5] = [
    ("(", "#40;"),
    (")", "#41;"),
    (".", "#46;"),
    ("<", "#60;"),
    (">", "#62;"),
];

/// Serializes a caller graph as `id["label"] --> id["label"]` edge lines.
///
/// Traversal is root-first and depth-first with children in label order, so
/// output is deterministic regardless of discovery order. Nodes whose label
/// contains the bootstrap marker keep their subtrees reachable but emit no
/// edges of their own, which keeps subscription wiring out of the diagram.
pub struct Renderer {
    bootstrap_marker: String,
}

impl Renderer {
    pub fn new(bootstrap_marker: impl Into<String>) -> Self {
        Self {
            bootstrap_marker: bootstrap_marker.into(),
        }
    }

    pub fn render(&self, graph: &Graph) -> Vec<String> {
        let mut lines = Vec::new();
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut stack: Vec<NodeId> = graph.roots().into_iter().rev().collect();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }

            let node = graph.node(id);
            let children = graph.children_by_label(id);

            let suppressed =
                !self.bootstrap_marker.is_empty() && node.name.contains(&self.bootstrap_marker);
            if !suppressed {
                for &child in &children {
                    lines.push(format!(
                        "{} --> {}",
                        Self::node_ref(node),
                        Self::node_ref(graph.node(child))
                    ));
                }
            }

            for &child in children.iter().rev() {
                stack.push(child);
            }
        }

        lines
    }

    fn node_ref(node: &Node) -> String {
        format!("{}[\"{}\"]", node.id, Self::escape(&node.name))
    }

    /// Replace the reserved label characters with their escape sequences.
    pub fn escape(label: &str) -> String {
        LABEL_ESCAPES
            .iter()
            .fold(label.to_string(), |acc, (from, to)| acc.replace(from, to))
    }
}

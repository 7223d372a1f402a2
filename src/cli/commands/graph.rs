//! Graph command handler

use curriculum_graph::config::Config;
use curriculum_graph::core::graph::{load_exclusions, load_graph};
use curriculum_graph::core::render::{write_artifact, MermaidGenerator};
use curriculum_graph::{debug, error};
use std::path::Path;

/// Write the dependency graph, with exclusions, as a Mermaid diagram.
pub fn run(output: Option<&Path>, config: &Config) -> bool {
    let Some(store) = super::open_dataset(config) else {
        return false;
    };

    let graph = match load_graph(&store) {
        Ok(graph) => graph,
        Err(e) => {
            error!("Failed to build graph from {}: {e}", store.path().display());
            eprintln!("✗ Failed to build graph: {e}");
            return false;
        }
    };
    let exclusions = load_exclusions(&store);
    debug!("{graph}");

    let path = super::output_path(output, config, "graph.md");
    let diagram = MermaidGenerator::generate_graph(&graph, &exclusions);
    if let Err(e) = write_artifact(&path, &diagram) {
        eprintln!("✗ Failed to write {}: {e}", path.display());
        return false;
    }

    println!(
        "✓ Graph with {} courses and {} edges written: {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    true
}

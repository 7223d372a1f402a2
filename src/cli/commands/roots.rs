//! Roots command handler
//!
//! Computes the root layout of the configured dataset and writes it as the
//! JSON payload for an image renderer, or as Mermaid text.

use curriculum_graph::config::Config;
use curriculum_graph::core::graph::load_graph;
use curriculum_graph::core::layout::{layout_roots, LayoutOptions, PrerequisiteIndex, RootLayout};
use curriculum_graph::core::render::{to_json, write_artifact, MermaidGenerator, RenderFormat};
use curriculum_graph::core::store::{CourseRepository, JsonStore};
use curriculum_graph::core::CurriculumError;
use curriculum_graph::{error, info, verbose};
use std::path::Path;

/// Run the roots command.
///
/// # Arguments
/// * `output` - Optional output path (defaults to `roots.<ext>` in the output directory)
/// * `mermaid` - Write Mermaid text instead of JSON
/// * `max_per_row` - Row width override
/// * `truncate` - Title length override
/// * `config` - Configuration with dataset, output directory and layout defaults
pub fn run(
    output: Option<&Path>,
    mermaid: bool,
    max_per_row: Option<usize>,
    truncate: Option<usize>,
    config: &Config,
) -> bool {
    let Some(store) = super::open_dataset(config) else {
        return false;
    };

    let options = resolve_options(config, max_per_row, truncate);

    let format = if mermaid {
        RenderFormat::Mermaid
    } else {
        RenderFormat::Json
    };
    let path = super::output_path(output, config, &format!("roots.{}", format.extension()));

    match compute_layout(&store, &options).and_then(|layout| {
        let contents = render(&layout, format)?;
        write_artifact(&path, &contents)?;
        Ok(layout)
    }) {
        Ok(layout) => {
            verbose!("Roots: {}", layout.roots().collect::<Vec<_>>().join(", "));
            info!("Root layout written to {}", path.display());
            println!("✓ {}", layout.caption);
            println!("✓ Layout written: {}", path.display());
            true
        }
        Err(e) => {
            error!("Root layout failed for {}: {e}", store.path().display());
            eprintln!("✗ Failed to lay out roots: {e}");
            false
        }
    }
}

/// Configured layout with CLI overrides applied. A zero override keeps the
/// configured value.
fn resolve_options(config: &Config, max_per_row: Option<usize>, truncate: Option<usize>) -> LayoutOptions {
    let mut options = config.layout_options();
    if let Some(n) = max_per_row.filter(|&n| n > 0) {
        options.max_per_row = n;
    }
    if let Some(n) = truncate.filter(|&n| n > 0) {
        options.truncate_title = n;
    }
    options
}

fn compute_layout(store: &JsonStore, options: &LayoutOptions) -> Result<RootLayout, CurriculumError> {
    let graph = load_graph(store)?;
    let raw = PrerequisiteIndex::from_edges(&store.prerequisites()?);
    Ok(layout_roots(&graph, &raw, options))
}

fn render(layout: &RootLayout, format: RenderFormat) -> Result<String, CurriculumError> {
    match format {
        RenderFormat::Json => to_json(layout),
        RenderFormat::Mermaid => Ok(MermaidGenerator::generate_roots(layout)),
    }
}

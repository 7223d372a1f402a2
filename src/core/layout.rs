//! Grid layout for root courses
//!
//! A root is a node with no incoming and no outgoing edge in the pruned
//! dependency graph. Roots are laid out on a deterministic grid in the unit
//! square so the result does not depend on any renderer's layout heuristics.
//!
//! Labels take prerequisite codes from the raw prerequisite index, not from
//! the graph: a root whose only prerequisites are external still shows them.

use super::graph::DependencyGraph;
use super::models::PrerequisiteEdge;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Prerequisite codes listed in a label before collapsing into `(+K)`.
pub const MAX_LISTED_PREREQS: usize = 5;

/// Course code -> every recorded prerequisite code, from the unpruned edge list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrerequisiteIndex(BTreeMap<String, BTreeSet<String>>);

impl PrerequisiteIndex {
    /// Index raw prerequisite edges by the course that owns them
    #[must_use]
    pub fn from_edges(edges: &[PrerequisiteEdge]) -> Self {
        let mut index: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for edge in edges {
            index
                .entry(edge.course_code.clone())
                .or_default()
                .insert(edge.prereq_code.clone());
        }
        Self(index)
    }

    /// Recorded prerequisites of `code`, sorted
    #[must_use]
    pub fn prerequisites(&self, code: &str) -> Vec<&str> {
        self.0
            .get(code)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Maximum nodes per row (0 is treated as 1)
    pub max_per_row: usize,
    /// Maximum title length in characters, including the ellipsis
    pub truncate_title: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_per_row: 8,
            truncate_title: 40,
        }
    }
}

/// Normalized position in `[0, 1]²`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

/// Attributes a renderer needs besides position and label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootNode {
    /// Course title (untruncated)
    pub title: String,
    /// Offering unit, for grouping colors
    pub offering_unit: String,
    /// Credit units
    pub credit_units: f32,
}

/// Payload handed to the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootLayout {
    /// Caption for the drawing
    pub caption: String,
    /// Number of grid rows
    pub rows: usize,
    /// Root code -> grid position
    pub positions: BTreeMap<String, Position>,
    /// Root code -> three-line label
    pub labels: BTreeMap<String, String>,
    /// Root code -> node attributes
    pub nodes: BTreeMap<String, RootNode>,
}

impl RootLayout {
    /// Root codes in sorted order
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.positions.keys().map(String::as_str)
    }

    /// Number of roots
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the graph has no roots
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Nodes with neither prerequisites nor dependents in `graph`, sorted.
#[must_use]
pub fn find_roots(graph: &DependencyGraph) -> Vec<&str> {
    graph
        .nodes()
        .filter(|code| graph.in_degree(code) == 0 && graph.out_degree(code) == 0)
        .collect()
}

/// Lay out the roots of `pruned_graph` and label them.
///
/// # Arguments
/// * `pruned_graph` - Graph used for root detection (dangling edges already dropped)
/// * `raw_prerequisites` - Unpruned prerequisite index used for label text
/// * `options` - Row width and title truncation
#[must_use]
pub fn layout_roots(
    pruned_graph: &DependencyGraph,
    raw_prerequisites: &PrerequisiteIndex,
    options: &LayoutOptions,
) -> RootLayout {
    let roots = find_roots(pruned_graph);
    let rows: Vec<&[&str]> = roots.chunks(options.max_per_row.max(1)).collect();
    let total_rows = rows.len();

    let mut positions = BTreeMap::new();
    for (row_index, row) in rows.iter().enumerate() {
        let y = axis_position(row_index, total_rows, 0.0, 1.0);
        for (index, code) in row.iter().enumerate() {
            let x = axis_position(index, row.len(), 0.05, 0.9);
            positions.insert((*code).to_string(), Position { x, y });
        }
    }

    let mut labels = BTreeMap::new();
    let mut nodes = BTreeMap::new();
    for code in &roots {
        let Some(meta) = pruned_graph.node(code) else {
            continue;
        };
        let prereqs = raw_prerequisites.prerequisites(code);
        labels.insert(
            (*code).to_string(),
            format!(
                "{code}\n{}\n{}",
                truncate(&meta.title, options.truncate_title),
                prerequisite_line(&prereqs)
            ),
        );
        nodes.insert(
            (*code).to_string(),
            RootNode {
                title: meta.title.clone(),
                offering_unit: meta.offering_unit.clone(),
                credit_units: meta.credit_units,
            },
        );
    }

    crate::debug!("Laid out {} roots in {total_rows} rows", roots.len());

    RootLayout {
        caption: format!(
            "Courses With No Prereqs And No Dependents (Count={})",
            roots.len()
        ),
        rows: total_rows,
        positions,
        labels,
        nodes,
    }
}

/// `offset + span * index / (count - 1)`, or the midpoint for a single slot.
#[allow(clippy::cast_precision_loss)]
fn axis_position(index: usize, count: usize, offset: f64, span: f64) -> f64 {
    if count <= 1 {
        0.5
    } else {
        offset + span * (index as f64 / (count - 1) as f64)
    }
}

/// Trim and cut `title` to at most `limit` characters, ending in `…` when cut.
fn truncate(title: &str, limit: usize) -> String {
    let title = title.trim();
    if title.chars().count() <= limit {
        return title.to_string();
    }
    let mut short: String = title.chars().take(limit.saturating_sub(1)).collect();
    short.push('…');
    short
}

fn prerequisite_line(prereqs: &[&str]) -> String {
    if prereqs.is_empty() {
        return "Prereq: None".to_string();
    }
    let shown = prereqs[..prereqs.len().min(MAX_LISTED_PREREQS)].join(", ");
    if prereqs.len() > MAX_LISTED_PREREQS {
        format!("Prereq: {shown} (+{})", prereqs.len() - MAX_LISTED_PREREQS)
    } else {
        format!("Prereq: {shown}")
    }
}

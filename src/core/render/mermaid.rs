//! Mermaid diagram generator for dependency graphs and root grids
//!
//! Generates Mermaid flowchart syntax that can be embedded in Markdown files
//! and rendered by GitHub, GitLab, and other Markdown viewers.

use crate::core::graph::{DependencyGraph, ExclusionMap};
use crate::core::layout::RootLayout;
use std::fmt::Write;

/// Generator for Mermaid diagram syntax
pub struct MermaidGenerator;

impl MermaidGenerator {
    /// Generate a left-to-right flowchart of the dependency graph.
    ///
    /// Prerequisite edges are solid arrows; exclusions between two nodes of the
    /// graph are dashed, unlabeled-direction links.
    #[must_use]
    pub fn generate_graph(graph: &DependencyGraph, exclusions: &ExclusionMap) -> String {
        let mut output = String::from("```mermaid\nflowchart LR\n");

        for code in graph.nodes() {
            let title = graph.node(code).map_or("", |m| m.title.as_str());
            let _ = writeln!(
                output,
                "    {}[\"{code}<br/>{}\"]",
                Self::sanitize_id(code),
                Self::escape(&Self::shorten(title, 20))
            );
        }

        output.push('\n');

        for (prereq, course) in graph.edges() {
            let _ = writeln!(
                output,
                "    {} --> {}",
                Self::sanitize_id(prereq),
                Self::sanitize_id(course)
            );
        }

        for (course, excluded) in exclusions {
            if !graph.contains(course) {
                continue;
            }
            for other in excluded {
                // Draw each mutual exclusion once
                let mirrored = exclusions
                    .get(other)
                    .is_some_and(|back| back.contains(course));
                if !graph.contains(other) || (mirrored && other < course) {
                    continue;
                }
                let _ = writeln!(
                    output,
                    "    {} -.- {}",
                    Self::sanitize_id(course),
                    Self::sanitize_id(other)
                );
            }
        }

        output.push_str("```\n");
        output
    }

    /// Generate a grid of root courses, one subgraph per layout row.
    #[must_use]
    pub fn generate_roots(layout: &RootLayout) -> String {
        let mut output = String::from("```mermaid\nflowchart LR\n");
        let _ = writeln!(output, "    %% {}", layout.caption);

        let mut rows: Vec<Vec<&str>> = Vec::new();
        let mut current_y: Option<f64> = None;
        let mut ordered: Vec<(&str, f64, f64)> = layout
            .positions
            .iter()
            .map(|(code, p)| (code.as_str(), p.y, p.x))
            .collect();
        ordered.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.total_cmp(&b.2)));
        for (code, y, _) in ordered {
            if current_y.is_none_or(|cy| (cy - y).abs() > f64::EPSILON) {
                rows.push(Vec::new());
                current_y = Some(y);
            }
            if let Some(row) = rows.last_mut() {
                row.push(code);
            }
        }

        for (index, row) in rows.iter().enumerate() {
            let _ = writeln!(output, "    subgraph row{}[\" \"]", index + 1);
            for code in row {
                let label = layout
                    .labels
                    .get(*code)
                    .map_or_else(|| (*code).to_string(), |l| Self::escape(l).replace('\n', "<br/>"));
                let _ = writeln!(output, "        {}[\"{label}\"]", Self::sanitize_id(code));
            }
            output.push_str("    end\n");
        }

        output.push_str("```\n");
        output
    }

    /// Cut long titles for node labels
    fn shorten(title: &str, limit: usize) -> String {
        if title.chars().count() > limit {
            let head: String = title.chars().take(limit.saturating_sub(3)).collect();
            format!("{head}...")
        } else {
            title.to_string()
        }
    }

    /// Mermaid labels are double-quoted; swap quotes for the HTML entity
    fn escape(text: &str) -> String {
        text.replace('"', "#quot;")
    }

    /// Sanitize a course code for use as a Mermaid node ID
    fn sanitize_id(key: &str) -> String {
        key.chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect()
    }
}

//! Dependency graph of course codes, plus the exclusion mapping
//!
//! Edges point from requirement to requirer (`prereq_code -> course_code`).
//! Only edges whose endpoints are both course nodes are kept: an edge to a
//! code with no course record is dropped here without complaint. This is a
//! presentation simplification; external prerequisites are reported by the
//! external analysis, not by the graph.

use super::error::Result;
use super::models::{Course, ExclusionEdge, PrerequisiteEdge};
use super::store::CourseRepository;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Attributes carried by each course node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeMeta {
    /// Course title
    pub title: String,
    /// Offering unit
    pub offering_unit: String,
    /// Credit units
    pub credit_units: f32,
}

impl From<&Course> for NodeMeta {
    fn from(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            offering_unit: course.offering_unit.clone(),
            credit_units: course.credit_units,
        }
    }
}

/// Course code -> codes it excludes.
pub type ExclusionMap = BTreeMap<String, BTreeSet<String>>;

/// Directed prerequisite graph.
///
/// Two adjacency maps give traversal in both directions:
/// - `dependencies`: course -> its prerequisites (incoming edges)
/// - `dependents`: prerequisite -> courses requiring it (outgoing edges)
///
/// Sorted maps keep iteration stable, but callers that present results
/// should still sort explicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, NodeMeta>,
    dependencies: BTreeMap<String, BTreeSet<String>>,
    dependents: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace the attributes of) a course node
    pub fn add_node(&mut self, code: &str, meta: NodeMeta) {
        self.nodes.insert(code.to_string(), meta);
        self.dependencies.entry(code.to_string()).or_default();
        self.dependents.entry(code.to_string()).or_default();
    }

    /// Add the edge `prereq_code -> course_code`.
    ///
    /// Returns `false` and leaves the graph unchanged when either endpoint is
    /// not a node. Repeated edges collapse into one.
    pub fn add_edge(&mut self, prereq_code: &str, course_code: &str) -> bool {
        if !self.contains(prereq_code) || !self.contains(course_code) {
            return false;
        }
        if let Some(prereqs) = self.dependencies.get_mut(course_code) {
            prereqs.insert(prereq_code.to_string());
        }
        if let Some(requirers) = self.dependents.get_mut(prereq_code) {
            requirers.insert(course_code.to_string());
        }
        true
    }

    /// Whether `code` is a node
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.nodes.contains_key(code)
    }

    /// Attributes of a node
    #[must_use]
    pub fn node(&self, code: &str) -> Option<&NodeMeta> {
        self.nodes.get(code)
    }

    /// Node codes in sorted order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Edges as `(prereq_code, course_code)` pairs, sorted by prerequisite then course
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.dependents.iter().flat_map(|(prereq, requirers)| {
            requirers
                .iter()
                .map(move |course| (prereq.as_str(), course.as_str()))
        })
    }

    /// Prerequisites of `code` that are nodes
    #[must_use]
    pub fn prerequisites(&self, code: &str) -> Option<&BTreeSet<String>> {
        self.dependencies.get(code)
    }

    /// Courses requiring `code`
    #[must_use]
    pub fn dependents(&self, code: &str) -> Option<&BTreeSet<String>> {
        self.dependents.get(code)
    }

    /// Number of incoming edges (prerequisites)
    #[must_use]
    pub fn in_degree(&self, code: &str) -> usize {
        self.dependencies.get(code).map_or(0, BTreeSet::len)
    }

    /// Number of outgoing edges (dependents)
    #[must_use]
    pub fn out_degree(&self, code: &str) -> usize {
        self.dependents.get(code).map_or(0, BTreeSet::len)
    }

    /// Number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.dependents.values().map(BTreeSet::len).sum()
    }
}

impl std::fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Dependency graph ({} courses, {} edges):",
            self.node_count(),
            self.edge_count()
        )?;
        writeln!(f)?;

        for (code, prereqs) in &self.dependencies {
            if prereqs.is_empty() {
                writeln!(f, "  {code} ← (no prerequisites)")?;
            } else {
                let joined: Vec<&str> = prereqs.iter().map(String::as_str).collect();
                writeln!(f, "  {code} ← {}", joined.join(", "))?;
            }
        }

        Ok(())
    }
}

/// Build the prerequisite graph from course rows and raw edges.
///
/// Every course becomes a node; an edge is kept only when both endpoints are nodes.
#[must_use]
pub fn build_graph(courses: &[Course], edges: &[PrerequisiteEdge]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for course in courses {
        graph.add_node(&course.code, NodeMeta::from(course));
    }

    let dropped = edges
        .iter()
        .filter(|e| !graph.add_edge(&e.prereq_code, &e.course_code))
        .count();
    if dropped > 0 {
        crate::debug!("Graph builder dropped {dropped} edges with an endpoint outside the course list");
    }

    graph
}

/// Build the graph from a repository.
///
/// # Errors
/// Returns an error if the storage cannot be read.
pub fn load_graph<R: CourseRepository>(repo: &R) -> Result<DependencyGraph> {
    Ok(build_graph(&repo.courses()?, &repo.prerequisites()?))
}

/// Build the exclusion mapping, skipping rows with a blank endpoint.
#[must_use]
pub fn build_exclusion_map(exclusions: &[ExclusionEdge]) -> ExclusionMap {
    let mut mapping = ExclusionMap::new();
    for exclusion in exclusions {
        if exclusion.course_code.is_empty() || exclusion.excluded_code.is_empty() {
            continue;
        }
        mapping
            .entry(exclusion.course_code.clone())
            .or_default()
            .insert(exclusion.excluded_code.clone());
    }
    mapping
}

/// Load the exclusion mapping from a repository.
///
/// Exclusions are auxiliary data: an unreadable table yields an empty mapping
/// and a warning instead of an error.
#[must_use]
pub fn load_exclusions<R: CourseRepository>(repo: &R) -> ExclusionMap {
    match repo.exclusions() {
        Ok(rows) => build_exclusion_map(&rows),
        Err(e) => {
            crate::warn!("Exclusions unavailable from {}: {e}", repo.location());
            ExclusionMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(code: &str) -> Course {
        Course::new(code, &format!("Title {code}"), "U", 3.0)
    }

    #[test]
    fn test_edges_point_from_prerequisite_to_course() {
        let graph = build_graph(
            &[course("A1000"), course("B2000")],
            &[PrerequisiteEdge::new("B2000", "A1000")],
        );

        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![("A1000", "B2000")]);
        assert_eq!(graph.out_degree("A1000"), 1);
        assert_eq!(graph.in_degree("B2000"), 1);
        assert_eq!(graph.in_degree("A1000"), 0);
    }

    #[test]
    fn test_edges_to_external_codes_are_dropped() {
        let graph = build_graph(
            &[course("A1000"), course("C3000")],
            &[
                PrerequisiteEdge::new("C3000", "A1000"),
                PrerequisiteEdge::new("C3000", "X9999"),
                PrerequisiteEdge::new("Z0001", "A1000"),
            ],
        );

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(!graph.contains("X9999"));
    }

    #[test]
    fn test_node_metadata() {
        let graph = build_graph(&[Course::new("CS1102", "Intro", "CS", 3.0)], &[]);
        let meta = graph.node("CS1102").unwrap();
        assert_eq!(meta.title, "Intro");
        assert_eq!(meta.offering_unit, "CS");
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let courses = [course("A1000"), course("B2000"), course("C3000")];
        let edges = [
            PrerequisiteEdge::new("B2000", "A1000"),
            PrerequisiteEdge::new("C3000", "B2000"),
            PrerequisiteEdge::new("C3000", "B2000"),
        ];
        let mut reversed_courses = courses.clone();
        reversed_courses.reverse();
        let mut reversed_edges = edges.clone();
        reversed_edges.reverse();

        let forward = build_graph(&courses, &edges);
        let backward = build_graph(&reversed_courses, &reversed_edges);
        assert_eq!(forward, backward);
        assert_eq!(forward.edge_count(), 2);
    }

    #[test]
    fn test_exclusion_map_skips_blank_rows() {
        let mapping = build_exclusion_map(&[
            ExclusionEdge::new("A1000", "B2000"),
            ExclusionEdge::new("A1000", "C3000"),
            ExclusionEdge::new("B2000", "A1000"),
            ExclusionEdge::new("", "C3000"),
            ExclusionEdge::new("C3000", "  "),
        ]);

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping["A1000"].len(), 2);
        assert!(mapping["B2000"].contains("A1000"));
    }

    #[test]
    fn test_display_lists_prerequisites() {
        let graph = build_graph(
            &[course("A1000"), course("B2000")],
            &[PrerequisiteEdge::new("B2000", "A1000")],
        );
        let text = graph.to_string();
        assert!(text.contains("B2000 ← A1000"));
        assert!(text.contains("A1000 ← (no prerequisites)"));
    }
}

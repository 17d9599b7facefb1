//! Prerequisite graph. A static, single-hop map from a target course to the
//! courses that must be completed first.
//!
//! Loaded once at startup from TOML (embedded default or a file on disk) and
//! shared read-only through `AppState`.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::transcript::models::normalize_course_code;

/// Table shipped with the binary. Used when no override path is configured.
pub const DEFAULT_PREREQUISITES: &str = include_str!("../../data/prerequisites.toml");

static NO_PREREQUISITES: BTreeSet<String> = BTreeSet::new();

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read prerequisite table: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed prerequisite table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("'{0}' is not a valid course code")]
    InvalidCode(String),

    #[error("course {0} is declared more than once")]
    DuplicateTarget(String),

    #[error("course {0} lists itself as a prerequisite")]
    SelfPrerequisite(String),
}

#[derive(Debug, Deserialize)]
struct GraphFile {
    #[serde(default)]
    course: Vec<EdgeFile>,
}

#[derive(Debug, Deserialize)]
struct EdgeFile {
    code: String,
    #[serde(default)]
    prerequisites: Vec<String>,
}

/// One target course and its direct prerequisites.
#[derive(Debug, Clone, PartialEq)]
pub struct PrerequisiteEdge {
    pub target: String,
    pub prerequisites: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PrerequisiteGraph {
    /// Declaration order.
    edges: Vec<PrerequisiteEdge>,
    index: HashMap<String, usize>,
}

impl PrerequisiteGraph {
    /// Builds a graph from `(target, prerequisites)` pairs, normalizing every code.
    pub fn from_edges<I, P, S>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (S, P)>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut graph = PrerequisiteGraph::default();
        for (target, prerequisites) in edges {
            let target = normalize(target.as_ref())?;
            let prerequisites = prerequisites
                .into_iter()
                .map(|p| normalize(p.as_ref()))
                .collect::<Result<BTreeSet<_>, _>>()?;

            if prerequisites.contains(&target) {
                return Err(GraphError::SelfPrerequisite(target));
            }
            if graph.index.contains_key(&target) {
                return Err(GraphError::DuplicateTarget(target));
            }

            graph.index.insert(target.clone(), graph.edges.len());
            graph.edges.push(PrerequisiteEdge {
                target,
                prerequisites,
            });
        }
        Ok(graph)
    }

    /// Parses a TOML table of `[[course]]` entries.
    pub fn from_toml(source: &str) -> Result<Self, GraphError> {
        let file: GraphFile = toml::from_str(source)?;
        Self::from_edges(
            file.course
                .into_iter()
                .map(|edge| (edge.code, edge.prerequisites)),
        )
    }

    /// Loads the table at `path`, or the embedded default when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, GraphError> {
        let graph = match path {
            Some(path) => {
                let source = std::fs::read_to_string(path)?;
                Self::from_toml(&source)?
            }
            None => Self::from_toml(DEFAULT_PREREQUISITES)?,
        };
        info!(
            "Prerequisite graph loaded: {} course(s) from {}",
            graph.len(),
            path.map(|p| p.display().to_string())
                .unwrap_or_else(|| "embedded table".to_string())
        );
        if graph.is_empty() {
            warn!("Prerequisite table has no courses; no recommendations will be produced");
        }
        Ok(graph)
    }

    /// Direct prerequisites of `course_code`; empty when the course is not modeled.
    pub fn prerequisites_of(&self, course_code: &str) -> &BTreeSet<String> {
        self.index
            .get(course_code)
            .map(|&i| &self.edges[i].prerequisites)
            .unwrap_or(&NO_PREREQUISITES)
    }

    /// Edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = &PrerequisiteEdge> {
        self.edges.iter()
    }

    /// Target course codes in declaration order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.edges.iter().map(|edge| edge.target.as_str())
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

fn normalize(code: &str) -> Result<String, GraphError> {
    normalize_course_code(code).ok_or_else(|| GraphError::InvalidCode(code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_table_loads_in_declaration_order() {
        let graph = PrerequisiteGraph::load(None).unwrap();
        let targets: Vec<&str> = graph.targets().collect();
        assert_eq!(
            targets,
            vec!["CSE 333", "CSE 341", "CSE 344", "CSE 351", "CSE 401", "CSE 402"]
        );
    }

    #[test]
    fn test_prerequisites_of_known_course() {
        let graph = PrerequisiteGraph::load(None).unwrap();
        let prereqs: Vec<&str> = graph
            .prerequisites_of("CSE 401")
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(prereqs, vec!["CSE 331", "CSE 332"]);
    }

    #[test]
    fn test_unknown_course_has_no_prerequisites() {
        let graph = PrerequisiteGraph::load(None).unwrap();
        assert!(graph.prerequisites_of("ART 101").is_empty());
    }

    #[test]
    fn test_codes_are_normalized_on_load() {
        let graph = PrerequisiteGraph::from_toml(
            r#"
            [[course]]
            code = "cse333"
            prerequisites = ["cse  143"]
            "#,
        )
        .unwrap();
        assert!(graph.prerequisites_of("CSE 333").contains("CSE 143"));
    }

    #[test]
    fn test_self_prerequisite_is_rejected() {
        let err = PrerequisiteGraph::from_edges([("CSE 333", vec!["CSE 143", "cse 333"])])
            .unwrap_err();
        assert!(matches!(err, GraphError::SelfPrerequisite(code) if code == "CSE 333"));
    }

    #[test]
    fn test_duplicate_target_is_rejected() {
        let err = PrerequisiteGraph::from_edges([
            ("CSE 333", vec!["CSE 143"]),
            ("CSE 333", vec!["CSE 311"]),
        ])
        .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateTarget(_)));
    }

    #[test]
    fn test_invalid_code_is_rejected() {
        let err = PrerequisiteGraph::from_edges([("not a course", vec![])]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidCode(_)));
    }

    #[test]
    fn test_empty_table_loads_as_empty_graph() {
        let graph = PrerequisiteGraph::from_toml("").unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert!(!PrerequisiteGraph::load(None).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        let err = PrerequisiteGraph::from_toml("[[course]]\ncode = 333").unwrap_err();
        assert!(matches!(err, GraphError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[course]]\ncode = \"CSE 142\"\n\n[[course]]\ncode = \"CSE 143\"\nprerequisites = [\"CSE 142\"]"
        )
        .unwrap();

        let graph = PrerequisiteGraph::load(Some(file.path())).unwrap();
        assert_eq!(graph.len(), 2);
        assert!(graph.prerequisites_of("CSE 142").is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PrerequisiteGraph::load(Some(Path::new("/nonexistent/prereqs.toml")))
            .unwrap_err();
        assert!(matches!(err, GraphError::Io(_)));
    }
}

//! Recommendation engine. Evaluates completed coursework against the
//! prerequisite graph and classifies academic standing.
//!
//! `AppState` holds an `Arc<dyn Recommender>` so the rule set can be swapped
//! without touching handlers or the composer.

use std::sync::Arc;

use serde::Serialize;

use crate::advising::prerequisites::PrerequisiteGraph;
use crate::transcript::models::{Gpa, TranscriptRecord};

/// Default number of recommendations shown to a student.
pub const DEFAULT_DISPLAY_LIMIT: usize = 5;

/// Coarse academic performance band derived from GPA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Standing {
    Strong,
    Good,
    NeedsImprovement,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    /// Capped at the display limit, graph declaration order.
    pub eligible_courses: Vec<String>,
    /// Every eligible course, uncapped.
    pub all_eligible_courses: Vec<String>,
    pub completed_cse_count: usize,
    pub completed_math_count: usize,
    pub standing: Standing,
}

pub trait Recommender: Send + Sync {
    fn recommend(&self, record: &TranscriptRecord) -> RecommendationResult;
}

/// Single-hop prerequisite rule: a course is eligible when it is not yet
/// completed and every direct prerequisite is.
pub struct PrerequisiteRecommender {
    graph: Arc<PrerequisiteGraph>,
    display_limit: usize,
}

impl PrerequisiteRecommender {
    pub fn new(graph: Arc<PrerequisiteGraph>, display_limit: usize) -> Self {
        Self {
            graph,
            display_limit,
        }
    }
}

impl Recommender for PrerequisiteRecommender {
    fn recommend(&self, record: &TranscriptRecord) -> RecommendationResult {
        let completed = record.completed_codes();

        let all_eligible_courses: Vec<String> = self
            .graph
            .targets()
            .filter(|target| !completed.contains(target))
            .filter(|target| {
                self.graph
                    .prerequisites_of(target)
                    .iter()
                    .all(|p| completed.contains(p.as_str()))
            })
            .map(str::to_string)
            .collect();

        let eligible_courses = all_eligible_courses
            .iter()
            .take(self.display_limit)
            .cloned()
            .collect();

        RecommendationResult {
            eligible_courses,
            all_eligible_courses,
            completed_cse_count: record.count_with_prefix("CSE"),
            completed_math_count: record.count_with_prefix("MATH"),
            standing: classify_standing(&record.gpa),
        }
    }
}

/// strong ≥ 3.5, good ≥ 3.0, needs improvement below that; unknown without a usable GPA.
pub fn classify_standing(gpa: &Gpa) -> Standing {
    match gpa.value() {
        Some(v) if v >= 3.5 => Standing::Strong,
        Some(v) if v >= 3.0 => Standing::Good,
        Some(_) => Standing::NeedsImprovement,
        None => Standing::Unknown,
    }
}

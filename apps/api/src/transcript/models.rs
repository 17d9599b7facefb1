use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// A single completed (or attempted) course as it appears on a transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEntry {
    /// Canonical "PREFIX NUMBER" form, e.g. "CSE 143".
    pub course_code: String,
    pub title: String,
    pub grade: String,
    pub credits: f64,
}

/// Structured course history for one parsed document.
///
/// Built once by the parser and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptRecord {
    /// Transcript order is preserved.
    pub courses: Vec<CourseEntry>,
    pub gpa: Gpa,
    pub major: Option<String>,
    pub total_credits: f64,
}

impl TranscriptRecord {
    /// Builds a record. A missing credit total falls back to the sum of course credits.
    pub fn new(
        courses: Vec<CourseEntry>,
        gpa: Gpa,
        major: Option<String>,
        total_credits: Option<f64>,
    ) -> Self {
        let total_credits = total_credits
            .unwrap_or_else(|| courses.iter().map(|c| c.credits).sum())
            .max(0.0);
        Self {
            courses,
            gpa,
            major,
            total_credits,
        }
    }

    /// Set of normalized codes for every course on the record.
    pub fn completed_codes(&self) -> HashSet<&str> {
        self.courses.iter().map(|c| c.course_code.as_str()).collect()
    }

    /// Number of course entries whose code starts with `prefix`.
    pub fn count_with_prefix(&self, prefix: &str) -> usize {
        self.courses
            .iter()
            .filter(|c| c.course_code.starts_with(prefix))
            .count()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// GPA
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GpaError {
    #[error("unparseable GPA value '{0}'")]
    Unparseable(String),

    #[error("GPA {0} is outside the 0.0-4.0 scale")]
    OutOfRange(f64),
}

/// GPA as reported by a transcript.
///
/// A reported value is always within 0.0-4.0. Anything else is kept as
/// `Unparseable` so the raw text can still be shown to the student.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<RawGpa>", into = "Option<RawGpa>")]
pub enum Gpa {
    Reported(f64),
    Unparseable(String),
    #[default]
    NotAvailable,
}

impl Gpa {
    /// Validates a raw GPA string.
    pub fn parse(raw: &str) -> Result<f64, GpaError> {
        let trimmed = raw.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| GpaError::Unparseable(trimmed.to_string()))?;
        if !(0.0..=4.0).contains(&value) {
            return Err(GpaError::OutOfRange(value));
        }
        Ok(value)
    }

    /// Converts raw transcript text into a `Gpa`, recovering from parse failures.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a") {
            return Gpa::NotAvailable;
        }
        match Gpa::parse(trimmed) {
            Ok(value) => Gpa::Reported(value),
            Err(e) => {
                debug!("GPA recovered as unparseable: {e}");
                Gpa::Unparseable(trimmed.to_string())
            }
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Gpa::Reported(v) => Some(*v),
            _ => None,
        }
    }
}

/// Two decimals, truncated so the shown value never rounds across a standing boundary.
impl fmt::Display for Gpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gpa::Reported(v) => write!(f, "{:.2}", (v * 100.0 + 1e-9).floor() / 100.0),
            Gpa::Unparseable(raw) => f.write_str(raw),
            Gpa::NotAvailable => f.write_str("N/A"),
        }
    }
}

/// Wire form of a GPA: a JSON number when reported, the raw text otherwise.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawGpa {
    Number(f64),
    Text(String),
}

impl From<Option<RawGpa>> for Gpa {
    fn from(raw: Option<RawGpa>) -> Self {
        match raw {
            None => Gpa::NotAvailable,
            Some(RawGpa::Number(n)) => Gpa::from_raw(&n.to_string()),
            Some(RawGpa::Text(s)) => Gpa::from_raw(&s),
        }
    }
}

impl From<Gpa> for Option<RawGpa> {
    fn from(gpa: Gpa) -> Self {
        match gpa {
            Gpa::Reported(v) => Some(RawGpa::Number(v)),
            Gpa::Unparseable(raw) => Some(RawGpa::Text(raw)),
            Gpa::NotAvailable => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Structured payload (parsed client-side)
// ────────────────────────────────────────────────────────────────────────────

/// A number that may arrive as a JSON number or as a numeric string ("120").
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredCourse {
    pub course_code: String,
    #[serde(default, alias = "courseName")]
    pub title: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub credits: Option<NumberOrText>,
}

/// Transcript already broken into fields by an external parser.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredTranscript {
    #[serde(default)]
    pub courses: Vec<StructuredCourse>,
    #[serde(default)]
    pub gpa: Gpa,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub total_credits: Option<NumberOrText>,
}

/// Input accepted by the parser.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TranscriptSource {
    Text(String),
    Structured(StructuredTranscript),
}

/// Normalizes a course code to "PREFIX NUMBER" (uppercase, single space).
///
/// Returns `None` when the input has no alphabetic prefix followed by a number.
pub fn normalize_course_code(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    let split = compact.find(|c: char| c.is_ascii_digit())?;
    let (prefix, number) = compact.split_at(split);
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic() || c == '&') {
        return None;
    }
    if !number.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(format!("{prefix} {number}"))
}

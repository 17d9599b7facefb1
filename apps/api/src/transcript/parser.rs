//! Course record parser. Turns transcript text (or a client-parsed payload)
//! into a `TranscriptRecord`.
//!
//! Line-oriented: each line is tried as a course entry first, then as a
//! summary marker. Summary markers may repeat; the last one wins.

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::transcript::models::{
    normalize_course_code, CourseEntry, Gpa, StructuredTranscript, TranscriptRecord,
    TranscriptSource,
};

/// Letter grades, pass/fail and status markers, or a 0.0-4.0 grade point.
const GRADE: &str = r"(?:[A-D][+-]?|E|F|P|NP|S|NS|CR|NC|W|I|HW|[0-4]\.\d{1,2})";
const LETTER_GRADE: &str = r"(?:[A-D][+-]?|E|F|P|NP|S|NS|CR|NC|W|I|HW)";
const CODE: &str = r"(?P<dept>[A-Za-z&]{2,6})\s*(?P<num>\d{3}[A-Za-z]?)";
/// A GPA marker only counts when followed by a number or a known placeholder.
const GPA_VALUE: &str = r"\d+(?:\.\d+)?|n/a|pending|tbd|in\s+progress";
const CREDITS: &str = r"(?P<credits>\d{1,2}(?:\.\d{1,2})?)";

pub struct CourseRecordParser {
    /// `CODE TITLE GRADE CREDITS`
    grade_then_credits: Regex,
    /// `CODE TITLE CREDITS LETTER_GRADE`
    credits_then_grade: Regex,
    gpa: Regex,
    major: Regex,
    total_credits: Regex,
}

impl CourseRecordParser {
    pub fn new() -> Result<Self> {
        let grade_then_credits = Regex::new(&format!(
            r"^\s*{CODE}\s+(?P<title>.+?)\s+(?P<grade>{GRADE})\s+{CREDITS}\s*$"
        ))
        .context("Failed to compile course line regex")?;
        let credits_then_grade = Regex::new(&format!(
            r"^\s*{CODE}\s+(?P<title>.+?)\s+{CREDITS}\s+(?P<grade>{LETTER_GRADE})\s*$"
        ))
        .context("Failed to compile alternate course line regex")?;
        let gpa = Regex::new(&format!(
            r"(?i)\b(?:(?:cumulative|cum\.?|overall)\s+)?gpa\s*[:=]?\s*(?P<value>{GPA_VALUE})(?:[\s,;/]|$)"
        ))
        .context("Failed to compile GPA regex")?;
        let major = Regex::new(r"(?i)^\s*major\s*[:\-]\s*(?P<value>.+?)\s*$")
            .context("Failed to compile major regex")?;
        let total_credits = Regex::new(
            r"(?i)\btotal\s+credits(?:\s+earned)?\s*[:=]?\s*(?P<value>\d+(?:\.\d+)?)",
        )
        .context("Failed to compile total credits regex")?;

        Ok(Self {
            grade_then_credits,
            credits_then_grade,
            gpa,
            major,
            total_credits,
        })
    }

    /// Parses either raw text or a structured payload.
    pub fn parse(&self, source: TranscriptSource) -> Result<TranscriptRecord, AppError> {
        match source {
            TranscriptSource::Text(text) => self.parse_text(&text),
            TranscriptSource::Structured(payload) => parse_structured(payload),
        }
    }

    /// Parses canonical full text extracted from a transcript document.
    ///
    /// Fails with `NoCourseDataFound` when no course line is recognized.
    pub fn parse_text(&self, text: &str) -> Result<TranscriptRecord, AppError> {
        let mut courses = Vec::new();
        let mut gpa_raw: Option<String> = None;
        let mut major: Option<String> = None;
        let mut total_credits: Option<f64> = None;

        for line in text.lines() {
            if let Some(course) = self.parse_course_line(line) {
                debug!("Course line: {}", course.course_code);
                courses.push(course);
                continue;
            }
            if let Some(caps) = self.gpa.captures(line) {
                gpa_raw = Some(caps["value"].to_string());
            }
            if let Some(caps) = self.major.captures(line) {
                major = Some(caps["value"].to_string());
            }
            if let Some(caps) = self.total_credits.captures(line) {
                total_credits = caps["value"].parse().ok();
            }
        }

        if courses.is_empty() {
            return Err(AppError::NoCourseDataFound);
        }

        let gpa = gpa_raw.as_deref().map(Gpa::from_raw).unwrap_or_default();
        info!(
            "Parsed transcript: {} course(s), GPA {}, major {}",
            courses.len(),
            gpa,
            major.as_deref().unwrap_or("unknown")
        );
        Ok(TranscriptRecord::new(courses, gpa, major, total_credits))
    }

    fn parse_course_line(&self, line: &str) -> Option<CourseEntry> {
        let caps = self
            .grade_then_credits
            .captures(line)
            .or_else(|| self.credits_then_grade.captures(line))?;

        let course_code = normalize_course_code(&format!("{} {}", &caps["dept"], &caps["num"]))?;
        let credits: f64 = caps["credits"].parse().ok()?;
        Some(CourseEntry {
            course_code,
            title: caps["title"].trim().to_string(),
            grade: caps["grade"].to_uppercase(),
            credits,
        })
    }
}

/// Converts a client-parsed payload, normalizing codes and numbers.
pub fn parse_structured(payload: StructuredTranscript) -> Result<TranscriptRecord, AppError> {
    let courses: Vec<CourseEntry> = payload
        .courses
        .into_iter()
        .filter_map(|c| {
            let Some(course_code) = normalize_course_code(&c.course_code) else {
                debug!("Skipping course with unrecognized code '{}'", c.course_code);
                return None;
            };
            Some(CourseEntry {
                course_code,
                title: c.title.unwrap_or_default().trim().to_string(),
                grade: c.grade.unwrap_or_default().trim().to_uppercase(),
                credits: c
                    .credits
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0)
                    .max(0.0),
            })
        })
        .collect();

    if courses.is_empty() {
        return Err(AppError::NoCourseDataFound);
    }

    let major = payload
        .major
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    let total_credits = payload.total_credits.and_then(|t| t.as_f64());
    Ok(TranscriptRecord::new(courses, payload.gpa, major, total_credits))
}

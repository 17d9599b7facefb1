//! Response composer. Picks a template from the message intent and the
//! student's state, then fills it with transcript and engine output.
//!
//! Intent detection is an ordered list of keyword rules, first match wins.
//! Composition never fails; missing fields degrade to placeholder text.

use crate::advising::engine::{classify_standing, RecommendationResult, Standing};
use crate::advising::templates::{
    GETTING_STARTED, GRADE_ANALYSIS, GREETING, MAJOR_PLACEHOLDER, NO_ELIGIBLE_COURSES,
    NO_GRADES_PLACEHOLDER, OVERVIEW, PROGRESS_SUMMARY, RECOMMENDATIONS,
    UPLOAD_FOR_RECOMMENDATIONS,
};
use crate::transcript::models::TranscriptRecord;

/// Number of most recent courses listed in the grade analysis.
const RECENT_GRADE_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Recommendations,
    GradeAnalysis,
    Overview,
    UploadForRecommendations,
    GettingStarted,
    Greeting,
}

/// A rule fires when the lowercased message contains any of its keywords.
type IntentRule = (&'static [&'static str], Template);

const TRANSCRIPT_RULES: &[IntentRule] = &[
    (&["course", "recommend", "next"], Template::Recommendations),
    (&["gpa", "grade"], Template::GradeAnalysis),
];

const NO_TRANSCRIPT_RULES: &[IntentRule] = &[
    (&["course", "recommend"], Template::UploadForRecommendations),
    (&["transcript", "upload"], Template::GettingStarted),
];

/// Selects the template for a message. Without a transcript only the
/// upload-prompting family is eligible.
pub fn select_template(message: &str, has_transcript: bool) -> Template {
    let (rules, fallback) = if has_transcript {
        (TRANSCRIPT_RULES, Template::Overview)
    } else {
        (NO_TRANSCRIPT_RULES, Template::Greeting)
    };

    let lowered = message.to_lowercase();
    rules
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, template)| *template)
        .unwrap_or(fallback)
}

/// Builds the reply for `message`.
pub fn compose(
    message: &str,
    record: Option<&TranscriptRecord>,
    result: Option<&RecommendationResult>,
) -> String {
    let Some(record) = record else {
        return match select_template(message, false) {
            Template::UploadForRecommendations => UPLOAD_FOR_RECOMMENDATIONS.to_string(),
            Template::GettingStarted => GETTING_STARTED.to_string(),
            _ => GREETING.to_string(),
        };
    };

    let view = StudentView::new(record, result);
    match select_template(message, true) {
        Template::Recommendations => view.recommendations(result),
        Template::GradeAnalysis => view.grade_analysis(record),
        _ => view.overview(record),
    }
}

/// Display strings derived once per request.
struct StudentView {
    major: String,
    gpa: String,
    total_credits: String,
    cse_count: String,
    math_count: String,
    standing: Standing,
}

impl StudentView {
    fn new(record: &TranscriptRecord, result: Option<&RecommendationResult>) -> Self {
        let (cse, math, standing) = match result {
            Some(r) => (r.completed_cse_count, r.completed_math_count, r.standing),
            None => (
                record.count_with_prefix("CSE"),
                record.count_with_prefix("MATH"),
                classify_standing(&record.gpa),
            ),
        };
        Self {
            major: record
                .major
                .clone()
                .unwrap_or_else(|| MAJOR_PLACEHOLDER.to_string()),
            gpa: record.gpa.to_string(),
            total_credits: format_credits(record.total_credits),
            cse_count: cse.to_string(),
            math_count: math.to_string(),
            standing,
        }
    }

    fn progress(&self) -> String {
        fill(
            PROGRESS_SUMMARY,
            &[
                ("major", self.major.as_str()),
                ("gpa", self.gpa.as_str()),
                ("total_credits", self.total_credits.as_str()),
                ("cse_count", self.cse_count.as_str()),
            ],
        )
    }

    fn recommendations(&self, result: Option<&RecommendationResult>) -> String {
        let eligible = result.map(|r| r.eligible_courses.as_slice()).unwrap_or(&[]);
        let progress = self.progress();

        if eligible.is_empty() {
            return fill(
                NO_ELIGIBLE_COURSES,
                &[("progress", progress.as_str()), ("cse_count", self.cse_count.as_str())],
            );
        }

        let course_list = eligible
            .iter()
            .map(|code| format!("- {code}"))
            .collect::<Vec<_>>()
            .join("\n");
        fill(
            RECOMMENDATIONS,
            &[("progress", progress.as_str()), ("course_list", course_list.as_str())],
        )
    }

    fn grade_analysis(&self, record: &TranscriptRecord) -> String {
        let skip = record.courses.len().saturating_sub(RECENT_GRADE_COUNT);
        let recent_grades = record.courses[skip..]
            .iter()
            .map(|c| {
                let grade = if c.grade.is_empty() { "N/A" } else { c.grade.as_str() };
                format!("- {}: {}", c.course_code, grade)
            })
            .collect::<Vec<_>>()
            .join("\n");
        let recent_grades = if recent_grades.is_empty() {
            NO_GRADES_PLACEHOLDER.to_string()
        } else {
            recent_grades
        };

        fill(
            GRADE_ANALYSIS,
            &[
                ("gpa", self.gpa.as_str()),
                ("total_credits", self.total_credits.as_str()),
                ("recent_grades", recent_grades.as_str()),
                ("standing", standing_sentence(self.standing)),
            ],
        )
    }

    fn overview(&self, record: &TranscriptRecord) -> String {
        let course_count = record.courses.len().to_string();
        fill(
            OVERVIEW,
            &[
                ("major", self.major.as_str()),
                ("gpa", self.gpa.as_str()),
                ("total_credits", self.total_credits.as_str()),
                ("course_count", course_count.as_str()),
                ("cse_count", self.cse_count.as_str()),
                ("math_count", self.math_count.as_str()),
            ],
        )
    }
}

pub fn standing_sentence(standing: Standing) -> &'static str {
    match standing {
        Standing::Strong => "Your GPA indicates strong academic performance.",
        Standing::Good => "Your GPA indicates good academic performance.",
        Standing::NeedsImprovement => {
            "Your GPA indicates academic performance that needs improvement."
        }
        Standing::Unknown => {
            "Your standing could not be determined because no numeric GPA was found on your transcript."
        }
    }
}

/// "120" for whole numbers, "17.5" otherwise.
fn format_credits(credits: f64) -> String {
    if credits.fract() == 0.0 {
        format!("{credits:.0}")
    } else {
        credits.to_string()
    }
}

/// Single-pass `{key}` substitution. Unknown keys are left as written, and
/// substituted values are never re-scanned.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match values.iter().find(|(k, _)| *k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::models::{CourseEntry, Gpa};

    fn record_with(codes: &[(&str, &str)], gpa: Gpa) -> TranscriptRecord {
        TranscriptRecord::new(
            codes
                .iter()
                .map(|(code, grade)| CourseEntry {
                    course_code: code.to_string(),
                    title: String::new(),
                    grade: grade.to_string(),
                    credits: 5.0,
                })
                .collect(),
            gpa,
            Some("Computer Science".to_string()),
            Some(120.0),
        )
    }

    fn result_with(eligible: &[&str], standing: Standing) -> RecommendationResult {
        let eligible: Vec<String> = eligible.iter().map(|s| s.to_string()).collect();
        RecommendationResult {
            eligible_courses: eligible.clone(),
            all_eligible_courses: eligible,
            completed_cse_count: 2,
            completed_math_count: 1,
            standing,
        }
    }

    #[test]
    fn test_recommendation_keywords_win_over_grade_keywords() {
        assert_eq!(
            select_template("What COURSE should I take given my GPA?", true),
            Template::Recommendations
        );
        assert_eq!(select_template("what's next?", true), Template::Recommendations);
        assert_eq!(select_template("How are my grades", true), Template::GradeAnalysis);
        assert_eq!(select_template("hello", true), Template::Overview);
    }

    #[test]
    fn test_no_transcript_family_is_used_regardless_of_intent() {
        assert_eq!(
            select_template("recommend something", false),
            Template::UploadForRecommendations
        );
        assert_eq!(
            select_template("How do I upload?", false),
            Template::GettingStarted
        );
        assert_eq!(select_template("what is my gpa", false), Template::Greeting);
    }

    #[test]
    fn test_recommendation_reply_lists_every_eligible_code() {
        let record = record_with(&[("CSE 143", "A"), ("CSE 311", "B+")], Gpa::Reported(3.6));
        let result = result_with(&["CSE 333", "CSE 341", "CSE 344"], Standing::Strong);
        let reply = compose("recommend courses", Some(&record), Some(&result));

        for code in &result.eligible_courses {
            assert!(reply.contains(code.as_str()), "missing {code} in reply");
        }
        assert!(reply.contains("Major: Computer Science"));
        assert!(reply.contains("Total Credits: 120"));
    }

    #[test]
    fn test_recommendation_reply_without_eligible_courses() {
        let record = record_with(&[("CSE 142", "A")], Gpa::Reported(3.6));
        let result = result_with(&[], Standing::Strong);
        let reply = compose("next quarter?", Some(&record), Some(&result));
        assert!(reply.contains("Next Steps"));
        assert!(reply.contains("CSE 311"));
    }

    #[test]
    fn test_grade_reply_lists_last_five_courses() {
        let record = record_with(
            &[
                ("CSE 142", "A"),
                ("CSE 143", "A-"),
                ("MATH 124", "B"),
                ("MATH 125", "B+"),
                ("CSE 311", "B+"),
                ("CSE 332", "A"),
            ],
            Gpa::Reported(3.2),
        );
        let reply = compose("how is my gpa", Some(&record), None);
        assert!(!reply.contains("CSE 142"));
        assert!(reply.contains("- CSE 332: A"));
        assert!(reply.contains("good academic performance"));
        assert!(reply.contains("3.20"));
    }

    #[test]
    fn test_grade_reply_with_unparseable_gpa() {
        let record = record_with(&[("CSE 142", "A")], Gpa::Unparseable("pending".to_string()));
        let reply = compose("grade check", Some(&record), None);
        assert!(reply.contains("pending"));
        assert!(reply.contains("could not be determined"));
    }

    #[test]
    fn test_overview_uses_placeholders_for_missing_fields() {
        let record = TranscriptRecord::new(
            vec![CourseEntry {
                course_code: "CSE 142".to_string(),
                title: String::new(),
                grade: "A".to_string(),
                credits: 4.0,
            }],
            Gpa::NotAvailable,
            None,
            None,
        );
        let reply = compose("hi", Some(&record), None);
        assert!(reply.contains("**Major:** Undeclared"));
        assert!(reply.contains("**GPA:** N/A"));
        assert!(reply.contains("**Total Credits:** 4"));
        assert!(reply.contains("**CSE Courses:** 1"));
    }

    #[test]
    fn test_no_transcript_reply_prompts_upload() {
        let reply = compose("can you recommend a course", None, None);
        assert!(reply.contains("Upload your transcript PDF"));
    }

    #[test]
    fn test_fill_does_not_rescan_values() {
        let out = fill("{a} and {b} and {c}", &[("a", "{b}"), ("b", "two")]);
        assert_eq!(out, "{b} and two and {c}");
    }

    #[test]
    fn test_format_credits() {
        assert_eq!(format_credits(120.0), "120");
        assert_eq!(format_credits(17.5), "17.5");
    }
}

// Advising: prerequisite graph, recommendation rules, and chat responses.
// Everything here reads a TranscriptRecord; nothing mutates it.

pub mod composer;
pub mod engine;
pub mod handlers;
pub mod prerequisites;
pub mod templates;

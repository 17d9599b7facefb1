// Transcript ingestion: document text extraction and course record parsing.

pub mod extract;
pub mod handlers;
pub mod models;
pub mod parser;

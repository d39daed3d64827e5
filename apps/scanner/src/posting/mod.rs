// Posting intake: fetch the page, extract its text, summarize it into the
// fixed Korean structure, and parse the reply into typed data.

pub mod fetcher;
pub mod parser;
pub mod prompts;
pub mod summarizer;

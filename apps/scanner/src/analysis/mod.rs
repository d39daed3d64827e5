// Requirement extraction, skill-gap scoring, and interview question
// generation on top of the posting summary and GitHub profile.

pub mod gap;
pub mod prompts;
pub mod questions;
pub mod requirements;

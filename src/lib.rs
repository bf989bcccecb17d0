pub mod config;
pub mod github;
pub mod issue;
pub mod logging;
pub mod mock_github;
pub mod resolver;
pub mod submit;

// Re-export the common entry points at crate root for convenience
pub use issue::{IssueParser, IssueTemplate, ParseError, Priority, Status, extract_keywords, extract_priority, parse_multiple, parse_single};
pub use resolver::find_related;
pub use submit::{SubmissionResult, SubmitOptions, Submitter};

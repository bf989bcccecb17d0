//! Prompt-to-issue pipeline.
//!
//! Pure text handling only: priority markers, keywords, parsing of one or many prompts,
//! and the issue template with its rendered markdown body. Nothing in here talks to the network.

mod error;
pub use error::ParseError;

mod keywords;
pub use keywords::{DEFAULT_MAX_KEYWORDS, extract_keywords};

mod parser;
pub use parser::{InputShape, IssueParser, parse_multiple, parse_single};

mod priority;
pub use priority::{Priority, extract_priority};

mod template;
pub use template::{DEFAULT_CHECKLIST, HIGH_PRIORITY_LABEL, IssueTemplate, Status};

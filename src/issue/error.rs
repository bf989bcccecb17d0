//! Error types for turning prompts into issue templates.
//!
//! Uses miette for rich diagnostics with source code spans.

#![allow(unused_assignments)] // Fields are read by miette's derive macro via attributes

use miette::{Diagnostic, NamedSource, SourceSpan};

/// Error type for prompt parsing.
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum ParseError {
	#[error("prompt has no title")]
	#[diagnostic(code(todo_issues::parse::empty_prompt), help("the first line of a prompt becomes the issue title; it must contain more than priority markers"))]
	EmptyPrompt {
		#[source_code]
		src: NamedSource<String>,
		#[label("nothing left here after removing priority markers")]
		span: SourceSpan,
	},
}

impl ParseError {
	pub(crate) fn empty_prompt(prompt: &str) -> Self {
		Self::EmptyPrompt {
			src: NamedSource::new("prompt", prompt.to_string()),
			span: title_line_span(prompt),
		}
	}
}

/// Span of the first non-blank line, without its surrounding whitespace. Empty at 0 for a blank prompt.
fn title_line_span(prompt: &str) -> SourceSpan {
	let mut offset = 0;
	for line in prompt.split_inclusive('\n') {
		let trimmed = line.trim();
		if !trimmed.is_empty() {
			let start = offset + (line.len() - line.trim_start().len());
			return (start, trimmed.len()).into();
		}
		offset += line.len();
	}
	(0, 0).into()
}

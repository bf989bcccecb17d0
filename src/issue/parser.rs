//! Natural-language prompts to [`IssueTemplate`]s.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::{DEFAULT_CHECKLIST, IssueTemplate, ParseError, Status, extract_priority};

static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*•](?:\s+|$)").unwrap());
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[.)](?:\s+|$)").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r?\n\s*\n").unwrap());

/// Shape of a multi-issue input, detected in this order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputShape {
	/// Lines starting with `-`, `*` or `•`
	Bullets,
	/// Lines starting with `1.`, `2.`, ...
	Numbered,
	/// Blank-line separated paragraphs
	Paragraphs,
}

impl InputShape {
	pub fn detect(text: &str) -> Self {
		let lines = || text.lines().map(str::trim);
		if lines().any(|l| BULLET.is_match(l)) {
			InputShape::Bullets
		} else if lines().any(|l| NUMBERED.is_match(l)) {
			InputShape::Numbered
		} else {
			InputShape::Paragraphs
		}
	}

	fn marker(&self) -> Option<&'static Regex> {
		match self {
			InputShape::Bullets => Some(&*BULLET),
			InputShape::Numbered => Some(&*NUMBERED),
			InputShape::Paragraphs => None,
		}
	}
}

/// Parser carrying the checklist that every produced template starts with.
#[derive(Clone, Debug)]
pub struct IssueParser {
	checklist: Vec<String>,
}

impl Default for IssueParser {
	fn default() -> Self {
		Self::with_checklist(DEFAULT_CHECKLIST.iter().map(|s| s.to_string()))
	}
}

impl IssueParser {
	pub fn with_checklist(checklist: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Self {
			checklist: checklist.into_iter().map(Into::into).collect(),
		}
	}

	/// Parse one prompt. The first line is the title (priority markers stripped), the rest is the description.
	/// `start` marks the issue `in-progress` instead of `todo`.
	pub fn parse_single(&self, prompt: &str, start: bool) -> Result<IssueTemplate, ParseError> {
		let (title_line, body) = match prompt.trim().split_once('\n') {
			Some((first, rest)) => (first, rest.trim()),
			None => (prompt.trim(), ""),
		};
		let (priority, title) = extract_priority(title_line);
		if title.is_empty() {
			return Err(ParseError::empty_prompt(prompt));
		}

		let mut template = IssueTemplate::new(title, body);
		template.priority = priority;
		template.status = Status::from_start(start);
		template.checklist = self.checklist.clone();
		debug!(title = %template.title, %priority, "parsed prompt");
		Ok(template)
	}

	/// Parse a list of prompts: bullets, a numbered list, or blank-line separated paragraphs.
	///
	/// Items are returned in input order. Blank items are skipped; an item that fails to parse
	/// is logged and skipped without affecting its siblings.
	pub fn parse_multiple(&self, text: &str, start: bool) -> Vec<IssueTemplate> {
		let shape = InputShape::detect(text);
		debug!(?shape, "detected input shape");

		split_items(text, shape)
			.into_iter()
			.filter(|item| !item.trim().is_empty())
			.filter_map(|item| match self.parse_single(&item, start) {
				Ok(template) => Some(template),
				Err(e) => {
					warn!(item = %item, error = %e, "skipping unparsable item");
					None
				}
			})
			.collect()
	}
}

/// Split `text` into raw item prompts according to `shape`.
///
/// In list shapes, lines without a marker are continuation lines of the preceding item (its description);
/// lines before the first marker are ignored.
fn split_items(text: &str, shape: InputShape) -> Vec<String> {
	let Some(marker) = shape.marker() else {
		return BLANK_LINES.split(text).map(|p| p.trim().to_string()).collect();
	};

	let mut items: Vec<String> = Vec::new();
	for line in text.lines() {
		let trimmed = line.trim();
		if let Some(m) = marker.find(trimmed) {
			items.push(trimmed[m.end()..].to_string());
		} else if let Some(current) = items.last_mut()
			&& !trimmed.is_empty()
		{
			current.push('\n');
			current.push_str(trimmed);
		}
	}
	items
}

/// [`IssueParser::parse_single`] with the default checklist.
pub fn parse_single(prompt: &str, start: bool) -> Result<IssueTemplate, ParseError> {
	IssueParser::default().parse_single(prompt, start)
}

/// [`IssueParser::parse_multiple`] with the default checklist, everything marked `todo`.
pub fn parse_multiple(text: &str) -> Vec<IssueTemplate> {
	IssueParser::default().parse_multiple(text, false)
}

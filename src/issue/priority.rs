//! Priority markers embedded in a prompt's title line.
//!
//! Markers are either bracketed (`[urgent]`, `[high priority]`, `[high]`, `[low priority]`, `[low]`)
//! or bare phrases standing alone between whitespace (`urgent`, `high priority`, `low priority`),
//! so `non-urgent` is not a marker. Matching is case-insensitive.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Issue priority. Ordering follows urgency: `Low < Medium < High < Urgent`.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
	Low,
	#[default]
	Medium,
	High,
	Urgent,
}

impl Priority {
	pub fn as_str(&self) -> &'static str {
		match self {
			Priority::Low => "low",
			Priority::Medium => "medium",
			Priority::High => "high",
			Priority::Urgent => "urgent",
		}
	}

	/// Whether this priority carries the derived `high-priority` label.
	pub fn is_high(&self) -> bool {
		matches!(self, Priority::High | Priority::Urgent)
	}
}

impl fmt::Display for Priority {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Priority {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"low" => Ok(Priority::Low),
			"medium" | "normal" => Ok(Priority::Medium),
			"high" => Ok(Priority::High),
			"urgent" => Ok(Priority::Urgent),
			other => Err(format!("unknown priority '{other}', expected one of: low, medium, high, urgent")),
		}
	}
}

/// Marker tiers in precedence order. The first tier with a match decides the priority.
static MARKER_TIERS: LazyLock<[(Priority, Regex); 3]> = LazyLock::new(|| {
	[
		(Priority::Urgent, Regex::new(r"(?i)\[\s*urgent\s*\]|(?:^|\s)urgent(?:\s|$)").unwrap()),
		(Priority::High, Regex::new(r"(?i)\[\s*high(?:\s+priority)?\s*\]|(?:^|\s)high\s+priority(?:\s|$)").unwrap()),
		(Priority::Low, Regex::new(r"(?i)\[\s*low(?:\s+priority)?\s*\]|(?:^|\s)low\s+priority(?:\s|$)").unwrap()),
	]
});

/// Detect the priority of `text` and return it with the markers removed.
///
/// Only the first line is scanned. Everything after it is carried over untouched, so
/// marker-looking words in a description or checklist never change the priority.
/// Without any marker the priority is [`Priority::Medium`] and the text is only trimmed.
pub fn extract_priority(text: &str) -> (Priority, String) {
	let (first_line, rest) = match text.trim_start().split_once('\n') {
		Some((first, rest)) => (first, Some(rest)),
		None => (text.trim_start(), None),
	};

	let Some(priority) = MARKER_TIERS.iter().find(|(_, re)| re.is_match(first_line)).map(|(p, _)| *p) else {
		return (Priority::Medium, text.trim().to_string());
	};

	let mut cleaned = first_line.to_string();
	while let Some(m) = MARKER_TIERS.iter().find_map(|(_, re)| re.find(&cleaned)) {
		cleaned = splice_out(&cleaned, m.start(), m.end());
	}

	let cleaned = match rest {
		Some(rest) => format!("{}\n{}", cleaned.trim(), rest),
		None => cleaned,
	};
	(priority, cleaned.trim().to_string())
}

/// Remove `line[start..end]`, joining what is left on both sides with a single space.
fn splice_out(line: &str, start: usize, end: usize) -> String {
	let before = line[..start].trim_end();
	let after = line[end..].trim_start();
	match (before.is_empty(), after.is_empty()) {
		(true, _) => after.to_string(),
		(_, true) => before.to_string(),
		_ => format!("{before} {after}"),
	}
}

//! The to-be-created issue and its markdown body.

use std::collections::BTreeSet;

use derive_more::derive::Display;
use serde::{Deserialize, Serialize};

use super::Priority;

/// Label added whenever the priority is [`Priority::High`] or [`Priority::Urgent`].
pub const HIGH_PRIORITY_LABEL: &str = "high-priority";

/// Checklist every parsed template starts with.
pub const DEFAULT_CHECKLIST: &[&str] = &["Define task requirements", "Implement initial solution", "Write/update tests", "Review and refine", "Submit PR"];

/// Workflow status. Exactly one status label is present on a rendered issue.
#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
	#[default]
	#[display("todo")]
	Todo,
	#[display("in-progress")]
	InProgress,
}

impl Status {
	pub fn from_start(start: bool) -> Self {
		if start { Status::InProgress } else { Status::Todo }
	}

	pub fn label(&self) -> &'static str {
		match self {
			Status::Todo => "todo",
			Status::InProgress => "in-progress",
		}
	}

	pub fn is_status_label(label: &str) -> bool {
		label == Status::Todo.label() || label == Status::InProgress.label()
	}
}

/// A structured, not-yet-submitted issue.
///
/// `labels` holds only the caller's own labels. The status label and `high-priority` are derived
/// from `status` and `priority` by [`IssueTemplate::labels`], so they can never disagree with them.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IssueTemplate {
	pub title: String,
	pub body: String,
	pub priority: Priority,
	pub status: Status,
	pub labels: BTreeSet<String>,
	pub assignees: Vec<String>,
	pub milestone: Option<u64>,
	pub checklist: Vec<String>,
	pub relates_to: Vec<u64>,
	pub depends_on: Vec<u64>,
	pub blocks: Vec<u64>,
}

impl IssueTemplate {
	/// Template with the given title and body, medium priority, `todo` status and the default checklist.
	pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			body: body.into(),
			priority: Priority::default(),
			status: Status::default(),
			labels: BTreeSet::new(),
			assignees: Vec::new(),
			milestone: None,
			checklist: DEFAULT_CHECKLIST.iter().map(|s| s.to_string()).collect(),
			relates_to: Vec::new(),
			depends_on: Vec::new(),
			blocks: Vec::new(),
		}
	}

	/// Add caller labels. Status labels are routed to [`IssueTemplate::status`] instead.
	pub fn add_labels<I, S>(&mut self, labels: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>, {
		for label in labels {
			let label = label.as_ref().trim();
			match label {
				"" | HIGH_PRIORITY_LABEL => {}
				"todo" => self.status = Status::Todo,
				"in-progress" => self.status = Status::InProgress,
				other => {
					self.labels.insert(other.to_string());
				}
			}
		}
	}

	/// Effective label set sent to the tracker.
	pub fn labels(&self) -> BTreeSet<String> {
		let mut labels: BTreeSet<String> = self.labels.iter().filter(|l| !Status::is_status_label(l) && *l != HIGH_PRIORITY_LABEL).cloned().collect();
		labels.insert(self.status.label().to_string());
		if self.priority.is_high() {
			labels.insert(HIGH_PRIORITY_LABEL.to_string());
		}
		labels
	}

	/// Append discovered related issues to `relates_to`, skipping numbers already linked in any direction.
	/// Returns how many were added.
	pub fn link_related(&mut self, numbers: impl IntoIterator<Item = u64>) -> usize {
		let mut added = 0;
		for number in numbers {
			if self.is_linked(number) {
				continue;
			}
			self.relates_to.push(number);
			added += 1;
		}
		added
	}

	pub fn is_linked(&self, number: u64) -> bool {
		self.relates_to.contains(&number) || self.depends_on.contains(&number) || self.blocks.contains(&number)
	}

	/// Text the related-issue keywords are drawn from.
	pub fn search_text(&self) -> String {
		if self.body.is_empty() { self.title.clone() } else { format!("{}\n{}", self.title, self.body) }
	}

	/// Render the markdown body: description, `## Checklist`, then `## Related Issues`.
	/// Empty sections are left out.
	pub fn render_body(&self) -> String {
		let mut sections: Vec<String> = Vec::new();

		let description = self.body.trim();
		if !description.is_empty() {
			sections.push(description.to_string());
		}

		if !self.checklist.is_empty() {
			let mut s = String::from("## Checklist");
			for item in &self.checklist {
				s.push_str(&format!("\n- [ ] {item}"));
			}
			sections.push(s);
		}

		let links = self
			.relates_to
			.iter()
			.map(|n| format!("- Relates to #{n}"))
			.chain(self.depends_on.iter().map(|n| format!("- Depends on #{n}")))
			.chain(self.blocks.iter().map(|n| format!("- Blocks #{n}")))
			.collect::<Vec<_>>();
		if !links.is_empty() {
			sections.push(format!("## Related Issues\n{}", links.join("\n")));
		}

		sections.join("\n\n")
	}
}

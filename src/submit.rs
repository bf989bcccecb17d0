//! Issue submission: defaults, related-issue links, and the remote create call, for one template or a batch.
//!
//! Nothing here returns an error. Every submission ends in a [`SubmissionResult`],
//! so a batch always reports exactly one outcome per template it attempted.

use futures::{StreamExt, stream};
use serde::Serialize;
use smart_default::SmartDefault;
use tracing::{info, instrument, warn};

use crate::{
	config::{AppConfig, IssueDefaults, RepoTarget},
	github::{BoxedGitHubClient, NewIssue},
	issue::{DEFAULT_MAX_KEYWORDS, IssueTemplate, Status, extract_keywords},
	resolver::{DEFAULT_RELATED_LIMIT, find_related},
};

/// Outcome of one submission.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SubmissionResult {
	Created { number: u64, url: String },
	/// `template` is the template exactly as it was handed in, before defaults and related links.
	Failed { reason: String, template: Box<IssueTemplate> },
}

impl SubmissionResult {
	pub fn is_created(&self) -> bool {
		matches!(self, SubmissionResult::Created { .. })
	}

	pub fn number(&self) -> Option<u64> {
		match self {
			SubmissionResult::Created { number, .. } => Some(*number),
			SubmissionResult::Failed { .. } => None,
		}
	}
}

#[derive(Clone, Debug, SmartDefault)]
pub struct SubmitOptions {
	/// Search for related issues and link them under `relates_to`
	#[default(true)]
	pub find_related: bool,
	#[default(DEFAULT_RELATED_LIMIT)]
	pub related_limit: usize,
	#[default(DEFAULT_MAX_KEYWORDS)]
	pub max_keywords: usize,
	/// Stop a sequential batch at the first failure
	pub fail_fast: bool,
}

impl SubmitOptions {
	pub fn from_config(config: &AppConfig) -> Self {
		Self {
			find_related: config.related.enabled,
			related_limit: config.related.limit,
			max_keywords: config.related.max_keywords,
			fail_fast: false,
		}
	}
}

/// Creates issues in one repository through a [`crate::github::GitHubClient`].
pub struct Submitter {
	client: BoxedGitHubClient,
	repo: RepoTarget,
	defaults: IssueDefaults,
	options: SubmitOptions,
}

impl Submitter {
	pub fn new(client: BoxedGitHubClient, repo: RepoTarget, defaults: IssueDefaults, options: SubmitOptions) -> Self {
		Self { client, repo, defaults, options }
	}

	pub fn repo(&self) -> &RepoTarget {
		&self.repo
	}

	/// Apply the configured defaults, exactly as [`Submitter::submit_one`] does before creating.
	///
	/// Default assignees fill in only when the template has none; default labels are merged.
	/// Status labels among the defaults are ignored, the template's own status wins.
	pub fn apply_defaults(&self, template: &mut IssueTemplate) {
		if template.assignees.is_empty() {
			template.assignees = self.defaults.assignees.clone();
		}
		template.add_labels(self.defaults.labels.iter().filter(|l| !Status::is_status_label(l)));
	}

	/// Submit one template.
	///
	/// With related-issue search enabled, keywords from the title and description are searched and the
	/// hits appended to `relates_to` (manual links are kept). Search problems never fail the submission.
	#[instrument(skip_all, fields(title = %template.title))]
	pub async fn submit_one(&self, template: IssueTemplate) -> SubmissionResult {
		let original = template.clone();
		let mut template = template;
		self.apply_defaults(&mut template);

		if self.options.find_related {
			let keywords = extract_keywords(&template.search_text(), self.options.max_keywords);
			let related = find_related(&keywords, self.client.as_ref(), &self.repo, self.options.related_limit).await;
			template.link_related(related);
		}

		let issue = NewIssue::from(&template);
		match self.client.create_issue(&self.repo, &issue).await {
			Ok(created) => {
				info!(number = created.number, url = %created.html_url, related = ?template.relates_to, "created issue");
				SubmissionResult::Created {
					number: created.number,
					url: created.html_url,
				}
			}
			Err(e) => {
				warn!(error = %e, "failed to create issue");
				SubmissionResult::Failed {
					reason: format!("{e:#}"),
					template: Box::new(original),
				}
			}
		}
	}

	/// Submit templates one after another, in order.
	///
	/// The result at index `i` belongs to `templates[i]`. A failure does not stop the batch unless
	/// `fail_fast` is set, in which case the results end at the failing template.
	#[instrument(skip_all, fields(count = templates.len(), repo = %self.repo))]
	pub async fn submit_batch(&self, templates: Vec<IssueTemplate>) -> Vec<SubmissionResult> {
		let mut results = Vec::with_capacity(templates.len());
		for template in templates {
			let result = self.submit_one(template).await;
			let failed = !result.is_created();
			results.push(result);
			if failed && self.options.fail_fast {
				warn!(submitted = results.len(), "stopping batch after first failure");
				break;
			}
		}
		results
	}

	/// Submit with up to `jobs` requests in flight.
	///
	/// Completion order is arbitrary; results are put back in input order before returning.
	/// `fail_fast` does not apply here, every template is attempted.
	#[instrument(skip_all, fields(count = templates.len(), jobs = jobs, repo = %self.repo))]
	pub async fn submit_batch_concurrent(&self, templates: Vec<IssueTemplate>, jobs: usize) -> Vec<SubmissionResult> {
		let mut indexed: Vec<(usize, SubmissionResult)> = stream::iter(templates.into_iter().enumerate())
			.map(|(index, template)| async move { (index, self.submit_one(template).await) })
			.buffer_unordered(jobs.max(1))
			.collect()
			.await;
		indexed.sort_by_key(|(index, _)| *index);
		indexed.into_iter().map(|(_, result)| result).collect()
	}
}

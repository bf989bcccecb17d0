//! Mock GitHub client for testing purposes.
//!
//! This module provides a mock implementation of the GitHubClient trait that stores
//! all data in memory and can be used for integration testing without hitting the real API.
//! Failures can be injected per title or per search, to exercise partial-failure paths.

use std::{
	collections::HashMap,
	path::Path,
	sync::{
		Mutex,
		atomic::{AtomicBool, AtomicU64, Ordering},
	},
};

use async_trait::async_trait;
use color_eyre::eyre::{Result, WrapErr, bail};
use serde::Deserialize;
use tracing::instrument;

use crate::{
	config::RepoTarget,
	github::{CreatedIssue, GitHubClient, NewIssue, SearchHit},
};

/// Environment variable naming the JSON seed file read in `--mock` mode.
pub const MOCK_STATE_ENV: &str = "TODO_ISSUES_MOCK_STATE";

/// Internal representation of an issue in the mock
#[derive(Clone, Debug)]
pub struct MockIssueData {
	pub number: u64,
	pub title: String,
	pub body: String,
	pub labels: Vec<String>,
	pub assignees: Vec<String>,
	pub milestone: Option<u64>,
}

/// Seed state, as read from the file named by `TODO_ISSUES_MOCK_STATE`.
///
/// ```json
/// {
///   "issues": [{ "owner": "o", "repo": "r", "number": 7, "title": "Cache eviction", "body": "" }],
///   "fail_titles": ["Fix bug"],
///   "fail_search": false
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MockState {
	pub issues: Vec<SeedIssue>,
	/// Creating an issue whose title contains any of these fails
	pub fail_titles: Vec<String>,
	pub fail_search: bool,
}

#[derive(Debug, Deserialize)]
pub struct SeedIssue {
	pub owner: String,
	pub repo: String,
	pub number: u64,
	pub title: String,
	#[serde(default)]
	pub body: String,
}

/// Mock GitHub client that stores all state in memory.
/// Thread-safe for use in async contexts.
pub struct MockGitHubClient {
	/// Counter for generating unique issue numbers
	next_issue_number: AtomicU64,

	/// All issues, keyed by repo -> issue_number -> issue
	issues: Mutex<HashMap<RepoTarget, HashMap<u64, MockIssueData>>>,

	/// Creation fails for titles containing any of these
	fail_titles: Mutex<Vec<String>>,

	fail_search: AtomicBool,

	/// Call log for debugging
	call_log: Mutex<Vec<String>>,
}

impl Default for MockGitHubClient {
	fn default() -> Self {
		Self::new()
	}
}

impl MockGitHubClient {
	pub fn new() -> Self {
		Self {
			next_issue_number: AtomicU64::new(1),
			issues: Mutex::new(HashMap::new()),
			fail_titles: Mutex::new(Vec::new()),
			fail_search: AtomicBool::new(false),
			call_log: Mutex::new(Vec::new()),
		}
	}

	pub fn from_state(state: MockState) -> Self {
		let client = Self::new();
		for seed in state.issues {
			let repo = RepoTarget { owner: seed.owner, repo: seed.repo };
			client.add_issue(&repo, seed.number, &seed.title, &seed.body);
		}
		*client.fail_titles.lock().unwrap() = state.fail_titles;
		client.set_fail_search(state.fail_search);
		client
	}

	/// Load seed state from a JSON file
	pub fn from_state_file(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path).wrap_err_with(|| format!("Failed to read mock state from {}", path.display()))?;
		let state: MockState = serde_json::from_str(&content).wrap_err("Mock state is not valid JSON")?;
		Ok(Self::from_state(state))
	}

	/// Add an existing issue. Later created issues are numbered after the highest number seen.
	pub fn add_issue(&self, repo: &RepoTarget, number: u64, title: &str, body: &str) {
		let issue = MockIssueData {
			number,
			title: title.to_string(),
			body: body.to_string(),
			labels: Vec::new(),
			assignees: Vec::new(),
			milestone: None,
		};
		self.issues.lock().unwrap().entry(repo.clone()).or_default().insert(number, issue);
		self.next_issue_number.fetch_max(number + 1, Ordering::SeqCst);
	}

	/// Make every create call for a title containing `pattern` fail
	pub fn fail_create_for(&self, pattern: &str) {
		self.fail_titles.lock().unwrap().push(pattern.to_string());
	}

	pub fn set_fail_search(&self, fail: bool) {
		self.fail_search.store(fail, Ordering::SeqCst);
	}

	pub fn get_issue(&self, repo: &RepoTarget, number: u64) -> Option<MockIssueData> {
		self.issues.lock().unwrap().get(repo).and_then(|issues| issues.get(&number)).cloned()
	}

	/// Get the call log for debugging
	pub fn get_call_log(&self) -> Vec<String> {
		self.call_log.lock().unwrap().clone()
	}

	/// Clear the call log
	pub fn clear_call_log(&self) {
		self.call_log.lock().unwrap().clear();
	}

	fn log_call(&self, call: &str) {
		self.call_log.lock().unwrap().push(call.to_string());
	}
}

#[async_trait]
impl GitHubClient for MockGitHubClient {
	#[instrument(skip(self, issue), name = "MockGitHubClient::create_issue")]
	async fn create_issue(&self, repo: &RepoTarget, issue: &NewIssue) -> Result<CreatedIssue> {
		tracing::info!(target: "mock_github", owner = %repo.owner, repo = %repo.repo, title = %issue.title, "create_issue");
		self.log_call(&format!("create_issue({repo}, {}, <body>)", issue.title));

		if self.fail_titles.lock().unwrap().iter().any(|p| issue.title.contains(p.as_str())) {
			bail!("Failed to create issue: 422 Unprocessable Entity - Validation Failed");
		}

		let number = self.next_issue_number.fetch_add(1, Ordering::SeqCst);
		let data = MockIssueData {
			number,
			title: issue.title.clone(),
			body: issue.body.clone(),
			labels: issue.labels.clone(),
			assignees: issue.assignees.clone(),
			milestone: issue.milestone,
		};
		self.issues.lock().unwrap().entry(repo.clone()).or_default().insert(number, data);

		Ok(CreatedIssue {
			number,
			html_url: format!("https://github.com/{}/{}/issues/{number}", repo.owner, repo.repo),
		})
	}

	/// Terms are split on ` OR `; an issue matches if its title or body contains any of them.
	/// Ranked by number of matching terms, then newest first.
	#[instrument(skip(self), name = "MockGitHubClient::search_issues")]
	async fn search_issues(&self, repo: &RepoTarget, query: &str) -> Result<Vec<SearchHit>> {
		tracing::info!(target: "mock_github", owner = %repo.owner, repo = %repo.repo, query, "search_issues");
		self.log_call(&format!("search_issues({repo}, {query})"));

		if self.fail_search.load(Ordering::SeqCst) {
			bail!("Failed to search issues: 503 Service Unavailable - search is temporarily disabled");
		}

		let terms: Vec<String> = query.split(" OR ").map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty()).collect();
		let issues = self.issues.lock().unwrap();
		let Some(repo_issues) = issues.get(repo) else {
			return Ok(Vec::new());
		};

		let mut scored: Vec<(usize, &MockIssueData)> = repo_issues
			.values()
			.map(|issue| {
				let haystack = format!("{}\n{}", issue.title, issue.body).to_lowercase();
				(terms.iter().filter(|t| haystack.contains(t.as_str())).count(), issue)
			})
			.filter(|(score, _)| *score > 0)
			.collect();
		scored.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then(b.number.cmp(&a.number)));

		Ok(scored.into_iter().take(10).map(|(_, issue)| SearchHit::new(issue.number, issue.title.clone())).collect())
	}
}

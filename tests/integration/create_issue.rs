//! `create-issue`: one prompt, one issue.

use rstest::{fixture, rstest};
use serde_json::json;

use crate::common::TestContext;

/// Repository `acme/widgets` configured as default, with a few existing issues to relate to.
#[fixture]
fn ctx() -> TestContext {
	let ctx = TestContext::new(
		r#"
repo = "acme/widgets"

[defaults]
assignees = ["octocat"]
"#,
	);
	ctx.setup_mock_state(&json!({
		"issues": [
			{ "owner": "acme", "repo": "widgets", "number": 1, "title": "Postgres connection pool exhausted" },
			{ "owner": "acme", "repo": "widgets", "number": 2, "title": "Connection timeout on startup" },
			{ "owner": "acme", "repo": "widgets", "number": 3, "title": "Dark mode" },
		],
		"fail_titles": ["Deploy"]
	}));
	ctx
}

#[rstest]
fn test_create_issue_links_related(ctx: TestContext) {
	let (status, stdout, stderr) = ctx.run(&["create-issue", "Fix postgres connection timeout [urgent]"]);
	assert!(status.success(), "stderr: {stderr}");
	assert!(stdout.contains("✓ Created #4: Fix postgres connection timeout"), "stdout: {stdout}");
	assert!(stdout.contains("https://github.com/acme/widgets/issues/4"));

	let trace = ctx.trace();
	assert_traced!(trace, "search_issues", "acme", "widgets");
	assert_traced!(trace, "create_issue", "acme", "widgets");
	assert_eq!(trace.search_queries(), vec!["postgres OR connection OR timeout"]);
	assert_eq!(trace.created_titles(), vec!["Fix postgres connection timeout"]);

	let created = trace.created_events();
	assert_eq!(created.len(), 1);
	assert_eq!(created[0].fields.number, Some(4));
	assert_eq!(created[0].fields.related.as_deref(), Some("[2, 1]"));
}

#[rstest]
fn test_create_issue_no_related(ctx: TestContext) {
	let (status, _stdout, stderr) = ctx.run(&["create-issue", "Fix postgres connection timeout", "--no-related"]);
	assert!(status.success(), "stderr: {stderr}");

	let trace = ctx.trace();
	assert!(!trace.has_mock_call("search_issues"));
	assert_traced!(trace, "create_issue");
	assert_eq!(trace.created_events()[0].fields.related.as_deref(), Some("[]"));
}

#[rstest]
fn test_create_issue_manual_links_are_kept(ctx: TestContext) {
	let (status, _stdout, stderr) = ctx.run(&[
		"create-issue",
		"Fix postgres connection timeout",
		"--relates-to",
		"#2",
		"--depends-on",
		"https://github.com/acme/widgets/issues/1",
	]);
	assert!(status.success(), "stderr: {stderr}");

	// #2 was linked by hand and #1 is a dependency, so neither is added again as related.
	assert_eq!(ctx.trace().created_events()[0].fields.related.as_deref(), Some("[2]"));
}

#[rstest]
fn test_create_issue_rejects_foreign_reference(ctx: TestContext) {
	let (status, _stdout, stderr) = ctx.run(&["create-issue", "Task", "--blocks", "https://github.com/other/repo/issues/9"]);
	assert!(!status.success());
	assert!(stderr.contains("other/repo"), "stderr: {stderr}");
	assert!(!ctx.trace().has_mock_call("create_issue"));
}

#[rstest]
fn test_create_issue_failure(ctx: TestContext) {
	let (status, stdout, _stderr) = ctx.run(&["create-issue", "Deploy the new build", "--no-related"]);
	assert!(!status.success());
	assert!(stdout.contains("✗ Failed: Deploy the new build:"), "stdout: {stdout}");
	assert!(stdout.contains("422"));
	assert!(ctx.trace().created_events().is_empty());
}

#[rstest]
fn test_create_issue_dry_run(ctx: TestContext) {
	let (status, stdout, stderr) = ctx.run(&["create-issue", "Add caching [high]\nUse an LRU", "--labels", "perf,backend", "--milestone", "4", "--dry-run"]);
	assert!(status.success(), "stderr: {stderr}");
	insta::assert_snapshot!(stdout, @r"
	Title: Add caching
	Priority: high
	Labels: backend, high-priority, perf, todo
	Assignees: octocat
	Milestone: 4

	Use an LRU

	## Checklist
	- [ ] Define task requirements
	- [ ] Implement initial solution
	- [ ] Write/update tests
	- [ ] Review and refine
	- [ ] Submit PR
	");
	assert!(ctx.trace().mock_calls().is_empty());
}

#[rstest]
fn test_create_issue_explicit_repo(ctx: TestContext) {
	let (status, stdout, stderr) = ctx.run(&["create-issue", "Write docs", "--repo", "acme/docs"]);
	assert!(status.success(), "stderr: {stderr}");
	assert!(stdout.contains("✓ Created #4: Write docs"));
	assert!(stdout.contains("https://github.com/acme/docs/issues/4"));
	assert_traced!(ctx.trace(), "create_issue", "acme", "docs");
}

#[test]
fn test_create_issue_requires_repo() {
	let ctx = TestContext::new("");
	let (status, _stdout, stderr) = ctx.run(&["create-issue", "Task"]);
	assert!(!status.success());
	assert!(stderr.contains("--repo"), "stderr: {stderr}");
}

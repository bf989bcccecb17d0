//! `create-issues`: a list of prompts, one issue each, with partial failure reporting.

use rstest::{fixture, rstest};
use serde_json::json;

use crate::common::TestContext;

#[fixture]
fn ctx() -> TestContext {
	let ctx = TestContext::new(r#"repo = "acme/widgets""#);
	ctx.setup_mock_state(&json!({ "fail_titles": ["Fix bug"] }));
	ctx
}

const LIST: &str = "- Add logging\n- Fix bug [urgent]\n- Write tests\n";

#[rstest]
fn test_batch_reports_partial_failure(ctx: TestContext) {
	let file = ctx.write("issues.md", LIST);
	let (status, stdout, _stderr) = ctx.run(&["create-issues", "--file", file.to_str().unwrap(), "--yes"]);

	assert!(!status.success(), "a failed item makes the whole run fail");
	assert!(stdout.contains("Found 3 issues to create in acme/widgets:"), "stdout: {stdout}");
	assert!(stdout.contains("  2. Fix bug [urgent]"));

	let results: Vec<&str> = stdout.lines().filter(|l| l.starts_with('✓') || l.starts_with('✗')).collect();
	assert_eq!(results.len(), 3, "stdout: {stdout}");
	assert_eq!(results[0], "✓ Created #1: Add logging");
	assert!(results[1].starts_with("✗ Failed: Fix bug: "), "{}", results[1]);
	assert_eq!(results[2], "✓ Created #2: Write tests");
	assert!(stdout.contains("Created 2/3 issues."));

	assert_eq!(ctx.trace().created_titles(), vec!["Add logging", "Fix bug", "Write tests"]);
}

#[rstest]
fn test_batch_from_stdin(ctx: TestContext) {
	let (status, stdout, stderr) = ctx.run_with_stdin(&["create-issues", "--yes", "--no-related"], "1. Create API endpoint\n2. Add validation\n");
	assert!(status.success(), "stderr: {stderr}");
	assert!(stdout.contains("✓ Created #1: Create API endpoint"));
	assert!(stdout.contains("✓ Created #2: Add validation"));
	assert!(stdout.contains("Created 2/2 issues."));
	assert!(!ctx.trace().has_mock_call("search_issues"));
}

#[rstest]
fn test_batch_fail_fast(ctx: TestContext) {
	let file = ctx.write("issues.md", LIST);
	let (status, stdout, _stderr) = ctx.run(&["create-issues", "--file", file.to_str().unwrap(), "--yes", "--fail-fast"]);

	assert!(!status.success());
	assert!(stdout.contains("✓ Created #1: Add logging"));
	assert!(stdout.contains("✗ Failed: Fix bug"));
	assert!(!stdout.contains("Created #2"), "stdout: {stdout}");
	assert!(stdout.contains("- Skipped: Write tests"), "stdout: {stdout}");
	assert!(!stdout.contains("- Skipped: Fix bug"));
	assert!(stdout.contains("Created 1/3 issues."));
	assert_eq!(ctx.trace().created_titles(), vec!["Add logging", "Fix bug"]);
}

#[rstest]
fn test_batch_concurrent_keeps_input_order(ctx: TestContext) {
	let file = ctx.write("issues.md", "Alpha\n\nFix bug\n\nGamma\n\nDelta\n");
	let (status, stdout, _stderr) = ctx.run(&["create-issues", "--file", file.to_str().unwrap(), "--yes", "--jobs", "3", "--no-related"]);

	assert!(!status.success());
	let results: Vec<&str> = stdout.lines().filter(|l| l.starts_with('✓') || l.starts_with('✗')).collect();
	assert_eq!(results.len(), 4, "stdout: {stdout}");
	assert!(results[0].ends_with(": Alpha"));
	assert!(results[1].starts_with("✗ Failed: Fix bug: "), "{}", results[1]);
	assert!(results[2].ends_with(": Gamma"));
	assert!(results[3].ends_with(": Delta"));
	assert!(stdout.contains("Created 3/4 issues."));
}

#[rstest]
fn test_batch_requires_confirmation_without_terminal(ctx: TestContext) {
	let file = ctx.write("issues.md", LIST);
	let (status, _stdout, stderr) = ctx.run(&["create-issues", "--file", file.to_str().unwrap()]);
	assert!(!status.success());
	assert!(stderr.contains("--yes"), "stderr: {stderr}");
	assert!(!ctx.trace().has_mock_call("create_issue"));
}

#[rstest]
fn test_batch_dry_run(ctx: TestContext) {
	let file = ctx.write("issues.md", LIST);
	let (status, stdout, stderr) = ctx.run(&["create-issues", "--file", file.to_str().unwrap(), "--dry-run"]);
	assert!(status.success(), "stderr: {stderr}");
	insta::assert_snapshot!(stdout, @r"
	Found 3 issues to create in acme/widgets:
	  1. Add logging
	  2. Fix bug [urgent]
	  3. Write tests
	");
	assert!(ctx.trace().mock_calls().is_empty());
}

#[rstest]
fn test_batch_empty_input(ctx: TestContext) {
	let (status, _stdout, stderr) = ctx.run_with_stdin(&["create-issues", "--yes"], "\n\n");
	assert!(!status.success());
	assert!(stderr.contains("No issues found"), "stderr: {stderr}");
}

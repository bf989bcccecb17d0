//! `parse`: offline preview, never touches GitHub.

use crate::common::TestContext;

#[test]
fn test_parse_single_preview() {
	let ctx = TestContext::new("");
	let (status, stdout, stderr) = ctx.run(&["parse", "Fix login redirect [urgent]\nUsers land on /404 after SSO", "--start"]);
	assert!(status.success(), "stderr: {stderr}");
	insta::assert_snapshot!(stdout, @r"
	Title: Fix login redirect
	Priority: urgent
	Labels: high-priority, in-progress

	Users land on /404 after SSO

	## Checklist
	- [ ] Define task requirements
	- [ ] Implement initial solution
	- [ ] Write/update tests
	- [ ] Review and refine
	- [ ] Submit PR
	");
	assert!(ctx.trace().mock_calls().is_empty());
}

#[test]
fn test_parse_multiple_json() {
	let ctx = TestContext::new("");
	let (status, stdout, stderr) = ctx.run_with_stdin(&["parse", "--multiple", "--json"], "* Add logging [low]\n* Fix bug [high priority]\n");
	assert!(status.success(), "stderr: {stderr}");

	let previews: serde_json::Value = serde_json::from_str(&stdout).unwrap();
	let previews = previews.as_array().unwrap();
	assert_eq!(previews.len(), 2);
	assert_eq!(previews[0]["title"], "Add logging");
	assert_eq!(previews[0]["priority"], "low");
	assert_eq!(previews[0]["status"], "todo");
	assert_eq!(previews[0]["labels"], serde_json::json!(["todo"]));
	assert_eq!(previews[1]["title"], "Fix bug");
	assert_eq!(previews[1]["labels"], serde_json::json!(["high-priority", "todo"]));
	assert!(previews[1]["body"].as_str().unwrap().starts_with("## Checklist\n- [ ] Define task requirements"));
	assert!(previews[1].get("assignees").is_none());
}

#[test]
fn test_parse_uses_configured_checklist() {
	let ctx = TestContext::new(
		r#"
[defaults]
checklist = ["Reproduce", "Fix"]
"#,
	);
	let file = ctx.write("prompt.txt", "Crash on save");
	let (status, stdout, stderr) = ctx.run(&["parse", "--file", file.to_str().unwrap()]);
	assert!(status.success(), "stderr: {stderr}");
	assert!(stdout.contains("## Checklist\n- [ ] Reproduce\n- [ ] Fix\n"), "stdout: {stdout}");
	assert!(!stdout.contains("Submit PR"));
}

#[test]
fn test_parse_empty_prompt_fails() {
	let ctx = TestContext::new("");
	let (status, _stdout, stderr) = ctx.run(&["parse", "[urgent]"]);
	assert!(!status.success());
	assert!(stderr.contains("prompt has no title"), "stderr: {stderr}");
}

#[test]
fn test_completions() {
	let ctx = TestContext::new("");
	let (status, stdout, _stderr) = ctx.run(&["completions", "bash"]);
	assert!(status.success());
	assert!(stdout.contains("todo-issues"));
	assert!(stdout.contains("create-issues"));
}

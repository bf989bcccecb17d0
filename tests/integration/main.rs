//! Integration tests entry point, following https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
//!
//! Every test runs the compiled binary in `--mock` mode, so no network access is needed.


mod create_issue;
mod create_issues;
mod parse;

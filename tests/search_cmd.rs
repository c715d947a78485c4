//! Ensure correct behavior of the search command.
use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;

/// A command pointed at the given mock server.
fn search_cmd(server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.arg("search");
    cmd.arg("--github-api-url").arg(server.base_url());
    cmd
}

#[test]
fn matching_users_are_listed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/search/users")
            .query_param("q", "octo")
            .query_param("per_page", "10");
        then.status(200).json_body(json!({
            "total_count": 2,
            "items": [
                {"login": "octocat", "name": "The Octocat", "bio": "I exist", "company": "@github"},
                {"login": "octofan"}
            ]
        }));
    });

    search_cmd(&server)
        .arg("octo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 users:"))
        .stdout(predicate::str::contains(
            "  octocat - The Octocat (I exist) [@github]",
        ))
        .stdout(predicate::str::contains("  octofan - octofan"));
}

#[test]
fn no_matches_prints_notice_and_succeeds() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search/users");
        then.status(200)
            .json_body(json!({"total_count": 0, "items": []}));
    });

    search_cmd(&server)
        .arg("nobody-anywhere")
        .assert()
        .success()
        .stdout(predicate::str::contains("No users found matching your query."));
}

/// Search is advisory, upstream failures do not affect the exit code.
#[test]
fn upstream_failure_still_exits_successfully() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search/users");
        then.status(500);
    });

    search_cmd(&server)
        .arg("octo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error searching users:"));
}

/// The query reaches the server percent-encoded, spaces included.
#[test]
fn query_is_encoded_before_being_sent() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/search/users")
            .query_param("q", "john smith");
        then.status(200)
            .json_body(json!({"total_count": 0, "items": []}));
    });

    search_cmd(&server).arg("john smith").assert().success();

    mock.assert();
}

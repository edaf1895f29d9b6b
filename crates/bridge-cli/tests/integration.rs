#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;

const CONFIG_KEYS: &[&str] = &[
    "GOOGLE_SHEET_ID",
    "GOOGLE_SHEETS_TOKEN",
    "GOOGLE_SHEET_RANGE",
    "GOOGLE_SHEETS_API_URL",
    "GITHUB_ISSUE_API_URL",
    "GITHUB_TOKEN",
    "GITHUB_API_URL",
    "GITHUB_OWNER",
    "GITHUB_REPO",
    "HTTP_TIMEOUT_SECS",
    "PORT",
];

/// The binary with every bridge setting removed from its environment.
fn bridge() -> Command {
    let mut cmd = Command::cargo_bin("ticket-bridge").unwrap();
    for key in CONFIG_KEYS {
        cmd.env_remove(key);
    }
    cmd
}

fn configured(server: &mockito::ServerGuard) -> Command {
    let mut cmd = bridge();
    cmd.env("GOOGLE_SHEET_ID", "sheet-1")
        .env("GOOGLE_SHEETS_TOKEN", "sheets-token")
        .env("GOOGLE_SHEETS_API_URL", server.url())
        .env("GITHUB_ISSUE_API_URL", format!("{}/issues", server.url()))
        .env("GITHUB_OWNER", "acme")
        .env("GITHUB_REPO", "widgets");
    cmd
}

// ---------------------------------------------------------------------------
// ticket-bridge process
// ---------------------------------------------------------------------------

#[test]
fn process_without_configuration_fails_listing_keys() {
    bridge()
        .arg("process")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required configuration"))
        .stderr(predicate::str::contains("GOOGLE_SHEET_ID"))
        .stderr(predicate::str::contains("GITHUB_ISSUE_API_URL or GITHUB_TOKEN"));
}

#[test]
fn process_reports_no_data() {
    let mut server = mockito::Server::new();
    let rows = server
        .mock("GET", "/v4/spreadsheets/sheet-1/values/Sheet1!A2:H")
        .with_body(json!({"range": "Sheet1!A2:H", "majorDimension": "ROWS"}).to_string())
        .create();

    configured(&server)
        .arg("process")
        .assert()
        .success()
        .stdout(predicate::str::contains("No data found."));
    rows.assert();
}

#[test]
fn process_json_files_issue_and_prints_result() {
    let mut server = mockito::Server::new();
    let _rows = server
        .mock("GET", "/v4/spreadsheets/sheet-1/values/Sheet1!A2:H")
        .with_body(
            json!({
                "range": "Sheet1!A2:H",
                "majorDimension": "ROWS",
                "values": [["T-1", "Bug A", "desc", "EngineeringBug"]]
            })
            .to_string(),
        )
        .create();
    let issue = server
        .mock("POST", "/issues")
        .with_body(json!({"issue": {"number": 42, "state": "open"}}).to_string())
        .create();
    let write = server
        .mock("PUT", "/v4/spreadsheets/sheet-1/values/Sheet1!E2:G2")
        .match_query(mockito::Matcher::Any)
        .match_body(mockito::Matcher::PartialJson(
            json!({"values": [["Triggered", 42, "Open"]]}),
        ))
        .with_body(json!({"updatedCells": 3}).to_string())
        .create();

    let output = configured(&server)
        .args(["process", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let printed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(printed, json!({"result": "Tickets processed."}));
    issue.assert();
    write.assert();
}

#[test]
fn process_surfaces_upstream_failure() {
    let mut server = mockito::Server::new();
    let _rows = server
        .mock("GET", "/v4/spreadsheets/sheet-1/values/Sheet1!A2:H")
        .with_status(401)
        .with_body("Request had invalid authentication credentials.")
        .create();

    configured(&server)
        .arg("process")
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 401"));
}

// ---------------------------------------------------------------------------
// ticket-bridge serve
// ---------------------------------------------------------------------------

#[test]
fn serve_reads_port_even_when_other_settings_are_missing() {
    bridge()
        .arg("serve")
        .env("PORT", "not-a-port")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration value for PORT"));
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

#[test]
fn help_lists_subcommands() {
    bridge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("process"));
}

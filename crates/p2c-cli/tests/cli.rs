//! End-to-end tests for the papers2code binary

use assert_cmd::Command;
use p2c_core::PaperId;
use predicates::prelude::*;
use tempfile::TempDir;

const URL: &str = "https://arxiv.org/abs/1706.03762";
const OWNER: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

fn user(n: u8) -> String {
    format!("65a1f0c2e4b0a1b2c3d4e5{:02x}", n + 0x10)
}

fn papers2code(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("papers2code").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("PAPERS2CODE_CONFIG")
        .env_remove("PAPERS2CODE_DATA_DIR")
        .arg("--no-color");
    cmd
}

fn setup() -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    papers2code(&dir)
        .args(["init", "--owner", OWNER])
        .assert()
        .success();
    papers2code(&dir)
        .args(["paper", "add", "--title", "Attention Is All You Need", "--url", URL])
        .assert()
        .success();
    (dir, PaperId::from_source(URL).to_string())
}

fn vote(dir: &TempDir, action: &str, paper: &str, voter: &str) -> assert_cmd::assert::Assert {
    papers2code(dir)
        .args(["vote", action, paper, "--user", voter])
        .assert()
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    papers2code(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("vote"));
}

#[test]
fn test_three_confirms_reach_confirmed() {
    let (dir, paper) = setup();

    vote(&dir, "confirm", &paper, &user(1)).success();
    papers2code(&dir)
        .args(["paper", "show", &paper, "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("flagged_non_implementable"));

    vote(&dir, "confirm", &paper, &user(2)).success();
    vote(&dir, "confirm", &paper, &user(3)).success();

    papers2code(&dir)
        .args(["paper", "show", &paper, "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("confirmed_non_implementable"))
        .stdout(predicate::str::contains("\"confirm_votes\": 3"));
}

#[test]
fn test_duplicate_vote_fails() {
    let (dir, paper) = setup();

    vote(&dir, "confirm", &paper, &user(1)).success();
    vote(&dir, "confirm", &paper, &user(1))
        .failure()
        .stderr(predicate::str::contains("Duplicate vote"));
}

#[test]
fn test_retract_without_vote_fails() {
    let (dir, paper) = setup();

    vote(&dir, "retract", &paper, &user(1))
        .failure()
        .stderr(predicate::str::contains("No vote to retract"));
}

#[test]
fn test_admin_lock_blocks_votes() {
    let (dir, paper) = setup();

    papers2code(&dir)
        .args(["admin", "set", &paper, "--admin", OWNER, "implementable", "--yes"])
        .assert()
        .success();

    vote(&dir, "confirm", &paper, &user(1))
        .failure()
        .stderr(predicate::str::contains("locked by an owner"));

    papers2code(&dir)
        .args(["upvote", &paper, "--user", &user(1), "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("admin_implementable"));
}

#[test]
fn test_non_owner_rejected() {
    let (dir, paper) = setup();

    papers2code(&dir)
        .args(["admin", "set", &paper, "--admin", &user(4), "non-implementable", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not allowed"));
}

#[test]
fn test_invalid_ids_rejected() {
    let (dir, _) = setup();

    vote(&dir, "confirm", "not-a-paper", &user(1))
        .failure()
        .stderr(predicate::str::contains("Invalid paper ID"));
}

#[test]
fn test_votes_and_audit() {
    let (dir, paper) = setup();

    vote(&dir, "dispute", &paper, &user(1)).success();
    papers2code(&dir)
        .args(["votes", &user(1), "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dispute_non_implementable"));

    papers2code(&dir)
        .args(["paper", "audit", &paper])
        .assert()
        .success()
        .stdout(predicate::str::contains("Counters match"));
}

#[test]
fn test_config_validate() {
    let (dir, _) = setup();

    papers2code(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

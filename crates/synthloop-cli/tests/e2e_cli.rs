//! E2E CLI tests covering:
//! - Catalog resolution (`--catalog`, `synthloop.toml`, `--config`)
//! - Item and relation commands (`show`, `search`, `uses`, `ingredients`, `explain`)
//! - Loop discovery (`loops pairs`, `loops find`) including budgets
//! - Error codes on stderr and exit status
//!
//! Each test runs the `synthloop` binary as a subprocess in an isolated temp
//! directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

const WORKSHOP: &str = "\
Name,Type,Ingredient 1,Ingredient 2,Effects,Include
Uni,(Plants); (Gunpowder),,,,yes
Craft,(Gunpowder); (Bombs),(Gunpowder),(Fuel),Blast,yes
Kindling Coal,(Fuel),(Bombs),,Heat,yes
Old Coal,(Fuel),(Bombs),,,no
Spark,(Element),Cinder,,,yes
Flame,(Element),Spark,,,yes
Cinder,(Element),Flame,,,yes
";

/// Build a Command targeting the synthloop binary, rooted in `dir`.
fn sl_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("synthloop"));
    cmd.current_dir(dir);
    cmd.env("SYNTHLOOP_LOG", "error");
    cmd.env("NO_COLOR", "1");
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd.env_remove("FORMAT");
    cmd
}

/// Temp project with `workshop.csv` and a `synthloop.toml` pointing at it.
fn workshop_project() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("workshop.csv"), WORKSHOP).expect("write catalog");
    std::fs::write(
        dir.path().join("synthloop.toml"),
        "[catalog]\npaths = [\"workshop.csv\"]\n",
    )
    .expect("write config");
    dir
}

fn json_of(dir: &Path, args: &[&str]) -> Value {
    let output = sl_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("synthloop should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

// ---------------------------------------------------------------------------
// Catalog resolution
// ---------------------------------------------------------------------------

#[test]
fn missing_catalog_reports_code() {
    let dir = TempDir::new().expect("temp dir");
    sl_cmd(dir.path())
        .args(["stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1002]"))
        .stderr(predicate::str::contains("--catalog"));
}

#[test]
fn catalog_flag_overrides_config() {
    let dir = workshop_project();
    std::fs::write(dir.path().join("solo.yaml"), "items:\n  - Name: Solo\n").expect("write");

    let json = json_of(dir.path(), &["-c", "solo.yaml", "stats"]);
    assert_eq!(json["item_count"], 1);
}

#[test]
fn catalog_flags_on_both_sides_of_subcommand_are_combined() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("materials.csv"),
        "Name,Type,Recipe\nBellows,(Tool),(Metal)\n",
    )
    .expect("write materials");
    std::fs::write(
        dir.path().join("recipes.yaml"),
        "items:\n  - Name: Ingot\n    Type: [(Metal)]\n    Recipe: [Forge]\n  \
         - Name: Forge\n    Type: [(Station)]\n    Recipe: [Bellows]\n",
    )
    .expect("write recipes");

    sl_cmd(dir.path())
        .args([
            "-c",
            "materials.csv",
            "--format",
            "text",
            "loops",
            "find",
            "-n",
            "3",
            "Bellows",
            "-S",
            "-c",
            "recipes.yaml",
        ])
        .assert()
        .success()
        .stdout("Bellows -> Forge -> Ingot -> Bellows\n");

    let json = json_of(
        dir.path(),
        &["-c", "materials.csv", "stats", "--catalog", "recipes.yaml"],
    );
    assert_eq!(json["item_count"], 3);

    // Without the leading flag only the recipes file is loaded.
    sl_cmd(dir.path())
        .args(["loops", "find", "-n", "3", "Bellows", "-c", "recipes.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2001]"));
}

#[test]
fn excluded_rows_are_not_loaded() {
    let dir = workshop_project();
    let json = json_of(dir.path(), &["stats"]);
    assert_eq!(json["item_count"], 6);

    sl_cmd(dir.path())
        .args(["show", "Old Coal"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2001]"));
}

#[test]
fn explicit_config_file_is_used() {
    let dir = workshop_project();
    std::fs::create_dir_all(dir.path().join("conf")).expect("mkdir");
    std::fs::write(
        dir.path().join("conf/alt.toml"),
        "[catalog]\npaths = [\"../workshop.csv\"]\n\n[search]\nunique_rotations = true\n",
    )
    .expect("write config");

    let json = json_of(
        dir.path(),
        &["--config", "conf/alt.toml", "loops", "find", "-n", "3"],
    );
    assert_eq!(json["count"], 1);
}

#[test]
fn malformed_config_reports_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("synthloop.toml"), "[catalog\n").expect("write");
    sl_cmd(dir.path())
        .args(["stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1001]"));
}

// ---------------------------------------------------------------------------
// Items and relations
// ---------------------------------------------------------------------------

#[test]
fn show_json_lists_neighbours() {
    let dir = workshop_project();
    let json = json_of(dir.path(), &["show", "Craft"]);
    assert_eq!(json["name"], "Craft");
    assert_eq!(json["recipe"], serde_json::json!(["(Gunpowder)", "(Fuel)"]));
    assert_eq!(json["used_in"], serde_json::json!(["Kindling Coal"]));
    assert_eq!(
        json["made_from"],
        serde_json::json!(["Uni", "Craft", "Kindling Coal"])
    );
}

#[test]
fn search_by_name_and_category() {
    let dir = workshop_project();
    sl_cmd(dir.path())
        .args(["--format", "text", "search", "co"])
        .assert()
        .success()
        .stdout("Kindling Coal\n");

    sl_cmd(dir.path())
        .args(["--format", "text", "search", "(Element)"])
        .assert()
        .success()
        .stdout("Spark\nFlame\nCinder\n");
}

#[test]
fn uses_and_ingredients_text() {
    let dir = workshop_project();
    sl_cmd(dir.path())
        .args(["--format", "text", "uses", "Uni"])
        .assert()
        .success()
        .stdout("Craft\t(Gunpowder)\n");

    sl_cmd(dir.path())
        .args(["--format", "text", "ingredients", "Kindling Coal"])
        .assert()
        .success()
        .stdout("Craft\t(Bombs)\n");
}

#[test]
fn explain_reports_mutual_relation() {
    let dir = workshop_project();
    let json = json_of(dir.path(), &["explain", "Craft", "Kindling Coal"]);
    assert_eq!(json["relation"], "mutual");
    assert_eq!(json["links"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["links"][0]["matched"], "(Bombs)");
}

#[test]
fn unknown_item_json_error() {
    let dir = workshop_project();
    let output = sl_cmd(dir.path())
        .args(["uses", "Nope", "--json"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stderr).expect("JSON error");
    assert_eq!(json["error"]["error_code"], "E2001");
    assert_eq!(json["error"]["message"], "item not found: Nope");
}

// ---------------------------------------------------------------------------
// Loops
// ---------------------------------------------------------------------------

#[test]
fn pairs_for_one_item() {
    let dir = workshop_project();
    sl_cmd(dir.path())
        .args(["--format", "text", "loops", "pairs", "--item", "Craft"])
        .assert()
        .success()
        .stdout("Craft\tKindling Coal\n");
}

#[test]
fn find_lists_every_rotation() {
    let dir = workshop_project();
    sl_cmd(dir.path())
        .args(["--format", "text", "loops", "find", "--size", "3", "-S"])
        .assert()
        .success()
        .stdout(
            "Spark -> Flame -> Cinder -> Spark\n\
             Flame -> Cinder -> Spark -> Flame\n\
             Cinder -> Spark -> Flame -> Cinder\n",
        );
}

#[test]
fn find_json_contract() {
    let dir = workshop_project();
    let json = json_of(
        dir.path(),
        &["loops", "find", "-n", "3", "Flame", "--having", "Spark"],
    );
    assert_eq!(json["size"], 3);
    assert_eq!(json["start"], "item Flame");
    assert_eq!(json["count"], 1);
    assert_eq!(json["truncated"], false);
    assert_eq!(
        json["loops"][0]["members"],
        serde_json::json!(["Flame", "Cinder", "Spark"])
    );
    assert_eq!(json["loops"][0]["links"].as_array().map(Vec::len), Some(3));
}

#[test]
fn find_from_category_start() {
    let dir = workshop_project();
    sl_cmd(dir.path())
        .args(["--format", "text", "loops", "find", "-n", "2", "--category", "Fuel", "-S"])
        .assert()
        .success()
        .stdout("Kindling Coal -> Craft -> Kindling Coal\n");
}

#[test]
fn unknown_category_start_fails() {
    let dir = workshop_project();
    sl_cmd(dir.path())
        .args(["loops", "find", "-n", "2", "(Nothing)"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2002]"));
}

#[test]
fn step_budget_truncates_with_notice() {
    let dir = workshop_project();
    let output = sl_cmd(dir.path())
        .args(["--format", "json", "loops", "find", "-n", "3", "--max-steps", "1"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["truncated"], true);
    assert_eq!(json["steps"], 1);
    assert_eq!(json["stopped_at"], "step limit 1");

    sl_cmd(dir.path())
        .args(["--format", "text", "loops", "find", "-n", "3", "--max-steps", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("note: search stopped"));
}

#[test]
fn completions_do_not_need_a_catalog() {
    let dir = TempDir::new().expect("temp dir");
    sl_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("synthloop"));
}

use assert_cmd::Command;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const HEADER: &str = "Title,List (Bucket),Description,Start Date,Due Date,Assigned To,Labels";

fn fixture(stem: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{stem}.json")).unwrap()
}

fn trello_csv() -> Command {
    let mut cmd = Command::cargo_bin("trello-csv").unwrap();
    // Keep a user's real config.toml out of the picture.
    cmd.env("XDG_CONFIG_HOME", "/nonexistent/trello-csv-tests");
    cmd
}

fn csv_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".csv"))
        .collect();
    names.sort();
    names
}

#[test]
fn demo_board_converts_to_expected_csv() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("export.json");
    fs::write(&input, fixture("demo")).unwrap();

    trello_csv().arg(&input).assert().success();

    let csv = fs::read_to_string(dir.path().join("Demo.csv")).unwrap();
    assert_eq!(csv, format!("{HEADER}\nTask A,To Do,,,,,\n"));
}

#[test]
fn full_board_matches_snapshot() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sprint.json");
    fs::write(&input, fixture("sprint")).unwrap();

    trello_csv().arg(&input).arg("-q").assert().success();

    let expected = fs::read_to_string("tests/fixtures/sprint.csv").unwrap();
    let actual = fs::read_to_string(dir.path().join("Sprint 12_ Q3_Q4.csv")).unwrap();
    assert_eq!(actual, expected);
}

#[rstest]
#[case::fresh(&[], "Demo.csv")]
#[case::one_taken(&["Demo.csv"], "Demo_1.csv")]
#[case::two_taken(&["Demo.csv", "Demo_1.csv"], "Demo_2.csv")]
fn derived_names_never_overwrite(#[case] existing: &[&str], #[case] expected: &str) {
    let dir = tempdir().unwrap();
    let input = dir.path().join("export.json");
    fs::write(&input, fixture("demo")).unwrap();
    for name in existing {
        fs::write(dir.path().join(name), "untouched").unwrap();
    }

    trello_csv().arg(&input).assert().success();

    assert!(dir.path().join(expected).exists());
    for name in existing {
        assert_eq!(fs::read_to_string(dir.path().join(name)).unwrap(), "untouched");
    }
}

#[test]
fn explicit_output_is_overwritten_verbatim() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("export.json");
    let output = dir.path().join("mine.csv");
    fs::write(&input, fixture("demo")).unwrap();
    fs::write(&output, "old contents").unwrap();

    trello_csv().arg(&input).arg(&output).assert().success();

    assert!(fs::read_to_string(&output).unwrap().starts_with(HEADER));
    assert_eq!(csv_files(dir.path()), ["mine.csv"]);
}

#[test]
fn bom_flag_prefixes_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("export.json");
    let output = dir.path().join("out.csv");
    fs::write(&input, fixture("demo")).unwrap();

    trello_csv().arg(&input).arg(&output).arg("--bom").assert().success();

    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBFTitle,"));
}

#[test]
fn directory_with_a_malformed_file_reports_and_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("alpha.json"), fixture("demo")).unwrap();
    fs::write(dir.path().join("beta.json"), fixture("sprint")).unwrap();
    fs::write(dir.path().join("broken.json"), "{\"cards\": [").unwrap();

    trello_csv()
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.json"))
        .stdout(predicate::str::is_empty());

    assert_eq!(csv_files(dir.path()), ["alpha.csv", "beta.csv"]);
}

#[test]
fn directory_into_separate_target() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("alpha.json"), fixture("demo")).unwrap();
    fs::write(input.join("notes.txt"), "ignored").unwrap();

    trello_csv().arg(&input).arg(&output).assert().success();

    assert_eq!(csv_files(&output), ["alpha.csv"]);
    assert!(csv_files(&input).is_empty());
}

#[test]
fn single_malformed_file_fails_with_path_in_message() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.json");
    fs::write(&input, "[]").unwrap();

    trello_csv()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.json"));

    assert!(csv_files(dir.path()).is_empty());
}

#[test]
fn missing_input_fails() {
    let dir = tempdir().unwrap();
    trello_csv()
        .arg(dir.path().join("nothing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn config_file_supplies_output_dir_and_bom() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("from-config");
    let config = dir.path().join("config.toml");
    let input = dir.path().join("export.json");
    fs::write(&input, fixture("demo")).unwrap();
    fs::write(
        &config,
        format!("output_dir = {:?}\nbom = true\n", out.to_string_lossy()),
    )
    .unwrap();

    trello_csv()
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let bytes = fs::read(out.join("Demo.csv")).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
}

#[test]
fn explicit_config_must_exist() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("export.json");
    fs::write(&input, fixture("demo")).unwrap();

    trello_csv()
        .arg(&input)
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn no_bom_flag_overrides_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let input = dir.path().join("export.json");
    let output = dir.path().join("plain.csv");
    fs::write(&input, fixture("demo")).unwrap();
    fs::write(&config, "bom = true\n").unwrap();

    trello_csv()
        .arg(&input)
        .arg(&output)
        .arg("--config")
        .arg(&config)
        .arg("--no-bom")
        .assert()
        .success();

    assert!(fs::read(&output).unwrap().starts_with(b"Title,"));
}

#[test]
fn batch_failure_is_reported_once() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("alpha.json"), fixture("demo")).unwrap();
    fs::write(dir.path().join("broken.json"), "{").unwrap();

    trello_csv()
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::function(|err: &str| {
            err.matches("broken.json").count() == 1
        }))
        .stderr(predicate::str::contains("1 failed"));
}

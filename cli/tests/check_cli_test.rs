use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::error::Error;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn clean_file_exits_zero() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let script_path = dir.path().join("clean.tess");
    fs::write(
        &script_path,
        r#"let$ greeting = "hello";
func$ greet(name) {
    ::print(greeting, name);
}
greet("world");
"#,
    )?;

    let mut cmd = Command::cargo_bin("tess")?;
    cmd.current_dir(dir.path());
    cmd.args(["check", script_path.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("0 error(s), 0 warning(s)"));

    Ok(())
}

#[test]
fn reports_unprefixed_builtin() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let script_path = dir.path().join("bad.tess");
    fs::write(&script_path, "print(\"hi\");\n")?;

    let mut cmd = Command::cargo_bin("tess")?;
    cmd.current_dir(dir.path());
    cmd.args(["check", script_path.to_str().unwrap()]);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains(
            "bad.tess:1:1: error[unprefixed-builtin]: Built-in function 'print' should be prefixed with :: (use '::print')",
        ));

    Ok(())
}

#[test]
fn warnings_alone_do_not_fail() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let script_path = dir.path().join("warn.tess");
    fs::write(&script_path, "let$ x = 1\n")?;

    let mut cmd = Command::cargo_bin("tess")?;
    cmd.current_dir(dir.path());
    cmd.args(["check", script_path.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("warning[missing-terminator]"));

    Ok(())
}

#[test]
fn severity_override_turns_warnings_into_failures() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("warn.tess"), "let$ x = 1\n")?;
    fs::write(dir.path().join("tess.toml"), "[severity]\nmissing-terminator = \"error\"\n")?;

    let mut cmd = Command::cargo_bin("tess")?;
    cmd.current_dir(dir.path());
    cmd.args(["check", "warn.tess"]);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("error[missing-terminator]"));

    Ok(())
}

#[test]
fn json_output_lists_findings_per_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let script_path = dir.path().join("dict.tess");
    fs::write(&script_path, "let$ d = dict{\"a\": 1;\n")?;

    let mut cmd = Command::cargo_bin("tess")?;
    cmd.current_dir(dir.path());
    cmd.args(["check", "--format", "json", script_path.to_str().unwrap()]);
    let output = cmd.output()?;
    assert_eq!(output.status.code(), Some(1));

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let report = &reports[0];
    assert!(report["path"].as_str().unwrap_or_default().ends_with("dict.tess"));
    let codes: Vec<&str> = report["findings"]
        .as_array()
        .map(|fs| fs.iter().filter_map(|f| f["code"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(codes, vec!["unclosed-bracket", "unclosed-dict"]);

    Ok(())
}

#[test]
fn config_file_can_disable_checks() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let script_path = dir.path().join("bad.tess");
    fs::write(&script_path, "print(\"hi\")\n")?;
    fs::write(dir.path().join("tess.toml"), "disabled = [\"builtin-prefix\", \"terminators\"]\n")?;

    let mut cmd = Command::cargo_bin("tess")?;
    cmd.current_dir(dir.path());
    cmd.args(["check", "bad.tess"]);
    cmd.assert().success().stdout(predicate::str::is_empty());

    Ok(())
}

#[test]
fn invalid_config_is_a_usage_error() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let script_path = dir.path().join("ok.tess");
    let config_path = dir.path().join("lint.toml");
    fs::write(&script_path, "let$ x = 1;\n")?;
    fs::write(&config_path, "disabled = [\"spelling\"]\n")?;

    let mut cmd = Command::cargo_bin("tess")?;
    cmd.args([
        "check",
        "--config",
        config_path.to_str().unwrap(),
        script_path.to_str().unwrap(),
    ]);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("unknown check 'spelling'"));

    Ok(())
}

#[test]
fn missing_file_is_a_usage_error() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let mut cmd = Command::cargo_bin("tess")?;
    cmd.current_dir(dir.path());
    cmd.args(["check", "nope.tess"]);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read file 'nope.tess'"));

    Ok(())
}

#[test]
fn mask_blanks_strings_and_comments() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let script_path = dir.path().join("m.tess");
    fs::write(&script_path, "::print(\"a{b\"); # hi\n")?;

    let mut cmd = Command::cargo_bin("tess")?;
    cmd.args(["mask", "--code", script_path.to_str().unwrap()]);
    cmd.assert().success().stdout("::print(\"   \"); #   \n");

    let mut cmd = Command::cargo_bin("tess")?;
    cmd.args(["mask", script_path.to_str().unwrap()]);
    cmd.assert().success().stdout("::print(\"   \"); # hi\n");

    Ok(())
}

mod common;
use common::{fixture_config, polystruct, shapes_snapshot, shapes_workspace};

use std::fs;

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn generate_writes_artifacts_and_manifest() {
    let dir = shapes_workspace();
    let out = dir.path().join("out");

    let output = polystruct()
        .arg("generate")
        .arg(dir.path().join("shapes.json"))
        .arg("-o")
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert!(stdout(&output).contains("Shape.rs"));
    let expected = polystruct::generate(&shapes_snapshot(), &fixture_config()).unwrap();
    for artifact in &expected {
        assert_eq!(fs::read_to_string(out.join(&artifact.name)).unwrap(), artifact.source);
    }

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("polystruct-manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest["artifacts"]["Shape.rs"]["kind"], "sum_type");
    assert_eq!(manifest["artifacts"]["Task.delegates.rs"]["kind"], "delegates");
}

#[test]
fn second_run_rewrites_nothing() {
    let dir = shapes_workspace();
    let out = dir.path().join("out");
    let run = || {
        polystruct()
            .arg("generate")
            .arg(dir.path().join("shapes.json"))
            .arg("-o")
            .arg(&out)
            .output()
            .unwrap()
    };

    assert!(run().status.success());
    let second = run();
    assert!(second.status.success());
    assert!(!stdout(&second).contains("wrote"), "stdout: {}", stdout(&second));
}

#[test]
fn check_passes_when_fresh_and_fails_when_stale() {
    let dir = shapes_workspace();
    let out = dir.path().join("out");
    let snapshot = dir.path().join("shapes.json");

    let check = || {
        polystruct()
            .arg("generate")
            .arg(&snapshot)
            .arg("-o")
            .arg(&out)
            .arg("--check")
            .output()
            .unwrap()
    };

    let stale = check();
    assert_eq!(stale.status.code(), Some(1));
    assert!(stderr(&stale).contains("out of date"), "stderr: {}", stderr(&stale));
    assert!(!out.join("Shape.rs").exists());

    let write = polystruct().arg("generate").arg(&snapshot).arg("-o").arg(&out).output().unwrap();
    assert!(write.status.success());
    assert!(check().status.success());

    fs::write(out.join("Shape.rs"), "// hand edit\n").unwrap();
    assert_eq!(check().status.code(), Some(1));
}

#[test]
fn explicit_config_overrides_the_neighbouring_one() {
    let dir = shapes_workspace();
    let out = dir.path().join("out");
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[naming]\nstrip_prefix = \"\"\nfallback_prefix = \"Each\"\n").unwrap();

    let output = polystruct()
        .arg("generate")
        .arg(dir.path().join("shapes.json"))
        .arg("-o")
        .arg(&out)
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.join("EachIShape.rs").exists());
    let source = fs::read_to_string(out.join("EachIShape.rs")).unwrap();
    assert!(!source.contains("#[derive(Clone, Debug, PartialEq)]"));
}

#[test]
fn inspect_prints_tag_table_and_plan() {
    let dir = shapes_workspace();
    let output = polystruct()
        .arg("inspect")
        .arg(dir.path().join("shapes.json"))
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("sum type Shape (from IShape)"));
    assert!(text.contains("  2  Circle"));
    assert!(text.contains("  also dispatches INamed"));
    assert!(text.contains("host Task via base: TaskBase"));
    assert!(text.contains("host defined"));
}

#[test]
fn malformed_snapshot_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("broken.json");
    fs::write(&snapshot, "{ \"types\": [ { \"name\": 5 } ] }").unwrap();

    let output = polystruct()
        .arg("generate")
        .arg(&snapshot)
        .arg("-o")
        .arg(dir.path().join("out"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("snapshot error"), "stderr: {}", stderr(&output));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn bad_config_exits_with_error() {
    let dir = shapes_workspace();
    fs::write(dir.path().join("polystruct.toml"), "[emit]\nunknown = true\n").unwrap();

    let output = polystruct()
        .arg("inspect")
        .arg(dir.path().join("shapes.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("config error"), "stderr: {}", stderr(&output));
}

#[test]
fn missing_snapshot_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = polystruct()
        .arg("inspect")
        .arg(dir.path().join("nope.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("failed to read snapshot"));
}

#[test]
fn verbose_flag_logs_discovery() {
    let dir = shapes_workspace();
    let output = polystruct()
        .arg("-v")
        .arg("inspect")
        .arg(dir.path().join("shapes.json"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stderr(&output).contains("discovered sum type"), "stderr: {}", stderr(&output));
}

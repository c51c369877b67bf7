use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A slipway invocation pinned to a temp project root with a fixed context,
/// so no test ever touches kubectl.
fn slipway(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("slipway").unwrap();
    cmd.current_dir(dir.path())
        .env("SLIPWAY_ROOT", dir.path())
        .env("SLIPWAY_CONTEXT", "minikube")
        .env_remove("SLIPWAY_YES");
    cmd
}

fn write_config(dir: &TempDir, yaml: &str) {
    std::fs::write(dir.path().join("deploy.yaml"), yaml).unwrap();
}

// ---------------------------------------------------------------------------
// config resolution
// ---------------------------------------------------------------------------

#[test]
fn deploy_without_config_fails() {
    let dir = TempDir::new().unwrap();
    slipway(&dir)
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("deploy.yaml"));
}

#[test]
fn deploy_with_missing_name_fails() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "namespace: staging\n");
    slipway(&dir)
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("name"));
}

// ---------------------------------------------------------------------------
// confirmation guards
// ---------------------------------------------------------------------------

#[test]
fn deploy_declined_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "name: todo\n");
    slipway(&dir)
        .arg("deploy")
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("aborted"));
}

#[test]
fn undeploy_confirmation_mismatch_halts() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "name: todo\n");
    // Wrong confirmation string: must halt before any helm/kubectl call.
    // helm is absent in the test environment, so reaching it would fail loudly.
    slipway(&dir)
        .arg("undeploy")
        .write_stdin("not-the-target\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("confirmation did not match"));
}

#[test]
fn undeploy_prompt_names_the_target() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "name: todo\n");
    slipway(&dir)
        .arg("undeploy")
        .write_stdin("\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("minikube/todo"));
}

// ---------------------------------------------------------------------------
// push / markers
// ---------------------------------------------------------------------------

#[test]
fn push_is_noop_without_image_repo() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "name: todo\n");
    slipway(&dir)
        .arg("push")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to publish"));
}

#[test]
fn run_without_build_marker_points_at_build() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "name: todo\n");
    slipway(&dir)
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("slipway build"));
}

#[test]
fn clean_removes_marker_directory() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "name: todo\n");
    let markers = dir.path().join(".slipway/markers");
    std::fs::create_dir_all(&markers).unwrap();
    std::fs::write(
        markers.join("build"),
        "image_tag=todo:1\nlocal_image_ref=local/todo:1\n",
    )
    .unwrap();

    slipway(&dir).arg("clean").assert().success();
    assert!(!markers.exists());

    // idempotent
    slipway(&dir).arg("clean").assert().success();
}

// ---------------------------------------------------------------------------
// CLI surface
// ---------------------------------------------------------------------------

#[test]
fn help_lists_pipeline_commands() {
    let dir = TempDir::new().unwrap();
    slipway(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("deploy")
                .and(predicate::str::contains("undeploy"))
                .and(predicate::str::contains("backup")),
        );
}

//! rc-file injection lifecycle tests

mod common;

use predicates::prelude::*;

const MARKER_BEGIN: &str = "# >>> sprout shell integration >>>";
const MARKER_END: &str = "# <<< sprout shell integration <<<";

#[test]
fn test_inject_appends_marked_block() {
    let env = common::TestEnv::new();
    env.write_home_file(".bashrc", "# my rc\nalias ll='ls -la'\n");

    env.cmd()
        .args(["inject"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Injected"));

    let rc = env.read_home_file(".bashrc");
    assert!(rc.starts_with("# my rc\n"));
    assert!(rc.contains(MARKER_BEGIN));
    assert!(rc.contains("export SPROUT_CONFIG_DIR="));
    assert!(rc.contains("[ -f \"$SPROUT_CONFIG_DIR/shell.sh\" ]"));
    assert!(rc.contains(MARKER_END));
}

#[test]
fn test_repeated_inject_is_idempotent() {
    let env = common::TestEnv::new();
    env.write_home_file(".bashrc", "# my rc\n");

    env.cmd().args(["inject"]).assert().success();
    let after_first = env.read_home_file(".bashrc");

    env.cmd()
        .args(["inject"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already injected"));
    let after_second = env.read_home_file(".bashrc");

    assert_eq!(after_first, after_second);
}

#[test]
fn test_eject_restores_original_content() {
    let env = common::TestEnv::new();
    let original = "# my rc\nexport PATH=\"$HOME/bin:$PATH\"\n";
    env.write_home_file(".bashrc", original);

    env.cmd().args(["inject"]).assert().success();
    env.cmd()
        .args(["eject", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ejected"));

    assert_eq!(env.read_home_file(".bashrc"), original);
}

#[test]
fn test_eject_without_injection_reports_not_injected() {
    let env = common::TestEnv::new();
    env.write_home_file(".bashrc", "# my rc\n");

    env.cmd()
        .args(["eject", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sprout block"));
}

#[test]
fn test_inject_dry_run_previews_block() {
    let env = common::TestEnv::new();
    env.write_home_file(".bashrc", "# my rc\n");

    env.cmd()
        .args(["inject", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would inject"))
        .stdout(predicate::str::contains(MARKER_BEGIN));

    assert_eq!(env.read_home_file(".bashrc"), "# my rc\n");
}

#[test]
fn test_eject_dry_run_leaves_block() {
    let env = common::TestEnv::new();
    env.write_home_file(".bashrc", "# my rc\n");

    env.cmd().args(["inject"]).assert().success();
    let injected = env.read_home_file(".bashrc");

    env.cmd()
        .args(["eject", "--yes", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would remove"));

    assert_eq!(env.read_home_file(".bashrc"), injected);
}

#[test]
fn test_inject_creates_rc_file_when_missing() {
    let env = common::TestEnv::new();
    std::fs::create_dir_all(&env.home).expect("home");

    env.cmd().args(["inject"]).assert().success();

    let rc = env.read_home_file(".bashrc");
    assert!(rc.contains(MARKER_BEGIN));
}

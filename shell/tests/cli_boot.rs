//! CLI tests for the `shell` binary.
//!
//! Spawns the binary inside a scratch project and checks exit codes and output.

use std::process::Command;

use serde_json::Value;
use shell::exit_codes;
use shell::test_support::TestSite;

fn shell(site: &TestSite, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_shell"))
        .current_dir(site.root())
        .args(args)
        .output()
        .expect("run shell")
}

#[test]
fn boot_reports_bound_components() {
    let site = TestSite::new().expect("site");
    let output = shell(&site, &["boot"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(
        "boot: theme=dark bound=theme-select,debug-toggle,self-heal,suggestion-list tips=4"
    ));
    assert!(stdout.contains("[ThemeManager]"));
}

#[test]
fn boot_reports_debug_state() {
    let site = TestSite::new().expect("site");

    let quiet = shell(&site, &["boot"]);
    assert!(String::from_utf8_lossy(&quiet.stdout).contains("tips=4 debug=false"));

    let verbose = shell(&site, &["boot", "--debug"]);
    assert_eq!(verbose.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&verbose.stdout).contains("tips=4 debug=true"));
}

#[test]
fn boot_export_prints_json_logs() {
    let site = TestSite::new().expect("site");
    let output = shell(&site, &["boot", "--export", "--theme", "light"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let logs: Value = serde_json::from_slice(&output.stdout).expect("json on stdout");
    let namespaces: Vec<&str> = logs
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|module| module["namespace"].as_str())
        .collect();
    assert_eq!(
        namespaces,
        vec!["App", "ThemeManager", "DebugToggle", "SelfHeal", "Suggestions"]
    );
}

#[test]
fn unknown_theme_exits_invalid() {
    let site = TestSite::new().expect("site");
    let output = shell(&site, &["theme", "sepia"]);

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Theme must be one of: dark, light, high-contrast"));
}

#[test]
fn heal_renders_result() {
    let site = TestSite::new().expect("site");
    let output = shell(&site, &["heal", "--scope", "database", "--notes", "nightly"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("heal: ✅ All problems fixed automatically."));
}

#[test]
fn invalid_config_fails() {
    let site = TestSite::new().expect("site");
    site.write("shell.toml", "[ci]\nstep_timeout_secs = 0\n")
        .expect("write config");
    let output = shell(&site, &["tips"]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ci.step_timeout_secs must be > 0"));
}

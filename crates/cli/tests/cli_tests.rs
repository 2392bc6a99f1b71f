//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "harvester-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Scrape and index cluster metrics"),
        "Should show app description"
    );
    assert!(
        stdout.contains("--metrics-profile"),
        "Should show metrics-profile option"
    );
    assert!(
        stdout.contains("--metrics-directory"),
        "Should show metrics-directory option"
    );
    assert!(stdout.contains("--es-server"), "Should show es-server option");
    assert!(stdout.contains("--es-index"), "Should show es-index option");
    assert!(
        stdout.contains("--tarball-name"),
        "Should show tarball-name option"
    );
    assert!(
        stdout.contains("--user-metadata"),
        "Should show user-metadata option"
    );
    assert!(
        stdout.contains("--metrics-endpoint"),
        "Should show metrics-endpoint option"
    );
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "harvester-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("harvest"), "Should show binary name");
}

/// Test the documented defaults appear in help
#[test]
fn test_cli_defaults() {
    let output = Command::new("cargo")
        .args(["run", "-p", "harvester-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("metrics.yml"), "Should show profile default");
    assert!(
        stdout.contains("collected-metrics"),
        "Should show directory default"
    );
    assert!(
        stdout.contains("kube-burner-ocp-indexing"),
        "Should show job name default"
    );
}

/// Test environment variable fallbacks are documented
#[test]
fn test_cli_env_fallbacks() {
    let output = Command::new("cargo")
        .args(["run", "-p", "harvester-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("HARVEST_ES_SERVER"), "Should show env var");
    assert!(stdout.contains("HARVEST_METADATA_URL"), "Should show env var");
}

/// Test invalid flag error handling
#[test]
fn test_invalid_flag() {
    let output = Command::new("cargo")
        .args(["run", "-p", "harvester-cli", "--", "--no-such-flag"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Invalid flag should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("unexpected"),
        "Should show error message"
    );
}

/// Test non-numeric step rejection
#[test]
fn test_invalid_step_value() {
    let output = Command::new("cargo")
        .args(["run", "-p", "harvester-cli", "--", "--step", "soon"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Non-numeric step should fail");
}

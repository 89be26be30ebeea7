use std::io::Write;
use std::process::Command;
use std::str;

/// CLI interface tests
#[cfg(test)]
mod cli_tests {
    use super::*;

    fn run_pbilink(args: &[&str]) -> std::process::Output {
        Command::new("cargo")
            .args(["run", "--quiet", "--"])
            .args(args)
            .output()
            .expect("Failed to execute command")
    }

    /// Config file pointing at a binary that cannot exist, so tests never
    /// touch a real pbi-tools install.
    fn missing_tool_config() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        writeln!(
            file,
            "[tool]\nbinary = \"pbilink-test-no-such-binary\"\n"
        )
        .expect("write config");
        file
    }

    #[test]
    fn test_cli_help() {
        let output = run_pbilink(&["--help"]);
        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");

        // Check that help contains expected sections
        assert!(stdout.contains("Command-line companion"));
        assert!(stdout.contains("Usage:"));
        assert!(stdout.contains("Commands:"));
        assert!(stdout.contains("extract"));
        assert!(stdout.contains("compile"));
        assert!(stdout.contains("watch"));
        assert!(stdout.contains("status"));
        assert!(stdout.contains("install"));
        assert!(stdout.contains("config"));
    }

    #[test]
    fn test_cli_version() {
        let output = run_pbilink(&["version"]);
        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert!(stdout.contains("pbilink 0.1.0") || output.status.success());
    }

    #[test]
    fn test_cli_extract_help() {
        let output = run_pbilink(&["extract", "--help"]);
        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert!(stdout.contains("Extract a .pbix file") || stdout.contains("<FILE>"));
    }

    #[test]
    fn test_cli_watch_help() {
        let output = run_pbilink(&["watch", "--help"]);
        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert!(stdout.contains("open in Power BI Desktop") || stdout.contains("<FILE>"));
    }

    #[test]
    fn test_cli_config_help() {
        let output = run_pbilink(&["config", "--help"]);
        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert!(stdout.contains("show") || stdout.contains("init"));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let output = run_pbilink(&[]);
        assert!(!output.status.success());
    }

    #[test]
    fn test_extract_missing_file_fails_with_path_error() {
        let config = missing_tool_config();
        let config_path = config.path().to_string_lossy().into_owned();
        let output = run_pbilink(&[
            "--quiet",
            "--config",
            &config_path,
            "extract",
            "/no/such/report.pbix",
        ]);

        assert!(!output.status.success());
        let stderr = str::from_utf8(&output.stderr).expect("Invalid UTF-8");
        assert!(stderr.contains("Path not found"), "stderr: {stderr}");
    }

    #[test]
    fn test_watch_with_missing_tool_reports_install_hint() {
        let config = missing_tool_config();
        let config_path = config.path().to_string_lossy().into_owned();
        let output = run_pbilink(&[
            "--quiet",
            "--config",
            &config_path,
            "watch",
            "/no/such/report.pbix",
        ]);

        // The status query runs before any session matching, so the missing
        // binary is the failure surfaced here.
        assert!(!output.status.success());
        let stderr = str::from_utf8(&output.stderr).expect("Invalid UTF-8");
        assert!(stderr.contains("not installed"), "stderr: {stderr}");
    }

    #[test]
    fn test_status_with_missing_tool_fails() {
        let config = missing_tool_config();
        let config_path = config.path().to_string_lossy().into_owned();
        let output = run_pbilink(&["--quiet", "--config", &config_path, "status"]);

        assert!(!output.status.success());
        let stderr = str::from_utf8(&output.stderr).expect("Invalid UTF-8");
        assert!(stderr.contains("Error:"), "stderr: {stderr}");
    }
}

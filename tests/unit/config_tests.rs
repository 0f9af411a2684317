//! Unit tests for configuration parsing and validation.

use workflow_warden::config::GlobalConfig;
use workflow_warden::AppError;

const MINIMAL: &str = r#"trusted_logins = ["github-copilot[bot]"]"#;

#[test]
fn minimal_config_gets_defaults() {
    let config = GlobalConfig::from_toml_str(MINIMAL).expect("valid config");

    assert!(config.trusted_logins.contains("github-copilot[bot]"));
    assert_eq!(config.protected_path_prefix, ".github/workflows/");
    assert_eq!(config.http_port, 3000);
    assert_eq!(config.github.api_base, "https://api.github.com");
    assert_eq!(config.github.api_version, "2022-11-28");
    assert!(config.github.token.is_empty());
    assert!(config.audit.is_none());
}

#[test]
fn full_config_round_trips() {
    let toml = r#"
trusted_logins = ["github-copilot[bot]", "copilot-swe-agent[bot]"]
protected_path_prefix = "ci/"
http_port = 8080

[github]
api_base = "https://github.example.com/api/v3"
api_version = "2022-11-28"

[audit]
log_dir = "/var/log/warden"
"#;
    let config = GlobalConfig::from_toml_str(toml).expect("valid config");

    assert_eq!(config.trusted_logins.len(), 2);
    assert_eq!(config.protected_path_prefix, "ci/");
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.github.api_base, "https://github.example.com/api/v3");
    let audit = config.audit.expect("audit section");
    assert_eq!(audit.log_dir.to_str(), Some("/var/log/warden"));
}

#[test]
fn empty_trusted_logins_is_rejected() {
    let err = GlobalConfig::from_toml_str("trusted_logins = []").expect_err("must fail");
    assert!(matches!(err, AppError::Config(_)));
    assert!(err.to_string().contains("trusted_logins"));
}

#[test]
fn empty_login_entry_is_rejected() {
    let err = GlobalConfig::from_toml_str(r#"trusted_logins = ["github-copilot[bot]", ""]"#)
        .expect_err("must fail");
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn empty_protected_prefix_is_rejected() {
    let toml = r#"
trusted_logins = ["github-copilot[bot]"]
protected_path_prefix = ""
"#;
    let err = GlobalConfig::from_toml_str(toml).expect_err("must fail");
    assert!(err.to_string().contains("protected_path_prefix"));
}

#[test]
fn missing_trusted_logins_is_a_parse_error() {
    let err = GlobalConfig::from_toml_str("http_port = 3000").expect_err("must fail");
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let err = GlobalConfig::from_toml_str("not valid toml [").expect_err("must fail");
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn token_is_never_read_from_config_file() {
    let toml = r#"
trusted_logins = ["github-copilot[bot]"]

[github]
token = "leaked"
"#;
    // serde(skip) ignores the field entirely.
    let config = GlobalConfig::from_toml_str(toml).expect("valid config");
    assert!(config.github.token.is_empty());
}

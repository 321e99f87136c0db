use super::*;
use crate::core::config::PayloadMode;
use crate::core::errors::FocalcovError;
use mockito::{Matcher, Server};
use serde_json::json;

fn request() -> CreateCoverageRequest {
    CreateCoverageRequest {
        classpath_pathnames: vec![
            "/repo/target/classes/".to_string(),
            "/home/dev/.m2/junit-4.13.2.jar".to_string(),
        ],
        focal_classpath: "/repo/target/classes/".to_string(),
        focal_class_name: "com.acme.Stock".to_string(),
        test_class_name: "com.acme.StockTest".to_string(),
        test_method_name: "testAdd".to_string(),
    }
}

#[test]
fn request_serializes_camel_case() {
    let value = serde_json::to_value(request()).unwrap();
    assert_eq!(value["focalClassName"], "com.acme.Stock");
    assert_eq!(value["testMethodName"], "testAdd");
    assert_eq!(value["classpathPathnames"][1], "/home/dev/.m2/junit-4.13.2.jar");
    assert_eq!(value["focalClasspath"], "/repo/target/classes/");
}

#[tokio::test]
async fn http_oracle_posts_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/coverages")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "testClassName": "com.acme.StockTest",
            "testMethodName": "testAdd"
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"coveredLineNumbers":[12,13,15]}"#)
        .create_async()
        .await;

    let oracle = CodeCovApi::new(format!("{}/", server.url()), Duration::from_secs(5)).unwrap();
    let coverage = oracle.create_coverage(&request()).await.unwrap();

    assert_eq!(coverage.covered_line_numbers, vec![12, 13, 15]);
    assert_eq!(oracle.backend(), "http");
    mock.assert_async().await;
}

#[tokio::test]
async fn http_oracle_reports_server_errors() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/coverages")
        .with_status(500)
        .with_body("test class not found")
        .create_async()
        .await;

    let oracle = CodeCovApi::new(server.url(), Duration::from_secs(5)).unwrap();
    let err = oracle.create_coverage(&request()).await.unwrap_err();

    match err {
        FocalcovError::Oracle {
            status, message, ..
        } => {
            assert_eq!(status, Some(500));
            assert!(message.contains("test class not found"));
        }
        other => panic!("expected oracle error, got {other:?}"),
    }
}

#[test]
fn factory_selects_backend() {
    let mut config = OracleConfig::default();
    assert_eq!(create_oracle(&config).unwrap().backend(), "http");

    config.backend = OracleBackend::Cli;
    assert_eq!(create_oracle(&config).unwrap().backend(), "cli");
}

#[cfg(unix)]
mod script {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("code-cov-cli.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn cli_oracle_passes_payload_as_argument() {
        let dir = TempDir::new().unwrap();
        let script = write_script(
            &dir,
            r#"case "$1" in
  *'"testMethodName":"testAdd"'*) echo '{"coveredLineNumbers":[3,4]}' ;;
  *) exit 3 ;;
esac"#,
        );

        let oracle = CodeCovCli::new(script, Duration::from_secs(10), PayloadMode::Argument);
        let coverage = oracle.create_coverage(&request()).await.unwrap();
        assert_eq!(coverage.covered_line_numbers, vec![3, 4]);
    }

    #[tokio::test]
    async fn cli_oracle_writes_payload_to_stdin() {
        let dir = TempDir::new().unwrap();
        let script = write_script(
            &dir,
            r#"read line
case "$line" in
  *'"focalClassName":"com.acme.Stock"'*) echo '{"coveredLineNumbers":[8]}' ;;
  *) exit 4 ;;
esac"#,
        );

        let oracle = CodeCovCli::new(script, Duration::from_secs(10), PayloadMode::Stdin);
        let coverage = oracle.create_coverage(&request()).await.unwrap();
        assert_eq!(coverage.covered_line_numbers, vec![8]);
    }

    #[tokio::test]
    async fn cli_oracle_reports_exit_status() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "echo 'no such test' >&2\nexit 3");

        let oracle = CodeCovCli::new(script, Duration::from_secs(10), PayloadMode::Argument);
        let err = oracle.create_coverage(&request()).await.unwrap_err();
        match err {
            FocalcovError::Oracle {
                status, message, ..
            } => {
                assert_eq!(status, Some(3));
                assert!(message.contains("no such test"));
            }
            other => panic!("expected oracle error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cli_oracle_times_out() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "sleep 5\necho '{\"coveredLineNumbers\":[]}'");

        let oracle = CodeCovCli::new(script, Duration::from_millis(200), PayloadMode::Argument);
        let err = oracle.create_coverage(&request()).await.unwrap_err();
        assert!(err.to_string().contains("timed out"), "unexpected: {err}");
    }

    #[tokio::test]
    async fn cli_oracle_missing_executable_is_io_error() {
        let oracle = CodeCovCli::new(
            "/nonexistent/code-cov-cli",
            Duration::from_secs(1),
            PayloadMode::Argument,
        );
        let err = oracle.create_coverage(&request()).await.unwrap_err();
        assert!(matches!(err, FocalcovError::Io { .. }));
    }
}

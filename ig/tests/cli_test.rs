//! Binary-level tests for the `ig` command
//!
//! Every run gets its own HOME, XDG dirs and working directory so no real
//! config, log directory or API key leaks in.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ig(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ig").expect("binary should build");
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

/// Answer one HTTP request with `status` and `body`; returns the base URL
fn serve_once(status: u16, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else { return };

        let mut received = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let Ok(n) = stream.read(&mut buf) else { return };
            if n == 0 {
                return;
            }
            received.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&received);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if received.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes());
    });

    format!("http://{}", addr)
}

fn write_config(home: &TempDir, base_url: &str) -> std::path::PathBuf {
    let path = home.path().join("ideagen.yml");
    let yaml = format!(
        "llm:\n  provider: openai\n  model: gpt-4o-mini\n  base-url: {}\n  timeout-ms: 5000\ngeneration:\n  prompts-dir: null\n",
        base_url
    );
    std::fs::write(&path, yaml).expect("write config");
    path
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    ig(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("session"))
        .stdout(predicate::str::contains("styles"));
}

#[test]
fn test_empty_topic_rejected_before_credentials() {
    let home = TempDir::new().unwrap();
    ig(&home)
        .args(["generate", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a topic"));
}

#[test]
fn test_count_out_of_range_rejected() {
    let home = TempDir::new().unwrap();
    ig(&home)
        .args(["generate", "home workouts", "-n", "50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the allowed range 5-20"));
}

#[test]
fn test_missing_api_key_is_reported() {
    let home = TempDir::new().unwrap();
    ig(&home)
        .args(["generate", "home workouts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"))
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn test_styles_lists_styles_and_tones() {
    let home = TempDir::new().unwrap();
    ig(&home)
        .arg("styles")
        .assert()
        .success()
        .stdout(predicate::str::contains("how-to"))
        .stdout(predicate::str::contains("newsletter-subject"))
        .stdout(predicate::str::contains("controversial"));
}

#[test]
fn test_config_prints_yaml_without_key() {
    let home = TempDir::new().unwrap();
    ig(&home)
        .env("OPENAI_API_KEY", "sk-should-not-appear")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("api-key-env: OPENAI_API_KEY"))
        .stdout(predicate::str::contains("max-count: 20"))
        .stdout(predicate::str::contains("sk-should-not-appear").not());
}

#[test]
fn test_json_output_to_file_rejected() {
    let home = TempDir::new().unwrap();
    ig(&home)
        .args(["generate", "topic", "--format", "json", "--output", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output writes txt or csv"));
}

#[test]
fn test_generate_prints_csv() {
    let home = TempDir::new().unwrap();
    let base_url = serve_once(
        200,
        r#"{"choices":[{"message":{"role":"assistant","content":"1. Idea A\n2. Idea, B\n\n3. Idea C"},"finish_reason":"stop"}]}"#,
    );
    let config = write_config(&home, &base_url);

    ig(&home)
        .args(["-c", config.to_str().unwrap(), "generate", "sourdough", "--api-key", "sk-test"])
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout("idea\nIdea A\n\"Idea, B\"\nIdea C\n");
}

#[test]
fn test_generate_writes_export_file() {
    let home = TempDir::new().unwrap();
    let base_url = serve_once(
        200,
        r#"{"choices":[{"message":{"role":"assistant","content":"- First\n- Second"},"finish_reason":"stop"}]}"#,
    );
    let config = write_config(&home, &base_url);

    ig(&home)
        .args(["-c", config.to_str().unwrap(), "generate", "Vegan Breakfast", "--api-key", "sk-test"])
        .args(["--output", "exports"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 2 ideas"));

    let written = std::fs::read_to_string(home.path().join("exports/content-ideas-vegan-breakfast.txt")).unwrap();
    assert_eq!(written, "First\nSecond\n");
}

#[test]
fn test_provider_error_is_reported() {
    let home = TempDir::new().unwrap();
    let base_url = serve_once(500, r#"{"error":{"message":"model overloaded"}}"#);
    let config = write_config(&home, &base_url);

    ig(&home)
        .args(["-c", config.to_str().unwrap(), "generate", "sourdough", "--api-key", "sk-test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Provider error"))
        .stderr(predicate::str::contains("model overloaded"));
}

#[test]
fn test_rejected_key_is_auth_error() {
    let home = TempDir::new().unwrap();
    let base_url = serve_once(401, r#"{"error":{"message":"Incorrect API key provided"}}"#);
    let config = write_config(&home, &base_url);

    ig(&home)
        .args(["-c", config.to_str().unwrap(), "generate", "sourdough", "--api-key", "sk-bad"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"))
        .stderr(predicate::str::contains("sk-bad").not());
}

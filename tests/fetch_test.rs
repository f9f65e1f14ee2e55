use predicates::prelude::*;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use tempfile::tempdir;

/// Answers exactly one HTTP request with `status` and `body`, returning the
/// raw request head and body it received.
fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let status = status.to_string();
    let body = body.to_string();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut head = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read header");
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':')
                && name.eq_ignore_ascii_case("content-length")
            {
                content_length = value.trim().parse().expect("content length");
            }
            head.push_str(&line);
        }
        let mut payload = vec![0u8; content_length];
        reader.read_exact(&mut payload).expect("read body");

        let mut stream = stream;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write response");
        stream.flush().expect("flush");

        format!("{head}\r\n{}", String::from_utf8_lossy(&payload))
    });

    (format!("http://{addr}/v1/chat/completions"), handle)
}

#[test]
fn fetch_fails_fast_without_api_key() {
    let tmp = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("news-digest")
        .current_dir(tmp.path())
        .env("NEWS_HOME", tmp.path())
        .env("NEWS_CONFIG_PATH", tmp.path().join("missing.toml"))
        .env("NEWS_API_ENDPOINT", "http://127.0.0.1:9/unreachable")
        .env_remove("XAI_API_KEY")
        .arg("fetch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("XAI_API_KEY"));

    assert!(!tmp.path().join("news").exists());
    assert!(!tmp.path().join("index.json").exists());
}

#[test]
fn fetch_archives_summary_and_rebuilds_artifacts() {
    let tmp = tempdir().expect("tempdir");
    let body = serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": "**Model Releases**\n\nNothing new."}}],
        "citations": ["https://news.test/a"]
    })
    .to_string();
    let (endpoint, server) = serve_once("200 OK", &body);

    assert_cmd::cargo::cargo_bin_cmd!("news-digest")
        .current_dir(tmp.path())
        .env("NEWS_HOME", tmp.path())
        .env("NEWS_CONFIG_PATH", tmp.path().join("missing.toml"))
        .env("NEWS_API_ENDPOINT", &endpoint)
        .env("NEWS_VARIANT", "rich")
        .env("NEWS_TIMEZONE", "UTC")
        .env("XAI_API_KEY", "test-key")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .arg("fetch")
        .assert()
        .success()
        .stdout(predicate::str::contains("summary saved to"));

    let request = server.join().expect("server thread");
    assert!(request.to_ascii_lowercase().contains("authorization: bearer test-key"));
    assert!(request.contains("\"search_parameters\""));
    assert!(request.contains("\"return_citations\":true"));

    let entries = fs::read_dir(tmp.path().join("news"))
        .expect("read news")
        .map(|e| e.expect("entry").path())
        .collect::<Vec<_>>();
    assert_eq!(entries.len(), 1);
    let name = entries[0]
        .file_name()
        .and_then(|n| n.to_str())
        .expect("utf8 name")
        .to_string();
    assert!(name.starts_with("grok_news_summary_"));

    let entry: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&entries[0]).expect("read entry")).expect("json");
    assert_eq!(entry["summary"], "**Model Releases**\n\nNothing new.");
    assert_eq!(entry["citations"], serde_json::json!(["https://news.test/a"]));

    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(tmp.path().join("index.json")).expect("read manifest"),
    )
    .expect("json");
    assert_eq!(manifest["files"], serde_json::json!([name]));

    let html = fs::read_to_string(tmp.path().join("news_content.html")).expect("fragment");
    assert!(html.contains("<strong>Model Releases</strong><br><br>Nothing new."));
    assert!(html.contains("news-sources"));
}

#[test]
fn fetch_reports_api_failure_without_touching_archive() {
    let tmp = tempdir().expect("tempdir");
    let news = tmp.path().join("news");
    fs::create_dir_all(&news).expect("mkdir");
    fs::write(
        news.join("grok_news_summary_2001-01-01_00-00-00.json"),
        "{\"timestamp\":\"t\",\"summary\":\"old\"}",
    )
    .expect("seed");
    let (endpoint, server) = serve_once("500 Internal Server Error", "{\"error\":\"boom\"}");

    assert_cmd::cargo::cargo_bin_cmd!("news-digest")
        .current_dir(tmp.path())
        .env("NEWS_HOME", tmp.path())
        .env("NEWS_CONFIG_PATH", tmp.path().join("missing.toml"))
        .env("NEWS_API_ENDPOINT", &endpoint)
        .env("XAI_API_KEY", "test-key")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .arg("fetch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("status 500"));

    server.join().expect("server thread");
    assert!(news.join("grok_news_summary_2001-01-01_00-00-00.json").exists());
    assert_eq!(fs::read_dir(&news).expect("read").count(), 1);
    assert!(!tmp.path().join("index.json").exists());
}

#[test]
fn fetch_rejects_prefix_that_would_hide_the_entry() {
    for prefix in ["digest-2020-01-01", "sub/grok"] {
        let tmp = tempdir().expect("tempdir");

        assert_cmd::cargo::cargo_bin_cmd!("news-digest")
            .current_dir(tmp.path())
            .env("NEWS_HOME", tmp.path())
            .env("NEWS_CONFIG_PATH", tmp.path().join("missing.toml"))
            .env("NEWS_API_ENDPOINT", "http://127.0.0.1:9/unreachable")
            .env("NEWS_FILE_PREFIX", prefix)
            .env("XAI_API_KEY", "test-key")
            .arg("fetch")
            .assert()
            .failure()
            .stderr(predicate::str::contains("file_prefix"));

        assert!(!tmp.path().join("news").exists(), "{prefix}");
    }
}

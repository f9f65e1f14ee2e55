use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_entry(dir: &Path, name: &str, summary: &str) {
    fs::create_dir_all(dir).expect("mkdir news");
    let body = format!(
        "{{\n    \"timestamp\": \"2025-01-01T06:00:00\",\n    \"summary\": {}\n}}\n",
        serde_json::to_string(summary).expect("encode summary")
    );
    fs::write(dir.join(name), body).expect("write entry");
}

#[test]
fn index_lists_entries_newest_first_and_skips_manifest_name() {
    let tmp = tempdir().expect("tempdir");
    let news = tmp.path().join("news");
    write_entry(&news, "grok_news_summary_2025-01-01_06-00-00.json", "one");
    write_entry(&news, "grok_news_summary_2025-01-30_06-00-00.json", "three");
    write_entry(&news, "grok_news_summary_2025-01-15_06-00-00.json", "two");
    fs::write(news.join("index.json"), "{}").expect("write stray manifest");
    fs::write(news.join("readme.txt"), "not an entry").expect("write txt");

    assert_cmd::cargo::cargo_bin_cmd!("news-digest")
        .current_dir(tmp.path())
        .env("NEWS_HOME", tmp.path())
        .env("NEWS_CONFIG_PATH", tmp.path().join("missing.toml"))
        .arg("index")
        .assert()
        .success()
        .stdout(predicate::str::contains("with 3 news files"));

    let raw = fs::read_to_string(tmp.path().join("index.json")).expect("read manifest");
    let manifest: serde_json::Value = serde_json::from_str(&raw).expect("parse manifest");
    assert_eq!(manifest["total_files"], 3);
    assert_eq!(
        manifest["files"],
        serde_json::json!([
            "grok_news_summary_2025-01-30_06-00-00.json",
            "grok_news_summary_2025-01-15_06-00-00.json",
            "grok_news_summary_2025-01-01_06-00-00.json"
        ])
    );
    let keys = raw
        .lines()
        .filter(|l| l.starts_with("  \""))
        .map(|l| l.trim().split(':').next().unwrap_or_default().to_string())
        .collect::<Vec<_>>();
    assert_eq!(keys, vec!["\"last_updated\"", "\"total_files\"", "\"files\""]);
}

#[test]
fn index_without_archive_dir_warns_and_writes_nothing() {
    let tmp = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("news-digest")
        .current_dir(tmp.path())
        .env("NEWS_HOME", tmp.path())
        .env("NEWS_CONFIG_PATH", tmp.path().join("missing.toml"))
        .arg("index")
        .assert()
        .success()
        .stdout(predicate::str::contains("index [ok]"))
        .stdout(predicate::str::contains("archive directory not found"));

    assert!(!tmp.path().join("index.json").exists());
}

#[test]
fn render_writes_one_block_per_readable_entry() {
    let tmp = tempdir().expect("tempdir");
    let news = tmp.path().join("news");
    write_entry(&news, "grok_news_summary_2025-01-30_06-00-00.json", "**Hello** [world](http://x.test)\n\nSecond");
    write_entry(&news, "grok_news_summary_2025-01-15_06-00-00.json", "older");
    fs::write(news.join("grok_news_summary_2025-01-20_06-00-00.json"), "{ truncated")
        .expect("write corrupt entry");

    assert_cmd::cargo::cargo_bin_cmd!("news-digest")
        .current_dir(tmp.path())
        .env("NEWS_HOME", tmp.path())
        .env("NEWS_CONFIG_PATH", tmp.path().join("missing.toml"))
        .arg("render")
        .assert()
        .success()
        .stdout(predicate::str::contains("with 2 articles"))
        .stderr(predicate::str::contains("NEWS_WARN code=ENTRY_UNREADABLE"));

    let html = fs::read_to_string(tmp.path().join("news_content.html")).expect("read fragment");
    assert_eq!(html.matches("class=\"news-block\"").count(), 2);
    assert_eq!(html.matches("news-content expanded").count(), 1);
    assert!(html.contains("<strong>Hello</strong> <a href=\"http://x.test\">world</a><br><br>Second"));
    assert!(html.find("2025-01-30").expect("newest date") < html.find("2025-01-15").expect("older date"));
}

#[test]
fn json_flag_prints_machine_readable_report() {
    let tmp = tempdir().expect("tempdir");
    write_entry(&tmp.path().join("news"), "grok_news_summary_2025-01-30_06-00-00.json", "x");

    let output = assert_cmd::cargo::cargo_bin_cmd!("news-digest")
        .current_dir(tmp.path())
        .env("NEWS_HOME", tmp.path())
        .env("NEWS_CONFIG_PATH", tmp.path().join("missing.toml"))
        .args(["--json", "index"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["command"], "index");
    assert_eq!(report["ok"], true);
}

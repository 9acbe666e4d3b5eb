use std::fs;

use fairdeal_cli::run;
use fairdeal_engine::logger::read_shoe_records;
use tempfile::TempDir;

fn run_args(args: &[&str]) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(args, &mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

fn record_shoes(dir: &TempDir) -> String {
    let path = dir.path().join("audit").join("shoes.jsonl");
    let path = path.to_string_lossy().to_string();
    for seed in ["1", "2"] {
        let (code, out, _) = run_args(&["fairdeal", "shuffle", "--seed", seed, "--output", &path]);
        assert_eq!(code, 0);
        assert!(out.contains("Recorded shoe "));
    }
    path
}

#[test]
fn recorded_shoes_verify() {
    let dir = TempDir::new().unwrap();
    let path = record_shoes(&dir);

    let records = read_shoe_records(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.ts.is_some()));
    assert!(records[0].shoe_id.ends_with("-000001"));
    assert!(records[1].shoe_id.ends_with("-000002"));

    let (code, out, err) = run_args(&["fairdeal", "verify", "--input", &path]);
    assert_eq!(code, 0, "{}", err);
    assert_eq!(out.matches("OK ").count(), 2);
    assert!(out.contains("Verified: 2/2 shoes"));
}

#[test]
fn dealt_shoes_are_logged_and_verify() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deal.jsonl").to_string_lossy().to_string();
    let (code, _, err) = run_args(&[
        "fairdeal", "deal", "--game", "stud", "--rounds", "3", "--seed", "4", "--output", &path,
    ]);
    assert_eq!(code, 0, "{}", err);

    // Every round gets a fresh shoe by default.
    let records = read_shoe_records(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.dealt == 10));

    let (code, out, _) = run_args(&["fairdeal", "verify", "--input", &path]);
    assert_eq!(code, 0);
    assert!(out.contains("Verified: 3/3 shoes"));
}

#[test]
fn tampered_shoe_fails_verification() {
    let dir = TempDir::new().unwrap();
    let path = record_shoes(&dir);

    let content = fs::read_to_string(&path).unwrap();
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    let mut record: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
    record["cut_position"] = serde_json::json!(52);
    lines[1] = record.to_string();
    fs::write(&path, lines.join("\n")).unwrap();

    let (code, out, err) = run_args(&["fairdeal", "verify", "--input", &path]);
    assert_eq!(code, 2);
    assert!(out.contains("Verified: 1/2 shoes"));
    assert!(err.contains("Error: line 2:"), "{}", err);
    assert!(err.contains("1 of 2 shoes failed"));
}

#[test]
fn duplicated_card_fails_verification() {
    let dir = TempDir::new().unwrap();
    let path = record_shoes(&dir);

    let content = fs::read_to_string(&path).unwrap();
    let first = content.lines().next().unwrap();
    let mut record: serde_json::Value = serde_json::from_str(first).unwrap();
    record["deck"][0] = record["deck"][1].clone();
    fs::write(&path, format!("{}\n", record)).unwrap();

    let (code, _, err) = run_args(&["fairdeal", "verify", "--input", &path]);
    assert_eq!(code, 2);
    assert!(err.contains("line 1"), "{}", err);
}

#[test]
fn empty_log_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.jsonl");
    fs::write(&path, "\n\n").unwrap();

    let (code, _, err) = run_args(&["fairdeal", "verify", "--input", &path.to_string_lossy()]);
    assert_eq!(code, 2);
    assert!(err.contains("no shoe records"), "{}", err);
}

#[test]
fn compressed_log_verifies() {
    let dir = TempDir::new().unwrap();
    let path = record_shoes(&dir);

    let raw = fs::read(&path).unwrap();
    let zst = dir.path().join("shoes.jsonl.zst");
    fs::write(&zst, zstd::bulk::compress(&raw, 3).unwrap()).unwrap();

    let (code, out, err) = run_args(&["fairdeal", "verify", "--input", &zst.to_string_lossy()]);
    assert_eq!(code, 0, "{}", err);
    assert!(out.contains("Verified: 2/2 shoes"));
}

#[test]
fn oversized_deck_count_is_reported_per_line() {
    let dir = TempDir::new().unwrap();
    let path = record_shoes(&dir);

    let content = fs::read_to_string(&path).unwrap();
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    let mut record: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    record["deck_count"] = serde_json::json!(u64::MAX / 2);
    lines[0] = record.to_string();
    fs::write(&path, lines.join("\n")).unwrap();

    let (code, out, err) = run_args(&["fairdeal", "verify", "--input", &path]);
    assert_eq!(code, 2);
    assert!(out.contains("Verified: 1/2 shoes"), "{}", out);
    assert!(err.contains("Error: line 1:"), "{}", err);
}

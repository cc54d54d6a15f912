use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const HEADER: &str = "Id,Title,Body,llm_zero_shot_title,llm_zero_shot_body,llm_zero_shot_combined,llm_few_shot_title,llm_few_shot_body,llm_few_shot_combined,llm_cot_title,llm_cot_body,llm_cot_combined";

fn write_dataset(root: &Path) {
    for sub in ["Gemini", "GPT-4o", "llama-3.2", "images"] {
        std::fs::create_dir_all(root.join(sub)).unwrap();
    }
    std::fs::write(
        root.join("metadata.csv"),
        "id,image_name\n7,cat.png\n9,dog.png\n7,cat-dup.png\n",
    )
    .unwrap();
    std::fs::write(
        root.join("Gemini/llm_responses_combined.csv"),
        format!("{HEADER}\n7,T,B,Zt,Zb,Zc,Ft,Fb,Fc,Ct,Cb,Cc\n"),
    )
    .unwrap();
    std::fs::write(
        root.join("GPT-4o/llm_responses_combined.csv"),
        format!("{HEADER}\n"),
    )
    .unwrap();
    std::fs::write(
        root.join("llama-3.2/llm_responses_combined.csv"),
        format!("{HEADER}\n"),
    )
    .unwrap();
}

fn promptlens(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("promptlens").unwrap();
    cmd.arg("--data-dir").arg(data_dir);
    cmd
}

#[test]
fn test_ids_in_first_appearance_order() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());

    promptlens(dir.path())
        .arg("ids")
        .assert()
        .success()
        .stdout("7\n9\n");
}

#[test]
fn test_show_text_renders_all_sections() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());

    promptlens(dir.path())
        .args(["show", "--id", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Image ID: 7"))
        .stdout(predicate::str::contains("Could not load image"))
        .stdout(predicate::str::contains("Original Content\n  Title: T\n  Body: B"))
        .stdout(predicate::str::contains("      Combined: Zc"))
        .stdout(predicate::str::contains("(no LLaMA response for this image)"));
}

#[test]
fn test_show_json_marks_unavailable_models() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());

    let out = promptlens(dir.path())
        .args(["show", "--id", "7", "--format", "json", "--no-image"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["ok"], true);
    assert_eq!(v["record"]["caption"], "Image ID: 7");
    assert_eq!(v["record"]["original"]["title"], "T");
    assert_eq!(
        v["record"]["models"]["Gemini"]["outputs"]["zero_shot"]["combined"],
        "Zc"
    );
    assert_eq!(v["record"]["models"]["GPT-4"]["status"], "unavailable");
    assert_eq!(v["record"]["image"]["status"], "skipped");
    assert!(v["record"]["image_path"]
        .as_str()
        .unwrap()
        .ends_with("cat.png"));
}

#[test]
fn test_show_missing_original_fails_selection() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());

    promptlens(dir.path())
        .args(["show", "--id", "9"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Original content unavailable for Image ID 9"));
}

#[test]
fn test_missing_data_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    promptlens(&dir.path().join("nope"))
        .arg("ids")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot start"));
}

#[test]
fn test_browse_survives_bad_selection() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());

    promptlens(dir.path())
        .args(["browse", "--no-image"])
        .write_stdin("42\n9\n7\n:q\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("No record for Image ID 42"))
        .stderr(predicate::str::contains("Original content unavailable for Image ID 9"))
        .stdout(predicate::str::contains("Image ID: 7"))
        .stdout(predicate::str::contains("(not decoded)"))
        .stdout(predicate::str::contains("❌").not());
}

#[test]
fn test_browse_survives_invalid_utf8_line() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());

    let mut input = b"\xff\xfe\n".to_vec();
    input.extend_from_slice(b"7\n");

    promptlens(dir.path())
        .args(["browse", "--no-image"])
        .write_stdin(input)
        .assert()
        .success()
        .stderr(predicate::str::contains("not valid UTF-8"))
        .stdout(predicate::str::contains("Image ID: 7"));
}

#[test]
fn test_doctor_json_flags_missing_original() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());

    let out = promptlens(dir.path())
        .args(["doctor", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let codes: Vec<&str> = v["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["code"].as_str())
        .collect();
    assert!(codes.contains(&"E_ORIGINAL_MISSING"));
    assert!(codes.contains(&"W_DUPLICATE_ID"));
}

#[test]
fn test_init_writes_loadable_config() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("promptlens.yaml");

    Command::cargo_bin("promptlens")
        .unwrap()
        .args(["init", "--out"])
        .arg(&cfg)
        .assert()
        .success();

    let raw = std::fs::read_to_string(&cfg).unwrap();
    assert!(raw.contains("GPT-4o/llm_responses_combined.csv"));

    write_dataset(&dir.path().join("Data"));
    Command::cargo_bin("promptlens")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("ids")
        .assert()
        .success()
        .stdout("7\n9\n");
}

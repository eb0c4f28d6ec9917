use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const PILLAR: &str = r#"{
  "name": "pillar",
  "size": [1, 3, 1],
  "placements": [
    { "pos": [0, 0, 0], "block": 1 },
    { "pos": [0, 1, 0], "block": 1 },
    { "pos": [0, 2, 0], "block": 1 }
  ]
}"#;

const CONFIG: &str = r#"
energy_per_tick = 20
max_energy = 100
ticks_per_block = 0.5
"#;

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "blockwright_cli_{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn run_builder(dir: &Path, extra: &[&str]) -> String {
    let dir_arg = |name: &str| dir.join(name).to_str().unwrap().to_string();
    let mut args = vec![
        "--blueprint".to_string(),
        dir_arg("pillar.json"),
        "--origin".to_string(),
        "0,10,0".to_string(),
        "--config".to_string(),
        dir_arg("builder.toml"),
        "--state".to_string(),
        dir_arg("build.state"),
        "--world".to_string(),
        dir_arg("world.json"),
        "--events".to_string(),
        dir_arg("events.jsonl"),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));

    let output = Command::new(env!("CARGO_BIN_EXE_blockwright"))
        .args(&args)
        .output()
        .expect("spawn blockwright");
    assert!(
        output.status.success(),
        "blockwright failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn interrupted_build_resumes_from_state_file() {
    let dir = scratch_dir();
    std::fs::write(dir.join("pillar.json"), PILLAR).unwrap();
    std::fs::write(dir.join("builder.toml"), CONFIG).unwrap();

    let first = run_builder(&dir, &["--max-ticks", "2"]);
    assert!(first.starts_with("stopped"), "unexpected output: {first}");
    assert!(dir.join("build.state").exists());

    let world: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("world.json")).unwrap()).unwrap();
    assert_eq!(world.as_array().unwrap().len(), 0);

    let second = run_builder(&dir, &[]);
    assert!(second.starts_with("finished"), "unexpected output: {second}");
    assert!(!dir.join("build.state").exists());

    let world: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("world.json")).unwrap()).unwrap();
    let entries = world.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    for (y, entry) in (10..13).zip(entries) {
        assert_eq!(entry["pos"], serde_json::json!([0, y, 0]));
        assert_eq!(entry["id"], 1);
    }

    let events = std::fs::read_to_string(dir.join("events.jsonl")).unwrap();
    assert!(events.lines().last().unwrap().contains("\"kind\":\"done\""));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn origin_past_the_coordinate_range_is_reported() {
    let dir = scratch_dir();
    std::fs::write(dir.join("pillar.json"), PILLAR).unwrap();
    std::fs::write(dir.join("builder.toml"), CONFIG).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_blockwright"))
        .args([
            "--blueprint",
            dir.join("pillar.json").to_str().unwrap(),
            "--origin",
            "0,2147483646,0",
            "--config",
            dir.join("builder.toml").to_str().unwrap(),
        ])
        .output()
        .expect("spawn blockwright");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot place blueprint"), "unexpected stderr: {stderr}");

    std::fs::remove_dir_all(&dir).ok();
}

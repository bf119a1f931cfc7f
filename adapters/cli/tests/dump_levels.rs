use std::{fs, path::PathBuf, process::Command};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("maze-escape-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("scratch directory");
    dir
}

fn dump(args: &[&str], log_dir: &PathBuf) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_maze-escape"))
        .arg("--dump-levels")
        .arg("--log-dir")
        .arg(log_dir)
        .args(args)
        .output()
        .expect("failed to run maze-escape");

    assert!(
        output.status.success(),
        "maze-escape --dump-levels failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf-8 output")
}

#[test]
fn default_run_dumps_four_seeded_levels() {
    let logs = scratch_dir("default");

    let first = dump(&["--seed", "17"], &logs);
    let second = dump(&["--seed", "17"], &logs);

    assert_eq!(first, second, "same seed must dump the same levels");
    assert!(first.starts_with("seed 17\n"));
    assert_eq!(first.matches("requires key: false").count(), 2);
    assert_eq!(first.matches("requires key: true").count(), 2);
    assert_eq!(first.matches('%').count(), 4);
    let keys: usize = first
        .lines()
        .filter(|line| line.starts_with('#'))
        .map(|line| line.matches('k').count())
        .sum();
    assert_eq!(keys, 2);
    assert!(logs.join("maze-escape.log").exists());
}

#[test]
fn config_file_drives_generation() {
    let dir = scratch_dir("config");
    let config = dir.join("levels.toml");
    fs::write(
        &config,
        r#"
        seed = 3

        [[levels]]
        width = 9
        height = 7
        "#,
    )
    .expect("write config");

    let dumped = dump(&["--config", config.to_str().expect("utf-8 path")], &dir);

    assert!(dumped.starts_with("seed 3\n"));
    assert_eq!(dumped.matches("level ").count(), 1);
    let rows: Vec<&str> = dumped
        .lines()
        .filter(|line| line.starts_with('#'))
        .collect();
    assert_eq!(rows.len(), 7);
    assert!(rows.iter().all(|row| row.chars().count() == 9));
}

#[test]
fn invalid_config_prevents_start() {
    let dir = scratch_dir("invalid");
    let config = dir.join("levels.toml");
    fs::write(&config, "[[levels]]\nwidth = 3\nheight = 3\n").expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_maze-escape"))
        .args(["--dump-levels", "--log-dir"])
        .arg(&dir)
        .arg("--config")
        .arg(&config)
        .output()
        .expect("failed to run maze-escape");

    assert!(!output.status.success());
}

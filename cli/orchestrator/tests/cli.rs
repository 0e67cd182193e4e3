// create a temp extension project and drive the safegen binary against it
use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::tempdir;

fn write(root: &Path, name: &str, contents: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn project(root: &Path) {
    write(root, "ext/php_phalcon.h", "#include \"kernel/globals.h\"\nPHP\n");
    write(root, "ext/kernel/globals.h", "GLOBALS");
    write(root, "ext/kernel/main.h", "int phalcon_main(void);\n");
    write(root, "ext/kernel/main.c", "#include \"kernel/main.h\"\nint phalcon_main(void) { return 0; }\n");
    write(root, "ext/config.m4", "PHP_NEW_EXTENSION(phalcon, kernel/main.c, $ext_shared)\n");
    write(root, "ext/config.w32", "EXTENSION(\"phalcon\", \"kernel/main.c\");\n");
}

fn safegen(config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("safegen"));
    cmd.env_remove("RUST_LOG");
    cmd.arg("--config").arg(config).args(["--log-level", "warn"]);
    cmd
}

#[test]
fn generate_prints_ok_and_writes_tree() {
    let tmp = tempdir().unwrap();
    project(tmp.path());
    let config = tmp.path().join("safegen.toml");
    fs::write(&config, "").unwrap();
    let out = tmp.path().join("out");
    let report = tmp.path().join("report.json");

    safegen(&config)
        .arg("generate")
        .arg("--root")
        .arg(tmp.path())
        .arg("--output")
        .arg(&out)
        .arg("--windows")
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generating safe build... OK"));

    for file in ["phalcon.h", "phalcon.c", "config.m4", "config.w32", "php_phalcon.h"] {
        assert!(out.join(file).exists(), "expected {} in output", file);
    }
    let header = fs::read_to_string(out.join("php_phalcon.h")).unwrap();
    assert!(header.starts_with("GLOBALS"));
    let summary = fs::read_to_string(&report).unwrap();
    assert!(summary.contains("\"inlined_directives\": 1"));
}

#[test]
fn generate_uses_paths_from_config() {
    let tmp = tempdir().unwrap();
    project(tmp.path());
    let config = tmp.path().join("safegen.toml");
    let out = tmp.path().join("from-config");
    fs::write(
        &config,
        format!(
            "[paths]\nroot_dir = {:?}\noutput_dir = {:?}\n\n[build]\nwindows_config = false\n",
            tmp.path().display().to_string(),
            out.display().to_string()
        ),
    )
    .unwrap();

    safegen(&config).arg("generate").assert().success();

    assert!(out.join("phalcon.c").exists());
    assert!(!out.join("config.w32").exists());
}

#[test]
fn generate_with_relative_root_aggregates_headers() {
    let tmp = tempdir().unwrap();
    project(tmp.path());
    let config = tmp.path().join("safegen.toml");
    fs::write(&config, "").unwrap();

    safegen(&config)
        .current_dir(tmp.path())
        .args(["generate", "--root", ".", "--output", "./out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));

    let out = tmp.path().join("out");
    let header = fs::read_to_string(out.join("phalcon.h")).unwrap();
    assert!(header.contains("/* kernel/main.h */\nint phalcon_main(void);\n"));
    let source = fs::read_to_string(out.join("phalcon.c")).unwrap();
    assert!(!source.contains("#include \"kernel/"));
    assert!(source.contains("int phalcon_main(void) { return 0; }"));
}

#[test]
fn generate_with_relative_config_paths() {
    let tmp = tempdir().unwrap();
    project(tmp.path());
    let config = tmp.path().join("safegen.toml");
    fs::write(&config, "[paths]\nroot_dir = \"./\"\noutput_dir = \"ext/safe\"\n").unwrap();

    safegen(&config).current_dir(tmp.path()).arg("generate").assert().success();

    let out = tmp.path().join("ext/safe");
    let header = fs::read_to_string(out.join("phalcon.h")).unwrap();
    assert!(header.contains("int phalcon_main(void);"));
    let source = fs::read_to_string(out.join("phalcon.c")).unwrap();
    assert!(!source.contains("#include \"kernel/"));
}

#[test]
fn generate_fails_on_missing_source_tree() {
    let tmp = tempdir().unwrap();
    let config = tmp.path().join("safegen.toml");
    fs::write(&config, "").unwrap();

    safegen(&config)
        .arg("generate")
        .arg("--root")
        .arg(tmp.path().join("nowhere"))
        .arg("--output")
        .arg(tmp.path().join("out"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("safegen failed"));
}

#[test]
fn inline_rewrites_single_file() {
    let tmp = tempdir().unwrap();
    project(tmp.path());
    let config = tmp.path().join("safegen.toml");
    fs::write(&config, "").unwrap();
    let target = tmp.path().join("copy.h");
    fs::write(&target, "A\n#include \"kernel/main.h\"\nB\n").unwrap();

    safegen(&config)
        .arg("inline")
        .arg(&target)
        .arg("--base")
        .arg(tmp.path().join("ext"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Inlined 1 header(s)"));

    let result = fs::read_to_string(&target).unwrap();
    assert!(result.starts_with("A\nint phalcon_main(void);\n"));
    assert!(result.ends_with("B\n"));
}

#[test]
fn init_config_writes_default_file() {
    let tmp = tempdir().unwrap();
    let config = tmp.path().join("safegen.toml");
    let target = tmp.path().join("cfg/config.toml");
    fs::write(&config, "").unwrap();

    safegen(&config).arg("init-config").arg("--path").arg(&target).assert().success();

    let contents = fs::read_to_string(&target).unwrap();
    assert!(contents.contains("extension_name = \"phalcon\""));

    safegen(&config)
        .arg("init-config")
        .arg("--path")
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

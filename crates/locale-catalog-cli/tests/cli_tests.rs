#![cfg(unix)]

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::os::unix::fs::PermissionsExt as _;
use std::path::{Path, PathBuf};

const TOOLS: [&str; 4] = ["msginit", "msgmerge", "msgfmt", "xgettext"];

/// Writes whatever file `--output-file=` / `--output=` names, like the real tools would.
const WRITES_OUTPUT: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --output-file=*) printf 'fake\n' > "${arg#--output-file=}" ;;
    --output=*) printf 'fake\n' > "${arg#--output=}" ;;
  esac
done
exit 0
"#;

/// Fails for the German catalog, behaves like [`WRITES_OUTPUT`] otherwise.
const FAILS_FOR_DE: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    */de/LC_MESSAGES/*.po) echo "de catalog is broken" >&2; exit 1 ;;
  esac
done
for arg in "$@"; do
  case "$arg" in
    --output-file=*) printf 'fake\n' > "${arg#--output-file=}" ;;
  esac
done
exit 0
"#;

struct Project {
    root: TempDir,
    bin: TempDir,
}

impl Project {
    /// A working directory with `./src/app.i18n/app/i18n` and all four fake tools.
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        root.child("src/app.i18n/app/i18n").create_dir_all().unwrap();
        let bin = TempDir::new().unwrap();
        let project = Self { root, bin };
        for tool in TOOLS {
            project.install_tool(tool, WRITES_OUTPUT);
        }
        project
    }

    fn install_tool(&self, name: &str, script: &str) {
        let path = self.bin.path().join(name);
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn remove_tool(&self, name: &str) {
        fs::remove_file(self.bin.path().join(name)).unwrap();
    }

    fn locale(&self) -> PathBuf {
        self.root.path().join("src/app.i18n/app/i18n/locale")
    }

    fn add_catalog(&self, language: &str, file_name: &str) {
        let dir = self.locale().join(language).join("LC_MESSAGES");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file_name), "msgid \"\"\nmsgstr \"\"\n").unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("locale-catalog");
        cmd.current_dir(self.root.path())
            .env("PATH", self.bin.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if !dir.exists() {
        return files;
    }
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            files.extend(list_files(&path));
        } else {
            files.push(path);
        }
    }
    files.sort();
    files
}

#[test]
fn test_no_module_prints_help() {
    let project = Project::new();

    project
        .cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--module"));

    assert!(!project.locale().exists());
}

#[rstest]
#[case("FR")]
#[case("english")]
#[case("en-GB")]
#[case("en_gb")]
fn test_invalid_language_exits_1(#[case] code: &str) {
    let project = Project::new();

    project
        .cmd()
        .args(["--module=app.i18n", &format!("--lang={}", code)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid language code"));

    assert!(!project.locale().exists());
}

#[rstest]
#[case("fr")]
#[case("en_GB")]
fn test_valid_language_is_initialized(#[case] code: &str) {
    let project = Project::new();

    project
        .cmd()
        .args(["--module=app.i18n", &format!("--lang={}", code)])
        .assert()
        .success();

    let messages = project.locale().join(code).join("LC_MESSAGES");
    assert_eq!(
        list_files(&messages),
        vec![messages.join("app_i18n.mo"), messages.join("app_i18n.po")]
    );
}

#[test]
fn test_default_run_creates_locale_and_template() {
    let project = Project::new();

    project
        .cmd()
        .arg("--module=app.i18n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Done:"));

    let template = project.locale().join("app_i18n.pot");
    assert!(template.is_file());
    assert_eq!(fs::read_to_string(template).unwrap(), "");
    assert_eq!(list_files(&project.locale()).len(), 1);
}

#[test]
fn test_missing_tool_fails_before_any_change() {
    let project = Project::new();
    project.remove_tool("msgfmt");

    project
        .cmd()
        .args(["--module=app.i18n", "--lang=fr"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("msgfmt"));

    assert!(!project.locale().exists());
}

#[test]
fn test_missing_module_dir_fails() {
    let project = Project::new();

    project
        .cmd()
        .arg("--module=unknown")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("module directory not found"));
}

#[rstest]
#[case("--module=a./etc")]
#[case("--module=..")]
fn test_path_like_module_is_rejected(#[case] module_arg: &str) {
    let project = Project::new();

    project
        .cmd()
        .arg(module_arg)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("module directory not found"));

    assert!(!project.root.path().join("locale").exists());
}

#[test]
fn test_missing_search_path_fails() {
    let project = Project::new();
    project.root.child("src/shop").create_dir_all().unwrap();

    project
        .cmd()
        .arg("--module=shop")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("search path not found"));

    assert!(!project.root.path().join("src/shop/shop").exists());
}

#[test]
fn test_reinitializing_language_changes_nothing() {
    let project = Project::new();
    project.add_catalog("fr", "app_i18n.po");
    let before = list_files(&project.locale());

    project
        .cmd()
        .args(["--module=app.i18n", "--lang=fr"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("it exists already"));

    assert_eq!(list_files(&project.locale()), before);
    project
        .root
        .child("src/app.i18n/app/i18n/locale/app_i18n.pot")
        .assert(predicate::path::missing());
}

#[test]
fn test_every_catalog_is_compiled() {
    let project = Project::new();
    project.add_catalog("de", "app_i18n.po");
    project.add_catalog("fr", "app_i18n.po");
    project.add_catalog("fr", "legacy.po");

    project
        .cmd()
        .arg("--module=app.i18n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 merged, 3 compiled"));

    for mo in [
        "de/LC_MESSAGES/app_i18n.mo",
        "fr/LC_MESSAGES/app_i18n.mo",
        "fr/LC_MESSAGES/legacy.mo",
    ] {
        project
            .root
            .child(format!("src/app.i18n/app/i18n/locale/{}", mo))
            .assert(predicate::path::is_file());
    }
}

#[test]
fn test_failing_tool_is_reported_and_others_continue() {
    let project = Project::new();
    project.install_tool("msgfmt", FAILS_FOR_DE);
    project.add_catalog("de", "app_i18n.po");
    project.add_catalog("fr", "app_i18n.po");

    project
        .cmd()
        .arg("--module=app.i18n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("de catalog is broken"))
        .stderr(predicate::str::contains("1 failed tool invocation(s)"));

    assert!(project.locale().join("fr/LC_MESSAGES/app_i18n.mo").is_file());
    assert!(!project.locale().join("de/LC_MESSAGES/app_i18n.mo").exists());
}

#[test]
fn test_msgfmt_writing_nothing_is_reported() {
    let project = Project::new();
    project.install_tool("msgfmt", "#!/bin/sh\nexit 0\n");

    project
        .cmd()
        .args(["--module=app.i18n", "--lang=fr"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("produced no compiled catalog"));

    assert!(project.locale().join("fr/LC_MESSAGES/app_i18n.po").is_file());
    assert!(!project.locale().join("fr/LC_MESSAGES/app_i18n.mo").exists());
}

#[test]
fn test_dry_run_changes_nothing() {
    let project = Project::new();
    project.add_catalog("de", "app_i18n.po");
    let before = list_files(&project.locale());

    project
        .cmd()
        .args(["--module=app.i18n", "--lang=fr", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would run:"))
        .stdout(predicate::str::contains("msgfmt"));

    assert_eq!(list_files(&project.locale()), before);
}

#[test]
fn test_config_file_supplies_defaults() {
    let project = Project::new();
    project.root.child("lib/shop/shop").create_dir_all().unwrap();

    let tools = TempDir::new().unwrap();
    let custom_msgfmt = tools.path().join("msgfmt");
    fs::write(&custom_msgfmt, WRITES_OUTPUT).unwrap();
    fs::set_permissions(&custom_msgfmt, fs::Permissions::from_mode(0o755)).unwrap();
    project.remove_tool("msgfmt");

    project
        .root
        .child("catalog.toml")
        .write_str(&format!(
            "project = \"webshop\"\nproject_dir = \"lib\"\n\n[tools]\nmsgfmt = \"{}\"\n",
            custom_msgfmt.display()
        ))
        .unwrap();

    project
        .cmd()
        .args(["--module=shop", "--lang=de"])
        .assert()
        .success()
        .stdout(predicate::str::contains("webshop"));

    project
        .root
        .child("lib/shop/shop/locale/de/LC_MESSAGES/shop.mo")
        .assert(predicate::path::is_file());
}

#[test]
fn test_explicit_missing_config_fails() {
    let project = Project::new();

    project
        .cmd()
        .args(["--module=app.i18n", "--config=missing.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to load configuration"));
}

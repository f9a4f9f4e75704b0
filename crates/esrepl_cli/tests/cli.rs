#![allow(deprecated)]

use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

fn esrepl() -> Command {
  let mut cmd = Command::cargo_bin("esrepl").unwrap();
  cmd.env_remove("RUST_LOG");
  cmd
}

fn project_with_script() -> TempDir {
  let dir = tempfile::tempdir().unwrap();
  std::fs::write(dir.path().join("script.js"), "console.log('hello from script');\n").unwrap();
  dir
}

#[test]
fn help_exits_cleanly_without_building() {
  let dir = project_with_script();

  esrepl()
    .current_dir(dir.path())
    .args(["script.js", "--help"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage: esrepl <file>"))
    .stdout(predicate::str::contains("File built successfully").not());
}

#[test]
fn short_help_flag() {
  esrepl().arg("-h").assert().code(0).stdout(predicate::str::contains("--sourcemap=<mode>"));
}

#[test]
fn missing_target_is_usage_error() {
  esrepl()
    .assert()
    .code(1)
    .stderr(predicate::str::contains("No file to run specified."))
    .stdout(predicate::str::contains("Usage: esrepl <file>"));
}

#[test]
fn flags_alone_are_not_a_target() {
  esrepl()
    .args(["--sourcemap=false", "-d"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("No file to run specified."));
}

#[test]
fn nonexistent_target_is_reported_with_absolute_path() {
  let dir = tempfile::tempdir().unwrap();
  let expected = dir.path().canonicalize().unwrap().join("missing.js");

  esrepl()
    .current_dir(dir.path())
    .arg("missing.js")
    .assert()
    .code(1)
    .stderr(predicate::str::contains(format!("File {} does not exist.", expected.display())))
    .stdout(predicate::str::contains("File built successfully").not());
}

#[test]
fn debug_dumps_arguments_and_flags() {
  let dir = tempfile::tempdir().unwrap();

  esrepl()
    .current_dir(dir.path())
    .args(["missing.js", "--debug", "--sourcemap=external"])
    .assert()
    .code(1)
    .stdout(predicate::str::contains("\"missing.js\""))
    .stdout(predicate::str::contains("\"debug\": true"))
    .stdout(predicate::str::contains("\"sourcemap\": \"external\""));
}

#[test]
fn no_debug_output_by_default() {
  let dir = tempfile::tempdir().unwrap();

  esrepl()
    .current_dir(dir.path())
    .arg("missing.js")
    .assert()
    .code(1)
    .stdout(predicate::str::contains("Flags:").not());
}

#[test]
fn unavailable_bundler_is_build_error() {
  let dir = project_with_script();

  esrepl()
    .current_dir(dir.path())
    .env("ESBUILD_BINARY_PATH", dir.path().join("no-esbuild-here"))
    .args(["script.js", "-d"])
    .assert()
    .code(1)
    .stdout(predicate::str::contains("Source map:"))
    .stdout(predicate::str::contains("linked"))
    .stderr(predicate::str::contains("Failed to build file."))
    .stderr(predicate::str::contains("Failed to spawn the bundler"))
    .stdout(predicate::str::contains("File built successfully").not());
}

/// Stand-ins for `esbuild` and `node`: the first writes the requested `--outfile`, the second
/// records its argv in `node.log` and exits with `$NODE_EXIT_CODE`.
#[cfg(unix)]
fn stub_toolchain(dir: &std::path::Path) -> (std::path::PathBuf, std::path::PathBuf) {
  use std::os::unix::fs::PermissionsExt;

  let write_script = |name: &str, body: &str| {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
  };

  let esbuild = write_script(
    "esbuild",
    "#!/bin/sh\n\
     for arg in \"$@\"; do\n\
       case \"$arg\" in --outfile=*) out=\"${arg#--outfile=}\";; esac\n\
     done\n\
     mkdir -p \"$(dirname \"$out\")\"\n\
     echo '// bundled' > \"$out\"\n",
  );
  let node = write_script(
    "node",
    &format!(
      "#!/bin/sh\necho \"$@\" > '{}'\nexit \"${{NODE_EXIT_CODE:-0}}\"\n",
      dir.join("node.log").display()
    ),
  );

  (esbuild, node)
}

#[cfg(unix)]
#[test]
fn builds_once_then_runs_with_source_maps() {
  let dir = project_with_script();
  let (esbuild, node) = stub_toolchain(dir.path());

  esrepl()
    .current_dir(dir.path())
    .env("ESBUILD_BINARY_PATH", &esbuild)
    .env("NODE_BINARY_PATH", &node)
    .args(["script.js", "a", "b", "-d"])
    .assert()
    .code(0)
    .stdout(predicate::str::contains("File built successfully at"))
    .stdout(predicate::str::contains("output.js.map"));

  let node_args = std::fs::read_to_string(dir.path().join("node.log")).unwrap();
  assert!(node_args.starts_with("--enable-source-maps "));
  assert!(node_args.trim_end().ends_with("files/output.js a b"));
}

#[cfg(unix)]
#[test]
fn failing_script_exits_non_zero() {
  let dir = project_with_script();
  let (esbuild, node) = stub_toolchain(dir.path());

  esrepl()
    .current_dir(dir.path())
    .env("ESBUILD_BINARY_PATH", &esbuild)
    .env("NODE_BINARY_PATH", &node)
    .env("NODE_EXIT_CODE", "7")
    .args(["script.js", "--sourcemap=false"])
    .assert()
    .code(1)
    .stdout(predicate::str::contains("File built successfully at"))
    .stderr(predicate::str::contains("Failed to run file: script exited with code 7"));

  let node_args = std::fs::read_to_string(dir.path().join("node.log")).unwrap();
  assert!(!node_args.contains("--enable-source-maps"));
}

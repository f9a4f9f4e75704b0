use std::path::{Path, PathBuf};

use esrepl_error::{RunError, RunResult};
use esrepl_fs::FileSystem;
use esrepl_utils::path_ext::PathExt;

use crate::ArgSet;

/// Leading positionals that belong to the host rather than the user. A native binary only has
/// its own path in front of the file to run.
pub const HOST_ARGS: usize = 1;

#[derive(Debug, PartialEq, Eq)]
pub struct Target {
  /// Absolute, normalized path of the file to run.
  pub entry: PathBuf,
  /// Positionals after the file to run, forwarded to the script.
  pub script_args: Vec<String>,
}

/// Picks the file to run out of `args`, `leading` positionals in, and checks that it exists.
pub fn resolve_target(
  args: &ArgSet,
  leading: usize,
  cwd: &Path,
  fs: &impl FileSystem,
) -> RunResult<Target> {
  if args.is_help() {
    return Err(RunError::Usage { requested: true });
  }

  let Some(file_to_run) = args.positional.get(leading) else {
    return Err(RunError::Usage { requested: false });
  };

  let entry = Path::new(file_to_run).resolve_from(cwd);
  if !fs.exists(&entry) {
    return Err(RunError::NotFound(entry));
  }

  Ok(Target { entry, script_args: args.positional[leading + 1..].to_vec() })
}

#[cfg(test)]
struct FakeFileSystem(Vec<PathBuf>);

#[cfg(test)]
impl FileSystem for FakeFileSystem {
  fn exists(&self, path: &Path) -> bool {
    self.0.iter().any(|existing| existing == path)
  }
}

#[test]
fn test_resolves_relative_to_cwd() {
  let fs = FakeFileSystem(vec![PathBuf::from("/work/script.js")]);
  let args = ArgSet::parse(["node", "cli", "./script.js"]);

  let target = resolve_target(&args, 2, Path::new("/work"), &fs).unwrap();
  assert_eq!(target, Target { entry: PathBuf::from("/work/script.js"), script_args: vec![] });
}

#[test]
fn test_native_argv_and_script_args() {
  let fs = FakeFileSystem(vec![PathBuf::from("/work/src/main.ts")]);
  let args = ArgSet::parse(["esrepl", "src/main.ts", "--debug", "one", "two"]);

  let target = resolve_target(&args, HOST_ARGS, Path::new("/work"), &fs).unwrap();
  assert_eq!(target.entry, Path::new("/work/src/main.ts"));
  assert_eq!(target.script_args, ["one", "two"]);
}

#[test]
fn test_missing_target_is_usage_error() {
  let fs = FakeFileSystem(vec![]);
  let args = ArgSet::parse(["node", "cli"]);

  let err = resolve_target(&args, 2, Path::new("/work"), &fs).unwrap_err();
  assert!(matches!(err, RunError::Usage { requested: false }));
}

#[test]
fn test_help_wins_over_target() {
  let fs = FakeFileSystem(vec![PathBuf::from("/work/script.js")]);
  let args = ArgSet::parse(["esrepl", "script.js", "-h"]);

  let err = resolve_target(&args, HOST_ARGS, Path::new("/work"), &fs).unwrap_err();
  assert!(matches!(err, RunError::Usage { requested: true }));
}

#[test]
fn test_not_found_reports_absolute_path() {
  let fs = FakeFileSystem(vec![]);
  let args = ArgSet::parse(["esrepl", "../gone.js"]);

  let err = resolve_target(&args, HOST_ARGS, Path::new("/work/app"), &fs).unwrap_err();
  assert!(matches!(err, RunError::NotFound(path) if path == Path::new("/work/gone.js")));
}

use std::{
  future::Future,
  path::{Path, PathBuf},
};

use anyhow::Context;
use esrepl_error::{RunError, RunResult};
use tokio::process::Command;

use crate::StackTraceSupport;

const BINARY_PATH_ENV: &str = "NODE_BINARY_PATH";

/// What a loaded module left behind once it finished running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleExit {
  /// `None` when the runtime was killed by a signal.
  pub code: Option<i32>,
}

impl ModuleExit {
  #[inline]
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

/// Loads a module by path and runs it to completion.
///
/// Fails with [`RunError::Load`] when the module cannot be started at all. A module that starts
/// and then throws is reported through a non-zero [`ModuleExit`].
pub trait ModuleLoader {
  fn load(&self, module: &Path, args: &[String]) -> impl Future<Output = RunResult<ModuleExit>>;
}

/// Runs CommonJS bundles with the `node` executable, sharing this process' stdio.
#[derive(Debug)]
pub struct NodeLoader<S> {
  binary: PathBuf,
  stack_traces: S,
}

impl<S: StackTraceSupport> NodeLoader<S> {
  pub fn new(binary: impl Into<PathBuf>, stack_traces: S) -> Self {
    Self { binary: binary.into(), stack_traces }
  }

  /// `$NODE_BINARY_PATH`, or `node` from `PATH`.
  pub fn from_env(stack_traces: S) -> Self {
    let binary = std::env::var_os(BINARY_PATH_ENV);
    Self::new(binary.map_or_else(|| PathBuf::from("node"), PathBuf::from), stack_traces)
  }

  pub fn command_args(&self, module: &Path, args: &[String]) -> Vec<String> {
    let mut command_args: Vec<String> =
      self.stack_traces.runtime_args().iter().map(ToString::to_string).collect();
    command_args.push(module.to_string_lossy().into_owned());
    command_args.extend_from_slice(args);
    command_args
  }
}

impl<S: StackTraceSupport> ModuleLoader for NodeLoader<S> {
  async fn load(&self, module: &Path, args: &[String]) -> RunResult<ModuleExit> {
    let load_error = |reason: anyhow::Error| RunError::Load { module: module.to_path_buf(), reason };

    let exists = tokio::fs::try_exists(module)
      .await
      .with_context(|| format!("Failed to access {}", module.display()))
      .map_err(load_error)?;
    if !exists {
      return Err(load_error(anyhow::anyhow!("the bundle was not written")));
    }

    let command_args = self.command_args(module, args);
    log::debug!("Running {} {}", self.binary.display(), command_args.join(" "));

    let status = Command::new(&self.binary)
      .args(&command_args)
      .status()
      .await
      .with_context(|| format!("Failed to spawn {}", self.binary.display()))
      .map_err(load_error)?;

    Ok(ModuleExit { code: status.code() })
  }
}

#[test]
fn test_command_args() {
  use crate::NodeSourceMaps;

  let loader = NodeLoader::new("node", NodeSourceMaps::new());
  let module = Path::new("/opt/files/output.js");
  let args = vec!["--port".to_string(), "8080".to_string()];

  assert_eq!(loader.command_args(module, &args), ["/opt/files/output.js", "--port", "8080"]);

  loader.stack_traces.install().unwrap();
  assert_eq!(
    loader.command_args(module, &[]),
    ["--enable-source-maps", "/opt/files/output.js"]
  );
}

#[cfg(test)]
#[tokio::test]
async fn test_missing_module_is_load_error() {
  let loader = NodeLoader::new("node", crate::NoStackTraces);
  let module = Path::new("/nonexistent/files/output.js");

  let err = loader.load(module, &[]).await.unwrap_err();
  assert!(matches!(err, RunError::Load { module: path, .. } if path == module));
}

#[cfg(test)]
#[tokio::test]
async fn test_missing_runtime_is_load_error() {
  let loader = NodeLoader::new("/nonexistent/node", crate::NoStackTraces);
  let module = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");

  let err = loader.load(&module, &[]).await.unwrap_err();
  assert!(err.to_string().contains("Failed to spawn /nonexistent/node"));
}

use std::path::PathBuf;

use crate::BuildError;

/// Every way a single invocation can stop before the script finishes cleanly.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
  /// No file to run was given, or help was asked for.
  #[error("No file to run specified.")]
  Usage { requested: bool },

  #[error("File {} does not exist.", .0.display())]
  NotFound(PathBuf),

  #[error("Failed to build file:\n{0}")]
  Build(#[from] BuildError),

  #[error("Failed to load {}: {reason:#}", module.display())]
  Load { module: PathBuf, reason: anyhow::Error },

  #[error("Failed to run file: {}", describe_exit(*code))]
  Execution { code: Option<i32> },
}

fn describe_exit(code: Option<i32>) -> String {
  match code {
    Some(code) => format!("script exited with code {code}"),
    None => "script was terminated by a signal".to_string(),
  }
}

impl RunError {
  /// Process exit code for this failure. Only an explicit help request exits cleanly.
  pub fn exit_code(&self) -> u8 {
    match self {
      Self::Usage { requested: true } => 0,
      _ => 1,
    }
  }
}

pub type RunResult<T> = Result<T, RunError>;

#[test]
fn test_exit_codes() {
  assert_eq!(RunError::Usage { requested: true }.exit_code(), 0);
  assert_eq!(RunError::Usage { requested: false }.exit_code(), 1);
  assert_eq!(RunError::NotFound(PathBuf::from("/x.js")).exit_code(), 1);
  assert_eq!(RunError::Execution { code: Some(0) }.exit_code(), 1);
  assert_eq!(RunError::from(BuildError::from(anyhow::anyhow!("boom"))).exit_code(), 1);
}

#[test]
fn test_messages() {
  assert_eq!(
    RunError::NotFound(PathBuf::from("/tmp/missing.js")).to_string(),
    "File /tmp/missing.js does not exist."
  );
  assert_eq!(
    RunError::Execution { code: Some(3) }.to_string(),
    "Failed to run file: script exited with code 3"
  );
  assert_eq!(
    RunError::Execution { code: None }.to_string(),
    "Failed to run file: script was terminated by a signal"
  );
  assert_eq!(
    RunError::from(BuildError::from(anyhow::anyhow!("Unexpected end of file"))).to_string(),
    "Failed to build file:\nUnexpected end of file"
  );
}

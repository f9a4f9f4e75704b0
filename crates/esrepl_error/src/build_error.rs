use std::{
  fmt::{self, Display},
  ops::{Deref, DerefMut},
};

/// Every diagnostic the bundler reported for a failed build.
#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, error) in self.0.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      write!(f, "{error:#}")?;
    }
    Ok(())
  }
}

impl std::error::Error for BuildError {}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;

#[test]
fn test_display_joins_diagnostics() {
  let error = BuildError::from(vec![
    anyhow::anyhow!("Could not resolve \"./missing\""),
    anyhow::Error::msg("Expected \";\" but found \"}\""),
  ]);

  assert_eq!(error.len(), 2);
  assert_eq!(
    error.to_string(),
    "Could not resolve \"./missing\"\nExpected \";\" but found \"}\""
  );
}

#[test]
fn test_display_keeps_context_chain() {
  let error = BuildError::from(anyhow::anyhow!("No such file").context("Failed to spawn esbuild"));
  assert_eq!(error.to_string(), "Failed to spawn esbuild: No such file");
}

use std::fmt::Display;

/// How chatty the bundler is allowed to be on stderr.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
  #[default]
  Warning,
  Info,
}

impl Display for LogLevel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Warning => write!(f, "warning"),
      Self::Info => write!(f, "info"),
    }
  }
}

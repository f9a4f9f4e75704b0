use std::{convert::Infallible, fmt::Display, str::FromStr};

const DEFAULT_SOURCE_MAP_MODE: &str = "linked";

/// Source-map generation mode passed to the bundler.
///
/// `true`/`false` are the only values interpreted here; any other selector (`linked`,
/// `external`, `inline`, `both`, ...) is handed over as-is and validated by the bundler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMapMode {
  Enabled(bool),
  Named(String),
}

impl Default for SourceMapMode {
  fn default() -> Self {
    Self::Named(DEFAULT_SOURCE_MAP_MODE.to_string())
  }
}

impl SourceMapMode {
  #[inline]
  pub fn is_enabled(&self) -> bool {
    !matches!(self, Self::Enabled(false))
  }

  /// Whether a `<outfile>.map` file is written next to the bundle.
  pub fn writes_map_file(&self) -> bool {
    match self {
      Self::Enabled(enabled) => *enabled,
      Self::Named(mode) => matches!(mode.as_str(), "linked" | "external" | "both"),
    }
  }
}

impl FromStr for SourceMapMode {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(match s {
      "true" => Self::Enabled(true),
      "false" => Self::Enabled(false),
      mode => Self::Named(mode.to_string()),
    })
  }
}

impl Display for SourceMapMode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Enabled(enabled) => write!(f, "{enabled}"),
      Self::Named(mode) => write!(f, "{mode}"),
    }
  }
}

#[test]
fn test_from_str() {
  assert_eq!("true".parse::<SourceMapMode>(), Ok(SourceMapMode::Enabled(true)));
  assert_eq!("false".parse::<SourceMapMode>(), Ok(SourceMapMode::Enabled(false)));
  assert_eq!("external".parse::<SourceMapMode>(), Ok(SourceMapMode::Named("external".to_string())));
  // Not validated here.
  assert_eq!("bogus".parse::<SourceMapMode>(), Ok(SourceMapMode::Named("bogus".to_string())));
}

#[test]
fn test_map_file() {
  assert!(SourceMapMode::default().writes_map_file());
  assert!(SourceMapMode::Enabled(true).writes_map_file());
  assert!(!SourceMapMode::Enabled(false).writes_map_file());
  assert!(!SourceMapMode::Named("inline".to_string()).writes_map_file());
  assert!(SourceMapMode::Named("inline".to_string()).is_enabled());
  assert!(!SourceMapMode::Enabled(false).is_enabled());
}

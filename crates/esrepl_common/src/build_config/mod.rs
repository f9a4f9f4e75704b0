pub mod log_level;
pub mod output_format;
pub mod platform;
pub mod source_map_mode;

use std::path::PathBuf;

use crate::{LogLevel, OutputFormat, Platform, SourceMapMode};

pub const DEFAULT_TARGET: &str = "node14";

/// Everything handed to the bundler for one run. Built once, never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
  // --- Input
  pub entry: PathBuf,
  pub platform: Platform,
  pub target: String,

  // --- Output
  pub outfile: PathBuf,
  pub bundle: bool,
  pub format: OutputFormat,
  pub source_map: SourceMapMode,

  pub log_level: LogLevel,
}

impl BuildConfig {
  /// The fixed defaults: a node14 CommonJS bundle with a linked source map.
  pub fn new(entry: PathBuf, outfile: PathBuf) -> Self {
    Self {
      entry,
      platform: Platform::Node,
      target: DEFAULT_TARGET.to_string(),
      outfile,
      bundle: true,
      format: OutputFormat::Cjs,
      source_map: SourceMapMode::default(),
      log_level: LogLevel::default(),
    }
  }
}

#[test]
fn test_defaults() {
  let config = BuildConfig::new(PathBuf::from("/src/script.js"), PathBuf::from("/files/output.js"));

  assert!(config.bundle);
  assert_eq!(config.platform, Platform::Node);
  assert_eq!(config.target, "node14");
  assert_eq!(config.format, OutputFormat::Cjs);
  assert_eq!(config.source_map, SourceMapMode::Named("linked".to_string()));
  assert_eq!(config.log_level, LogLevel::Warning);
}

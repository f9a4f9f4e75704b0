mod build_config;

pub use build_config::{
  log_level::LogLevel, output_format::OutputFormat, platform::Platform,
  source_map_mode::SourceMapMode,
  BuildConfig, DEFAULT_TARGET,
};

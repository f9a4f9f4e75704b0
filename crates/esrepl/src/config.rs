use std::{convert::Infallible, io, path::PathBuf};

use esrepl_common::{BuildConfig, LogLevel, SourceMapMode};
use esrepl_utils::path_ext::install_dir;
use sugar_path::SugarPath;

use crate::{ArgSet, FlagValue};

const OUTPUT_DIR: &str = "files";
const OUTPUT_FILE_NAME: &str = "output.js";

/// `<install dir>/../files/output.js`. Shared by every invocation and overwritten on each run.
pub fn default_outfile() -> io::Result<PathBuf> {
  Ok(install_dir()?.join("..").join(OUTPUT_DIR).join(OUTPUT_FILE_NAME).normalize())
}

pub fn build_config(args: &ArgSet, entry: PathBuf, outfile: PathBuf) -> BuildConfig {
  let mut config = BuildConfig::new(entry, outfile);

  if let Some(value) = args.flag("sourcemap") {
    config.source_map = match value {
      FlagValue::True => SourceMapMode::Enabled(true),
      FlagValue::Str(mode) => mode.parse().unwrap_or_else(|never: Infallible| match never {}),
    };
  }

  if args.is_debug() {
    config.log_level = LogLevel::Info;
  }

  config
}

#[cfg(test)]
fn config_for(raw: &[&str]) -> BuildConfig {
  let args = ArgSet::parse(raw.iter().copied());
  build_config(&args, PathBuf::from("/work/script.js"), PathBuf::from("/opt/files/output.js"))
}

#[test]
fn test_fixed_options() {
  let config = config_for(&["node", "cli", "./script.js"]);

  assert!(config.bundle);
  assert_eq!(config.platform, esrepl_common::Platform::Node);
  assert_eq!(config.target, "node14");
  assert_eq!(config.format, esrepl_common::OutputFormat::Cjs);
  assert_eq!(config.entry, PathBuf::from("/work/script.js"));
  assert_eq!(config.outfile, PathBuf::from("/opt/files/output.js"));
  assert_eq!(config.log_level, LogLevel::Warning);
}

#[test]
fn test_source_map_flag() {
  assert_eq!(config_for(&[]).source_map, SourceMapMode::Named("linked".to_string()));
  assert_eq!(config_for(&["--sourcemap=true"]).source_map, SourceMapMode::Enabled(true));
  assert_eq!(config_for(&["--sourcemap=false"]).source_map, SourceMapMode::Enabled(false));
  assert_eq!(
    config_for(&["--sourcemap=external"]).source_map,
    SourceMapMode::Named("external".to_string())
  );
  assert_eq!(config_for(&["--sourcemap"]).source_map, SourceMapMode::Enabled(true));
  assert_eq!(
    config_for(&["--sourcemap=inline", "--sourcemap=false"]).source_map,
    SourceMapMode::Enabled(false)
  );
}

#[test]
fn test_debug_raises_bundler_log_level() {
  assert_eq!(config_for(&["-d"]).log_level, LogLevel::Info);
  assert_eq!(config_for(&["--debug"]).log_level, LogLevel::Info);
}

#[test]
fn test_default_outfile_is_under_files() {
  let outfile = default_outfile().unwrap();

  assert!(outfile.is_absolute());
  assert!(outfile.ends_with("files/output.js"));
}

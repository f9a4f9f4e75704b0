use std::{
  path::PathBuf,
  process::{ExitStatus, Stdio},
  sync::LazyLock,
};

use anyhow::Context;
use esrepl_common::{BuildConfig, SourceMapMode};
use esrepl_error::{BuildError, BuildResult};
use esrepl_utils::path_ext::PathExt;
use regex::Regex;
use tokio::process::Command;

use super::{Bundle, BundleOutput};

/// Same variable the esbuild npm package honours to locate its native binary.
const BINARY_PATH_ENV: &str = "ESBUILD_BINARY_PATH";

static ERROR_HEADER_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(?:[✘X] \[ERROR\]|error:)\s*").unwrap());

static BLOCK_END_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(?:[▲!] \[WARNING\]|warning:|\d+ (?:error|warning))").unwrap());

/// Drives the `esbuild` executable.
#[derive(Debug, Clone)]
pub struct EsbuildBundler {
  binary: PathBuf,
}

impl EsbuildBundler {
  pub fn new(binary: impl Into<PathBuf>) -> Self {
    Self { binary: binary.into() }
  }

  /// `$ESBUILD_BINARY_PATH`, or `esbuild` from `PATH`.
  pub fn from_env() -> Self {
    let binary = std::env::var_os(BINARY_PATH_ENV);
    Self::new(binary.map_or_else(|| PathBuf::from("esbuild"), PathBuf::from))
  }

  pub fn command_args(config: &BuildConfig) -> Vec<String> {
    let mut args = vec![config.entry.to_string_lossy().into_owned()];

    if config.bundle {
      args.push("--bundle".to_string());
    }
    args.push(format!("--outfile={}", config.outfile.to_string_lossy()));
    args.push(format!("--platform={}", config.platform));
    args.push(format!("--target={}", config.target));
    args.push(format!("--format={}", config.format));

    match &config.source_map {
      SourceMapMode::Enabled(false) => {}
      SourceMapMode::Enabled(true) => args.push("--sourcemap".to_string()),
      SourceMapMode::Named(mode) => args.push(format!("--sourcemap={mode}")),
    }

    args.push(format!("--log-level={}", config.log_level));
    args
  }
}

impl Bundle for EsbuildBundler {
  async fn bundle(&self, config: &BuildConfig) -> BuildResult<BundleOutput> {
    let args = Self::command_args(config);
    log::debug!("Running {} {}", self.binary.display(), args.join(" "));

    let output = Command::new(&self.binary)
      .args(&args)
      .stdin(Stdio::null())
      .output()
      .await
      .with_context(|| format!("Failed to spawn the bundler at {}", self.binary.display()))?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
      return Err(collect_diagnostics(&stderr, output.status));
    }

    // Warnings, and the build summary at `info` level.
    if !stderr.trim().is_empty() {
      eprint!("{stderr}");
    }

    Ok(BundleOutput {
      outfile: config.outfile.clone(),
      source_map: config.source_map.writes_map_file().then(|| config.outfile.sibling_source_map()),
    })
  }
}

/// Splits esbuild's stderr into one error per `[ERROR]` block, dropping warnings and the
/// trailing summary line.
fn collect_diagnostics(stderr: &str, status: ExitStatus) -> BuildError {
  let mut errors = vec![];
  let mut current: Option<String> = None;

  let mut flush = |current: &mut Option<String>| {
    if let Some(block) = current.take() {
      errors.push(anyhow::anyhow!(block.trim_end().to_string()));
    }
  };

  for line in stderr.lines() {
    if let Some(header) = ERROR_HEADER_RE.find(line) {
      flush(&mut current);
      current = Some(line[header.end()..].to_string());
    } else if BLOCK_END_RE.is_match(line) {
      flush(&mut current);
    } else if let Some(block) = &mut current {
      block.push('\n');
      block.push_str(line);
    }
  }
  flush(&mut current);

  if errors.is_empty() {
    let stderr = stderr.trim();
    errors.push(if stderr.is_empty() {
      anyhow::anyhow!("esbuild exited with {status}")
    } else {
      anyhow::anyhow!(stderr.to_string())
    });
  }

  errors.into()
}

#[cfg(all(test, unix))]
fn failed_status() -> ExitStatus {
  use std::os::unix::process::ExitStatusExt;
  ExitStatus::from_raw(1 << 8)
}

#[test]
fn test_command_args() {
  let mut config =
    BuildConfig::new(PathBuf::from("/work/script.ts"), PathBuf::from("/opt/files/output.js"));

  assert_eq!(
    EsbuildBundler::command_args(&config),
    [
      "/work/script.ts",
      "--bundle",
      "--outfile=/opt/files/output.js",
      "--platform=node",
      "--target=node14",
      "--format=cjs",
      "--sourcemap=linked",
      "--log-level=warning",
    ]
  );

  config.source_map = SourceMapMode::Enabled(false);
  assert!(!EsbuildBundler::command_args(&config).iter().any(|arg| arg.starts_with("--sourcemap")));

  config.source_map = SourceMapMode::Enabled(true);
  assert!(EsbuildBundler::command_args(&config).contains(&"--sourcemap".to_string()));
}

#[cfg(unix)]
#[test]
fn test_collect_diagnostics() {
  let stderr = "\
▲ [WARNING] Comparison with -0 using the \"===\" operator will also match 0

    src/a.js:1:4:
      1 │ if (x === -0) {}
        ╵     ~~~~~~~~

✘ [ERROR] Could not resolve \"./missing\"

    src/a.js:2:7:
      2 │ import \"./missing\"
        ╵        ~~~~~~~~~~~

✘ [ERROR] Expected \";\" but found \"}\"

    src/b.js:3:0:
      3 │ }
        ╵ ^

1 warning and 2 errors
";

  let error = collect_diagnostics(stderr, failed_status());
  assert_eq!(error.len(), 2);
  assert!(error[0].to_string().starts_with("Could not resolve \"./missing\"\n"));
  assert!(error[0].to_string().ends_with("~~~~~~~~~~~"));
  assert!(error[1].to_string().starts_with("Expected \";\" but found \"}\""));
  assert!(!error.to_string().contains("WARNING"));
  assert!(!error.to_string().contains("2 errors"));
}

#[cfg(unix)]
#[test]
fn test_collect_diagnostics_without_blocks() {
  let error = collect_diagnostics("Invalid build flag: \"--nope\"\n", failed_status());
  assert_eq!(error.to_string(), "Invalid build flag: \"--nope\"");

  let error = collect_diagnostics("", failed_status());
  assert!(error.to_string().starts_with("esbuild exited with "));
}

#[cfg(test)]
#[tokio::test]
async fn test_missing_binary_is_build_error() {
  let bundler = EsbuildBundler::new("/nonexistent/esbuild");
  let config = BuildConfig::new(PathBuf::from("/work/a.js"), PathBuf::from("/tmp/out.js"));

  let error = bundler.bundle(&config).await.unwrap_err();
  assert_eq!(error.len(), 1);
  assert!(error.to_string().starts_with("Failed to spawn the bundler at /nonexistent/esbuild"));
}

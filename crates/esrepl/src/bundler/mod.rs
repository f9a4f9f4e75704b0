pub mod esbuild;

use std::{future::Future, path::PathBuf};

use esrepl_common::BuildConfig;
use esrepl_error::BuildResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutput {
  pub outfile: PathBuf,
  /// The map file written next to `outfile`, if the source-map mode asks for one.
  pub source_map: Option<PathBuf>,
}

/// The external bundler. One call produces one self-contained script at `config.outfile`.
pub trait Bundle {
  fn bundle(&self, config: &BuildConfig) -> impl Future<Output = BuildResult<BundleOutput>>;
}

use std::path::Path;

/// The filesystem queries the runner makes itself. Everything else is read and written by the
/// bundler and the runtime.
pub trait FileSystem: Send + Sync {
  /// Whether `path` refers to an existing entry of any kind.
  fn exists(&self, path: &Path) -> bool;
}

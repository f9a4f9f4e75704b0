use std::path::Path;

use crate::FileSystem;

#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
  fn exists(&self, path: &Path) -> bool {
    path.exists()
  }
}

#[test]
fn test_exists() {
  let fs = OsFileSystem;
  let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

  assert!(fs.exists(manifest_dir));
  assert!(fs.exists(&manifest_dir.join("Cargo.toml")));
  assert!(!fs.exists(&manifest_dir.join("does-not-exist.js")));
  // A file used as a directory is an error from the OS, still reported as missing.
  assert!(!fs.exists(&manifest_dir.join("Cargo.toml").join("script.js")));
}

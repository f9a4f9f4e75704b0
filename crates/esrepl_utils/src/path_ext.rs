use std::{
  ffi::OsString,
  io,
  path::{Path, PathBuf},
};

use sugar_path::SugarPath;

pub trait PathExt {
  /// Resolves `self` against `base` the way `path.resolve(base, self)` does in Node.js.
  fn resolve_from(&self, base: &Path) -> PathBuf;

  /// `output.js` -> `output.js.map`
  fn sibling_source_map(&self) -> PathBuf;
}

impl PathExt for Path {
  fn resolve_from(&self, base: &Path) -> PathBuf {
    if self.is_absolute() {
      self.normalize()
    } else {
      base.join(self).normalize()
    }
  }

  fn sibling_source_map(&self) -> PathBuf {
    let mut file_name = self.file_name().map(OsString::from).unwrap_or_default();
    file_name.push(".map");
    self.with_file_name(file_name)
  }
}

/// Directory holding the running executable, with symlinks resolved.
pub fn install_dir() -> io::Result<PathBuf> {
  let exe = dunce::canonicalize(std::env::current_exe()?)?;
  exe.parent().map(Path::to_path_buf).ok_or_else(|| {
    io::Error::new(io::ErrorKind::NotFound, format!("{} has no parent directory", exe.display()))
  })
}

#[test]
fn test_resolve_from() {
  let base = Path::new("/home/user/project");

  assert_eq!(Path::new("./script.js").resolve_from(base), Path::new("/home/user/project/script.js"));
  assert_eq!(Path::new("../other/a.ts").resolve_from(base), Path::new("/home/user/other/a.ts"));
  assert_eq!(Path::new("/tmp/./x.js").resolve_from(base), Path::new("/tmp/x.js"));
}

#[test]
fn test_sibling_source_map() {
  let outfile = Path::new("/opt/esrepl/files/output.js");
  assert_eq!(outfile.sibling_source_map(), Path::new("/opt/esrepl/files/output.js.map"));
}

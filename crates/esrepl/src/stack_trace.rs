use std::sync::atomic::{AtomicBool, Ordering};

/// Translation of stack-trace positions in the bundle back to the original sources.
///
/// Activation is one-way: once installed it stays on for the rest of the process.
pub trait StackTraceSupport {
  fn install(&self) -> anyhow::Result<()>;

  fn is_installed(&self) -> bool;

  /// Extra runtime flags needed while installed.
  fn runtime_args(&self) -> &'static [&'static str];
}

/// Source-map aware stack traces through node's own `--enable-source-maps`.
#[derive(Debug, Default)]
pub struct NodeSourceMaps {
  installed: AtomicBool,
}

impl NodeSourceMaps {
  pub fn new() -> Self {
    Self::default()
  }
}

impl StackTraceSupport for NodeSourceMaps {
  fn install(&self) -> anyhow::Result<()> {
    if !self.installed.swap(true, Ordering::AcqRel) {
      log::debug!("Source-map stack traces enabled");
    }
    Ok(())
  }

  fn is_installed(&self) -> bool {
    self.installed.load(Ordering::Acquire)
  }

  fn runtime_args(&self) -> &'static [&'static str] {
    if self.is_installed() {
      &["--enable-source-maps"]
    } else {
      &[]
    }
  }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoStackTraces;

impl StackTraceSupport for NoStackTraces {
  fn install(&self) -> anyhow::Result<()> {
    Ok(())
  }

  fn is_installed(&self) -> bool {
    false
  }

  fn runtime_args(&self) -> &'static [&'static str] {
    &[]
  }
}

impl<T: StackTraceSupport + ?Sized> StackTraceSupport for std::sync::Arc<T> {
  fn install(&self) -> anyhow::Result<()> {
    (**self).install()
  }

  fn is_installed(&self) -> bool {
    (**self).is_installed()
  }

  fn runtime_args(&self) -> &'static [&'static str] {
    (**self).runtime_args()
  }
}

#[test]
fn test_node_source_maps_install_once() {
  let source_maps = NodeSourceMaps::new();
  assert!(!source_maps.is_installed());
  assert!(source_maps.runtime_args().is_empty());

  source_maps.install().unwrap();
  source_maps.install().unwrap();

  assert!(source_maps.is_installed());
  assert_eq!(source_maps.runtime_args(), ["--enable-source-maps"]);
}

#[test]
fn test_no_stack_traces() {
  NoStackTraces.install().unwrap();
  assert!(!NoStackTraces.is_installed());
  assert!(NoStackTraces.runtime_args().is_empty());
}

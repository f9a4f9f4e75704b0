use esrepl_common::BuildConfig;
use esrepl_error::{RunError, RunResult};

use crate::{Bundle, BundleOutput, ModuleLoader, StackTraceSupport};

/// Sequences one invocation: build, then optionally enable source-map stack traces, then run
/// the bundle. Each step only starts if the previous one succeeded.
pub struct Runner<B, S, L> {
  bundler: B,
  stack_traces: S,
  loader: L,
}

impl<B: Bundle, S: StackTraceSupport, L: ModuleLoader> Runner<B, S, L> {
  pub fn new(bundler: B, stack_traces: S, loader: L) -> Self {
    Self { bundler, stack_traces, loader }
  }

  /// `on_built` is called once the bundle is on disk, before it runs.
  pub async fn run(
    &self,
    config: &BuildConfig,
    script_args: &[String],
    on_built: impl FnOnce(&BundleOutput),
  ) -> RunResult<()> {
    let output = self.bundler.bundle(config).await?;
    on_built(&output);

    if config.source_map.is_enabled() {
      if let Err(err) = self.stack_traces.install() {
        log::warn!("Stack traces will not be source-mapped: {err:#}");
      }
    }

    let exit = self.loader.load(&output.outfile, script_args).await?;
    if exit.success() {
      Ok(())
    } else {
      Err(RunError::Execution { code: exit.code })
    }
  }
}

#[cfg(test)]
mod fakes {
  use std::{cell::RefCell, path::Path, rc::Rc};

  use esrepl_common::BuildConfig;
  use esrepl_error::{BuildResult, RunResult};

  use crate::{Bundle, BundleOutput, ModuleExit, ModuleLoader, StackTraceSupport};

  pub type Events = Rc<RefCell<Vec<String>>>;

  pub struct FakeBundler {
    pub events: Events,
    pub fail: bool,
  }

  impl Bundle for FakeBundler {
    async fn bundle(&self, config: &BuildConfig) -> BuildResult<BundleOutput> {
      self.events.borrow_mut().push("bundle".to_string());
      if self.fail {
        return Err(anyhow::Error::msg("Unexpected \"}\"").into());
      }
      Ok(BundleOutput { outfile: config.outfile.clone(), source_map: None })
    }
  }

  pub struct FakeStackTraces {
    pub events: Events,
    pub fail: bool,
  }

  impl StackTraceSupport for FakeStackTraces {
    fn install(&self) -> anyhow::Result<()> {
      self.events.borrow_mut().push("install".to_string());
      if self.fail {
        anyhow::bail!("unsupported runtime");
      }
      Ok(())
    }

    fn is_installed(&self) -> bool {
      self.events.borrow().iter().any(|event| event == "install")
    }

    fn runtime_args(&self) -> &'static [&'static str] {
      &[]
    }
  }

  pub struct FakeLoader {
    pub events: Events,
    pub code: Option<i32>,
  }

  impl ModuleLoader for FakeLoader {
    async fn load(&self, module: &Path, args: &[String]) -> RunResult<ModuleExit> {
      self.events.borrow_mut().push(format!("load {} {}", module.display(), args.join(" ")));
      Ok(ModuleExit { code: self.code })
    }
  }
}

#[cfg(test)]
fn runner_with(
  events: &fakes::Events,
  build_fails: bool,
  install_fails: bool,
  code: Option<i32>,
) -> Runner<fakes::FakeBundler, fakes::FakeStackTraces, fakes::FakeLoader> {
  use std::rc::Rc;

  Runner::new(
    fakes::FakeBundler { events: Rc::clone(events), fail: build_fails },
    fakes::FakeStackTraces { events: Rc::clone(events), fail: install_fails },
    fakes::FakeLoader { events: Rc::clone(events), code },
  )
}

#[cfg(test)]
fn test_config() -> BuildConfig {
  use std::path::PathBuf;

  BuildConfig::new(PathBuf::from("/work/script.js"), PathBuf::from("/opt/files/output.js"))
}

#[cfg(test)]
#[tokio::test]
async fn test_build_then_install_then_load() {
  let events = fakes::Events::default();
  let runner = runner_with(&events, false, false, Some(0));
  let mut built = 0;

  runner.run(&test_config(), &["a".to_string()], |_| built += 1).await.unwrap();

  assert_eq!(built, 1);
  assert_eq!(*events.borrow(), ["bundle", "install", "load /opt/files/output.js a"]);
}

#[cfg(test)]
#[tokio::test]
async fn test_build_failure_stops_before_execution() {
  let events = fakes::Events::default();
  let runner = runner_with(&events, true, false, Some(0));

  let err = runner.run(&test_config(), &[], |_| panic!("nothing was built")).await.unwrap_err();

  assert!(matches!(err, RunError::Build(ref errors) if errors.len() == 1));
  assert_eq!(*events.borrow(), ["bundle"]);
}

#[cfg(test)]
#[tokio::test]
async fn test_disabled_source_map_skips_install() {
  let events = fakes::Events::default();
  let runner = runner_with(&events, false, false, Some(0));
  let mut config = test_config();
  config.source_map = esrepl_common::SourceMapMode::Enabled(false);

  runner.run(&config, &[], |_| {}).await.unwrap();

  assert_eq!(*events.borrow(), ["bundle", "load /opt/files/output.js "]);
}

#[cfg(test)]
#[tokio::test]
async fn test_install_failure_still_runs() {
  let events = fakes::Events::default();
  let runner = runner_with(&events, false, true, Some(0));

  runner.run(&test_config(), &[], |_| {}).await.unwrap();

  assert_eq!(events.borrow().len(), 3);
}

#[cfg(test)]
#[tokio::test]
async fn test_script_failure_is_execution_error() {
  let events = fakes::Events::default();
  let runner = runner_with(&events, false, false, Some(3));

  let err = runner.run(&test_config(), &[], |_| {}).await.unwrap_err();

  assert!(matches!(err, RunError::Execution { code: Some(3) }));
  assert_eq!(err.exit_code(), 1);
}

#[cfg(test)]
#[tokio::test]
async fn test_killed_script_is_execution_error() {
  let events = fakes::Events::default();
  let runner = runner_with(&events, false, false, None);

  let err = runner.run(&test_config(), &[], |_| {}).await.unwrap_err();

  assert!(matches!(err, RunError::Execution { code: None }));
}

mod args;
mod bundler;
mod config;
mod loader;
mod runner;
mod stack_trace;
mod target;

pub use crate::{
  args::{ArgSet, FlagValue},
  bundler::{esbuild::EsbuildBundler, Bundle, BundleOutput},
  config::{build_config, default_outfile},
  loader::{ModuleExit, ModuleLoader, NodeLoader},
  runner::Runner,
  stack_trace::{NoStackTraces, NodeSourceMaps, StackTraceSupport},
  target::{resolve_target, Target, HOST_ARGS},
};

pub use esrepl_common::*;
pub use esrepl_error::{BuildError, BuildResult, RunError, RunResult};
pub use esrepl_fs::{FileSystem, OsFileSystem};

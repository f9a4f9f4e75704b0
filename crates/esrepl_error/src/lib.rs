mod build_error;
mod run_error;

pub use crate::{
  build_error::{BuildError, BuildResult},
  run_error::{RunError, RunResult},
};

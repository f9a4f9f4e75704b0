use std::{path::PathBuf, process::ExitCode, sync::Arc};

use ansi_term::Colour;
use itertools::Itertools;

use esrepl::{
  build_config, default_outfile, resolve_target, ArgSet, BuildError, EsbuildBundler, NodeLoader,
  NodeSourceMaps, OsFileSystem, RunError, RunResult, Runner, HOST_ARGS,
};

const USAGE: &str = "\
Usage: esrepl <file> [args...]

Options:
  -h, --help            Display this help message.
  -d, --debug           Display debug information.
  --sourcemap=<mode>    Source map type: true, false, linked, external, inline or both.
                        Default: \"linked\".
";

fn print_debug(args: &ArgSet) {
  let dim = Colour::White.dimmed();
  let flags = args.flags.iter().map(|(key, value)| format!("{key:?}: {value}")).join(", ");

  println!("{} {:?}", dim.paint("argv:"), args.raw);
  println!("{} {:?}", dim.paint("Args:"), args.positional);
  println!("{} {{{flags}}}", dim.paint("Flags:"));
}

fn report(err: &RunError) {
  let label = Colour::Red.paint("Error:");

  match err {
    RunError::Usage { requested: true } => print!("{USAGE}"),
    RunError::Usage { requested: false } => {
      eprintln!("{label} {err}");
      print!("{USAGE}");
    }
    RunError::Build(errors) => {
      eprintln!("{label} Failed to build file.");
      for error in errors.iter() {
        eprintln!("{error:#}");
      }
    }
    _ => eprintln!("{label} {err}"),
  }
}

async fn run(args: &ArgSet) -> RunResult<()> {
  let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
  let target = resolve_target(args, HOST_ARGS, &cwd, &OsFileSystem)?;

  let outfile = default_outfile().map_err(|err| {
    BuildError::from(anyhow::Error::new(err).context("Failed to locate the output directory"))
  })?;
  let config = build_config(args, target.entry, outfile);

  if args.is_debug() {
    println!("{} {}", Colour::White.dimmed().paint("Source map:"), config.source_map);
  }

  let source_maps = Arc::new(NodeSourceMaps::new());
  let runner = Runner::new(
    EsbuildBundler::from_env(),
    Arc::clone(&source_maps),
    NodeLoader::from_env(source_maps),
  );

  runner
    .run(&config, &target.script_args, |output| {
      println!(
        "{} File built successfully at {}.",
        Colour::Green.paint("✔"),
        Colour::White.bold().paint(output.outfile.display().to_string())
      );
      if let Some(source_map) = output.source_map.as_ref().filter(|_| args.is_debug()) {
        println!("{} {}", Colour::White.dimmed().paint("Source map file:"), source_map.display());
      }
    })
    .await
}

#[tokio::main]
async fn main() -> ExitCode {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

  let args = ArgSet::parse(std::env::args_os().map(|arg| arg.to_string_lossy().into_owned()));
  if args.is_debug() {
    print_debug(&args);
  }

  match run(&args).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      log::debug!("{err:?}");
      report(&err);
      ExitCode::from(err.exit_code())
    }
  }
}

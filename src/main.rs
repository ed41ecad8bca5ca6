mod app;
mod config;
mod content_bridge;
mod controller;
mod error;
mod file_loader;
mod render_surface;
mod template;
mod ui;
mod window;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use crate::config::Config;
use crate::error::PreviewError;

#[derive(Parser, Debug)]
#[command(
    name = "lottie-preview",
    version,
    about = "Preview a Lottie (.json) or dotLottie (.lottie) animation in a floating window"
)]
struct Cli {
    /// Animation file to preview
    #[arg(allow_hyphen_values = true)]
    file: Option<PathBuf>,

    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    ignored: Vec<OsString>,
}

/// The first argument is the file whatever it looks like. If clap still
/// rejects the line, it is taken verbatim; only help and version requests
/// exit early.
fn parse_args<I, T>(args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            log::warn!("Unparsed arguments ({}), using the first as the file", e.kind());
            Cli {
                file: args.get(1).map(PathBuf::from),
                ignored: args.iter().skip(2).cloned().collect(),
            }
        }
    }
}

fn main() -> Result<(), PreviewError> {
    env_logger::init();

    let cli = parse_args(std::env::args_os());
    if !cli.ignored.is_empty() {
        log::debug!("Ignoring {} extra argument(s)", cli.ignored.len());
    }

    let config = Config::from_env();
    controller::run(cli.file, config).inspect_err(|e| log::error!("{e}"))
}

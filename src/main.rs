use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use release_assistant::command::SystemRunner;
use release_assistant::config::{CliOverrides, ConfigFile, ReleaseOptions};
use release_assistant::release::{Outcome, ReleaseAssistant};
use release_assistant::ui::{Logger, TermPrompter};
use release_assistant::version::ReleaseType;

#[derive(clap::Parser)]
#[command(
    name = "release-assistant",
    about = "Cut a release: bump the version, update the changelog, commit, tag, and push"
)]
struct Args {
    #[arg(short = 't', long = "type", help = "Release type (major, minor, or patch)")]
    release_type: Option<String>,

    #[arg(short, long, help = "Print debugging info")]
    debug: bool,

    #[arg(short, long, help = "Show the output of the system commands the release runs")]
    show_system_output: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,
}

fn main() {
    match run(Args::parse()) {
        Ok(_) => {}
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config_file = ConfigFile::load(args.config.as_deref().map(Path::new))
        .context("failed to load configuration")?;

    let release_type = args
        .release_type
        .as_deref()
        .map(str::parse::<ReleaseType>)
        .transpose()?;
    let options = ReleaseOptions::resolve(
        config_file,
        CliOverrides {
            release_type,
            debug: args.debug,
            show_command_output: args.show_system_output,
        },
    );

    let logger = Logger::new(options.debug);
    logger.debug(format!("Running release with options {:?}", options));

    let root = std::env::current_dir().context("failed to determine working directory")?;
    let debug = options.debug;
    let assistant = ReleaseAssistant::new(options, logger, SystemRunner::new(), TermPrompter::new(), root);

    match assistant.run() {
        Ok(Outcome::Released) | Ok(Outcome::Aborted) => Ok(()),
        Err(error) => {
            logger.error(error.to_string());
            if debug {
                logger.debug(format!("{:?}", error));
            }
            process::exit(1);
        }
    }
}

use clap::{Arg, ArgAction, Command};
use log::debug;
use std::time::Instant;

pub fn build_cli() -> Command {
    debug!("⚙️ Building CLI interface...");
    let start_time = Instant::now();
    let cmd = Command::new("camwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Always-on multi-camera node: live MJPEG feeds plus rolling on-disk recordings.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom configuration file")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Enable debug logging")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("serve")
                .about("Starts every available camera pipeline and serves the feeds over HTTP (default)"),
        )
        .subcommand(
            Command::new("probe")
                .about("Lists which device indices open, without starting any pipeline"),
        )
        .subcommand(
            Command::new("sweep")
                .about("Deletes recordings older than the retention window once and exits"),
        );
    debug!("✅ CLI interface built in {:?}", start_time.elapsed());
    cmd
}

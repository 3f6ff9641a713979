use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

use rebalancer_core::{run, RebalancerSettings};

#[derive(Debug, Parser)]
#[command(name = "PlateRework-CLI", version, about = "Armor plate generator and carrier rework")]
struct Args {
    /// Host database directory (globals.json, templates/, traders/, bots/, locales/).
    #[arg(long)]
    database: PathBuf,

    /// Directory the reworked database is written to.
    #[arg(long)]
    output: PathBuf,

    /// JSON configuration; shipped defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose logging and a rework_report.txt next to the output.
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// off, error, warn, info, debug or trace.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn setup_logger(level: LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = match args.log_level.as_deref() {
        Some(raw) => match raw.parse::<LevelFilter>() {
            Ok(level) => level,
            Err(e) => {
                eprintln!("Invalid --log-level {raw:?}: {e}");
                std::process::exit(2);
            }
        },
        None if args.debug => LevelFilter::Debug,
        None => LevelFilter::Info,
    };
    if let Err(e) = setup_logger(level) {
        eprintln!("Failed to set up logging: {e}");
        std::process::exit(1);
    }

    let settings = RebalancerSettings {
        database_path: args.database,
        output_path: args.output,
        config_path: args.config,
        debug: args.debug,
    };

    if let Err(err) = run(settings) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

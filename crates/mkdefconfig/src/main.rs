use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use log::LevelFilter;
use mkdefconfig::{
    CommandGenerator, Mkdefconfig, MkdefconfigError, Outcome, Request, SaveMode, Settings,
    TerminalPrompt, interrupt, logger,
};

/// Make default config from current config
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// Configuration name
    #[clap(value_name = "CONFIG_NAME")]
    config_name: String,
    /// Change configs directory
    #[clap(short = 'd', long)]
    dir: Option<PathBuf>,
    /// Overwrite existing defconfig
    #[clap(short = 'y')]
    yes: bool,
    /// Verbose messages (-v info, -vv debug)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Save as a diff against this configuration
    #[clap(long, value_name = "NAME", conflicts_with = "standalone")]
    base: Option<String>,
    /// Save a full defconfig even if the name contains '/'
    #[clap(long)]
    standalone: bool,
    /// Read paths and the generate command from a TOML file
    #[clap(long, value_name = "FILE")]
    settings: Option<PathBuf>,
    /// DEPRECATED
    #[clap(short = 'k', hide = true)]
    kernel: bool,
    /// DEPRECATED
    #[clap(long, hide = true)]
    all: bool,
}

impl Args {
    fn save_mode(&self, settings: &Settings) -> SaveMode {
        match (&self.base, self.standalone) {
            (Some(base), _) => SaveMode::Diff { base: base.clone() },
            (None, true) => SaveMode::Standalone,
            (None, false) => SaveMode::from_slot_name(&self.config_name, &settings.base_slot),
        }
    }
}

fn run(args: Args, level: LevelFilter) -> Result<Outcome, MkdefconfigError> {
    if args.kernel {
        log::warn!("-k option is deprecated. Ignored.");
    }
    if args.all {
        log::warn!("--all option is deprecated. Ignored.");
    }

    let mut settings = match &args.settings {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    if let Some(dir) = &args.dir {
        settings.set_configs_dir(dir);
    }

    let request = Request {
        name: args.config_name.clone(),
        mode: args.save_mode(&settings),
        overwrite: args.yes,
    };
    let generator = CommandGenerator::from_settings(&settings)?.quiet(level < LevelFilter::Info);

    Mkdefconfig::new(settings, generator, TerminalPrompt::stdio()).run(&request)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = logger::level_for_verbosity(args.verbose);
    if let Err(err) = logger::init(level) {
        eprintln!("failed to initialize logger: {err}");
    }
    if let Err(err) = interrupt::install() {
        log::warn!("failed to install Ctrl-C handler: {err}");
    }

    match run(args, level) {
        Ok(Outcome::Saved(path)) => {
            log::info!("Saved {}", path.display());
            ExitCode::SUCCESS
        }
        Ok(Outcome::Declined) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

use clap::Parser;
use std::io::{self, IsTerminal};

use usb_snapshot::app::{self, AppError, Settings};
use usb_snapshot::cli::{self, Args, Command};
use usb_snapshot::config::Config;
use usb_snapshot::{interrupt, logging};

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Err(e) = interrupt::install() {
        log::warn!("Could not set up Ctrl+C handler: {}", e);
    }

    let result = match &args.command {
        Some(Command::ListCameras) => {
            let backend = app::backend_for(args.synthetic);
            cli::list_cameras(backend.as_ref()).map_err(AppError::from)
        }
        Some(Command::Config { action }) => cli::handle_config_action(action.clone(), &args),
        None => snapshot(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn snapshot(args: &Args) -> Result<(), AppError> {
    let config = Config::load(args.config.as_deref())?;
    let settings = Settings::resolve(args, &config)?;
    let backend = app::backend_for(settings.synthetic);

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let path = app::run(
        &settings,
        backend.as_ref(),
        interactive,
        &mut input,
        &mut output,
    )?;
    println!("{}", path.display());
    Ok(())
}

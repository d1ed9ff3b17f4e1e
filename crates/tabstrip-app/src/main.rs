// tabstrip-replay: feeds a scripted drag scenario through the reorder engine
// and prints the strip it ends up with.

mod scenario;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use scenario::{Replay, Scenario};
use settings::AppSettings;

const USAGE: &str = "usage: tabstrip-replay [--settings <path>] [--write-default-settings] <scenario.json>";

#[derive(Debug, Default, PartialEq)]
struct Args {
    settings: Option<PathBuf>,
    write_default_settings: bool,
    scenario: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                let path = args.next().ok_or("--settings needs a path")?;
                parsed.settings = Some(PathBuf::from(path));
            }
            "--write-default-settings" => parsed.write_default_settings = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
            _ if parsed.scenario.is_some() => return Err(format!("unexpected argument {arg}")),
            _ => parsed.scenario = Some(PathBuf::from(arg)),
        }
    }
    Ok(parsed)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    if args.write_default_settings {
        let defaults = AppSettings::default();
        match &args.settings {
            Some(path) => {
                if let Err(e) = settings::save_settings_to(&defaults, path) {
                    log::error!("Failed to write {}: {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
            }
            None => settings::save_settings(&defaults),
        }
        if args.scenario.is_none() {
            return ExitCode::SUCCESS;
        }
    }

    let Some(path) = args.scenario else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };
    let settings = match &args.settings {
        Some(settings_path) => settings::load_settings_from(settings_path),
        None => settings::load_settings(),
    };
    let scenario = match Scenario::load(&path) {
        Ok(scenario) => scenario,
        Err(e) => {
            log::error!("Failed to load scenario {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    log::info!("replaying {} steps over {} tabs", scenario.steps.len(), scenario.tabs.len());
    let mut replay = Replay::new(&scenario, &settings);
    replay.run(&scenario.steps);
    if replay.pending_confirmation() {
        log::warn!("scenario ended with an ungroup confirmation still pending");
    }
    println!("{}", replay.render());
    ExitCode::SUCCESS
}

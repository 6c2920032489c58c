mod config;
mod course_colors;
mod logging;
mod shell;
mod study_time;
mod theme;
mod view;

use cursive::{Cursive, CursiveExt};
use log::{error, info};

use crate::config::{Config, LoadStatus};
use crate::theme::{ThemeEngine, ThemeState};

fn main() {
    if let Err(e) = logging::init_logging() {
        eprintln!("warning: logging disabled: {e}");
    }

    let initial = match Config::load() {
        Ok(LoadStatus::Ready(config)) => config.theme_state(),
        Ok(LoadStatus::Defaults(reason)) => {
            info!("Starting with default appearance ({reason:?})");
            ThemeState::default()
        }
        Err(e) => {
            error!("{e}");
            eprintln!("{e}\nFix or remove {}", Config::file_path().display());
            std::process::exit(1);
        }
    };

    let mut siv = Cursive::default();
    shell::launch(&mut siv, shell::App::new(ThemeEngine::new(initial)));
    siv.run();
    info!("Shutting down");
}

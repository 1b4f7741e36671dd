use crate::theme::ThemeVariant;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Global media and volume control panel", long_about = None)]
pub struct Args {
    /// Show detailed diagnostic logs
    #[arg(long)]
    pub debug: bool,

    /// Use the dark color theme
    #[arg(long)]
    pub dark: bool,
}

/// Settings for one run. Only the command line feeds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub log_level: LevelFilter,
    pub theme: ThemeVariant,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::WARN,
            theme: ThemeVariant::Light,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            log_level: if args.debug {
                LevelFilter::DEBUG
            } else {
                LevelFilter::WARN
            },
            theme: if args.dark {
                ThemeVariant::Dark
            } else {
                ThemeVariant::Light
            },
        }
    }
}

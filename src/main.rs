use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui::ViewportBuilder;
use media_control_gui::{
    app::{App, WINDOW_SIZE, WINDOW_TITLE},
    config::{Args, Config},
    controller::{MediaController, RefreshLoop},
    deps::check_dependencies,
    runner::{ProcessRunner, Tools},
    schedule::TickScheduler,
    theme::Palette,
};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = Config::from(Args::parse());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::default().add_directive(config.log_level.into()))
        .init();

    let tool_paths = match check_dependencies() {
        Ok(paths) => paths,
        Err(missing) => {
            for dependency in &missing {
                eprintln!("{dependency}");
            }
            eprintln!("\n[✗] Missing dependencies. Fix them and run again.\n");
            std::process::exit(1);
        }
    };

    let palette = Palette::builtin(config.theme)?;
    info!(
        playerctl = %tool_paths.playerctl.display(),
        pactl = %tool_paths.pactl.display(),
        palette = %palette.name,
        "starting media control panel"
    );

    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(WINDOW_SIZE)
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(
            move |cc| -> std::result::Result<
                Box<dyn eframe::App>,
                Box<dyn std::error::Error + Send + Sync>,
            > {
                let controller =
                    MediaController::new(Tools::new(ProcessRunner::default(), tool_paths));
                let scheduler = TickScheduler::starting_at(Instant::now());
                let refresh = RefreshLoop::new(controller, scheduler);
                Ok(Box::new(App::new(cc, refresh, palette)))
            },
        ),
    )
    .map_err(|err| anyhow!("Failed to run the control panel: {err}"))?;

    info!("media control panel closed");
    Ok(())
}

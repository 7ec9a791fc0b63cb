mod app;
mod hud;
mod input;
mod tests;

use anyhow::Context;
use winit::event_loop::EventLoop;

use bv_core::config::ViewerConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = ViewerConfig::discover().context("loading configuration")?;
    log::info!(
        "Bivouac {} ({}x{})",
        env!("CARGO_PKG_VERSION"),
        config.window.width,
        config.window.height
    );

    let event_loop = EventLoop::new()?;
    let mut app = app::App::new(config);
    event_loop.run_app(&mut app)?;
    app.finish()
}

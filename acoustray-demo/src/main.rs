mod cli;
mod demo_scene;
mod gui;
mod preview_engine;

fn main() -> Result<(), eframe::Error> {
    // `--cli [settings.toml]` runs the headless walkthrough instead of the viewer
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--cli" {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
        if let Err(e) = cli::run_cli(args.get(2).map(String::as_str)) {
            log::error!("CLI run failed: {:#}", e);
            std::process::exit(1);
        }
        Ok(())
    } else {
        gui::run()
    }
}

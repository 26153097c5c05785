mod app;

pub use app::RayViewer;

/// Run the GUI demo
pub fn run() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_title("AcoustRay Ray Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "AcoustRay Ray Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(RayViewer::new()))),
    )
}

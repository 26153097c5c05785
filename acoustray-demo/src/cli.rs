use crate::demo_scene;
use crate::preview_engine::PreviewEngine;
use acoustray::render::{CommandRecorder, DrawHandlerRegistry};
use acoustray::{AcoustRayWorld, MoveDirection, RenderSettings, SimulationSettings};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Headless walkthrough: materials, simulation, drawing at several orders.
pub fn run_cli(settings_path: Option<&str>) -> Result<()> {
    let backend = Arc::new(DrawHandlerRegistry::new());
    let mut world = AcoustRayWorld::new(
        backend.clone(),
        SimulationSettings::default().title("shoebox"),
        RenderSettings::default(),
    );

    if let Some(path) = settings_path {
        world
            .load_settings(path)
            .with_context(|| format!("loading settings from {}", path))?;
    } else {
        let algorithm = world.settings().algorithm.clone().n_rays(200).transition_order(4);
        world.settings_mut().algorithm = algorithm;
    }

    log::info!("=== Materials ===");
    let (walls, floor, panel) = demo_scene::add_materials(world.materials_mut())?;
    for m in world.materials().iter() {
        log::info!("  {:>2} {:<20} {:?}", m.id(), m.description, m.alpha);
    }
    test_material_files(&mut world)?;

    log::info!("=== Simulation ===");
    let scene = demo_scene::shoebox(walls, floor, panel)?;
    let mut engine = PreviewEngine::new();
    let sources = world.run_simulation(&scene, &mut engine)?;
    if let Some(rt60) = engine.rt60() {
        log::info!("Estimated RT60: {:.2} s", rt60);
    }
    for (i, source) in sources.iter().enumerate() {
        log::info!(
            "Source {} at {:?}: {} rays, longest history {}",
            i,
            source.coord,
            source.rays.len(),
            source.max_order()
        );
    }

    log::info!("=== Drawing ===");
    let max_order = world.settings().algorithm.transition_order as usize;
    for order in 2..=max_order.max(2) {
        world.set_render_settings(true, order);
        let mut frame = CommandRecorder::new();
        backend.redraw(&mut frame);
        log::info!(
            "Order {}: {} batches, {} lines",
            order,
            frame.batches().count(),
            frame.line_count()
        );
    }
    world.set_render_settings(false, max_order);
    log::info!("Rendering off, {} live draw handlers", backend.live_handlers());

    for event in world.poll_events() {
        if event.is_error() {
            log::warn!("Event: {:?}", event);
        } else {
            log::debug!("Event: {:?}", event);
        }
    }

    world.teardown();
    Ok(())
}

fn test_material_files(world: &mut AcoustRayWorld) -> Result<()> {
    let path = std::env::temp_dir().join("acoustray-demo-materials.csv");
    world.save_materials(&path)?;

    // Shuffle and drop a row, then restore from disk
    world.materials_mut().select(0);
    world.move_material(MoveDirection::Down);
    world.delete_material();
    let count = world
        .load_materials(&path)
        .with_context(|| format!("reloading {}", path.display()))?;
    log::info!(
        "Reloaded {} materials from {}, next id {}",
        count,
        path.display(),
        world.materials().max_index().map_or(0, |m| m + 1)
    );
    Ok(())
}

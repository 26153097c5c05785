use crate::demo_scene::{self, ROOM_SIZE};
use crate::preview_engine::PreviewEngine;
use acoustray::math::Affine3A;
use acoustray::render::{BuiltinShader, DrawHandlerRegistry, DrawTarget, LineBatch};
use acoustray::scene::{Nature, SceneEntity, SceneObject};
use acoustray::{
    AcoustRayEvent, AcoustRayWorld, MoveDirection, RenderSettings, SimulationSettings, Vec3,
};
use egui::{Color32, Pos2, Rect, Stroke, Vec2};
use std::sync::Arc;

const MATERIALS_FILE: &str = "acoustray-demo/materials.csv";

/// Top-down viewport drawing through the painter of the central panel.
struct PainterTarget<'a> {
    painter: &'a egui::Painter,
    rect: Rect,
    grid_size: f32,
    color: Color32,
}

impl DrawTarget for PainterTarget<'_> {
    fn bind_shader(&mut self, shader: BuiltinShader) {
        // egui strokes are already flat colored
        debug_assert_eq!(shader, BuiltinShader::UniformColor);
    }

    fn uniform_color(&mut self, [r, g, b, a]: [f32; 4]) {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.color = Color32::from_rgba_unmultiplied(channel(r), channel(g), channel(b), channel(a));
    }

    fn draw_lines(&mut self, batch: &LineBatch) {
        let stroke = Stroke::new(1.0, self.color);
        for (from, to) in batch.segments() {
            if from == to {
                continue;
            }
            let from = world_to_screen(self.grid_size, from, self.rect);
            let to = world_to_screen(self.grid_size, to, self.rect);
            self.painter.line_segment([from, to], stroke);
        }
    }
}

/// Convert world coordinates to screen coordinates.
/// World: X right, Y forward (up on screen), Z up out of the screen.
fn world_to_screen(grid_size: f32, world_pos: Vec3, rect: Rect) -> Pos2 {
    let center = rect.center();
    let scale = rect.width().min(rect.height()) / (grid_size * 2.0);

    Pos2::new(
        center.x + world_pos.x * scale,
        center.y - world_pos.y * scale, // Negative because screen Y goes down
    )
}

fn screen_to_world(grid_size: f32, screen_pos: Pos2, rect: Rect, height: f32) -> Vec3 {
    let center = rect.center();
    let scale = rect.width().min(rect.height()) / (grid_size * 2.0);

    Vec3::new(
        (screen_pos.x - center.x) / scale,
        -(screen_pos.y - center.y) / scale,
        height,
    )
}

pub struct RayViewer {
    world: AcoustRayWorld,
    backend: Arc<DrawHandlerRegistry>,
    engine: PreviewEngine,
    scene: Vec<SceneEntity>,
    grid_size: f32,

    // UI state
    render: bool,
    render_order: usize,
    per_source_max_order: bool,
    dragging_entity_index: Option<usize>,
    status: String,
}

impl RayViewer {
    pub fn new() -> Self {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        let backend = Arc::new(DrawHandlerRegistry::new());
        let render = RenderSettings::default().render_order(3);
        let mut world = AcoustRayWorld::new(
            backend.clone(),
            SimulationSettings::default().title("shoebox"),
            render,
        );
        let algorithm = world.settings().algorithm.clone().n_rays(64).transition_order(4);
        world.settings_mut().algorithm = algorithm;

        let mut status = String::new();
        let scene = demo_scene::add_materials(world.materials_mut())
            .and_then(|(walls, floor, panel)| demo_scene::shoebox(walls, floor, panel))
            .unwrap_or_else(|e| {
                log::error!("Failed to build demo scene: {:#}", e);
                status = format!("demo scene unavailable: {}", e);
                Vec::new()
            });
        log::info!("Loaded demo scene with {} objects", scene.len());

        Self {
            world,
            backend,
            engine: PreviewEngine::new(),
            scene,
            grid_size: ROOM_SIZE.x.max(ROOM_SIZE.y) / 2.0 + 1.0,
            render: render.render,
            render_order: render.render_order,
            per_source_max_order: render.per_source_max_order,
            dragging_entity_index: None,
            status,
        }
    }

    fn run_simulation(&mut self) {
        match self.world.run_simulation(&self.scene, &mut self.engine) {
            Ok(sources) => {
                let rays: usize = sources.iter().map(|s| s.rays.len()).sum();
                self.status = match self.engine.rt60() {
                    Some(rt60) => format!("{} rays traced, RT60 {:.2} s", rays, rt60),
                    None => format!("{} rays traced", rays),
                };
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn handle_events(&mut self) {
        for event in self.world.poll_events() {
            match &event {
                AcoustRayEvent::ExtractionFailed { entity, message } => {
                    log::warn!("GUI: extraction failed on {:?}: {}", entity, message);
                }
                AcoustRayEvent::SimulationFinished { elapsed, .. } => {
                    log::info!("GUI: simulation finished in {:.2?}", elapsed);
                }
                AcoustRayEvent::MaterialsSaved { path, count }
                | AcoustRayEvent::MaterialsLoaded { path, count } => {
                    self.status = format!("{} materials, {}", count, path.display());
                }
                AcoustRayEvent::OperationFailed { operation, message } => {
                    self.status = format!("Failed to {}: {}", operation, message);
                }
                _ => log::debug!("GUI: Received event: {:?}", event),
            }
        }
    }

    fn draw_room(&self, ui: &mut egui::Ui, rect: Rect) {
        let painter = ui.painter();
        let half = ROOM_SIZE / 2.0;
        let corners = [
            Vec3::new(-half.x, -half.y, 0.0),
            Vec3::new(half.x, -half.y, 0.0),
            Vec3::new(half.x, half.y, 0.0),
            Vec3::new(-half.x, half.y, 0.0),
        ];
        for i in 0..corners.len() {
            let a = world_to_screen(self.grid_size, corners[i], rect);
            let b = world_to_screen(self.grid_size, corners[(i + 1) % corners.len()], rect);
            painter.line_segment([a, b], Stroke::new(2.0, Color32::from_gray(160)));
        }

        // 1 meter grid
        let num_lines = self.grid_size as i32;
        for i in -num_lines..=num_lines {
            let offset = i as f32;
            let top = world_to_screen(self.grid_size, Vec3::new(offset, self.grid_size, 0.0), rect);
            let bottom = world_to_screen(self.grid_size, Vec3::new(offset, -self.grid_size, 0.0), rect);
            painter.line_segment([top, bottom], Stroke::new(1.0, Color32::from_gray(50)));
            let left = world_to_screen(self.grid_size, Vec3::new(-self.grid_size, offset, 0.0), rect);
            let right = world_to_screen(self.grid_size, Vec3::new(self.grid_size, offset, 0.0), rect);
            painter.line_segment([left, right], Stroke::new(1.0, Color32::from_gray(50)));
        }
    }

    fn draw_entities(&self, ui: &mut egui::Ui, rect: Rect) {
        let painter = ui.painter();
        for entity in &self.scene {
            let color = match entity.props.nature {
                Nature::Source => Color32::from_rgb(50, 150, 255),
                Nature::Receiver => Color32::from_rgb(255, 50, 50),
                Nature::Geometry => continue,
            };
            let pos = world_to_screen(self.grid_size, entity.location(), rect);
            painter.circle_filled(pos, 7.0, color);
            painter.circle_stroke(pos, 7.0, Stroke::new(2.0, Color32::WHITE));
            painter.text(
                pos + Vec2::new(0.0, 12.0),
                egui::Align2::CENTER_TOP,
                &entity.name,
                egui::FontId::proportional(12.0),
                Color32::WHITE,
            );
        }
    }

    fn handle_mouse_interaction(&mut self, ui: &mut egui::Ui, rect: Rect) {
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.dragging_entity_index = self.scene.iter().position(|e| {
                    e.props.nature != Nature::Geometry
                        && world_to_screen(self.grid_size, e.location(), rect).distance(pos) < 15.0
                });
                if let Some(idx) = self.dragging_entity_index {
                    log::info!("Started dragging {}", self.scene[idx].name);
                }
            }
        }

        if response.dragged() {
            if let (Some(idx), Some(pos)) =
                (self.dragging_entity_index, response.interact_pointer_pos())
            {
                let half = ROOM_SIZE / 2.0 - Vec3::splat(0.1);
                if let Some(entity) = self.scene.get_mut(idx) {
                    let height = entity.location().z;
                    let target = screen_to_world(self.grid_size, pos, rect, height);
                    let clamped = target.clamp(-half, half);
                    entity.transform = Affine3A::from_translation(clamped);
                }
            }
        }

        if response.drag_stopped() {
            if let Some(idx) = self.dragging_entity_index.take() {
                log::info!("Stopped dragging {}, rerun to update rays", self.scene[idx].name);
            }
        }
    }

    fn simulation_controls(&mut self, ui: &mut egui::Ui) {
        ui.label("Simulation");
        let algorithm = &mut self.world.settings_mut().algorithm;
        ui.add(egui::Slider::new(&mut algorithm.n_rays, 1..=1000).text("Rays"));
        ui.add(egui::Slider::new(&mut algorithm.transition_order, 1..=10).text("Reflections"));
        ui.checkbox(&mut algorithm.allow_scattering, "Allow scattering");

        if ui.button("Run simulation").clicked() {
            self.run_simulation();
        }
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.label("Rendering");
        let max_order = (self.world.settings().algorithm.transition_order as usize).max(2);
        let mut changed = ui.checkbox(&mut self.render, "Render rays").changed();
        changed |= ui
            .add(egui::Slider::new(&mut self.render_order, 2..=max_order).text("Order"))
            .changed();
        if changed {
            self.world.set_render_settings(self.render, self.render_order);
        }
        if ui
            .checkbox(&mut self.per_source_max_order, "Size buffers per source")
            .changed()
        {
            self.world.set_per_source_max_order(self.per_source_max_order);
        }
    }

    fn material_controls(&mut self, ui: &mut egui::Ui) {
        ui.label(format!("Materials: {}", self.world.materials().len()));
        ui.horizontal(|ui| {
            if ui.button("+").clicked() {
                if let Err(e) = self.world.new_material() {
                    self.status = e.to_string();
                }
            }
            if ui.button("-").clicked() {
                self.world.delete_material();
            }
            if ui.button("Up").clicked() {
                self.world.move_material(MoveDirection::Up);
            }
            if ui.button("Down").clicked() {
                self.world.move_material(MoveDirection::Down);
            }
        });

        let selected = self.world.materials().selected();
        let mut clicked = None;
        egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
            for (idx, m) in self.world.materials().iter().enumerate() {
                let mean = m.alpha.iter().sum::<f32>() / m.alpha.len() as f32;
                let text = format!("{:>2}  {}  (a {:.2})", m.id(), m.description, mean);
                if ui.selectable_label(selected == Some(idx), text).clicked() {
                    clicked = Some(idx);
                }
            }
        });
        if let Some(idx) = clicked {
            self.world.materials_mut().select(idx);
        }

        if let Some(mut entry) = self.world.materials_mut().selected_record_mut() {
            ui.text_edit_singleline(entry.description_mut());
        }

        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                let _ = self.world.save_materials(MATERIALS_FILE);
            }
            if ui.button("Load").clicked() {
                let _ = self.world.load_materials(MATERIALS_FILE);
            }
        });
    }
}

impl eframe::App for RayViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_events();

        egui::SidePanel::right("control_panel")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Control Panel");
                ui.separator();
                self.simulation_controls(ui);
                ui.add_space(10.0);
                ui.separator();
                self.render_controls(ui);
                ui.add_space(10.0);
                ui.separator();
                self.material_controls(ui);
                ui.add_space(10.0);
                ui.separator();
                ui.label(&self.status);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("AcoustRay Ray Viewer");
            ui.label("Drag speakers and the microphone, then run the simulation again");
            ui.separator();

            let available_size = ui.available_size();
            let size = available_size.x.min(available_size.y) - 20.0;
            let rect =
                Rect::from_center_size(ui.available_rect_before_wrap().center(), Vec2::splat(size));

            self.draw_room(ui, rect);

            let mut target = PainterTarget {
                painter: ui.painter(),
                rect,
                grid_size: self.grid_size,
                color: Color32::WHITE,
            };
            self.backend.redraw(&mut target);

            self.draw_entities(ui, rect);
            self.handle_mouse_interaction(ui, rect);
        });
    }
}

impl Drop for RayViewer {
    fn drop(&mut self) {
        log::info!("Shutting down ray viewer");
        self.world.teardown();
    }
}

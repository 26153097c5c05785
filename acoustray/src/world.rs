use crate::config::{MIN_RENDER_ORDER, RenderSettings, SimulationSettings};
use crate::error::{AcoustRayError, Result};
use crate::events::AcoustRayEvent;
use crate::materials::{
    CsvMaterialFormat, MaterialDatabase, MaterialRecord, MaterialSerializer, MoveDirection,
    load_materials, save_materials,
};
use crate::render::{DrawSession, GraphicsBackend};
use crate::scene::{SceneObject, extract_scene};
use crate::simulation::{SimulationAdapter, SimulationEngine, SourceRays};
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Main object tying the materials table, the settings and the viewport
/// drawing together.
///
/// `AcoustRayWorld` is what a host application's commands talk to: run the
/// simulation on a scene, edit the materials table, change how rays are drawn.
/// Outcomes are reported as [`AcoustRayEvent`]s, drained with
/// [`poll_events`](Self::poll_events), in addition to the returned `Result`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use acoustray::render::DrawHandlerRegistry;
/// use acoustray::{AcoustRayWorld, RenderSettings, SimulationSettings};
///
/// let backend = Arc::new(DrawHandlerRegistry::new());
/// let mut world = AcoustRayWorld::new(backend, SimulationSettings::default(), RenderSettings::default());
///
/// let id = world.new_material()?;
/// assert_eq!(id, 0);
/// assert_eq!(world.poll_events().len(), 1);
/// # Ok::<(), acoustray::AcoustRayError>(())
/// ```
pub struct AcoustRayWorld {
    materials: MaterialDatabase,
    settings: SimulationSettings,
    render: RenderSettings,
    session: DrawSession,
    material_format: Box<dyn MaterialSerializer>,
    event_sender: Sender<AcoustRayEvent>,
    event_receiver: Receiver<AcoustRayEvent>,
}

impl AcoustRayWorld {
    pub fn new(
        backend: Arc<dyn GraphicsBackend>,
        settings: SimulationSettings,
        render: RenderSettings,
    ) -> Self {
        let (event_sender, event_receiver) = unbounded();
        Self {
            materials: MaterialDatabase::new(),
            session: DrawSession::init(backend, render.per_source_max_order),
            settings,
            render,
            material_format: Box::new(CsvMaterialFormat),
            event_sender,
            event_receiver,
        }
    }

    /// Uses `format` instead of CSV for material files.
    pub fn with_material_format(mut self, format: impl MaterialSerializer + 'static) -> Self {
        self.material_format = Box::new(format);
        self
    }

    pub fn materials(&self) -> &MaterialDatabase {
        &self.materials
    }

    pub fn materials_mut(&mut self) -> &mut MaterialDatabase {
        &mut self.materials
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SimulationSettings {
        &mut self.settings
    }

    pub fn render_settings(&self) -> RenderSettings {
        self.render
    }

    pub fn session(&self) -> &DrawSession {
        &self.session
    }

    /// Extracts `scene`, runs `engine` on it and shows the resulting rays.
    ///
    /// Returns the ray histories of every source. On failure exactly one error
    /// event is emitted and the previous rays stay on screen.
    ///
    /// # Errors
    ///
    /// - [`AcoustRayError::Configuration`] if a reflective object has no usable
    ///   material
    /// - [`AcoustRayError::InvalidInput`] if the settings or scene break the
    ///   engine's input contract
    /// - [`AcoustRayError::Engine`] if the engine fails
    pub fn run_simulation<I, E>(&mut self, scene: I, engine: &mut E) -> Result<Vec<SourceRays>>
    where
        I: IntoIterator,
        I::Item: SceneObject,
        E: SimulationEngine + ?Sized,
    {
        let started = Instant::now();
        self.emit(AcoustRayEvent::SimulationStarted {
            title: self.settings.title.clone(),
        });

        let result = extract_scene(scene, &self.materials)
            .and_then(|input| SimulationAdapter::new(&self.settings).run(engine, &input));
        let sources = match result {
            Ok(sources) => sources,
            Err(e) => {
                log::error!("Simulation '{}' failed: {}", self.settings.title, e);
                self.emit(AcoustRayEvent::from_run_error(&e));
                return Err(e);
            }
        };

        self.session.set_sources(&sources);
        self.session
            .set_render_state(self.render.render, self.render.render_order);

        self.emit(AcoustRayEvent::SimulationFinished {
            title: self.settings.title.clone(),
            sources: sources.len(),
            rays: sources.iter().map(|s| s.rays.len()).sum(),
            elapsed: started.elapsed(),
        });
        Ok(sources)
    }

    /// Applies a change of the render toggle or the displayed order.
    pub fn set_render_settings(&mut self, render: bool, order: usize) {
        let order = order.max(MIN_RENDER_ORDER);
        self.render.render = render;
        self.render.render_order = order;
        self.session.set_render_state(render, order);
        self.emit(AcoustRayEvent::RenderStateChanged {
            enabled: render,
            order,
        });
    }

    /// Switches the buffer sizing policy. Takes effect on the next simulation.
    pub fn set_per_source_max_order(&mut self, enable: bool) {
        self.render.per_source_max_order = enable;
        self.session.set_per_source_max_order(enable);
    }

    /// Adds a material with a fresh id and selects it.
    pub fn new_material(&mut self) -> Result<u32> {
        let id = match self.materials.add() {
            Ok(entry) => entry.id(),
            Err(e) => {
                self.report_failure("add material", &e);
                return Err(e);
            }
        };
        self.emit(AcoustRayEvent::MaterialAdded { id });
        Ok(id)
    }

    /// Deletes the selected material.
    pub fn delete_material(&mut self) -> Option<MaterialRecord> {
        let removed = self.materials.remove_selected()?;
        self.emit(AcoustRayEvent::MaterialRemoved { id: removed.id() });
        Some(removed)
    }

    pub fn move_material(&mut self, direction: MoveDirection) -> bool {
        self.materials.move_selected(direction)
    }

    pub fn save_materials(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let result = save_materials(&self.materials, path, self.material_format.as_ref());
        match &result {
            Ok(()) => self.emit(AcoustRayEvent::MaterialsSaved {
                path: path.to_path_buf(),
                count: self.materials.len(),
            }),
            Err(e) => self.report_failure("save materials", e),
        }
        result
    }

    /// Replaces the materials table with the content of `path`.
    pub fn load_materials(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let result = load_materials(&mut self.materials, path, self.material_format.as_ref());
        match &result {
            Ok(count) => self.emit(AcoustRayEvent::MaterialsLoaded {
                path: path.to_path_buf(),
                count: *count,
            }),
            Err(e) => self.report_failure("load materials", e),
        }
        result
    }

    /// Replaces the simulation settings with the content of a TOML file.
    pub fn load_settings(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match SimulationSettings::from_toml_file(path) {
            Ok(settings) => {
                self.settings = settings;
                self.emit(AcoustRayEvent::SettingsLoaded {
                    path: path.to_path_buf(),
                });
                Ok(())
            }
            Err(e) => {
                self.report_failure("load settings", &e);
                Err(e)
            }
        }
    }

    /// Drains the pending events.
    pub fn poll_events(&self) -> Vec<AcoustRayEvent> {
        self.event_receiver.try_iter().collect()
    }

    /// Removes the draw callback and drops the ray buffers.
    pub fn teardown(&mut self) {
        self.session.teardown();
        log::info!("AcoustRay world torn down");
    }

    fn report_failure(&self, operation: &'static str, error: &AcoustRayError) {
        log::error!("Failed to {}: {}", operation, error);
        self.emit(AcoustRayEvent::OperationFailed {
            operation,
            message: error.to_string(),
        });
    }

    fn emit(&self, event: AcoustRayEvent) {
        if let Err(e) = self.event_sender.send(event) {
            log::trace!("Dropped event {:?}", e.into_inner());
        }
    }
}

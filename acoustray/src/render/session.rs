use super::backend::{BuiltinShader, DrawCallback, DrawHandle, DrawTarget, GraphicsBackend, LineBatch};
use super::buffers::{RayBuffers, compile_sources};
use super::palette::source_color;
use crate::simulation::SourceRays;
use std::sync::Arc;

/// Owns the compiled ray buffers and the viewport draw callback built from them.
///
/// A session is *active* while a callback is registered with the backend. At
/// most one callback is live at any time: every state change removes the old
/// callback before registering a new one.
pub struct DrawSession {
    backend: Arc<dyn GraphicsBackend>,
    handle: Option<DrawHandle>,
    buffers: Option<Vec<RayBuffers>>,
    per_source_max_order: bool,
}

impl DrawSession {
    /// Creates an idle session drawing through `backend`.
    pub fn init(backend: Arc<dyn GraphicsBackend>, per_source_max_order: bool) -> Self {
        log::debug!("Draw session initialized");
        Self {
            backend,
            handle: None,
            buffers: None,
            per_source_max_order,
        }
    }

    /// Replaces the ray buffers with ones compiled from `sources`.
    ///
    /// Any live callback is removed first; the session stays idle until the
    /// next [`set_render_state`](Self::set_render_state).
    pub fn set_sources(&mut self, sources: &[SourceRays]) {
        self.deregister();
        let buffers = compile_sources(sources, self.per_source_max_order);
        log::debug!(
            "Compiled ray buffers for {} sources ({} edges)",
            buffers.len(),
            buffers.iter().map(|b| b.indices().len()).sum::<usize>()
        );
        self.buffers = Some(buffers);
    }

    /// Shows rays up to reflection order `order`, or hides them.
    ///
    /// Does nothing before the first [`set_sources`](Self::set_sources).
    pub fn set_render_state(&mut self, enabled: bool, order: usize) {
        let Some(buffers) = &self.buffers else {
            log::debug!("No ray buffers yet, ignoring render state change");
            return;
        };

        let draws: Vec<(LineBatch, [f32; 4])> = if enabled {
            buffers
                .iter()
                .enumerate()
                .map(|(i, b)| {
                    let batch = LineBatch::new(b.shared_positions(), b.edges_up_to(order).iter());
                    (batch, source_color(i))
                })
                .collect()
        } else {
            Vec::new()
        };

        self.deregister();
        if !enabled {
            return;
        }

        let callback: DrawCallback = Arc::new(move |target: &mut dyn DrawTarget| {
            target.bind_shader(BuiltinShader::UniformColor);
            for (batch, color) in &draws {
                target.uniform_color(*color);
                target.draw_lines(batch);
            }
        });
        let handle = self.backend.add_draw_handler(callback);
        log::debug!("Registered ray draw handler {:?} at order {}", handle, order);
        self.handle = Some(handle);
    }

    /// Changes the buffer sizing policy. Applies from the next
    /// [`set_sources`](Self::set_sources).
    pub fn set_per_source_max_order(&mut self, enable: bool) {
        self.per_source_max_order = enable;
    }

    /// Removes the callback and drops the buffers.
    pub fn teardown(&mut self) {
        self.deregister();
        self.buffers = None;
    }

    /// Whether a draw callback is registered
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn buffers(&self) -> Option<&[RayBuffers]> {
        self.buffers.as_deref()
    }

    fn deregister(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !self.backend.remove_draw_handler(handle) {
                log::warn!("Draw handler {:?} was already removed", handle);
            }
        }
    }
}

impl Drop for DrawSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::render::{CommandRecorder, DrawCommand, DrawHandlerRegistry};
    use crate::simulation::Ray;

    fn sources() -> Vec<SourceRays> {
        let ray = |z: f32| {
            Ray::new(vec![
                Vec3::new(1.0, 0.0, z),
                Vec3::new(1.0, 1.0, z),
                Vec3::new(0.0, 1.0, z),
            ])
        };
        vec![
            SourceRays::new(Vec3::ZERO, vec![ray(0.0), ray(0.5)]),
            SourceRays::new(Vec3::ONE, vec![ray(1.0)]),
        ]
    }

    fn session() -> (Arc<DrawHandlerRegistry>, DrawSession) {
        let registry = Arc::new(DrawHandlerRegistry::new());
        let session = DrawSession::init(registry.clone(), false);
        (registry, session)
    }

    #[test]
    fn test_no_buffers_is_noop() {
        let (registry, mut session) = session();
        session.set_render_state(true, 2);
        assert!(!session.is_active());
        assert_eq!(registry.live_handlers(), 0);
    }

    #[test]
    fn test_repeated_enable_keeps_one_handler() {
        let (registry, mut session) = session();
        session.set_sources(&sources());
        session.set_render_state(true, 2);
        session.set_render_state(true, 3);
        assert!(session.is_active());
        assert_eq!(registry.live_handlers(), 1);

        session.set_render_state(false, 3);
        assert!(!session.is_active());
        assert_eq!(registry.live_handlers(), 0);
    }

    #[test]
    fn test_set_sources_returns_to_idle() {
        let (registry, mut session) = session();
        session.set_sources(&sources());
        session.set_render_state(true, 2);
        session.set_sources(&sources());
        assert!(!session.is_active());
        assert_eq!(registry.live_handlers(), 0);
        assert_eq!(session.buffers().map(<[RayBuffers]>::len), Some(2));
    }

    #[test]
    fn test_callback_draws_one_colored_batch_per_source() {
        let (registry, mut session) = session();
        session.set_sources(&sources());
        session.set_render_state(true, 2);

        let mut recorder = CommandRecorder::new();
        registry.redraw(&mut recorder);

        let shaders = recorder
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::BindShader(_)))
            .count();
        assert_eq!(shaders, 1);
        let colors: Vec<[f32; 4]> = recorder
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::UniformColor(rgba) => Some(*rgba),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![source_color(0), source_color(1)]);
        // Two rays then one ray, two edges each.
        let lines: Vec<usize> = recorder.batches().map(LineBatch::line_count).collect();
        assert_eq!(lines, vec![4, 2]);
    }

    #[test]
    fn test_teardown_and_drop_release_handler() {
        let (registry, mut session) = session();
        session.set_sources(&sources());
        session.set_render_state(true, 2);
        session.teardown();
        assert_eq!(registry.live_handlers(), 0);
        assert!(session.buffers().is_none());

        session.set_sources(&sources());
        session.set_render_state(true, 2);
        assert_eq!(registry.live_handlers(), 1);
        drop(session);
        assert_eq!(registry.live_handlers(), 0);
    }
}

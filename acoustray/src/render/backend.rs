//! Host graphics seam.
//!
//! The crate never talks to a GPU. It hands immutable [`LineBatch`]es to a draw
//! callback and registers that callback with whatever implements
//! [`GraphicsBackend`]. The host calls every registered callback once per
//! viewport redraw with its own [`DrawTarget`].

use crate::math::Vec3;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Shaders the host is expected to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinShader {
    /// Flat color set through [`DrawTarget::uniform_color`]
    UniformColor,
}

/// Indexed line list, built once and drawn many times.
#[derive(Debug, Clone)]
pub struct LineBatch {
    positions: Arc<[Vec3]>,
    indices: Arc<[[u32; 2]]>,
}

impl LineBatch {
    pub fn new(positions: Arc<[Vec3]>, indices: impl IntoIterator<Item = [u32; 2]>) -> Self {
        let indices: Arc<[[u32; 2]]> = indices.into_iter().collect();
        debug_assert!(
            indices
                .iter()
                .flatten()
                .all(|&i| (i as usize) < positions.len()),
            "line index out of range"
        );
        Self { positions, indices }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn indices(&self) -> &[[u32; 2]] {
        &self.indices
    }

    pub fn line_count(&self) -> usize {
        self.indices.len()
    }

    /// Line end points, in index order
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.indices
            .iter()
            .map(|&[a, b]| (self.positions[a as usize], self.positions[b as usize]))
    }
}

/// Drawing surface handed to draw callbacks.
pub trait DrawTarget {
    fn bind_shader(&mut self, shader: BuiltinShader);
    /// Color for the following draw calls, linear RGBA
    fn uniform_color(&mut self, rgba: [f32; 4]);
    fn draw_lines(&mut self, batch: &LineBatch);
}

/// Callback run by the host on every redraw.
pub type DrawCallback = Arc<dyn Fn(&mut dyn DrawTarget) + Send + Sync>;

/// Identifies a registered draw callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawHandle(u64);

/// Registration of per-frame draw callbacks.
pub trait GraphicsBackend: Send + Sync {
    fn add_draw_handler(&self, callback: DrawCallback) -> DrawHandle;

    /// Returns `false` if the handle was not registered.
    fn remove_draw_handler(&self, handle: DrawHandle) -> bool;
}

/// In-process [`GraphicsBackend`] for hosts that drive redraws themselves.
#[derive(Default)]
pub struct DrawHandlerRegistry {
    handlers: Mutex<Vec<(DrawHandle, DrawCallback)>>,
    next_id: AtomicU64,
}

impl DrawHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered callbacks
    pub fn live_handlers(&self) -> usize {
        self.lock().len()
    }

    /// Runs every registered callback against `target`, in registration order.
    pub fn redraw(&self, target: &mut dyn DrawTarget) {
        // Callbacks run outside the lock so they may touch the registry.
        let callbacks: Vec<DrawCallback> = self.lock().iter().map(|(_, cb)| Arc::clone(cb)).collect();
        for callback in callbacks {
            callback(&mut *target);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(DrawHandle, DrawCallback)>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GraphicsBackend for DrawHandlerRegistry {
    fn add_draw_handler(&self, callback: DrawCallback) -> DrawHandle {
        let handle = DrawHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((handle, callback));
        log::trace!("Registered draw handler {:?}", handle);
        handle
    }

    fn remove_draw_handler(&self, handle: DrawHandle) -> bool {
        let mut handlers = self.lock();
        let before = handlers.len();
        handlers.retain(|(h, _)| *h != handle);
        before != handlers.len()
    }
}

/// One recorded [`DrawTarget`] call.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    BindShader(BuiltinShader),
    UniformColor([f32; 4]),
    DrawLines(LineBatch),
}

/// [`DrawTarget`] that records calls instead of drawing, for headless hosts.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    pub commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of lines drawn
    pub fn line_count(&self) -> usize {
        self.batches().map(LineBatch::line_count).sum()
    }

    pub fn batches(&self) -> impl Iterator<Item = &LineBatch> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::DrawLines(batch) => Some(batch),
            _ => None,
        })
    }
}

impl DrawTarget for CommandRecorder {
    fn bind_shader(&mut self, shader: BuiltinShader) {
        self.commands.push(DrawCommand::BindShader(shader));
    }

    fn uniform_color(&mut self, rgba: [f32; 4]) {
        self.commands.push(DrawCommand::UniformColor(rgba));
    }

    fn draw_lines(&mut self, batch: &LineBatch) {
        self.commands.push(DrawCommand::DrawLines(batch.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> LineBatch {
        LineBatch::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y].into(), [[0, 1], [1, 2]])
    }

    #[test]
    fn test_line_batch_segments() {
        let lines = batch();
        assert_eq!(lines.line_count(), 2);
        let segments: Vec<_> = lines.segments().collect();
        assert_eq!(segments, vec![(Vec3::ZERO, Vec3::X), (Vec3::X, Vec3::Y)]);
    }

    #[test]
    fn test_registry_add_remove() {
        let registry = DrawHandlerRegistry::new();
        let a = registry.add_draw_handler(Arc::new(|_: &mut dyn DrawTarget| {}));
        let b = registry.add_draw_handler(Arc::new(|_: &mut dyn DrawTarget| {}));
        assert_ne!(a, b);
        assert_eq!(registry.live_handlers(), 2);

        assert!(registry.remove_draw_handler(a));
        assert!(!registry.remove_draw_handler(a));
        assert_eq!(registry.live_handlers(), 1);
    }

    #[test]
    fn test_redraw_runs_callbacks() {
        let registry = DrawHandlerRegistry::new();
        let lines = batch();
        registry.add_draw_handler(Arc::new(move |target: &mut dyn DrawTarget| {
            target.bind_shader(BuiltinShader::UniformColor);
            target.uniform_color([1.0, 0.0, 0.0, 1.0]);
            target.draw_lines(&lines);
        }));

        let mut recorder = CommandRecorder::new();
        registry.redraw(&mut recorder);
        registry.redraw(&mut recorder);

        assert_eq!(recorder.commands.len(), 6);
        assert_eq!(recorder.line_count(), 4);
        assert!(matches!(
            recorder.commands[0],
            DrawCommand::BindShader(BuiltinShader::UniformColor)
        ));
    }
}

//! Viewport drawing of simulated ray paths.
//!
//! Ray histories are compiled into fixed-stride line lists per source
//! ([`RayBuffers`]), which can then be drawn up to any reflection order through
//! a host [`GraphicsBackend`]. [`DrawSession`] owns that state.

pub mod backend;
pub mod buffers;
pub mod palette;
pub mod session;

pub use backend::{
    BuiltinShader, CommandRecorder, DrawCallback, DrawCommand, DrawHandle, DrawHandlerRegistry,
    DrawTarget, GraphicsBackend, LineBatch,
};
pub use buffers::{OrderedEdges, RayBuffers, compile_sources};
pub use palette::{GLASBEY, source_color};
pub use session::DrawSession;

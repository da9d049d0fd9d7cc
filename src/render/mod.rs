//! Frame rendering on `vello_cpu` and the Animation Driver.

pub(crate) mod blur;
pub(crate) mod composite;
/// Frame Renderer.
pub mod cpu;
/// Font discovery.
pub mod fonts;
/// Animation Driver: ticks, elision, parallel rendering.
pub mod pipeline;
/// Owned RGBA8 frame buffers.
pub mod surface;
pub(crate) mod text;

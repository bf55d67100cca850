use super::window::PixelSize;
use crate::frame::FrameInfo;
use crate::world::World;

/// Rasterizes a world into a render buffer
pub trait SceneRenderer {
    /// Size of the buffer frames are currently rendered into
    fn buffer_size(&self) -> PixelSize;

    /// Reallocate the render buffer for a new display size
    fn resize(&mut self, size: PixelSize);

    /// Draw one frame of the world
    fn render(&mut self, world: &World, frame: &FrameInfo) -> anyhow::Result<()>;
}

/// Size of a drawable area in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Minimized windows report a zero dimension
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Anything that can report its on-screen pixel size
pub trait DisplaySurface {
    /// Current size of the display in physical pixels
    fn pixel_size(&self) -> PixelSize;
}

impl DisplaySurface for PixelSize {
    fn pixel_size(&self) -> PixelSize {
        *self
    }
}

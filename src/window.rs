use std::sync::Arc;
use winit::window::Window as WinitWindow;

use crate::traits::{DisplaySurface, PixelSize};

/// Wrapper around the winit window the scene is shown in
pub struct Window {
    inner: Arc<WinitWindow>,
}

impl Window {
    pub fn new(window: Arc<WinitWindow>) -> Self {
        Self { inner: window }
    }

    pub fn inner(&self) -> &Arc<WinitWindow> {
        &self.inner
    }

    pub fn request_redraw(&self) {
        self.inner.request_redraw();
    }
}

impl DisplaySurface for Window {
    fn pixel_size(&self) -> PixelSize {
        let size = self.inner.inner_size();
        PixelSize::new(size.width, size.height)
    }
}

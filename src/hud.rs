use std::sync::Arc;

use winit::window::Window;

use crate::core::timer::FpsMeter;
use crate::frame::FrameInfo;
use crate::traits::PixelSize;
use crate::world::World;

const FPS_WINDOW_SECS: f32 = 1.0;

/// egui overlay with frame rate and effect status
pub struct Hud {
    window: Arc<Window>,
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    fps: FpsMeter,
}

impl Hud {
    pub fn new(window: Arc<Window>, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            window,
            ctx,
            state,
            renderer,
            fps: FpsMeter::new(FPS_WINDOW_SECS),
        }
    }

    /// Feed a window event to egui, returns true if egui consumed it
    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(&self.window, event).consumed
    }

    /// Lay out the overlay and record its draw into `encoder`.
    /// Returns extra command buffers egui needs submitted first.
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        size: PixelSize,
        world: &World,
        frame: &FrameInfo,
    ) -> Vec<wgpu::CommandBuffer> {
        if self.fps.tick(frame.delta) {
            log::trace!("FPS: {:.1}", self.fps.fps());
        }
        let fps = self.fps.fps();
        let drops = world.rain.len();
        let quake = world.quake.remaining_frames();

        let raw_input = self.state.take_egui_input(&self.window);
        let full_output = self.ctx.run(raw_input, |ctx| {
            egui::Window::new("Status")
                .title_bar(false)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 10.0))
                .frame(egui::Frame::NONE)
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(format!("{:.0}", fps))
                            .size(48.0)
                            .color(egui::Color32::from_rgb(74, 158, 255)),
                    );
                    ui.label(
                        egui::RichText::new("FPS")
                            .size(12.0)
                            .color(egui::Color32::GRAY),
                    );
                    ui.label(format!("rain: {} drops", drops));
                    if quake > 0 {
                        ui.label(
                            egui::RichText::new(format!("quake: {} frames", quake))
                                .color(egui::Color32::from_rgb(255, 140, 60)),
                        );
                    }
                });
        });

        self.state
            .handle_platform_output(&self.window, full_output.platform_output);

        let pixels_per_point = self.ctx.pixels_per_point();
        let tris = self.ctx.tessellate(full_output.shapes, pixels_per_point);
        for (id, delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point,
        };
        let extra = self
            .renderer
            .update_buffers(device, queue, encoder, &tris, &screen);

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("HUD Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();
            self.renderer.render(&mut pass, &tris, &screen);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }

        extra
    }
}

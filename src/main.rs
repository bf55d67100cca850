use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window as WinitWindow, WindowId},
};

use storm_scene::cli::Cli;
use storm_scene::frame::Schedule;
use storm_scene::renderer::Renderer;
use storm_scene::traits::DisplaySurface;
use storm_scene::window::Window;
use storm_scene::world::World;
use storm_scene::{Animator, SceneConfig};

const INITIAL_WINDOW_WIDTH: u32 = 800;
const INITIAL_WINDOW_HEIGHT: u32 = 600;

struct App {
    config: SceneConfig,
    seed: u64,
    frame_limit: Option<u64>,
    show_hud: bool,
    window: Option<Window>,
    renderer: Option<Renderer>,
    animator: Option<Animator>,
}

impl App {
    fn new(config: SceneConfig, seed: u64, frame_limit: Option<u64>, show_hud: bool) -> Self {
        Self {
            config,
            seed,
            frame_limit,
            show_hud,
            window: None,
            renderer: None,
            animator: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Arc::new(
            event_loop.create_window(
                WinitWindow::default_attributes()
                    .with_title("Storm Scene")
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        INITIAL_WINDOW_WIDTH,
                        INITIAL_WINDOW_HEIGHT,
                    )),
            )?,
        );
        let window = Window::new(window);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let world = World::setup(&self.config, window.pixel_size().aspect(), &mut rng);

        let renderer = pollster::block_on(Renderer::new(
            window.inner().clone(),
            &world,
            self.show_hud,
        ))?;

        let mut animator = Animator::new(world, &self.config, self.seed)?;
        if let Some(limit) = self.frame_limit {
            animator = animator.with_frame_limit(limit);
        }

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.animator = Some(animator);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(renderer), Some(animator)) =
            (&self.window, &mut self.renderer, &mut self.animator)
        else {
            return;
        };

        match animator.frame(window, renderer) {
            Ok(Schedule::NextFrame) => window.request_redraw(),
            Ok(Schedule::Stop) => event_loop.exit(),
            Err(e) => {
                log::error!("Frame failed: {:#}", e);
                window.request_redraw();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("Failed to initialize scene: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let Some(renderer) = &mut self.renderer {
            if renderer.handle_event(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    // Redraws are requested by each frame's `Schedule`; only the timer is polled here
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(animator) = &mut self.animator {
            animator.poll_timers(Instant::now());
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(animator) = &mut self.animator {
            animator.stop();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.scene_config()?;

    if cli.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let seed = cli.seed.unwrap_or_else(rand::random);
    log::info!("Starting with seed {}", seed);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, seed, cli.frames, !cli.no_ui);
    event_loop.run_app(&mut app)?;

    Ok(())
}

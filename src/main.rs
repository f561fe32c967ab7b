use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use hero_scene::cli::Cli;
use hero_scene::component::HeroScene;
use hero_scene::config::SceneConfig;
use hero_scene::core::controller::PointerHandler;
use hero_scene::core::input_adapter::WinitPointer;
use hero_scene::core::surface_renderer::SceneRenderer;
use hero_scene::core::window::SurfaceSize;
use hero_scene::loaders::{load_model, AssetLoad};
use hero_scene::theme::ThemeSignal;

const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 720;

/// Events delivered to the UI thread from elsewhere
#[derive(Debug)]
enum AppEvent {
    ModelLoaded(AssetLoad),
}

struct App {
    config: SceneConfig,
    show_overlay: bool,
    themes: ThemeSignal,
    proxy: EventLoopProxy<AppEvent>,
    window: Option<Arc<Window>>,
    hero: Option<HeroScene<SceneRenderer>>,
    pointer: WinitPointer,
}

impl App {
    fn new(cli: &Cli, config: SceneConfig, proxy: EventLoopProxy<AppEvent>) -> Self {
        Self {
            config,
            show_overlay: !cli.no_ui,
            themes: ThemeSignal::new(cli.initial_theme()),
            proxy,
            window: None,
            hero: None,
            pointer: WinitPointer::new(),
        }
    }

    fn mount(&mut self, window: Arc<Window>) {
        let size = SurfaceSize::from(window.inner_size());
        let show_overlay = self.show_overlay;
        let surface_window = window.clone();

        let hero = HeroScene::mount(&self.config, size, &self.themes, |scene, _size| {
            pollster::block_on(SceneRenderer::new(surface_window, scene, show_overlay))
        });

        match hero {
            Ok(hero) => {
                self.hero = Some(hero);
                if let Some(model) = &self.config.model {
                    spawn_model_loader(model.path.clone(), self.proxy.clone());
                }
            }
            Err(e) => log::error!("failed to mount hero scene: {e}"),
        }
    }

    fn teardown(&mut self) {
        if let Some(hero) = &mut self.hero {
            hero.unmount();
        }
    }
}

/// Load the model off the UI thread and post the result back.
fn spawn_model_loader(path: PathBuf, proxy: EventLoopProxy<AppEvent>) {
    std::thread::spawn(move || {
        let load = load_model(&path);
        if proxy.send_event(AppEvent::ModelLoaded(load)).is_err() {
            log::trace!("event loop closed before model {path:?} finished loading");
        }
    });
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Hero Scene")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    INITIAL_WINDOW_WIDTH,
                    INITIAL_WINDOW_HEIGHT,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        self.mount(window.clone());
        self.window = Some(window);
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::ModelLoaded(load) => {
                if let Some(hero) = &mut self.hero {
                    hero.attach_model(load);
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(hero) = &mut self.hero else {
            if matches!(event, WindowEvent::CloseRequested) {
                event_loop.exit();
            }
            return;
        };

        // Let egui handle the event first
        if let Some(renderer) = hero.surface_mut() {
            if renderer.handle_window_event(&event) {
                return;
            }
        }

        if let Some(pointer) = self.pointer.translate(&event) {
            hero.handle_pointer(pointer);
            return;
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
            } => {
                hero.unmount();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::KeyT),
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let theme = self.themes.toggle();
                log::info!("theme toggled to {theme}");
            }
            WindowEvent::Resized(size) => hero.resize(size.into()),
            WindowEvent::RedrawRequested => {
                hero.frame();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let live = self.hero.as_ref().is_some_and(|hero| hero.is_live());
        if let (true, Some(window)) = (live, &self.window) {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.scene_config()?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let event_loop = EventLoop::<AppEvent>::with_user_event()
        .build()
        .context("failed to create event loop")?;
    let mut app = App::new(&cli, config, event_loop.create_proxy());

    event_loop.run_app(&mut app).context("event loop failed")?;

    Ok(())
}

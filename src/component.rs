//! The mounted hero scene: lifecycle, per-frame update and input handling.
//!
//! [`HeroScene`] owns everything a mount creates and releases all of it on
//! [`HeroScene::unmount`]. Every entry point checks liveness first, so
//! callbacks that arrive after teardown (a late frame, a pointer event, a
//! theme change or a model that finished loading) are no-ops.

use std::fmt;

use glam::Vec2;

use crate::animation::{AnimationDriver, DragPhase, DragState, RotationHold};
use crate::camera::Camera;
use crate::config::{ModelConfig, SceneConfig};
use crate::core::controller::{PointerEvent, PointerHandler};
use crate::core::frame::{FrameInfo, FrameLoop, LoopHandle};
use crate::core::render_pipeline::{FrameView, RenderSurface};
use crate::core::window::SurfaceSize;
use crate::errors::SceneError;
use crate::loaders::AssetLoad;
use crate::scene::{ObjectId, Scene, SceneObject, Shape};
use crate::theme::{Theme, ThemeSource, ThemeSubscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Uninitialized,
    Constructing,
    Running,
    Dragging,
    TornDown,
}

impl LifecycleState {
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Uninitialized, Constructing)
                | (Constructing, Running)
                | (Constructing, TornDown)
                | (Running, Dragging)
                | (Dragging, Running)
                | (Running, TornDown)
                | (Dragging, TornDown)
        )
    }

    pub fn is_live(self) -> bool {
        matches!(self, LifecycleState::Running | LifecycleState::Dragging)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Constructing => "constructing",
            LifecycleState::Running => "running",
            LifecycleState::Dragging => "dragging",
            LifecycleState::TornDown => "torn down",
        };
        f.write_str(name)
    }
}

/// A mounted, animating hero scene drawing through `B`.
pub struct HeroScene<B: RenderSurface> {
    state: LifecycleState,
    scene: Scene,
    driver: AnimationDriver,
    camera: Camera,
    drag: DragState,
    drag_target: Option<ObjectId>,
    model: Option<ModelConfig>,
    frames: FrameLoop,
    theme: Option<ThemeSubscription>,
    surface: Option<B>,
    size: SurfaceSize,
}

impl<B: RenderSurface> HeroScene<B> {
    /// Build the scene, subscribe to theme changes and acquire the surface.
    ///
    /// A configuration error is returned. A surface that cannot be acquired
    /// is not: the scene still mounts and animates, it just draws nothing.
    pub fn mount<F>(
        config: &SceneConfig,
        size: SurfaceSize,
        themes: &dyn ThemeSource,
        acquire: F,
    ) -> Result<Self, SceneError>
    where
        F: FnOnce(&Scene, SurfaceSize) -> Result<B, SceneError>,
    {
        let mut state = LifecycleState::Uninitialized;
        transition(&mut state, LifecycleState::Constructing);

        let (mut scene, driver) = Scene::build(config)?;
        let drag_target = config.drag_target.as_deref().and_then(|name| scene.find(name));

        let theme = themes.current();
        scene.apply_theme(theme);
        let subscription = themes.subscribe();

        let camera = Camera::from_config(&config.camera, size);

        let surface = match acquire(&scene, size) {
            Ok(surface) => Some(surface),
            Err(err) => {
                log::warn!("hero scene has no rendering surface: {err}");
                None
            }
        };

        let mut hero = Self {
            state,
            scene,
            driver,
            camera,
            drag: DragState::new(config.drag),
            drag_target,
            model: config.model.clone(),
            frames: FrameLoop::start(),
            theme: Some(subscription),
            surface,
            size,
        };
        hero.set_state(LifecycleState::Running);

        log::info!("hero scene mounted ({theme} theme, {} objects)", hero.scene.len());
        Ok(hero)
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state.is_live() && self.frames.is_active()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn drag_target(&self) -> Option<ObjectId> {
        self.drag_target
    }

    pub fn theme(&self) -> Theme {
        self.scene.theme()
    }

    pub fn surface(&self) -> Option<&B> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut B> {
        self.surface.as_mut()
    }

    /// Handle that stops the frame loop; stopping it has the same effect on
    /// frames as unmounting.
    pub fn loop_handle(&self) -> LoopHandle {
        self.frames.handle()
    }

    /// Run one frame on the wall clock.
    pub fn frame(&mut self) -> Option<FrameInfo> {
        if !self.is_live() {
            return None;
        }
        let info = self.frames.next_frame()?;
        self.render(info);
        Some(info)
    }

    /// Run one frame at an explicit elapsed time.
    pub fn frame_at(&mut self, time: f32) -> Option<FrameInfo> {
        if !self.is_live() {
            return None;
        }
        let info = self.frames.frame_at(time)?;
        self.render(info);
        Some(info)
    }

    fn render(&mut self, info: FrameInfo) {
        if let Some(theme) = self.theme.as_ref().and_then(ThemeSubscription::latest) {
            self.apply_theme(theme);
        }

        // Once touched, the drag owns the target's X and Y rotation.
        let hold = self
            .drag_target
            .filter(|_| self.drag.phase() != DragPhase::Untouched)
            .map(RotationHold::drag);
        self.driver.apply(&mut self.scene, info.time, hold);

        if let (Some(target), Some(step)) = (self.drag_target, self.drag.step()) {
            rotate(&mut self.scene, target, step);
        }

        self.camera.update(info.time);

        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let view = FrameView {
            scene: &self.scene,
            camera: &self.camera,
            frame: info,
            state: self.state,
            drag: self.drag.phase(),
        };

        match surface.draw(&view) {
            Ok(()) => {}
            Err(err) if err.is_surface_lost() => {
                log::debug!("surface lost, reconfiguring");
                if !self.size.is_empty() {
                    surface.resize(self.size);
                }
            }
            Err(err) => log::warn!("frame {} not drawn: {err}", info.number),
        }
    }

    /// Match the camera and surface to a new viewport. Empty sizes are ignored.
    pub fn resize(&mut self, size: SurfaceSize) {
        if !self.is_live() {
            log::trace!("resize to {}x{} after teardown ignored", size.width, size.height);
            return;
        }
        if size.is_empty() {
            return;
        }
        self.size = size;
        self.camera.set_aspect(size);
        if let Some(surface) = &mut self.surface {
            surface.resize(size);
        }
    }

    /// Recolour the scene. The next frame draws with the new colours.
    pub fn apply_theme(&mut self, theme: Theme) {
        if !self.is_live() || theme == self.scene.theme() {
            return;
        }
        self.scene.apply_theme(theme);
        log::debug!("hero scene repainted for {theme} theme");
    }

    /// Add a finished model load to the scene. Returns the new object, or
    /// `None` when the load failed, no model was configured, or the scene is
    /// no longer live.
    pub fn attach_model(&mut self, load: AssetLoad) -> Option<ObjectId> {
        if !self.is_live() {
            log::debug!("model load finished after teardown, discarded");
            return None;
        }

        let asset = match load {
            Ok(asset) => asset,
            Err(err) => {
                log::warn!("model not shown: {err}");
                return None;
            }
        };

        let model = self.model.clone().unwrap_or_default();
        let object = SceneObject {
            name: asset.name,
            shape: Shape::Mesh(asset.mesh),
            material: model.material.to_material(),
            base: model.transform(),
        };

        let id = self.scene.push_animated(object, model.track(), &mut self.driver);
        if let (Some(surface), Some(object)) = (&mut self.surface, self.scene.object(id)) {
            surface.add_object(id, object);
        }
        log::info!("model attached as object {}", id.index());
        Some(id)
    }

    /// Stop the loop and release the subscription and surface. Idempotent.
    pub fn unmount(&mut self) {
        self.frames.handle().stop();
        if self.state == LifecycleState::TornDown {
            return;
        }

        self.theme = None;
        self.surface = None;
        self.set_state(LifecycleState::TornDown);
        log::info!("hero scene torn down after {} frames", self.frames.frames());
    }

    fn set_state(&mut self, next: LifecycleState) {
        transition(&mut self.state, next);
    }
}

impl<B: RenderSurface> PointerHandler for HeroScene<B> {
    fn handle_pointer(&mut self, event: PointerEvent) {
        if !self.is_live() {
            log::trace!("{event:?} after teardown ignored");
            return;
        }
        let Some(target) = self.drag_target else {
            return;
        };

        match event {
            PointerEvent::Pressed(position) => {
                self.drag.press(position);
                self.set_state(LifecycleState::Dragging);
            }
            PointerEvent::Moved(position) => {
                if let Some(rotation) = self.drag.move_to(position) {
                    rotate(&mut self.scene, target, rotation);
                }
            }
            PointerEvent::Released | PointerEvent::Left => {
                if self.drag.is_dragging() {
                    self.drag.release();
                    self.set_state(LifecycleState::Running);
                }
            }
        }
    }
}

impl<B: RenderSurface> Drop for HeroScene<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn transition(state: &mut LifecycleState, next: LifecycleState) {
    if state.can_transition_to(next) {
        log::trace!("hero scene {state} -> {next}");
        *state = next;
    } else if *state != next {
        log::warn!("ignored lifecycle transition {state} -> {next}");
    }
}

/// Add a rotation about X and Y to one object's transform.
fn rotate(scene: &mut Scene, id: ObjectId, rotation: Vec2) {
    if let Some(transform) = scene.transform_mut(id) {
        transform.rotation.x += rotation.x;
        transform.rotation.y += rotation.y;
    }
}

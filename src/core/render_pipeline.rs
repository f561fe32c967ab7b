use super::frame::FrameInfo;
use super::window::SurfaceSize;
use crate::animation::DragPhase;
use crate::camera::Camera;
use crate::component::LifecycleState;
use crate::errors::SceneError;
use crate::scene::{ObjectId, Scene, SceneObject};

/// Everything a surface needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    pub frame: FrameInfo,
    pub state: LifecycleState,
    pub drag: DragPhase,
}

/// Drawing backend of a mounted hero scene
pub trait RenderSurface {
    /// Match a new drawable size. Never called with an empty size.
    fn resize(&mut self, size: SurfaceSize);

    /// Upload an object added after the surface was acquired
    fn add_object(&mut self, id: ObjectId, object: &SceneObject);

    /// Draw and present one frame
    fn draw(&mut self, view: &FrameView<'_>) -> Result<(), SceneError>;
}

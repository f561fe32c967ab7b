pub mod animation;
pub mod camera;
pub mod cli;
pub mod component;
pub mod config;
pub mod core;
pub mod errors;
pub mod loaders;
pub mod overlay;
pub mod scene;
pub mod theme;
pub mod types;

pub use component::{HeroScene, LifecycleState};
pub use config::SceneConfig;
pub use errors::{AssetError, SceneError};
pub use theme::{Theme, ThemeSignal, ThemeSource};

pub mod clock;
pub mod controller;
pub mod frame;
pub mod gpu_context;
pub mod input_adapter;
pub mod render_pipeline;
pub mod surface_renderer;
pub mod timer;
pub mod window;

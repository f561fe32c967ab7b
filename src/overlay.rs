//! Diagnostic egui overlay drawn over the scene.

use std::sync::Arc;

use winit::event::WindowEvent;
use winit::window::Window;

use crate::core::render_pipeline::FrameView;

pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    window: Arc<Window>,
}

impl Overlay {
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
            ctx,
            state,
            renderer,
            window,
        }
    }

    /// Returns true when egui consumed the event
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.state.on_window_event(&self.window, event).consumed
    }

    /// Record the overlay into `encoder`, loading what the scene pass left in `target`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        size: [u32; 2],
        view: &FrameView<'_>,
        fps: f32,
    ) {
        let raw_input = self.state.take_egui_input(&self.window);
        let particles = view.scene.particles.as_ref().map_or(0, |p| p.len());

        let full_output = self.ctx.run(raw_input, |ctx| {
            egui::Window::new("Hero Scene")
                .title_bar(true)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 10.0))
                .default_width(220.0)
                .show(ctx, |ui| {
                    ui.heading(
                        egui::RichText::new(format!("{fps:.0} FPS"))
                            .size(28.0)
                            .color(egui::Color32::from_rgb(91, 138, 223)),
                    );
                    ui.separator();
                    ui.monospace(format!("State:     {}", view.state));
                    ui.monospace(format!("Theme:     {}", view.scene.theme()));
                    ui.monospace(format!("Drag:      {:?}", view.drag));
                    ui.monospace(format!("Objects:   {}", view.scene.len()));
                    ui.monospace(format!("Particles: {particles}"));
                    ui.monospace(format!("Time:      {:.1}s", view.frame.time));
                    ui.add_space(4.0);
                    ui.label(
                        egui::RichText::new("T toggles theme, Esc tears down")
                            .size(11.0)
                            .color(egui::Color32::GRAY),
                    );
                });
        });

        self.state
            .handle_platform_output(&self.window, full_output.platform_output);

        let tris = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: size,
            pixels_per_point: full_output.pixels_per_point,
        };
        self.renderer
            .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Pass"),
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

            self.renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

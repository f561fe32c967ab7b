use glam::Vec3;
use rand::Rng;

use crate::theme::{Color, Palette, Theme};

/// Point cloud scattered uniformly through a cube centred on the origin.
#[derive(Debug, Clone)]
pub struct ParticleCloud {
    pub positions: Vec<[f32; 3]>,
    pub extent: f32,
    pub palette: Palette,
    pub color: Color,
    pub size: f32,
    pub opacity: f32,
}

impl ParticleCloud {
    /// Fresh distribution from the thread RNG; two calls never agree.
    pub fn scatter(count: usize, extent: f32, palette: Palette, size: f32, opacity: f32) -> Self {
        Self::scatter_with(&mut rand::thread_rng(), count, extent, palette, size, opacity)
    }

    pub fn scatter_with<R: Rng + ?Sized>(
        rng: &mut R,
        count: usize,
        extent: f32,
        palette: Palette,
        size: f32,
        opacity: f32,
    ) -> Self {
        let positions = (0..count)
            .map(|_| {
                [
                    (rng.gen::<f32>() - 0.5) * extent,
                    (rng.gen::<f32>() - 0.5) * extent,
                    (rng.gen::<f32>() - 0.5) * extent,
                ]
            })
            .collect();

        log::debug!("scattered {count} particles in a {extent}-unit cube");

        Self {
            positions,
            extent,
            palette,
            color: palette.resolve(Theme::default()),
            size,
            opacity,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn apply_theme(&mut self, theme: Theme) {
        self.color = self.palette.resolve(theme);
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.abs().max_element() <= self.extent * 0.5
    }
}

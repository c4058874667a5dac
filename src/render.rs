use image::{ImageBuffer, Rgb, RgbImage};

use crate::export::FluidData;
use crate::field::FieldValue;

/// Added to normalisation denominators so empty fields stay finite.
pub const NORMALIZE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceField {
    Density,
    Speed,
}

/// One `nx * ny` layer of a field at fixed depth, row-major in `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f32>,
}

impl Slice {
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.width + x]
    }

    pub fn max(&self) -> f32 {
        self.values.iter().cloned().fold(0.0, f32::max)
    }

    /// Values divided by `max + epsilon`, so the result lies in `[0, 1)` for
    /// non-negative data.
    pub fn normalized(&self) -> Slice {
        let denom = self.max() + NORMALIZE_EPSILON;
        Slice {
            width: self.width,
            height: self.height,
            values: self.values.iter().map(|v| v / denom).collect(),
        }
    }

    /// Values rescaled to `[0, 1]` over their own range. A constant slice maps
    /// to zero.
    pub fn normalized_range(&self) -> Slice {
        let min = self.values.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = self.values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let denom = (max - min).max(0.0) + NORMALIZE_EPSILON;
        Slice {
            width: self.width,
            height: self.height,
            values: self.values.iter().map(|v| (v - min) / denom).collect(),
        }
    }

    /// Raw native-endian `f32` bytes, the layout of a single-channel float
    /// texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.values)
    }
}

/// Copies layer `z` (clamped to the grid) of `field` out of `data`.
pub fn extract_slice(data: &impl FluidData, field: SliceField, z: usize) -> Slice {
    let grid = data.grid();
    let z = z.min(grid.nz() - 1);
    let mut values = Vec::with_capacity(grid.nx() * grid.ny());
    for y in 0..grid.ny() {
        for x in 0..grid.nx() {
            let idx = grid.index_of(x, y, z);
            values.push(match field {
                SliceField::Density => data.density()[idx],
                SliceField::Speed => data.velocity()[idx].magnitude(),
            });
        }
    }
    Slice {
        width: grid.nx(),
        height: grid.ny(),
        values,
    }
}

pub struct Renderer {
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn render_to_image(&self, slice: &Slice, field: SliceField) -> RgbImage {
        let normalized = match field {
            SliceField::Density => slice.normalized_range(),
            SliceField::Speed => slice.normalized(),
        };
        let mut img = ImageBuffer::new(self.width, self.height);

        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let sx = (x as usize * slice.width) / self.width as usize;
            let sy = (y as usize * slice.height) / self.height as usize;
            // Image rows grow downward, grid y grows upward.
            let sy = slice.height - 1 - sy.min(slice.height - 1);
            let t = normalized.get(sx.min(slice.width - 1), sy).clamp(0.0, 1.0);
            *pixel = match field {
                SliceField::Density => density_color(t),
                SliceField::Speed => speed_color(t),
            };
        }

        img
    }

    pub fn render_field(&self, data: &impl FluidData, field: SliceField, z: usize) -> RgbImage {
        self.render_to_image(&extract_slice(data, field, z), field)
    }
}

fn density_color(t: f32) -> Rgb<u8> {
    // Blue for light fluid, white for dense.
    let intensity = (t * 255.0) as u8;
    Rgb([intensity, intensity, 255])
}

fn speed_color(t: f32) -> Rgb<u8> {
    let r = (t * 255.0) as u8;
    let g = ((t * 2.0 - 1.0).max(0.0) * 255.0) as u8;
    let b = ((1.0 - t) * 96.0) as u8;
    Rgb([r, g, b])
}

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::error::{FluidError, Result};
use crate::field::Vector3;
use crate::grid::Grid3D;
use crate::render::{Renderer, SliceField};
use crate::state::FluidState;
use crate::{FluidSimulation, Simulation};

/// Read-only view of a simulation for renderers, exporters and metrics.
pub trait FluidData {
    fn grid(&self) -> &Grid3D;
    fn density(&self) -> &[f32];
    fn velocity(&self) -> &[Vector3];
    fn pressure(&self) -> &[f32];
}

impl FluidData for Simulation {
    fn grid(&self) -> &Grid3D {
        Simulation::grid(self)
    }
    fn density(&self) -> &[f32] {
        &self.state().density
    }
    fn velocity(&self) -> &[Vector3] {
        &self.state().velocity
    }
    fn pressure(&self) -> &[f32] {
        &self.state().pressure
    }
}

pub struct ImageExporter {
    renderer: Renderer,
}

impl ImageExporter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            renderer: Renderer::new(width, height),
        }
    }

    pub fn export_density_png(
        &self,
        simulation: &impl FluidData,
        z: usize,
        path: &Path,
    ) -> Result<()> {
        let img = self.renderer.render_field(simulation, SliceField::Density, z);
        img.save(path)?;
        Ok(())
    }

    pub fn export_speed_png(
        &self,
        simulation: &impl FluidData,
        z: usize,
        path: &Path,
    ) -> Result<()> {
        let img = self.renderer.render_field(simulation, SliceField::Speed, z);
        img.save(path)?;
        Ok(())
    }

    /// Steps `steps` times, writing `{prefix}_frame_NNNN.png` after each.
    pub fn export_frame_sequence(
        &self,
        simulation: &mut (impl FluidData + FluidSimulation),
        steps: usize,
        z: usize,
        output_dir: &Path,
        prefix: &str,
    ) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;
        for i in 0..steps {
            simulation.step();

            let filename = format!("{}_frame_{:04}.png", prefix, i);
            let path = output_dir.join(filename);

            self.export_density_png(simulation, z, &path)?;
        }
        log::info!("exported {} frames to {}", steps, output_dir.display());
        Ok(())
    }
}

/// Serialisable copy of a [`FluidState`] and its grid.
///
/// Field arrays are stored as base64 little-endian `f32`; velocity is
/// interleaved `x, y, z` per cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid: Grid3D,
    pub viscosity: f32,
    pub diffusion_rate: f32,
    pub density: String,
    pub pressure: String,
    pub velocity: String,
}

impl Snapshot {
    pub fn capture(grid: &Grid3D, state: &FluidState) -> Self {
        let velocity: Vec<f32> = state
            .velocity
            .iter()
            .flat_map(|v| v.to_array())
            .collect();
        Self {
            grid: *grid,
            viscosity: state.viscosity,
            diffusion_rate: state.diffusion_rate,
            density: encode_f32(&state.density),
            pressure: encode_f32(&state.pressure),
            velocity: encode_f32(&velocity),
        }
    }

    /// Decodes the stored fields. The grid itself was validated when the
    /// snapshot was built or parsed.
    pub fn restore(&self) -> Result<FluidState> {
        let expected = self.grid.cell_count();
        let density = decode_f32(&self.density)?;
        let pressure = decode_f32(&self.pressure)?;
        let velocity = decode_f32(&self.velocity)?;

        for got in [density.len(), pressure.len(), velocity.len() / 3] {
            if got != expected {
                return Err(FluidError::SnapshotMismatch { expected, got });
            }
        }
        if velocity.len() % 3 != 0 {
            return Err(FluidError::SnapshotMismatch {
                expected: expected * 3,
                got: velocity.len(),
            });
        }

        Ok(FluidState {
            velocity: velocity
                .chunks_exact(3)
                .map(Vector3::from_slice)
                .collect(),
            density,
            pressure,
            viscosity: self.viscosity,
            diffusion_rate: self.diffusion_rate,
        })
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

fn encode_f32(values: &[f32]) -> String {
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    STANDARD.encode(bytes)
}

fn decode_f32(encoded: &str) -> Result<Vec<f32>> {
    let bytes = STANDARD.decode(encoded)?;
    if bytes.len() % 4 != 0 {
        return Err(FluidError::SnapshotMismatch {
            expected: bytes.len() / 4 * 4,
            got: bytes.len(),
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

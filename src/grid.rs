use serde::{Deserialize, Serialize};

use crate::error::{FluidError, Result};
use crate::field::Vector3;

/// Dense 3D cell grid with a clamped (zero-gradient) boundary.
///
/// Cells are stored x-fastest: `x + nx * (y + ny * z)`. Coordinates passed to
/// [`Grid3D::index`] are clamped per axis, so stencils may probe one or more
/// cells past the domain and read the nearest boundary cell instead.
///
/// Deserialisation goes through [`Grid3D::try_new`], so a loaded grid has
/// the same guarantees as a constructed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridExtents")]
pub struct Grid3D {
    nx: usize,
    ny: usize,
    nz: usize,
}

#[derive(Deserialize)]
struct GridExtents {
    nx: usize,
    ny: usize,
    nz: usize,
}

impl TryFrom<GridExtents> for Grid3D {
    type Error = FluidError;

    fn try_from(extents: GridExtents) -> Result<Self> {
        Self::try_new(extents.nx, extents.ny, extents.nz)
    }
}

impl Grid3D {
    /// Creates a grid. Panics if any extent is zero or the cell count
    /// overflows `usize`.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        match Self::try_new(nx, ny, nz) {
            Ok(grid) => grid,
            Err(err) => panic!("{}", err),
        }
    }

    /// Fallible [`Grid3D::new`] for extents that come from outside the
    /// program.
    pub fn try_new(nx: usize, ny: usize, nz: usize) -> Result<Self> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(FluidError::InvalidConfig(format!(
                "grid extents must be positive, got {}x{}x{}",
                nx, ny, nz
            )));
        }
        if nx.checked_mul(ny).and_then(|n| n.checked_mul(nz)).is_none() {
            return Err(FluidError::InvalidConfig(format!(
                "grid {}x{}x{} has more cells than fit in memory",
                nx, ny, nz
            )));
        }
        Ok(Self { nx, ny, nz })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    pub fn cell_count(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Flat index of `(x, y, z)` after clamping each coordinate to the grid.
    #[inline]
    pub fn index(&self, x: isize, y: isize, z: isize) -> usize {
        let x = clamp_axis(x, self.nx);
        let y = clamp_axis(y, self.ny);
        let z = clamp_axis(z, self.nz);
        x + self.nx * (y + self.ny * z)
    }

    /// Flat index for in-range unsigned coordinates (still clamped).
    #[inline]
    pub fn index_of(&self, x: usize, y: usize, z: usize) -> usize {
        let x = x.min(self.nx - 1);
        let y = y.min(self.ny - 1);
        let z = z.min(self.nz - 1);
        x + self.nx * (y + self.ny * z)
    }

    /// Inverse of the flat layout. `idx` must be below `cell_count()`.
    pub fn coords(&self, idx: usize) -> (usize, usize, usize) {
        debug_assert!(idx < self.cell_count());
        let x = idx % self.nx;
        let y = (idx / self.nx) % self.ny;
        let z = idx / (self.nx * self.ny);
        (x, y, z)
    }

    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.nx && y < self.ny && z < self.nz
    }

    /// Continuous centre of a cell; cell `i` spans `[i, i + 1)` on each axis.
    pub fn cell_center(&self, x: usize, y: usize, z: usize) -> Vector3 {
        Vector3::new(x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5)
    }

    /// Iterates over every cell as `(x, y, z)` in storage order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        (0..self.nz).flat_map(move |z| {
            (0..self.ny).flat_map(move |y| (0..self.nx).map(move |x| (x, y, z)))
        })
    }

    /// Sum of the six face neighbours of `(x, y, z)`, boundary cells
    /// counting themselves in place of the missing neighbour.
    #[inline]
    pub(crate) fn neighbor_sum<T: crate::field::FieldValue>(
        &self,
        field: &[T],
        x: usize,
        y: usize,
        z: usize,
    ) -> T {
        let (x, y, z) = (x as isize, y as isize, z as isize);
        field[self.index(x - 1, y, z)]
            + field[self.index(x + 1, y, z)]
            + field[self.index(x, y - 1, z)]
            + field[self.index(x, y + 1, z)]
            + field[self.index(x, y, z - 1)]
            + field[self.index(x, y, z + 1)]
    }
}

#[inline]
fn clamp_axis(v: isize, extent: usize) -> usize {
    v.clamp(0, extent as isize - 1) as usize
}

//! Dense scalar corner lattice.

use nalgebra::Point3;

/// A dense 3D lattice of scalar samples.
///
/// Dimensions count lattice *corners*; a grid of `(nx, ny, nz)` corners
/// spans `(nx-1, ny-1, nz-1)` cells. Values are stored in row-major order
/// with x varying fastest.
#[derive(Debug, Clone)]
pub struct ScalarGrid {
    values: Vec<f64>,
    dimensions: (usize, usize, usize),
    origin: Point3<f64>,
    cell_size: f64,
}

impl ScalarGrid {
    /// Create a zero-filled grid.
    ///
    /// # Example
    ///
    /// ```
    /// use shell_levelset::ScalarGrid;
    /// use nalgebra::Point3;
    ///
    /// let grid = ScalarGrid::new((8, 8, 8), Point3::origin(), 0.5);
    /// assert_eq!(grid.len(), 512);
    /// ```
    #[must_use]
    pub fn new(dimensions: (usize, usize, usize), origin: Point3<f64>, cell_size: f64) -> Self {
        let (nx, ny, nz) = dimensions;
        Self {
            values: vec![0.0; nx * ny * nz],
            dimensions,
            origin,
            cell_size,
        }
    }

    /// Lattice dimensions (corner counts).
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize, usize) {
        self.dimensions
    }

    /// Lattice origin (position of corner `(0, 0, 0)`).
    #[must_use]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Cell edge length.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Value at lattice coordinates; 0.0 out of range.
    #[must_use]
    pub fn get(&self, ix: usize, iy: usize, iz: usize) -> f64 {
        if self.in_range(ix, iy, iz) {
            self.values[self.index(ix, iy, iz)]
        } else {
            0.0
        }
    }

    /// Set a value; ignored out of range.
    pub fn set(&mut self, ix: usize, iy: usize, iz: usize, value: f64) {
        if self.in_range(ix, iy, iz) {
            let idx = self.index(ix, iy, iz);
            self.values[idx] = value;
        }
    }

    /// World position of a lattice corner.
    #[must_use]
    pub fn position(&self, ix: usize, iy: usize, iz: usize) -> Point3<f64> {
        Point3::new(
            self.origin.x + ix as f64 * self.cell_size,
            self.origin.y + iy as f64 * self.cell_size,
            self.origin.z + iz as f64 * self.cell_size,
        )
    }

    /// Total number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the lattice holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn in_range(&self, ix: usize, iy: usize, iz: usize) -> bool {
        ix < self.dimensions.0 && iy < self.dimensions.1 && iz < self.dimensions.2
    }

    fn index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        ix + iy * self.dimensions.0 + iz * self.dimensions.0 * self.dimensions.1
    }
}

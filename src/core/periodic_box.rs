use crate::core::{Matrix3f, Vector3f};

/// HOOMD simulation box centered at the origin.
///
/// Stored as edge lengths plus the tilt factors `xy`, `xz`, `yz`.
/// Orthorhombic boxes have all tilts equal to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimBox {
    pub lx: f32,
    pub ly: f32,
    pub lz: f32,
    pub xy: f32,
    pub xz: f32,
    pub yz: f32,
}

impl Default for SimBox {
    // Unit cube, same as the default of the hoomd schema
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl SimBox {
    pub fn new(lx: f32, ly: f32, lz: f32) -> Self {
        Self {
            lx,
            ly,
            lz,
            xy: 0.0,
            xz: 0.0,
            yz: 0.0,
        }
    }

    pub fn with_tilts(mut self, xy: f32, xz: f32, yz: f32) -> Self {
        self.xy = xy;
        self.xz = xz;
        self.yz = yz;
        self
    }

    /// Box from the gsd layout `[Lx, Ly, Lz, xy, xz, yz]`.
    pub fn from_array(v: [f32; 6]) -> Self {
        Self::new(v[0], v[1], v[2]).with_tilts(v[3], v[4], v[5])
    }

    /// Edge lengths `[Lx, Ly, Lz]`.
    pub fn lengths(&self) -> [f32; 3] {
        [self.lx, self.ly, self.lz]
    }

    pub fn tilts(&self) -> [f32; 3] {
        [self.xy, self.xz, self.yz]
    }

    pub fn is_triclinic(&self) -> bool {
        self.xy != 0.0 || self.xz != 0.0 || self.yz != 0.0
    }

    /// Box vectors as matrix columns.
    pub fn get_matrix(&self) -> Matrix3f {
        Matrix3f::from_columns(&[
            Vector3f::new(self.lx, 0.0, 0.0),
            Vector3f::new(self.xy * self.ly, self.ly, 0.0),
            Vector3f::new(self.xz * self.lz, self.yz * self.lz, self.lz),
        ])
    }

    pub fn volume(&self) -> f32 {
        self.get_matrix().determinant().abs()
    }
}

//! Voxelized density fields consumed by the placement engine.
//!
//! The engine never owns a field; it reads densities, voxel geometry, and the
//! boundary test through [`VoxelField`]. [`LatticeField`] is a dense in-memory
//! implementation for tests, demos, and callers without their own atlas layer.
use glam::{UVec3, Vec3};

use crate::error::{Error, Result};

/// Read-only view of a voxelized, non-negative density volume.
///
/// Densities are expected in somata per mm^3; voxel geometry is expressed in
/// micrometers. Implementations must keep all of this immutable for the
/// duration of a placement run.
pub trait VoxelField {
    /// Number of voxels along each axis.
    fn shape(&self) -> UVec3;

    /// Edge lengths of a single voxel, per axis.
    fn edge_lengths(&self) -> Vec3;

    /// Density value stored at a voxel index.
    fn density(&self, index: UVec3) -> f32;

    /// World-space center of the voxel at `index`.
    fn index_to_position(&self, index: UVec3) -> Vec3;

    /// Whether `point` lies inside the modeled geometry.
    fn in_geometry(&self, point: Vec3) -> bool;

    /// Volume of a single voxel.
    fn voxel_volume(&self) -> f32 {
        let e = self.edge_lengths();
        e.x * e.y * e.z
    }

    /// Total number of voxels.
    fn voxel_count(&self) -> usize {
        let s = self.shape();
        s.x as usize * s.y as usize * s.z as usize
    }
}

/// Dense row-major density lattice with an axis-aligned bounding geometry.
///
/// Data is laid out with `x` fastest: `data[(z * shape.y + y) * shape.x + x]`.
/// The geometry test accepts points inside the lattice bounding box.
#[derive(Debug, Clone)]
pub struct LatticeField {
    shape: UVec3,
    edge_lengths: Vec3,
    origin: Vec3,
    data: Vec<f32>,
}

impl LatticeField {
    /// Create a field from raw densities; `data.len()` must match the shape.
    pub fn new(shape: UVec3, edge_lengths: Vec3, origin: Vec3, data: Vec<f32>) -> Result<Self> {
        let expected = shape.x as usize * shape.y as usize * shape.z as usize;
        if data.len() != expected {
            return Err(Error::InvalidConfig(format!(
                "density data holds {} values, shape {shape} requires {expected}",
                data.len()
            )));
        }
        if edge_lengths.min_element() < 0.0 {
            return Err(Error::InvalidConfig(
                "voxel edge lengths must be non-negative".into(),
            ));
        }
        Ok(Self {
            shape,
            edge_lengths,
            origin,
            data,
        })
    }

    /// Create a field holding the same density in every voxel.
    pub fn filled(shape: UVec3, edge_lengths: Vec3, origin: Vec3, density: f32) -> Self {
        let len = shape.x as usize * shape.y as usize * shape.z as usize;
        Self {
            shape,
            edge_lengths,
            origin,
            data: vec![density; len],
        }
    }

    #[inline]
    fn linear_index(&self, index: UVec3) -> usize {
        debug_assert!(index.x < self.shape.x && index.y < self.shape.y && index.z < self.shape.z);
        ((index.z * self.shape.y + index.y) * self.shape.x + index.x) as usize
    }
}

impl VoxelField for LatticeField {
    fn shape(&self) -> UVec3 {
        self.shape
    }

    fn edge_lengths(&self) -> Vec3 {
        self.edge_lengths
    }

    fn density(&self, index: UVec3) -> f32 {
        self.data[self.linear_index(index)]
    }

    fn index_to_position(&self, index: UVec3) -> Vec3 {
        self.origin + (index.as_vec3() + Vec3::splat(0.5)) * self.edge_lengths
    }

    fn in_geometry(&self, point: Vec3) -> bool {
        let max = self.origin + self.shape.as_vec3() * self.edge_lengths;
        point.cmpge(self.origin).all() && point.cmplt(max).all()
    }
}

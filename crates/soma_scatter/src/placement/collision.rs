//! Candidate rejection against geometry, static obstacles, and the pattern.
use glam::Vec3;

use crate::field::VoxelField;
use crate::pattern::SpherePattern;

/// A pre-existing, unchanging obstacle structure checked for collisions and
/// never mutated by the placement core.
pub trait StaticSpatialIndex {
    /// True when a sphere at `position` with `radius` intersects nothing in
    /// this index.
    fn sphere_empty(&self, position: Vec3, radius: f32) -> bool;
}

/// Static obstacles given as a plain list of fixed spheres.
#[derive(Debug, Clone, Default)]
pub struct SphereObstacles {
    spheres: Vec<(Vec3, f32)>,
}

impl SphereObstacles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, position: Vec3, radius: f32) {
        self.spheres.push((position, radius));
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

impl From<Vec<(Vec3, f32)>> for SphereObstacles {
    fn from(spheres: Vec<(Vec3, f32)>) -> Self {
        Self { spheres }
    }
}

impl StaticSpatialIndex for SphereObstacles {
    fn sphere_empty(&self, position: Vec3, radius: f32) -> bool {
        !self.spheres.iter().any(|&(center, r)| {
            let reach = r + radius;
            position.distance_squared(center) < reach * reach
        })
    }
}

/// Rejects candidate spheres, short-circuiting in a fixed order: outside the
/// geometry, overlapping a static obstacle, overlapping the pattern.
pub struct CollisionChecker<'a, F: VoxelField + ?Sized> {
    field: &'a F,
    obstacles: &'a [&'a dyn StaticSpatialIndex],
}

impl<'a, F: VoxelField + ?Sized> CollisionChecker<'a, F> {
    pub fn new(field: &'a F, obstacles: &'a [&'a dyn StaticSpatialIndex]) -> Self {
        Self { field, obstacles }
    }

    /// Whether a candidate must be rejected. A candidate is only ever
    /// accepted if this returns false.
    pub fn is_colliding(&self, pattern: &SpherePattern, position: Vec3, radius: f32) -> bool {
        if !self.field.in_geometry(position) {
            return true;
        }
        if self
            .obstacles
            .iter()
            .any(|index| !index.sphere_empty(position, radius))
        {
            return true;
        }
        pattern.is_intersecting(position, radius)
    }
}

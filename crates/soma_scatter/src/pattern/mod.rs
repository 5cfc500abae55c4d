//! Append-only collection of accepted somata with fast spatial queries.
//!
//! [`SpherePattern`] is created empty at run start, grows one accepted sphere
//! at a time, and is handed back to the caller when the run ends. The engine
//! owns it exclusively while placing; nothing mutates it afterwards.
use glam::Vec3;

mod grid;

use grid::HashGrid;

/// An accepted soma: center position and radius. Immutable once accepted.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub position: Vec3,
    pub radius: f32,
}

/// Ordered sequence of accepted spheres backed by a uniform hash grid.
#[derive(Debug, Clone)]
pub struct SpherePattern {
    spheres: Vec<Sphere>,
    index: HashGrid,
    max_radius: f32,
}

impl SpherePattern {
    /// Create an empty pattern whose spatial index buckets centers into cubic
    /// cells of `cell_size`. The engine uses its interaction cutoff here.
    pub fn with_cell_size(cell_size: f32) -> Self {
        Self {
            spheres: Vec::new(),
            index: HashGrid::new(cell_size),
            max_radius: 0.0,
        }
    }

    /// Append an accepted sphere. No validation happens here; candidates are
    /// vetted by the collision checker before they reach the pattern.
    pub fn add(&mut self, position: Vec3, radius: f32) {
        let id = self.spheres.len() as u32;
        self.spheres.push(Sphere { position, radius });
        self.index.insert(position, id);
        if radius > self.max_radius {
            self.max_radius = radius;
        }
    }

    /// Whether a candidate sphere overlaps any accepted sphere.
    ///
    /// Overlap is strict: `distance < r_i + r_j`. Touching spheres do not
    /// overlap.
    pub fn is_intersecting(&self, position: Vec3, radius: f32) -> bool {
        if self.spheres.is_empty() {
            return false;
        }
        let search = radius + self.max_radius;
        let mut hit = false;
        self.index.for_each_in_radius(position, search, |id| {
            if hit {
                return;
            }
            let sphere = &self.spheres[id as usize];
            let reach = radius + sphere.radius;
            if position.distance_squared(sphere.position) < reach * reach {
                hit = true;
            }
        });
        hit
    }

    /// Center distance to the nearest accepted sphere if within `cutoff`,
    /// otherwise `f32::INFINITY`. The empty pattern always returns the
    /// sentinel, which the energy loop relies on for its first candidate.
    pub fn distance_to_nearest_neighbor(&self, position: Vec3, cutoff: f32) -> f32 {
        let mut best = f32::INFINITY;
        self.index.for_each_in_radius(position, cutoff, |id| {
            let d2 = position.distance_squared(self.spheres[id as usize].position);
            if d2 < best {
                best = d2;
            }
        });
        if best <= cutoff * cutoff {
            best.sqrt()
        } else {
            f32::INFINITY
        }
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Accepted spheres in insertion order.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sphere> {
        self.spheres.iter()
    }

    /// Consume the pattern into parallel position/radius arrays for
    /// downstream export.
    pub fn into_parallel_arrays(self) -> (Vec<mint::Vector3<f32>>, Vec<f32>) {
        let mut positions = Vec::with_capacity(self.spheres.len());
        let mut radii = Vec::with_capacity(self.spheres.len());
        for sphere in self.spheres {
            positions.push(sphere.position.into());
            radii.push(sphere.radius);
        }
        (positions, radii)
    }
}

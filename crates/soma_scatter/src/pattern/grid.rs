//! Uniform hash grid over sphere centers backing the pattern's spatial queries.
use std::collections::HashMap;

use glam::Vec3;

/// Key of a grid cell, floored world coordinates over the cell size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct CellKey {
    x: i32,
    y: i32,
    z: i32,
}

impl CellKey {
    #[inline]
    fn of(point: Vec3, cell_size: f32) -> Self {
        Self {
            x: (point.x / cell_size).floor() as i32,
            y: (point.y / cell_size).floor() as i32,
            z: (point.z / cell_size).floor() as i32,
        }
    }
}

/// Sparse cell -> sphere-id map; ids index into the pattern's sphere storage.
#[derive(Debug, Clone)]
pub(crate) struct HashGrid {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<u32>>,
}

impl HashGrid {
    pub(crate) fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0);
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, point: Vec3, id: u32) {
        let key = CellKey::of(point, self.cell_size);
        self.cells.entry(key).or_default().push(id);
    }

    /// Visit every stored id whose cell intersects the axis-aligned box of
    /// half-extent `radius` around `center`. Callers filter by true distance.
    pub(crate) fn for_each_in_radius(&self, center: Vec3, radius: f32, mut f: impl FnMut(u32)) {
        debug_assert!(radius >= 0.0);
        let lo = CellKey::of(center - Vec3::splat(radius), self.cell_size);
        let hi = CellKey::of(center + Vec3::splat(radius), self.cell_size);
        for z in lo.z..=hi.z {
            for y in lo.y..=hi.y {
                for x in lo.x..=hi.x {
                    if let Some(ids) = self.cells.get(&CellKey { x, y, z }) {
                        for &id in ids {
                            f(id);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_coordinates_floor_into_their_own_cells() {
        let a = CellKey::of(Vec3::new(-0.1, 0.0, 0.0), 1.0);
        let b = CellKey::of(Vec3::new(0.1, 0.0, 0.0), 1.0);
        assert_ne!(a, b);
    }

    #[test]
    fn query_box_covers_neighboring_cells() {
        let mut grid = HashGrid::new(1.0);
        grid.insert(Vec3::new(0.5, 0.5, 0.5), 0);
        grid.insert(Vec3::new(1.5, 0.5, 0.5), 1);
        grid.insert(Vec3::new(5.5, 0.5, 0.5), 2);

        let mut seen = Vec::new();
        grid.for_each_in_radius(Vec3::new(0.9, 0.5, 0.5), 1.0, |id| seen.push(id));
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1]);
    }

    #[test]
    fn zero_radius_still_visits_the_containing_cell() {
        let mut grid = HashGrid::new(2.0);
        grid.insert(Vec3::new(1.0, 1.0, 1.0), 7);

        let mut seen = Vec::new();
        grid.for_each_in_radius(Vec3::new(0.5, 0.5, 0.5), 0.0, |id| seen.push(id));
        assert_eq!(seen, vec![7]);
    }
}

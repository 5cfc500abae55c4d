//! Density grouping and whole-volume probability mass over voxel centers.
//!
//! Two interchangeable ways of turning a density field into placement work:
//! exact per-stratum counts via [`DensityGroups`], or one flat probability
//! mass function over all positive voxels via [`flat_probabilities`].
use std::collections::HashMap;

use glam::{UVec3, Vec3};

use crate::field::VoxelField;

/// Densities are somata per mm^3 while voxel volumes are um^3.
const UM3_TO_MM3: f64 = 1e-9;

/// Integer target counts for groups of equal-density voxels.
///
/// Each count is `floor(1e-9 * intensity * voxel_count * voxel_volume)`; the
/// truncation is part of the contract.
pub fn counts_per_group(
    intensities: &[f32],
    voxel_counts: &[usize],
    voxel_volume: f32,
) -> Vec<usize> {
    intensities
        .iter()
        .zip(voxel_counts)
        .map(|(&intensity, &count)| group_count(intensity, count, voxel_volume))
        .collect()
}

#[inline]
fn group_count(intensity: f32, voxel_count: usize, voxel_volume: f32) -> usize {
    (UM3_TO_MM3 * intensity as f64 * voxel_count as f64 * voxel_volume as f64).floor() as usize
}

/// One stratum of equal-density voxels and its integer target count.
#[derive(Debug, Clone)]
pub struct VoxelGroup {
    /// The density value shared by every voxel in this group.
    pub density: f32,
    /// Number of somata to place in this group.
    pub count: usize,
    /// World-space centers of the group's voxels.
    pub centers: Vec<Vec3>,
}

/// Finite, single-pass iterator over equal-density voxel groups, ordered by
/// ascending density value. Zero-density voxels are not represented.
///
/// The sequence is consumed once; iterating again requires rebuilding from
/// the source field.
#[derive(Debug)]
pub struct DensityGroups {
    groups: std::vec::IntoIter<VoxelGroup>,
}

impl DensityGroups {
    pub fn new<F: VoxelField + ?Sized>(field: &F) -> Self {
        // Non-negative floats sort like their bit patterns, so the raw bits
        // double as grouping key and sort key.
        let mut buckets: HashMap<u32, Vec<Vec3>> = HashMap::new();
        let shape = field.shape();
        for z in 0..shape.z {
            for y in 0..shape.y {
                for x in 0..shape.x {
                    let index = UVec3::new(x, y, z);
                    let density = field.density(index);
                    if density > 0.0 {
                        buckets
                            .entry(density.to_bits())
                            .or_default()
                            .push(field.index_to_position(index));
                    }
                }
            }
        }

        let mut bits: Vec<u32> = buckets.keys().copied().collect();
        bits.sort_unstable();

        let voxel_volume = field.voxel_volume();
        let groups: Vec<VoxelGroup> = bits
            .into_iter()
            .map(|b| {
                let centers = buckets.remove(&b).expect("bucket exists for its key");
                let density = f32::from_bits(b);
                VoxelGroup {
                    density,
                    count: group_count(density, centers.len(), voxel_volume),
                    centers,
                }
            })
            .collect();

        Self {
            groups: groups.into_iter(),
        }
    }
}

impl Iterator for DensityGroups {
    type Item = VoxelGroup;

    fn next(&mut self) -> Option<Self::Item> {
        self.groups.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.groups.size_hint()
    }
}

impl ExactSizeIterator for DensityGroups {}

/// Discrete probability mass function over positive-density voxel centers.
#[derive(Debug, Clone)]
pub struct VoxelPmf {
    pub centers: Vec<Vec3>,
    pub probabilities: Vec<f32>,
}

/// Normalize per-voxel expected counts (`density * voxel_volume_mm3`) into a
/// PMF over the strictly positive voxels, or `None` when the field carries no
/// positive mass.
pub fn flat_probabilities<F: VoxelField + ?Sized>(field: &F) -> Option<VoxelPmf> {
    let voxel_volume_mm3 = field.voxel_volume() as f64 * UM3_TO_MM3;
    let shape = field.shape();

    let mut centers = Vec::new();
    let mut expected = Vec::new();
    let mut total = 0.0_f64;
    for z in 0..shape.z {
        for y in 0..shape.y {
            for x in 0..shape.x {
                let index = UVec3::new(x, y, z);
                let count = field.density(index) as f64 * voxel_volume_mm3;
                if count > 0.0 {
                    centers.push(field.index_to_position(index));
                    expected.push(count);
                    total += count;
                }
            }
        }
    }

    if total <= 0.0 {
        return None;
    }

    let probabilities = expected.into_iter().map(|c| (c / total) as f32).collect();
    Some(VoxelPmf {
        centers,
        probabilities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::LatticeField;

    #[test]
    fn counts_truncate_converted_expectations() {
        let counts = counts_per_group(&[1e5, 2e5, 3.5e5], &[100, 120, 210], 1000.0);
        assert_eq!(counts, vec![10, 24, 73]);
    }

    #[test]
    fn groups_partition_positive_voxels_by_density() {
        // 2x2x1 lattice with densities 0, a, b, a.
        let field = LatticeField::new(
            UVec3::new(2, 2, 1),
            Vec3::splat(10.0),
            Vec3::ZERO,
            vec![0.0, 2e5, 3e5, 2e5],
        )
        .unwrap();

        let groups: Vec<VoxelGroup> = DensityGroups::new(&field).collect();
        assert_eq!(groups.len(), 2);

        // Ascending density order.
        assert_eq!(groups[0].density, 2e5);
        assert_eq!(groups[1].density, 3e5);

        // Partition covers every positive voxel exactly once.
        let total: usize = groups.iter().map(|g| g.centers.len()).sum();
        assert_eq!(total, 3);
        assert_eq!(groups[0].centers.len(), 2);
        assert_eq!(groups[1].centers, vec![Vec3::new(5.0, 15.0, 5.0)]);

        // Counts follow the truncated conversion for each stratum.
        assert_eq!(groups[0].count, group_count(2e5, 2, 1000.0));
        assert_eq!(groups[1].count, group_count(3e5, 1, 1000.0));
    }

    #[test]
    fn zero_density_field_produces_no_groups() {
        let field = LatticeField::filled(UVec3::new(3, 3, 3), Vec3::splat(5.0), Vec3::ZERO, 0.0);
        assert_eq!(DensityGroups::new(&field).len(), 0);
    }

    #[test]
    fn flat_probabilities_normalize_to_one() {
        let field = LatticeField::new(
            UVec3::new(2, 1, 1),
            Vec3::splat(10.0),
            Vec3::ZERO,
            vec![1e5, 3e5],
        )
        .unwrap();

        let pmf = flat_probabilities(&field).expect("positive mass");
        assert_eq!(pmf.centers.len(), 2);
        let sum: f32 = pmf.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        // Densities 1:3 split the mass 0.25 / 0.75.
        assert!((pmf.probabilities[0] - 0.25).abs() < 1e-6);
        assert!((pmf.probabilities[1] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn flat_probabilities_reject_empty_mass() {
        let field = LatticeField::filled(UVec3::new(2, 2, 2), Vec3::splat(1.0), Vec3::ZERO, 0.0);
        assert!(flat_probabilities(&field).is_none());
    }
}

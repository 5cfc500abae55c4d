//! Uniform-in-voxel position proposal.
use glam::Vec3;
use rand::rand_core::RngCore;

use crate::sampling::rand01;

/// Proposes candidate positions uniformly inside voxels of a fixed size.
///
/// One voxel center is selected per proposal, weighted when probabilities are
/// supplied, then the position is jittered uniformly inside the axis-aligned
/// box of `edge_lengths` centered on it. Zero edge lengths collapse the box
/// onto the center itself.
#[derive(Debug, Clone)]
pub struct VoxelProposal {
    /// Edge lengths of the sampled box, per axis.
    pub edge_lengths: Vec3,
}

impl VoxelProposal {
    /// Create a proposer for voxels with the given edge lengths.
    pub fn new(edge_lengths: Vec3) -> Self {
        Self { edge_lengths }
    }

    /// Draw one candidate position, or `None` when `centers` is empty.
    ///
    /// `probabilities`, when given, must parallel `centers`; selection then
    /// follows the discrete distribution, otherwise centers are equally
    /// likely.
    pub fn propose(
        &self,
        centers: &[Vec3],
        probabilities: Option<&[f32]>,
        rng: &mut dyn RngCore,
    ) -> Option<Vec3> {
        let center = match probabilities {
            Some(weights) => pick_weighted(centers, weights, rng)?,
            None => pick_uniform(centers, rng)?,
        };

        let offset = Vec3::new(rand01(rng) - 0.5, rand01(rng) - 0.5, rand01(rng) - 0.5);
        Some(center + offset * self.edge_lengths)
    }
}

fn pick_uniform(centers: &[Vec3], rng: &mut dyn RngCore) -> Option<Vec3> {
    if centers.is_empty() {
        return None;
    }
    let index = ((rand01(rng) * centers.len() as f32) as usize).min(centers.len() - 1);
    Some(centers[index])
}

fn pick_weighted(centers: &[Vec3], weights: &[f32], rng: &mut dyn RngCore) -> Option<Vec3> {
    debug_assert_eq!(centers.len(), weights.len());
    if centers.is_empty() {
        return None;
    }

    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }

    let mut roll = rand01(rng) * total;
    for (center, weight) in centers.iter().zip(weights) {
        roll -= weight;
        if roll <= 0.0 {
            return Some(*center);
        }
    }

    centers.last().copied()
}

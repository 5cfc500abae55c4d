//! Candidate generation for the placement loops.
//!
//! This module hosts the in-voxel position proposer, the density grouping
//! strategies that drive it, and the soma radius distribution seam.
use rand::rand_core::RngCore;

pub mod grouping;
pub mod proposal;

pub use grouping::{counts_per_group, flat_probabilities, DensityGroups, VoxelGroup, VoxelPmf};
pub use proposal::VoxelProposal;

/// Source of sampled soma radii, provided by the caller.
pub trait RadiusDistribution {
    fn sample_radius(&self, rng: &mut dyn RngCore) -> f32;
}

impl<F> RadiusDistribution for F
where
    F: Fn(&mut dyn RngCore) -> f32,
{
    fn sample_radius(&self, rng: &mut dyn RngCore) -> f32 {
        self(rng)
    }
}

/// Degenerate distribution that always returns the same radius.
#[derive(Debug, Clone, Copy)]
pub struct FixedRadius(pub f32);

impl RadiusDistribution for FixedRadius {
    fn sample_radius(&self, _rng: &mut dyn RngCore) -> f32 {
        self.0
    }
}

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRng {
        value: u32,
    }

    impl rand::rand_core::TryRng for FixedRng {
        type Error = core::convert::Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Ok(self.value)
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Ok(self.value as u64)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
            Ok(())
        }
    }

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn rand01_stays_in_unit_interval() {
        for value in [0, 1, 100, u32::MAX / 2, u32::MAX - 1, u32::MAX] {
            let mut rng = FixedRng { value };
            let result = rand01(&mut rng);
            assert!(
                (0.0..=1.0).contains(&result),
                "rand01({value}) = {result} is out of range [0,1]"
            );
        }
    }

    #[test]
    fn closures_act_as_radius_distributions() {
        let dist = |_rng: &mut dyn RngCore| 3.25_f32;
        let mut rng = FixedRng { value: 0 };
        assert_eq!(dist.sample_radius(&mut rng), 3.25);
        assert_eq!(FixedRadius(1.5).sample_radius(&mut rng), 1.5);
    }
}

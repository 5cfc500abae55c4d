//! Placement pipeline: run parameters, collision checks, pair potentials,
//! engine loops, and run events.
use crate::error::{Error, Result};

pub mod collision;
pub mod energy;
pub mod engine;
pub mod events;

/// Placement method, bound once at engine construction and stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Pure rejection sampling.
    FirstOrder,
    /// Energy-biased Metropolis-Hastings on top of rejection sampling.
    SecondOrder,
}

/// Immutable configuration for one placement run.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementParameters {
    /// Inverse temperature for Metropolis acceptance.
    pub beta: f32,
    /// Metropolis trials per accepted sphere.
    pub number_of_trials: usize,
    /// Interaction cutoff for nearest-neighbor energies.
    pub cutoff_radius: f32,
    /// Spheres placed without energy bias before Metropolis-Hastings activates.
    pub initial_sample_size: usize,
    /// Rejection-sampling attempt budget per sphere.
    pub max_attempts: usize,
}

impl PlacementParameters {
    pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

    /// Creates parameters with no burn-in and the default attempt budget.
    pub fn new(beta: f32, number_of_trials: usize, cutoff_radius: f32) -> Self {
        Self {
            beta,
            number_of_trials,
            cutoff_radius,
            initial_sample_size: 0,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Sets the burn-in sphere count.
    pub fn with_initial_sample_size(mut self, initial_sample_size: usize) -> Self {
        self.initial_sample_size = initial_sample_size;
        self
    }

    /// Sets the rejection-sampling attempt budget per sphere.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(Error::InvalidConfig("beta must be > 0 and finite".into()));
        }
        if !(self.cutoff_radius.is_finite() && self.cutoff_radius > 0.0) {
            return Err(Error::InvalidConfig(
                "cutoff_radius must be > 0 and finite".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be > 0".into()));
        }

        Ok(())
    }
}

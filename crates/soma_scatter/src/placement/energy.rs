//! Pairwise interaction energies biasing placement away from close neighbors.

/// Capability consumed by the engine: pairwise ("second order") potentials.
///
/// The answer of [`has_second_order_potentials`](EnergyOperator::has_second_order_potentials)
/// decides the placement strategy once, at engine construction.
pub trait EnergyOperator {
    fn has_second_order_potentials(&self) -> bool;

    /// Interaction energy for two somata whose centers are `distance` apart.
    fn second_order_potentials(&self, distance: f32) -> f32;
}

/// Energy operator without pairwise interactions; selects pure rejection
/// sampling.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInteraction;

impl EnergyOperator for NoInteraction {
    fn has_second_order_potentials(&self) -> bool {
        false
    }

    fn second_order_potentials(&self, _distance: f32) -> f32 {
        0.0
    }
}

/// Repulsive inverse-power pair potential `coefficient * distance^-exponent`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InversePowerPotential {
    pub coefficient: f32,
    pub exponent: f32,
}

impl InversePowerPotential {
    pub fn new(coefficient: f32, exponent: f32) -> Self {
        Self {
            coefficient,
            exponent,
        }
    }
}

impl EnergyOperator for InversePowerPotential {
    fn has_second_order_potentials(&self) -> bool {
        true
    }

    fn second_order_potentials(&self, distance: f32) -> f32 {
        self.coefficient * distance.powf(-self.exponent)
    }
}

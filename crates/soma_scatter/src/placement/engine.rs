//! Placement engine: strategy dispatch and the two driving loops.
//!
//! The engine owns the growing [`SpherePattern`] exclusively for the duration
//! of one run; every accepted sphere can change the acceptance probability of
//! the next candidate, so insertions stay strictly ordered on one thread.
//! Parallel variants would need disjoint voxel groups expanded by the cutoff,
//! or a lock around the propose-check-commit section.
use glam::Vec3;
use rand::rand_core::RngCore;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::field::VoxelField;
use crate::pattern::SpherePattern;
use crate::placement::collision::{CollisionChecker, StaticSpatialIndex};
use crate::placement::energy::EnergyOperator;
use crate::placement::events::{EventSink, PlacementEvent, PlacementEventKind};
use crate::placement::{PlacementParameters, Strategy};
use crate::sampling::grouping::{flat_probabilities, DensityGroups, VoxelGroup};
use crate::sampling::proposal::VoxelProposal;
use crate::sampling::{rand01, RadiusDistribution};

/// Final state of a placement run.
#[non_exhaustive]
#[derive(Debug)]
pub struct RunResult {
    /// The accepted spheres, in placement order.
    pub pattern: SpherePattern,
    /// Candidate positions evaluated.
    pub candidates_evaluated: usize,
    /// Candidate positions rejected.
    pub candidates_rejected: usize,
}

struct RunState {
    pattern: SpherePattern,
    evaluated: usize,
    rejected: usize,
}

impl RunState {
    fn new(params: &PlacementParameters) -> Self {
        Self {
            pattern: SpherePattern::with_cell_size(params.cutoff_radius),
            evaluated: 0,
            rejected: 0,
        }
    }
}

/// Places non-overlapping somata whose density follows a voxelized field.
///
/// The placement method is bound once at construction: an energy operator
/// reporting second-order potentials selects Metropolis-Hastings, anything
/// else selects pure rejection sampling.
pub struct PlacementEngine<'a, F, E, R>
where
    F: VoxelField,
    E: EnergyOperator,
    R: RadiusDistribution,
{
    params: PlacementParameters,
    total_spheres: usize,
    field: &'a F,
    energy: &'a E,
    obstacles: &'a [&'a dyn StaticSpatialIndex],
    radius_distribution: &'a R,
    strategy: Strategy,
}

impl<'a, F, E, R> PlacementEngine<'a, F, E, R>
where
    F: VoxelField,
    E: EnergyOperator,
    R: RadiusDistribution,
{
    pub fn try_new(
        params: PlacementParameters,
        total_spheres: usize,
        field: &'a F,
        energy: &'a E,
        obstacles: &'a [&'a dyn StaticSpatialIndex],
        radius_distribution: &'a R,
    ) -> Result<Self> {
        params.validate()?;
        if total_spheres == 0 {
            return Err(Error::InvalidConfig("total_spheres must be > 0".into()));
        }

        let strategy = if energy.has_second_order_potentials() {
            Strategy::SecondOrder
        } else {
            Strategy::FirstOrder
        };

        Ok(Self {
            params,
            total_spheres,
            field,
            energy,
            obstacles,
            radius_distribution,
            strategy,
        })
    }

    /// Strategy bound at construction.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn parameters(&self) -> &PlacementParameters {
        &self.params
    }

    pub fn total_spheres(&self) -> usize {
        self.total_spheres
    }

    /// Runs the exact-count loop over the field's equal-density groups.
    pub fn run(&self, rng: &mut impl RngCore) -> Result<RunResult> {
        self.run_with_events(rng, &mut ())
    }

    pub fn run_with_events(
        &self,
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<RunResult> {
        self.run_groups_with_events(DensityGroups::new(self.field), rng, sink)
    }

    /// Runs the exact-count loop over caller-supplied groups.
    pub fn run_groups(
        &self,
        groups: impl IntoIterator<Item = VoxelGroup>,
        rng: &mut impl RngCore,
    ) -> Result<RunResult> {
        self.run_groups_with_events(groups, rng, &mut ())
    }

    pub fn run_groups_with_events(
        &self,
        groups: impl IntoIterator<Item = VoxelGroup>,
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<RunResult> {
        let mut state = RunState::new(&self.params);
        let checker = CollisionChecker::new(self.field, self.obstacles);
        let proposal = VoxelProposal::new(self.field.edge_lengths());

        info!(
            "Exact-count placement of {} somata starting.",
            self.total_spheres
        );
        if sink.wants(PlacementEventKind::RunStarted) {
            sink.send(PlacementEvent::RunStarted {
                total_spheres: self.total_spheres,
                strategy: self.strategy,
            });
        }

        for (index, group) in groups.into_iter().enumerate() {
            if group.centers.is_empty() {
                warn!("Group {} has no candidate voxels; skipping.", index);
                if sink.wants(PlacementEventKind::Warning) {
                    sink.send(PlacementEvent::Warning {
                        context: format!("group:{index}"),
                        message: "Group has no candidate voxels; skipping".into(),
                    });
                }
                continue;
            }

            info!(
                "Group {}: {} voxels | target {}.",
                index,
                group.centers.len(),
                group.count
            );
            if sink.wants(PlacementEventKind::GroupStarted) {
                sink.send(PlacementEvent::GroupStarted {
                    index,
                    count: group.count,
                    voxels: group.centers.len(),
                });
            }

            let mut placed_in_group = 0;
            while placed_in_group < group.count && state.pattern.len() < self.total_spheres {
                let (position, radius) =
                    self.place_one(&checker, &proposal, &mut state, &group.centers, None, rng)?;
                state.pattern.add(position, radius);
                placed_in_group += 1;
                if sink.wants(PlacementEventKind::SpherePlaced) {
                    sink.send(PlacementEvent::SpherePlaced { position, radius });
                }
            }

            if sink.wants(PlacementEventKind::GroupFinished) {
                sink.send(PlacementEvent::GroupFinished {
                    index,
                    placed: placed_in_group,
                });
            }

            if state.pattern.len() >= self.total_spheres {
                break;
            }
        }

        Ok(self.finish(state, sink))
    }

    /// Runs the whole-volume probabilistic loop: one PMF over all positive
    /// voxels, placements drawn until the target count is reached.
    pub fn run_flat(&self, rng: &mut impl RngCore) -> Result<RunResult> {
        self.run_flat_with_events(rng, &mut ())
    }

    pub fn run_flat_with_events(
        &self,
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<RunResult> {
        let pmf = flat_probabilities(self.field).ok_or_else(|| {
            Error::InvalidConfig("density field has no positive mass".into())
        })?;

        let mut state = RunState::new(&self.params);
        let checker = CollisionChecker::new(self.field, self.obstacles);
        let proposal = VoxelProposal::new(self.field.edge_lengths());

        info!(
            "Flat-probability placement of {} somata over {} voxels starting.",
            self.total_spheres,
            pmf.centers.len()
        );
        if sink.wants(PlacementEventKind::RunStarted) {
            sink.send(PlacementEvent::RunStarted {
                total_spheres: self.total_spheres,
                strategy: self.strategy,
            });
        }

        while state.pattern.len() < self.total_spheres {
            let (position, radius) = self.place_one(
                &checker,
                &proposal,
                &mut state,
                &pmf.centers,
                Some(&pmf.probabilities),
                rng,
            )?;
            state.pattern.add(position, radius);
            if sink.wants(PlacementEventKind::SpherePlaced) {
                sink.send(PlacementEvent::SpherePlaced { position, radius });
            }
        }

        Ok(self.finish(state, sink))
    }

    fn finish(&self, state: RunState, sink: &mut dyn EventSink) -> RunResult {
        info!(
            "Placed {} somata ({} candidates evaluated, {} rejected).",
            state.pattern.len(),
            state.evaluated,
            state.rejected
        );
        if sink.wants(PlacementEventKind::RunFinished) {
            sink.send(PlacementEvent::RunFinished {
                placed: state.pattern.len(),
                evaluated: state.evaluated,
                rejected: state.rejected,
            });
        }

        RunResult {
            pattern: state.pattern,
            candidates_evaluated: state.evaluated,
            candidates_rejected: state.rejected,
        }
    }

    fn place_one(
        &self,
        checker: &CollisionChecker<'_, F>,
        proposal: &VoxelProposal,
        state: &mut RunState,
        centers: &[Vec3],
        probabilities: Option<&[f32]>,
        rng: &mut dyn RngCore,
    ) -> Result<(Vec3, f32)> {
        match self.strategy {
            Strategy::FirstOrder => {
                self.place_first_order(checker, proposal, state, centers, probabilities, rng)
            }
            Strategy::SecondOrder => {
                self.place_second_order(checker, proposal, state, centers, probabilities, rng)
            }
        }
    }

    /// Rejection sampling with a bounded attempt budget.
    fn place_first_order(
        &self,
        checker: &CollisionChecker<'_, F>,
        proposal: &VoxelProposal,
        state: &mut RunState,
        centers: &[Vec3],
        probabilities: Option<&[f32]>,
        rng: &mut dyn RngCore,
    ) -> Result<(Vec3, f32)> {
        for _ in 0..self.params.max_attempts {
            let position = proposal.propose(centers, probabilities, rng).ok_or_else(|| {
                Error::InvalidConfig("no candidate voxels to propose from".into())
            })?;
            let radius = self.radius_distribution.sample_radius(rng);
            state.evaluated += 1;
            if !checker.is_colliding(&state.pattern, position, radius) {
                return Ok((position, radius));
            }
            state.rejected += 1;
        }

        Err(Error::Exhausted {
            attempts: self.params.max_attempts,
        })
    }

    /// Metropolis-Hastings over rejection-sampled candidates.
    ///
    /// Isolated candidates (no neighbor within the cutoff) short-circuit: an
    /// interaction-free position is always preferred over continued search.
    fn place_second_order(
        &self,
        checker: &CollisionChecker<'_, F>,
        proposal: &VoxelProposal,
        state: &mut RunState,
        centers: &[Vec3],
        probabilities: Option<&[f32]>,
        rng: &mut dyn RngCore,
    ) -> Result<(Vec3, f32)> {
        if state.pattern.len() <= self.params.initial_sample_size {
            return self.place_first_order(checker, proposal, state, centers, probabilities, rng);
        }

        let cutoff = self.params.cutoff_radius;
        let (current_position, current_radius) =
            self.place_first_order(checker, proposal, state, centers, probabilities, rng)?;

        let distance = state
            .pattern
            .distance_to_nearest_neighbor(current_position, cutoff);
        if distance > cutoff {
            return Ok((current_position, current_radius));
        }

        let mut current = (current_position, current_radius);
        let mut current_energy = self.energy.second_order_potentials(distance);
        let mut best = current;
        let mut best_energy = current_energy;

        for _ in 0..self.params.number_of_trials {
            let trial =
                self.place_first_order(checker, proposal, state, centers, probabilities, rng)?;
            let trial_distance = state.pattern.distance_to_nearest_neighbor(trial.0, cutoff);
            if trial_distance > cutoff {
                return Ok(trial);
            }

            let trial_energy = self.energy.second_order_potentials(trial_distance);
            let log_acceptance = (self.params.beta * (current_energy - trial_energy)).min(0.0);
            if rand01(rng).ln() < log_acceptance {
                current = trial;
                current_energy = trial_energy;
                if current_energy < best_energy {
                    best = current;
                    best_energy = current_energy;
                }
            }
        }

        Ok(best)
    }
}

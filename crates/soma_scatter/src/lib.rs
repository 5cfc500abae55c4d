#![forbid(unsafe_code)]
//! soma_scatter: density-driven placement of non-overlapping somata in voxelized 3D volumes.
//!
//! Modules:
//! - field: voxel density field abstraction and an in-memory lattice implementation
//! - pattern: append-only sphere collection with hash-grid spatial queries
//! - sampling: in-voxel position proposal, density grouping, radius distributions
//! - placement: collision checks, pair potentials, engine loops, events
//!
//! For examples, see the `soma_scatter_examples` crate in this workspace.
pub mod error;
pub mod field;
pub mod pattern;
pub mod placement;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use soma_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::field::{LatticeField, VoxelField};
    pub use crate::pattern::{Sphere, SpherePattern};
    pub use crate::placement::collision::{CollisionChecker, SphereObstacles, StaticSpatialIndex};
    pub use crate::placement::energy::{EnergyOperator, InversePowerPotential, NoInteraction};
    pub use crate::placement::engine::{PlacementEngine, RunResult};
    pub use crate::placement::events::{
        EventSink, FnSink, PlacementEvent, PlacementEventKind, VecSink,
    };
    pub use crate::placement::{PlacementParameters, Strategy};
    pub use crate::sampling::grouping::{
        counts_per_group, flat_probabilities, DensityGroups, VoxelGroup, VoxelPmf,
    };
    pub use crate::sampling::proposal::VoxelProposal;
    pub use crate::sampling::{FixedRadius, RadiusDistribution};
}

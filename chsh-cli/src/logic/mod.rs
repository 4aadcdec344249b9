pub mod api;
pub mod reports;
pub mod seeds;
pub mod sweep;

pub use api::{BoundaryError, ChshApi};
pub use seeds::resolve_seed_inputs;
pub use sweep::{
    SweepAggregate, SweepRecord, SweepRequest, aggregate_sweep, run_sweep,
    validate_acceptance_targets,
};

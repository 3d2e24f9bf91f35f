//! Real-estate feasibility and agent allocation for regional land-use
//! microsimulation.
//!
//! One simulated year runs the components in order:
//!
//! 1. [`zoning`] resolves raw and net development capacity per parcel.
//! 2. [`proforma`] finds the most profitable intensity of each building form
//!    on each parcel under zoning and market rents.
//! 3. [`developer`] draws parcels by profit until new supply covers the
//!    vacancy-implied target and appends the new buildings.
//! 4. [`allocation`] places unplaced households and jobs into vacant units
//!    and job spaces, optionally weighted by a [`choice`] model.
//!
//! [`step::run_step`] wires them together over a [`step::RegionState`].

pub mod allocation;
pub mod choice;
pub mod config;
pub mod developer;
pub mod error;
pub mod invariant_checks;
pub mod params;
pub mod policy;
pub mod proforma;
pub mod sampling;
pub mod sim_rng;
pub mod step;
pub mod tables;
pub mod zoning;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use error::BausError;
pub use params::BausParams;
pub use sim_rng::{RngMode, SimRng};
pub use step::{run_step, RegionState, StepContext, StepModels, StepReport};

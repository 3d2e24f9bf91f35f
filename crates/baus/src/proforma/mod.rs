//! Pro-forma feasibility engine.
//!
//! For every parcel and candidate building form, searches a discretized FAR
//! range (plus the zoned cap itself) for the intensity that maximizes
//!
//! ```text
//! profit = rent * rentable_sqft - carrying_cost(stories) * gross_sqft * profit_factor
//!        + subsidy_per_unit * units
//! ```
//!
//! subject to the parcel's zoned FAR, height and density limits. Rents quoted
//! as sale prices are capitalized to yearly rents at the configured cap rate.
//! Inclusionary zoning discounts revenue on the affordable share of housing.
//!
//! Rows are ephemeral: recompute them each step feasibility is needed.

mod config;
mod engine;
mod forms;
mod rents;
mod types;

#[cfg(test)]
mod tests;

pub use config::{CostTier, ProFormaConfig};
pub use engine::{evaluate_feasibility, evaluate_parcel_form, zoned_max_far, ParcelDevelopment};
pub use forms::BuildingForm;
pub use rents::{RentQuote, RentSource, RentTable};
pub use types::{FeasibilityResult, FeasibilityTable};

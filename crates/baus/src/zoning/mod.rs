//! Capacity & zoning resolver.
//!
//! Translates parcel zoning into raw development capacity and, joined with
//! the building inventory, into net capacity:
//!
//! - **Raw**: `acres * max_dua` units, `acres * max_far * 43560` square feet,
//!   and the job spaces that floor space holds. Zero for disallowed uses and
//!   for `nodev` parcels.
//! - **Residual**: raw units minus existing units minus existing
//!   non-residential space expressed in units, clipped at zero.
//! - **Net variants**: residual on vacant parcels only, on under-built parcels
//!   (residual over existing units above the threshold), and on under-built
//!   parcels that are not protected.
//!
//! Records are derived state: recompute them whenever parcels or buildings
//! change.

mod capacity;
mod types;


pub use capacity::{net_capacity, raw_capacity, resolve_capacity, summarize_by_zone};
pub use types::{CapacityRecord, CapacitySummary, ExistingDevelopment, RawCapacity};

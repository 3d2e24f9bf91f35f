//! Agent-to-building allocation.
//!
//! Vacant capacity is expanded into slots, one per free unit or job space.
//! [`allocate`] pairs choosers with slots so that no slot is taken twice and,
//! when slots run short, which choosers go unplaced is uniformly random.
//! [`allocate_partitioned`] applies it zone by zone with per-segment weights
//! (uniform, or from a location choice model) and reports per-zone demand
//! against supply along with control-total misses. Unplaced agents keep a
//! `None` building.

mod engine;
mod partition;
mod slots;
mod types;
mod weighting;


pub use engine::allocate;
pub use partition::allocate_partitioned;
pub use slots::expand_slots;
pub use types::{AllocationReport, AllocationResult, ControlTotals, PartitionReport, Slot};
pub use weighting::{ChoiceWeights, SlotWeighting, UniformWeights};

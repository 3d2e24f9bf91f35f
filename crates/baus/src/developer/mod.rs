//! Development selection and building materialization.
//!
//! Each year the developer compares demand against the existing stock:
//! `target = max(agents / (1 - target_vacancy) - existing, 0)`. Parcels with a
//! profitable form are drawn without replacement in proportion to profit, and
//! the shortest prefix of the draw that covers the target is built. New
//! buildings get fresh ids after the inventory's maximum and a
//! `Lineage::Developer` tag. Parcels are never modified and existing buildings
//! are never removed.

mod materialize;
mod run;
mod selection;
mod types;


pub use materialize::materialize;
pub use run::run_developer;
pub use selection::{net_new, select_parcels, target_units};
pub use types::{DemandKind, DevelopmentOutcome};

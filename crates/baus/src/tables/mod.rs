//! Region tables: parcels, buildings, households and jobs.
//!
//! Each table owns its rows and an id index. Buildings are append-only and
//! agents are never removed; an unplaced agent carries `None` as its building
//! reference, written as `-1` on export.

mod agents;
mod buildings;
mod ids;
mod parcels;


pub use agents::{Agent, AgentKind, AgentTable, Household, Households, Job, Jobs};
pub use buildings::{
    area_per_employee_for, job_spaces_for_sqft, whole_count, AreaPerEmployee, Building,
    BuildingInventory, BuildingType, Lineage,
};
pub use ids::{building_ref, AgentId, BuildingId, ParcelId, ZoneId};
pub use parcels::{AllowedUses, Parcel, ParcelTable, Use, Zoning};

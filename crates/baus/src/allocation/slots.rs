use std::collections::HashMap;

use crate::error::BausError;
use crate::tables::{AgentKind, AreaPerEmployee, BuildingId, BuildingInventory, ParcelTable};

use super::types::Slot;

/// Vacant capacity as one row per free unit (households) or job space (jobs).
///
/// A building with five units and two resident households yields three
/// slots. Over-occupied buildings yield none.
pub fn expand_slots(
    kind: AgentKind,
    inventory: &BuildingInventory,
    parcels: &ParcelTable,
    occupancy: &HashMap<BuildingId, u32>,
    area: &AreaPerEmployee,
) -> Result<Vec<Slot>, BausError> {
    let mut slots = Vec::new();
    for b in inventory.iter() {
        let capacity = match kind {
            AgentKind::Household => b.residential_units,
            AgentKind::Job => b.job_spaces(area)?,
        };
        let vacant = capacity.saturating_sub(occupancy.get(&b.id).copied().unwrap_or(0));
        if vacant == 0 {
            continue;
        }
        let parcel = parcels.get(b.parcel_id).ok_or(BausError::UnknownParcel {
            building: b.id,
            parcel: b.parcel_id,
        })?;
        let slot = Slot {
            building_id: b.id,
            parcel_id: b.parcel_id,
            zone_id: parcel.zone_id,
        };
        slots.extend(std::iter::repeat(slot).take(vacant as usize));
    }
    Ok(slots)
}

use crate::params::BausParams;
use crate::policy::affordable_units;
use crate::proforma::FeasibilityResult;
use crate::tables::{Building, BuildingInventory, Lineage};

/// Building records for the selected rows.
///
/// Existing buildings stay standing, so each new record carries only the
/// increment over them: `residential_units - existing_units` units, and the
/// share of the row's non-residential space that holds its net-new job
/// spaces. A parcel therefore never ends up above the row's intensity.
///
/// Ids continue from the inventory's current maximum so they never collide
/// with existing rows; the inventory itself is not touched.
pub fn materialize(
    rows: &[&FeasibilityResult],
    inventory: &BuildingInventory,
    year: u32,
    params: &BausParams,
) -> Vec<Building> {
    let mut out = Vec::with_capacity(rows.len());
    for (offset, row) in rows.iter().enumerate() {
        let residential_units = row.net_units();
        let share = params.policy.inclusionary_share_for(row.zone_id);

        out.push(Building {
            id: inventory.next_id(offset as u64),
            parcel_id: row.parcel_id,
            building_type: row.form.building_type(),
            residential_units,
            deed_restricted_units: affordable_units(residential_units, share),
            non_residential_sqft: net_non_residential_sqft(row),
            year_built: year,
            residential_price: 0.0,
            non_residential_rent: 0.0,
            lineage: Lineage::Developer { year },
        });
    }
    out
}

/// Non-residential sqft scaled to the net-new job spaces.
///
/// `ceil(sqft * net / total / area) <= net` because `sqft / area <= total`,
/// so the building never yields more spaces than the row counted.
fn net_non_residential_sqft(row: &FeasibilityResult) -> f64 {
    if row.existing_job_spaces == 0 || row.job_spaces == 0 {
        return row.non_residential_sqft;
    }
    let net = row.net_job_spaces();
    row.non_residential_sqft * net as f64 / row.job_spaces as f64
}

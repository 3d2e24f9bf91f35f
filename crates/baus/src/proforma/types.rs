use serde::Serialize;

use crate::error::BausError;
use crate::tables::{ParcelId, ZoneId};

use super::forms::BuildingForm;

/// Best achievable development of one form on one parcel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityResult {
    pub parcel_id: ParcelId,
    pub zone_id: ZoneId,
    pub form: BuildingForm,
    /// Floor-area ratio at the profit optimum.
    pub far: f64,
    pub building_sqft: f64,
    pub residential_sqft: f64,
    pub non_residential_sqft: f64,
    pub residential_units: u32,
    pub job_spaces: u32,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub acres: f64,
    pub existing_units: u32,
    pub existing_job_spaces: u32,
    /// Forced to zero by historic protection.
    pub historic: bool,
}

impl FeasibilityResult {
    pub fn net_units(&self) -> u32 {
        self.residential_units.saturating_sub(self.existing_units)
    }

    pub fn net_job_spaces(&self) -> u32 {
        self.job_spaces.saturating_sub(self.existing_job_spaces)
    }
}

/// All (parcel, form) rows of one feasibility evaluation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeasibilityTable {
    pub rows: Vec<FeasibilityResult>,
}

impl FeasibilityTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The most profitable row per parcel among forms accepted by `keep`.
    ///
    /// Ties keep the form listed first. Output is ordered by parcel id.
    pub fn best_form_per_parcel<F>(&self, keep: F) -> Vec<FeasibilityResult>
    where
        F: Fn(BuildingForm) -> bool,
    {
        let mut best: std::collections::BTreeMap<ParcelId, &FeasibilityResult> =
            std::collections::BTreeMap::new();
        for row in self.rows.iter().filter(|r| keep(r.form)) {
            best.entry(row.parcel_id)
                .and_modify(|cur| {
                    if row.profit > cur.profit {
                        *cur = row;
                    }
                })
                .or_insert(row);
        }
        best.into_values().cloned().collect()
    }

    /// Rows for parcels not in `parcels`.
    pub fn without_parcels(&self, parcels: &[ParcelId]) -> FeasibilityTable {
        let drop: std::collections::HashSet<ParcelId> = parcels.iter().copied().collect();
        FeasibilityTable {
            rows: self
                .rows
                .iter()
                .filter(|r| !drop.contains(&r.parcel_id))
                .cloned()
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, BausError> {
        Ok(serde_json::to_string(self)?)
    }
}

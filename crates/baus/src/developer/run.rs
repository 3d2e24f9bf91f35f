use rand::Rng;
use tracing::info;

use crate::error::BausError;
use crate::params::BausParams;
use crate::proforma::{FeasibilityResult, FeasibilityTable};
use crate::tables::BuildingInventory;

use super::materialize::materialize;
use super::selection::{net_new, select_parcels, target_units};
use super::types::{DemandKind, DevelopmentOutcome};

/// Run the developer for one kind of space and append what it builds.
///
/// `agents` is the number of households (or jobs) the region must house. The
/// feasibility table is reduced to the best form of the matching kind per
/// parcel, and only rows with positive profit and positive net-new space
/// compete. No target or no candidates leaves the inventory unchanged.
pub fn run_developer<R: Rng + ?Sized>(
    kind: DemandKind,
    feasibility: &FeasibilityTable,
    inventory: &mut BuildingInventory,
    agents: u64,
    year: u32,
    params: &BausParams,
    rng: &mut R,
) -> Result<DevelopmentOutcome, BausError> {
    let (existing, vacancy) = match kind {
        DemandKind::Residential => (
            inventory.total_residential_units(),
            params.developer.residential_target_vacancy,
        ),
        DemandKind::NonResidential => (
            inventory.total_job_spaces(&params.area_per_employee)?,
            params.developer.non_residential_target_vacancy,
        ),
    };
    let target = target_units(agents, existing, vacancy);
    if target == 0 {
        info!(
            "developer: no {} demand in {year} ({agents} agents, {existing} existing)",
            kind.label()
        );
        return Ok(DevelopmentOutcome::empty(kind, year, 0));
    }

    let wants_housing = kind == DemandKind::Residential;
    let candidates: Vec<FeasibilityResult> = feasibility
        .best_form_per_parcel(|form| form.is_residential() == wants_housing)
        .into_iter()
        .filter(|r| r.profit > 0.0 && net_new(r, kind) > 0)
        .collect();

    let mut outcome = DevelopmentOutcome::empty(kind, year, target);
    outcome.candidates = candidates.len();
    if candidates.is_empty() {
        info!(
            "developer: {} target {target} in {year} but no feasible parcels",
            kind.label()
        );
        return Ok(outcome);
    }

    let selected: Vec<&FeasibilityResult> = select_parcels(&candidates, kind, target, rng)
        .into_iter()
        .map(|i| &candidates[i])
        .collect();
    let buildings = materialize(&selected, inventory, year, params);

    outcome.selected_parcels = selected.iter().map(|r| r.parcel_id).collect();
    outcome.net_added = selected.iter().map(|r| net_new(r, kind)).sum();
    for b in &buildings {
        outcome.new_buildings.push(b.id);
        outcome.residential_units_added += b.residential_units as u64;
        outcome.job_spaces_added += b.job_spaces(&params.area_per_employee)? as u64;
        outcome.deed_restricted_units_added += b.deed_restricted_units as u64;
    }
    inventory.append(buildings)?;

    info!(
        "developer: {} {year}: target {target}, {} of {} parcels built, {} net new",
        kind.label(),
        outcome.selected_parcels.len(),
        outcome.candidates,
        outcome.net_added
    );
    Ok(outcome)
}

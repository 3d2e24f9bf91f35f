use tracing::{debug, info};

use crate::config::{SQFT_PER_ACRE, UNKNOWN_YEAR_BUILT};
use crate::error::BausError;
use crate::params::BausParams;
use crate::policy::residential_revenue_factor;
use crate::tables::{
    job_spaces_for_sqft, whole_count, Building, BuildingInventory, Parcel, ParcelTable, Use,
};

use super::forms::BuildingForm;
use super::rents::RentSource;
use super::types::{FeasibilityResult, FeasibilityTable};

// =============================================================================
// Zoned intensity
// =============================================================================

/// Highest FAR zoning allows for `form` on `parcel`, or `None` when no
/// limit applies to the form's uses.
///
/// Every present limit binds: `max_far`, the height limit expressed as FAR
/// through story height and coverage, and for forms with housing the density
/// limit expressed as FAR through the assumed unit size.
pub fn zoned_max_far(parcel: &Parcel, form: BuildingForm, params: &BausParams) -> Option<f64> {
    let zoning = &parcel.zoning;
    let config = &params.proforma;
    let mut caps: Vec<f64> = Vec::with_capacity(3);

    if let Some(far) = zoning.max_far {
        caps.push(far);
    }
    if let Some(height) = zoning.max_height {
        let stories = (height / config.story_height_ft).floor();
        caps.push(stories * config.parcel_coverage);
    }
    let res_share = form.residential_share();
    if res_share > 0.0 {
        if let Some(dua) = zoning.max_dua {
            let res_far = dua * params.developer.sqft_per_unit / SQFT_PER_ACRE;
            caps.push(res_far / res_share);
        }
    }

    caps.into_iter().reduce(f64::min)
}

// =============================================================================
// Single parcel / form evaluation
// =============================================================================

/// Per-parcel facts the evaluation needs from the building inventory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParcelDevelopment {
    pub existing_units: u32,
    pub existing_job_spaces: u32,
    pub oldest_year_built: Option<u32>,
}

impl ParcelDevelopment {
    pub fn from_buildings(buildings: &[&Building], params: &BausParams) -> Result<Self, BausError> {
        let mut out = Self::default();
        for b in buildings {
            out.existing_units += b.residential_units;
            out.existing_job_spaces += b.job_spaces(&params.area_per_employee)?;
            if b.year_built != UNKNOWN_YEAR_BUILT {
                out.oldest_year_built = Some(
                    out.oldest_year_built
                        .map_or(b.year_built, |y| y.min(b.year_built)),
                );
            }
        }
        Ok(out)
    }
}

struct Evaluation {
    far: f64,
    building_sqft: f64,
    residential_sqft: f64,
    non_residential_sqft: f64,
    residential_units: u32,
    job_spaces: u32,
    revenue: f64,
    cost: f64,
    profit: f64,
}

fn evaluate_far(
    parcel: &Parcel,
    form: BuildingForm,
    rents: &[(Use, f64, f64)],
    far: f64,
    params: &BausParams,
) -> Result<Option<Evaluation>, BausError> {
    let config = &params.proforma;
    let building_sqft = far * parcel.sqft();
    let stories = whole_count(far, config.parcel_coverage).max(1);

    let share = params.policy.inclusionary_share_for(parcel.zone_id);
    let res_factor = residential_revenue_factor(share, params.policy.affordable_rent_discount);

    let mut revenue = 0.0;
    let mut cost_per_sqft = 0.0;
    let mut residential_sqft = 0.0;
    let mut non_residential_sqft = 0.0;

    for &(use_, mix, rent) in rents {
        let sqft = building_sqft * mix;
        let factor = if use_.is_residential() { res_factor } else { 1.0 };
        revenue += sqft * config.building_efficiency * rent * factor;

        let Some(tier_cost) = config.cost_per_sqft(use_, stories) else {
            return Ok(None);
        };
        cost_per_sqft += mix * tier_cost;

        if use_.is_residential() {
            residential_sqft += sqft;
        } else {
            non_residential_sqft += sqft;
        }
    }

    // Counted the way the materialized building will count them.
    let job_spaces = job_spaces_for_sqft(
        &params.area_per_employee,
        form.building_type(),
        non_residential_sqft,
    )?;

    let residential_units = whole_count(residential_sqft, params.developer.sqft_per_unit);

    let cost = building_sqft * cost_per_sqft * config.profit_factor;
    let profit = revenue - cost + params.policy.subsidy_for(parcel.zone_id, residential_units);

    Ok(Some(Evaluation {
        far,
        building_sqft,
        residential_sqft,
        non_residential_sqft,
        residential_units,
        job_spaces,
        revenue,
        cost,
        profit,
    }))
}

/// Evaluate one form on one parcel.
///
/// Returns `None` when the form is not permitted, zoning gives it no
/// intensity, a rent is missing for one of its uses, or (with `only_built`)
/// the best profit is not positive. Historic parcels yield a zero row. A
/// negative or non-finite rent is an error.
pub fn evaluate_parcel_form(
    parcel: &Parcel,
    development: &ParcelDevelopment,
    form: BuildingForm,
    rents: &dyn RentSource,
    params: &BausParams,
) -> Result<Option<FeasibilityResult>, BausError> {
    let config = &params.proforma;

    if form.use_mix().iter().any(|(u, _)| !parcel.zoning.permits(*u)) {
        return Ok(None);
    }
    let cap = match zoned_max_far(parcel, form, params) {
        Some(cap) if cap > 0.0 => cap,
        _ => return Ok(None),
    };

    let mut quoted = Vec::with_capacity(form.use_mix().len());
    for &(use_, mix) in form.use_mix() {
        match rents.quote(parcel, use_) {
            Some(q) => {
                let rent = q.yearly_rent(params.cap_rate);
                if !rent.is_finite() || rent < 0.0 {
                    return Err(BausError::InvalidRent {
                        parcel: parcel.id,
                        use_,
                        value: rent,
                    });
                }
                quoted.push((use_, mix, rent));
            }
            None => {
                debug!(
                    "proforma: no {:?} rent for parcel {}, skipping {:?}",
                    use_, parcel.id, form
                );
                return Ok(None);
            }
        }
    }

    let mut row = FeasibilityResult {
        parcel_id: parcel.id,
        zone_id: parcel.zone_id,
        form,
        far: 0.0,
        building_sqft: 0.0,
        residential_sqft: 0.0,
        non_residential_sqft: 0.0,
        residential_units: 0,
        job_spaces: 0,
        revenue: 0.0,
        cost: 0.0,
        profit: 0.0,
        acres: parcel.acres,
        existing_units: development.existing_units,
        existing_job_spaces: development.existing_job_spaces,
        historic: false,
    };

    if development
        .oldest_year_built
        .is_some_and(|y| y < config.historic_cutoff_year)
    {
        row.historic = true;
        return Ok(if config.only_built { None } else { Some(row) });
    }

    let candidates = config
        .far_grid
        .iter()
        .copied()
        .filter(|&f| f < cap)
        .chain(std::iter::once(cap));

    let mut best: Option<Evaluation> = None;
    for far in candidates {
        if let Some(eval) = evaluate_far(parcel, form, &quoted, far, params)? {
            if best.as_ref().map_or(true, |b| eval.profit > b.profit) {
                best = Some(eval);
            }
        }
    }

    let Some(best) = best else {
        return Ok(None);
    };
    if config.only_built && (!best.profit.is_finite() || best.profit <= 0.0) {
        return Ok(None);
    }

    row.far = best.far;
    row.building_sqft = best.building_sqft;
    row.residential_sqft = best.residential_sqft;
    row.non_residential_sqft = best.non_residential_sqft;
    row.residential_units = best.residential_units;
    row.job_spaces = best.job_spaces;
    row.revenue = best.revenue;
    row.cost = best.cost;
    row.profit = best.profit;
    Ok(Some(row))
}

// =============================================================================
// Region evaluation
// =============================================================================

/// Evaluate every form on every parcel of the region.
///
/// Parcels outside the configured size range produce no rows. Forms are
/// evaluated independently; choosing between them happens in the developer.
pub fn evaluate_feasibility(
    parcels: &ParcelTable,
    inventory: &BuildingInventory,
    rents: &dyn RentSource,
    forms: &[BuildingForm],
    params: &BausParams,
) -> Result<FeasibilityTable, BausError> {
    let config = &params.proforma;
    let by_parcel = inventory.by_parcel();
    let mut table = FeasibilityTable::default();
    let mut size_excluded = 0usize;

    for parcel in parcels.iter() {
        let sqft = parcel.sqft();
        if sqft < config.min_parcel_sqft || config.max_parcel_sqft.is_some_and(|max| sqft > max) {
            size_excluded += 1;
            continue;
        }

        let buildings = by_parcel
            .get(&parcel.id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let development = ParcelDevelopment::from_buildings(buildings, params)?;

        for &form in forms {
            if let Some(row) = evaluate_parcel_form(parcel, &development, form, rents, params)? {
                table.rows.push(row);
            }
        }
    }

    info!(
        "proforma: {} feasible rows over {} parcels ({} outside size range)",
        table.len(),
        parcels.len(),
        size_excluded
    );
    Ok(table)
}

//! One simulated year.
//!
//! [`run_step`] is the only place the components meet. It resolves capacity,
//! evaluates feasibility, runs the residential then the non-residential
//! developer, and places unplaced households and jobs into vacant slots. All
//! state it touches is passed in: the region tables by mutable reference, and
//! parameters, year and random stream through a [`StepContext`].

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::allocation::{
    allocate_partitioned, expand_slots, AllocationReport, ChoiceWeights, ControlTotals,
    SlotWeighting, UniformWeights,
};
use crate::choice::{LocationChoiceModel, Segmentation};
use crate::developer::{run_developer, DemandKind, DevelopmentOutcome};
use crate::error::BausError;
use crate::invariant_checks::{check_region, InvariantViolations};
use crate::params::BausParams;
use crate::proforma::{evaluate_feasibility, BuildingForm, RentSource};
use crate::sim_rng::SimRng;
use crate::tables::{
    Agent, AgentKind, AgentTable, BuildingInventory, Households, Jobs, ParcelTable, ZoneId,
};
use crate::zoning::{resolve_capacity, summarize_by_zone, CapacitySummary};

// =============================================================================
// Region state
// =============================================================================

/// The tables one region is simulated on.
#[derive(Debug, Clone, Default)]
pub struct RegionState {
    pub parcels: ParcelTable,
    pub buildings: BuildingInventory,
    pub households: Households,
    pub jobs: Jobs,
}

impl RegionState {
    /// Assemble a region, rejecting buildings on parcels that do not exist.
    pub fn new(
        parcels: ParcelTable,
        buildings: BuildingInventory,
        households: Households,
        jobs: Jobs,
    ) -> Result<Self, BausError> {
        if let Some(orphan) = buildings.iter().find(|b| !parcels.contains(b.parcel_id)) {
            return Err(BausError::UnknownParcel {
                building: orphan.id,
                parcel: orphan.parcel_id,
            });
        }
        Ok(Self {
            parcels,
            buildings,
            households,
            jobs,
        })
    }
}

// =============================================================================
// Context
// =============================================================================

/// Parameters, year and random stream of a run.
#[derive(Debug, Clone)]
pub struct StepContext {
    pub params: BausParams,
    pub rng: SimRng,
    /// Year the next call to [`run_step`] simulates.
    pub year: u32,
}

impl StepContext {
    /// Validate `params` and seed the random stream from its `rng_mode`.
    pub fn new(params: BausParams, year: u32) -> Result<Self, BausError> {
        params.validate()?;
        let rng = SimRng::from_mode(params.rng_mode);
        Ok(Self { params, rng, year })
    }
}

/// Optional models and controls for a step. The default runs with uniform
/// slot weights, all building forms and no control totals.
#[derive(Default)]
pub struct StepModels<'a> {
    pub household_choice: Option<&'a LocationChoiceModel>,
    pub job_choice: Option<&'a LocationChoiceModel>,
    pub household_controls: Option<&'a ControlTotals>,
    pub job_controls: Option<&'a ControlTotals>,
    /// Forms the pro forma evaluates; empty means all of them.
    pub forms: Vec<BuildingForm>,
}

/// Everything a step did, for export by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub year: u32,
    pub capacity: BTreeMap<ZoneId, CapacitySummary>,
    pub feasible_rows: usize,
    pub residential: DevelopmentOutcome,
    pub non_residential: DevelopmentOutcome,
    pub households: AllocationReport,
    pub jobs: AllocationReport,
    pub violations: InvariantViolations,
}

// =============================================================================
// Step
// =============================================================================

fn check_chooser(model: Option<&LocationChoiceModel>, kind: AgentKind) -> Result<(), BausError> {
    match model {
        Some(m) if m.spec().chooser != kind => Err(BausError::Config(format!(
            "choice model {} chooses {:?}, used for {:?}",
            m.name(),
            m.spec().chooser,
            kind
        ))),
        _ => Ok(()),
    }
}

#[allow(clippy::too_many_arguments)]
fn place_agents<A: Agent>(
    kind: AgentKind,
    agents: &mut AgentTable<A>,
    parcels: &ParcelTable,
    buildings: &BuildingInventory,
    model: Option<&LocationChoiceModel>,
    controls: Option<&ControlTotals>,
    params: &BausParams,
    rng: &mut SimRng,
) -> Result<AllocationReport, BausError> {
    let slots = expand_slots(
        kind,
        buildings,
        parcels,
        &agents.occupancy(),
        &params.area_per_employee,
    )?;

    match model {
        Some(model) => {
            let weighting = ChoiceWeights {
                model,
                inventory: buildings,
                parcels,
            };
            allocate_partitioned(
                agents,
                &slots,
                &weighting as &dyn SlotWeighting,
                model.spec().segmentation,
                controls,
                &mut rng.0,
            )
        }
        None => allocate_partitioned(
            agents,
            &slots,
            &UniformWeights,
            Segmentation::None,
            controls,
            &mut rng.0,
        ),
    }
}

/// Simulate `ctx.year` on `state`, then advance `ctx.year`.
///
/// Configuration errors abort the step; the tables may then hold the
/// buildings appended before the failure.
pub fn run_step(
    ctx: &mut StepContext,
    state: &mut RegionState,
    rents: &dyn RentSource,
    models: &StepModels<'_>,
) -> Result<StepReport, BausError> {
    let year = ctx.year;
    let params = &ctx.params;
    check_chooser(models.household_choice, AgentKind::Household)?;
    check_chooser(models.job_choice, AgentKind::Job)?;

    let records = resolve_capacity(&state.parcels, &state.buildings, params)?;
    let capacity = summarize_by_zone(&records);

    let forms: &[BuildingForm] = if models.forms.is_empty() {
        &BuildingForm::ALL
    } else {
        &models.forms
    };
    let feasibility = evaluate_feasibility(&state.parcels, &state.buildings, rents, forms, params)?;

    let residential = run_developer(
        DemandKind::Residential,
        &feasibility,
        &mut state.buildings,
        state.households.len() as u64,
        year,
        params,
        &mut ctx.rng.0,
    )?;
    let remaining = feasibility.without_parcels(&residential.selected_parcels);
    let non_residential = run_developer(
        DemandKind::NonResidential,
        &remaining,
        &mut state.buildings,
        state.jobs.len() as u64,
        year,
        params,
        &mut ctx.rng.0,
    )?;

    let households = place_agents(
        AgentKind::Household,
        &mut state.households,
        &state.parcels,
        &state.buildings,
        models.household_choice,
        models.household_controls,
        params,
        &mut ctx.rng,
    )?;
    let jobs = place_agents(
        AgentKind::Job,
        &mut state.jobs,
        &state.parcels,
        &state.buildings,
        models.job_choice,
        models.job_controls,
        params,
        &mut ctx.rng,
    )?;

    let after = resolve_capacity(&state.parcels, &state.buildings, params)?;
    let violations = check_region(state, &after, params)?;

    info!(
        "step {year}: +{} units, +{} job spaces, {} households and {} jobs unplaced",
        residential.residential_units_added + non_residential.residential_units_added,
        residential.job_spaces_added + non_residential.job_spaces_added,
        households.unplaced(),
        jobs.unplaced()
    );

    ctx.year += 1;
    Ok(StepReport {
        year,
        capacity,
        feasible_rows: feasibility.len(),
        residential,
        non_residential,
        households,
        jobs,
        violations,
    })
}

//! Simulation parameters.
//!
//! Every tunable constant of the capacity, feasibility, development and
//! allocation components lives in [`BausParams`] so that a planning scenario
//! can be reproduced from one JSON document. Parameters are validated once
//! when a step is configured; components assume a validated set.

use std::collections::BTreeMap;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::error::BausError;
use crate::policy::PolicyParams;
use crate::proforma::ProFormaConfig;
use crate::sim_rng::RngMode;
use crate::tables::{AreaPerEmployee, BuildingType};

// ---------------------------------------------------------------------------
// Developer parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct DeveloperParams {
    /// Target vacancy rate for residential units.
    pub residential_target_vacancy: f64,
    /// Target vacancy rate for job spaces.
    pub non_residential_target_vacancy: f64,
    /// Assumed size of a new residential unit in square feet.
    pub sqft_per_unit: f64,
}

impl Default for DeveloperParams {
    fn default() -> Self {
        Self {
            residential_target_vacancy: 0.05,
            non_residential_target_vacancy: 0.10,
            sqft_per_unit: 1000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Capacity parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct CapacityParams {
    /// Gross average unit size used to express non-residential space in units.
    pub sqft_per_unit: f64,
    /// Residual-to-existing ratio above which a parcel counts as under-built.
    pub underbuilt_threshold: f64,
    /// Parcels with a building older than this year are protected.
    pub protection_cutoff_year: u32,
    /// Single-family parcels smaller than this are protected.
    pub small_single_family_acres: f64,
    /// Parcels smaller than this are protected.
    pub min_parcel_sqft: f64,
}

impl Default for CapacityParams {
    fn default() -> Self {
        Self {
            sqft_per_unit: 1000.0,
            underbuilt_threshold: 0.5,
            protection_cutoff_year: 1940,
            small_single_family_acres: 0.5,
            min_parcel_sqft: 2000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// BausParams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct BausParams {
    pub developer: DeveloperParams,
    pub capacity: CapacityParams,
    pub proforma: ProFormaConfig,
    pub policy: PolicyParams,
    /// Square feet per job by building type.
    pub area_per_employee: AreaPerEmployee,
    /// Capitalization rate converting sale prices to yearly rents.
    pub cap_rate: f64,
    pub rng_mode: RngMode,
}

pub fn default_area_per_employee() -> AreaPerEmployee {
    BTreeMap::from([
        (BuildingType::SingleFamily, 400.0),
        (BuildingType::Townhome, 400.0),
        (BuildingType::MultiFamily, 400.0),
        (BuildingType::Office, 355.0),
        (BuildingType::Retail, 445.0),
        (BuildingType::Industrial, 661.0),
        (BuildingType::MixedResidential, 383.0),
        (BuildingType::MixedOffice, 383.0),
        (BuildingType::Vacant, 400.0),
    ])
}

impl Default for BausParams {
    fn default() -> Self {
        Self {
            developer: DeveloperParams::default(),
            capacity: CapacityParams::default(),
            proforma: ProFormaConfig::default(),
            policy: PolicyParams::default(),
            area_per_employee: default_area_per_employee(),
            cap_rate: 0.05,
            rng_mode: RngMode::default(),
        }
    }
}

fn check(name: &'static str, value: f64, ok: bool) -> Result<(), BausError> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(BausError::InvalidParameter { name, value })
    }
}

impl BausParams {
    pub fn from_json(json: &str) -> Result<Self, BausError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> Result<String, BausError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BausError> {
        Ok(bitcode::decode(bytes)?)
    }

    /// Reject values no scenario can mean; a failure aborts the step.
    pub fn validate(&self) -> Result<(), BausError> {
        let d = &self.developer;
        check(
            "developer.residential_target_vacancy",
            d.residential_target_vacancy,
            (0.0..1.0).contains(&d.residential_target_vacancy),
        )?;
        check(
            "developer.non_residential_target_vacancy",
            d.non_residential_target_vacancy,
            (0.0..1.0).contains(&d.non_residential_target_vacancy),
        )?;
        check("developer.sqft_per_unit", d.sqft_per_unit, d.sqft_per_unit > 0.0)?;

        let c = &self.capacity;
        check("capacity.sqft_per_unit", c.sqft_per_unit, c.sqft_per_unit > 0.0)?;
        check(
            "capacity.underbuilt_threshold",
            c.underbuilt_threshold,
            c.underbuilt_threshold >= 0.0,
        )?;
        check(
            "capacity.small_single_family_acres",
            c.small_single_family_acres,
            c.small_single_family_acres >= 0.0,
        )?;
        check(
            "capacity.min_parcel_sqft",
            c.min_parcel_sqft,
            c.min_parcel_sqft >= 0.0,
        )?;

        check("cap_rate", self.cap_rate, self.cap_rate > 0.0)?;

        for (&building_type, &value) in &self.area_per_employee {
            if !value.is_finite() || value <= 0.0 {
                return Err(BausError::InvalidAreaPerEmployee {
                    building_type,
                    value,
                });
            }
        }

        self.proforma.validate()?;
        self.policy.validate()?;
        Ok(())
    }
}

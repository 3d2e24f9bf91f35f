use std::collections::{BTreeMap, HashMap};

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::error::BausError;

use super::ids::{BuildingId, ParcelId};
use super::parcels::Use;

// =============================================================================
// Building type
// =============================================================================

/// Building type codes as carried by the regional building table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub enum BuildingType {
    SingleFamily,
    Townhome,
    MultiFamily,
    Office,
    Retail,
    Industrial,
    MixedResidential,
    MixedOffice,
    Vacant,
}

impl BuildingType {
    pub const ALL: [BuildingType; 9] = [
        BuildingType::SingleFamily,
        BuildingType::Townhome,
        BuildingType::MultiFamily,
        BuildingType::Office,
        BuildingType::Retail,
        BuildingType::Industrial,
        BuildingType::MixedResidential,
        BuildingType::MixedOffice,
        BuildingType::Vacant,
    ];

    pub fn code(self) -> &'static str {
        match self {
            BuildingType::SingleFamily => "HS",
            BuildingType::Townhome => "HT",
            BuildingType::MultiFamily => "HM",
            BuildingType::Office => "OF",
            BuildingType::Retail => "RS",
            BuildingType::Industrial => "IL",
            BuildingType::MixedResidential => "MR",
            BuildingType::MixedOffice => "ME",
            BuildingType::Vacant => "VA",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, BausError> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| BausError::UnknownBuildingType(code.to_string()))
    }

    pub fn is_residential(self) -> bool {
        matches!(
            self,
            BuildingType::SingleFamily
                | BuildingType::Townhome
                | BuildingType::MultiFamily
                | BuildingType::MixedResidential
        )
    }

    pub fn is_vacant(self) -> bool {
        self == BuildingType::Vacant
    }

    /// Building type that hosts the jobs of a non-residential use.
    pub fn for_use(use_: Use) -> Self {
        match use_ {
            Use::Residential => BuildingType::MultiFamily,
            Use::Office => BuildingType::Office,
            Use::Retail => BuildingType::Retail,
            Use::Industrial => BuildingType::Industrial,
        }
    }
}

/// Square feet of non-residential space per job, by building type.
pub type AreaPerEmployee = BTreeMap<BuildingType, f64>;

/// Look up area per employee, failing on missing or non-positive entries.
pub fn area_per_employee_for(
    table: &AreaPerEmployee,
    building_type: BuildingType,
) -> Result<f64, BausError> {
    let area = table
        .get(&building_type)
        .copied()
        .ok_or(BausError::MissingAreaPerEmployee(building_type))?;
    if !area.is_finite() || area <= 0.0 {
        return Err(BausError::InvalidAreaPerEmployee {
            building_type,
            value: area,
        });
    }
    Ok(area)
}

/// `ceil(amount / per)`, ignoring floating-point noise just above a whole count.
pub fn whole_count(amount: f64, per: f64) -> u32 {
    if amount <= 0.0 || per <= 0.0 {
        return 0;
    }
    let x = amount / per;
    let nearest = x.round();
    if (x - nearest).abs() < 1e-9 * nearest.max(1.0) {
        nearest as u32
    } else {
        x.ceil() as u32
    }
}

/// Job spaces provided by `sqft` of non-residential space.
pub fn job_spaces_for_sqft(
    table: &AreaPerEmployee,
    building_type: BuildingType,
    sqft: f64,
) -> Result<u32, BausError> {
    if sqft <= 0.0 {
        return Ok(0);
    }
    let area = area_per_employee_for(table, building_type)?;
    Ok(whole_count(sqft, area))
}

// =============================================================================
// Building
// =============================================================================

/// Where a building record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum Lineage {
    BaseYear,
    Developer { year: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Building {
    pub id: BuildingId,
    pub parcel_id: ParcelId,
    pub building_type: BuildingType,
    pub residential_units: u32,
    /// Units reserved as affordable under inclusionary zoning.
    pub deed_restricted_units: u32,
    pub non_residential_sqft: f64,
    pub year_built: u32,
    /// Sale price per residential unit.
    pub residential_price: f64,
    /// Yearly rent per non-residential square foot.
    pub non_residential_rent: f64,
    pub lineage: Lineage,
}

impl Building {
    pub fn job_spaces(&self, area: &AreaPerEmployee) -> Result<u32, BausError> {
        job_spaces_for_sqft(area, self.building_type, self.non_residential_sqft)
    }

    /// True when every structural and value field is zero.
    pub fn is_empty_shell(&self) -> bool {
        self.residential_units == 0
            && self.non_residential_sqft <= 0.0
            && self.residential_price <= 0.0
            && self.non_residential_rent <= 0.0
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// Append-only building inventory.
#[derive(Debug, Clone, Default)]
pub struct BuildingInventory {
    buildings: Vec<Building>,
    index: HashMap<BuildingId, usize>,
}

impl BuildingInventory {
    pub fn new(buildings: Vec<Building>) -> Result<Self, BausError> {
        let mut inventory = Self::default();
        inventory.append(buildings)?;
        Ok(inventory)
    }

    /// Append rows; any id already present is rejected and nothing is added.
    pub fn append(&mut self, buildings: Vec<Building>) -> Result<(), BausError> {
        let mut seen = std::collections::HashSet::with_capacity(buildings.len());
        for b in &buildings {
            if self.index.contains_key(&b.id) || !seen.insert(b.id) {
                return Err(BausError::DuplicateId {
                    table: "buildings",
                    id: b.id.0,
                });
            }
        }
        for b in buildings {
            self.index.insert(b.id, self.buildings.len());
            self.buildings.push(b);
        }
        Ok(())
    }

    pub fn get(&self, id: BuildingId) -> Option<&Building> {
        self.index.get(&id).map(|&i| &self.buildings[i])
    }

    pub fn get_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.index.get(&id).map(|&i| &mut self.buildings[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Building> {
        self.buildings.iter()
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    pub fn max_id(&self) -> Option<BuildingId> {
        self.buildings.iter().map(|b| b.id).max()
    }

    /// Id for the `offset`-th building of a new batch: `max_id + 1 + offset`.
    pub fn next_id(&self, offset: u64) -> BuildingId {
        let base = self.max_id().map(|id| id.0 + 1).unwrap_or(0);
        BuildingId(base + offset)
    }

    /// Buildings grouped by owning parcel.
    pub fn by_parcel(&self) -> HashMap<ParcelId, Vec<&Building>> {
        let mut map: HashMap<ParcelId, Vec<&Building>> = HashMap::new();
        for b in &self.buildings {
            map.entry(b.parcel_id).or_default().push(b);
        }
        map
    }

    pub fn total_residential_units(&self) -> u64 {
        self.buildings
            .iter()
            .map(|b| b.residential_units as u64)
            .sum()
    }

    pub fn total_job_spaces(&self, area: &AreaPerEmployee) -> Result<u64, BausError> {
        let mut total = 0u64;
        for b in &self.buildings {
            total += b.job_spaces(area)? as u64;
        }
        Ok(total)
    }
}

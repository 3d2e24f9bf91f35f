use std::collections::HashMap;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::SQFT_PER_ACRE;
use crate::error::BausError;

use super::ids::{ParcelId, ZoneId};

// =============================================================================
// Development uses
// =============================================================================

/// A development use a parcel may be zoned for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub enum Use {
    Residential,
    Office,
    Retail,
    Industrial,
}

impl Use {
    pub const ALL: [Use; 4] = [Use::Residential, Use::Office, Use::Retail, Use::Industrial];

    pub fn is_residential(self) -> bool {
        self == Use::Residential
    }
}

/// Per-use permission flags from the zoning lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct AllowedUses {
    pub residential: bool,
    pub office: bool,
    pub retail: bool,
    pub industrial: bool,
}

impl AllowedUses {
    pub const NONE: AllowedUses = AllowedUses {
        residential: false,
        office: false,
        retail: false,
        industrial: false,
    };

    pub const ALL: AllowedUses = AllowedUses {
        residential: true,
        office: true,
        retail: true,
        industrial: true,
    };

    pub fn residential_only() -> Self {
        Self {
            residential: true,
            ..Self::NONE
        }
    }

    pub fn allows(self, use_: Use) -> bool {
        match use_ {
            Use::Residential => self.residential,
            Use::Office => self.office,
            Use::Retail => self.retail,
            Use::Industrial => self.industrial,
        }
    }

    /// Whether any job-bearing use is permitted.
    pub fn allows_non_residential(self) -> bool {
        self.office || self.retail || self.industrial
    }

    /// First permitted non-residential use, in office, retail, industrial order.
    pub fn primary_non_residential(self) -> Option<Use> {
        [Use::Office, Use::Retail, Use::Industrial]
            .into_iter()
            .find(|u| self.allows(*u))
    }
}

// =============================================================================
// Zoning
// =============================================================================

/// Zoning attributes attached to a parcel.
///
/// A missing limit means the parcel carries no capacity of that kind; it is
/// never read as "unlimited".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct Zoning {
    /// Maximum dwelling units per acre.
    pub max_dua: Option<f64>,
    /// Maximum floor-area ratio for non-residential and mixed building.
    pub max_far: Option<f64>,
    /// Maximum building height in feet.
    pub max_height: Option<f64>,
    pub allowed: AllowedUses,
    /// No-development flag; zeroes every capacity.
    pub nodev: bool,
}

impl Zoning {
    pub fn validate(&self, parcel: ParcelId) -> Result<(), BausError> {
        for (name, limit) in [
            ("max_dua", self.max_dua),
            ("max_far", self.max_far),
            ("max_height", self.max_height),
        ] {
            if let Some(v) = limit {
                if !v.is_finite() || v < 0.0 {
                    return Err(BausError::InvalidZoning {
                        parcel,
                        reason: format!("{name} is {v}"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Whether new development of `use_` is allowed at all.
    pub fn permits(&self, use_: Use) -> bool {
        !self.nodev && self.allowed.allows(use_)
    }
}

// =============================================================================
// Parcel
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Parcel {
    pub id: ParcelId,
    pub acres: f64,
    pub zone_id: ZoneId,
    pub zoning: Zoning,
}

impl Parcel {
    pub fn sqft(&self) -> f64 {
        self.acres * SQFT_PER_ACRE
    }
}

/// Parcel table indexed by id.
#[derive(Debug, Clone, Default)]
pub struct ParcelTable {
    parcels: Vec<Parcel>,
    index: HashMap<ParcelId, usize>,
}

impl ParcelTable {
    /// Build the table, validating zoning and acreage on every row.
    pub fn new(parcels: Vec<Parcel>) -> Result<Self, BausError> {
        let mut index = HashMap::with_capacity(parcels.len());
        for (i, parcel) in parcels.iter().enumerate() {
            if index.insert(parcel.id, i).is_some() {
                return Err(BausError::DuplicateId {
                    table: "parcels",
                    id: parcel.id.0,
                });
            }
            if !parcel.acres.is_finite() || parcel.acres < 0.0 {
                return Err(BausError::InvalidZoning {
                    parcel: parcel.id,
                    reason: format!("acres is {}", parcel.acres),
                });
            }
            parcel.zoning.validate(parcel.id)?;
        }
        Ok(Self { parcels, index })
    }

    pub fn get(&self, id: ParcelId) -> Option<&Parcel> {
        self.index.get(&id).map(|&i| &self.parcels[i])
    }

    pub fn contains(&self, id: ParcelId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parcel> {
        self.parcels.iter()
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }
}

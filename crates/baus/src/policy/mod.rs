//! Development policy levers.
//!
//! - **Inclusionary housing**: a per-zone share of every new residential
//!   building is deed-restricted as affordable. Affordable units earn a
//!   discounted rent, which the pro forma charges against residential revenue.
//! - **Development subsidies**: a per-zone yearly subsidy per new residential
//!   unit, added to pro-forma profit.
//!
//! Zones without an entry fall back to the regional default share and to no
//! subsidy.

mod helpers;


use std::collections::BTreeMap;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::error::BausError;
use crate::tables::ZoneId;

pub use helpers::{affordable_units, residential_revenue_factor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct PolicyParams {
    /// Affordable share of new residential units, by zone.
    pub inclusionary_share: BTreeMap<ZoneId, f64>,
    /// Share applied in zones without an explicit entry.
    pub default_inclusionary_share: f64,
    /// Fraction of market rent forgone on an affordable unit.
    pub affordable_rent_discount: f64,
    /// Yearly subsidy per new residential unit, by zone.
    pub subsidy_per_unit: BTreeMap<ZoneId, f64>,
}

impl Default for PolicyParams {
    fn default() -> Self {
        Self {
            inclusionary_share: BTreeMap::new(),
            default_inclusionary_share: 0.0,
            affordable_rent_discount: 0.5,
            subsidy_per_unit: BTreeMap::new(),
        }
    }
}

impl PolicyParams {
    pub fn inclusionary_share_for(&self, zone: ZoneId) -> f64 {
        self.inclusionary_share
            .get(&zone)
            .copied()
            .unwrap_or(self.default_inclusionary_share)
    }

    pub fn subsidy_for(&self, zone: ZoneId, units: u32) -> f64 {
        self.subsidy_per_unit.get(&zone).copied().unwrap_or(0.0) * units as f64
    }

    pub fn validate(&self) -> Result<(), BausError> {
        let shares = self
            .inclusionary_share
            .values()
            .copied()
            .chain(std::iter::once(self.default_inclusionary_share));
        for share in shares {
            if !(0.0..=1.0).contains(&share) {
                return Err(BausError::InvalidParameter {
                    name: "policy.inclusionary_share",
                    value: share,
                });
            }
        }
        if !(0.0..=1.0).contains(&self.affordable_rent_discount) {
            return Err(BausError::InvalidParameter {
                name: "policy.affordable_rent_discount",
                value: self.affordable_rent_discount,
            });
        }
        for &subsidy in self.subsidy_per_unit.values() {
            if !subsidy.is_finite() || subsidy < 0.0 {
                return Err(BausError::InvalidParameter {
                    name: "policy.subsidy_per_unit",
                    value: subsidy,
                });
            }
        }
        Ok(())
    }
}

//! Pro-forma settings: intensity grid, building geometry and cost curves.

use std::collections::BTreeMap;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::error::BausError;
use crate::tables::Use;

/// One step of a construction cost curve.
///
/// Costs are yearly carrying costs per gross square foot, so they compare
/// directly against yearly rents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct CostTier {
    /// Tallest building (in stories) priced by this tier; `None` is unbounded.
    pub max_stories: Option<u32>,
    pub cost_per_sqft: f64,
}

const fn tier(max_stories: Option<u32>, cost_per_sqft: f64) -> CostTier {
    CostTier {
        max_stories,
        cost_per_sqft,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct ProFormaConfig {
    /// Candidate floor-area ratios; the parcel's zoned cap is always added.
    pub far_grid: Vec<f64>,
    /// Share of the parcel covered by the building footprint.
    pub parcel_coverage: f64,
    pub story_height_ft: f64,
    /// Rentable share of gross floor area.
    pub building_efficiency: f64,
    /// Ascending cost curve per use; the last tier must be unbounded.
    pub cost_tiers: BTreeMap<Use, Vec<CostTier>>,
    /// Multiplier on cost covering the developer's required return.
    pub profit_factor: f64,
    pub min_parcel_sqft: f64,
    pub max_parcel_sqft: Option<f64>,
    /// Parcels with a building older than this year are never redeveloped.
    pub historic_cutoff_year: u32,
    /// Drop rows whose best profit is not strictly positive.
    pub only_built: bool,
}

impl Default for ProFormaConfig {
    fn default() -> Self {
        // Capital costs of 150-230 $/sqft carried at 5% a year, stepping up
        // at 1, 4 and 10 stories as structure requirements change.
        let cost_tiers = BTreeMap::from([
            (
                Use::Residential,
                vec![
                    tier(Some(1), 7.5),
                    tier(Some(4), 8.5),
                    tier(Some(10), 9.5),
                    tier(None, 10.5),
                ],
            ),
            (
                Use::Office,
                vec![
                    tier(Some(1), 8.0),
                    tier(Some(4), 8.75),
                    tier(Some(10), 10.0),
                    tier(None, 11.5),
                ],
            ),
            (
                Use::Retail,
                vec![
                    tier(Some(1), 8.0),
                    tier(Some(4), 8.75),
                    tier(Some(10), 10.0),
                    tier(None, 11.5),
                ],
            ),
            (
                Use::Industrial,
                vec![
                    tier(Some(1), 7.0),
                    tier(Some(4), 8.75),
                    tier(Some(10), 10.0),
                    tier(None, 11.5),
                ],
            ),
        ]);

        Self {
            far_grid: vec![
                0.1, 0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0,
                12.0, 14.0, 16.0,
            ],
            parcel_coverage: 0.8,
            story_height_ft: 12.0,
            building_efficiency: 1.0,
            cost_tiers,
            profit_factor: 1.1,
            min_parcel_sqft: 2000.0,
            max_parcel_sqft: None,
            historic_cutoff_year: 1940,
            only_built: true,
        }
    }
}

impl ProFormaConfig {
    /// Carrying cost per square foot for `use_` in a building of `stories`.
    pub fn cost_per_sqft(&self, use_: Use, stories: u32) -> Option<f64> {
        self.cost_tiers.get(&use_).and_then(|tiers| {
            tiers
                .iter()
                .find(|t| t.max_stories.map_or(true, |m| stories <= m))
                .map(|t| t.cost_per_sqft)
        })
    }

    pub fn validate(&self) -> Result<(), BausError> {
        let invalid = |name: &'static str, value: f64| BausError::InvalidParameter { name, value };

        if self.far_grid.is_empty() {
            return Err(BausError::Config("proforma.far_grid is empty".to_string()));
        }
        if let Some(&bad) = self.far_grid.iter().find(|f| !f.is_finite() || **f <= 0.0) {
            return Err(invalid("proforma.far_grid", bad));
        }
        if !(self.parcel_coverage > 0.0 && self.parcel_coverage <= 1.0) {
            return Err(invalid("proforma.parcel_coverage", self.parcel_coverage));
        }
        if !(self.story_height_ft.is_finite() && self.story_height_ft > 0.0) {
            return Err(invalid("proforma.story_height_ft", self.story_height_ft));
        }
        if !(self.building_efficiency > 0.0 && self.building_efficiency <= 1.0) {
            return Err(invalid(
                "proforma.building_efficiency",
                self.building_efficiency,
            ));
        }
        if !(self.profit_factor.is_finite() && self.profit_factor > 0.0) {
            return Err(invalid("proforma.profit_factor", self.profit_factor));
        }
        if !(self.min_parcel_sqft.is_finite() && self.min_parcel_sqft >= 0.0) {
            return Err(invalid("proforma.min_parcel_sqft", self.min_parcel_sqft));
        }
        if let Some(max) = self.max_parcel_sqft {
            if !(max.is_finite() && max >= self.min_parcel_sqft) {
                return Err(invalid("proforma.max_parcel_sqft", max));
            }
        }

        for use_ in Use::ALL {
            let tiers = self.cost_tiers.get(&use_).ok_or_else(|| {
                BausError::Config(format!("proforma.cost_tiers has no curve for {use_:?}"))
            })?;
            if tiers.last().map_or(true, |t| t.max_stories.is_some()) {
                return Err(BausError::Config(format!(
                    "proforma.cost_tiers for {use_:?} must end with an unbounded tier"
                )));
            }
            let mut prev = 0u32;
            for t in tiers {
                if !(t.cost_per_sqft.is_finite() && t.cost_per_sqft >= 0.0) {
                    return Err(invalid("proforma.cost_tiers.cost_per_sqft", t.cost_per_sqft));
                }
                if let Some(m) = t.max_stories {
                    if m < prev {
                        return Err(BausError::Config(format!(
                            "proforma.cost_tiers for {use_:?} are not ascending"
                        )));
                    }
                    prev = m;
                }
            }
        }
        Ok(())
    }
}

use std::collections::HashMap;

use rand::Rng;

use crate::error::BausError;
use crate::sampling::uniform_subset;
use crate::tables::{Building, Lineage, ParcelTable};

use super::types::{AlternativeAttribute, LocationChoiceSpec, SegmentKey};

/// Multinomial logit probabilities for a vector of utilities.
///
/// The maximum utility is subtracted before exponentiating so large
/// utilities do not overflow. Non-finite utilities get probability zero; if
/// none is finite every probability is zero.
pub fn mnl_probabilities(utilities: &[f64]) -> Vec<f64> {
    let max = utilities
        .iter()
        .copied()
        .filter(|u| u.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return vec![0.0; utilities.len()];
    }

    let exp: Vec<f64> = utilities
        .iter()
        .map(|&u| if u.is_finite() { (u - max).exp() } else { 0.0 })
        .collect();
    let total: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / total).collect()
}

/// A validated location choice model ready for simulation.
///
/// Coefficients are indexed by segment once at construction; choosers of a
/// segment without its own coefficients fall back to [`SegmentKey::All`].
#[derive(Debug, Clone)]
pub struct LocationChoiceModel {
    spec: LocationChoiceSpec,
    betas: HashMap<SegmentKey, Vec<f64>>,
}

impl LocationChoiceModel {
    pub fn new(spec: LocationChoiceSpec) -> Result<Self, BausError> {
        if spec.estimation_sample_size == 0 {
            return Err(BausError::Config(format!(
                "choice model {}: estimation_sample_size must be positive",
                spec.name
            )));
        }

        let mut betas = HashMap::with_capacity(spec.coefficients.len());
        for c in &spec.coefficients {
            if c.beta.len() != spec.features.len() {
                return Err(BausError::CoefficientCount {
                    model: spec.name.clone(),
                    expected: spec.features.len(),
                    found: c.beta.len(),
                });
            }
            if let Some(&bad) = c.beta.iter().find(|b| !b.is_finite()) {
                return Err(BausError::Config(format!(
                    "choice model {}: coefficient {bad} for segment {} is not finite",
                    spec.name, c.segment
                )));
            }
            if betas.insert(c.segment.clone(), c.beta.clone()).is_some() {
                return Err(BausError::Config(format!(
                    "choice model {}: segment {} listed twice",
                    spec.name, c.segment
                )));
            }
        }

        Ok(Self { spec, betas })
    }

    pub fn spec(&self) -> &LocationChoiceSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn coefficients_for(&self, segment: &SegmentKey) -> Result<&[f64], BausError> {
        self.betas
            .get(segment)
            .or_else(|| self.betas.get(&SegmentKey::All))
            .map(|b| b.as_slice())
            .ok_or_else(|| BausError::MissingCoefficients {
                model: self.spec.name.clone(),
                segment: segment.to_string(),
            })
    }

    /// Feature values describing `building` as an alternative.
    pub fn feature_row(&self, building: &Building, parcels: &ParcelTable) -> Vec<f64> {
        self.spec
            .features
            .iter()
            .map(|f| {
                let raw = match f.attribute {
                    AlternativeAttribute::Constant => 1.0,
                    AlternativeAttribute::ResidentialUnits => building.residential_units as f64,
                    AlternativeAttribute::NonResidentialSqft => building.non_residential_sqft,
                    AlternativeAttribute::ResidentialPrice => building.residential_price,
                    AlternativeAttribute::NonResidentialRent => building.non_residential_rent,
                    AlternativeAttribute::YearBuilt => building.year_built as f64,
                    AlternativeAttribute::ParcelAcres => parcels
                        .get(building.parcel_id)
                        .map_or(0.0, |p| p.acres),
                    AlternativeAttribute::IsNew => {
                        matches!(building.lineage, Lineage::Developer { .. }) as u8 as f64
                    }
                    AlternativeAttribute::IsType(t) => (building.building_type == t) as u8 as f64,
                };
                f.transform.apply(raw)
            })
            .collect()
    }

    pub fn utilities(
        &self,
        segment: &SegmentKey,
        alternatives: &[&Building],
        parcels: &ParcelTable,
    ) -> Result<Vec<f64>, BausError> {
        let beta = self.coefficients_for(segment)?;
        Ok(alternatives
            .iter()
            .map(|b| {
                self.feature_row(b, parcels)
                    .iter()
                    .zip(beta)
                    .map(|(x, w)| x * w)
                    .sum::<f64>()
            })
            .collect())
    }

    /// Choice probabilities over `alternatives` for a chooser in `segment`.
    pub fn probabilities(
        &self,
        segment: &SegmentKey,
        alternatives: &[&Building],
        parcels: &ParcelTable,
    ) -> Result<Vec<f64>, BausError> {
        Ok(mnl_probabilities(&self.utilities(
            segment,
            alternatives,
            parcels,
        )?))
    }

    /// Indices of the alternatives a chooser considers out of `n`.
    ///
    /// Uses the simulation sample size when set, otherwise the full set.
    pub fn sample_alternatives<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<usize> {
        match self.spec.simulation_sample_size {
            Some(k) if k < n => {
                let mut picked = uniform_subset(n, k, rng);
                picked.sort_unstable();
                picked
            }
            _ => (0..n).collect(),
        }
    }

    /// Indices of an estimation sample of `n` alternatives, always including
    /// the chosen one.
    pub fn estimation_sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        chosen: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        let k = self.spec.estimation_sample_size.min(n);
        let mut picked = uniform_subset(n, k, rng);
        if chosen < n && !picked.contains(&chosen) {
            if let Some(last) = picked.last_mut() {
                *last = chosen;
            }
        }
        picked.sort_unstable();
        picked
    }
}

use std::collections::HashMap;

use rand::RngCore;

use crate::choice::{LocationChoiceModel, SegmentKey};
use crate::error::BausError;
use crate::tables::{Building, BuildingId, BuildingInventory, ParcelTable};

use super::types::Slot;

/// Relative weights of open slots for choosers of one segment.
pub trait SlotWeighting {
    fn weights(
        &self,
        segment: &SegmentKey,
        slots: &[&Slot],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<f64>, BausError>;
}

/// Every slot equally likely.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformWeights;

impl SlotWeighting for UniformWeights {
    fn weights(
        &self,
        _segment: &SegmentKey,
        slots: &[&Slot],
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<f64>, BausError> {
        Ok(vec![1.0; slots.len()])
    }
}

/// Slots weighted by a location choice model's probability for their building.
///
/// Each building is one alternative; its probability is shared by all of its
/// slots, so buildings with more vacancies draw proportionally more agents.
/// With a simulation sample size, buildings outside the sample get zero for
/// this draw; the partition draws again for choosers still waiting.
pub struct ChoiceWeights<'a> {
    pub model: &'a LocationChoiceModel,
    pub inventory: &'a BuildingInventory,
    pub parcels: &'a ParcelTable,
}

impl SlotWeighting for ChoiceWeights<'_> {
    fn weights(
        &self,
        segment: &SegmentKey,
        slots: &[&Slot],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<f64>, BausError> {
        let mut buildings: Vec<&Building> = Vec::new();
        let mut seen: HashMap<BuildingId, usize> = HashMap::new();
        for slot in slots {
            if seen.contains_key(&slot.building_id) {
                continue;
            }
            if let Some(b) = self.inventory.get(slot.building_id) {
                seen.insert(slot.building_id, buildings.len());
                buildings.push(b);
            }
        }

        let sampled: Vec<&Building> = self
            .model
            .sample_alternatives(buildings.len(), rng)
            .into_iter()
            .map(|i| buildings[i])
            .collect();
        let probabilities = self.model.probabilities(segment, &sampled, self.parcels)?;
        let by_building: HashMap<BuildingId, f64> = sampled
            .iter()
            .map(|b| b.id)
            .zip(probabilities)
            .collect();

        Ok(slots
            .iter()
            .map(|s| by_building.get(&s.building_id).copied().unwrap_or(0.0))
            .collect())
    }
}

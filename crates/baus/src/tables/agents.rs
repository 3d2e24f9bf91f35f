use std::collections::HashMap;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::choice::{SegmentKey, Segmentation};
use crate::error::BausError;

use super::ids::{building_ref, AgentId, BuildingId, ZoneId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum AgentKind {
    Household,
    Job,
}

/// Common view over households and jobs used by the allocation engine.
pub trait Agent {
    const KIND: AgentKind;

    fn id(&self) -> AgentId;
    fn building_id(&self) -> Option<BuildingId>;
    fn set_building(&mut self, building: Option<BuildingId>);
    /// Zone this agent must be placed in, if a zonal control applies.
    fn target_zone(&self) -> Option<ZoneId>;
    fn segment(&self, segmentation: &Segmentation) -> SegmentKey;

    fn is_placed(&self) -> bool {
        self.building_id().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Household {
    pub id: AgentId,
    #[serde(with = "building_ref")]
    pub building_id: Option<BuildingId>,
    /// Regional income quartile, 1 through 4.
    pub income_quartile: u8,
    pub persons: u32,
    pub zone_id: Option<ZoneId>,
}

impl Agent for Household {
    const KIND: AgentKind = AgentKind::Household;

    fn id(&self) -> AgentId {
        self.id
    }

    fn building_id(&self) -> Option<BuildingId> {
        self.building_id
    }

    fn set_building(&mut self, building: Option<BuildingId>) {
        self.building_id = building;
    }

    fn target_zone(&self) -> Option<ZoneId> {
        self.zone_id
    }

    fn segment(&self, segmentation: &Segmentation) -> SegmentKey {
        match segmentation {
            Segmentation::IncomeQuartile => SegmentKey::IncomeQuartile(self.income_quartile),
            Segmentation::Sector | Segmentation::None => SegmentKey::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Job {
    pub id: AgentId,
    #[serde(with = "building_ref")]
    pub building_id: Option<BuildingId>,
    /// Employment sector code, e.g. `HEALTH` or `MWTEMPN`.
    pub sector: String,
    pub zone_id: Option<ZoneId>,
}

impl Agent for Job {
    const KIND: AgentKind = AgentKind::Job;

    fn id(&self) -> AgentId {
        self.id
    }

    fn building_id(&self) -> Option<BuildingId> {
        self.building_id
    }

    fn set_building(&mut self, building: Option<BuildingId>) {
        self.building_id = building;
    }

    fn target_zone(&self) -> Option<ZoneId> {
        self.zone_id
    }

    fn segment(&self, segmentation: &Segmentation) -> SegmentKey {
        match segmentation {
            Segmentation::Sector => SegmentKey::Sector(self.sector.clone()),
            Segmentation::IncomeQuartile | Segmentation::None => SegmentKey::All,
        }
    }
}

// =============================================================================
// Agent table
// =============================================================================

/// Household or job table. Rows are never removed; relocation sets the
/// building reference back to unplaced.
#[derive(Debug, Clone)]
pub struct AgentTable<A> {
    agents: Vec<A>,
    index: HashMap<AgentId, usize>,
}

pub type Households = AgentTable<Household>;
pub type Jobs = AgentTable<Job>;

impl<A: Agent> Default for AgentTable<A> {
    fn default() -> Self {
        Self {
            agents: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<A: Agent> AgentTable<A> {
    pub fn new(agents: Vec<A>) -> Result<Self, BausError> {
        let mut index = HashMap::with_capacity(agents.len());
        for (i, agent) in agents.iter().enumerate() {
            if index.insert(agent.id(), i).is_some() {
                return Err(BausError::DuplicateId {
                    table: match A::KIND {
                        AgentKind::Household => "households",
                        AgentKind::Job => "jobs",
                    },
                    id: agent.id().0,
                });
            }
        }
        Ok(Self { agents, index })
    }

    pub fn get(&self, id: AgentId) -> Option<&A> {
        self.index.get(&id).map(|&i| &self.agents[i])
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut A> {
        self.index.get(&id).map(|&i| &mut self.agents[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &A> {
        self.agents.iter()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn unplaced_ids(&self) -> Vec<AgentId> {
        self.agents
            .iter()
            .filter(|a| !a.is_placed())
            .map(|a| a.id())
            .collect()
    }

    pub fn unplaced_count(&self) -> usize {
        self.agents.iter().filter(|a| !a.is_placed()).count()
    }

    /// Set the given agents to unplaced so the allocation engine relocates them.
    pub fn unplace(&mut self, ids: &[AgentId]) {
        for id in ids {
            if let Some(agent) = self.get_mut(*id) {
                agent.set_building(None);
            }
        }
    }

    /// Number of agents occupying each building.
    pub fn occupancy(&self) -> HashMap<BuildingId, u32> {
        let mut counts: HashMap<BuildingId, u32> = HashMap::new();
        for building in self.agents.iter().filter_map(|a| a.building_id()) {
            *counts.entry(building).or_insert(0) += 1;
        }
        counts
    }
}

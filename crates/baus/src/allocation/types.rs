use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tables::{AgentKind, BuildingId, ParcelId, ZoneId};

/// One vacant residential unit or job space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub building_id: BuildingId,
    pub parcel_id: ParcelId,
    pub zone_id: ZoneId,
}

/// Outcome of one [`allocate`](super::allocate) call, in chooser order.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationResult<C, A> {
    pub assignments: Vec<(C, Option<A>)>,
}

impl<C: Copy, A: Copy> AllocationResult<C, A> {
    pub fn unassigned_all(choosers: &[C]) -> Self {
        Self {
            assignments: choosers.iter().map(|&c| (c, None)).collect(),
        }
    }

    pub fn assigned_count(&self) -> usize {
        self.assignments.iter().filter(|(_, a)| a.is_some()).count()
    }

    pub fn assigned(&self) -> impl Iterator<Item = (C, A)> + '_ {
        self.assignments
            .iter()
            .filter_map(|&(c, a)| a.map(|a| (c, a)))
    }

    pub fn unassigned(&self) -> Vec<C> {
        self.assignments
            .iter()
            .filter(|(_, a)| a.is_none())
            .map(|&(c, _)| c)
            .collect()
    }
}

/// Expected number of agents placed per zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlTotals {
    pub by_zone: BTreeMap<ZoneId, u64>,
}

impl ControlTotals {
    pub fn new(by_zone: BTreeMap<ZoneId, u64>) -> Self {
        Self { by_zone }
    }

    pub fn get(&self, zone: ZoneId) -> Option<u64> {
        self.by_zone.get(&zone).copied()
    }
}

/// Diagnostics for one partition. `zone` is `None` for agents without a
/// target zone, which draw from the whole region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionReport {
    pub zone: Option<ZoneId>,
    pub demand: usize,
    pub supply: usize,
    pub placed: usize,
    pub unplaced: usize,
    pub control_total: Option<u64>,
    /// Control total minus placed; negative on overshoot.
    pub shortfall: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationReport {
    pub kind: AgentKind,
    pub partitions: Vec<PartitionReport>,
}

impl AllocationReport {
    pub fn placed(&self) -> usize {
        self.partitions.iter().map(|p| p.placed).sum()
    }

    pub fn unplaced(&self) -> usize {
        self.partitions.iter().map(|p| p.unplaced).sum()
    }

    /// Partitions whose placed count missed their control total.
    pub fn mismatches(&self) -> impl Iterator<Item = &PartitionReport> {
        self.partitions
            .iter()
            .filter(|p| p.control_total.is_some() && p.shortfall != 0)
    }
}

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::choice::{SegmentKey, Segmentation};
use crate::error::BausError;
use crate::sampling::uniform_subset;
use crate::tables::{Agent, AgentId, AgentTable, ZoneId};

use super::engine::allocate;
use super::types::{AllocationReport, ControlTotals, PartitionReport, Slot};
use super::weighting::SlotWeighting;

/// Place every unplaced agent into an open slot, partition by partition.
///
/// Agents with a target zone compete only for slots in that zone; zones are
/// processed in id order, then agents without a target zone draw from
/// whatever slots remain anywhere. When a partition is short of slots, a
/// uniform subset of its choosers across all segments competes, so every
/// chooser has the same chance of placement. Each segment gets its own
/// weights, and segments take turns in random order. Demand above supply
/// and control-total misses are logged and reported, never errors.
pub fn allocate_partitioned<A, R>(
    agents: &mut AgentTable<A>,
    slots: &[Slot],
    weighting: &dyn SlotWeighting,
    segmentation: Segmentation,
    controls: Option<&ControlTotals>,
    rng: &mut R,
) -> Result<AllocationReport, BausError>
where
    A: Agent,
    R: Rng,
{
    type Segments = BTreeMap<SegmentKey, Vec<AgentId>>;
    let mut partitions: BTreeMap<Option<ZoneId>, Segments> = BTreeMap::new();
    for agent in agents.iter().filter(|a| !a.is_placed()) {
        partitions
            .entry(agent.target_zone())
            .or_default()
            .entry(agent.segment(&segmentation))
            .or_default()
            .push(agent.id());
    }
    if let Some(controls) = controls {
        for &zone in controls.by_zone.keys() {
            partitions.entry(Some(zone)).or_default();
        }
    }

    // Zoned partitions first, the regional remainder last.
    let mut order: Vec<Option<ZoneId>> = partitions.keys().copied().collect();
    order.sort_by_key(|z| (z.is_none(), *z));

    let mut available = vec![true; slots.len()];
    let mut report = AllocationReport {
        kind: A::KIND,
        partitions: Vec::with_capacity(order.len()),
    };

    for zone in order {
        let Some(segments) = partitions.remove(&zone) else {
            continue;
        };
        let in_partition: Vec<usize> = (0..slots.len())
            .filter(|&i| available[i] && zone.map_or(true, |z| slots[i].zone_id == z))
            .collect();
        let demand: usize = segments.values().map(Vec::len).sum();
        let supply = in_partition.len();
        if demand > supply {
            warn!(
                "allocation: {:?} demand {demand} exceeds supply {supply} in zone {:?}, {} left unplaced",
                A::KIND,
                zone,
                demand - supply
            );
        }

        let mut segments: Vec<(SegmentKey, Vec<AgentId>)> = segments.into_iter().collect();
        if demand > supply {
            segments = fair_share(segments, demand, supply, rng);
        }
        segments.shuffle(rng);

        let mut placed = 0usize;
        for (segment, choosers) in segments {
            let wanted = choosers.len();
            let mut waiting = choosers;
            // Sampled weights cover only part of the open slots, so draw
            // again until the segment is housed or a round places nobody.
            while !waiting.is_empty() {
                let open: Vec<usize> = in_partition
                    .iter()
                    .copied()
                    .filter(|&i| available[i])
                    .collect();
                if open.is_empty() {
                    break;
                }
                let open_slots: Vec<&Slot> = open.iter().map(|&i| &slots[i]).collect();
                let weights = weighting.weights(&segment, &open_slots, &mut *rng)?;
                let result = allocate(&waiting, &open, &weights, rng)?;
                if result.assigned_count() == 0 {
                    break;
                }

                for (agent_id, slot_index) in result.assigned() {
                    available[slot_index] = false;
                    if let Some(agent) = agents.get_mut(agent_id) {
                        agent.set_building(Some(slots[slot_index].building_id));
                        placed += 1;
                    }
                }
                waiting = result.unassigned();
            }
            debug!(
                "allocation: zone {:?} segment {segment}: {} of {wanted} placed",
                zone,
                wanted - waiting.len()
            );
        }

        let control_total = zone.and_then(|z| controls.and_then(|c| c.get(z)));
        let shortfall = control_total.map_or(0, |c| c as i64 - placed as i64);
        if let Some(control) = control_total {
            if shortfall != 0 {
                warn!(
                    "allocation: zone {:?} placed {placed} {:?} against control total {control}",
                    zone,
                    A::KIND
                );
            }
        }

        report.partitions.push(PartitionReport {
            zone,
            demand,
            supply,
            placed,
            unplaced: demand - placed,
            control_total,
            shortfall,
        });
    }

    Ok(report)
}

/// Keep a uniform subset of `supply` choosers across all segments.
///
/// Every chooser of a short partition then has the same chance of a slot,
/// whatever the size of its segment.
fn fair_share<R: Rng>(
    segments: Vec<(SegmentKey, Vec<AgentId>)>,
    demand: usize,
    supply: usize,
    rng: &mut R,
) -> Vec<(SegmentKey, Vec<AgentId>)> {
    let mut keep = vec![false; demand];
    for i in uniform_subset(demand, supply, rng) {
        keep[i] = true;
    }
    let mut flat = keep.into_iter();
    segments
        .into_iter()
        .map(|(segment, choosers)| {
            let kept: Vec<AgentId> = choosers
                .into_iter()
                .filter(|_| flat.next().unwrap_or(false))
                .collect();
            (segment, kept)
        })
        .filter(|(_, choosers)| !choosers.is_empty())
        .collect()
}

use rand::Rng;

use crate::proforma::FeasibilityResult;
use crate::sampling::weighted_permutation;

use super::types::DemandKind;

/// Units needed to bring vacancy down to `target_vacancy`:
/// `max(agents / (1 - target_vacancy) - existing, 0)`, truncated.
pub fn target_units(agents: u64, existing: u64, target_vacancy: f64) -> u64 {
    let needed = agents as f64 / (1.0 - target_vacancy) - existing as f64;
    if needed.is_finite() && needed > 0.0 {
        needed.floor() as u64
    } else {
        0
    }
}

/// Net new units (or job spaces) a feasibility row adds to the region.
pub fn net_new(row: &FeasibilityResult, kind: DemandKind) -> u64 {
    match kind {
        DemandKind::Residential => row.net_units() as u64,
        DemandKind::NonResidential => row.net_job_spaces() as u64,
    }
}

/// Indices of `candidates` to develop, in draw order.
///
/// Candidates are permuted without replacement with probability proportional
/// to profit; non-positive profits are never drawn. The selection is the
/// shortest prefix of that order whose cumulative net-new count reaches
/// `target`, or the whole order when the total falls short.
pub fn select_parcels<R: Rng + ?Sized>(
    candidates: &[FeasibilityResult],
    kind: DemandKind,
    target: u64,
    rng: &mut R,
) -> Vec<usize> {
    if target == 0 || candidates.is_empty() {
        return Vec::new();
    }

    let weights: Vec<f64> = candidates.iter().map(|r| r.profit.max(0.0)).collect();
    let mut order = weighted_permutation(&weights, rng);

    let cumulative: Vec<u64> = order
        .iter()
        .scan(0u64, |acc, &i| {
            *acc += net_new(&candidates[i], kind);
            Some(*acc)
        })
        .collect();
    let cut = cumulative.partition_point(|&c| c < target);
    order.truncate((cut + 1).min(order.len()));
    order
}

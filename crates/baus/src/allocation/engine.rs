use rand::Rng;

use crate::error::BausError;
use crate::sampling::{uniform_subset, validate_weights, weighted_sample};

use super::types::AllocationResult;

/// Assign choosers to alternatives, each alternative at most once.
///
/// `probabilities` are relative weights aligned with `alternatives`; they
/// need not sum to one. `min(choosers, non-zero alternatives)` choosers are
/// assigned. When alternatives run short the assigned choosers are a uniform
/// random subset of the whole pool, so position in `choosers` carries no
/// advantage. All-zero weights leave everyone unassigned.
pub fn allocate<C, A, R>(
    choosers: &[C],
    alternatives: &[A],
    probabilities: &[f64],
    rng: &mut R,
) -> Result<AllocationResult<C, A>, BausError>
where
    C: Copy,
    A: Copy,
    R: Rng + ?Sized,
{
    if probabilities.len() != alternatives.len() {
        return Err(BausError::LengthMismatch {
            what: "allocation probabilities",
            expected: alternatives.len(),
            found: probabilities.len(),
        });
    }
    validate_weights(probabilities)?;

    let mut result = AllocationResult::unassigned_all(choosers);
    let nonzero = probabilities.iter().filter(|&&p| p > 0.0).count();
    let n = choosers.len().min(nonzero);
    if n == 0 {
        return Ok(result);
    }

    let picked_choosers: Vec<usize> = if n < choosers.len() {
        uniform_subset(choosers.len(), n, rng)
    } else {
        (0..choosers.len()).collect()
    };
    let picked_alternatives = weighted_sample(probabilities, n, rng);

    for (c, a) in picked_choosers.into_iter().zip(picked_alternatives) {
        result.assignments[c].1 = Some(alternatives[a]);
    }
    Ok(result)
}

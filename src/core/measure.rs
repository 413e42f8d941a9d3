/// Projective measurement with wavefunction collapse.
///
/// Randomness is drawn from the `Rng` the caller passes in. Outcomes are
/// cached on the register, so measuring the same qubit (or the whole
/// register) twice returns the same value without drawing again.
///
/// Collapse protocol for one qubit:
///   1. p1 = Σ|αᵢ|² over indices with the qubit's bit set
///   2. r ~ U[0, 1); outcome = 1 iff r ≤ p1
///   3. zero every amplitude inconsistent with the outcome
///   4. divide the survivors by sqrt(P(outcome))
use super::bits::{bit_at, bits_of_index, indices_with_bit_set};
use super::complex::Complex;
use super::register::AmplitudeRegister;
use crate::error::Result;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Probability that `qubit` measures as |1⟩. Does not collapse.
pub fn probability_of_qubit(reg: &AmplitudeRegister, qubit: usize) -> Result<f64> {
    reg.validate_qubit(qubit)?;
    let p: f64 = indices_with_bit_set(reg.num_qubits(), qubit)
        .into_iter()
        .map(|i| reg.probability(i))
        .sum();
    Ok(p.clamp(0.0, 1.0))
}

/// Measure a single qubit, collapsing the register. Returns 0 or 1.
///
/// Once every qubit of the register has been measured this way, the
/// whole-register outcome is cached too, so a following [`measure`] call
/// agrees with the per-qubit results.
pub fn measure_qubit<R: Rng + ?Sized>(
    reg: &mut AmplitudeRegister,
    qubit: usize,
    rng: &mut R,
) -> Result<u8> {
    reg.validate_qubit(qubit)?;
    if let Some(bit) = reg.measured_qubit(qubit) {
        return Ok(bit);
    }

    let n = reg.num_qubits();
    let outcome = match reg.measured_index() {
        // Already collapsed onto a basis state: the answer is fixed.
        Some(index) => bit_at(n, index, qubit),
        None => {
            let p1 = probability_of_qubit(reg, qubit)?;
            let p0: f64 = (0..reg.dim())
                .filter(|&i| bit_at(n, i, qubit) == 0)
                .map(|i| reg.probability(i))
                .sum();
            let r: f64 = rng.gen();
            // Never pick a branch that carries no amplitude.
            let outcome = if p1 <= 0.0 {
                0
            } else if p0 <= 0.0 || p1 >= 1.0 || r <= p1 {
                1
            } else {
                0
            };
            trace!(qubit, p1, r, outcome, "sampled qubit");
            outcome
        }
    };

    collapse_qubit(reg, qubit, outcome);
    reg.cache_qubit(qubit, outcome);

    if reg.measured_index().is_none() {
        if let Some(index) = reg.index_from_cache() {
            reg.cache_index(index);
        }
    }
    Ok(outcome)
}

/// Measure the whole register. Returns the basis index of the outcome.
///
/// Samples by walking the cumulative distribution in index order; the last
/// populated bucket absorbs floating-point residue so the walk always lands.
/// The register collapses onto the sampled basis state (its phase is kept).
pub fn measure<R: Rng + ?Sized>(reg: &mut AmplitudeRegister, rng: &mut R) -> Result<usize> {
    if let Some(index) = reg.measured_index() {
        return Ok(index);
    }

    let r: f64 = rng.gen();
    let index = sample_index(&reg.probabilities(), r);

    let amps = reg.amplitudes_mut();
    let kept = amps[index];
    let modulus = kept.modulus();
    let kept = if modulus > 0.0 { kept.scale(1.0 / modulus) } else { Complex::one() };
    for amp in amps.iter_mut() {
        *amp = Complex::zero();
    }
    amps[index] = kept;

    for (q, bit) in bits_of_index(reg.num_qubits(), index).into_iter().enumerate() {
        reg.cache_qubit(q, bit);
    }
    reg.cache_index(index);
    debug!(index, label = %reg.basis_label(index), "register measured");
    Ok(index)
}

/// Histogram of `shots` samples from the current distribution.
/// Does not collapse the register and ignores the measurement caches.
pub fn sample_counts<R: Rng + ?Sized>(
    reg: &AmplitudeRegister,
    shots: usize,
    rng: &mut R,
) -> BTreeMap<usize, usize> {
    let probs = reg.probabilities();
    let mut counts = BTreeMap::new();
    for _ in 0..shots {
        let index = sample_index(&probs, rng.gen());
        *counts.entry(index).or_insert(0) += 1;
    }
    counts
}

/// Inverse-CDF lookup of `r ∈ [0, 1)`.
fn sample_index(probs: &[f64], r: f64) -> usize {
    let last = probs.iter().rposition(|&p| p > 0.0).unwrap_or(0);
    let mut cumulative = 0.0;
    for (i, &p) in probs.iter().enumerate().take(last) {
        cumulative += p;
        if p > 0.0 && r < cumulative {
            return i;
        }
    }
    last
}

/// Zero the branch inconsistent with `outcome` and renormalize the rest.
fn collapse_qubit(reg: &mut AmplitudeRegister, qubit: usize, outcome: u8) {
    let n = reg.num_qubits();
    for (i, amp) in reg.amplitudes_mut().iter_mut().enumerate() {
        if bit_at(n, i, qubit) != outcome {
            *amp = Complex::zero();
        }
    }
    // Survivors carry P(outcome) > 0, so this divides by sqrt(P(outcome))
    // even when that probability is tiny.
    reg.normalize();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::{cx, h, ry, x};
    use crate::core::register::NORM_TOLERANCE;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bell() -> AmplitudeRegister {
        let mut reg = AmplitudeRegister::new(2).unwrap();
        h(&mut reg, 0).unwrap();
        cx(&mut reg, 0, 1).unwrap();
        reg
    }

    #[test]
    fn test_probability_of_qubit() {
        let mut reg = AmplitudeRegister::new(2).unwrap();
        assert_eq!(probability_of_qubit(&reg, 0).unwrap(), 0.0);
        x(&mut reg, 1).unwrap();
        assert!((probability_of_qubit(&reg, 1).unwrap() - 1.0).abs() < 1e-12);
        h(&mut reg, 0).unwrap();
        assert!((probability_of_qubit(&reg, 0).unwrap() - 0.5).abs() < 1e-12);
        assert!(probability_of_qubit(&reg, 2).is_err());
    }

    #[test]
    fn test_deterministic_outcomes() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut reg = AmplitudeRegister::new(3).unwrap();
        x(&mut reg, 1).unwrap();
        assert_eq!(measure_qubit(&mut reg, 0, &mut rng).unwrap(), 0);
        assert_eq!(measure_qubit(&mut reg, 1, &mut rng).unwrap(), 1);
        assert_eq!(measure(&mut reg, &mut rng).unwrap(), 0b010);
    }

    #[test]
    fn test_measure_qubit_idempotent() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let mut reg = AmplitudeRegister::new(1).unwrap();
            h(&mut reg, 0).unwrap();
            let first = measure_qubit(&mut reg, 0, &mut rng).unwrap();
            let second = measure_qubit(&mut reg, 0, &mut rng).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_measure_idempotent() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut reg = AmplitudeRegister::new(3).unwrap();
        for q in 0..3 {
            h(&mut reg, q).unwrap();
        }
        let first = measure(&mut reg, &mut rng).unwrap();
        let second = measure(&mut reg, &mut rng).unwrap();
        assert_eq!(first, second);
        assert!((reg.probability(first) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_collapse_renormalizes() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut reg = AmplitudeRegister::new(3).unwrap();
        h(&mut reg, 0).unwrap();
        ry(&mut reg, 1, 60.0).unwrap();
        h(&mut reg, 2).unwrap();
        let bit = measure_qubit(&mut reg, 1, &mut rng).unwrap();
        assert!(reg.is_normalized(NORM_TOLERANCE));
        for i in 0..reg.dim() {
            if bit_at(3, i, 1) != bit {
                assert_eq!(reg.amplitudes()[i], Complex::zero());
            }
        }
    }

    #[test]
    fn test_bell_measurements_correlate() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let mut reg = bell();
            let a = measure_qubit(&mut reg, 0, &mut rng).unwrap();
            let b = measure_qubit(&mut reg, 1, &mut rng).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_per_qubit_cache_resolves_register() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut reg = bell();
        let a = measure_qubit(&mut reg, 0, &mut rng).unwrap();
        assert_eq!(reg.measured_index(), None);
        let b = measure_qubit(&mut reg, 1, &mut rng).unwrap();
        let expected = ((a as usize) << 1) | b as usize;
        assert_eq!(reg.measured_index(), Some(expected));
        assert_eq!(measure(&mut reg, &mut rng).unwrap(), expected);
    }

    #[test]
    fn test_register_measure_fixes_qubits() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut reg = bell();
        let index = measure(&mut reg, &mut rng).unwrap();
        assert!(index == 0 || index == 3);
        let bit = measure_qubit(&mut reg, 1, &mut rng).unwrap();
        assert_eq!(bit as usize, index & 1);
    }

    #[test]
    fn test_gate_after_measurement_invalidates_cache() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut reg = AmplitudeRegister::new(1).unwrap();
        assert_eq!(measure_qubit(&mut reg, 0, &mut rng).unwrap(), 0);
        x(&mut reg, 0).unwrap();
        assert_eq!(reg.measured_qubit(0), None);
        assert_eq!(measure_qubit(&mut reg, 0, &mut rng).unwrap(), 1);
    }

    #[test]
    fn test_unlikely_outcome_renormalizes() {
        // P(1) is about 7.6e-19; r = 0.0 still selects it.
        let mut rng = StepRng::new(0, 0);
        let mut reg = AmplitudeRegister::new(1).unwrap();
        ry(&mut reg, 0, 1e-7).unwrap();
        let p1 = probability_of_qubit(&reg, 0).unwrap();
        assert!(p1 > 0.0 && p1 < 1e-15);
        assert_eq!(measure_qubit(&mut reg, 0, &mut rng).unwrap(), 1);
        assert!(reg.is_normalized(NORM_TOLERANCE));
        assert_eq!(reg.amplitudes()[0], Complex::zero());
        assert!((reg.probability(1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_branch_never_selected() {
        // All weight on |1⟩; an r above p1 must not collapse onto |0⟩.
        let mut rng = StepRng::new(u64::MAX, 0);
        let mut reg = AmplitudeRegister::new(1).unwrap();
        x(&mut reg, 0).unwrap();
        assert_eq!(measure_qubit(&mut reg, 0, &mut rng).unwrap(), 1);
        assert!(reg.is_normalized(NORM_TOLERANCE));
    }

    #[test]
    fn test_sample_index_edges() {
        assert_eq!(sample_index(&[0.5, 0.5], 0.0), 0);
        assert_eq!(sample_index(&[0.5, 0.5], 0.7), 1);
        // residue: cumulative falls short of r, last populated bucket wins
        assert_eq!(sample_index(&[0.3, 0.69999, 0.0], 0.999999), 1);
        assert_eq!(sample_index(&[0.0, 0.0, 1.0, 0.0], 0.2), 2);
    }

    #[test]
    fn test_sample_counts_distribution() {
        let mut rng = StdRng::seed_from_u64(99);
        let reg = bell();
        let counts = sample_counts(&reg, 2000, &mut rng);
        assert_eq!(counts.keys().copied().collect::<Vec<_>>(), vec![0, 3]);
        let zeros = counts[&0] as f64 / 2000.0;
        assert!((zeros - 0.5).abs() < 0.05);
        // sampling never collapses
        assert_eq!(reg.measured_index(), None);
    }
}

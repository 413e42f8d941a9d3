/// Simon's algorithm: find the hidden period s of a two-to-one function
/// f(x) = f(x ⊕ s).
///
/// Each query yields a uniformly random y with s · y = 0 (mod 2). Once n-1
/// distinct nonzero samples are in hand they are handed to the GF(2)
/// solver; a rank-deficient batch is thrown away and a fresh one drawn.
use super::oracles;
use crate::circuit::Circuit;
use crate::core::measure::measure_qubit;
use crate::core::register::AmplitudeRegister;
use crate::error::{QsimError, Result};
use crate::gf2::{self, BitVector};
use rand::Rng;
use tracing::{debug, warn};

/// Query circuit without the final measurement: H on the inputs, oracle,
/// H on the inputs. Width 2n.
pub fn circuit(secret: &[u8]) -> Result<Circuit> {
    let oracle = oracles::simon(secret)?;
    let n = secret.len();
    let mut circuit = Circuit::new(2 * n);
    for q in 0..n {
        circuit.h(q)?;
    }
    circuit.append_circuit(&oracle)?;
    for q in 0..n {
        circuit.h(q)?;
    }
    Ok(circuit)
}

/// Draw one y by measuring the input half of a copy of `prepared`.
fn sample<R: Rng + ?Sized>(prepared: &AmplitudeRegister, n: usize, rng: &mut R) -> Result<BitVector> {
    let mut reg = prepared.clone();
    (0..n).map(|q| measure_qubit(&mut reg, q, rng)).collect()
}

/// Draws allowed per batch, per input bit.
const DRAWS_PER_BIT: usize = 8;

/// Collect n-1 distinct nonzero samples, or `None` when the draw budget
/// runs out first.
fn sample_batch<R: Rng + ?Sized>(
    prepared: &AmplitudeRegister,
    n: usize,
    rng: &mut R,
) -> Result<Option<Vec<BitVector>>> {
    let mut batch: Vec<BitVector> = Vec::with_capacity(n - 1);
    for _ in 0..DRAWS_PER_BIT * n {
        let y = sample(prepared, n, rng)?;
        if !gf2::is_zero(&y) && !batch.contains(&y) {
            batch.push(y);
            if batch.len() == n - 1 {
                return Ok(Some(batch));
            }
        }
    }
    Ok(None)
}

pub fn run<R: Rng + ?Sized>(secret: &[u8], rng: &mut R, max_attempts: usize) -> Result<Vec<u8>> {
    let circuit = circuit(secret)?;
    let n = secret.len();
    if n == 1 {
        // [1] is the only nonzero candidate.
        return Ok(vec![1]);
    }

    // The pre-measurement state is the same for every query.
    let mut prepared = AmplitudeRegister::new(2 * n)?;
    circuit.execute(&mut prepared, rng)?;

    for attempt in 1..=max_attempts {
        let Some(batch) = sample_batch(&prepared, n, rng)? else {
            warn!(attempt, max_attempts, "too few distinct samples, resampling");
            continue;
        };
        match gf2::solve(&batch) {
            Ok(found) => {
                debug!(attempt, ?found, "Simon period recovered");
                return Ok(found);
            }
            Err(e) if e.is_recoverable() => {
                warn!(attempt, max_attempts, "dependent measurement batch, resampling");
            }
            Err(e) => return Err(e),
        }
    }
    Err(QsimError::AttemptsExhausted(max_attempts))
}

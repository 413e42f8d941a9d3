/// Bernstein–Vazirani: recover s from f(x) = s · x (mod 2) in one query.
use super::oracles;
use crate::circuit::Circuit;
use crate::core::register::AmplitudeRegister;
use crate::error::{QsimError, Result};
use rand::Rng;
use tracing::debug;

pub fn circuit(secret: &[u8]) -> Result<Circuit> {
    let oracle = oracles::bernstein_vazirani(secret)?;
    let n = secret.len();
    let mut circuit = Circuit::new(n + 1);
    circuit.x(n)?;
    for q in 0..=n {
        circuit.h(q)?;
    }
    circuit.append_circuit(&oracle)?;
    for q in 0..n {
        circuit.h(q)?;
        circuit.measure_qubit(q)?;
    }
    Ok(circuit)
}

/// Returns the measured input register, which equals `secret`.
pub fn run<R: Rng + ?Sized>(secret: &[u8], rng: &mut R) -> Result<Vec<u8>> {
    let circuit = circuit(secret)?;
    let n = secret.len();
    let mut reg = AmplitudeRegister::new(n + 1)?;
    let result = circuit.execute(&mut reg, rng)?;
    let recovered = (0..n)
        .map(|q| {
            result.outcome(q).ok_or(QsimError::QubitOutOfRange {
                qubit: q,
                num_qubits: n,
            })
        })
        .collect::<Result<Vec<u8>>>()?;
    debug!(?recovered, "Bernstein-Vazirani finished");
    Ok(recovered)
}

/// Deutsch–Jozsa: decide with one query whether an n-bit Boolean function
/// is constant or balanced.
///
/// Prepare |0…0⟩|1⟩, Hadamard every qubit, query the oracle, Hadamard the
/// inputs again and measure them. The all-zero outcome has probability 1
/// for a constant function and 0 for a balanced one.
use crate::circuit::Circuit;
use crate::core::register::AmplitudeRegister;
use crate::error::{QsimError, Result};
use rand::Rng;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Constant,
    Balanced,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Constant => write!(f, "constant"),
            Verdict::Balanced => write!(f, "balanced"),
        }
    }
}

/// Full query circuit around `oracle` (width n + 1, ancilla last).
pub fn circuit(oracle: &Circuit, n: usize) -> Result<Circuit> {
    if oracle.num_qubits() != n + 1 {
        return Err(QsimError::DimensionMismatch {
            expected: n + 1,
            found: oracle.num_qubits(),
        });
    }
    let mut circuit = Circuit::new(n + 1);
    circuit.x(n)?;
    for q in 0..=n {
        circuit.h(q)?;
    }
    circuit.append_circuit(oracle)?;
    for q in 0..n {
        circuit.h(q)?;
        circuit.measure_qubit(q)?;
    }
    Ok(circuit)
}

pub fn run<R: Rng + ?Sized>(oracle: &Circuit, n: usize, rng: &mut R) -> Result<Verdict> {
    let circuit = circuit(oracle, n)?;
    let mut reg = AmplitudeRegister::new(n + 1)?;
    let result = circuit.execute(&mut reg, rng)?;
    let all_zero = (0..n).all(|q| result.outcome(q) == Some(0));
    let verdict = if all_zero { Verdict::Constant } else { Verdict::Balanced };
    debug!(n, %verdict, "Deutsch-Jozsa finished");
    Ok(verdict)
}

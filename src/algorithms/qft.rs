/// Quantum Fourier transform and the Draper adder built on it.
///
/// `qubits[0]` is the most significant bit of the transformed register.
/// With the final swaps included, `qft` maps |a⟩ to
/// (1/√N) Σₖ e^{2πi·a·k/N} |k⟩.
use crate::circuit::Circuit;
use crate::core::bits::index_from_bits;
use crate::core::register::AmplitudeRegister;
use crate::error::{QsimError, Result};
use rand::Rng;
use tracing::debug;

/// Controlled-phase angle between qubits `distance` apart: 180 / 2^distance.
fn rotation_degrees(distance: usize) -> f64 {
    180.0 / (1u64 << distance) as f64
}

/// Append the QFT over `qubits` to `circuit`.
pub fn qft(circuit: &mut Circuit, qubits: &[usize]) -> Result<()> {
    let m = qubits.len();
    for j in 0..m {
        circuit.h(qubits[j])?;
        for k in j + 1..m {
            circuit.cphase(qubits[k], qubits[j], rotation_degrees(k - j))?;
        }
    }
    for j in 0..m / 2 {
        circuit.swap(qubits[j], qubits[m - 1 - j])?;
    }
    Ok(())
}

/// Append the adjoint of [`qft`]: the same gates reversed, angles negated.
pub fn inverse_qft(circuit: &mut Circuit, qubits: &[usize]) -> Result<()> {
    let m = qubits.len();
    for j in (0..m / 2).rev() {
        circuit.swap(qubits[j], qubits[m - 1 - j])?;
    }
    for j in (0..m).rev() {
        for k in (j + 1..m).rev() {
            circuit.cphase(qubits[k], qubits[j], -rotation_degrees(k - j))?;
        }
        circuit.h(qubits[j])?;
    }
    Ok(())
}

/// Circuit computing |a⟩|b⟩ → |a + b mod 2^width⟩|b⟩ on `2 * width`
/// qubits: register A is `0..width`, register B is `width..2*width`.
///
/// After the QFT, A's qubit j carries the phase e^{2πi·a/2^{j+1}}; adding
/// b means rotating it by e^{2πi·b/2^{j+1}}, one controlled phase per bit
/// of b whose contribution is not a whole turn.
pub fn adder_circuit(width: usize) -> Result<Circuit> {
    let a: Vec<usize> = (0..width).collect();
    let mut circuit = Circuit::new(2 * width);
    qft(&mut circuit, &a)?;
    for j in 0..width {
        for l in 0..width {
            if l + j + 1 < width {
                continue;
            }
            let degrees = 360.0 / (1u64 << (l + j + 2 - width)) as f64;
            circuit.cphase(width + l, j, degrees)?;
        }
    }
    inverse_qft(&mut circuit, &a)?;
    Ok(circuit)
}

fn load(circuit: &mut Circuit, value: u64, offset: usize, width: usize) -> Result<()> {
    for q in 0..width {
        if (value >> (width - 1 - q)) & 1 == 1 {
            circuit.x(offset + q)?;
        }
    }
    Ok(())
}

/// a + b (mod 2^width) on the quantum adder.
pub fn add<R: Rng + ?Sized>(a: u64, b: u64, width: usize, rng: &mut R) -> Result<u64> {
    if width == 0 || width >= 64 {
        return Err(QsimError::InvalidRegisterConstruction(format!(
            "adder width must be between 1 and 63, got {width}"
        )));
    }
    for operand in [a, b] {
        if operand >> width != 0 {
            return Err(QsimError::InvalidRegisterConstruction(format!(
                "{operand} does not fit in {width} bits"
            )));
        }
    }

    let mut circuit = Circuit::new(2 * width);
    load(&mut circuit, a, 0, width)?;
    load(&mut circuit, b, width, width)?;
    circuit.append_circuit(&adder_circuit(width)?)?;
    for q in 0..width {
        circuit.measure_qubit(q)?;
    }

    let mut reg = AmplitudeRegister::new(2 * width)?;
    let result = circuit.execute(&mut reg, rng)?;
    let bits = (0..width)
        .map(|q| {
            result.outcome(q).ok_or(QsimError::QubitOutOfRange {
                qubit: q,
                num_qubits: 2 * width,
            })
        })
        .collect::<Result<Vec<u8>>>()?;
    let sum = index_from_bits(&bits) as u64;
    debug!(a, b, width, sum, "Draper addition");
    Ok(sum)
}

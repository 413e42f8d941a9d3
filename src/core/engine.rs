/// Gate application on an amplitude register.
///
/// Every routine mutates the register in place and iterates basis indices
/// with the same pairing convention: a pair is the index whose target bit is
/// 0 plus its *partner*, obtained by adding `2^(N-1-target)`. Only the
/// 0-side index drives the loop, so a 2×2 matrix touches each pair exactly
/// once, O(2^n) per gate.
///
/// Controls are an explicit `&[Control]` list combined with logical AND.
/// An empty list is the plain single-qubit case.
///
/// Applying any gate invalidates the register's measurement caches.
use super::bits::{column_of_bit, indices_with_bit_set, qubit_mask};
use super::gates::{self, phase_factor, Matrix2x2};
use super::matrix::ComplexMatrix;
use super::register::AmplitudeRegister;
use crate::error::{QsimError, Result};
use tracing::trace;

/// A control condition: the gate fires only where `qubit` holds `bit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub qubit: usize,
    pub bit: u8,
}

impl Control {
    /// Fires when `qubit` is |1⟩ (the usual control).
    pub const fn on(qubit: usize) -> Self {
        Self { qubit, bit: 1 }
    }

    /// Fires when `qubit` is |0⟩ (open control).
    pub const fn off(qubit: usize) -> Self {
        Self { qubit, bit: 0 }
    }
}

impl std::fmt::Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.bit == 1 {
            write!(f, "q{}", self.qubit)
        } else {
            write!(f, "!q{}", self.qubit)
        }
    }
}

// ── Validation ─────────────────────────────────────────────────────────────

/// Range-check every qubit and reject duplicates.
fn check_qubits(reg: &AmplitudeRegister, controls: &[Control], targets: &[usize]) -> Result<()> {
    let mut seen = vec![false; reg.num_qubits()];
    for q in controls.iter().map(|c| c.qubit).chain(targets.iter().copied()) {
        reg.validate_qubit(q)?;
        if seen[q] {
            return Err(QsimError::QubitConflict(q));
        }
        seen[q] = true;
    }
    for c in controls {
        if c.bit > 1 {
            return Err(QsimError::InvalidBitValue(c.bit));
        }
    }
    Ok(())
}

#[inline(always)]
fn controls_satisfied(num_qubits: usize, index: usize, controls: &[Control]) -> bool {
    controls.iter().all(|c| {
        let set = index & qubit_mask(num_qubits, c.qubit) != 0;
        set == (c.bit == 1)
    })
}

// ── Matrix gates ───────────────────────────────────────────────────────────

/// Apply a 2×2 gate to `target`.
pub fn apply_single_qubit_gate(
    reg: &mut AmplitudeRegister,
    target: usize,
    gate: &Matrix2x2,
) -> Result<()> {
    apply_controlled_gate(reg, &[], target, gate)
}

/// Apply an arbitrary matrix to `target`, rejecting anything but 2×2.
pub fn apply_matrix(reg: &mut AmplitudeRegister, target: usize, gate: &ComplexMatrix) -> Result<()> {
    let gate = gate.to_2x2()?;
    apply_single_qubit_gate(reg, target, &gate)
}

/// Apply a 2×2 gate to `target` on the subspace where every control holds.
pub fn apply_controlled_gate(
    reg: &mut AmplitudeRegister,
    controls: &[Control],
    target: usize,
    gate: &Matrix2x2,
) -> Result<()> {
    check_qubits(reg, controls, &[target])?;
    let n = reg.num_qubits();
    let offset = qubit_mask(n, target);
    let amps = reg.amplitudes_mut();

    for i in 0..amps.len() {
        if i & offset != 0 || !controls_satisfied(n, i, controls) {
            continue;
        }
        let j = i + offset;
        let a0 = amps[i];
        let a1 = amps[j];
        amps[i] = gate[0][0] * a0 + gate[0][1] * a1;
        amps[j] = gate[1][0] * a0 + gate[1][1] * a1;
    }

    reg.invalidate_measurements();
    trace!(target, controls = controls.len(), "applied 2x2 gate");
    Ok(())
}

// ── Permutation gates ──────────────────────────────────────────────────────

/// Multi-controlled bit flip: swaps each satisfying index with its
/// target-flipped partner. Covers X, CNOT, Toffoli and beyond.
pub fn mct(reg: &mut AmplitudeRegister, controls: &[Control], target: usize) -> Result<()> {
    check_qubits(reg, controls, &[target])?;
    let n = reg.num_qubits();
    let mask = qubit_mask(n, target);
    let amps = reg.amplitudes_mut();
    let mut visited = vec![false; amps.len()];

    for i in 0..amps.len() {
        if visited[i] || !controls_satisfied(n, i, controls) {
            continue;
        }
        let j = i ^ mask;
        amps.swap(i, j);
        visited[i] = true;
        visited[j] = true;
    }

    reg.invalidate_measurements();
    trace!(target, controls = controls.len(), "applied multi-controlled flip");
    Ok(())
}

/// Pauli-X as a permutation.
pub fn x(reg: &mut AmplitudeRegister, target: usize) -> Result<()> {
    mct(reg, &[], target)
}

/// CNOT: flips `target` when `control` is |1⟩.
pub fn cx(reg: &mut AmplitudeRegister, control: usize, target: usize) -> Result<()> {
    mct(reg, &[Control::on(control)], target)
}

/// Toffoli: flips `target` when both controls are |1⟩.
pub fn ccx(reg: &mut AmplitudeRegister, control0: usize, control1: usize, target: usize) -> Result<()> {
    mct(reg, &[Control::on(control0), Control::on(control1)], target)
}

/// SWAP: exchanges the states of two qubits.
pub fn swap(reg: &mut AmplitudeRegister, q0: usize, q1: usize) -> Result<()> {
    cswap(reg, None, q0, q1)
}

/// Controlled SWAP (Fredkin). With `control = None` this is a plain swap.
pub fn cswap(reg: &mut AmplitudeRegister, control: Option<Control>, q0: usize, q1: usize) -> Result<()> {
    let controls: Vec<Control> = control.into_iter().collect();
    check_qubits(reg, &controls, &[q0, q1])?;
    let (lo, hi) = if q0 < q1 { (q0, q1) } else { (q1, q0) };
    let n = reg.num_qubits();
    let col_lo = column_of_bit(n, lo);
    let col_hi = column_of_bit(n, hi);
    let flip = qubit_mask(n, lo) | qubit_mask(n, hi);
    let amps = reg.amplitudes_mut();
    let mut visited = vec![false; amps.len()];

    for i in 0..amps.len() {
        if visited[i] || col_lo[i] == col_hi[i] || !controls_satisfied(n, i, &controls) {
            continue;
        }
        let j = i ^ flip;
        amps.swap(i, j);
        visited[i] = true;
        visited[j] = true;
    }

    reg.invalidate_measurements();
    trace!(lo, hi, controlled = control.is_some(), "applied swap");
    Ok(())
}

// ── Diagonal phase gates ───────────────────────────────────────────────────

/// Multiply by e^(iθ) every amplitude whose `target` bit is 1 and whose
/// controls hold. The |0⟩ branch of a phase gate is the identity, so no
/// pairing is needed.
pub fn phase(reg: &mut AmplitudeRegister, controls: &[Control], target: usize, degrees: f64) -> Result<()> {
    check_qubits(reg, controls, &[target])?;
    let n = reg.num_qubits();
    let factor = phase_factor(degrees);
    let indices = indices_with_bit_set(n, target);
    let amps = reg.amplitudes_mut();

    for i in indices {
        if controls_satisfied(n, i, controls) {
            amps[i] = amps[i] * factor;
        }
    }

    reg.invalidate_measurements();
    trace!(target, degrees, controls = controls.len(), "applied phase");
    Ok(())
}

pub fn phase_t(reg: &mut AmplitudeRegister, target: usize) -> Result<()> {
    phase(reg, &[], target, 45.0)
}

pub fn phase_s(reg: &mut AmplitudeRegister, target: usize) -> Result<()> {
    phase(reg, &[], target, 90.0)
}

pub fn phase_z(reg: &mut AmplitudeRegister, target: usize) -> Result<()> {
    phase(reg, &[], target, 180.0)
}

/// Controlled phase; symmetric in `control` and `target`.
pub fn cphase(reg: &mut AmplitudeRegister, control: usize, target: usize, degrees: f64) -> Result<()> {
    phase(reg, &[Control::on(control)], target, degrees)
}

pub fn ct(reg: &mut AmplitudeRegister, control: usize, target: usize) -> Result<()> {
    cphase(reg, control, target, 45.0)
}

pub fn cs(reg: &mut AmplitudeRegister, control: usize, target: usize) -> Result<()> {
    cphase(reg, control, target, 90.0)
}

pub fn cz(reg: &mut AmplitudeRegister, control: usize, target: usize) -> Result<()> {
    cphase(reg, control, target, 180.0)
}

// ── Named-matrix shorthands ────────────────────────────────────────────────

pub fn h(reg: &mut AmplitudeRegister, target: usize) -> Result<()> {
    apply_single_qubit_gate(reg, target, &gates::hadamard())
}

pub fn y(reg: &mut AmplitudeRegister, target: usize) -> Result<()> {
    apply_single_qubit_gate(reg, target, &gates::pauli_y())
}

pub fn rx(reg: &mut AmplitudeRegister, target: usize, degrees: f64) -> Result<()> {
    apply_single_qubit_gate(reg, target, &gates::rx(degrees))
}

pub fn ry(reg: &mut AmplitudeRegister, target: usize, degrees: f64) -> Result<()> {
    apply_single_qubit_gate(reg, target, &gates::ry(degrees))
}

pub fn rz(reg: &mut AmplitudeRegister, target: usize, degrees: f64) -> Result<()> {
    apply_single_qubit_gate(reg, target, &gates::rz(degrees))
}

/// Controlled Hadamard.
pub fn ch(reg: &mut AmplitudeRegister, control: usize, target: usize) -> Result<()> {
    apply_controlled_gate(reg, &[Control::on(control)], target, &gates::hadamard())
}

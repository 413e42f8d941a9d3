/// Circuits: ordered, composable sequences of gate and measurement operations.
///
/// A circuit is pure sequencing. Each `Operation` is a descriptor naming the
/// engine call and its arguments; the register is supplied at execution time,
/// so the same circuit can be replayed against any register of sufficient
/// width. Oracles are ordinary circuits spliced into a host circuit with
/// [`Circuit::append_circuit`].
///
/// Design principles:
///   - One enum variant per engine routine, no string dispatch at runtime
///   - Angles stored in degrees, matching the engine
///   - Qubit indices validated against the circuit width when added
use crate::core::engine::{self, Control};
use crate::core::gates::{self, Matrix2x2};
use crate::core::measure;
use crate::core::register::AmplitudeRegister;
use crate::error::{QsimError, Result};
use rand::Rng;
use std::fmt;
use tracing::{debug, trace};

// ── Operation ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// 2×2 unitary on `target`, optionally controlled.
    Unitary {
        name: String,
        controls: Vec<Control>,
        target: usize,
        matrix: Matrix2x2,
    },
    /// Multi-controlled bit flip (X, CNOT, Toffoli, ...).
    Mct { controls: Vec<Control>, target: usize },
    /// SWAP, or Fredkin when `control` is set.
    Swap { control: Option<Control>, q0: usize, q1: usize },
    /// Diagonal e^(iθ) on the |1⟩ branch of `target`, optionally controlled.
    Phase { controls: Vec<Control>, target: usize, degrees: f64 },
    MeasureQubit(usize),
    MeasureAll,
}

impl Operation {
    /// Mnemonic used in listings and diagnostics.
    pub fn mnemonic(&self) -> &str {
        match self {
            Self::Unitary { name, .. } => name.as_str(),
            Self::Mct { controls, .. } => match controls.len() {
                0 => "X",
                1 => "CX",
                2 => "CCX",
                _ => "MCX",
            },
            Self::Swap { control: None, .. } => "SWAP",
            Self::Swap { control: Some(_), .. } => "CSWAP",
            Self::Phase { controls, .. } if controls.is_empty() => "PHASE",
            Self::Phase { .. } => "CPHASE",
            Self::MeasureQubit(_) => "MEASURE",
            Self::MeasureAll => "MEASURE_ALL",
        }
    }

    pub fn is_measurement(&self) -> bool {
        matches!(self, Self::MeasureQubit(_) | Self::MeasureAll)
    }

    /// Qubit indices referenced by this operation, controls first.
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Self::Unitary { controls, target, .. }
            | Self::Mct { controls, target }
            | Self::Phase { controls, target, .. } => controls
                .iter()
                .map(|c| c.qubit)
                .chain(std::iter::once(*target))
                .collect(),
            Self::Swap { control, q0, q1 } => control
                .iter()
                .map(|c| c.qubit)
                .chain([*q0, *q1])
                .collect(),
            Self::MeasureQubit(q) => vec![*q],
            Self::MeasureAll => vec![],
        }
    }

    /// Run this operation against `reg`. Returns a measured value, if any.
    fn apply<R: Rng + ?Sized>(&self, reg: &mut AmplitudeRegister, rng: &mut R) -> Result<Option<usize>> {
        match self {
            Self::Unitary { controls, target, matrix, .. } => {
                engine::apply_controlled_gate(reg, controls, *target, matrix)?
            }
            Self::Mct { controls, target } => engine::mct(reg, controls, *target)?,
            Self::Swap { control, q0, q1 } => engine::cswap(reg, *control, *q0, *q1)?,
            Self::Phase { controls, target, degrees } => engine::phase(reg, controls, *target, *degrees)?,
            Self::MeasureQubit(q) => {
                return Ok(Some(measure::measure_qubit(reg, *q, rng)? as usize));
            }
            Self::MeasureAll => return Ok(Some(measure::measure(reg, rng)?)),
        }
        Ok(None)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())?;
        match self {
            Self::Unitary { controls, target, .. } | Self::Mct { controls, target } => {
                for c in controls {
                    write!(f, " {c}")?;
                }
                write!(f, " q{target}")
            }
            Self::Phase { controls, target, degrees } => {
                for c in controls {
                    write!(f, " {c}")?;
                }
                write!(f, " q{target} {degrees}°")
            }
            Self::Swap { control, q0, q1 } => {
                if let Some(c) = control {
                    write!(f, " {c}")?;
                }
                write!(f, " q{q0} q{q1}")
            }
            Self::MeasureQubit(q) => write!(f, " q{q}"),
            Self::MeasureAll => Ok(()),
        }
    }
}

// ── Result types ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementRecord {
    /// `None` for a whole-register measurement.
    pub qubit: Option<usize>,
    /// Bit value for a qubit, basis index for the register.
    pub outcome: usize,
    /// Operation index at which this measurement occurred.
    pub step: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    pub num_qubits: usize,
    /// All measurement outcomes in execution order.
    pub measurements: Vec<MeasurementRecord>,
    /// Total gate operations applied.
    pub gate_count: usize,
}

impl ExecutionResult {
    /// Last measured outcome of qubit `q`, including bits implied by a
    /// later whole-register measurement.
    pub fn outcome(&self, qubit: usize) -> Option<u8> {
        self.measurements.iter().rev().find_map(|m| match m.qubit {
            Some(q) if q == qubit => Some(m.outcome as u8),
            None => Some(crate::core::bits::bit_at(self.num_qubits, m.outcome, qubit)),
            _ => None,
        })
    }

    /// Outcomes as a bit-string, qubit 0 first.
    /// Returns `None` if not every qubit was measured.
    pub fn bitstring(&self) -> Option<String> {
        (0..self.num_qubits)
            .map(|q| self.outcome(q).map(|b| if b == 1 { '1' } else { '0' }))
            .collect()
    }
}

// ── Circuit ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    operations: Vec<Operation>,
}

impl Circuit {
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            operations: Vec::new(),
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of non-measurement operations.
    pub fn gate_count(&self) -> usize {
        self.operations.iter().filter(|op| !op.is_measurement()).count()
    }

    /// Append one operation after validating its qubits against the width.
    pub fn add_gate(&mut self, op: Operation) -> Result<&mut Self> {
        let mut seen = vec![false; self.num_qubits];
        for q in op.qubits() {
            if q >= self.num_qubits {
                return Err(QsimError::QubitOutOfRange {
                    qubit: q,
                    num_qubits: self.num_qubits,
                });
            }
            if seen[q] {
                return Err(QsimError::QubitConflict(q));
            }
            seen[q] = true;
        }
        self.operations.push(op);
        Ok(self)
    }

    /// Splice every operation of `other` onto the end of this circuit.
    /// `other` is left untouched and stays independently executable.
    pub fn append_circuit(&mut self, other: &Circuit) -> Result<&mut Self> {
        if other.num_qubits > self.num_qubits {
            return Err(QsimError::DimensionMismatch {
                expected: self.num_qubits,
                found: other.num_qubits,
            });
        }
        self.operations.extend(other.operations.iter().cloned());
        Ok(self)
    }

    /// Replay every operation once, in insertion order, against `reg`.
    pub fn execute<R: Rng + ?Sized>(
        &self,
        reg: &mut AmplitudeRegister,
        rng: &mut R,
    ) -> Result<ExecutionResult> {
        if reg.num_qubits() < self.num_qubits {
            return Err(QsimError::DimensionMismatch {
                expected: self.num_qubits,
                found: reg.num_qubits(),
            });
        }

        let mut result = ExecutionResult {
            num_qubits: reg.num_qubits(),
            ..Default::default()
        };
        for (step, op) in self.operations.iter().enumerate() {
            trace!(step, %op, "executing");
            match op.apply(reg, rng)? {
                Some(outcome) => result.measurements.push(MeasurementRecord {
                    qubit: match op {
                        Operation::MeasureQubit(q) => Some(*q),
                        _ => None,
                    },
                    outcome,
                    step,
                }),
                None => result.gate_count += 1,
            }
        }
        debug!(
            operations = self.operations.len(),
            gates = result.gate_count,
            measurements = result.measurements.len(),
            "circuit executed"
        );
        Ok(result)
    }

    // ── Builder helpers ───────────────────────────────────────────────────

    /// Controlled (or, with no controls, plain) 2×2 unitary.
    pub fn unitary(
        &mut self,
        name: &str,
        controls: &[Control],
        target: usize,
        matrix: Matrix2x2,
    ) -> Result<&mut Self> {
        self.add_gate(Operation::Unitary {
            name: name.to_string(),
            controls: controls.to_vec(),
            target,
            matrix,
        })
    }

    pub fn h(&mut self, q: usize) -> Result<&mut Self> {
        self.unitary("H", &[], q, gates::hadamard())
    }

    pub fn y(&mut self, q: usize) -> Result<&mut Self> {
        self.unitary("Y", &[], q, gates::pauli_y())
    }

    pub fn rx(&mut self, q: usize, degrees: f64) -> Result<&mut Self> {
        self.unitary("RX", &[], q, gates::rx(degrees))
    }

    pub fn ry(&mut self, q: usize, degrees: f64) -> Result<&mut Self> {
        self.unitary("RY", &[], q, gates::ry(degrees))
    }

    pub fn rz(&mut self, q: usize, degrees: f64) -> Result<&mut Self> {
        self.unitary("RZ", &[], q, gates::rz(degrees))
    }

    pub fn ch(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.unitary("CH", &[Control::on(control)], target, gates::hadamard())
    }

    pub fn mct(&mut self, controls: &[Control], target: usize) -> Result<&mut Self> {
        self.add_gate(Operation::Mct {
            controls: controls.to_vec(),
            target,
        })
    }

    pub fn x(&mut self, q: usize) -> Result<&mut Self> {
        self.mct(&[], q)
    }

    pub fn cx(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.mct(&[Control::on(control)], target)
    }

    pub fn ccx(&mut self, control0: usize, control1: usize, target: usize) -> Result<&mut Self> {
        self.mct(&[Control::on(control0), Control::on(control1)], target)
    }

    pub fn phase(&mut self, controls: &[Control], target: usize, degrees: f64) -> Result<&mut Self> {
        self.add_gate(Operation::Phase {
            controls: controls.to_vec(),
            target,
            degrees,
        })
    }

    pub fn z(&mut self, q: usize) -> Result<&mut Self> {
        self.phase(&[], q, 180.0)
    }

    pub fn s(&mut self, q: usize) -> Result<&mut Self> {
        self.phase(&[], q, 90.0)
    }

    pub fn t(&mut self, q: usize) -> Result<&mut Self> {
        self.phase(&[], q, 45.0)
    }

    pub fn cphase(&mut self, control: usize, target: usize, degrees: f64) -> Result<&mut Self> {
        self.phase(&[Control::on(control)], target, degrees)
    }

    pub fn cz(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.cphase(control, target, 180.0)
    }

    pub fn swap(&mut self, q0: usize, q1: usize) -> Result<&mut Self> {
        self.add_gate(Operation::Swap { control: None, q0, q1 })
    }

    pub fn cswap(&mut self, control: usize, q0: usize, q1: usize) -> Result<&mut Self> {
        self.add_gate(Operation::Swap {
            control: Some(Control::on(control)),
            q0,
            q1,
        })
    }

    pub fn measure_qubit(&mut self, q: usize) -> Result<&mut Self> {
        self.add_gate(Operation::MeasureQubit(q))
    }

    pub fn measure(&mut self) -> Result<&mut Self> {
        self.add_gate(Operation::MeasureAll)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit ({} qubits, {} ops):", self.num_qubits, self.operations.len())?;
        for (i, op) in self.operations.iter().enumerate() {
            writeln!(f, "  {i:>3}: {op}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::complex::Complex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(17)
    }

    #[test]
    fn test_bell_circuit() {
        let mut c = Circuit::new(2);
        c.h(0).unwrap().cx(0, 1).unwrap();
        let mut reg = AmplitudeRegister::new(2).unwrap();
        let result = c.execute(&mut reg, &mut rng()).unwrap();
        assert_eq!(result.gate_count, 2);
        let r = Complex::new(FRAC_1_SQRT_2, 0.0);
        assert_eq!(reg.amplitudes(), &[r, Complex::zero(), Complex::zero(), r]);
    }

    #[test]
    fn test_execution_is_replayable() {
        let mut c = Circuit::new(1);
        c.x(0).unwrap();
        let mut reg = AmplitudeRegister::new(1).unwrap();
        c.execute(&mut reg, &mut rng()).unwrap();
        assert!((reg.probability(1) - 1.0).abs() < 1e-12);
        c.execute(&mut reg, &mut rng()).unwrap();
        assert!((reg.probability(0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_append_circuit_keeps_order() {
        let mut host = Circuit::new(3);
        host.h(0).unwrap();
        let mut oracle = Circuit::new(2);
        oracle.cx(0, 1).unwrap();
        host.append_circuit(&oracle).unwrap();
        host.measure().unwrap();
        let names: Vec<&str> = host.operations().iter().map(|op| op.mnemonic()).collect();
        assert_eq!(names, vec!["H", "CX", "MEASURE_ALL"]);
        // oracle untouched
        assert_eq!(oracle.len(), 1);
    }

    #[test]
    fn test_append_wider_circuit_rejected() {
        let mut host = Circuit::new(2);
        let wide = Circuit::new(3);
        assert_eq!(
            host.append_circuit(&wide).err(),
            Some(QsimError::DimensionMismatch { expected: 2, found: 3 })
        );
    }

    #[test]
    fn test_add_gate_validation() {
        let mut c = Circuit::new(2);
        assert_eq!(
            c.h(2).err(),
            Some(QsimError::QubitOutOfRange { qubit: 2, num_qubits: 2 })
        );
        assert_eq!(c.cx(1, 1).err(), Some(QsimError::QubitConflict(1)));
        assert!(c.is_empty());
    }

    #[test]
    fn test_narrow_register_rejected() {
        let c = Circuit::new(3);
        let mut reg = AmplitudeRegister::new(2).unwrap();
        assert!(matches!(
            c.execute(&mut reg, &mut rng()),
            Err(QsimError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_measurements_recorded() {
        let mut c = Circuit::new(3);
        c.x(0).unwrap().x(2).unwrap().measure_qubit(0).unwrap().measure().unwrap();
        let mut reg = AmplitudeRegister::new(3).unwrap();
        let result = c.execute(&mut reg, &mut rng()).unwrap();
        assert_eq!(
            result.measurements,
            vec![
                MeasurementRecord { qubit: Some(0), outcome: 1, step: 2 },
                MeasurementRecord { qubit: None, outcome: 0b101, step: 3 },
            ]
        );
        assert_eq!(result.bitstring().as_deref(), Some("101"));
    }

    #[test]
    fn test_bitstring_requires_all_qubits() {
        let mut c = Circuit::new(2);
        c.measure_qubit(1).unwrap();
        let mut reg = AmplitudeRegister::new(2).unwrap();
        let result = c.execute(&mut reg, &mut rng()).unwrap();
        assert_eq!(result.outcome(1), Some(0));
        assert_eq!(result.bitstring(), None);
    }

    #[test]
    fn test_display_listing() {
        let mut c = Circuit::new(3);
        c.h(0).unwrap().ccx(0, 1, 2).unwrap().cswap(0, 1, 2).unwrap().cphase(1, 2, 90.0).unwrap();
        let text = c.to_string();
        assert!(text.contains("H q0"));
        assert!(text.contains("CCX q0 q1 q2"));
        assert!(text.contains("CSWAP q0 q1 q2"));
        assert!(text.contains("CPHASE q1 q2 90°"));
    }
}

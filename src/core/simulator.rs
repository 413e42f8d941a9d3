/// High-level simulator interface.
///
/// `Simulator` owns a register together with the RNG that feeds its
/// measurements, so callers get a chaining API without threading an `Rng`
/// through every call:
///   - gate application (H, X, Y, Z, S, T, Rx, Ry, Rz, phase, CNOT, CZ,
///     SWAP, Toffoli, multi-controlled X)
///   - measurement with collapse and per-register caching
///   - deterministic mode (fixed seed) for reproducible runs
///   - circuit execution against the owned register
use super::engine::{self, Control};
use super::gates::Matrix2x2;
use super::measure;
use super::register::AmplitudeRegister;
use crate::circuit::{Circuit, ExecutionResult};
use crate::config::SimConfig;
use crate::error::Result;
use rand::rngs::StdRng;
use std::fmt;
use tracing::warn;

pub struct Simulator {
    register: AmplitudeRegister,
    rng: StdRng,
    config: SimConfig,
}

impl Simulator {
    /// Create a simulator for `num_qubits` qubits, initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Result<Self> {
        Self::with_config(num_qubits, SimConfig::default())
    }

    /// Fixed RNG seed for deterministic measurement outcomes.
    pub fn with_seed(num_qubits: usize, seed: u64) -> Result<Self> {
        Self::with_config(num_qubits, SimConfig::default().with_seed(seed))
    }

    pub fn with_config(num_qubits: usize, config: SimConfig) -> Result<Self> {
        Ok(Self::from_register(AmplitudeRegister::new(num_qubits)?, config))
    }

    /// Wrap an already prepared register.
    pub fn from_register(register: AmplitudeRegister, config: SimConfig) -> Self {
        let rng = config.rng();
        Self { register, rng, config }
    }

    pub fn num_qubits(&self) -> usize {
        self.register.num_qubits()
    }

    pub fn register(&self) -> &AmplitudeRegister {
        &self.register
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    // ── Single-Qubit Gates ────────────────────────────────────────────────

    pub fn h(&mut self, qubit: usize) -> Result<&mut Self> {
        engine::h(&mut self.register, qubit)?;
        Ok(self)
    }

    pub fn x(&mut self, qubit: usize) -> Result<&mut Self> {
        engine::x(&mut self.register, qubit)?;
        Ok(self)
    }

    pub fn y(&mut self, qubit: usize) -> Result<&mut Self> {
        engine::y(&mut self.register, qubit)?;
        Ok(self)
    }

    pub fn z(&mut self, qubit: usize) -> Result<&mut Self> {
        engine::phase_z(&mut self.register, qubit)?;
        Ok(self)
    }

    pub fn s(&mut self, qubit: usize) -> Result<&mut Self> {
        engine::phase_s(&mut self.register, qubit)?;
        Ok(self)
    }

    pub fn t(&mut self, qubit: usize) -> Result<&mut Self> {
        engine::phase_t(&mut self.register, qubit)?;
        Ok(self)
    }

    pub fn rx(&mut self, qubit: usize, degrees: f64) -> Result<&mut Self> {
        engine::rx(&mut self.register, qubit, degrees)?;
        Ok(self)
    }

    pub fn ry(&mut self, qubit: usize, degrees: f64) -> Result<&mut Self> {
        engine::ry(&mut self.register, qubit, degrees)?;
        Ok(self)
    }

    pub fn rz(&mut self, qubit: usize, degrees: f64) -> Result<&mut Self> {
        engine::rz(&mut self.register, qubit, degrees)?;
        Ok(self)
    }

    pub fn phase(&mut self, qubit: usize, degrees: f64) -> Result<&mut Self> {
        engine::phase(&mut self.register, &[], qubit, degrees)?;
        Ok(self)
    }

    // ── Multi-Qubit Gates ─────────────────────────────────────────────────

    pub fn cnot(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        engine::cx(&mut self.register, control, target)?;
        Ok(self)
    }

    pub fn cz(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        engine::cz(&mut self.register, control, target)?;
        Ok(self)
    }

    pub fn cphase(&mut self, control: usize, target: usize, degrees: f64) -> Result<&mut Self> {
        engine::cphase(&mut self.register, control, target, degrees)?;
        Ok(self)
    }

    pub fn swap(&mut self, qubit_a: usize, qubit_b: usize) -> Result<&mut Self> {
        engine::swap(&mut self.register, qubit_a, qubit_b)?;
        Ok(self)
    }

    pub fn toffoli(&mut self, control0: usize, control1: usize, target: usize) -> Result<&mut Self> {
        engine::ccx(&mut self.register, control0, control1, target)?;
        Ok(self)
    }

    pub fn mct(&mut self, controls: &[Control], target: usize) -> Result<&mut Self> {
        engine::mct(&mut self.register, controls, target)?;
        Ok(self)
    }

    // ── Custom Gate ───────────────────────────────────────────────────────

    pub fn apply(&mut self, gate: &Matrix2x2, qubit: usize) -> Result<&mut Self> {
        engine::apply_single_qubit_gate(&mut self.register, qubit, gate)?;
        Ok(self)
    }

    /// Replay `circuit` against the owned register.
    pub fn run(&mut self, circuit: &Circuit) -> Result<ExecutionResult> {
        let result = circuit.execute(&mut self.register, &mut self.rng)?;
        if !self.is_normalized() {
            warn!(
                total = self.register.total_probability(),
                tolerance = self.config.tolerance,
                "register drifted from unit norm"
            );
        }
        Ok(result)
    }

    // ── Measurement ───────────────────────────────────────────────────────

    /// Measure a single qubit. Collapses the register. Returns 0 or 1.
    pub fn measure(&mut self, qubit: usize) -> Result<u8> {
        measure::measure_qubit(&mut self.register, qubit, &mut self.rng)
    }

    /// Measure the whole register and return the basis index.
    pub fn measure_register(&mut self) -> Result<usize> {
        measure::measure(&mut self.register, &mut self.rng)
    }

    /// Measure every qubit in order, qubit 0 first.
    pub fn measure_all(&mut self) -> Result<Vec<u8>> {
        (0..self.num_qubits()).map(|q| self.measure(q)).collect()
    }

    /// Measure all qubits and return a bit-string (e.g. "01101"), qubit 0 first.
    pub fn measure_all_string(&mut self) -> Result<String> {
        Ok(self
            .measure_all()?
            .iter()
            .map(|&b| if b == 1 { '1' } else { '0' })
            .collect())
    }

    /// Probabilities of each basis state, without collapsing.
    pub fn probabilities(&self) -> Vec<f64> {
        self.register.probabilities()
    }

    /// Σ|αᵢ|² within the configured tolerance of 1.
    pub fn is_normalized(&self) -> bool {
        self.register.is_normalized(self.config.tolerance)
    }

    /// Probability of `qubit` measuring as |1⟩.
    pub fn qubit_probability_one(&self, qubit: usize) -> Result<f64> {
        measure::probability_of_qubit(&self.register, qubit)
    }

    // ── State Control ─────────────────────────────────────────────────────

    /// Reset to |0...0⟩, clear all measurements and restart the RNG.
    pub fn reset(&mut self) {
        self.register.reset();
        self.rng = self.config.rng();
    }

    pub fn print_state(&self) {
        print!("{}", self.register);
    }
}

impl fmt::Display for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.register)?;
        write!(f, "Measurements: [")?;
        for q in 0..self.num_qubits() {
            match self.register.measured_qubit(q) {
                Some(bit) => write!(f, "q{}={}", q, bit)?,
                None => write!(f, "q{}=?", q)?,
            }
            if q + 1 < self.num_qubits() {
                write!(f, ", ")?;
            }
        }
        writeln!(f, "]")
    }
}

/// Amplitude register: the joint state of N qubits.
///
/// An n-qubit register has 2^n basis states and holds one complex amplitude
/// per basis state, indexed MSB-first (see [`super::bits`]).
/// The vector must satisfy the normalization constraint Σ|αᵢ|² = 1 whenever
/// control returns to the caller.
///
/// The register also carries the measurement caches that make collapse
/// happen once: a per-qubit outcome slot and a whole-register outcome slot.
use super::bits;
use super::complex::Complex;
use super::matrix::tensor_vectors;
use crate::error::{QsimError, Result};
use std::fmt;
use tracing::debug;

/// Tolerance for the Σ|αᵢ|² = 1 check.
pub const NORM_TOLERANCE: f64 = 1e-5;

/// Largest register we allow; 2^30 amplitudes is already 16 GiB.
pub const MAX_QUBITS: usize = 30;

// ── Qubit ──────────────────────────────────────────────────────────────────

/// A single prepared qubit α|0⟩ + β|1⟩, used to build product states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Qubit {
    alpha: Complex,
    beta: Complex,
}

impl Qubit {
    /// Fails unless |α|² + |β|² ≈ 1.
    pub fn new(alpha: Complex, beta: Complex) -> Result<Self> {
        let norm = alpha.modulus_squared() + beta.modulus_squared();
        if (norm - 1.0).abs() > NORM_TOLERANCE {
            return Err(QsimError::InvalidRegisterConstruction(format!(
                "qubit amplitudes not normalized (|a|^2 + |b|^2 = {norm})"
            )));
        }
        Ok(Self { alpha, beta })
    }

    pub fn zero() -> Self {
        Self { alpha: Complex::one(), beta: Complex::zero() }
    }

    pub fn one() -> Self {
        Self { alpha: Complex::zero(), beta: Complex::one() }
    }

    /// |+⟩ = (|0⟩ + |1⟩) / √2
    pub fn plus() -> Self {
        let h = Complex::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        Self { alpha: h, beta: h }
    }

    /// |−⟩ = (|0⟩ − |1⟩) / √2
    pub fn minus() -> Self {
        let h = Complex::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        Self { alpha: h, beta: -h }
    }

    pub fn amplitudes(&self) -> [Complex; 2] {
        [self.alpha, self.beta]
    }
}

// ── AmplitudeRegister ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AmplitudeRegister {
    num_qubits: usize,
    amplitudes: Vec<Complex>,
    measured_qubits: Vec<Option<u8>>,
    measured_index: Option<usize>,
}

impl AmplitudeRegister {
    /// Create a register initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        let mut amplitudes = vec![Complex::zero(); 1 << num_qubits];
        amplitudes[0] = Complex::one();
        debug!(num_qubits, "register initialized to |0...0>");
        Ok(Self::from_parts(num_qubits, amplitudes))
    }

    /// Tensor product of independently prepared qubits, qubit 0 first.
    pub fn from_qubits(qubits: &[Qubit]) -> Result<Self> {
        check_qubit_count(qubits.len())?;
        let amplitudes = qubits
            .iter()
            .fold(vec![Complex::one()], |acc, q| tensor_vectors(&acc, &q.amplitudes()));
        debug!(num_qubits = qubits.len(), "register built from product state");
        Ok(Self::from_parts(qubits.len(), amplitudes))
    }

    /// Register holding an explicit amplitude vector.
    ///
    /// The length must be a power of two, at least 2, and the vector must be
    /// normalized.
    pub fn from_states(amplitudes: Vec<Complex>) -> Result<Self> {
        let len = amplitudes.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(QsimError::InvalidRegisterConstruction(format!(
                "amplitude count {len} is not a power of two >= 2"
            )));
        }
        let num_qubits = len.trailing_zeros() as usize;
        check_qubit_count(num_qubits)?;
        check_normalized(&amplitudes)?;
        debug!(num_qubits, "register built from explicit amplitudes");
        Ok(Self::from_parts(num_qubits, amplitudes))
    }

    fn from_parts(num_qubits: usize, amplitudes: Vec<Complex>) -> Self {
        Self {
            num_qubits,
            amplitudes,
            measured_qubits: vec![None; num_qubits],
            measured_index: None,
        }
    }

    #[inline(always)]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimension of the state space: 2^n
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn amplitudes(&self) -> &[Complex] {
        &self.amplitudes
    }

    /// Swap in a whole new amplitude vector of the same size.
    /// Measurement caches are cleared because the old outcomes no longer hold.
    pub fn replace_amplitudes(&mut self, amplitudes: Vec<Complex>) -> Result<()> {
        if amplitudes.len() != self.dim() {
            return Err(QsimError::DimensionMismatch {
                expected: self.dim(),
                found: amplitudes.len(),
            });
        }
        check_normalized(&amplitudes)?;
        self.amplitudes = amplitudes;
        self.invalidate_measurements();
        Ok(())
    }

    /// Raw mutable view for the gate and measurement engines.
    #[inline(always)]
    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex] {
        &mut self.amplitudes
    }

    /// Probability of basis state `index`: |αᵢ|²
    #[inline(always)]
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes[index].modulus_squared()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.modulus_squared()).collect()
    }

    /// Total probability (≈ 1.0 for every observable register)
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.modulus_squared()).sum()
    }

    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.total_probability() - 1.0).abs() <= tolerance
    }

    /// Re-normalize to unit length. A zero vector is left untouched; any
    /// positive total, however small, is scaled back to one.
    pub(crate) fn normalize(&mut self) {
        let total = self.total_probability();
        if total < f64::MIN_POSITIVE {
            return;
        }
        let inv_norm = 1.0 / total.sqrt();
        for amp in self.amplitudes.iter_mut() {
            *amp = amp.scale(inv_norm);
        }
    }

    /// Reset to |0...0⟩ and forget every measurement.
    pub fn reset(&mut self) {
        for amp in self.amplitudes.iter_mut() {
            *amp = Complex::zero();
        }
        self.amplitudes[0] = Complex::one();
        self.invalidate_measurements();
    }

    pub fn validate_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(QsimError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    // ── Measurement caches ────────────────────────────────────────────────

    /// Cached outcome of `qubit`, if it has collapsed.
    pub fn measured_qubit(&self, qubit: usize) -> Option<u8> {
        self.measured_qubits.get(qubit).copied().flatten()
    }

    /// Cached whole-register outcome, if the register has collapsed.
    pub fn measured_index(&self) -> Option<usize> {
        self.measured_index
    }

    pub(crate) fn cache_qubit(&mut self, qubit: usize, bit: u8) {
        self.measured_qubits[qubit] = Some(bit);
    }

    pub(crate) fn cache_index(&mut self, index: usize) {
        self.measured_index = Some(index);
    }

    /// Basis index assembled from the per-qubit cache, once every qubit is known.
    pub(crate) fn index_from_cache(&self) -> Option<usize> {
        let bits: Option<Vec<u8>> = self.measured_qubits.iter().copied().collect();
        bits.map(|b| bits::index_from_bits(&b))
    }

    pub(crate) fn invalidate_measurements(&mut self) {
        self.measured_qubits.iter_mut().for_each(|m| *m = None);
        self.measured_index = None;
    }

    // ── Display helpers ───────────────────────────────────────────────────

    /// Ket label of basis state `index`, qubit 0 leftmost.
    pub fn basis_label(&self, index: usize) -> String {
        bits::bits_of_index(self.num_qubits, index)
            .into_iter()
            .map(|b| if b == 1 { '1' } else { '0' })
            .collect()
    }
}

fn check_qubit_count(num_qubits: usize) -> Result<()> {
    if num_qubits == 0 {
        return Err(QsimError::InvalidRegisterConstruction(
            "at least one qubit required".into(),
        ));
    }
    if num_qubits > MAX_QUBITS {
        return Err(QsimError::InvalidRegisterConstruction(format!(
            "{num_qubits} qubits exceeds the limit of {MAX_QUBITS}"
        )));
    }
    Ok(())
}

fn check_normalized(amplitudes: &[Complex]) -> Result<()> {
    let total: f64 = amplitudes.iter().map(|a| a.modulus_squared()).sum();
    if (total - 1.0).abs() > NORM_TOLERANCE {
        return Err(QsimError::InvalidRegisterConstruction(format!(
            "amplitudes not normalized (sum of squares = {total})"
        )));
    }
    Ok(())
}

impl fmt::Display for AmplitudeRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AmplitudeRegister ({} qubits, dim={}):", self.num_qubits, self.dim())?;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let prob = amp.modulus_squared();
            if prob > 1e-12 {
                writeln!(
                    f,
                    "  |{}⟩  amplitude: {}  probability: {:.4}",
                    self.basis_label(i),
                    amp,
                    prob
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let reg = AmplitudeRegister::new(2).unwrap();
        assert_eq!(reg.dim(), 4);
        assert_eq!(reg.amplitudes()[0], Complex::one());
        for i in 1..4 {
            assert_eq!(reg.amplitudes()[i], Complex::zero());
        }
        assert!(reg.is_normalized(NORM_TOLERANCE));
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert!(matches!(
            AmplitudeRegister::new(0),
            Err(QsimError::InvalidRegisterConstruction(_))
        ));
        assert!(AmplitudeRegister::new(MAX_QUBITS + 1).is_err());
    }

    #[test]
    fn test_from_qubits_tensor_order() {
        // |1⟩ ⊗ |0⟩ = |10⟩, basis index 2
        let reg = AmplitudeRegister::from_qubits(&[Qubit::one(), Qubit::zero()]).unwrap();
        assert_eq!(reg.num_qubits(), 2);
        assert!((reg.probability(2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_qubits_superposition() {
        let reg = AmplitudeRegister::from_qubits(&[Qubit::plus(), Qubit::minus()]).unwrap();
        let amps = reg.amplitudes();
        assert_eq!(amps[0], Complex::new(0.5, 0.0));
        assert_eq!(amps[1], Complex::new(-0.5, 0.0));
        assert_eq!(amps[2], Complex::new(0.5, 0.0));
        assert_eq!(amps[3], Complex::new(-0.5, 0.0));
    }

    #[test]
    fn test_from_states_validation() {
        let three = vec![Complex::one(), Complex::zero(), Complex::zero()];
        assert!(matches!(
            AmplitudeRegister::from_states(three),
            Err(QsimError::InvalidRegisterConstruction(_))
        ));
        let single = vec![Complex::one()];
        assert!(AmplitudeRegister::from_states(single).is_err());
        let unnormalized = vec![Complex::one(), Complex::one()];
        assert!(AmplitudeRegister::from_states(unnormalized).is_err());

        let ok = AmplitudeRegister::from_states(vec![
            Complex::zero(),
            Complex::one(),
            Complex::zero(),
            Complex::zero(),
        ])
        .unwrap();
        assert_eq!(ok.num_qubits(), 2);
    }

    #[test]
    fn test_qubit_validation() {
        assert!(Qubit::new(Complex::one(), Complex::one()).is_err());
        assert!(Qubit::new(Complex::new(0.6, 0.0), Complex::new(0.0, 0.8)).is_ok());
    }

    #[test]
    fn test_replace_amplitudes() {
        let mut reg = AmplitudeRegister::new(1).unwrap();
        reg.cache_qubit(0, 0);
        reg.replace_amplitudes(vec![Complex::zero(), Complex::one()]).unwrap();
        assert_eq!(reg.measured_qubit(0), None);
        assert!(matches!(
            reg.replace_amplitudes(vec![Complex::one(); 4]),
            Err(QsimError::DimensionMismatch { expected: 2, found: 4 })
        ));
    }

    #[test]
    fn test_normalize() {
        let mut reg = AmplitudeRegister::new(1).unwrap();
        reg.amplitudes_mut()[0] = Complex::new(2.0, 0.0);
        reg.normalize();
        assert!(reg.is_normalized(1e-12));
    }

    #[test]
    fn test_basis_label_msb_first() {
        let reg = AmplitudeRegister::new(3).unwrap();
        assert_eq!(reg.basis_label(0), "000");
        assert_eq!(reg.basis_label(1), "001");
        assert_eq!(reg.basis_label(4), "100");
        assert_eq!(reg.basis_label(6), "110");
    }

    #[test]
    fn test_index_from_cache() {
        let mut reg = AmplitudeRegister::new(2).unwrap();
        reg.cache_qubit(0, 1);
        assert_eq!(reg.index_from_cache(), None);
        reg.cache_qubit(1, 0);
        assert_eq!(reg.index_from_cache(), Some(2));
    }

    #[test]
    fn test_reset_clears_caches() {
        let mut reg = AmplitudeRegister::new(2).unwrap();
        reg.amplitudes_mut()[0] = Complex::zero();
        reg.amplitudes_mut()[3] = Complex::one();
        reg.cache_index(3);
        reg.reset();
        assert_eq!(reg.amplitudes()[0], Complex::one());
        assert_eq!(reg.measured_index(), None);
    }
}

/// Named single-qubit gate matrices.
///
/// Gates are pure data: 2×2 complex unitaries with no register attached.
/// Parameterized gates take their angle in **degrees**; the conversion to
/// radians happens here so callers never mix units.
///
/// Application lives in [`super::engine`].
use super::complex::Complex;
use super::matrix::ComplexMatrix;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// A 2×2 complex unitary matrix representing a single-qubit gate.
/// Row-major: matrix[row][col]
pub type Matrix2x2 = [[Complex; 2]; 2];

/// θ_rad = θ_deg · π / 180
#[inline(always)]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// e^(iθ) for an angle given in degrees.
#[inline(always)]
pub fn phase_factor(degrees: f64) -> Complex {
    Complex::cis(deg_to_rad(degrees))
}

// ── Standard Gate Matrices ─────────────────────────────────────────────────

/// Identity gate: no-op, useful for circuit padding.
pub fn identity() -> Matrix2x2 {
    [
        [Complex::one(),  Complex::zero()],
        [Complex::zero(), Complex::one()],
    ]
}

/// Hadamard gate: creates superposition from a basis state.
/// H = (1/√2) * [[1, 1], [1, -1]]
pub fn hadamard() -> Matrix2x2 {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    [
        [h, h],
        [h, -h],
    ]
}

/// Pauli-X gate: quantum NOT, flips |0⟩ ↔ |1⟩.
pub fn pauli_x() -> Matrix2x2 {
    [
        [Complex::zero(), Complex::one()],
        [Complex::one(),  Complex::zero()],
    ]
}

/// Pauli-Y gate: bit + phase flip.
/// Y = [[0, -i], [i, 0]]
pub fn pauli_y() -> Matrix2x2 {
    [
        [Complex::zero(), -Complex::i()],
        [Complex::i(),    Complex::zero()],
    ]
}

/// Pauli-Z gate: phase flip, |1⟩ → -|1⟩.
pub fn pauli_z() -> Matrix2x2 {
    phase(180.0)
}

/// S gate: quarter-turn phase, [[1, 0], [0, i]].
pub fn s_gate() -> Matrix2x2 {
    phase(90.0)
}

/// T gate: eighth-turn phase, [[1, 0], [0, e^(iπ/4)]].
pub fn t_gate() -> Matrix2x2 {
    phase(45.0)
}

/// Phase gate: applies e^(iθ) to |1⟩.
/// P(θ) = [[1, 0], [0, e^(iθ)]]
pub fn phase(degrees: f64) -> Matrix2x2 {
    [
        [Complex::one(),  Complex::zero()],
        [Complex::zero(), phase_factor(degrees)],
    ]
}

/// Rotation around X axis.
/// Rx(θ) = [[cos(θ/2), -i·sin(θ/2)], [-i·sin(θ/2), cos(θ/2)]]
pub fn rx(degrees: f64) -> Matrix2x2 {
    let half = deg_to_rad(degrees) / 2.0;
    let cos = Complex::new(half.cos(), 0.0);
    let i_sin = Complex::new(0.0, -half.sin());
    [
        [cos,   i_sin],
        [i_sin, cos],
    ]
}

/// Rotation around Y axis.
/// Ry(θ) = [[cos(θ/2), -sin(θ/2)], [sin(θ/2), cos(θ/2)]]
pub fn ry(degrees: f64) -> Matrix2x2 {
    let half = deg_to_rad(degrees) / 2.0;
    let cos = Complex::new(half.cos(), 0.0);
    let sin = Complex::new(half.sin(), 0.0);
    [
        [cos, -sin],
        [sin, cos],
    ]
}

/// Rotation around Z axis.
/// Rz(θ) = [[e^(-iθ/2), 0], [0, e^(iθ/2)]]
pub fn rz(degrees: f64) -> Matrix2x2 {
    let half = deg_to_rad(degrees) / 2.0;
    [
        [Complex::cis(-half), Complex::zero()],
        [Complex::zero(),     Complex::cis(half)],
    ]
}

// ── Properties ─────────────────────────────────────────────────────────────

/// G · G† = I within `tolerance`.
pub fn is_unitary(gate: &Matrix2x2, tolerance: f64) -> bool {
    ComplexMatrix::from(*gate).is_unitary(tolerance)
}

/// G · G = I within `tolerance`.
pub fn is_involutory(gate: &Matrix2x2, tolerance: f64) -> bool {
    let g = ComplexMatrix::from(*gate);
    match g.mul(&g) {
        Ok(sq) => sq.approx_eq(&ComplexMatrix::identity(2), tolerance),
        Err(_) => false,
    }
}

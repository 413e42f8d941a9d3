/// A complex number with 64-bit floating-point components.
///
/// Represents amplitudes in the register's state vector.
/// Values are immutable: every operation returns a new `Complex`.
use crate::error::{QsimError, Result};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Decimal places used by the default tolerance comparison.
pub const DEFAULT_DECIMALS: i32 = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    #[inline(always)]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    #[inline(always)]
    pub const fn zero() -> Self {
        Self { re: 0.0, im: 0.0 }
    }

    #[inline(always)]
    pub const fn one() -> Self {
        Self { re: 1.0, im: 0.0 }
    }

    /// Imaginary unit i
    #[inline(always)]
    pub const fn i() -> Self {
        Self { re: 0.0, im: 1.0 }
    }

    /// Euler's formula: r·e^(iθ) = r·cos(θ) + i·r·sin(θ)
    #[inline(always)]
    pub fn from_polar(r: f64, theta: f64) -> Self {
        Self {
            re: r * theta.cos(),
            im: r * theta.sin(),
        }
    }

    /// Unit phase e^(iθ), θ in radians.
    #[inline(always)]
    pub fn cis(theta: f64) -> Self {
        Self::from_polar(1.0, theta)
    }

    /// Scale by a real scalar
    #[inline(always)]
    pub fn scale(&self, s: f64) -> Self {
        Self {
            re: self.re * s,
            im: self.im * s,
        }
    }

    /// Squared magnitude: |z|² = re² + im²
    #[inline(always)]
    pub fn modulus_squared(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Magnitude: |z| = sqrt(re² + im²)
    #[inline(always)]
    pub fn modulus(&self) -> f64 {
        self.modulus_squared().sqrt()
    }

    /// Component-wise absolute value.
    #[inline(always)]
    pub fn abs(&self) -> Self {
        Self {
            re: self.re.abs(),
            im: self.im.abs(),
        }
    }

    /// Complex conjugate: z* = re - im·i
    #[inline(always)]
    pub fn conjugate(&self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }

    /// Checked division. Fails when `rhs` is exactly zero.
    pub fn checked_div(&self, rhs: Self) -> Result<Self> {
        let denom = rhs.modulus_squared();
        if denom == 0.0 {
            return Err(QsimError::DivisionByZeroComplex);
        }
        Ok(Self {
            re: (self.re * rhs.re + self.im * rhs.im) / denom,
            im: (self.im * rhs.re - self.re * rhs.im) / denom,
        })
    }

    /// Both square roots, principal root first.
    ///
    /// re' = sqrt((|z| + re) / 2), im' = ±sqrt((|z| - re) / 2) where the sign
    /// follows the sign of `im` (zero counts as non-negative).
    pub fn sqrt(&self) -> (Self, Self) {
        let m = self.modulus();
        let re = ((m + self.re) / 2.0).max(0.0).sqrt();
        let im = ((m - self.re) / 2.0).max(0.0).sqrt();
        let im = if self.im < 0.0 { -im } else { im };
        let root = Self::new(re, im);
        (root, -root)
    }

    /// Bit-exact equality of both components.
    #[inline(always)]
    pub fn equals(&self, other: &Self) -> bool {
        self.re == other.re && self.im == other.im
    }

    /// Equality after rounding both components to `decimals` decimal places.
    pub fn equals_close(&self, other: &Self, decimals: i32) -> bool {
        let factor = 10f64.powi(decimals);
        let round = |x: f64| (x * factor).round() / factor;
        round(self.re) == round(other.re) && round(self.im) == round(other.im)
    }

    /// Check near-zero within epsilon
    #[inline(always)]
    pub fn is_zero(&self, epsilon: f64) -> bool {
        self.modulus_squared() < epsilon * epsilon
    }
}

impl Add for Complex {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl Sub for Complex {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

/// Complex multiplication: (a + bi)(c + di) = (ac - bd) + (ad + bc)i
impl Mul for Complex {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl Mul<f64> for Complex {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Complex {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

impl PartialEq for Complex {
    fn eq(&self, other: &Self) -> bool {
        self.equals_close(other, DEFAULT_DECIMALS)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im >= 0.0 {
            write!(f, "{:.6} + {:.6}i", self.re, self.im)
        } else {
            write!(f, "{:.6} - {:.6}i", self.re, self.im.abs())
        }
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Self { re, im: 0.0 }
    }
}

impl From<(f64, f64)> for Complex {
    fn from((re, im): (f64, f64)) -> Self {
        Self { re, im }
    }
}

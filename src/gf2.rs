/// Linear algebra over GF(2), used to recover Simon's hidden string.
///
/// Input is a set of n-1 measurement vectors y of length n, each satisfying
/// s·y ≡ 0 (mod 2). Gaussian elimination modulo 2 takes them to reduced row
/// echelon form; the one column without a pivot is free, and setting it to 1
/// fixes every other bit of s.
///
/// Over GF(2) subtraction is XOR and there is no scaling step. The pivot for
/// column c is the first not-yet-placed row with a 1 there: rows are stably
/// partitioned so every "has 1" row precedes every "has 0" row.
use crate::error::{QsimError, Result};
use tracing::{debug, trace};

pub type BitVector = Vec<u8>;

/// `dst ^= src`, element-wise.
pub fn xor_into(dst: &mut [u8], src: &[u8]) -> Result<()> {
    if dst.len() != src.len() {
        return Err(QsimError::DimensionMismatch {
            expected: dst.len(),
            found: src.len(),
        });
    }
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
    Ok(())
}

/// Inner product mod 2.
pub fn dot(a: &[u8], b: &[u8]) -> Result<u8> {
    if a.len() != b.len() {
        return Err(QsimError::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(a.iter().zip(b).fold(0, |acc, (x, y)| acc ^ (x & y)))
}

pub fn is_zero(v: &[u8]) -> bool {
    v.iter().all(|&b| b == 0)
}

fn check_no_zero_rows(rows: &[BitVector]) -> Result<()> {
    if rows.iter().any(|r| is_zero(r)) {
        return Err(QsimError::LinearlyDependentMeasurements);
    }
    Ok(())
}

/// Recover the nonzero kernel vector of `n - 1` independent equations in
/// `n` unknowns.
///
/// Fails with [`QsimError::LinearlyDependentMeasurements`] when the rows do
/// not have full rank; callers should draw a fresh batch and retry.
pub fn solve(measurements: &[BitVector]) -> Result<BitVector> {
    let m = measurements.len();
    if m == 0 {
        return Err(QsimError::DimensionMismatch { expected: 1, found: 0 });
    }
    let n = m + 1;
    for row in measurements {
        if row.len() != n {
            return Err(QsimError::DimensionMismatch {
                expected: n,
                found: row.len(),
            });
        }
        if let Some(&bad) = row.iter().find(|&&b| b > 1) {
            return Err(QsimError::InvalidBitValue(bad));
        }
    }

    let mut rows: Vec<BitVector> = measurements.to_vec();
    check_no_zero_rows(&rows)?;

    // Forward elimination to row echelon form.
    let mut pivots: Vec<usize> = Vec::with_capacity(m);
    for col in 0..n {
        let placed = pivots.len();
        if placed == m {
            break;
        }
        let (mut ones, zeros): (Vec<BitVector>, Vec<BitVector>) =
            rows.drain(placed..).partition(|r| r[col] == 1);
        if ones.is_empty() {
            rows.extend(zeros);
            trace!(col, "no pivot");
            continue;
        }
        let pivot = ones[0].clone();
        for row in ones.iter_mut().skip(1) {
            xor_into(row, &pivot)?;
        }
        rows.extend(ones);
        rows.extend(zeros);
        pivots.push(col);
        trace!(col, row = placed, "pivot placed");
        check_no_zero_rows(&rows)?;
    }
    if pivots.len() < m {
        return Err(QsimError::LinearlyDependentMeasurements);
    }

    // Back substitution to reduced row echelon form.
    for i in 1..m {
        let col = pivots[i];
        let later = rows[i].clone();
        for row in rows.iter_mut().take(i) {
            if row[col] == 1 {
                xor_into(row, &later)?;
            }
        }
    }

    let free = (0..n).find(|c| !pivots.contains(c)).unwrap_or(n - 1);
    let mut secret = vec![0u8; n];
    secret[free] = 1;
    for (row, &col) in rows.iter().zip(&pivots) {
        secret[col] = row[free];
    }
    debug!(n, free, ?secret, "GF(2) system solved");
    Ok(secret)
}

/// Oracle circuits for the textbook query algorithms.
///
/// Every oracle acts on `n` input qubits (indices `0..n`, qubit 0 the most
/// significant bit of x) followed by its ancilla qubits, and computes
/// |x⟩|y⟩ → |x⟩|y ⊕ f(x)⟩ using only X and CNOT.
use crate::circuit::Circuit;
use crate::error::{QsimError, Result};

/// Reject anything that is not a 0/1 vector.
pub(crate) fn validate_bits(bits: &[u8]) -> Result<()> {
    match bits.iter().find(|&&b| b > 1) {
        Some(&bad) => Err(QsimError::InvalidBitValue(bad)),
        None => Ok(()),
    }
}

fn validate_secret(secret: &[u8]) -> Result<()> {
    if secret.is_empty() {
        return Err(QsimError::InvalidSecret("secret must have at least one bit".into()));
    }
    validate_bits(secret)
}

/// f(x) = `value` for every x. Width n + 1.
pub fn deutsch_jozsa_constant(n: usize, value: u8) -> Result<Circuit> {
    if value > 1 {
        return Err(QsimError::InvalidBitValue(value));
    }
    let mut circuit = Circuit::new(n + 1);
    if value == 1 {
        circuit.x(n)?;
    }
    Ok(circuit)
}

/// f(x) = mask · x (mod 2). Balanced for any nonzero mask. Width n + 1.
pub fn deutsch_jozsa_balanced(n: usize, mask: &[u8]) -> Result<Circuit> {
    if mask.len() != n {
        return Err(QsimError::DimensionMismatch {
            expected: n,
            found: mask.len(),
        });
    }
    validate_bits(mask)?;
    if mask.iter().all(|&b| b == 0) {
        return Err(QsimError::InvalidSecret(
            "an all-zero mask gives a constant function".into(),
        ));
    }
    let mut circuit = Circuit::new(n + 1);
    for (i, _) in mask.iter().enumerate().filter(|&(_, &b)| b == 1) {
        circuit.cx(i, n)?;
    }
    Ok(circuit)
}

/// f(x) = s · x (mod 2). Width n + 1, ancilla last.
pub fn bernstein_vazirani(secret: &[u8]) -> Result<Circuit> {
    validate_secret(secret)?;
    let n = secret.len();
    let mut circuit = Circuit::new(n + 1);
    for (i, _) in secret.iter().enumerate().filter(|&(_, &b)| b == 1) {
        circuit.cx(i, n)?;
    }
    Ok(circuit)
}

/// Two-to-one function with f(x) = f(x ⊕ s). Width 2n: inputs `0..n`,
/// outputs `n..2n`.
///
/// Copies x into the output register, then, conditioned on bit k of x
/// (the first set bit of s), XORs s into it. x and x ⊕ s differ at k, so
/// both land on the same output value.
pub fn simon(secret: &[u8]) -> Result<Circuit> {
    validate_secret(secret)?;
    let n = secret.len();
    let pivot = secret
        .iter()
        .position(|&b| b == 1)
        .ok_or_else(|| QsimError::InvalidSecret("secret must be nonzero".into()))?;

    let mut circuit = Circuit::new(2 * n);
    for i in 0..n {
        circuit.cx(i, n + i)?;
    }
    for (j, _) in secret.iter().enumerate().filter(|&(_, &b)| b == 1) {
        circuit.cx(pivot, n + j)?;
    }
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bits::{bits_of_index, index_from_bits};
    use crate::core::engine::x;
    use crate::core::register::AmplitudeRegister;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Run `oracle` on the classical input `input` (ancillas zero) and read
    /// back the ancilla bits.
    fn evaluate(oracle: &Circuit, n: usize, input: usize) -> Vec<u8> {
        let width = oracle.num_qubits();
        let mut reg = AmplitudeRegister::new(width).unwrap();
        for (q, bit) in bits_of_index(n, input).into_iter().enumerate() {
            if bit == 1 {
                x(&mut reg, q).unwrap();
            }
        }
        let mut rng = StdRng::seed_from_u64(0);
        oracle.execute(&mut reg, &mut rng).unwrap();
        let index = reg.probabilities().iter().position(|&p| p > 0.5).unwrap();
        bits_of_index(width, index)[n..].to_vec()
    }

    #[test]
    fn test_constant_oracles() {
        for value in [0u8, 1] {
            let oracle = deutsch_jozsa_constant(3, value).unwrap();
            for input in 0..8 {
                assert_eq!(evaluate(&oracle, 3, input), vec![value]);
            }
        }
        assert_eq!(deutsch_jozsa_constant(3, 2), Err(QsimError::InvalidBitValue(2)));
    }

    #[test]
    fn test_balanced_oracle_is_balanced() {
        let oracle = deutsch_jozsa_balanced(3, &[1, 0, 1]).unwrap();
        let ones: usize = (0..8).map(|i| evaluate(&oracle, 3, i)[0] as usize).sum();
        assert_eq!(ones, 4);
    }

    #[test]
    fn test_balanced_rejects_bad_masks() {
        assert!(matches!(
            deutsch_jozsa_balanced(3, &[0, 0, 0]),
            Err(QsimError::InvalidSecret(_))
        ));
        assert!(matches!(
            deutsch_jozsa_balanced(3, &[1, 0]),
            Err(QsimError::DimensionMismatch { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_bernstein_vazirani_inner_product() {
        let secret = [1u8, 1, 0, 1];
        let oracle = bernstein_vazirani(&secret).unwrap();
        for input in 0..16 {
            let bits = bits_of_index(4, input);
            let expected = bits.iter().zip(&secret).fold(0, |acc, (a, b)| acc ^ (a & b));
            assert_eq!(evaluate(&oracle, 4, input), vec![expected]);
        }
    }

    #[test]
    fn test_simon_two_to_one() {
        let secret = [0u8, 1, 1];
        let oracle = simon(&secret).unwrap();
        let s = index_from_bits(&secret);
        for input in 0..8 {
            assert_eq!(evaluate(&oracle, 3, input), evaluate(&oracle, 3, input ^ s));
        }
        // exactly 4 distinct images
        let mut images: Vec<Vec<u8>> = (0..8).map(|i| evaluate(&oracle, 3, i)).collect();
        images.sort();
        images.dedup();
        assert_eq!(images.len(), 4);
    }

    #[test]
    fn test_simon_rejects_zero_secret() {
        assert!(matches!(simon(&[0, 0]), Err(QsimError::InvalidSecret(_))));
        assert!(matches!(simon(&[]), Err(QsimError::InvalidSecret(_))));
        assert_eq!(simon(&[1, 3]), Err(QsimError::InvalidBitValue(3)));
    }
}

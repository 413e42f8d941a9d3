//! Basis-index bit arithmetic.
//!
//! Convention used everywhere in the crate: in an `n`-qubit register, qubit 0
//! is the **most significant** bit of the basis index. For `n = 3` the index
//! `0b100` is the state |100⟩ with qubit 0 set.

/// Mask selecting `qubit`'s bit inside an `num_qubits`-wide basis index.
#[inline(always)]
pub fn qubit_mask(num_qubits: usize, qubit: usize) -> usize {
    1 << (num_qubits - 1 - qubit)
}

/// Value (0 or 1) of `qubit` in `basis_index`.
#[inline(always)]
pub fn bit_at(num_qubits: usize, basis_index: usize, qubit: usize) -> u8 {
    ((basis_index >> (num_qubits - 1 - qubit)) & 1) as u8
}

/// Every basis index whose `qubit` bit is 1, in ascending order.
/// Always exactly `2^(num_qubits - 1)` entries.
pub fn indices_with_bit_set(num_qubits: usize, qubit: usize) -> Vec<usize> {
    let mask = qubit_mask(num_qubits, qubit);
    (0..1usize << num_qubits).filter(|i| i & mask != 0).collect()
}

/// `bit_at` for every basis index, precomputed as one column.
pub fn column_of_bit(num_qubits: usize, qubit: usize) -> Vec<u8> {
    (0..1usize << num_qubits)
        .map(|i| bit_at(num_qubits, i, qubit))
        .collect()
}

/// Pack a bit string (qubit 0 first) into a basis index.
pub fn index_from_bits(bits: &[u8]) -> usize {
    bits.iter().fold(0, |acc, &b| (acc << 1) | (b & 1) as usize)
}

/// Unpack a basis index into `num_qubits` bits, qubit 0 first.
pub fn bits_of_index(num_qubits: usize, basis_index: usize) -> Vec<u8> {
    (0..num_qubits)
        .map(|q| bit_at(num_qubits, basis_index, q))
        .collect()
}

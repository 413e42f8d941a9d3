/// Textbook query algorithms expressed as circuits.
///
/// Each driver builds its circuit, executes it against a fresh register
/// with the caller's RNG and decodes the measured bits:
///   - Deutsch–Jozsa: constant vs. balanced in one query
///   - Bernstein–Vazirani: s from f(x) = s · x
///   - Simon: hidden period, finished by the GF(2) solver
///   - QFT and the Draper adder
pub mod bernstein_vazirani;
pub mod deutsch_jozsa;
pub mod oracles;
pub mod qft;
pub mod simon;

pub use deutsch_jozsa::Verdict;

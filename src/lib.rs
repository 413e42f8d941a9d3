//! # astraqsim
//!
//! Amplitude-vector quantum circuit simulator.
//!
//! An n-qubit register holds 2^n complex amplitudes; qubit 0 is the most
//! significant bit of the basis index. Gates act in place, measurement
//! collapses the register and caches its outcomes, and circuits are
//! replayable lists of operation descriptors.
//!
//! ## Quick Start
//!
//! ```rust
//! use astraqsim::core::Simulator;
//!
//! # fn main() -> astraqsim::Result<()> {
//! // Create a 2-qubit simulator with a fixed seed
//! let mut sim = Simulator::with_seed(2, 7)?;
//!
//! // Build a Bell state: (|00⟩ + |11⟩) / √2
//! sim.h(0)?.cnot(0, 1)?;
//!
//! // Inspect probabilities (no collapse)
//! let probs = sim.probabilities();
//! assert!((probs[0] - 0.5).abs() < 1e-10);
//! assert!((probs[3] - 0.5).abs() < 1e-10);
//!
//! // Measure: collapses the state
//! let bits = sim.measure_all()?;
//! assert_eq!(bits[0], bits[1]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Circuits
//!
//! ```rust
//! use astraqsim::circuit::Circuit;
//! use astraqsim::core::AmplitudeRegister;
//! use rand::SeedableRng;
//!
//! # fn main() -> astraqsim::Result<()> {
//! let mut circuit = Circuit::new(2);
//! circuit.x(0)?.swap(0, 1)?.measure()?;
//!
//! let mut reg = AmplitudeRegister::new(2)?;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let result = circuit.execute(&mut reg, &mut rng)?;
//! assert_eq!(result.bitstring().as_deref(), Some("01"));
//! # Ok(())
//! # }
//! ```

pub mod algorithms;
pub mod circuit;
pub mod config;
pub mod core;
pub mod error;
pub mod gf2;

pub use circuit::{Circuit, ExecutionResult, Operation};
pub use config::SimConfig;
pub use error::{QsimError, Result};

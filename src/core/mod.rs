pub mod bits;
pub mod complex;
pub mod engine;
pub mod gates;
pub mod matrix;
pub mod measure;
pub mod register;
pub mod simulator;

// Convenience re-exports for library users
pub use complex::Complex;
pub use engine::Control;
pub use gates::Matrix2x2;
pub use matrix::ComplexMatrix;
pub use register::{AmplitudeRegister, Qubit};
pub use simulator::Simulator;

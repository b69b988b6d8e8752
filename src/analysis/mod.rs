pub mod fidelity;

pub use fidelity::*;

//! Core types, window functions, and FFT helpers.

pub mod fft;
pub mod types;
pub mod window;

pub use types::*;
pub use window::{apply_window, generate_window, normalize_window, triangular_window, WindowType};

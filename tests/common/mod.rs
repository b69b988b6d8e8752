#![allow(dead_code)]

use std::f64::consts::PI;

use sinemodel::analysis::fidelity::{diff_snr, Snr};
use sinemodel::{Band, Resolution, WindowType};

pub const SR: u32 = 44100;

/// Sum of sines `(freq_hz, amplitude)`, computed in f64 and stored as f32.
pub fn gen_tones(tones: &[(f64, f64)], sr: u32, n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = i as f64 / sr as f64;
            tones
                .iter()
                .map(|&(freq, amp)| amp * (2.0 * PI * freq * t).sin())
                .sum::<f64>() as f32
        })
        .collect()
}

pub fn gen_sine(freq_hz: f64, amp: f64, sr: u32, n: usize) -> Vec<f32> {
    gen_tones(&[(freq_hz, amp)], sr, n)
}

/// Deterministic pseudo-random noise in `[-amp, amp]` (xorshift).
pub fn gen_noise(seed: u64, amp: f32, n: usize) -> Vec<f32> {
    let mut state = seed.max(1);
    (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            amp * (2.0 * unit - 1.0) as f32
        })
        .collect()
}

/// SNR over `original[margin .. len - margin]`, skipping the ramped edges.
pub fn interior_snr(original: &[f32], reconstructed: &[f32], margin: usize) -> Snr {
    let end = original.len() - margin;
    diff_snr(&original[margin..end], &reconstructed[margin..end])
        .expect("interior SNR should be defined")
}

pub fn interior_snr_db(original: &[f32], reconstructed: &[f32], margin: usize) -> f64 {
    match interior_snr(original, reconstructed, margin) {
        Snr::Decibels(db) => db,
        Snr::Perfect => f64::INFINITY,
    }
}

pub fn max_abs_diff(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}

/// Blackman-Harris three-band layout split at 1 kHz and 5 kHz.
pub fn bh_three_band() -> Vec<Resolution> {
    vec![
        Resolution::with_window_type(WindowType::BlackmanHarris, 4095, 4096, Band::new(0.0, 1000.0)),
        Resolution::with_window_type(
            WindowType::BlackmanHarris,
            2047,
            2048,
            Band::new(1000.0, 5000.0),
        ),
        Resolution::with_window_type(
            WindowType::BlackmanHarris,
            1023,
            1024,
            Band::new(5000.0, 22050.0),
        ),
    ]
}

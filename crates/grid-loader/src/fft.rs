//! Real discrete Fourier transforms along z.
//!
//! Conventions: the forward transform is normalised by `1/n`, the inverse is
//! not, so `irfft(rfft(x)) == x`. Only the `n/2 + 1` non-negative frequencies
//! are stored; the negative ones are their complex conjugates.

use num_complex::Complex64;
use std::f64::consts::TAU;

/// Forward transform of `samples`, returning `n/2 + 1` coefficients.
pub fn rfft(samples: &[f64]) -> Vec<Complex64> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }

    (0..=n / 2)
        .map(|mode| {
            let sum: Complex64 = samples
                .iter()
                .enumerate()
                .map(|(k, &x)| {
                    let phase = -TAU * ((mode * k) % n) as f64 / n as f64;
                    Complex64::from_polar(x, phase)
                })
                .sum();
            sum / n as f64
        })
        .collect()
}

/// Inverse transform of `n/2 + 1` coefficients into the `n = out.len()` samples of `out`.
///
/// Missing coefficients are treated as zero. Only the real part of the DC
/// term (and of the Nyquist term when `n` is even) contributes.
pub fn irfft(coeffs: &[Complex64], out: &mut [f64]) {
    let n = out.len();
    if n == 0 {
        return;
    }

    let coeff = |mode: usize| coeffs.get(mode).copied().unwrap_or_default();
    let last_paired = (n - 1) / 2;
    let nyquist = (n % 2 == 0).then(|| coeff(n / 2).re);

    for (k, sample) in out.iter_mut().enumerate() {
        let mut sum = coeff(0).re;
        for mode in 1..=last_paired {
            let c = coeff(mode);
            let phase = TAU * ((mode * k) % n) as f64 / n as f64;
            sum += 2.0 * (c.re * phase.cos() - c.im * phase.sin());
        }
        if let Some(re) = nyquist {
            sum += if k % 2 == 0 { re } else { -re };
        }
        *sample = sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn test_dc_only() {
        let mut out = [0.0; 5];
        irfft(&[Complex64::new(2.5, 7.0)], &mut out);
        assert!(out.iter().all(|&v| (v - 2.5).abs() < TOL));
    }

    #[test]
    fn test_single_cosine() {
        let n = 8;
        let mut coeffs = vec![Complex64::default(); n / 2 + 1];
        coeffs[1] = Complex64::new(0.5, 0.0);
        let mut out = vec![0.0; n];
        irfft(&coeffs, &mut out);
        for (k, v) in out.iter().enumerate() {
            let expected = (TAU * k as f64 / n as f64).cos();
            assert!((v - expected).abs() < TOL, "k={}: {} vs {}", k, v, expected);
        }
    }

    #[test]
    fn test_round_trip_even_and_odd() {
        for n in [1usize, 2, 5, 8, 9] {
            let samples: Vec<f64> = (0..n).map(|k| (k as f64 * 0.7).sin() + 0.3 * k as f64).collect();
            let mut back = vec![0.0; n];
            irfft(&rfft(&samples), &mut back);
            for (a, b) in samples.iter().zip(&back) {
                assert!((a - b).abs() < 1e-9, "n={}: {} vs {}", n, a, b);
            }
        }
    }
}

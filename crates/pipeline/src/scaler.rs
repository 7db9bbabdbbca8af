//! Column standardization (zero mean, unit variance).
//!
//! The scaler is always fitted on the training rows only and then applied to
//! the test rows and to the full table for final predictions. It is never
//! refitted on held-out data.

use ndarray::{Array1, Array2, Axis};

/// Per-column mean/standard-deviation scaling fitted from a matrix.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl StandardScaler {
    /// Fit column statistics. Uses the population standard deviation;
    /// zero-variance columns get a scale of 1 so constant features pass
    /// through centred instead of dividing by zero.
    pub fn fit(x: &Array2<f64>) -> Self {
        let n = x.nrows();
        let cols = x.ncols();
        if n == 0 {
            return Self {
                mean: Array1::zeros(cols),
                std: Array1::ones(cols),
            };
        }

        let mean = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(cols));
        let mut std = Array1::ones(cols);
        for j in 0..cols {
            let variance = x
                .column(j)
                .iter()
                .map(|v| (v - mean[j]).powi(2))
                .sum::<f64>()
                / n as f64;
            let sd = variance.sqrt();
            if sd > 0.0 {
                std[j] = sd;
            }
        }
        Self { mean, std }
    }

    /// Apply the fitted statistics to a matrix with the same column layout.
    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        (x - &self.mean) / &self.std
    }
}

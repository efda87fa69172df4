//! Deterministic search for Holt-Winters smoothing parameters
//!
//! A coarse grid over (α, β, γ, φ) picks a starting point, then coordinate
//! descent with a shrinking step refines it. The objective is the sum of
//! squared one-step-ahead errors.

use crate::holt_winters::{smooth_from, HoltWintersParams, SmoothingRun, SmoothingState};
use crate::{MathError, Result};

const SMOOTHING_BOUNDS: (f64, f64) = (1e-4, 0.9999);
const DAMPING_BOUNDS: (f64, f64) = (0.8, 0.995);

/// Search configuration
#[derive(Debug, Clone)]
pub struct ParamSearch {
    /// Candidate values for α, β and γ
    pub smoothing_grid: Vec<f64>,
    /// Candidate values for φ
    pub damping_grid: Vec<f64>,
    /// Number of refinement rounds after the grid
    pub refine_rounds: usize,
    /// Coordinate step of the first refinement round, halved each round
    pub initial_step: f64,
}

impl Default for ParamSearch {
    fn default() -> Self {
        Self {
            smoothing_grid: vec![0.05, 0.2, 0.4, 0.6, 0.8, 0.95],
            damping_grid: vec![0.8, 0.9, 0.98],
            refine_rounds: 6,
            initial_step: 0.1,
        }
    }
}

impl ParamSearch {
    fn validate(&self) -> Result<()> {
        if self.smoothing_grid.is_empty() || self.damping_grid.is_empty() {
            return Err(MathError::InvalidInput(
                "Parameter grids must not be empty".to_string(),
            ));
        }
        if !self.initial_step.is_finite() || self.initial_step <= 0.0 {
            return Err(MathError::InvalidInput(format!(
                "Initial step must be positive, got {}",
                self.initial_step
            )));
        }
        Ok(())
    }
}

/// Find the parameters minimizing the one-step SSE of `data`
///
/// Returns the chosen parameters together with the run they produce.
pub fn fit_params(
    data: &[f64],
    period: usize,
    search: &ParamSearch,
) -> Result<(HoltWintersParams, SmoothingRun)> {
    search.validate()?;
    if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(format!(
            "Non-finite observation at index {}",
            pos
        )));
    }
    let initial = SmoothingState::initial(data, period)?;

    let objective = |params: &HoltWintersParams| -> f64 {
        let sse = smooth_from(data, initial.clone(), params).sse;
        if sse.is_finite() {
            sse
        } else {
            f64::INFINITY
        }
    };

    let mut best: Option<(HoltWintersParams, f64)> = None;
    for &alpha in &search.smoothing_grid {
        for &beta in &search.smoothing_grid {
            for &gamma in &search.smoothing_grid {
                for &phi in &search.damping_grid {
                    let candidate = clamp(HoltWintersParams {
                        alpha,
                        beta,
                        gamma,
                        phi,
                    });
                    let sse = objective(&candidate);
                    if best.map_or(true, |(_, b)| sse < b) {
                        best = Some((candidate, sse));
                    }
                }
            }
        }
    }

    let (mut params, mut best_sse) = best.ok_or_else(|| {
        MathError::CalculationError("Parameter grid produced no candidate".to_string())
    })?;

    let mut step = search.initial_step;
    for _ in 0..search.refine_rounds {
        for coordinate in 0..4 {
            for direction in [-1.0, 1.0] {
                let candidate = clamp(nudge(params, coordinate, direction * step));
                let sse = objective(&candidate);
                if sse < best_sse {
                    params = candidate;
                    best_sse = sse;
                }
            }
        }
        step /= 2.0;
    }

    if !best_sse.is_finite() {
        return Err(MathError::CalculationError(
            "No parameter set produced a finite fit".to_string(),
        ));
    }

    let run = smooth_from(data, initial, &params);
    Ok((params, run))
}

fn nudge(mut params: HoltWintersParams, coordinate: usize, delta: f64) -> HoltWintersParams {
    match coordinate {
        0 => params.alpha += delta,
        1 => params.beta += delta,
        2 => params.gamma += delta,
        _ => params.phi += delta,
    }
    params
}

fn clamp(params: HoltWintersParams) -> HoltWintersParams {
    let (lo, hi) = SMOOTHING_BOUNDS;
    HoltWintersParams {
        alpha: params.alpha.clamp(lo, hi),
        beta: params.beta.clamp(lo, hi),
        gamma: params.gamma.clamp(lo, hi),
        phi: params.phi.clamp(DAMPING_BOUNDS.0, DAMPING_BOUNDS.1),
    }
}

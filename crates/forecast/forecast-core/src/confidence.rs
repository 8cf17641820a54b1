//! Confidence interval implementations
//!
//! Bands are symmetric normal intervals around the point forecast:
//! `forecast ± z · std_error`.

use forecast_spi::{ConfidenceInterval, ConfidenceIntervalComputer};
use serde::{Deserialize, Serialize};

/// Forecast with confidence intervals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastWithConfidence {
    /// Point forecast
    pub forecast: Vec<f64>,
    /// Lower bound of confidence interval
    pub lower: Vec<f64>,
    /// Upper bound of confidence interval
    pub upper: Vec<f64>,
    /// Confidence level (e.g., 0.80 for 80%)
    pub confidence_level: f64,
}

impl From<ForecastWithConfidence> for ConfidenceInterval {
    fn from(f: ForecastWithConfidence) -> Self {
        ConfidenceInterval {
            forecast: f.forecast,
            lower: f.lower,
            upper: f.upper,
            confidence_level: f.confidence_level,
        }
    }
}

impl ForecastWithConfidence {
    /// Create from point forecast and standard errors
    pub fn from_standard_errors(
        forecast: Vec<f64>,
        std_errors: &[f64],
        confidence_level: f64,
    ) -> Self {
        let z = z_score(confidence_level);

        let lower = forecast
            .iter()
            .zip(std_errors.iter())
            .map(|(&f, &se)| f - z * se)
            .collect();

        let upper = forecast
            .iter()
            .zip(std_errors.iter())
            .map(|(&f, &se)| f + z * se)
            .collect();

        Self {
            forecast,
            lower,
            upper,
            confidence_level,
        }
    }
}

/// Normal-approximation interval computer
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalIntervalComputer;

impl NormalIntervalComputer {
    pub fn new() -> Self {
        Self
    }
}

impl ConfidenceIntervalComputer for NormalIntervalComputer {
    fn compute(
        &self,
        forecast: &[f64],
        std_errors: &[f64],
        confidence_level: f64,
    ) -> ConfidenceInterval {
        ForecastWithConfidence::from_standard_errors(
            forecast.to_vec(),
            std_errors,
            confidence_level,
        )
        .into()
    }
}

/// Two-sided z-score for a confidence level in (0, 1).
///
/// Common levels use tabulated values; others use Acklam's rational
/// approximation of the normal quantile.
pub fn z_score(confidence_level: f64) -> f64 {
    const TABLE: [(f64, f64); 5] = [
        (0.80, 1.281_551_565_5),
        (0.90, 1.644_853_626_9),
        (0.95, 1.959_963_984_5),
        (0.98, 2.326_347_874_0),
        (0.99, 2.575_829_303_5),
    ];
    if let Some((_, z)) = TABLE
        .iter()
        .find(|(level, _)| (level - confidence_level).abs() < 1e-9)
    {
        return *z;
    }
    let level = confidence_level.clamp(1e-6, 1.0 - 1e-9);
    normal_quantile(0.5 + level / 2.0)
}

/// Inverse of the standard normal CDF for `p` in (0, 1).
fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const P_LOW: f64 = 0.024_25;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

//! Gaussian kernel density estimation for per-zone interval curves.

use std::f64::consts::PI;

use serde::Serialize;

/// Grid extends this many bandwidths past the sample range on each side
const GRID_PADDING_BANDWIDTHS: f64 = 3.0;

const MIN_GRID_POINTS: usize = 2;

/// A smoothed frequency curve sampled on an even grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub bandwidth: f64,
    /// (x, density) pairs, x ascending
    pub points: Vec<(f64, f64)>,
}

impl Distribution {
    /// Gaussian KDE with Scott's rule bandwidth, `sigma * n^(-1/5)`.
    ///
    /// Fewer than two distinct values have no spread to scale by, so a unit
    /// bandwidth is used. No samples gives an empty curve.
    pub fn smooth(values: &[f64], grid_points: usize) -> Self {
        if values.is_empty() {
            return Self {
                bandwidth: 0.0,
                points: Vec::new(),
            };
        }

        let bandwidth = scott_bandwidth(values);
        let grid_points = grid_points.max(MIN_GRID_POINTS);

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        let start = min - GRID_PADDING_BANDWIDTHS * bandwidth;
        let end = max + GRID_PADDING_BANDWIDTHS * bandwidth;
        let step = (end - start) / (grid_points - 1) as f64;

        let norm = 1.0 / (values.len() as f64 * bandwidth * (2.0 * PI).sqrt());
        let points = (0..grid_points)
            .map(|i| {
                let x = start + step * i as f64;
                let density = values
                    .iter()
                    .map(|v| {
                        let z = (x - v) / bandwidth;
                        (-0.5 * z * z).exp()
                    })
                    .sum::<f64>()
                    * norm;
                (x, density)
            })
            .collect();

        Self { bandwidth, points }
    }

    /// Trapezoidal integral of the curve
    pub fn area(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum()
    }
}

fn scott_bandwidth(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 2 {
        return 1.0;
    }
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let sigma = variance.sqrt();
    if sigma > 0.0 {
        sigma * n.powf(-0.2)
    } else {
        1.0
    }
}

/// One zone's smoothed interval distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneCurve {
    pub zone: String,
    pub count: usize,
    pub max: u32,
    pub distribution: Distribution,
}

impl ZoneCurve {
    /// Legend label, e.g. `zone 3 (412)`
    pub fn label(&self) -> String {
        format!("zone {} ({})", self.zone, self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let d = Distribution::smooth(&[], 100);
        assert!(d.points.is_empty());
        assert_eq!(d.area(), 0.0);
    }

    #[test]
    fn test_density_integrates_to_one() {
        let values = [120.0, 150.0, 180.0, 200.0, 260.0, 300.0, 900.0];
        let d = Distribution::smooth(&values, 400);
        assert_eq!(d.points.len(), 400);
        assert!((d.area() - 1.0).abs() < 0.01, "area {}", d.area());
    }

    #[test]
    fn test_scott_bandwidth() {
        // sample sd of [1, 2, 3, 4, 5] is sqrt(2.5)
        let d = Distribution::smooth(&[1.0, 2.0, 3.0, 4.0, 5.0], 10);
        let expected = 2.5f64.sqrt() * 5f64.powf(-0.2);
        assert!((d.bandwidth - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_value_uses_unit_bandwidth() {
        let d = Distribution::smooth(&[60.0], 61);
        assert_eq!(d.bandwidth, 1.0);
        let (x0, _) = d.points[0];
        let (x_last, _) = d.points[60];
        assert!((x0 - 57.0).abs() < 1e-9);
        assert!((x_last - 63.0).abs() < 1e-9);
        // peak sits on the sample
        let (peak_x, peak) = d.points[30];
        assert!((peak_x - 60.0).abs() < 1e-9);
        assert!((peak - 1.0 / (2.0 * PI).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_grid_points_floor() {
        let d = Distribution::smooth(&[1.0, 2.0], 0);
        assert_eq!(d.points.len(), 2);
    }

    #[test]
    fn test_label() {
        let curve = ZoneCurve {
            zone: "3".to_string(),
            count: 412,
            max: 3600,
            distribution: Distribution::smooth(&[1.0], 2),
        };
        assert_eq!(curve.label(), "zone 3 (412)");
    }
}

//! Axis Scales
//!
//! - [`LogAxis`]: whole decades, ticks at powers of ten
//! - [`LinearAxis`]: 5% margin, ticks at 1/2/5 × 10^k steps
//!
//! Both map a data value to a fraction in `[0, 1]` of the plot extent.

/// Axis tick: position in data units and its label
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Data value at the tick
    pub value: f64,
    /// Text drawn next to the tick
    pub label: String,
}

/// Approximate number of intervals on a linear axis
const TARGET_TICKS: f64 = 8.0;

/// Padding added to each end of a log axis, in decades
const LOG_PADDING: f64 = 0.05;

/// Base-10 logarithmic axis spanning whole decades
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogAxis {
    min_exp: i32,
    max_exp: i32,
}

impl LogAxis {
    /// Smallest decade range containing `[min, max]`; both must be > 0
    pub fn covering(min: f64, max: f64) -> Self {
        let mut min_exp = min.log10().floor() as i32;
        let mut max_exp = max.log10().ceil() as i32;
        if min_exp == max_exp {
            min_exp -= 1;
            max_exp += 1;
        }
        Self { min_exp, max_exp }
    }

    /// Fraction of the axis at which `value` sits
    pub fn fraction(&self, value: f64) -> f64 {
        let lo = self.min_exp as f64 - LOG_PADDING;
        let hi = self.max_exp as f64 + LOG_PADDING;
        (value.log10() - lo) / (hi - lo)
    }

    /// One tick per decade
    pub fn ticks(&self) -> Vec<Tick> {
        (self.min_exp..=self.max_exp)
            .map(|exp| Tick {
                value: 10f64.powi(exp),
                label: decade_label(exp),
            })
            .collect()
    }
}

fn decade_label(exp: i32) -> String {
    if (0..=6).contains(&exp) {
        format!("{}", 10u64.pow(exp as u32))
    } else {
        format!("1e{}", exp)
    }
}

/// Linear axis with "nice" tick spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearAxis {
    min: f64,
    max: f64,
    step: f64,
}

impl LinearAxis {
    /// Range containing `[min, max]` plus a 5% margin.
    ///
    /// Non-negative data keeps a lower bound of at least zero.
    pub fn covering(min: f64, max: f64) -> Self {
        let (mut lo, mut hi) = if (max - min).abs() < f64::EPSILON {
            let pad = (max.abs() * 0.1).max(1.0);
            (min - pad, max + pad)
        } else {
            let pad = (max - min) * 0.05;
            (min - pad, max + pad)
        };
        if min >= 0.0 {
            lo = lo.max(0.0);
        }
        if hi <= lo {
            hi = lo + 1.0;
        }
        Self {
            min: lo,
            max: hi,
            step: nice_step((hi - lo) / TARGET_TICKS),
        }
    }

    /// Fraction of the axis at which `value` sits
    pub fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    /// Ticks at multiples of the step inside the range
    pub fn ticks(&self) -> Vec<Tick> {
        let decimals = if self.step >= 1.0 {
            0
        } else {
            (-self.step.log10().floor()) as usize
        };

        let mut ticks = Vec::new();
        let first = (self.min / self.step).ceil() as i64;
        let last = (self.max / self.step + 1e-9).floor() as i64;
        for k in first..=last {
            let value = k as f64 * self.step;
            ticks.push(Tick {
                value,
                label: format!("{:.*}", decimals, value),
            });
        }
        ticks
    }
}

/// Round `raw` up to 1, 2 or 5 times a power of ten
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_axis_decades() {
        let axis = LogAxis::covering(10.0, 10_000.0);
        assert_eq!((axis.min_exp, axis.max_exp), (1, 4));

        let labels: Vec<_> = axis.ticks().into_iter().map(|t| t.label).collect();
        assert_eq!(labels, vec!["10", "100", "1000", "10000"]);
    }

    #[test]
    fn test_log_axis_partial_decades_round_outward() {
        let axis = LogAxis::covering(25.0, 2500.0);
        assert_eq!((axis.min_exp, axis.max_exp), (1, 4));
    }

    #[test]
    fn test_log_axis_single_value_widens() {
        let axis = LogAxis::covering(1000.0, 1000.0);
        assert_eq!((axis.min_exp, axis.max_exp), (2, 4));
        assert!((axis.fraction(1000.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_log_axis_fraction_is_monotonic_and_inside() {
        let axis = LogAxis::covering(1.0, 100_000.0);
        let a = axis.fraction(1.0);
        let b = axis.fraction(100.0);
        let c = axis.fraction(100_000.0);
        assert!(0.0 < a && a < b && b < c && c < 1.0);
    }

    #[test]
    fn test_large_decade_label() {
        let axis = LogAxis::covering(1e6, 1e8);
        let labels: Vec<_> = axis.ticks().into_iter().map(|t| t.label).collect();
        assert_eq!(labels, vec!["1000000", "1e7", "1e8"]);
    }

    #[test]
    fn test_nice_step() {
        assert!((nice_step(0.13) - 0.2).abs() < 1e-12);
        assert!((nice_step(3.0) - 5.0).abs() < 1e-12);
        assert!((nice_step(480.0) - 500.0).abs() < 1e-9);
        assert!((nice_step(7.0) - 10.0).abs() < 1e-12);
        assert!((nice_step(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_axis_covers_data() {
        let axis = LinearAxis::covering(40.0, 2500.0);
        assert_eq!(axis.min, 0.0);
        assert!(axis.max >= 2500.0);
        assert!(axis.fraction(40.0) > 0.0);
        assert!(axis.fraction(2500.0) < 1.0);

        let ticks = axis.ticks();
        assert!(ticks.len() >= 4);
        assert_eq!(ticks[0].label, "0");
        assert!(ticks.windows(2).all(|w| w[0].value < w[1].value));
        assert!(ticks.iter().all(|t| t.value <= axis.max));
    }

    #[test]
    fn test_linear_axis_flat_data() {
        let axis = LinearAxis::covering(50.0, 50.0);
        assert!(axis.min < 50.0 && axis.max > 50.0);
        assert!((axis.fraction(50.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_fractional_tick_labels() {
        let axis = LinearAxis::covering(1.0, 2.0);
        let ticks = axis.ticks();
        assert!(ticks.iter().any(|t| t.label.contains('.')));
    }
}

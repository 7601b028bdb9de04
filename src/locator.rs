//! Fixed step tick locations and the text that goes with them.
use crate::{
    error::{Result, TephiError},
    geometry::{Viewport, XYCoords},
    transforms::{temperature_theta_to_pressure_temperature, xy_to_temperature_theta},
};
use log::warn;
use metfor::Quantity;
use std::convert::TryFrom;

/// Generates evenly spaced ticks covering a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    step: i64,
}

impl Locator {
    /// Create a locator with ticks every `step` units.
    pub fn new(step: i64) -> Result<Self> {
        if step <= 0 {
            return Err(TephiError::InvalidInput(format!(
                "locator step must be positive, got {}",
                step
            )));
        }

        Ok(Locator { step })
    }

    /// The spacing between ticks.
    #[inline]
    pub fn step(&self) -> i64 {
        self.step
    }

    /// The ticks covering `start` to `stop`.
    ///
    /// Both ends are truncated to integers and then rounded down to a multiple of the step. The
    /// return value is the ticks, how many there are, and a scale factor that is always 1. An end
    /// that is not finite or does not fit in an `i64` gives no ticks.
    ///
    /// ```
    /// use tephigram::Locator;
    ///
    /// let (ticks, count, factor) = Locator::new(10).unwrap().locate(-45.0, 23.0);
    /// assert_eq!(ticks, vec![-50, -40, -30, -20, -10, 0, 10, 20]);
    /// assert_eq!(count, 8);
    /// assert_eq!(factor, 1);
    /// ```
    pub fn locate(&self, start: f64, stop: f64) -> (Vec<i64>, usize, usize) {
        let (start, stop) = match (to_tick_range(start), to_tick_range(stop)) {
            (Some(start), Some(stop)) => (start, stop),
            _ => {
                warn!("no ticks for the range {} to {}", start, stop);
                return (vec![], 0, 1);
            }
        };

        // Wide enough that rounding down and stepping cannot overflow.
        let step = i128::from(self.step);
        let first = start.div_euclid(step) * step;
        let last = stop.div_euclid(step) * step;

        let ticks: Vec<i64> = if last < first {
            vec![]
        } else {
            (0..=(last - first) / step)
                .map(|i| first + i * step)
                .filter_map(|tick| i64::try_from(tick).ok())
                .collect()
        };
        let count = ticks.len();

        (ticks, count, 1)
    }
}

// Truncate to an integer, if it is representable as an i64.
fn to_tick_range(val: f64) -> Option<i128> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    let val = val.trunc();
    if val.is_finite() && val >= -LIMIT && val < LIMIT {
        Some(i128::from(val as i64))
    } else {
        None
    }
}

impl Default for Locator {
    /// Ticks every 10 units.
    fn default() -> Self {
        Locator { step: 10 }
    }
}

/// Label for a dry adiabat axis tick.
pub fn format_theta(value: f64) -> String {
    format!("θ={:.1}", value)
}

/// Label for an isotherm axis tick.
pub fn format_isotherm(value: f64) -> String {
    format!("  T={:.1}", value)
}

/// Status bar text for the plot plane point `(x, y)`.
///
/// `initial_width` is the viewport width that corresponds to a zoom of 1.
pub fn format_status(x: f64, y: f64, viewport: &Viewport, initial_width: f64) -> String {
    let (temperature, theta) = xy_to_temperature_theta(XYCoords::new(x, y));
    let (pressure, _) = temperature_theta_to_pressure_temperature(temperature, theta);
    let zoom = viewport.width() / initial_width;

    format!(
        "T:{:.2}, theta:{:.2}, p:{:.2} (zoom:{:.3})",
        temperature.unpack(),
        theta.unpack(),
        pressure.unpack(),
        zoom
    )
}

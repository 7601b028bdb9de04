//! Tephigram coordinate transforms.
//!
//! A tephigram plots temperature against the logarithm of potential temperature, rotated by 45
//! degrees. There are three coordinate systems in play:
//!   - pressure and temperature, what a sounding reports,
//!   - temperature and potential temperature (theta), the natural tephigram coordinates,
//!   - the plot plane, `x` and `y`, what gets drawn.
//!
//! All temperatures, including potential temperature, are in degrees Celsius and all pressures in
//! hPa. None of these functions check their inputs, a non-positive pressure or mixing ratio
//! produces NaN or infinite values.
use crate::{
    constants::{K, KELVIN, L, MA, P_BASE, RV},
    geometry::XYCoords,
};
use metfor::{Celsius, HectoPascal, Quantity};

/// Lower clamp applied to theta (Kelvin) before taking its logarithm.
const MIN_THETA_KELVIN: f64 = 1.0;
/// Upper clamp applied to theta (Kelvin) before taking its logarithm.
const MAX_THETA_KELVIN: f64 = 1.0e10;

/// Convert temperature and potential temperature to plot plane coordinates.
pub fn temperature_theta_to_xy(temperature: Celsius, theta: Celsius) -> XYCoords {
    let theta_k = (theta.unpack() + KELVIN).max(MIN_THETA_KELVIN).min(MAX_THETA_KELVIN);
    let phi = theta_k.ln();

    XYCoords {
        x: phi * MA + temperature.unpack(),
        y: phi * MA - temperature.unpack(),
    }
}

/// Convert plot plane coordinates to temperature and potential temperature.
pub fn xy_to_temperature_theta(xy: XYCoords) -> (Celsius, Celsius) {
    let phi = (xy.x + xy.y) / (2.0 * MA);
    let temperature = (xy.x - xy.y) / 2.0;
    let theta = phi.exp() - KELVIN;

    (Celsius(temperature), Celsius(theta))
}

/// Convert pressure and temperature to temperature and potential temperature.
pub fn pressure_temperature_to_temperature_theta(
    pressure: HectoPascal,
    temperature: Celsius,
) -> (Celsius, Celsius) {
    let kelvin = temperature.unpack() + KELVIN;
    let theta = kelvin * (P_BASE / pressure.unpack()).powf(K);

    (temperature, Celsius(theta - KELVIN))
}

/// Convert temperature and potential temperature to pressure and temperature.
pub fn temperature_theta_to_pressure_temperature(
    temperature: Celsius,
    theta: Celsius,
) -> (HectoPascal, Celsius) {
    let kelvin = temperature.unpack() + KELVIN;
    let theta_k = theta.unpack() + KELVIN;
    let pressure = P_BASE * (kelvin / theta_k).powf(1.0 / K);

    (HectoPascal(pressure), temperature)
}

/// Convert pressure and potential temperature to pressure and temperature.
pub fn pressure_theta_to_pressure_temperature(
    pressure: HectoPascal,
    theta: Celsius,
) -> (HectoPascal, Celsius) {
    let theta_k = theta.unpack() + KELVIN;
    let kelvin = theta_k * pressure.unpack().powf(K) / P_BASE.powf(K);

    (pressure, Celsius(kelvin - KELVIN))
}

/// Temperature at which air at `pressure` is saturated with a mixing ratio of `mixing_ratio`
/// g/kg.
pub fn pressure_mixing_ratio_to_temperature(pressure: HectoPascal, mixing_ratio: f64) -> Celsius {
    // Vapour pressure, then invert the Clausius-Clapeyron relation for the dew point.
    let vapp = pressure.unpack() * (8.0 / 5.0) * (mixing_ratio / P_BASE);
    let kelvin = 1.0 / ((1.0 / KELVIN) - ((RV / L) * (vapp / 6.11).ln()));

    Celsius(kelvin - KELVIN)
}

/// Convert pressure and temperature straight to the plot plane.
#[inline]
pub fn pressure_temperature_to_xy(pressure: HectoPascal, temperature: Celsius) -> XYCoords {
    let (t, theta) = pressure_temperature_to_temperature_theta(pressure, temperature);
    temperature_theta_to_xy(t, theta)
}

/// Convert a plot plane point to pressure and temperature.
#[inline]
pub fn xy_to_pressure_temperature(xy: XYCoords) -> (HectoPascal, Celsius) {
    let (t, theta) = xy_to_temperature_theta(xy);
    temperature_theta_to_pressure_temperature(t, theta)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::approx_equal;

    const TEMPERATURES: [f64; 7] = [-80.0, -45.5, -10.0, 0.0, 12.3, 25.0, 40.0];
    const THETAS: [f64; 6] = [-60.0, -5.0, 0.0, 20.0, 100.0, 250.0];
    const PRESSURES: [f64; 6] = [1050.0, 1000.0, 850.0, 500.0, 100.0, 10.0];

    #[test]
    fn test_xy_round_trip() {
        for &t in TEMPERATURES.iter() {
            for &theta in THETAS.iter() {
                let xy = temperature_theta_to_xy(Celsius(t), Celsius(theta));
                let (t2, theta2) = xy_to_temperature_theta(xy);
                assert!(approx_equal(t, t2.unpack(), 1.0e-9));
                assert!(approx_equal(theta, theta2.unpack(), 1.0e-8));
            }
        }
    }

    #[test]
    fn test_theta_clamped_below_absolute_zero() {
        let xy = temperature_theta_to_xy(Celsius(0.0), Celsius(-500.0));
        assert!(xy.x.is_finite() && xy.y.is_finite());
        // ln(1) == 0, only the temperature contributes.
        assert!(approx_equal(xy.x, 0.0, 1.0e-12));
    }

    #[test]
    fn test_poisson_round_trip() {
        for &p in PRESSURES.iter() {
            for &t in TEMPERATURES.iter() {
                let (_, theta) =
                    pressure_temperature_to_temperature_theta(HectoPascal(p), Celsius(t));
                let (p2, t2) = pressure_theta_to_pressure_temperature(HectoPascal(p), theta);
                assert!(approx_equal(p, p2.unpack(), 1.0e-12));
                assert!(approx_equal(t, t2.unpack(), 1.0e-9));

                let (p3, _) = temperature_theta_to_pressure_temperature(Celsius(t), theta);
                assert!(approx_equal(p, p3.unpack(), 1.0e-6 * p));
            }
        }
    }

    #[test]
    fn test_theta_at_reference_pressure() {
        let (t, theta) = pressure_temperature_to_temperature_theta(HectoPascal(1000.0), Celsius(15.0));
        assert_eq!(t, Celsius(15.0));
        assert!(approx_equal(theta.unpack(), 15.0, 1.0e-12));
    }

    #[test]
    fn test_isobar_temperature_decreases_with_lower_pressure() {
        for &theta in &[5.0, 30.0, 120.0] {
            let mut last = std::f64::INFINITY;
            for &p in PRESSURES.iter() {
                let (_, t) = pressure_theta_to_pressure_temperature(HectoPascal(p), Celsius(theta));
                assert!(t.unpack() < last);
                last = t.unpack();
            }
        }
    }

    #[test]
    fn test_mixing_ratio_temperature() {
        // Saturation at 6.11 hPa is 0 degC, which is a mixing ratio of ~3.82 g/kg at 1000 hPa.
        let ratio = 6.11 * P_BASE / (1000.0 * 1.6);
        let t = pressure_mixing_ratio_to_temperature(HectoPascal(1000.0), ratio);
        assert!(approx_equal(t.unpack(), 0.0, 1.0e-9));

        // Wetter air saturates at a higher temperature.
        let t_wet = pressure_mixing_ratio_to_temperature(HectoPascal(1000.0), 20.0);
        assert!(t_wet > t);
    }

    #[test]
    fn test_degenerate_pressure_is_not_finite() {
        let (_, theta) = pressure_temperature_to_temperature_theta(HectoPascal(0.0), Celsius(10.0));
        assert!(!theta.unpack().is_finite());
        // ln(0) drives the dew point all the way down to absolute zero.
        let t = pressure_mixing_ratio_to_temperature(HectoPascal(1000.0), 0.0);
        assert!(approx_equal(t.unpack(), -KELVIN, 1.0e-9));
    }
}

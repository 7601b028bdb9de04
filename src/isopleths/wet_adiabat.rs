//! Integrate a pseudo saturated wet adiabat.
//!
//! Starting from a temperature at the base pressure, the saturated adiabatic lapse rate is
//! stepped upward in fixed pressure increments until the curve reaches a minimum temperature or the
//! step cap is used up.
use crate::constants::{
    CP, E, KELVIN, L, RD, RV, WET_ADIABAT_MAX_STEPS, WET_ADIABAT_PRESSURE_DELTA,
};
use log::{trace, warn};
use metfor::{Celsius, HectoPascal, Quantity};
use std::iter::once;

/// Rate of change of temperature with pressure, K/hPa, for saturated air.
pub(crate) fn saturated_lapse_rate(pressure: f64, temperature: f64) -> f64 {
    let kelvin = temperature + KELVIN;
    let lsbc = (L / RV) * ((1.0 / KELVIN) - (1.0 / kelvin));
    let rw = 6.11 * lsbc.exp() * (E / pressure);
    let lrwbt = (L * rw) / (RD * kelvin);
    let numerator = ((RD * kelvin) / (CP * pressure)) * (1.0 + lrwbt);
    let denominator = 1.0 + (lrwbt * ((E * L) / (CP * kelvin)));

    numerator / denominator
}

/// One integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Step {
    /// Change in pressure over the step.
    pub dp: f64,
    /// Change in temperature over the step.
    pub dt: f64,
    /// This step lands on the minimum temperature, integration is over.
    pub stop: bool,
}

/// Work out the next step from `(pressure, temperature)` with a pressure change of `dp`.
///
/// If the step would cool below `min_temperature` it is shortened to land on it exactly.
pub(crate) fn step(pressure: f64, temperature: f64, dp: f64, min_temperature: f64) -> Step {
    let gradient = saturated_lapse_rate(pressure, temperature);
    let dt = dp * gradient;

    if temperature + dt < min_temperature {
        let dt = min_temperature - temperature;
        Step {
            dp: dt / gradient,
            dt,
            stop: true,
        }
    } else {
        Step {
            dp,
            dt,
            stop: false,
        }
    }
}

/// Iterator over the points of a wet adiabat, after the starting point.
#[derive(Debug, Clone)]
pub(crate) struct WetAdiabatSteps {
    pressure: f64,
    temperature: f64,
    dp: f64,
    min_temperature: f64,
    remaining: usize,
    done: bool,
}

impl WetAdiabatSteps {
    pub(crate) fn new(temperature: Celsius, min_temperature: Celsius, max_pressure: HectoPascal) -> Self {
        WetAdiabatSteps {
            pressure: max_pressure.unpack(),
            temperature: temperature.unpack(),
            dp: WET_ADIABAT_PRESSURE_DELTA,
            min_temperature: min_temperature.unpack(),
            remaining: WET_ADIABAT_MAX_STEPS,
            // Nothing to do if the start is already at or below the floor.
            done: temperature.unpack() <= min_temperature.unpack(),
        }
    }
}

impl Iterator for WetAdiabatSteps {
    type Item = (HectoPascal, Celsius);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.remaining == 0 {
            self.done = true;
            warn!(
                "wet adiabat stopped after {} steps at {:.2} hPa, {:.2} C, above the {:.2} C floor",
                WET_ADIABAT_MAX_STEPS, self.pressure, self.temperature, self.min_temperature
            );
            return None;
        }
        self.remaining -= 1;

        let Step { dp, dt, stop } = step(self.pressure, self.temperature, self.dp, self.min_temperature);

        self.dp = dp;
        self.pressure += dp;
        self.temperature = if stop {
            self.done = true;
            self.min_temperature
        } else {
            self.temperature + dt
        };

        Some((HectoPascal(self.pressure), Celsius(self.temperature)))
    }
}

/// Generate the `(pressure, temperature)` points of a wet adiabat, starting point included.
pub(crate) fn integrate(
    temperature: Celsius,
    min_temperature: Celsius,
    max_pressure: HectoPascal,
) -> Vec<(HectoPascal, Celsius)> {
    let points: Vec<_> = once((max_pressure, temperature))
        .chain(WetAdiabatSteps::new(temperature, min_temperature, max_pressure))
        .collect();

    trace!(
        "wet adiabat {:?} integrated in {} steps",
        temperature,
        points.len() - 1
    );

    points
}

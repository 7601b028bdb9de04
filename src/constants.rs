//! Physical constants, numerical tuning values and the default layout of a tephigram.
//!
//! There is exactly one set of physical constants in this crate. Older tephigram code used
//! `Cp = 1.01e3` and `L = 2.5e6`; the values here are the later, more precise ones.

/// The specific heat capacity of dry air at constant pressure, J kg-1 K-1.
pub const CP: f64 = 1004.0;

/// Dimensionless ratio Rd / Cp.
pub const K: f64 = 0.286;

/// Offset between degrees Celsius and Kelvin.
pub const KELVIN: f64 = 273.15;

/// Specific latent heat of vaporisation of water at 0 degC, J kg-1.
pub const L: f64 = 2.501e6;

/// Scaling applied to ln(theta) when mapping onto the plot plane.
pub const MA: f64 = 300.0;

/// Specific gas constant for dry air, J kg-1 K-1.
pub const RD: f64 = 287.0;

/// Specific gas constant for water vapour, J kg-1 K-1.
pub const RV: f64 = 461.0;

/// Dimensionless ratio Rd / Rv.
pub const E: f64 = 0.622;

/// Reference pressure for potential temperature, hPa.
pub const P_BASE: f64 = 1000.0;

/// The constant set as a value, for callers that want to carry it around or print it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// Specific heat at constant pressure.
    pub cp: f64,
    /// Rd / Cp.
    pub k: f64,
    /// Celsius to Kelvin offset.
    pub kelvin: f64,
    /// Latent heat of vaporisation.
    pub l: f64,
    /// Plot plane scaling constant.
    pub ma: f64,
    /// Gas constant for dry air.
    pub rd: f64,
    /// Gas constant for water vapour.
    pub rv: f64,
    /// Rd / Rv.
    pub e: f64,
    /// Reference pressure.
    pub p_base: f64,
}

impl PhysicalConstants {
    /// The canonical constants used by every calculation in this crate.
    pub const CANONICAL: PhysicalConstants = PhysicalConstants {
        cp: CP,
        k: K,
        kelvin: KELVIN,
        l: L,
        ma: MA,
        rd: RD,
        rv: RV,
        e: E,
        p_base: P_BASE,
    };
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::CANONICAL
    }
}

//
// Numerical tuning. These are not physical constants, they only control how curves are sampled.
//

/// Pressure step (hPa) used when integrating a wet adiabat upward from its base.
pub const WET_ADIABAT_PRESSURE_DELTA: f64 = -5.0;

/// Maximum number of integration steps for one wet adiabat.
pub const WET_ADIABAT_MAX_STEPS: usize = 200;

/// Samples along an isobar.
pub const ISOBAR_STEPS: usize = 50;

/// Samples along an isotherm.
pub const ISOTHERM_STEPS: usize = 50;

/// Samples along a dry adiabat.
pub const DRY_ADIABAT_STEPS: usize = 50;

/// Samples along a humidity mixing ratio line.
pub const MIXING_RATIO_STEPS: usize = 50;

/// Samples along the vertical gutter line the wind barbs hang from.
pub const GUTTER_STEPS: usize = 50;

//
// Diagram defaults.
//

/// Width of the plot plane viewport that corresponds to a zoom level of 1.
pub const DEFAULT_WIDTH: f64 = 700.0;

/// Lowest pressure (hPa) drawn by the isopleth families.
pub const MIN_PRESSURE: f64 = 50.0;

/// Highest pressure (hPa) drawn by the isopleth families.
pub const MAX_PRESSURE: f64 = 1000.0;

/// Lower potential temperature (degC) extent of an isobar.
pub const MIN_THETA: f64 = 0.0;

/// Upper potential temperature (degC) extent of an isobar.
pub const MAX_THETA: f64 = 250.0;

/// Smallest wet adiabat drawn by default (degC at 1000 hPa).
pub const MIN_WET_ADIABAT: f64 = 1.0;

/// Largest wet adiabat drawn by default (degC at 1000 hPa).
pub const MAX_WET_ADIABAT: f64 = 60.0;

/// Temperature (degC) at which wet adiabat integration stops.
pub const MIN_TEMPERATURE: f64 = -50.0;

/// Pressure extent (hPa) of the isotherm and dry adiabat grid lines.
pub const GRID_PRESSURE_EXTENT: (f64, f64) = (10.0, 1050.0);

/// Drawing order of the isopleth lines, labels go one above.
pub const ISOPLETH_ZORDER: i32 = 10;

/// The default isobar `(step, zoom)` specification.
pub const ISOBAR_SPEC: &[(u32, f64)] = &[(25, 0.03), (50, 0.10), (100, 0.25), (200, 1.5)];

/// Isobars that stay on the plot at any zoom level.
pub const ISOBAR_FIXED: &[f64] = &[50.0, 1000.0];

/// The default wet adiabat `(step, zoom)` specification.
pub const WET_ADIABAT_SPEC: &[(u32, f64)] = &[(1, 0.05), (2, 0.15), (4, 1.5)];

/// The default mixing ratio `(step, zoom)` specification.
pub const MIXING_RATIO_SPEC: &[(u32, f64)] = &[(1, 0.05), (2, 0.18), (4, 0.3), (8, 1.5)];

/// Default mixing ratio lines, g/kg.
pub const MIXING_RATIOS: &[f64] = &[
    0.001, 0.002, 0.005, 0.01, 0.02, 0.03, 0.05, 0.1, 0.15, 0.2, 0.3, 0.4, 0.5, 0.6, 0.8, 1.0,
    1.5, 2.0, 2.5, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 24.0,
    28.0, 32.0, 36.0, 40.0, 44.0, 48.0, 52.0, 56.0, 60.0, 68.0, 80.0,
];

/// Wind barb speed thresholds in knots, `[3, 8, 13, ..., 98]`.
pub const BARB_BINS: [f64; 20] = [
    3.0, 8.0, 13.0, 18.0, 23.0, 28.0, 33.0, 38.0, 43.0, 48.0, 53.0, 58.0, 63.0, 68.0, 73.0, 78.0,
    83.0, 88.0, 93.0, 98.0,
];

/// Fraction of the viewport width, in from the right edge, where barbs are anchored.
pub const BARB_GUTTER: f64 = 0.1;

/// Length of a barb glyph in display points.
pub const BARB_LENGTH: f64 = 7.0;

/// Line width of a barbless glyph.
pub const BARB_LINEWIDTH: f64 = 1.5;

/// Drawing order of barbs.
pub const BARB_ZORDER: i32 = 10;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_barb_bins_are_five_knots_apart() {
        for (i, bin) in BARB_BINS.iter().enumerate() {
            assert_eq!(*bin, i as f64 * 5.0 + 3.0);
        }
    }

    #[test]
    fn test_canonical_constants_are_consistent() {
        let c = PhysicalConstants::default();
        assert_eq!(c, PhysicalConstants::CANONICAL);
        assert!((c.rd / c.rv - c.e).abs() < 1.0e-3);
        assert!((c.rd / c.cp - c.k).abs() < 1.0e-3);
        assert_eq!(MIXING_RATIOS.len(), 44);
    }
}

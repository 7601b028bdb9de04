//! Generate the reference lines drawn on a tephigram.
//!
//! Every family of reference lines (isobars, isotherms, dry adiabats, wet adiabats and humidity
//! mixing ratio lines) is described by an [`IsoplethKind`], and [`generate_points`] turns one of
//! those into a [`PointSeries`] in meteorological coordinates. An [`Isopleth`] bundles the series
//! with its plot plane projection and extents.
use crate::{
    constants::{DRY_ADIABAT_STEPS, ISOBAR_STEPS, ISOTHERM_STEPS, MIXING_RATIO_STEPS},
    geometry::{polyline_intersects_rect, Viewport, XYCoords},
    transforms::{
        pressure_mixing_ratio_to_temperature, pressure_temperature_to_temperature_theta,
        pressure_theta_to_pressure_temperature, temperature_theta_to_xy,
    },
    utility::linspace,
};
use itertools::izip;
use metfor::{Celsius, HectoPascal, Quantity};
use strum_macros::{Display, EnumIter, EnumString};

mod wet_adiabat;

/// The families of reference lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum IsoplethFamily {
    /// Lines of constant pressure.
    #[strum(to_string = "isobar")]
    Isobar,
    /// Lines of constant temperature.
    #[strum(to_string = "isotherm")]
    Isotherm,
    /// Lines of constant potential temperature.
    #[strum(to_string = "dry adiabat")]
    DryAdiabat,
    /// Pseudo saturated adiabats.
    #[strum(to_string = "wet adiabat")]
    WetAdiabat,
    /// Lines of constant saturation mixing ratio.
    #[strum(to_string = "mixing ratio")]
    MixingRatio,
}

/// One member of an isopleth family along with the range it is drawn over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IsoplethKind {
    /// Constant pressure, sampled over a range of potential temperature.
    Isobar {
        /// The pressure of the line.
        pressure: HectoPascal,
        /// Low end of the theta range.
        min_theta: Celsius,
        /// High end of the theta range.
        max_theta: Celsius,
    },
    /// Constant temperature, sampled over a range of pressure.
    Isotherm {
        /// The temperature of the line.
        temperature: Celsius,
        /// Top of the line.
        min_pressure: HectoPascal,
        /// Bottom of the line.
        max_pressure: HectoPascal,
    },
    /// Constant potential temperature, sampled over a range of pressure.
    DryAdiabat {
        /// The potential temperature of the line.
        theta: Celsius,
        /// Top of the line.
        min_pressure: HectoPascal,
        /// Bottom of the line.
        max_pressure: HectoPascal,
    },
    /// A pseudo saturated adiabat, integrated upward from `max_pressure`.
    WetAdiabat {
        /// Temperature at `max_pressure`.
        temperature: Celsius,
        /// Integration stops when the line cools to this temperature.
        min_temperature: Celsius,
        /// Starting pressure.
        max_pressure: HectoPascal,
    },
    /// Constant saturation mixing ratio, sampled over a range of pressure.
    MixingRatio {
        /// Mixing ratio in g/kg.
        mixing_ratio: f64,
        /// Top of the line.
        min_pressure: HectoPascal,
        /// Bottom of the line.
        max_pressure: HectoPascal,
    },
}

impl IsoplethKind {
    /// The family this line belongs to.
    pub fn family(&self) -> IsoplethFamily {
        use IsoplethKind::*;

        match self {
            Isobar { .. } => IsoplethFamily::Isobar,
            Isotherm { .. } => IsoplethFamily::Isotherm,
            DryAdiabat { .. } => IsoplethFamily::DryAdiabat,
            WetAdiabat { .. } => IsoplethFamily::WetAdiabat,
            MixingRatio { .. } => IsoplethFamily::MixingRatio,
        }
    }

    /// The defining value of the line: hPa, degC or g/kg depending on the family.
    pub fn value(&self) -> f64 {
        use IsoplethKind::*;

        match *self {
            Isobar { pressure, .. } => pressure.unpack(),
            Isotherm { temperature, .. } => temperature.unpack(),
            DryAdiabat { theta, .. } => theta.unpack(),
            WetAdiabat { temperature, .. } => temperature.unpack(),
            MixingRatio { mixing_ratio, .. } => mixing_ratio,
        }
    }

    /// Generate the points along this line.
    #[inline]
    pub fn generate_points(&self) -> PointSeries {
        generate_points(self)
    }
}

/// An ordered sequence of points in meteorological coordinates.
///
/// The three columns always have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointSeries {
    /// Temperature of each point.
    pub temperature: Vec<Celsius>,
    /// Potential temperature of each point.
    pub theta: Vec<Celsius>,
    /// Pressure of each point.
    pub pressure: Vec<HectoPascal>,
}

impl PointSeries {
    /// Build a series from `(pressure, temperature)` pairs, computing theta along the way.
    pub fn from_pressure_temperature<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (HectoPascal, Celsius)>,
    {
        let mut series = PointSeries::default();
        for (p, t) in points {
            let (t, theta) = pressure_temperature_to_temperature_theta(p, t);
            series.pressure.push(p);
            series.temperature.push(t);
            series.theta.push(theta);
        }
        series
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    /// No points at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    /// At least two points, enough to draw a line.
    #[inline]
    pub fn is_drawable(&self) -> bool {
        self.len() >= 2
    }

    /// Project every point onto the plot plane.
    pub fn to_xy(&self) -> Vec<XYCoords> {
        izip!(&self.temperature, &self.theta)
            .map(|(t, theta)| temperature_theta_to_xy(*t, *theta))
            .collect()
    }

    /// The range of each column and where the extremes are.
    ///
    /// Returns `None` for an empty series. When an extreme value occurs more than once the first
    /// index is reported.
    pub fn extent(&self) -> Option<Extent> {
        if self.is_empty() {
            return None;
        }

        let temperature = arg_bounds(&self.temperature);
        let theta = arg_bounds(&self.theta);
        let pressure = arg_bounds(&self.pressure);

        Some(Extent {
            temperature: Bounds::new(
                self.temperature[temperature.lower],
                self.temperature[temperature.upper],
            ),
            theta: Bounds::new(self.theta[theta.lower], self.theta[theta.upper]),
            pressure: Bounds::new(self.pressure[pressure.lower], self.pressure[pressure.upper]),
            index: ExtentIndex {
                temperature,
                theta,
                pressure,
            },
        })
    }
}

/// A lower and an upper value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    /// The smaller value.
    pub lower: T,
    /// The larger value.
    pub upper: T,
}

impl<T> Bounds<T> {
    /// Create a new pair.
    pub fn new(lower: T, upper: T) -> Self {
        Bounds { lower, upper }
    }
}

/// Where the extremes of each column of a [`PointSeries`] are found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtentIndex {
    /// Indexes of the coldest and warmest points.
    pub temperature: Bounds<usize>,
    /// Indexes of the lowest and highest theta.
    pub theta: Bounds<usize>,
    /// Indexes of the lowest and highest pressure.
    pub pressure: Bounds<usize>,
}

/// The range covered by a [`PointSeries`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Temperature range.
    pub temperature: Bounds<Celsius>,
    /// Potential temperature range.
    pub theta: Bounds<Celsius>,
    /// Pressure range.
    pub pressure: Bounds<HectoPascal>,
    /// Where each extreme occurs.
    pub index: ExtentIndex,
}

// Index of the first minimum and first maximum. NaN never wins a comparison.
fn arg_bounds<T: Quantity + Copy>(vals: &[T]) -> Bounds<usize> {
    vals.iter()
        .map(|v| v.unpack())
        .enumerate()
        .fold(
            (Bounds::new(0, 0), std::f64::INFINITY, std::f64::NEG_INFINITY),
            |(mut idx, mut lo, mut hi), (i, v)| {
                if v < lo {
                    lo = v;
                    idx.lower = i;
                }
                if v > hi {
                    hi = v;
                    idx.upper = i;
                }
                (idx, lo, hi)
            },
        )
        .0
}

/// Generate the points along one member of an isopleth family.
pub fn generate_points(kind: &IsoplethKind) -> PointSeries {
    use IsoplethKind::*;

    match *kind {
        Isobar {
            pressure,
            min_theta,
            max_theta,
        } => {
            let mut series = PointSeries::default();
            for theta in linspace(min_theta.unpack(), max_theta.unpack(), ISOBAR_STEPS) {
                let (_, t) = pressure_theta_to_pressure_temperature(pressure, Celsius(theta));
                series.pressure.push(pressure);
                series.temperature.push(t);
                series.theta.push(Celsius(theta));
            }
            series
        }
        Isotherm {
            temperature,
            min_pressure,
            max_pressure,
        } => PointSeries::from_pressure_temperature(
            pressures(min_pressure, max_pressure, ISOTHERM_STEPS).map(|p| (p, temperature)),
        ),
        DryAdiabat {
            theta,
            min_pressure,
            max_pressure,
        } => {
            let mut series = PointSeries::default();
            for p in pressures(min_pressure, max_pressure, DRY_ADIABAT_STEPS) {
                let (_, t) = pressure_theta_to_pressure_temperature(p, theta);
                series.pressure.push(p);
                series.temperature.push(t);
                series.theta.push(theta);
            }
            series
        }
        WetAdiabat {
            temperature,
            min_temperature,
            max_pressure,
        } => PointSeries::from_pressure_temperature(wet_adiabat::integrate(
            temperature,
            min_temperature,
            max_pressure,
        )),
        MixingRatio {
            mixing_ratio,
            min_pressure,
            max_pressure,
        } => PointSeries::from_pressure_temperature(
            pressures(min_pressure, max_pressure, MIXING_RATIO_STEPS)
                .map(|p| (p, pressure_mixing_ratio_to_temperature(p, mixing_ratio))),
        ),
    }
}

fn pressures(
    min_pressure: HectoPascal,
    max_pressure: HectoPascal,
    num: usize,
) -> impl Iterator<Item = HectoPascal> {
    linspace(min_pressure.unpack(), max_pressure.unpack(), num).map(HectoPascal)
}

/// A generated reference line.
///
/// The geometry never changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Isopleth {
    kind: IsoplethKind,
    points: PointSeries,
    xy: Vec<XYCoords>,
    extent: Option<Extent>,
}

impl Isopleth {
    /// Generate the line described by `kind`.
    pub fn new(kind: IsoplethKind) -> Self {
        let points = generate_points(&kind);
        let xy = points.to_xy();
        let extent = points.extent();

        Isopleth {
            kind,
            points,
            xy,
            extent,
        }
    }

    /// What this line is.
    #[inline]
    pub fn kind(&self) -> &IsoplethKind {
        &self.kind
    }

    /// The defining value of the line.
    #[inline]
    pub fn value(&self) -> f64 {
        self.kind.value()
    }

    /// Points in meteorological coordinates.
    #[inline]
    pub fn points(&self) -> &PointSeries {
        &self.points
    }

    /// Points on the plot plane.
    #[inline]
    pub fn xy(&self) -> &[XYCoords] {
        &self.xy
    }

    /// Range of the line, `None` only if no points were generated.
    #[inline]
    pub fn extent(&self) -> Option<&Extent> {
        self.extent.as_ref()
    }

    /// Text for the line's label, the defining value without trailing zeros.
    pub fn label_text(&self) -> String {
        format!("{}", self.value())
    }

    /// Does any part of the line fall within the viewport?
    #[inline]
    pub fn is_in_view(&self, viewport: &Viewport) -> bool {
        polyline_intersects_rect(&self.xy, viewport)
    }

    /// The index of the point nearest to `focus` on the plot plane.
    ///
    /// With `xfocus` only the horizontal distance counts. Ties go to the first point.
    pub fn nearest_index(&self, focus: XYCoords, xfocus: bool) -> Option<usize> {
        self.xy
            .iter()
            .map(|pnt| {
                if xfocus {
                    let dx = pnt.x - focus.x;
                    dx * dx
                } else {
                    pnt.distance_squared(focus)
                }
            })
            .enumerate()
            .filter(|(_, d)| !d.is_nan())
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((i, d)),
            })
            .map(|(i, _)| i)
    }
}

/// Which of `isopleths` intersect the viewport, one flag per line.
pub fn in_view_mask<'a, I>(isopleths: I, viewport: &Viewport) -> Vec<bool>
where
    I: IntoIterator<Item = &'a Isopleth>,
{
    isopleths
        .into_iter()
        .map(|iso| iso.is_in_view(viewport))
        .collect()
}

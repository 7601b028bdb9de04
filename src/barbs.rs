//! Wind barbs hung from a vertical gutter line near the right edge of the viewport.
use crate::{
    constants::{BARB_BINS, BARB_GUTTER, BARB_LENGTH, BARB_LINEWIDTH, BARB_ZORDER, GUTTER_STEPS},
    error::{Result, TephiError},
    geometry::{Viewport, XYCoords},
    interpolation::linear_interpolate,
    style::{LineStyleKind, Pivot},
    surface::{DrawingSurface, GlyphHandle},
    transforms::{pressure_temperature_to_xy, xy_to_pressure_temperature},
    utility::linspace,
};
use itertools::izip;
use log::{trace, warn};
use metfor::{Celsius, HectoPascal, Knots, Quantity, WindSpdDir, WindUV};
use optional::Optioned;

/// Snap a wind speed to the 5 knot increments a barb can show.
///
/// Speeds below the first bin threshold snap to zero.
pub fn bin_speed(speed: Knots) -> Knots {
    let speed = speed.unpack();
    let bin = BARB_BINS.iter().take_while(|&&threshold| threshold <= speed).count();
    Knots(bin as f64 * 5.0)
}

/// Convert a wind speed and direction (degrees clockwise from north, the direction the wind
/// comes from) to the vector a barb is drawn along.
///
/// The speed is binned with [`bin_speed`] first. The vector points in the direction the wind
/// comes from, so `u` is the negative of the conventional eastward component, and `v` likewise.
/// Directions that are an exact multiple of 90 degrees produce a vector with exactly one non-zero
/// component.
pub fn speed_direction_to_uv(speed: Knots, direction: f64) -> WindUV<Knots> {
    let angle = direction.rem_euclid(360.0);
    let magnitude = bin_speed(speed).unpack();
    let modulus = angle % 90.0;

    let (u, v) = if modulus != 0.0 {
        let quadrant = (angle / 90.0) as u8;
        let (sin, cos) = modulus.to_radians().sin_cos();
        let y = cos * magnitude;
        let x = sin * magnitude;

        match quadrant {
            0 => (-x, -y),
            1 => (-y, x),
            2 => (x, y),
            _ => (y, -x),
        }
    } else {
        match angle as u16 {
            0 => (0.0, -magnitude),
            90 => (-magnitude, 0.0),
            180 => (0.0, magnitude),
            _ => (magnitude, 0.0),
        }
    };

    WindUV {
        u: Knots(u),
        v: Knots(v),
    }
}

/// What to draw for one wind observation.
#[derive(Debug, Clone, PartialEq)]
pub enum BarbGlyph {
    /// No wind at all.
    Calm,
    /// A light wind with no standard barb, drawn as a plain segment. The end points are offsets
    /// from the anchor in display points.
    Barbless {
        /// Start of the segment.
        start: XYCoords,
        /// End of the segment.
        end: XYCoords,
    },
    /// A regular barb along the binned vector.
    Barb {
        /// Binned u component.
        u: Knots,
        /// Binned v component.
        v: Knots,
    },
}

impl BarbGlyph {
    /// Choose the glyph for a wind observation.
    pub fn new(speed: Knots, direction: f64, length: f64, pivot: Pivot) -> Self {
        let raw = speed.unpack();

        if raw > 0.0 && raw < BARB_BINS[0] {
            let offset = match pivot {
                Pivot::Tip => 0.0,
                Pivot::Middle => -length / 2.0,
            };

            // Rotate the vertical segment clockwise by the direction.
            let (sin, cos) = direction.to_radians().sin_cos();
            let rotate = |y: f64| XYCoords::new(y * sin, y * cos);

            BarbGlyph::Barbless {
                start: rotate(offset),
                end: rotate(length + offset),
            }
        } else if raw <= 0.0 {
            BarbGlyph::Calm
        } else {
            let WindUV { u, v } = speed_direction_to_uv(speed, direction);
            BarbGlyph::Barb { u, v }
        }
    }
}

/// How wind barbs are drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct BarbStyle {
    /// Color, `None` to follow the profile the barbs belong to.
    pub color: Option<String>,
    /// Line width of barbless segments.
    pub linewidth: f64,
    /// Dash pattern of barbless segments.
    pub linestyle: LineStyleKind,
    /// Length of a glyph in display points.
    pub length: f64,
    /// Where a barbless segment attaches to its anchor.
    pub pivot: Pivot,
    /// Drawing order.
    pub zorder: i32,
    /// Fraction of the viewport width, in from the right edge, of the gutter line.
    pub gutter: f64,
}

impl Default for BarbStyle {
    fn default() -> Self {
        BarbStyle {
            color: None,
            linewidth: BARB_LINEWIDTH,
            linestyle: LineStyleKind::Solid,
            length: BARB_LENGTH,
            pivot: Pivot::default(),
            zorder: BARB_ZORDER,
            gutter: BARB_GUTTER,
        }
    }
}

impl BarbStyle {
    /// The default style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the color.
    pub fn with_color<S: Into<String>>(mut self, color: S) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the line width.
    pub fn with_linewidth(mut self, linewidth: f64) -> Self {
        self.linewidth = linewidth;
        self
    }

    /// Set the dash pattern.
    pub fn with_linestyle(mut self, linestyle: LineStyleKind) -> Self {
        self.linestyle = linestyle;
        self
    }

    /// Set the glyph length.
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// Set the pivot.
    pub fn with_pivot(mut self, pivot: Pivot) -> Self {
        self.pivot = pivot;
        self
    }

    /// Set the drawing order.
    pub fn with_zorder(mut self, zorder: i32) -> Self {
        self.zorder = zorder;
        self
    }

    /// Set the gutter offset.
    pub fn with_gutter(mut self, gutter: f64) -> Self {
        self.gutter = gutter;
        self
    }

    /// Fill in the color if none was set.
    pub(crate) fn or_color(mut self, color: &str) -> Self {
        if self.color.is_none() {
            self.color = Some(color.to_owned());
        }
        self
    }
}

/// One wind observation and its glyph, if it has been drawn yet.
#[derive(Debug, Clone)]
pub struct Barb {
    /// Wind speed and direction.
    pub wind: WindSpdDir<Knots>,
    /// Pressure level of the observation.
    pub pressure: HectoPascal,
    glyph: Option<GlyphHandle>,
    visible: bool,
}

impl Barb {
    /// The glyph handle, `None` until the barb first comes into view.
    #[inline]
    pub fn glyph(&self) -> Option<GlyphHandle> {
        self.glyph
    }

    /// Was the barb shown by the last refresh?
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// The wind barbs attached to one profile.
#[derive(Debug, Clone)]
pub struct WindBarbSet {
    barbs: Vec<Barb>,
    style: BarbStyle,
}

impl WindBarbSet {
    /// Create a set from `(speed, direction, pressure)` triples.
    ///
    /// Nothing is drawn until the first call to [`WindBarbSet::refresh`].
    pub fn new<I>(barbs: I, style: BarbStyle) -> Result<Self>
    where
        I: IntoIterator<Item = (Knots, f64, HectoPascal)>,
    {
        let barbs: Vec<Barb> = barbs
            .into_iter()
            .map(|(speed, direction, pressure)| Barb {
                wind: WindSpdDir { speed, direction },
                pressure,
                glyph: None,
                visible: false,
            })
            .collect();

        if barbs.is_empty() {
            return Err(TephiError::InvalidInput(
                "barbs need at least one speed, direction and pressure triple".to_owned(),
            ));
        }

        Ok(WindBarbSet { barbs, style })
    }

    /// Create a set from sounding columns, skipping levels with a missing value.
    pub fn from_columns(
        wind: &[Optioned<WindSpdDir<Knots>>],
        pressure: &[Optioned<HectoPascal>],
        style: BarbStyle,
    ) -> Result<Self> {
        if wind.len() != pressure.len() {
            return Err(TephiError::InvalidInput(format!(
                "wind and pressure columns differ in length, {} and {}",
                wind.len(),
                pressure.len()
            )));
        }

        let triples: Vec<_> = izip!(wind, pressure)
            .enumerate()
            .filter_map(|(i, (w, p))| match (w.into_option(), p.into_option()) {
                (Some(w), Some(p)) => Some((w.speed, w.direction, p)),
                _ => {
                    warn!("skipping wind barb at row {}, missing value", i);
                    None
                }
            })
            .collect();

        Self::new(triples, style)
    }

    /// The style every barb is drawn with.
    #[inline]
    pub fn style(&self) -> &BarbStyle {
        &self.style
    }

    pub(crate) fn set_style(&mut self, style: BarbStyle) {
        self.style = style;
    }

    /// The barbs.
    #[inline]
    pub fn barbs(&self) -> &[Barb] {
        &self.barbs
    }

    /// Number of barbs.
    #[inline]
    pub fn len(&self) -> usize {
        self.barbs.len()
    }

    /// Always false, a set is never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.barbs.is_empty()
    }

    /// Reposition every barb on the gutter line of the surface's current viewport.
    ///
    /// Barbs strictly between the lowest and highest pressure on the gutter line are shown and all
    /// others hidden. Glyphs are created the first time a barb comes into view. Returns whether
    /// any barb changed visibility.
    pub fn refresh<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let viewport = surface.viewport();
        let gutter = GutterLine::new(&viewport, self.style.gutter);
        let style = &self.style;
        let mut changed = false;

        for barb in self.barbs.iter_mut() {
            let position = gutter.position(barb.pressure);

            match (position, barb.glyph) {
                (Some(pos), None) => {
                    let glyph =
                        BarbGlyph::new(barb.wind.speed, barb.wind.direction, style.length, style.pivot);
                    trace!("creating {:?} at {:?}", glyph, barb.pressure);
                    barb.glyph = Some(surface.create_glyph(pos, &glyph, style));
                    barb.visible = true;
                    changed = true;
                }
                (Some(pos), Some(handle)) => {
                    surface.set_glyph_position(handle, pos);
                    surface.set_glyph_visible(handle, true);
                    changed |= !barb.visible;
                    barb.visible = true;
                }
                (None, Some(handle)) => {
                    surface.set_glyph_visible(handle, false);
                    changed |= barb.visible;
                    barb.visible = false;
                }
                (None, None) => {}
            }
        }

        changed
    }

    /// Take every glyph that was drawn off the surface.
    pub fn remove<S: DrawingSurface + ?Sized>(self, surface: &mut S) {
        for glyph in self.barbs.iter().filter_map(|b| b.glyph) {
            surface.remove_glyph(glyph);
        }
    }
}

/// Pressure and temperature sampled along the barb gutter line.
#[derive(Debug, Clone)]
pub(crate) struct GutterLine {
    pressure: Vec<HectoPascal>,
    temperature: Vec<Celsius>,
    min_pressure: HectoPascal,
    max_pressure: HectoPascal,
}

impl GutterLine {
    /// Sample the vertical line `gutter` of the width in from the right edge, top to bottom.
    pub(crate) fn new(viewport: &Viewport, gutter: f64) -> Self {
        let x = viewport.gutter_x(gutter);
        let ys: Vec<f64> = linspace(viewport.y0, viewport.y1, GUTTER_STEPS).collect();

        let (pressure, temperature): (Vec<HectoPascal>, Vec<Celsius>) = ys
            .into_iter()
            .rev()
            .map(|y| xy_to_pressure_temperature(XYCoords::new(x, y)))
            .unzip();

        let (min_pressure, max_pressure) = pressure.iter().fold(
            (HectoPascal(std::f64::INFINITY), HectoPascal(std::f64::NEG_INFINITY)),
            |(lo, hi), &p| {
                (
                    if p < lo { p } else { lo },
                    if p > hi { p } else { hi },
                )
            },
        );

        GutterLine {
            pressure,
            temperature,
            min_pressure,
            max_pressure,
        }
    }

    /// The open pressure range covered by the line.
    pub(crate) fn pressure_range(&self) -> (HectoPascal, HectoPascal) {
        (self.min_pressure, self.max_pressure)
    }

    /// Where the line crosses `pressure`, if it does.
    pub(crate) fn position(&self, pressure: HectoPascal) -> Option<XYCoords> {
        if !(self.min_pressure < pressure && pressure < self.max_pressure) {
            return None;
        }

        linear_interpolate(&self.pressure, &self.temperature, pressure)
            .map(|t| pressure_temperature_to_xy(pressure, t))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{surface::RecordingSurface, utility::test_tools::approx_equal};
    use optional::{none, some};

    #[test]
    fn test_bin_speed() {
        assert_eq!(bin_speed(Knots(0.0)), Knots(0.0));
        assert_eq!(bin_speed(Knots(2.9)), Knots(0.0));
        assert_eq!(bin_speed(Knots(3.0)), Knots(5.0));
        assert_eq!(bin_speed(Knots(7.9)), Knots(5.0));
        assert_eq!(bin_speed(Knots(8.0)), Knots(10.0));
        assert_eq!(bin_speed(Knots(97.0)), Knots(95.0));
        assert_eq!(bin_speed(Knots(150.0)), Knots(100.0));
    }

    #[test]
    fn test_axis_aligned_directions() {
        for &speed in &[4.0, 12.0, 55.0] {
            let mag = bin_speed(Knots(speed)).unpack();

            let WindUV { u, v } = speed_direction_to_uv(Knots(speed), 0.0);
            assert_eq!((u.unpack(), v.unpack()), (0.0, -mag));

            let WindUV { u, v } = speed_direction_to_uv(Knots(speed), 90.0);
            assert_eq!((u.unpack(), v.unpack()), (-mag, 0.0));

            let WindUV { u, v } = speed_direction_to_uv(Knots(speed), 180.0);
            assert_eq!((u.unpack(), v.unpack()), (0.0, mag));

            let WindUV { u, v } = speed_direction_to_uv(Knots(speed), 270.0);
            assert_eq!((u.unpack(), v.unpack()), (mag, 0.0));

            // Directions wrap.
            let WindUV { u, v } = speed_direction_to_uv(Knots(speed), 450.0);
            assert_eq!((u.unpack(), v.unpack()), (-mag, 0.0));
        }
    }

    #[test]
    fn test_quadrants_keep_magnitude() {
        for &dir in &[30.0, 135.0, 200.0, 315.0, -45.0] {
            let WindUV { u, v } = speed_direction_to_uv(Knots(21.0), dir);
            let mag = (u.unpack().powi(2) + v.unpack().powi(2)).sqrt();
            assert!(approx_equal(mag, 20.0, 1.0e-9));
        }

        // From the north east both components are negative, from the south west positive.
        let WindUV { u, v } = speed_direction_to_uv(Knots(10.0), 45.0);
        assert!(u < Knots(0.0) && v < Knots(0.0));
        let WindUV { u, v } = speed_direction_to_uv(Knots(10.0), 225.0);
        assert!(u > Knots(0.0) && v > Knots(0.0));
    }

    #[test]
    fn test_glyph_choice() {
        assert_eq!(BarbGlyph::new(Knots(0.0), 0.0, 7.0, Pivot::Tip), BarbGlyph::Calm);

        match BarbGlyph::new(Knots(2.0), 90.0, 7.0, Pivot::Tip) {
            BarbGlyph::Barbless { start, end } => {
                assert!(approx_equal(start.x, 0.0, 1.0e-12));
                assert!(approx_equal(end.x, 7.0, 1.0e-12));
                assert!(approx_equal(end.y, 0.0, 1.0e-12));
            }
            other => panic!("expected a barbless segment, got {:?}", other),
        }

        match BarbGlyph::new(Knots(2.0), 0.0, 8.0, Pivot::Middle) {
            BarbGlyph::Barbless { start, end } => {
                assert!(approx_equal(start.y, -4.0, 1.0e-12));
                assert!(approx_equal(end.y, 4.0, 1.0e-12));
            }
            other => panic!("expected a barbless segment, got {:?}", other),
        }

        match BarbGlyph::new(Knots(5.0), 60.0, 7.0, Pivot::Tip) {
            BarbGlyph::Barb { u, v } => {
                let mag = (u.unpack().powi(2) + v.unpack().powi(2)).sqrt();
                assert!(approx_equal(mag, 5.0, 1.0e-9));
            }
            other => panic!("expected a barb, got {:?}", other),
        }
    }

    fn test_viewport() -> Viewport {
        let lower_left = pressure_temperature_to_xy(HectoPascal(1000.0), Celsius(-20.0));
        let upper_right = pressure_temperature_to_xy(HectoPascal(200.0), Celsius(40.0));
        Viewport::new((lower_left.x, upper_right.x), (lower_left.y, upper_right.y))
    }

    #[test]
    fn test_refresh_shows_only_strictly_inside() {
        let vp = test_viewport();
        let gutter = GutterLine::new(&vp, BARB_GUTTER);
        let (lo, hi) = gutter.pressure_range();
        assert!(lo < hi);

        let mid = HectoPascal((lo.unpack() + hi.unpack()) / 2.0);
        let mut set = WindBarbSet::new(
            vec![
                (Knots(0.0), 0.0, mid),
                (Knots(25.0), 270.0, HectoPascal(hi.unpack() + 10.0)),
                (Knots(25.0), 270.0, hi),
            ],
            BarbStyle::new(),
        )
        .unwrap();

        let mut surf = RecordingSurface::new(vp);
        assert!(set.refresh(&mut surf));

        assert_eq!(surf.glyphs().len(), 1);
        assert_eq!(surf.glyphs()[0].glyph, BarbGlyph::Calm);
        assert!(set.barbs()[0].is_visible());
        assert!(set.barbs()[1].glyph().is_none());
        assert!(set.barbs()[2].glyph().is_none());

        // The glyph sits on the gutter line.
        let pos = surf.glyphs()[0].position;
        assert!(approx_equal(pos.x, vp.gutter_x(BARB_GUTTER), 1.0e-6));

        // Nothing moved, nothing changed.
        assert!(!set.refresh(&mut surf));
    }

    #[test]
    fn test_refresh_hides_when_out_of_view() {
        let vp = test_viewport();
        let mut set = WindBarbSet::new(
            vec![(Knots(15.0), 200.0, HectoPascal(700.0))],
            BarbStyle::new().with_color("red"),
        )
        .unwrap();

        let mut surf = RecordingSurface::new(vp);
        set.refresh(&mut surf);
        assert_eq!(surf.visible_glyphs().count(), 1);
        assert_eq!(surf.glyphs()[0].style.color.as_deref(), Some("red"));

        // Pan far up, 700 hPa is well off the bottom.
        let top = pressure_temperature_to_xy(HectoPascal(20.0), Celsius(-60.0));
        surf.set_viewport(Viewport::new(
            (top.x - 10.0, top.x + 10.0),
            (top.y - 10.0, top.y + 10.0),
        ));
        assert!(set.refresh(&mut surf));
        assert_eq!(surf.visible_glyphs().count(), 0);

        surf.set_viewport(vp);
        assert!(set.refresh(&mut surf));
        assert_eq!(surf.visible_glyphs().count(), 1);
        assert_eq!(surf.glyphs().len(), 1);
    }

    #[test]
    fn test_bad_input() {
        let empty: Vec<(Knots, f64, HectoPascal)> = vec![];
        assert!(WindBarbSet::new(empty, BarbStyle::new()).is_err());

        let wind = vec![some(WindSpdDir {
            speed: Knots(10.0),
            direction: 180.0,
        })];
        assert!(WindBarbSet::from_columns(&wind, &[], BarbStyle::new()).is_err());
    }

    #[test]
    fn test_from_columns_skips_missing() {
        let wind: Vec<Optioned<WindSpdDir<Knots>>> = vec![
            some(WindSpdDir {
                speed: Knots(10.0),
                direction: 180.0,
            }),
            none(),
            some(WindSpdDir {
                speed: Knots(30.0),
                direction: 250.0,
            }),
        ];
        let pressure: Vec<Optioned<HectoPascal>> = vec![
            some(HectoPascal(1000.0)),
            some(HectoPascal(900.0)),
            none(),
        ];

        let set = WindBarbSet::from_columns(&wind, &pressure, BarbStyle::new()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.barbs()[0].pressure, HectoPascal(1000.0));
    }
}

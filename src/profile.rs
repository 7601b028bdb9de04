//! An environmental sounding plotted on the diagram.
use crate::{
    barbs::WindBarbSet,
    constants::ISOPLETH_ZORDER,
    error::{Result, TephiError},
    geometry::XYCoords,
    isopleths::{Extent, PointSeries},
    style::LineStyle,
    surface::{DrawingSurface, LineHandle},
};
use chrono::NaiveDateTime;
use itertools::izip;
use log::{debug, warn};
use metfor::{Celsius, HectoPascal};
use optional::Optioned;

/// Width of the highlight halo relative to the profile line.
const HIGHLIGHT_WIDTH_FACTOR: f64 = 7.0;

/// A sounding as pressure and temperature points, optionally with wind barbs.
///
/// Build one with [`Profile::new`] or [`Profile::from_columns`] and hand it to
/// [`Tephigram::plot_profile`](crate::Tephigram::plot_profile), or let
/// [`Tephigram::plot`](crate::Tephigram::plot) do both.
#[derive(Debug, Clone)]
pub struct Profile {
    points: PointSeries,
    xy: Vec<XYCoords>,
    extent: Extent,

    source: Option<String>,
    valid_time: Option<NaiveDateTime>,

    style: LineStyle,
    line: Option<LineHandle>,
    highlight: Option<LineHandle>,
    barbs: Option<WindBarbSet>,
}

impl Profile {
    /// Create a profile from `(pressure, temperature)` pairs.
    ///
    /// At least two points are needed to draw a line.
    ///
    /// ```
    /// use metfor::{Celsius, HectoPascal};
    /// use tephigram::Profile;
    ///
    /// let snd = Profile::new(&[
    ///     (HectoPascal(1000.0), Celsius(20.0)),
    ///     (HectoPascal(850.0), Celsius(10.0)),
    /// ]).unwrap();
    /// assert_eq!(snd.points().len(), 2);
    ///
    /// assert!(Profile::new(&[(HectoPascal(1000.0), Celsius(20.0))]).is_err());
    /// ```
    pub fn new(data: &[(HectoPascal, Celsius)]) -> Result<Self> {
        let points = PointSeries::from_pressure_temperature(data.iter().cloned());

        if !points.is_drawable() {
            return Err(TephiError::InvalidInput(format!(
                "a profile needs at least 2 pressure, temperature pairs, got {}",
                points.len()
            )));
        }

        let xy = points.to_xy();
        let extent = points
            .extent()
            .ok_or_else(|| TephiError::InvalidInput("empty profile".to_owned()))?;

        Ok(Profile {
            points,
            xy,
            extent,
            source: None,
            valid_time: None,
            style: LineStyle::new("black", 1.0),
            line: None,
            highlight: None,
            barbs: None,
        })
    }

    /// Create a profile from sounding columns, skipping levels with a missing value.
    pub fn from_columns(
        pressure: &[Optioned<HectoPascal>],
        temperature: &[Optioned<Celsius>],
    ) -> Result<Self> {
        if pressure.len() != temperature.len() {
            return Err(TephiError::InvalidInput(format!(
                "pressure and temperature columns differ in length, {} and {}",
                pressure.len(),
                temperature.len()
            )));
        }

        let data: Vec<(HectoPascal, Celsius)> = izip!(pressure, temperature)
            .enumerate()
            .filter_map(|(i, (p, t))| match (p.into_option(), t.into_option()) {
                (Some(p), Some(t)) => Some((p, t)),
                _ => {
                    warn!("skipping profile row {}, missing value", i);
                    None
                }
            })
            .collect();

        Self::new(&data)
    }

    /// Builder method to set a description of where the sounding came from.
    pub fn with_source_description<S>(mut self, desc: S) -> Self
    where
        Option<String>: From<S>,
    {
        self.source = Option::from(desc);
        self
    }

    /// Where the sounding came from.
    #[inline]
    pub fn source_description(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Builder method to set the valid time of the sounding.
    pub fn with_valid_time<T>(mut self, valid_time: T) -> Self
    where
        Option<NaiveDateTime>: From<T>,
    {
        self.valid_time = Option::from(valid_time);
        self
    }

    /// Valid time of the sounding.
    #[inline]
    pub fn valid_time(&self) -> Option<NaiveDateTime> {
        self.valid_time
    }

    /// Legend text built from the source description and valid time, if either is set.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use metfor::{Celsius, HectoPascal};
    /// use tephigram::Profile;
    ///
    /// let snd = Profile::new(&[
    ///     (HectoPascal(1000.0), Celsius(20.0)),
    ///     (HectoPascal(850.0), Celsius(10.0)),
    /// ])
    /// .unwrap()
    /// .with_source_description("Camborne".to_owned())
    /// .with_valid_time(NaiveDate::from_ymd(2011, 6, 2).and_hms(12, 0, 0));
    ///
    /// assert_eq!(snd.legend_label().unwrap(), "Camborne 2011-06-02 12Z");
    /// ```
    pub fn legend_label(&self) -> Option<String> {
        let time = self
            .valid_time
            .map(|vt| format!("{}Z", vt.format("%Y-%m-%d %H")));

        match (self.source.as_ref(), time) {
            (Some(src), Some(time)) => Some(format!("{} {}", src, time)),
            (Some(src), None) => Some(src.clone()),
            (None, Some(time)) => Some(time),
            (None, None) => None,
        }
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

    /// Range covered by the profile.
    #[inline]
    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    /// Style of the profile line.
    #[inline]
    pub fn style(&self) -> &LineStyle {
        &self.style
    }

    /// The line on the surface, once plotted.
    #[inline]
    pub fn line(&self) -> Option<LineHandle> {
        self.line
    }

    /// Wind barbs attached to this profile.
    #[inline]
    pub fn wind_barbs(&self) -> Option<&WindBarbSet> {
        self.barbs.as_ref()
    }

    /// Draw the profile line, replacing any earlier one.
    pub fn plot<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S, style: LineStyle) -> LineHandle {
        if let Some(old) = self.line.take() {
            surface.remove_line(old);
        }

        let legend = self.legend_label();
        let line = surface.create_line(&self.xy, &style, legend.as_deref());
        self.style = style;
        self.line = Some(line);

        line
    }

    /// Is the highlight halo drawn?
    #[inline]
    pub fn has_highlight(&self) -> bool {
        self.highlight.is_some()
    }

    /// Set the highlight halo on or off, or toggle it with `None`. Returns the new state.
    pub fn highlight<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        state: Option<bool>,
    ) -> bool {
        let state = state.unwrap_or(!self.has_highlight());

        match (state, self.highlight) {
            (true, None) => {
                let mut halo = LineStyle::new("grey", self.style.linewidth * HIGHLIGHT_WIDTH_FACTOR);
                halo.alpha = 0.3;
                halo.zorder = ISOPLETH_ZORDER - 1;
                self.highlight = Some(surface.create_line(&self.xy, &halo, None));
            }
            (false, Some(halo)) => {
                surface.remove_line(halo);
                self.highlight = None;
            }
            _ => {}
        }

        debug!("profile {:?} highlight {}", self.source, state);
        state
    }

    /// Attach wind barbs and draw them, replacing any attached earlier.
    ///
    /// Barbs without a color of their own take the color of the profile line.
    pub fn barbs<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S, mut barbs: WindBarbSet) {
        if let Some(old) = self.barbs.take() {
            old.remove(surface);
        }

        let style = barbs.style().clone().or_color(&self.style.color);
        barbs.set_style(style);
        barbs.refresh(surface);
        self.barbs = Some(barbs);
    }

    /// Bring the barbs in line with the surface's current viewport. Returns whether anything
    /// changed.
    pub fn refresh<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.barbs
            .as_mut()
            .map(|barbs| barbs.refresh(surface))
            .unwrap_or(false)
    }
}

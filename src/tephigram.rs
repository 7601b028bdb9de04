//! The diagram: profiles, isopleth families and grid lines sharing one drawing surface.
use crate::{
    barbs::WindBarbSet,
    constants::{DEFAULT_WIDTH, GRID_PRESSURE_EXTENT, ISOPLETH_ZORDER},
    error::{Result, TephiError},
    geometry::{Viewport, XYCoords},
    isopleths::{Isopleth, IsoplethFamily, IsoplethKind},
    locator::{format_isotherm, format_status, format_theta, Locator},
    plot_group::{FamilyConfig, PlotCollection},
    profile::Profile,
    style::{LineStyle, LineStyleOverride},
    surface::{DrawingSurface, LineHandle},
    transforms::{pressure_temperature_to_xy, xy_to_temperature_theta},
};
use log::{debug, warn};
use metfor::{Celsius, HectoPascal, Quantity};

/// Padding added around the profiles, as a fraction of their width, when centering the view.
const AUTO_X_PADDING: f64 = 0.25;
/// Padding added around the profiles, as a fraction of their height, when centering the view.
const AUTO_Y_PADDING: f64 = 0.05;
/// More grid lines than this in one family means the viewport is unusable, draw none.
const MAX_GRID_LINES: usize = 1000;

/// Refers to a profile plotted on a [`Tephigram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileHandle(pub usize);

/// Settings for a [`Tephigram`].
#[derive(Debug, Clone, PartialEq)]
pub struct TephigramConfig {
    isotherm_locator: Locator,
    dry_adiabat_locator: Locator,
    anchor: Option<Vec<(HectoPascal, Celsius)>>,
    initial_width: f64,
    grid_style: LineStyle,
    isobars: FamilyConfig,
    wet_adiabats: FamilyConfig,
    mixing_ratios: FamilyConfig,
}

impl Default for TephigramConfig {
    fn default() -> Self {
        let mut grid_style = LineStyle::new("grey", 0.5);
        grid_style.zorder = ISOPLETH_ZORDER - 2;

        TephigramConfig {
            isotherm_locator: Locator::default(),
            dry_adiabat_locator: Locator::default(),
            anchor: None,
            initial_width: DEFAULT_WIDTH,
            grid_style,
            isobars: FamilyConfig::isobars(),
            wet_adiabats: FamilyConfig::wet_adiabats(),
            mixing_ratios: FamilyConfig::mixing_ratios(),
        }
    }
}

impl TephigramConfig {
    /// The default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spacing of the isotherm grid lines.
    pub fn with_isotherm_locator(mut self, locator: Locator) -> Self {
        self.isotherm_locator = locator;
        self
    }

    /// Set the spacing of the dry adiabat grid lines.
    pub fn with_dry_adiabat_locator(mut self, locator: Locator) -> Self {
        self.dry_adiabat_locator = locator;
        self
    }

    /// Fix the view to a bottom left and a top right `(pressure, temperature)` corner.
    ///
    /// Without an anchor the view is centered on the profiles each time one is plotted.
    pub fn with_anchor<T>(mut self, anchor: T) -> Self
    where
        Option<Vec<(HectoPascal, Celsius)>>: From<T>,
    {
        self.anchor = Option::from(anchor);
        self
    }

    /// Set the viewport width that corresponds to a zoom level of 1.
    pub fn with_initial_width(mut self, width: f64) -> Self {
        self.initial_width = width;
        self
    }

    /// Adjust the grid line style.
    pub fn with_grid_style(mut self, over: &LineStyleOverride) -> Self {
        self.grid_style = self.grid_style.merged(over);
        self
    }

    /// Replace the isobar family configuration.
    pub fn with_isobars(mut self, config: FamilyConfig) -> Self {
        self.isobars = config;
        self
    }

    /// Replace the wet adiabat family configuration.
    pub fn with_wet_adiabats(mut self, config: FamilyConfig) -> Self {
        self.wet_adiabats = config;
        self
    }

    /// Replace the mixing ratio family configuration.
    pub fn with_mixing_ratios(mut self, config: FamilyConfig) -> Self {
        self.mixing_ratios = config;
        self
    }

    // Anchor corners as plot plane points, after checking their shape and order.
    fn anchor_points(&self) -> Result<Option<[XYCoords; 2]>> {
        let anchor = match self.anchor {
            Some(ref anchor) => anchor,
            None => return Ok(None),
        };

        if anchor.len() != 2 {
            return Err(TephiError::InvalidAnchor(
                "expecting [(bottom-left-pressure, bottom-left-temperature), \
                 (top-right-pressure, top-right-temperature)]",
            ));
        }

        let (bottom_pressure, bottom_temp) = anchor[0];
        let (top_pressure, top_temp) = anchor[1];

        if bottom_pressure < top_pressure {
            return Err(TephiError::InvalidAnchor("pressure range is inverted"));
        }
        if bottom_temp < top_temp {
            return Err(TephiError::InvalidAnchor("temperature range is inverted"));
        }

        Ok(Some([
            pressure_temperature_to_xy(bottom_pressure, bottom_temp),
            pressure_temperature_to_xy(top_pressure, top_temp),
        ]))
    }
}

/// Isotherms or dry adiabats at the locator's ticks across the current view.
#[derive(Debug, Clone)]
struct GridLines {
    family: IsoplethFamily,
    locator: Locator,
    lines: Vec<(i64, LineHandle)>,
}

impl GridLines {
    fn new(family: IsoplethFamily, locator: Locator) -> Self {
        GridLines {
            family,
            locator,
            lines: vec![],
        }
    }

    fn kind(&self, tick: i64) -> IsoplethKind {
        let (top, bottom) = GRID_PRESSURE_EXTENT;
        let value = Celsius(tick as f64);
        let min_pressure = HectoPascal(top);
        let max_pressure = HectoPascal(bottom);

        match self.family {
            IsoplethFamily::DryAdiabat => IsoplethKind::DryAdiabat {
                theta: value,
                min_pressure,
                max_pressure,
            },
            _ => IsoplethKind::Isotherm {
                temperature: value,
                min_pressure,
                max_pressure,
            },
        }
    }

    fn ticks(&self) -> impl Iterator<Item = i64> + '_ {
        self.lines.iter().map(|(tick, _)| *tick)
    }

    /// Cover `start..=stop`, dropping lines that fell out of range. Returns whether any line was
    /// added or removed.
    fn refresh<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        start: f64,
        stop: f64,
        style: &LineStyle,
    ) -> bool {
        let span = (stop - start) / self.locator.step() as f64;
        if !start.is_finite() || !stop.is_finite() || span > MAX_GRID_LINES as f64 {
            warn!("skipping {} grid lines over {} to {}", self.family, start, stop);
            return false;
        }

        let (ticks, _, _) = self.locator.locate(start, stop);
        let mut changed = false;

        let (keep, drop): (Vec<_>, Vec<_>) = self
            .lines
            .drain(..)
            .partition(|(tick, _)| ticks.contains(tick));
        for (_, line) in drop {
            surface.remove_line(line);
            changed = true;
        }
        self.lines = keep;

        for tick in ticks {
            if self.lines.iter().all(|(t, _)| *t != tick) {
                let iso = Isopleth::new(self.kind(tick));
                let line = surface.create_line(iso.xy(), style, None);
                self.lines.push((tick, line));
                changed = true;
            }
        }
        self.lines.sort_by_key(|(tick, _)| *tick);

        changed
    }
}

/// A tephigram drawn on a surface.
///
/// The tephigram owns its surface. After changing the viewport call [`Tephigram::refresh`], or
/// use [`Tephigram::set_viewport`] which does both.
#[derive(Debug)]
pub struct Tephigram<S: DrawingSurface> {
    surface: S,
    config: TephigramConfig,
    anchor: Option<[XYCoords; 2]>,
    profiles: Vec<Profile>,
    isobars: Option<PlotCollection>,
    wet_adiabats: Option<PlotCollection>,
    mixing_ratios: Option<PlotCollection>,
    isotherms: GridLines,
    dry_adiabats: GridLines,
}

impl<S: DrawingSurface> Tephigram<S> {
    /// Create a diagram on `surface`.
    ///
    /// With an anchor the surface viewport is set to the anchor's extent, otherwise it is left
    /// alone until the first profile is plotted. Grid lines are drawn straight away, isopleth
    /// families only once added.
    pub fn new(surface: S, config: TephigramConfig) -> Result<Self> {
        let anchor = config.anchor_points()?;
        let isotherms = GridLines::new(IsoplethFamily::Isotherm, config.isotherm_locator);
        let dry_adiabats = GridLines::new(IsoplethFamily::DryAdiabat, config.dry_adiabat_locator);

        let mut tpg = Tephigram {
            surface,
            config,
            anchor,
            profiles: vec![],
            isobars: None,
            wet_adiabats: None,
            mixing_ratios: None,
            isotherms,
            dry_adiabats,
        };

        if let Some(viewport) = tpg.calculate_extents(None, None) {
            debug!("anchored viewport {:?}", viewport);
            tpg.surface.set_viewport(viewport);
        }
        tpg.refresh();

        Ok(tpg)
    }

    /// The surface being drawn on.
    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface. Call [`Tephigram::refresh`] after moving the viewport.
    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Give up the diagram and keep the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// The settings in use.
    #[inline]
    pub fn config(&self) -> &TephigramConfig {
        &self.config
    }

    /// Current viewport width relative to the initial width.
    pub fn zoom(&self) -> f64 {
        self.surface.viewport().width() / self.config.initial_width
    }

    /// Draw the isobars from the diagram configuration, replacing any drawn earlier.
    pub fn add_isobars(&mut self) -> Result<()> {
        self.add_family(self.config.isobars.clone())
    }

    /// Draw the wet adiabats from the diagram configuration, replacing any drawn earlier.
    pub fn add_wet_adiabats(&mut self) -> Result<()> {
        self.add_family(self.config.wet_adiabats.clone())
    }

    /// Draw the humidity mixing ratio lines from the diagram configuration, replacing any drawn
    /// earlier.
    pub fn add_mixing_ratios(&mut self) -> Result<()> {
        self.add_family(self.config.mixing_ratios.clone())
    }

    /// Draw a family with custom ticks, groups or styles, replacing any of that family drawn
    /// earlier.
    ///
    /// Isotherms and dry adiabats are grid lines placed by the locators, so only isobars, wet
    /// adiabats and mixing ratios can be added this way.
    pub fn add_family(&mut self, config: FamilyConfig) -> Result<()> {
        let slot = match config.family() {
            IsoplethFamily::Isobar => &mut self.isobars,
            IsoplethFamily::WetAdiabat => &mut self.wet_adiabats,
            IsoplethFamily::MixingRatio => &mut self.mixing_ratios,
            family => {
                return Err(TephiError::InvalidInput(format!(
                    "{} lines are placed by a locator",
                    family
                )))
            }
        };

        // Build first so a bad configuration leaves the old lines alone.
        let coll = PlotCollection::new(&mut self.surface, &config)?;
        if let Some(old) = slot.replace(coll) {
            old.remove(&mut self.surface);
        }

        self.refresh();
        Ok(())
    }

    /// The isobars, if added.
    #[inline]
    pub fn isobars(&self) -> Option<&PlotCollection> {
        self.isobars.as_ref()
    }

    /// The wet adiabats, if added.
    #[inline]
    pub fn wet_adiabats(&self) -> Option<&PlotCollection> {
        self.wet_adiabats.as_ref()
    }

    /// The mixing ratio lines, if added.
    #[inline]
    pub fn mixing_ratios(&self) -> Option<&PlotCollection> {
        self.mixing_ratios.as_ref()
    }

    /// Plot a sounding from `(pressure, temperature)` pairs.
    pub fn plot(
        &mut self,
        data: &[(HectoPascal, Celsius)],
        style: &LineStyleOverride,
    ) -> Result<ProfileHandle> {
        let profile = Profile::new(data)?;
        Ok(self.plot_profile(profile, style))
    }

    /// Plot a prepared profile.
    ///
    /// Without an anchor the view is re-centered on all the profiles.
    pub fn plot_profile(&mut self, mut profile: Profile, style: &LineStyleOverride) -> ProfileHandle {
        let style = LineStyle::new("black", 1.0).merged(style);
        profile.plot(&mut self.surface, style);
        self.profiles.push(profile);

        if self.anchor.is_none() {
            if let Some(viewport) = self.calculate_extents(Some(AUTO_X_PADDING), Some(AUTO_Y_PADDING)) {
                self.surface.set_viewport(viewport);
            }
        }
        self.refresh();

        ProfileHandle(self.profiles.len() - 1)
    }

    /// Look up a profile.
    pub fn profile(&self, handle: ProfileHandle) -> Option<&Profile> {
        self.profiles.get(handle.0)
    }

    /// All the profiles in the order plotted.
    #[inline]
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Attach wind barbs to a profile.
    pub fn barbs(&mut self, handle: ProfileHandle, barbs: WindBarbSet) -> Result<()> {
        let surface = &mut self.surface;
        let profile = self
            .profiles
            .get_mut(handle.0)
            .ok_or_else(|| no_profile(handle))?;
        profile.barbs(surface, barbs);
        Ok(())
    }

    /// Turn the highlight of a profile on or off, or toggle it with `None`. Returns the new state.
    pub fn highlight(&mut self, handle: ProfileHandle, state: Option<bool>) -> Result<bool> {
        let surface = &mut self.surface;
        let profile = self
            .profiles
            .get_mut(handle.0)
            .ok_or_else(|| no_profile(handle))?;
        Ok(profile.highlight(surface, state))
    }

    /// Profiles that are currently highlighted.
    pub fn highlighted(&self) -> Vec<ProfileHandle> {
        self.profiles
            .iter()
            .enumerate()
            .filter(|(_, p)| p.has_highlight())
            .map(|(i, _)| ProfileHandle(i))
            .collect()
    }

    /// The profile drawn with `line`, for picking.
    pub fn profile_for_line(&self, line: LineHandle) -> Result<ProfileHandle> {
        self.profiles
            .iter()
            .position(|p| p.line() == Some(line))
            .map(ProfileHandle)
            .ok_or_else(|| TephiError::InvalidInput("picker cannot find the profile".to_owned()))
    }

    /// The plot plane region covering the anchor, or all the profiles if there is no anchor.
    ///
    /// The padding factors widen the region by that fraction of its size on each side. Returns
    /// `None` if there is nothing to cover.
    pub fn calculate_extents(&self, xfactor: Option<f64>, yfactor: Option<f64>) -> Option<Viewport> {
        let points: Vec<XYCoords> = match self.anchor {
            Some(corners) => corners.to_vec(),
            None => self
                .profiles
                .iter()
                .flat_map(|p| p.xy().iter().cloned())
                .collect(),
        };

        if points.is_empty() {
            return None;
        }

        let (mut min_x, mut max_x, mut min_y, mut max_y) = points.iter().fold(
            (
                std::f64::INFINITY,
                std::f64::NEG_INFINITY,
                std::f64::INFINITY,
                std::f64::NEG_INFINITY,
            ),
            |(x0, x1, y0, y1), p| (x0.min(p.x), x1.max(p.x), y0.min(p.y), y1.max(p.y)),
        );

        if let Some(factor) = xfactor {
            let delta = max_x - min_x;
            min_x -= factor * delta;
            max_x += factor * delta;
        }

        if let Some(factor) = yfactor {
            let delta = max_y - min_y;
            min_y -= factor * delta;
            max_y += factor * delta;
        }

        Some(Viewport::new((min_x, max_x), (min_y, max_y)))
    }

    /// Move the viewport and refresh. Returns whether anything changed.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        self.surface.set_viewport(viewport);
        self.refresh()
    }

    /// Bring barbs, grid lines and isopleth families in line with the current viewport.
    ///
    /// Returns whether anything changed visibility, so the caller knows to redraw.
    pub fn refresh(&mut self) -> bool {
        let viewport = self.surface.viewport();
        let zoom = self.zoom();
        let focus = viewport.center();
        let surface = &mut self.surface;
        let mut changed = false;

        for profile in self.profiles.iter_mut() {
            changed = profile.refresh(surface) || changed;
        }

        let (t_range, theta_range) = temperature_theta_range(&viewport);
        let grid_style = &self.config.grid_style;
        changed = self
            .isotherms
            .refresh(surface, t_range.0, t_range.1, grid_style)
            || changed;
        changed = self
            .dry_adiabats
            .refresh(surface, theta_range.0, theta_range.1, grid_style)
            || changed;

        for coll in self
            .isobars
            .iter_mut()
            .chain(self.wet_adiabats.iter_mut())
            .chain(self.mixing_ratios.iter_mut())
        {
            changed = coll.refresh(surface, zoom, focus) || changed;
        }

        changed
    }

    /// Grid tick values and their labels, isotherms first then dry adiabats.
    pub fn grid_ticks(&self) -> (Vec<(i64, String)>, Vec<(i64, String)>) {
        (
            self.isotherms
                .ticks()
                .map(|t| (t, format_isotherm(t as f64)))
                .collect(),
            self.dry_adiabats
                .ticks()
                .map(|t| (t, format_theta(t as f64)))
                .collect(),
        )
    }

    /// Status bar text for the plot plane point `(x, y)`.
    pub fn status_bar(&self, x: f64, y: f64) -> String {
        format_status(x, y, &self.surface.viewport(), self.config.initial_width)
    }
}

fn no_profile(handle: ProfileHandle) -> TephiError {
    TephiError::InvalidInput(format!("no profile {:?}", handle))
}

// Temperature and theta ranges spanned by the corners of the viewport.
fn temperature_theta_range(viewport: &Viewport) -> ((f64, f64), (f64, f64)) {
    let corners = [
        XYCoords::new(viewport.x0, viewport.y0),
        XYCoords::new(viewport.x0, viewport.y1),
        XYCoords::new(viewport.x1, viewport.y0),
        XYCoords::new(viewport.x1, viewport.y1),
    ];

    corners
        .iter()
        .map(|&c| xy_to_temperature_theta(c))
        .map(|(t, theta)| (t.unpack(), theta.unpack()))
        .fold(
            (
                (std::f64::INFINITY, std::f64::NEG_INFINITY),
                (std::f64::INFINITY, std::f64::NEG_INFINITY),
            ),
            |((t0, t1), (th0, th1)), (t, th)| ((t0.min(t), t1.max(t)), (th0.min(th), th1.max(th))),
        )
}

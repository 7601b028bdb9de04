//! Decide which isopleths are shown at each zoom level and where their labels go.
//!
//! A family of isopleths is split into [`PlotGroup`]s, each with a tick step and a zoom threshold.
//! Coarse groups stay visible when zoomed out, finer groups only appear as the user zooms in. A
//! [`PlotCollection`] holds all the groups for one family, with every tick in at most one group.
use crate::{
    constants::{
        ISOBAR_FIXED, ISOBAR_SPEC, MAX_PRESSURE, MAX_THETA, MAX_WET_ADIABAT, MIN_PRESSURE,
        MIN_TEMPERATURE, MIN_THETA, MIN_WET_ADIABAT, MIXING_RATIOS, MIXING_RATIO_SPEC,
        WET_ADIABAT_SPEC,
    },
    error::{Result, TephiError},
    geometry::XYCoords,
    isopleths::{in_view_mask, Isopleth, IsoplethFamily, IsoplethKind},
    style::{HAlign, LineStyle, LineStyleOverride, TextStyle, TextStyleOverride, VAlign},
    surface::{DrawingSurface, LabelHandle, LineHandle},
};
use itertools::izip;
use log::{debug, trace, warn};
use metfor::{Celsius, HectoPascal};

/// The tick step of a group and the zoom level above which it is hidden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSpec {
    /// Take every `step`-th tick.
    pub step: u32,
    /// Hide the group when zoomed out beyond this, `None` to always show it.
    pub zoom: Option<f64>,
}

impl From<(u32, f64)> for GroupSpec {
    fn from((step, zoom): (u32, f64)) -> Self {
        GroupSpec {
            step,
            zoom: Some(zoom),
        }
    }
}

impl From<(u32, Option<f64>)> for GroupSpec {
    fn from((step, zoom): (u32, Option<f64>)) -> Self {
        GroupSpec { step, zoom }
    }
}

/// Where the candidate ticks for a family come from.
#[derive(Debug, Clone, PartialEq)]
pub enum TickSource {
    /// Multiples of the group step up to and including `stop`.
    Range {
        /// Largest possible tick.
        stop: f64,
    },
    /// Every `step`-th value of an explicit list, starting with value number `step`.
    Values(Vec<f64>),
}

impl TickSource {
    /// The candidate ticks for one group step.
    fn candidates(&self, step: u32) -> Vec<f64> {
        match self {
            TickSource::Range { stop } => {
                let step = f64::from(step);
                let stop = *stop;
                (1u32..)
                    .map(|i| f64::from(i) * step)
                    .take_while(|&tick| tick <= stop)
                    .collect()
            }
            TickSource::Values(vals) => vals
                .iter()
                .skip(step as usize - 1)
                .step_by(step as usize)
                .cloned()
                .collect(),
        }
    }
}

/// Split the ticks into disjoint groups, coarsest step first.
///
/// Each group claims its candidate ticks at or above `minimum` that no coarser group has already
/// claimed. Groups left with nothing are dropped. Ticks within a group are in ascending order.
pub fn partition(
    spec: &[GroupSpec],
    ticks: &TickSource,
    minimum: Option<f64>,
) -> Result<Vec<(GroupSpec, Vec<f64>)>> {
    if spec.is_empty() || spec.iter().any(|s| s.step == 0) {
        return Err(TephiError::EmptySpec);
    }

    if let Some(minimum) = minimum {
        match ticks {
            TickSource::Range { stop } if minimum > *stop => {
                return Err(TephiError::MinimumExceedsBound {
                    minimum,
                    bound: *stop,
                });
            }
            TickSource::Values(vals) if vals.iter().all(|&v| minimum > v) => {
                return Err(TephiError::MinimumExceedsValues { minimum });
            }
            _ => {}
        }
    }

    let mut spec = spec.to_vec();
    spec.sort_by(|a, b| b.step.cmp(&a.step));

    let mut claimed: Vec<f64> = vec![];
    let groups: Vec<(GroupSpec, Vec<f64>)> = spec
        .into_iter()
        .map(|group| {
            let mut vals: Vec<f64> = ticks
                .candidates(group.step)
                .into_iter()
                .filter(|&v| minimum.map(|m| v >= m).unwrap_or(true))
                .filter(|v| !claimed.contains(v))
                .collect();
            vals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            vals.dedup();

            claimed.extend_from_slice(&vals);
            (group, vals)
        })
        .filter(|(_, vals)| !vals.is_empty())
        .collect();

    if groups.is_empty() {
        return Err(TephiError::NoPlotGroups);
    }

    Ok(groups)
}

/// Everything needed to build the [`PlotCollection`] for one family.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyConfig {
    family: IsoplethFamily,
    spec: Vec<GroupSpec>,
    ticks: TickSource,
    fixed: Vec<f64>,
    minimum: Option<f64>,
    xfocus: bool,
    extent: FamilyExtent,
    line: LineStyle,
    text: TextStyle,
}

impl FamilyConfig {
    /// The default isobars, every 25 hPa from 50 to 1000 hPa.
    pub fn isobars() -> Self {
        FamilyConfig {
            family: IsoplethFamily::Isobar,
            spec: ISOBAR_SPEC.iter().cloned().map(GroupSpec::from).collect(),
            ticks: TickSource::Range { stop: MAX_PRESSURE },
            fixed: ISOBAR_FIXED.to_vec(),
            minimum: Some(MIN_PRESSURE),
            xfocus: false,
            extent: FamilyExtent::default_for(IsoplethFamily::Isobar),
            line: LineStyle::new("blue", 0.5),
            text: TextStyle::new("blue", 8.0, VAlign::Bottom, HAlign::Right),
        }
    }

    /// The default wet adiabats, every degree from 1 to 60 degC.
    pub fn wet_adiabats() -> Self {
        FamilyConfig {
            family: IsoplethFamily::WetAdiabat,
            spec: WET_ADIABAT_SPEC.iter().cloned().map(GroupSpec::from).collect(),
            ticks: TickSource::Range {
                stop: MAX_WET_ADIABAT,
            },
            fixed: vec![],
            minimum: Some(MIN_WET_ADIABAT),
            xfocus: true,
            extent: FamilyExtent::default_for(IsoplethFamily::WetAdiabat),
            line: LineStyle::new("orange", 0.5),
            text: TextStyle::new("orange", 8.0, VAlign::Bottom, HAlign::Left),
        }
    }

    /// The default humidity mixing ratio lines.
    pub fn mixing_ratios() -> Self {
        FamilyConfig {
            family: IsoplethFamily::MixingRatio,
            spec: MIXING_RATIO_SPEC.iter().cloned().map(GroupSpec::from).collect(),
            ticks: TickSource::Values(MIXING_RATIOS.to_vec()),
            fixed: vec![],
            minimum: None,
            xfocus: false,
            extent: FamilyExtent::default_for(IsoplethFamily::MixingRatio),
            line: LineStyle::new("green", 0.5),
            text: TextStyle::new("green", 8.0, VAlign::Bottom, HAlign::Right),
        }
    }

    /// Replace the `(step, zoom)` groups.
    pub fn with_spec<I, T>(mut self, spec: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<GroupSpec>,
    {
        self.spec = spec.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the candidate ticks.
    pub fn with_ticks(mut self, ticks: TickSource) -> Self {
        self.ticks = ticks;
        self
    }

    /// Replace the members that stay drawn at every zoom level.
    pub fn with_fixed<I: IntoIterator<Item = f64>>(mut self, fixed: I) -> Self {
        self.fixed = fixed.into_iter().collect();
        self
    }

    /// Set or clear the smallest tick.
    pub fn with_minimum<T>(mut self, minimum: T) -> Self
    where
        Option<f64>: From<T>,
    {
        self.minimum = Option::from(minimum);
        self
    }

    /// Place labels by horizontal distance only.
    pub fn with_xfocus(mut self, xfocus: bool) -> Self {
        self.xfocus = xfocus;
        self
    }

    /// Set the range each line is drawn over.
    ///
    /// Fails if the extent does not describe this family's lines, for example a pressure range
    /// for isobars.
    pub fn with_extent(mut self, extent: FamilyExtent) -> Result<Self> {
        if !extent.fits(self.family) {
            return Err(TephiError::InvalidInput(format!(
                "{:?} is not an extent for {} lines",
                extent, self.family
            )));
        }

        self.extent = extent;
        Ok(self)
    }

    /// The range each line is drawn over.
    #[inline]
    pub fn extent(&self) -> FamilyExtent {
        self.extent
    }

    /// Adjust the line style.
    pub fn with_line_style(mut self, over: &LineStyleOverride) -> Self {
        self.line = self.line.merged(over);
        self
    }

    /// Adjust the label style.
    pub fn with_text_style(mut self, over: &TextStyleOverride) -> Self {
        self.text = self.text.merged(over);
        self
    }

    /// The family being configured.
    #[inline]
    pub fn family(&self) -> IsoplethFamily {
        self.family
    }

    /// The resolved line style.
    #[inline]
    pub fn line_style(&self) -> &LineStyle {
        &self.line
    }

    /// The resolved label style.
    #[inline]
    pub fn text_style(&self) -> &TextStyle {
        &self.text
    }

    /// The line for one tick.
    pub fn kind(&self, value: f64) -> IsoplethKind {
        isopleth_kind(self.family, self.extent, value)
    }
}

/// The range the lines of a family are drawn over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FamilyExtent {
    /// Isobars, sampled over a potential temperature range.
    Theta {
        /// Low end of the theta range.
        min_theta: Celsius,
        /// High end of the theta range.
        max_theta: Celsius,
    },
    /// Isotherms, dry adiabats and mixing ratio lines, sampled over a pressure range.
    Pressure {
        /// Top of the lines.
        min_pressure: HectoPascal,
        /// Bottom of the lines.
        max_pressure: HectoPascal,
    },
    /// Wet adiabats, integrated up from `max_pressure` until they cool to `min_temperature`.
    WetAdiabat {
        /// Integration stops at this temperature.
        min_temperature: Celsius,
        /// Starting pressure.
        max_pressure: HectoPascal,
    },
}

impl FamilyExtent {
    /// The default extent for a family.
    pub fn default_for(family: IsoplethFamily) -> Self {
        match family {
            IsoplethFamily::Isobar => FamilyExtent::Theta {
                min_theta: Celsius(MIN_THETA),
                max_theta: Celsius(MAX_THETA),
            },
            IsoplethFamily::WetAdiabat => FamilyExtent::WetAdiabat {
                min_temperature: Celsius(MIN_TEMPERATURE),
                max_pressure: HectoPascal(MAX_PRESSURE),
            },
            IsoplethFamily::Isotherm | IsoplethFamily::DryAdiabat | IsoplethFamily::MixingRatio => {
                FamilyExtent::Pressure {
                    min_pressure: HectoPascal(MIN_PRESSURE),
                    max_pressure: HectoPascal(MAX_PRESSURE),
                }
            }
        }
    }

    /// Does this extent describe lines of `family`?
    pub fn fits(&self, family: IsoplethFamily) -> bool {
        match (self, family) {
            (FamilyExtent::Theta { .. }, IsoplethFamily::Isobar) => true,
            (FamilyExtent::WetAdiabat { .. }, IsoplethFamily::WetAdiabat) => true,
            (FamilyExtent::Pressure { .. }, IsoplethFamily::Isotherm)
            | (FamilyExtent::Pressure { .. }, IsoplethFamily::DryAdiabat)
            | (FamilyExtent::Pressure { .. }, IsoplethFamily::MixingRatio) => true,
            _ => false,
        }
    }
}

fn isopleth_kind(family: IsoplethFamily, extent: FamilyExtent, value: f64) -> IsoplethKind {
    use FamilyExtent::*;

    match (family, extent) {
        (IsoplethFamily::Isobar, Theta { min_theta, max_theta }) => IsoplethKind::Isobar {
            pressure: HectoPascal(value),
            min_theta,
            max_theta,
        },
        (
            IsoplethFamily::Isotherm,
            Pressure {
                min_pressure,
                max_pressure,
            },
        ) => IsoplethKind::Isotherm {
            temperature: Celsius(value),
            min_pressure,
            max_pressure,
        },
        (
            IsoplethFamily::DryAdiabat,
            Pressure {
                min_pressure,
                max_pressure,
            },
        ) => IsoplethKind::DryAdiabat {
            theta: Celsius(value),
            min_pressure,
            max_pressure,
        },
        (
            IsoplethFamily::MixingRatio,
            Pressure {
                min_pressure,
                max_pressure,
            },
        ) => IsoplethKind::MixingRatio {
            mixing_ratio: value,
            min_pressure,
            max_pressure,
        },
        (
            IsoplethFamily::WetAdiabat,
            WetAdiabat {
                min_temperature,
                max_pressure,
            },
        ) => IsoplethKind::WetAdiabat {
            temperature: Celsius(value),
            min_temperature,
            max_pressure,
        },
        // Only reachable with an extent `with_extent` would have refused.
        (family, _) => isopleth_kind(family, FamilyExtent::default_for(family), value),
    }
}

#[derive(Debug, Clone)]
struct Member {
    isopleth: Isopleth,
    line: LineHandle,
    label: LabelHandle,
    fixed: bool,
}

/// Isopleths sharing a tick step and zoom threshold.
#[derive(Debug, Clone)]
pub struct PlotGroup {
    spec: GroupSpec,
    xfocus: bool,
    members: Vec<Member>,
    visible: bool,
}

impl PlotGroup {
    /// Generate and draw one isopleth per tick. Everything starts out visible.
    pub fn new<S: DrawingSurface + ?Sized>(
        surface: &mut S,
        spec: GroupSpec,
        ticks: &[f64],
        config: &FamilyConfig,
    ) -> Self {
        let focus = surface.viewport().center();

        let members: Vec<Member> = ticks
            .iter()
            .filter_map(|&value| {
                let isopleth = Isopleth::new(config.kind(value));
                if !isopleth.points().is_drawable() {
                    warn!("skipping {} {}, fewer than two points", config.family, value);
                    return None;
                }

                let anchor = isopleth
                    .nearest_index(focus, config.xfocus)
                    .map(|i| isopleth.xy()[i])
                    .unwrap_or_default();

                let line = surface.create_line(isopleth.xy(), &config.line, None);
                let label = surface.create_label(anchor, &isopleth.label_text(), &config.text);

                // A group that is never hidden pins every member.
                let fixed = spec.zoom.is_none() || config.fixed.contains(&value);

                Some(Member {
                    isopleth,
                    line,
                    label,
                    fixed,
                })
            })
            .collect();

        debug!(
            "{} group step {} zoom {:?} with {} members",
            config.family,
            spec.step,
            spec.zoom,
            members.len()
        );

        PlotGroup {
            spec,
            xfocus: config.xfocus,
            members,
            visible: true,
        }
    }

    /// The tick step.
    #[inline]
    pub fn step(&self) -> u32 {
        self.spec.step
    }

    /// The zoom threshold.
    #[inline]
    pub fn zoom(&self) -> Option<f64> {
        self.spec.zoom
    }

    /// Were the non-fixed members shown by the last refresh?
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The tick of each member, ascending.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.members.iter().map(|m| m.isopleth.value())
    }

    /// Ticks of the members that are drawn at every zoom level.
    pub fn fixed_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.members
            .iter()
            .filter(|m| m.fixed)
            .map(|m| m.isopleth.value())
    }

    /// Look up a member by its tick.
    pub fn isopleth(&self, value: f64) -> Option<&Isopleth> {
        self.members
            .iter()
            .find(|m| m.isopleth.value() == value)
            .map(|m| &m.isopleth)
    }

    /// Surface handles of the member with tick `value`.
    pub fn handles(&self, value: f64) -> Option<(LineHandle, LabelHandle)> {
        self.members
            .iter()
            .find(|m| m.isopleth.value() == value)
            .map(|m| (m.line, m.label))
    }

    /// Show or hide the group for `zoom` and move labels toward `focus`.
    ///
    /// Returns whether any line changed visibility.
    pub fn refresh<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        zoom: f64,
        focus: XYCoords,
    ) -> bool {
        let show = self.spec.zoom.map(|threshold| zoom <= threshold).unwrap_or(true);
        let mut changed = false;

        if show && !self.visible {
            for m in &self.members {
                surface.set_line_visible(m.line, true);
                surface.set_label_visible(m.label, true);
            }
            self.visible = true;
            changed = true;
            debug!("showing group step {} at zoom {:.3}", self.spec.step, zoom);
        } else if !show && self.visible {
            for m in self.members.iter().filter(|m| !m.fixed) {
                surface.set_line_visible(m.line, false);
                surface.set_label_visible(m.label, false);
                changed = true;
            }
            self.visible = false;
            debug!("hiding group step {} at zoom {:.3}", self.spec.step, zoom);
        }

        self.place_labels(surface, focus);

        changed
    }

    fn place_labels<S: DrawingSurface + ?Sized>(&self, surface: &mut S, focus: XYCoords) {
        let viewport = surface.viewport();
        let in_view = in_view_mask(self.members.iter().map(|m| &m.isopleth), &viewport);

        let visible = self.visible;
        for (m, _) in izip!(&self.members, in_view)
            .filter(|(m, in_view)| *in_view && (visible || m.fixed))
        {
            if let Some(i) = m.isopleth.nearest_index(focus, self.xfocus) {
                let pos = m.isopleth.xy()[i];
                trace!("label {} to {:?}", m.isopleth.label_text(), pos);
                surface.set_label_position(m.label, pos);
            }
        }
    }
}

/// All the plot groups for one isopleth family.
#[derive(Debug, Clone)]
pub struct PlotCollection {
    family: IsoplethFamily,
    groups: Vec<PlotGroup>,
}

impl PlotCollection {
    /// Partition the family's ticks and draw every group.
    pub fn new<S: DrawingSurface + ?Sized>(surface: &mut S, config: &FamilyConfig) -> Result<Self> {
        let groups: Vec<PlotGroup> = partition(&config.spec, &config.ticks, config.minimum)?
            .into_iter()
            .map(|(spec, ticks)| PlotGroup::new(surface, spec, &ticks, config))
            .collect();

        debug!("{} collection with {} groups", config.family, groups.len());

        Ok(PlotCollection {
            family: config.family,
            groups,
        })
    }

    /// The family in this collection.
    #[inline]
    pub fn family(&self) -> IsoplethFamily {
        self.family
    }

    /// The groups, coarsest step first.
    #[inline]
    pub fn groups(&self) -> &[PlotGroup] {
        &self.groups
    }

    /// Take every line and label off the surface.
    pub fn remove<S: DrawingSurface + ?Sized>(self, surface: &mut S) {
        for m in self.groups.iter().flat_map(|g| g.members.iter()) {
            surface.remove_line(m.line);
            surface.remove_label(m.label);
        }
    }

    /// Refresh every group, returns whether anything changed.
    pub fn refresh<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        zoom: f64,
        focus: XYCoords,
    ) -> bool {
        self.groups
            .iter_mut()
            .fold(false, |changed, group| group.refresh(surface, zoom, focus) || changed)
    }
}

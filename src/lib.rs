#![warn(missing_docs)]
//! Geometry and drawing logic for tephigrams, the thermodynamic diagram used to plot
//! atmospheric soundings.
//!
//! A tephigram plots temperature against the natural log of potential temperature, rotated 45
//! degrees. This crate provides the coordinate transforms, generates the isopleths (isobars,
//! isotherms, dry and wet adiabats, humidity mixing ratio lines), computes wind barb glyphs and
//! decides which lines and labels are visible as the view is zoomed and panned. Rendering is left
//! to an implementation of [`DrawingSurface`].
//!
//! ```
//! use metfor::{Celsius, HectoPascal};
//! use tephigram::{
//!     LineStyleOverride, RecordingSurface, Tephigram, TephigramConfig, Viewport,
//! };
//!
//! let surface = RecordingSurface::new(Viewport::new((0.0, 700.0), (0.0, 700.0)));
//! let mut tpg = Tephigram::new(surface, TephigramConfig::new()).unwrap();
//!
//! let sounding = [
//!     (HectoPascal(1000.0), Celsius(20.0)),
//!     (HectoPascal(850.0), Celsius(10.0)),
//!     (HectoPascal(500.0), Celsius(-20.0)),
//! ];
//! let handle = tpg.plot(&sounding, &LineStyleOverride::new().with_color("red")).unwrap();
//! tpg.add_isobars().unwrap();
//!
//! assert!(tpg.profile(handle).is_some());
//! assert!(tpg.surface().visible_lines().count() > 1);
//! ```

//
// API
//
pub use crate::barbs::{bin_speed, speed_direction_to_uv, Barb, BarbGlyph, BarbStyle, WindBarbSet};
pub use crate::constants::PhysicalConstants;
pub use crate::error::{Result, TephiError};
pub use crate::geometry::{Viewport, XYCoords};
pub use crate::interpolation::linear_interpolate;
pub use crate::isopleths::{
    generate_points, in_view_mask, Bounds, Extent, ExtentIndex, Isopleth, IsoplethFamily,
    IsoplethKind, PointSeries,
};
pub use crate::locator::{format_isotherm, format_status, format_theta, Locator};
pub use crate::plot_group::{
    partition, FamilyConfig, FamilyExtent, GroupSpec, PlotCollection, PlotGroup, TickSource,
};
pub use crate::profile::Profile;
pub use crate::style::{
    HAlign, LineStyle, LineStyleKind, LineStyleOverride, Pivot, TextStyle, TextStyleOverride,
    VAlign,
};
pub use crate::surface::{
    DrawingSurface, GlyphHandle, LabelHandle, LineHandle, RecordedGlyph, RecordedLabel,
    RecordedLine, RecordingSurface,
};
pub use crate::tephigram::{ProfileHandle, Tephigram, TephigramConfig};

pub mod constants;
pub mod transforms;

/// Utility functions.
pub mod utility;

//
// Internal use only
//
mod barbs;
mod error;
mod geometry;
mod interpolation;
mod isopleths;
mod locator;
mod plot_group;
mod profile;
mod style;
mod surface;
mod tephigram;

#[cfg(test)]
mod test_data;

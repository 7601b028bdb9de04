//! Styles for the lines, labels and glyphs handed to the drawing surface.
//!
//! Each isopleth family has a default style. Callers adjust it with an override struct where every
//! field is optional, a set field always wins over the family default.
use crate::constants::ISOPLETH_ZORDER;
use strum_macros::{Display, EnumString};

/// How a line is dashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum LineStyleKind {
    /// A continuous line.
    #[strum(to_string = "solid", serialize = "-")]
    Solid,
    /// Long dashes.
    #[strum(to_string = "dashed", serialize = "--")]
    Dashed,
    /// Alternating dashes and dots.
    #[strum(to_string = "dashdot", serialize = "-.")]
    DashDot,
    /// Dots.
    #[strum(to_string = "dotted", serialize = ":")]
    Dotted,
}

/// Horizontal alignment of a label relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum HAlign {
    /// Anchor on the left edge of the text.
    #[strum(to_string = "left")]
    Left,
    /// Anchor in the middle of the text.
    #[strum(to_string = "center")]
    Center,
    /// Anchor on the right edge of the text.
    #[strum(to_string = "right")]
    Right,
}

/// Vertical alignment of a label relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum VAlign {
    /// Anchor on the top of the text.
    #[strum(to_string = "top")]
    Top,
    /// Anchor in the middle of the text.
    #[strum(to_string = "center")]
    Center,
    /// Anchor on the bottom of the text.
    #[strum(to_string = "bottom")]
    Bottom,
}

/// Where a barbless wind glyph is attached to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Pivot {
    /// The glyph starts at the anchor point.
    #[strum(to_string = "tip")]
    Tip,
    /// The glyph is centered on the anchor point.
    #[strum(to_string = "middle")]
    Middle,
}

impl Default for Pivot {
    fn default() -> Self {
        Pivot::Tip
    }
}

/// Fully resolved style of a line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    /// Line color, any name or hex string the surface understands.
    pub color: String,
    /// Line width in points.
    pub linewidth: f64,
    /// Dash pattern.
    pub linestyle: LineStyleKind,
    /// Clip the line to the plot area.
    pub clip: bool,
    /// Opacity, 0 to 1.
    pub alpha: f64,
    /// Drawing order, higher is on top.
    pub zorder: i32,
}

impl LineStyle {
    /// A solid, clipped, opaque line.
    pub fn new<S: Into<String>>(color: S, linewidth: f64) -> Self {
        LineStyle {
            color: color.into(),
            linewidth,
            linestyle: LineStyleKind::Solid,
            clip: true,
            alpha: 1.0,
            zorder: ISOPLETH_ZORDER,
        }
    }

    /// Apply an override, any field set in `over` replaces the one in `self`.
    pub fn merged(&self, over: &LineStyleOverride) -> LineStyle {
        LineStyle {
            color: over.color.clone().unwrap_or_else(|| self.color.clone()),
            linewidth: over.linewidth.unwrap_or(self.linewidth),
            linestyle: over.linestyle.unwrap_or(self.linestyle),
            clip: over.clip.unwrap_or(self.clip),
            alpha: over.alpha.unwrap_or(self.alpha),
            zorder: over.zorder.unwrap_or(self.zorder),
        }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle::new("black", 1.0)
    }
}

/// Caller supplied changes to a [`LineStyle`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineStyleOverride {
    /// Line color.
    pub color: Option<String>,
    /// Line width.
    pub linewidth: Option<f64>,
    /// Dash pattern.
    pub linestyle: Option<LineStyleKind>,
    /// Clip to the plot area.
    pub clip: Option<bool>,
    /// Opacity.
    pub alpha: Option<f64>,
    /// Drawing order.
    pub zorder: Option<i32>,
}

impl LineStyleOverride {
    /// An override that changes nothing.
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
        self.linewidth = Some(linewidth);
        self
    }

    /// Set the dash pattern.
    pub fn with_linestyle(mut self, linestyle: LineStyleKind) -> Self {
        self.linestyle = Some(linestyle);
        self
    }

    /// Set clipping.
    pub fn with_clip(mut self, clip: bool) -> Self {
        self.clip = Some(clip);
        self
    }

    /// Set the opacity.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Set the drawing order.
    pub fn with_zorder(mut self, zorder: i32) -> Self {
        self.zorder = Some(zorder);
        self
    }
}

/// Fully resolved style of a text label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub size: f64,
    /// Text color.
    pub color: String,
    /// Clip the label to the plot area.
    pub clip: bool,
    /// Vertical alignment.
    pub valign: VAlign,
    /// Horizontal alignment.
    pub halign: HAlign,
    /// Drawing order.
    pub zorder: i32,
}

impl TextStyle {
    /// A clipped label drawn just above the isopleths.
    pub fn new<S: Into<String>>(color: S, size: f64, valign: VAlign, halign: HAlign) -> Self {
        TextStyle {
            size,
            color: color.into(),
            clip: true,
            valign,
            halign,
            zorder: ISOPLETH_ZORDER + 1,
        }
    }

    /// Apply an override, any field set in `over` replaces the one in `self`.
    pub fn merged(&self, over: &TextStyleOverride) -> TextStyle {
        TextStyle {
            size: over.size.unwrap_or(self.size),
            color: over.color.clone().unwrap_or_else(|| self.color.clone()),
            clip: over.clip.unwrap_or(self.clip),
            valign: over.valign.unwrap_or(self.valign),
            halign: over.halign.unwrap_or(self.halign),
            zorder: over.zorder.unwrap_or(self.zorder),
        }
    }
}

/// Caller supplied changes to a [`TextStyle`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextStyleOverride {
    /// Font size.
    pub size: Option<f64>,
    /// Text color.
    pub color: Option<String>,
    /// Clip to the plot area.
    pub clip: Option<bool>,
    /// Vertical alignment.
    pub valign: Option<VAlign>,
    /// Horizontal alignment.
    pub halign: Option<HAlign>,
    /// Drawing order.
    pub zorder: Option<i32>,
}

impl TextStyleOverride {
    /// An override that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the color.
    pub fn with_color<S: Into<String>>(mut self, color: S) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the font size.
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the alignment.
    pub fn with_alignment(mut self, valign: VAlign, halign: HAlign) -> Self {
        self.valign = Some(valign);
        self.halign = Some(halign);
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_merge_precedence() {
        let family = LineStyle::new("blue", 0.5);

        let same = family.merged(&LineStyleOverride::new());
        assert_eq!(same, family);

        let over = LineStyleOverride::new()
            .with_color("red")
            .with_linestyle(LineStyleKind::Dashed);
        let merged = family.merged(&over);
        assert_eq!(merged.color, "red");
        assert_eq!(merged.linestyle, LineStyleKind::Dashed);
        assert_eq!(merged.linewidth, 0.5);
        assert!(merged.clip);
    }

    #[test]
    fn test_text_merge() {
        let family = TextStyle::new("green", 8.0, VAlign::Bottom, HAlign::Right);
        let merged = family.merged(&TextStyleOverride::new().with_size(12.0));
        assert_eq!(merged.size, 12.0);
        assert_eq!(merged.color, "green");
        assert_eq!(merged.zorder, ISOPLETH_ZORDER + 1);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(LineStyleKind::from_str("--").unwrap(), LineStyleKind::Dashed);
        assert_eq!(LineStyleKind::from_str("dotted").unwrap(), LineStyleKind::Dotted);
        assert_eq!(LineStyleKind::Solid.to_string(), "solid");
        assert_eq!(Pivot::from_str("middle").unwrap(), Pivot::Middle);
        assert_eq!(HAlign::Right.to_string(), "right");
        assert!(Pivot::from_str("sideways").is_err());
    }
}

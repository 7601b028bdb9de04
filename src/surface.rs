//! The drawing surface a tephigram is rendered onto.
//!
//! This crate never draws anything itself. It computes plot plane geometry and pushes it, along
//! with visibility flags, to an implementation of [`DrawingSurface`], which can be backed by any
//! vector graphics library. [`RecordingSurface`] is an in-memory implementation that simply keeps
//! the latest state of everything, useful for headless work and testing.
use crate::{
    barbs::{BarbGlyph, BarbStyle},
    geometry::{Viewport, XYCoords},
    style::{LineStyle, TextStyle},
};

/// Refers to a polyline on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineHandle(pub usize);

/// Refers to a text label on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelHandle(pub usize);

/// Refers to a wind glyph on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphHandle(pub usize);

/// Operations a tephigram needs from whatever renders it.
///
/// Everything is expressed in plot plane coordinates. Handles are only ever passed back to the
/// surface that created them. Newly created items are visible.
pub trait DrawingSurface {
    /// The currently visible region of the plot plane.
    fn viewport(&self) -> Viewport;

    /// Change the visible region.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Add a polyline, with an optional legend entry.
    fn create_line(
        &mut self,
        points: &[XYCoords],
        style: &LineStyle,
        legend: Option<&str>,
    ) -> LineHandle;

    /// Show or hide a polyline.
    fn set_line_visible(&mut self, line: LineHandle, visible: bool);

    /// Take a polyline off the surface for good.
    fn remove_line(&mut self, line: LineHandle);

    /// Add a text label.
    fn create_label(&mut self, position: XYCoords, text: &str, style: &TextStyle) -> LabelHandle;

    /// Move a text label.
    fn set_label_position(&mut self, label: LabelHandle, position: XYCoords);

    /// Show or hide a text label.
    fn set_label_visible(&mut self, label: LabelHandle, visible: bool);

    /// Take a text label off the surface for good.
    fn remove_label(&mut self, label: LabelHandle);

    /// Add a wind glyph anchored at `position`.
    fn create_glyph(
        &mut self,
        position: XYCoords,
        glyph: &BarbGlyph,
        style: &BarbStyle,
    ) -> GlyphHandle;

    /// Move a wind glyph.
    fn set_glyph_position(&mut self, glyph: GlyphHandle, position: XYCoords);

    /// Show or hide a wind glyph.
    fn set_glyph_visible(&mut self, glyph: GlyphHandle, visible: bool);

    /// Take a wind glyph off the surface for good.
    fn remove_glyph(&mut self, glyph: GlyphHandle);
}

/// A line as last pushed to a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLine {
    /// Plot plane points.
    pub points: Vec<XYCoords>,
    /// Style the line was created with.
    pub style: LineStyle,
    /// Legend entry.
    pub legend: Option<String>,
    /// Visibility flag.
    pub visible: bool,
    /// The line was removed.
    pub removed: bool,
}

/// A label as last pushed to a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLabel {
    /// The text.
    pub text: String,
    /// Anchor point.
    pub position: XYCoords,
    /// Style the label was created with.
    pub style: TextStyle,
    /// Visibility flag.
    pub visible: bool,
    /// The label was removed.
    pub removed: bool,
}

/// A wind glyph as last pushed to a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedGlyph {
    /// What to draw.
    pub glyph: BarbGlyph,
    /// Anchor point.
    pub position: XYCoords,
    /// Style the glyph was created with.
    pub style: BarbStyle,
    /// Visibility flag.
    pub visible: bool,
    /// The glyph was removed.
    pub removed: bool,
}

/// A surface that draws nothing and remembers everything.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    viewport: Viewport,
    lines: Vec<RecordedLine>,
    labels: Vec<RecordedLabel>,
    glyphs: Vec<RecordedGlyph>,
}

impl RecordingSurface {
    /// Create an empty surface showing `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        RecordingSurface {
            viewport,
            lines: vec![],
            labels: vec![],
            glyphs: vec![],
        }
    }

    /// Look up a line.
    pub fn line(&self, handle: LineHandle) -> Option<&RecordedLine> {
        self.lines.get(handle.0)
    }

    /// Look up a label.
    pub fn label(&self, handle: LabelHandle) -> Option<&RecordedLabel> {
        self.labels.get(handle.0)
    }

    /// Look up a glyph.
    pub fn glyph(&self, handle: GlyphHandle) -> Option<&RecordedGlyph> {
        self.glyphs.get(handle.0)
    }

    /// Every line ever created, removed ones included.
    pub fn lines(&self) -> &[RecordedLine] {
        &self.lines
    }

    /// Every label ever created.
    pub fn labels(&self) -> &[RecordedLabel] {
        &self.labels
    }

    /// Every glyph ever created.
    pub fn glyphs(&self) -> &[RecordedGlyph] {
        &self.glyphs
    }

    /// Lines that are on the surface and visible.
    pub fn visible_lines(&self) -> impl Iterator<Item = &RecordedLine> {
        self.lines.iter().filter(|l| l.visible && !l.removed)
    }

    /// Labels that are on the surface and visible.
    pub fn visible_labels(&self) -> impl Iterator<Item = &RecordedLabel> {
        self.labels.iter().filter(|l| l.visible && !l.removed)
    }

    /// Glyphs that are on the surface and visible.
    pub fn visible_glyphs(&self) -> impl Iterator<Item = &RecordedGlyph> {
        self.glyphs.iter().filter(|g| g.visible && !g.removed)
    }
}

impl DrawingSurface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn create_line(
        &mut self,
        points: &[XYCoords],
        style: &LineStyle,
        legend: Option<&str>,
    ) -> LineHandle {
        self.lines.push(RecordedLine {
            points: points.to_vec(),
            style: style.clone(),
            legend: legend.map(str::to_owned),
            visible: true,
            removed: false,
        });
        LineHandle(self.lines.len() - 1)
    }

    fn set_line_visible(&mut self, line: LineHandle, visible: bool) {
        if let Some(l) = self.lines.get_mut(line.0) {
            l.visible = visible;
        }
    }

    fn remove_line(&mut self, line: LineHandle) {
        if let Some(l) = self.lines.get_mut(line.0) {
            l.removed = true;
            l.visible = false;
        }
    }

    fn create_label(&mut self, position: XYCoords, text: &str, style: &TextStyle) -> LabelHandle {
        self.labels.push(RecordedLabel {
            text: text.to_owned(),
            position,
            style: style.clone(),
            visible: true,
            removed: false,
        });
        LabelHandle(self.labels.len() - 1)
    }

    fn set_label_position(&mut self, label: LabelHandle, position: XYCoords) {
        if let Some(l) = self.labels.get_mut(label.0) {
            l.position = position;
        }
    }

    fn set_label_visible(&mut self, label: LabelHandle, visible: bool) {
        if let Some(l) = self.labels.get_mut(label.0) {
            l.visible = visible;
        }
    }

    fn remove_label(&mut self, label: LabelHandle) {
        if let Some(l) = self.labels.get_mut(label.0) {
            l.removed = true;
            l.visible = false;
        }
    }

    fn create_glyph(
        &mut self,
        position: XYCoords,
        glyph: &BarbGlyph,
        style: &BarbStyle,
    ) -> GlyphHandle {
        self.glyphs.push(RecordedGlyph {
            glyph: glyph.clone(),
            position,
            style: style.clone(),
            visible: true,
            removed: false,
        });
        GlyphHandle(self.glyphs.len() - 1)
    }

    fn set_glyph_position(&mut self, glyph: GlyphHandle, position: XYCoords) {
        if let Some(g) = self.glyphs.get_mut(glyph.0) {
            g.position = position;
        }
    }

    fn set_glyph_visible(&mut self, glyph: GlyphHandle, visible: bool) {
        if let Some(g) = self.glyphs.get_mut(glyph.0) {
            g.visible = visible;
        }
    }

    fn remove_glyph(&mut self, glyph: GlyphHandle) {
        if let Some(g) = self.glyphs.get_mut(glyph.0) {
            g.removed = true;
            g.visible = false;
        }
    }
}

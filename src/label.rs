use std::path::{Path, PathBuf};

use crate::error::{TrajplotError, TrajplotResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Well-known font locations tried when no `--font` is given, in order.
const FONT_PROBE_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Resolve the overlay font: an explicit path must load; with no path the
/// probe list is tried and `Ok(None)` means "no font found, skip the
/// overlay" (the caller logs and continues, the replay still renders).
pub fn resolve_font_bytes(explicit: Option<&Path>) -> TrajplotResult<Option<Vec<u8>>> {
    if let Some(path) = explicit {
        let bytes = std::fs::read(path).map_err(|e| {
            TrajplotError::validation(format!("failed to read font '{}': {e}", path.display()))
        })?;
        return Ok(Some(bytes));
    }
    for candidate in FONT_PROBE_PATHS {
        let p = PathBuf::from(candidate);
        if let Ok(bytes) = std::fs::read(&p) {
            tracing::debug!(font = %p.display(), "resolved overlay font");
            return Ok(Some(bytes));
        }
    }
    Ok(None)
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register font bytes with the collection once, returning the family
    /// name to lay out with. Layouts are built per frame; registration is
    /// not.
    pub fn register_font(&mut self, font_bytes: &[u8]) -> TrajplotResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            TrajplotError::validation("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TrajplotError::validation("registered font family has no name"))?
            .to_string();
        Ok(family_name)
    }

    /// Shape and lay out plain text in a previously registered family.
    pub fn layout_plain(
        &mut self,
        text: &str,
        family_name: &str,
        size_px: f32,
        brush: TextBrushRgba8,
        max_width_px: Option<f32>,
    ) -> TrajplotResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TrajplotError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        if let Some(w) = max_width_px {
            layout.break_all_lines(Some(w));
            layout.align(
                Some(w),
                parley::Alignment::Start,
                parley::AlignmentOptions::default(),
            );
        } else {
            layout.break_all_lines(None);
        }

        Ok(layout)
    }
}

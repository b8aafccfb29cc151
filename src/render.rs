use kurbo::{Affine, BezPath, Circle, Point, Shape as _, Stroke};

use crate::{
    core::Canvas,
    error::TrajplotResult,
    label::{TextBrushRgba8, TextLayoutEngine},
    scene::FrameState,
    viewport::Viewport,
};

/// Spacing of the background grid, in world units.
const GRID_SPACING: f64 = 10.0;
/// Marker radius in pixels (world-independent, like the source overlay).
const MARKER_RADIUS_PX: f64 = 8.0;
/// Tolerance for flattening stroke outlines and circles.
const PATH_TOLERANCE: f64 = 0.1;

#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, premultiplied. Frames clear to an opaque background,
    /// so in practice every pixel is opaque.
    pub data: Vec<u8>,
}

/// Colors and sizes for the rendered plot.
#[derive(Clone, Debug)]
pub struct RenderStyle {
    pub background: [u8; 4],
    pub grid: [u8; 4],
    pub axis: [u8; 4],
    pub trail: [u8; 4],
    pub marker_fill: [u8; 4],
    pub marker_outline: [u8; 4],
    pub label_color: [u8; 4],
    pub label_size_px: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: [18, 20, 28, 255],
            grid: [50, 50, 50, 255],
            axis: [255, 255, 255, 255],
            trail: [255, 40, 40, 100],
            marker_fill: [255, 40, 40, 255],
            marker_outline: [255, 255, 255, 255],
            label_color: [255, 255, 255, 255],
            label_size_px: 16.0,
        }
    }
}

struct LabelPainter {
    engine: TextLayoutEngine,
    family: String,
    font: vello_cpu::peniko::FontData,
}

/// CPU rasterizer for [`FrameState`]s, powered by `vello_cpu`. One render
/// context is reused across frames.
pub struct CpuRenderer {
    canvas: Canvas,
    style: RenderStyle,
    ctx: Option<vello_cpu::RenderContext>,
    label: Option<LabelPainter>,
}

impl CpuRenderer {
    /// `font_bytes` carries the overlay font; `None` renders every frame
    /// without the text overlay.
    pub fn new(
        canvas: Canvas,
        style: RenderStyle,
        font_bytes: Option<Vec<u8>>,
    ) -> TrajplotResult<Self> {
        canvas.validate()?;
        let label = match font_bytes {
            Some(bytes) => {
                let mut engine = TextLayoutEngine::new();
                let family = engine.register_font(&bytes)?;
                Some(LabelPainter {
                    engine,
                    family,
                    font: vello_cpu::peniko::FontData::new(
                        vello_cpu::peniko::Blob::from(bytes),
                        0,
                    ),
                })
            }
            None => None,
        };
        Ok(Self {
            canvas,
            style,
            ctx: None,
            label,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn has_label_font(&self) -> bool {
        self.label.is_some()
    }

    /// Rasterize one frame: background, grid, trail polyline, marker and
    /// overlay text, in that order.
    pub fn render(&mut self, state: &FrameState<'_>) -> TrajplotResult<FrameRGBA> {
        let width = self.canvas.width as u16;
        let height = self.canvas.height as u16;

        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();

        let result = self.draw_frame(state, &mut ctx);
        let out = match result {
            Ok(()) => {
                ctx.flush();
                let mut pixmap = vello_cpu::Pixmap::new(width, height);
                ctx.render_to_pixmap(&mut pixmap);
                Ok(FrameRGBA {
                    width: self.canvas.width,
                    height: self.canvas.height,
                    data: pixmap.data_as_u8_slice().to_vec(),
                })
            }
            Err(e) => Err(e),
        };
        self.ctx = Some(ctx);
        out
    }

    fn draw_frame(
        &mut self,
        state: &FrameState<'_>,
        ctx: &mut vello_cpu::RenderContext,
    ) -> TrajplotResult<()> {
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        // All geometry is transformed to pixel space on the CPU side so line
        // widths and the marker radius stay in pixels while the viewport
        // scales each axis independently.
        let world_to_px = state.viewport.to_canvas(self.canvas);

        self.draw_background(ctx);
        self.draw_grid(state.viewport, world_to_px, ctx);
        self.draw_trail(state.trail, world_to_px, ctx);
        self.draw_marker(state.marker, world_to_px, ctx);
        self.draw_label(state.label, ctx)?;
        Ok(())
    }

    fn draw_background(&self, ctx: &mut vello_cpu::RenderContext) {
        let [r, g, b, a] = self.style.background;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        ));
    }

    fn draw_grid(
        &self,
        viewport: Viewport,
        world_to_px: Affine,
        ctx: &mut vello_cpu::RenderContext,
    ) {
        let h = f64::from(self.canvas.height);
        let w = f64::from(self.canvas.width);

        let mut x = (viewport.x_min / GRID_SPACING).ceil() * GRID_SPACING;
        while x <= viewport.x_max {
            let px = (world_to_px * Point::new(x, 0.0)).x;
            self.grid_line(ctx, x == 0.0, px - 0.5, 0.0, px + 0.5, h);
            x += GRID_SPACING;
        }

        let mut y = (viewport.y_min / GRID_SPACING).ceil() * GRID_SPACING;
        while y <= viewport.y_max {
            let py = (world_to_px * Point::new(0.0, y)).y;
            self.grid_line(ctx, y == 0.0, 0.0, py - 0.5, w, py + 0.5);
            y += GRID_SPACING;
        }
    }

    fn grid_line(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        is_axis: bool,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    ) {
        let [r, g, b, a] = if is_axis { self.style.axis } else { self.style.grid };
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(x0, y0, x1, y1));
    }

    fn draw_trail(
        &self,
        trail: &[Point],
        world_to_px: Affine,
        ctx: &mut vello_cpu::RenderContext,
    ) {
        if trail.len() < 2 {
            return;
        }
        let mut path = BezPath::new();
        path.move_to(world_to_px * trail[0]);
        for p in &trail[1..] {
            path.line_to(world_to_px * *p);
        }
        let outline = kurbo::stroke(
            path,
            &Stroke::new(1.0),
            &kurbo::StrokeOpts::default(),
            PATH_TOLERANCE,
        );

        let [r, g, b, a] = self.style.trail;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_path(&bezpath_to_cpu(&outline));
    }

    fn draw_marker(
        &self,
        marker: Point,
        world_to_px: Affine,
        ctx: &mut vello_cpu::RenderContext,
    ) {
        let center = world_to_px * marker;
        let circle = Circle::new(center, MARKER_RADIUS_PX).to_path(PATH_TOLERANCE);

        let [r, g, b, a] = self.style.marker_fill;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_path(&bezpath_to_cpu(&circle));

        let outline = kurbo::stroke(
            circle,
            &Stroke::new(2.0),
            &kurbo::StrokeOpts::default(),
            PATH_TOLERANCE,
        );
        let [r, g, b, a] = self.style.marker_outline;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_path(&bezpath_to_cpu(&outline));
    }

    fn draw_label(
        &mut self,
        label: &str,
        ctx: &mut vello_cpu::RenderContext,
    ) -> TrajplotResult<()> {
        let [r, g, b, a] = self.style.label_color;
        let size_px = self.style.label_size_px;
        let Some(painter) = self.label.as_mut() else {
            return Ok(());
        };
        if label.is_empty() {
            return Ok(());
        }

        let brush = TextBrushRgba8 { r, g, b, a };
        let family = painter.family.clone();
        let layout = painter
            .engine
            .layout_plain(label, &family, size_px, brush, None)?;

        ctx.set_transform(vello_cpu::kurbo::Affine::translate((10.0, 10.0)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&painter.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

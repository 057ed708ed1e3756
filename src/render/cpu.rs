use crate::{
    effects::starfield::{StarSurface, Streak},
    foundation::{
        core::{Affine, Rect, Viewport},
        error::{CineError, CineResult},
    },
    render::{FrameRGBA, composite},
};

/// Surface extent as the `u16` pair vello_cpu expects.
pub(crate) fn surface_dims(viewport: Viewport) -> CineResult<(u16, u16)> {
    let w: u16 = viewport
        .width
        .try_into()
        .map_err(|_| CineError::render("surface width exceeds u16"))?;
    let h: u16 = viewport
        .height
        .try_into()
        .map_err(|_| CineError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

/// Run `draw` against a fresh context and return the premultiplied pixels of a
/// transparent pixmap it was rendered into.
pub(crate) fn rasterize(
    viewport: Viewport,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> CineResult<Vec<u8>> {
    let (w, h) = surface_dims(viewport)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    draw(&mut ctx);
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

/// Straight-alpha color with its alpha scaled by `opacity`.
pub(crate) fn color(rgba: [u8; 4], opacity: f64) -> vello_cpu::peniko::Color {
    let a = (f64::from(rgba[3]) * opacity.clamp(0.0, 1.0)).round() as u8;
    vello_cpu::peniko::Color::from_rgba8(rgba[0], rgba[1], rgba[2], a)
}

/// Quad covering a butt-capped segment of `streak.width`. `None` when nothing would
/// be drawn.
fn streak_quad(streak: &Streak) -> Option<vello_cpu::kurbo::BezPath> {
    let dx = streak.to.x - streak.from.x;
    let dy = streak.to.y - streak.from.y;
    let len = dx.hypot(dy);
    if !len.is_finite() || len < 1e-9 || streak.width <= 0.0 || streak.alpha <= 0.0 {
        return None;
    }
    let (nx, ny) = (-dy / len * streak.width / 2.0, dx / len * streak.width / 2.0);

    let mut path = vello_cpu::kurbo::BezPath::new();
    path.move_to((streak.from.x + nx, streak.from.y + ny));
    path.line_to((streak.to.x + nx, streak.to.y + ny));
    path.line_to((streak.to.x - nx, streak.to.y - ny));
    path.line_to((streak.from.x - nx, streak.from.y - ny));
    path.close_path();
    Some(path)
}

/// Star surface backed by a persistent premultiplied frame.
///
/// Starts opaque black. `fade` darkens the frame in place; strokes collected during a
/// frame are rasterized together on `present` and composited over it.
pub struct CpuStarSurface {
    viewport: Viewport,
    frame: FrameRGBA,
    pending: Vec<Streak>,
    presented: u64,
}

impl CpuStarSurface {
    /// Black surface of `viewport`'s size.
    pub fn new(viewport: Viewport) -> CineResult<Self> {
        let viewport = Viewport::new(viewport.width, viewport.height)?;
        surface_dims(viewport)?;
        Ok(Self {
            viewport,
            frame: FrameRGBA::filled(viewport.width, viewport.height, [0, 0, 0, 255])?,
            pending: Vec::new(),
            presented: 0,
        })
    }

    /// Current pixels.
    pub fn frame(&self) -> &FrameRGBA {
        &self.frame
    }

    /// Number of presented frames.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl StarSurface for CpuStarSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn fade(&mut self, alpha: f64) {
        composite::fade_to_black_in_place(&mut self.frame.data, alpha as f32);
    }

    fn stroke(&mut self, streak: &Streak) {
        self.pending.push(*streak);
    }

    fn present(&mut self) -> CineResult<()> {
        self.presented += 1;
        if self.pending.is_empty() {
            return Ok(());
        }
        let pending = std::mem::take(&mut self.pending);
        let layer = rasterize(self.viewport, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            for streak in &pending {
                if let Some(quad) = streak_quad(streak) {
                    ctx.set_paint(color([255, 255, 255, 255], streak.alpha));
                    ctx.fill_path(&quad);
                }
            }
        })?;
        self.pending = pending;
        self.pending.clear();
        composite::over_in_place(&mut self.frame.data, &layer, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

use crate::{
    config::{CaptionCue, CaptionSample},
    foundation::{
        core::{Affine, Rect, Rgba8Premul, Vec2, Viewport},
        error::CineResult,
    },
    render::{
        FrameRGBA, blur,
        composite::{over_in_place, vignette_in_place},
        cpu::{affine_to_cpu, color, rasterize, rect_to_cpu},
    },
    sequence::looks::MotionSample,
    stage::intro::{IntroFrame, IntroStage},
};

/// Fraction of the half-diagonal at which the vignette reaches black.
const VIGNETTE_REACH: f64 = 0.8;

/// Block glyphs for `lines`, centered on the origin. One block per non-space
/// character; `line_height` sets the glyph size.
pub fn title_blocks(lines: &[String], line_height: f64) -> Vec<Rect> {
    let glyph_w = line_height * 0.6;
    let advance = line_height * 0.7;
    let leading = line_height * 1.2;
    let total_h = leading * lines.len().saturating_sub(1) as f64 + line_height;

    let mut out = Vec::new();
    for (row, line) in lines.iter().enumerate() {
        let n = line.chars().count();
        if n == 0 {
            continue;
        }
        let width = advance * n as f64 - (advance - glyph_w);
        let y0 = -total_h / 2.0 + leading * row as f64;
        for (col, ch) in line.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let x0 = -width / 2.0 + advance * col as f64;
            out.push(Rect::new(x0, y0, x0 + glyph_w, y0 + line_height));
        }
    }
    out
}

/// Transform placing a layer centered at `anchor` under `motion` and an extra `scale`.
fn placed(anchor: Vec2, motion: &MotionSample, scale: f64) -> Affine {
    Affine::translate(anchor + motion.offset)
        * Affine::rotate(motion.rotation_rad)
        * Affine::scale(scale * motion.scale)
}

fn paint_blocks(
    out: &mut FrameRGBA,
    viewport: Viewport,
    blocks: &[Rect],
    transform: Affine,
    rgba: [u8; 4],
    opacity: f64,
    blur_px: f64,
) -> CineResult<()> {
    if opacity <= 0.0 || blocks.is_empty() {
        return Ok(());
    }
    let mut layer = rasterize(viewport, |ctx| {
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(color(rgba, 1.0));
        for b in blocks {
            ctx.fill_rect(&rect_to_cpu(*b));
        }
    })?;
    if blur_px > 0.0 {
        blur::gaussian_blur_in_place(&mut layer, viewport.width, viewport.height, blur_px)?;
    }
    over_in_place(&mut out.data, &layer, opacity as f32)
}

/// Paint one intro snapshot. Frames that do not cover the page come back transparent.
#[tracing::instrument(skip(frame, title), fields(phase = ?frame.phase, at_ms = frame.at.0))]
pub fn paint_intro_frame(
    frame: &IntroFrame,
    title: &[String],
    viewport: Viewport,
) -> CineResult<FrameRGBA> {
    if !frame.covers_page() {
        return FrameRGBA::transparent(viewport.width, viewport.height);
    }
    let mut out = FrameRGBA::filled(viewport.width, viewport.height, [0, 0, 0, 255])?;
    if frame.stage == IntroStage::Preloading {
        return Ok(out);
    }

    let look = frame.look;
    let center = viewport.center().to_vec2();

    if let Some(bg) = look.background {
        let m = frame.background;
        if bg.vignette {
            let tint = Rgba8Premul::from_straight_with_opacity(bg.color, 1.0).to_array();
            vignette_in_place(
                &mut out.data,
                viewport.width,
                viewport.height,
                tint,
                VIGNETTE_REACH,
                m.opacity as f32,
            )?;
        } else {
            let rect = Rect::new(-center.x, -center.y, center.x, center.y);
            paint_blocks(
                &mut out,
                viewport,
                &[rect],
                placed(center, &m, 1.0),
                bg.color,
                m.opacity,
                0.0,
            )?;
        }
    }

    let t = look.title;
    let m = frame.title;
    paint_blocks(
        &mut out,
        viewport,
        &title_blocks(title, viewport.h() * 0.12),
        placed(center, &m, t.scale),
        t.color,
        t.opacity * m.opacity,
        t.blur_px,
    )?;

    if let Some(archetype) = frame.archetype
        && !frame.particles.is_empty()
    {
        let style = archetype.style();
        let half = style.size / 2.0;
        let dot = Rect::new(-half.x, -half.y, half.x, half.y);
        let layer = rasterize(viewport, |ctx| {
            for p in &frame.particles {
                let xf = Affine::translate(p.pos.to_vec2()) * Affine::rotate(p.rotation_rad);
                ctx.set_transform(affine_to_cpu(xf));
                ctx.set_paint(color(style.color, p.opacity));
                ctx.fill_rect(&rect_to_cpu(dot));
            }
        })?;
        over_in_place(&mut out.data, &layer, 1.0)?;
    }

    Ok(out)
}

/// Paint warp captions over `out`, stacked below the center.
pub fn paint_captions<'a>(
    out: &mut FrameRGBA,
    viewport: Viewport,
    captions: impl IntoIterator<Item = (&'a CaptionCue, CaptionSample)>,
) -> CineResult<()> {
    let line_h = viewport.h() * 0.05;
    let center = viewport.center().to_vec2();
    for (row, (cue, s)) in captions.into_iter().enumerate() {
        let anchor = center + Vec2::new(0.0, line_h * 2.0 * row as f64 + s.offset_y);
        let motion = MotionSample {
            scale: s.scale,
            ..MotionSample::default()
        };
        paint_blocks(
            out,
            viewport,
            &title_blocks(std::slice::from_ref(&cue.text), line_h),
            placed(anchor, &motion, 1.0),
            [255, 255, 255, 255],
            s.opacity,
            s.blur_px,
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/paint.rs"]
mod tests;

use crate::foundation::error::{CineError, CineResult};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

const OPAQUE_BLACK: PremulRgba8 = [0, 0, 0, 255];

/// Source-over of `src` scaled by `opacity` onto `dst`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = unit_to_u8(opacity);
    let sa = mul_div255(u16::from(src[3]), u16::from(op));
    if sa == 0 {
        return dst;
    }
    let inv = 255 - u16::from(sa);
    let mut out = [0u8; 4];
    for c in 0..3 {
        out[c] = mul_div255(u16::from(src[c]), u16::from(op))
            .saturating_add(mul_div255(u16::from(dst[c]), inv));
    }
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));
    out
}

/// Linear blend `a -> b` at `t`.
pub fn mix(a: PremulRgba8, b: PremulRgba8, t: f32) -> PremulRgba8 {
    let tt = u16::from(unit_to_u8(t));
    let it = 255 - tt;
    std::array::from_fn(|i| {
        mul_div255(u16::from(a[i]), it).saturating_add(mul_div255(u16::from(b[i]), tt))
    })
}

/// Composite a whole `src` buffer over `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> CineResult<()> {
    check_pair(dst, src, "over_in_place")?;
    if opacity <= 0.0 {
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Lay a black fill of opacity `alpha` over every pixel (trail persistence).
pub fn fade_to_black_in_place(dst: &mut [u8], alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    for d in dst.chunks_exact_mut(4) {
        let out = over([d[0], d[1], d[2], d[3]], OPAQUE_BLACK, alpha);
        d.copy_from_slice(&out);
    }
}

/// Radial vignette: `tint` at the center blending to opaque black at `reach`
/// (a fraction of the half-diagonal), composited over `dst`.
pub fn vignette_in_place(
    dst: &mut [u8],
    width: u32,
    height: u32,
    tint: PremulRgba8,
    reach: f64,
    opacity: f32,
) -> CineResult<()> {
    check_len(dst, width, height, "vignette_in_place")?;
    let cx = f64::from(width) / 2.0;
    let cy = f64::from(height) / 2.0;
    let half_diag = (cx * cx + cy * cy).sqrt().max(1.0);
    let reach = reach.max(1e-6);

    for (i, d) in dst.chunks_exact_mut(4).enumerate() {
        let x = (i % width as usize) as f64 + 0.5;
        let y = (i / width as usize) as f64 + 0.5;
        let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt() / half_diag;
        let layer = mix(tint, OPAQUE_BLACK, (dist / reach).min(1.0) as f32);
        let out = over([d[0], d[1], d[2], d[3]], layer, opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Flatten `src` over an opaque `bg_rgba` into `dst`.
pub fn flatten_to_opaque(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> CineResult<()> {
    check_pair(dst, src, "flatten_to_opaque")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        let inv = 255 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                s[c]
            } else {
                mul_div255(u16::from(s[c]), a)
            };
            d[c] = fg.saturating_add(mul_div255(u16::from(bg_rgba[c]), inv));
        }
        d[3] = 255;
    }
    Ok(())
}

fn check_pair(dst: &[u8], src: &[u8], what: &str) -> CineResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CineError::render(format!(
            "{what} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

fn check_len(buf: &[u8], width: u32, height: u32, what: &str) -> CineResult<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4));
    if expected != Some(buf.len()) {
        return Err(CineError::render(format!(
            "{what} expects a buffer matching width*height*4"
        )));
    }
    Ok(())
}

fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;

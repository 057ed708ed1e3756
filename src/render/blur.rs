use crate::foundation::error::{CineError, CineResult};

/// Gaussian blur of a premultiplied RGBA8 buffer with standard deviation `sigma_px`
/// (the CSS `blur()` radius). The kernel extends to `3 * sigma`; edges clamp.
pub fn gaussian_blur_in_place(
    buf: &mut [u8],
    width: u32,
    height: u32,
    sigma_px: f64,
) -> CineResult<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| CineError::render("blur buffer size overflow"))?;
    if buf.len() != expected {
        return Err(CineError::render("blur expects a buffer matching width*height*4"));
    }
    if !sigma_px.is_finite() || sigma_px < 0.0 {
        return Err(CineError::validation("blur sigma must be finite and >= 0"));
    }
    let radius = (sigma_px * 3.0).ceil() as usize;
    if radius == 0 || expected == 0 {
        return Ok(());
    }

    let kernel = kernel_q16(radius, sigma_px);
    let mut tmp = vec![0u8; expected];
    convolve(buf, &mut tmp, width as usize, height as usize, &kernel, Axis::X);
    convolve(&tmp, buf, width as usize, height as usize, &kernel, Axis::Y);
    Ok(())
}

/// Normalized weights in Q16 summing to exactly `1 << 16`.
fn kernel_q16(radius: usize, sigma: f64) -> Vec<u32> {
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();

    let mut q: Vec<u32> = weights
        .iter()
        .map(|w| ((w / sum) * 65536.0).round() as u32)
        .collect();
    let total: i64 = q.iter().map(|&v| i64::from(v)).sum();
    // Put the rounding residue on the center tap.
    q[radius] = (i64::from(q[radius]) + (65536 - total)).clamp(0, 65536) as u32;
    q
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn convolve(src: &[u8], dst: &mut [u8], w: usize, h: usize, k: &[u32], axis: Axis) {
    let r = (k.len() / 2) as isize;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as isize - r;
                let (sx, sy) = match axis {
                    Axis::X => ((x as isize + d).clamp(0, w as isize - 1) as usize, y),
                    Axis::Y => (x, (y as isize + d).clamp(0, h as isize - 1) as usize),
                };
                let idx = (sy * w + sx) * 4;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = (y * w + x) * 4;
            for (c, a) in acc.iter().enumerate() {
                dst[out + c] = ((a + 32768) >> 16).min(255) as u8;
            }
        }
    }
}

use super::*;

#[test]
fn over_with_zero_opacity_or_alpha_keeps_dst() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [200, 200, 200, 200], 0.0), dst);
    assert_eq!(over(dst, [255, 255, 255, 0], 1.0), dst);
}

#[test]
fn opaque_src_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255], 1.0), [255, 0, 0, 255]);
    assert_eq!(over([0, 0, 0, 0], [100, 110, 120, 200], 1.0), [100, 110, 120, 200]);
}

#[test]
fn mix_hits_both_ends() {
    let a = [255, 0, 0, 255];
    let b = [0, 0, 255, 255];
    assert_eq!(mix(a, b, 0.0), a);
    assert_eq!(mix(a, b, 1.0), b);
    assert_eq!(mix(a, b, 0.5), [127, 0, 128, 255]);
}

#[test]
fn fade_darkens_toward_black() {
    let mut px = vec![255u8, 255, 255, 255, 0, 0, 0, 0];
    fade_to_black_in_place(&mut px, 0.4);
    assert_eq!(&px[..4], &[153, 153, 153, 255]);
    assert_eq!(&px[4..], &[0, 0, 0, 102]);

    let mut unchanged = vec![9u8, 9, 9, 9];
    fade_to_black_in_place(&mut unchanged, 0.0);
    assert_eq!(unchanged, vec![9, 9, 9, 9]);
}

#[test]
fn repeated_fades_leave_at_most_a_faint_ghost() {
    let mut px = vec![255u8, 255, 255, 255];
    for _ in 0..30 {
        fade_to_black_in_place(&mut px, 0.4);
    }
    // 8-bit rounding settles at 1 rather than 0, like a canvas trail.
    assert!(px[0] <= 1);
    assert_eq!(px[3], 255);
}

#[test]
fn vignette_is_tinted_in_the_center_and_black_at_the_edge() {
    let (w, h) = (41u32, 41u32);
    let mut buf = vec![0u8; (w * h * 4) as usize];
    vignette_in_place(&mut buf, w, h, [44, 8, 8, 51], 0.8, 1.0).unwrap();
    let center = ((20 * w + 20) * 4) as usize;
    assert!(buf[center] > buf[center + 1]);
    assert!(buf[center + 3] < 128);
    assert_eq!(&buf[..4], &[0, 0, 0, 255]);

    assert!(vignette_in_place(&mut buf, w + 1, h, [0; 4], 0.8, 1.0).is_err());
}

#[test]
fn flatten_over_black_matches_premultiplied_color() {
    let src = [128u8, 0, 0, 128];
    let mut dst = [0u8; 4];
    flatten_to_opaque(&mut dst, &src, true, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, [128, 0, 0, 255]);

    flatten_to_opaque(&mut dst, &src, false, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, [64, 0, 0, 255]);

    flatten_to_opaque(&mut dst, &[0, 0, 0, 0], true, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, [10, 20, 30, 255]);
}

#[test]
fn mismatched_buffers_are_rejected() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
    assert!(over_in_place(&mut dst, &[0u8; 8], 1.0).is_ok());
}

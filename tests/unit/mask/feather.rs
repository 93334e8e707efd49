use super::*;

#[test]
fn radius_zero_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6];
    assert_eq!(feather_alpha(&src, 3, 2, 0), src);
}

#[test]
fn constant_plane_is_unchanged() {
    let src = vec![200u8; 6 * 5];
    assert_eq!(feather_alpha(&src, 6, 5, 3), src);
}

#[test]
fn hard_edge_becomes_a_ramp() {
    // Left half empty, right half opaque.
    let (w, h) = (16u32, 3u32);
    let src: Vec<u8> = (0..w * h)
        .map(|i| if i % w >= w / 2 { 255 } else { 0 })
        .collect();
    let out = feather_alpha(&src, w, h, 3);
    let row = &out[w as usize..2 * w as usize];
    assert_eq!(row[0], 0);
    assert_eq!(row[w as usize - 1], 255);
    assert!(row.windows(2).all(|p| p[0] <= p[1]));
    let mid = row[w as usize / 2 - 1];
    assert!(mid > 40 && mid < 215, "mid = {mid}");
}

#[test]
fn mismatched_length_is_returned_untouched() {
    let src = vec![9u8; 5];
    assert_eq!(feather_alpha(&src, 3, 3, 2), src);
}

#[test]
fn kernel_wider_than_plane_replicates_edges() {
    assert_eq!(feather_alpha(&[77], 1, 1, 6), vec![77]);

    let src = [0u8, 0, 255];
    let out = feather_alpha(&src, 3, 1, 5);
    assert!(out.windows(2).all(|p| p[0] <= p[1]), "{out:?}");
    assert!(out[2] > out[0]);
}

#[test]
fn widest_mask_row_is_feathered_in_place() {
    let (w, h) = (u32::from(u16::MAX), 3u32);
    let mut src = vec![0u8; (w * h) as usize];
    let last = (w * h) as usize - 1;
    src[last] = 255;
    let out = feather_alpha(&src, w, h, 1);
    assert!(out[last] > 0);
    assert!(out[last - w as usize] > 0);
    assert_eq!(out[0], 0);
}

use super::*;

fn tile(x: f64, y: f64) -> Tile {
    Tile {
        center: Point::new(x, y),
        size: 4.0,
        color: Rgb8::new(255, 0, 0),
        alpha: 1.0,
    }
}

#[test]
fn rejects_empty_sizes() {
    assert!(TileSurface::new(CssSize::new(0.0, 10.0), 1.0).is_none());
    assert!(TileSurface::new(CssSize::new(10.0, f64::NAN), 1.0).is_none());
}

#[test]
fn device_size_follows_clamped_dpr() {
    let s = TileSurface::new(CssSize::new(10.5, 20.0), 3.0).unwrap();
    assert_eq!(s.dpr(), 2.0);
    assert_eq!((s.width(), s.height()), (21, 40));
    assert_eq!(s.pixels().len(), 21 * 40 * 4);
}

#[test]
fn tiles_land_at_their_centers() {
    let mut s = TileSurface::new(CssSize::new(20.0, 20.0), 1.0).unwrap();
    s.draw_tiles([tile(10.0, 10.0)]);
    let f = s.read_frame();
    let at = |x: usize, y: usize| &f.data[(y * 20 + x) * 4..(y * 20 + x) * 4 + 4];
    assert_eq!(at(10, 10), &[255, 0, 0, 255]);
    assert_eq!(at(1, 1)[3], 0);

    s.draw_tiles(std::iter::empty());
    assert_eq!(s.read_frame().alpha_sum(), 0);
}

#[test]
fn invisible_tiles_are_skipped() {
    let mut s = TileSurface::new(CssSize::new(20.0, 20.0), 1.0).unwrap();
    let mut t = tile(10.0, 10.0);
    t.alpha = 0.0;
    let mut u = tile(5.0, 5.0);
    u.size = f64::NAN;
    s.draw_tiles([t, u]);
    assert_eq!(s.read_frame().alpha_sum(), 0);
}

#[test]
fn destination_out_scales_coverage() {
    let mut s = TileSurface::new(CssSize::new(20.0, 20.0), 1.0).unwrap();
    s.draw_tiles([tile(10.0, 10.0)]);
    let full = s.read_frame().alpha_sum();
    s.destination_out(0.5);
    let half = s.read_frame().alpha_sum();
    assert!(half * 2 <= full + 64 && half * 2 + 64 >= full);
    s.destination_out(1.0);
    assert_eq!(s.read_frame().alpha_sum(), half);
    s.destination_out(0.0);
    assert_eq!(s.read_frame().alpha_sum(), 0);
}

#[test]
fn unpremultiply_restores_straight_color() {
    let mut f = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![64, 0, 0, 128, 9, 9, 9, 0],
        premultiplied: true,
    };
    f.unpremultiply();
    assert_eq!(&f.data[..4], &[128, 0, 0, 128]);
    assert_eq!(&f.data[4..], &[0, 0, 0, 0]);
    assert!(!f.premultiplied);
}

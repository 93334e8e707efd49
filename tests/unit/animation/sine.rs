use super::*;

#[test]
fn lookup_tracks_std_sin() {
    let mut x = -20.0;
    while x < 20.0 {
        assert!((fast_sin(x) - x.sin()).abs() < 1e-4, "x = {x}");
        assert!((fast_cos(x) - x.cos()).abs() < 1e-4, "x = {x}");
        x += 0.0137;
    }
}

#[test]
fn non_finite_input_is_zero() {
    assert_eq!(fast_sin(f64::NAN), 0.0);
    assert_eq!(fast_sin(f64::INFINITY), 0.0);
}

use super::*;

const ALL: [Ease; 8] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::OutExpo,
];

#[test]
fn endpoints_are_fixed() {
    for e in ALL {
        assert!(e.apply(0.0).abs() < 1e-9, "{e:?}");
        assert!((e.apply(1.0) - 1.0).abs() < 1e-9, "{e:?}");
    }
}

#[test]
fn curves_are_monotone_and_clamped() {
    for e in ALL {
        let mut prev = e.apply(-1.0);
        for i in 0..=100 {
            let v = e.apply(i as f64 / 100.0);
            assert!(v + 1e-12 >= prev, "{e:?} not monotone at {i}");
            prev = v;
        }
        assert_eq!(e.apply(3.0), e.apply(1.0));
        assert_eq!(e.apply(f64::NAN), 0.0);
    }
}

#[test]
fn serde_uses_snake_case_names() {
    let e: Ease = serde_json::from_str("\"in_out_cubic\"").unwrap();
    assert_eq!(e, Ease::InOutCubic);
}

use super::*;

#[test]
fn defaults_validate() {
    RevealConfig::default().validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = RevealConfig::from_json_str(
        r##"{
            "palette": { "active": "#ff0000" },
            "reveal": { "duration_ms": 1000, "direction": "center", "ease": "linear" }
        }"##,
    )
    .unwrap();
    assert_eq!(cfg.palette.active, Rgb8::new(255, 0, 0));
    assert_eq!(cfg.palette.placed, Palette::default().placed);
    assert_eq!(cfg.reveal.duration_ms, 1000.0);
    assert_eq!(cfg.reveal.direction, FillDirection::Center);
    assert_eq!(cfg.reveal.ease, Ease::Linear);
    assert_eq!(cfg.breath, BreathConfig::default());
}

#[test]
fn rejects_out_of_range_knobs() {
    let mut cfg = RevealConfig::default();
    cfg.reveal.duration_ms = 0.0;
    assert!(matches!(cfg.validate(), Err(RevealError::Validation(_))));

    let mut cfg = RevealConfig::default();
    cfg.field.damping = 1.5;
    assert!(cfg.validate().is_err());

    let mut cfg = RevealConfig::default();
    cfg.field.life_max_ms = 10.0;
    assert!(cfg.validate().is_err());

    let mut cfg = RevealConfig::default();
    cfg.breath.period_ms = f64::NAN;
    assert!(cfg.validate().is_err());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = RevealConfig::from_json_str("{ \"field\": 3 }").unwrap_err();
    assert!(matches!(err, RevealError::Serde(_)));
}

#[test]
fn particle_count_branches_on_viewport() {
    let cfg = RevealConfig::default();
    assert_eq!(cfg.particle_count(375.0), cfg.field.count_mobile);
    assert_eq!(cfg.particle_count(1440.0), cfg.field.count_desktop);
    assert_eq!(cfg.particle_count(f64::NAN), cfg.field.count_desktop);
}

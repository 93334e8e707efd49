use super::*;
use crate::foundation::core::CssSize;
use crate::mask::builder::{MaskInputs, build_mask};

const LOCAL_FONTS: &[&str] = &[
    "assets/Inter.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

fn local_font_bytes() -> Option<Vec<u8>> {
    LOCAL_FONTS.iter().find_map(|p| std::fs::read(p).ok())
}

fn local_face() -> Option<ParleyFace> {
    let spec = FontSpec {
        size_px: 32.0,
        ..FontSpec::default()
    };
    ParleyFace::new(local_font_bytes()?, spec).ok()
}

#[test]
fn rejects_bytes_that_are_not_a_font() {
    let err = ParleyFace::new(b"not a font".to_vec(), FontSpec::default()).unwrap_err();
    assert!(matches!(err, RevealError::Font(_)), "{err:?}");
}

#[test]
fn advances_sum_to_shaped_width_with_local_font_if_present() {
    let Some(mut face) = local_face() else {
        return;
    };
    let font = face.font().unwrap();
    let line = "Héllo, There";
    let adv = face.char_advances(line, &font).unwrap();
    assert_eq!(adv.len(), line.chars().count());
    assert!(adv.iter().all(|&a| a.is_finite() && a >= 0.0));
    assert!(adv[0] > 0.0);

    let width = f64::from(face.layout(line, &font).full_width());
    let sum: f64 = adv.iter().sum();
    assert!((sum - width).abs() < 0.5, "sum = {sum}, width = {width}");
}

#[test]
fn long_line_advances_grow_linearly_with_local_font_if_present() {
    let Some(mut face) = local_face() else {
        return;
    };
    let font = face.font().unwrap();
    let one = face.char_advances("m", &font).unwrap();
    let many = face.char_advances(&"m".repeat(400), &font).unwrap();
    assert_eq!(many.len(), 400);
    assert!(many.iter().all(|&a| (a - one[0]).abs() < 0.01));
}

#[test]
fn paints_ink_into_mask_with_local_font_if_present() {
    let (Some(mut metrics), Some(mut painter)) = (local_face(), local_face()) else {
        return;
    };
    let inputs = MaskInputs {
        text: "Hi\nThere".to_string(),
        container: CssSize::new(320.0, 120.0),
        device_pixel_ratio: 1.0,
        feather_px: 0.0,
    };
    let mask = build_mask(&inputs, &mut metrics, &mut painter).unwrap();
    let ink = mask.ink_bounds().unwrap();
    assert!(ink.width() > 10.0 && ink.height() > 10.0, "{ink:?}");
}

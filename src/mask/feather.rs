//! Separable Gaussian feather over a single alpha plane.
//!
//! Glyph edges come out of the rasterizer about one device pixel wide; feathering widens
//! the 0.5-alpha band so a coarse sampling grid reliably lands on it.

pub(crate) fn feather_alpha(src: &[u8], width: u32, height: u32, radius: u32) -> Vec<u8> {
    let expected = (width as usize).saturating_mul(height as usize);
    if radius == 0 || src.len() != expected || expected == 0 {
        return src.to_vec();
    }

    let kernel = gaussian_kernel_q16(radius, radius as f64 * 0.5 + 0.5);
    let mut tmp = vec![0u8; expected];
    let mut out = vec![0u8; expected];
    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    out
}

fn gaussian_kernel_q16(radius: u32, sigma: f64) -> Vec<u32> {
    let r = radius as i32;
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Rounding drift goes to the center tap so flat regions stay flat.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    weights
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = k.len() / 2;
    let w = width as usize;
    for y in 0..height as usize {
        let row = y * w;
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki).saturating_sub(radius).min(w - 1);
                acc += u64::from(kw) * u64::from(src[row + sx]);
            }
            dst[row + x] = q16_to_u8(acc);
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = k.len() / 2;
    let w = width as usize;
    let h = height as usize;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki).saturating_sub(radius).min(h - 1);
                acc += u64::from(kw) * u64::from(src[sy * w + x]);
            }
            dst[y * w + x] = q16_to_u8(acc);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/mask/feather.rs"]
mod tests;

// Pixel-level helpers next to tiny-skia: the soft blur it lacks, and moving
// data between its buffers and ours.
// Visual expectation: blurred masks give the soft glowing edges; the grain
// tile keeps its colors when handed to the pattern shader.
use crate::types::{FrameBuffer, Mask};
use image::RgbaImage;
use tiny_skia::Pixmap;

/* ---------------------------- coverage <-> tiny-skia mask ---------------------------- */

/// 8-bit coverage (tiny-skia `Mask` data) into a float mask of the same size.
pub fn coverage_from_bytes(mask: &mut Mask, bytes: &[u8]) {
    for (a, &b) in mask.alpha.iter_mut().zip(bytes) {
        *a = b as f32 / 255.0;
    }
}

/// Float mask back into 8-bit coverage.
pub fn coverage_to_bytes(mask: &Mask, bytes: &mut [u8]) {
    for (b, &a) in bytes.iter_mut().zip(&mask.alpha) {
        *b = (a.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
}

/* ---------------------------- blur (3x box ≈ Gaussian) ---------------------------- */

/// Box radius such that three box passes have standard deviation `sigma`.
pub fn box_radius_for_sigma(sigma: f64) -> usize {
    if sigma <= 0.0 || !sigma.is_finite() {
        return 0;
    }
    // Three boxes of width w have variance 3(w²-1)/12.
    let w = (4.0 * sigma * sigma + 1.0).sqrt();
    ((w - 1.0) / 2.0).round() as usize
}

/// Gaussian-like blur of a coverage mask, like CSS `blur(sigma px)`.
/// Outside the surface counts as empty, so shapes fade out at the borders.
/// Visual: a hard-edged shape turns into a soft glow of the same color.
pub fn gaussian_blur_mask(mask: &mut Mask, tmp: &mut Mask, sigma: f64) {
    let r = box_radius_for_sigma(sigma);
    if r == 0 {
        return;
    }
    for _ in 0..3 {
        box_blur_mask(mask, tmp, r);
    }
}

/// One separable box pass: horizontal into `tmp`, vertical back into `mask`.
pub fn box_blur_mask(mask: &mut Mask, tmp: &mut Mask, radius: usize) {
    let (w, h) = (mask.width, mask.height);
    if tmp.width != w || tmp.height != h {
        *tmp = Mask::new(w, h);
    }
    let r = radius as isize;
    let win = (2 * radius + 1) as f32; // window width for averaging (constant everywhere)

    /* ---- Pass 1: Horizontal (store averaged rows in tmp) ---- */
    for y in 0..h {
        let row = y * w;
        let src = &mask.alpha[row..row + w];

        // Prime the window [-r..r] around x = 0 (left of the edge is empty)
        let mut sum: f32 = src.iter().take(radius + 1).sum();

        for x in 0..w as isize {
            tmp.alpha[row + x as usize] = sum / win;

            // Slide: add the pixel entering on the right, drop the one leaving on the left
            let add = x + r + 1;
            let sub = x - r;
            if add < w as isize { sum += src[add as usize]; }
            if sub >= 0 { sum -= src[sub as usize]; }
        }
    }

    /* ---- Pass 2: Vertical (read tmp, write mask) ---- */
    for x in 0..w {
        let mut sum: f32 = (0..=radius.min(h.saturating_sub(1))).map(|y| tmp.alpha[y * w + x]).sum();

        for y in 0..h as isize {
            mask.alpha[y as usize * w + x] = sum / win;

            let add = y + r + 1;
            let sub = y - r;
            if add < h as isize { sum += tmp.alpha[add as usize * w + x]; }
            if sub >= 0 { sum -= tmp.alpha[sub as usize * w + x]; }
        }
    }

    // Float drift from the running sums can leave tiny negatives.
    for a in &mut mask.alpha {
        *a = a.clamp(0.0, 1.0);
    }
}

/* ---------------------------- pixmap conversions ---------------------------- */

/// Straight-alpha RGBA image into a premultiplied pixmap for pattern fills.
/// `None` for an empty image.
pub fn pixmap_from_rgba(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    pixmap.data_mut().copy_from_slice(image.as_raw());
    premultiply_rgba_in_place(pixmap.data_mut());
    Some(pixmap)
}

fn premultiply_rgba_in_place(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(4) {
        let alpha = pixel[3] as u16;
        pixel[0] = ((pixel[0] as u16 * alpha + 127) / 255) as u8;
        pixel[1] = ((pixel[1] as u16 * alpha + 127) / 255) as u8;
        pixel[2] = ((pixel[2] as u16 * alpha + 127) / 255) as u8;
    }
}

/// Copy a pixmap into a 0x00RRGGBB framebuffer of the same size.
/// Visual: what tiny-skia drew becomes what the window shows.
pub fn copy_to_frame(pixmap: &Pixmap, fb: &mut FrameBuffer) {
    if fb.width != pixmap.width() as usize || fb.height != pixmap.height() as usize {
        *fb = FrameBuffer::new(pixmap.width() as usize, pixmap.height() as usize);
    }
    for (px, p) in fb.pixels.iter_mut().zip(pixmap.pixels()) {
        let c = p.demultiply();
        *px = ((c.red() as u32) << 16) | ((c.green() as u32) << 8) | c.blue() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rstest::rstest;
    use tiny_skia::Color;

    #[rstest]
    #[case(0.0, 0)]
    #[case(-3.0, 0)]
    #[case(1.0, 1)]
    #[case(120.0, 120)]
    fn box_radius_tracks_sigma(#[case] sigma: f64, #[case] r: usize) {
        assert_eq!(box_radius_for_sigma(sigma), r);
    }

    #[test]
    fn box_blur_spreads_and_conserves_interior_mass() {
        let mut mask = Mask::new(9, 9);
        let mut tmp = Mask::new(9, 9);
        mask.alpha[4 * 9 + 4] = 1.0;
        box_blur_mask(&mut mask, &mut tmp, 1);
        let total: f32 = mask.alpha.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!((mask.alpha[4 * 9 + 4] - 1.0 / 9.0).abs() < 1e-6);
        assert!((mask.alpha[3 * 9 + 3] - 1.0 / 9.0).abs() < 1e-6);
        assert_eq!(mask.alpha[0], 0.0);
    }

    #[test]
    fn blur_fades_solid_fill_at_surface_edges() {
        let mut mask = Mask::new(20, 20);
        let mut tmp = Mask::new(20, 20);
        mask.alpha.fill(1.0);
        gaussian_blur_mask(&mut mask, &mut tmp, 2.0);
        assert!(mask.alpha[10 * 20 + 10] > 0.99);
        assert!(mask.alpha[0] < 0.5);
    }

    #[test]
    fn coverage_survives_the_trip_through_bytes() {
        let mut mask = Mask::new(4, 1);
        coverage_from_bytes(&mut mask, &[0, 51, 255, 128]);
        assert_eq!(mask.alpha[1], 0.2);
        assert_eq!(mask.alpha[2], 1.0);

        let mut bytes = [0u8; 4];
        mask.alpha[0] = -0.5;
        coverage_to_bytes(&mask, &mut bytes);
        assert_eq!(bytes, [0, 51, 255, 128]);
    }

    #[test]
    fn tile_is_premultiplied() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 255, 255, 128]));
        img.put_pixel(1, 0, Rgba([200, 100, 50, 0]));
        let pixmap = pixmap_from_rgba(&img).unwrap();
        assert_eq!(pixmap.data(), &[128, 128, 128, 128, 0, 0, 0, 0]);
        assert!(pixmap_from_rgba(&RgbaImage::new(0, 0)).is_none());
    }

    #[test]
    fn frame_copy_packs_channels() {
        let mut pixmap = Pixmap::new(3, 2).unwrap();
        pixmap.fill(Color::from_rgba8(0x12, 0x34, 0x56, 255));
        let mut fb = FrameBuffer::new(1, 1);
        copy_to_frame(&pixmap, &mut fb);
        assert_eq!((fb.width, fb.height), (3, 2));
        assert!(fb.pixels.iter().all(|&p| p == 0x0012_3456));
    }
}

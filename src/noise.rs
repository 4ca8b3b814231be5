// Film-grain texture: a small RGBA tile where every pixel has the grain
// color and a random alpha. Tiled over the frame by the compositor.

use crate::rng::RandomSource;
use crate::types::Rgb;
use image::{Rgba, RgbaImage};

/// Side of the square grain tile, independent of the window size.
pub const NOISE_SIZE: u32 = 128;

/// Alpha for one grain pixel from a uniform `r` in [0,1).
/// `hardness` 0 = continuous alpha, 1 = every pixel fully on or off.
#[inline]
pub fn grain_alpha(r: f64, hardness: f64) -> u8 {
    let h = hardness.clamp(0.0, 1.0);
    let soft = r * 255.0;
    let hard = r.round() * 255.0;
    ((1.0 - h) * soft + h * hard).round().clamp(0.0, 255.0) as u8
}

pub struct NoiseTexture {
    image: RgbaImage,
}

impl NoiseTexture {
    /// A tile filled right away with `color` grain.
    pub fn new(color: Rgb, hardness: f64, rng: &mut dyn RandomSource) -> Self {
        let mut tex = Self { image: RgbaImage::new(NOISE_SIZE, NOISE_SIZE) };
        tex.regenerate(color, hardness, rng);
        tex
    }

    /// Draw a fresh alpha for every pixel.
    pub fn regenerate(&mut self, color: Rgb, hardness: f64, rng: &mut dyn RandomSource) {
        for p in self.image.pixels_mut() {
            let a = grain_alpha(rng.next_unit(), hardness);
            *p = Rgba([color.r, color.g, color.b, a]);
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0, 0)]
    #[case(0.5, 0.0, 128)]
    #[case(0.999, 0.0, 255)]
    #[case(0.49, 1.0, 0)]
    #[case(0.5, 1.0, 255)]
    #[case(0.25, 0.5, 32)]   // 0.5*63.75 + 0.5*0
    #[case(0.75, 0.5, 223)]  // 0.5*191.25 + 0.5*255
    fn alpha_blends_soft_and_hard(#[case] r: f64, #[case] h: f64, #[case] expected: u8) {
        assert_eq!(grain_alpha(r, h), expected);
    }

    #[test]
    fn fixed_size_whatever_the_color() {
        let mut rng = SeededRandom::from_seed(1);
        let tex = NoiseTexture::new(Rgb::new(1, 2, 3), 0.0, &mut rng);
        assert_eq!(tex.image().dimensions(), (NOISE_SIZE, NOISE_SIZE));
        assert!(tex.image().pixels().all(|p| p[0] == 1 && p[1] == 2 && p[2] == 3));
    }

    #[test]
    fn full_hardness_is_binary() {
        let mut rng = SeededRandom::from_seed(11);
        let tex = NoiseTexture::new(Rgb::WHITE, 1.0, &mut rng);
        assert!(tex.image().pixels().all(|p| p[3] == 0 || p[3] == 255));
        // Both values should actually occur.
        assert!(tex.image().pixels().any(|p| p[3] == 0));
        assert!(tex.image().pixels().any(|p| p[3] == 255));
    }

    #[test]
    fn zero_hardness_is_uniform() {
        let mut rng = SeededRandom::from_seed(12);
        let mut tex = NoiseTexture::new(Rgb::WHITE, 0.0, &mut rng);
        let mut sum = 0.0;
        let mut count = 0.0;
        let mut top = 0u8;
        for _ in 0..32 {
            tex.regenerate(Rgb::WHITE, 0.0, &mut rng);
            for p in tex.image().pixels() {
                sum += p[3] as f64;
                count += 1.0;
                top = top.max(p[3]);
            }
        }
        let mean = sum / count;
        assert!((mean - 127.5).abs() < 0.5, "mean alpha {mean}");
        assert_eq!(top, 255);
    }

    #[test]
    fn regenerate_changes_alphas() {
        let mut rng = SeededRandom::from_seed(13);
        let mut tex = NoiseTexture::new(Rgb::WHITE, 0.0, &mut rng);
        let before = tex.image().clone();
        tex.regenerate(Rgb::WHITE, 0.0, &mut rng);
        assert_ne!(&before, tex.image());
    }
}

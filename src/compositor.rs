// Per-frame pipeline. Order never changes:
//   grain refresh → clear → blur on → back blob → front blob → blur off → grain overlay
// Visual: two soft overlapping blobs (back one shifted down-right) under a
// layer of film grain.

use crate::blob::Blob;
use crate::config::Config;
use crate::curve::smooth_closed;
use crate::noise::NoiseTexture;
use crate::rng::RandomSource;
use crate::surface::Surface;
use crate::types::Point;

/// The background blob runs this far ahead of the foreground one (ms).
pub const BACK_TIME_OFFSET: f64 = 1000.0;

/// Everything that persists between frames: both blobs and the grain tile.
pub struct Scene {
    front: Blob,
    back: Blob,
    noise: NoiseTexture,
}

impl Scene {
    pub fn new(config: &Config, rng: &mut dyn RandomSource) -> Self {
        Self {
            front: Blob::new(config.segments, 0.0, rng),
            back: Blob::new(config.segments, BACK_TIME_OFFSET, rng),
            noise: NoiseTexture::new(config.grain_color, config.grain_hardness, rng),
        }
    }

    /// Off-cycle grain refresh, for when grain color/hardness/size change
    /// while grain animation is off.
    pub fn regenerate_noise(&mut self, config: &Config, rng: &mut dyn RandomSource) {
        self.noise.regenerate(config.grain_color, config.grain_hardness, rng);
    }

    /// New random shape for both blobs with `segments` vertices.
    pub fn resize_blobs(&mut self, segments: usize, rng: &mut dyn RandomSource) {
        self.front.resize(segments, rng);
        self.back.resize(segments, rng);
    }

    #[cfg(test)]
    pub fn noise(&self) -> &NoiseTexture {
        &self.noise
    }

    /// Draw one frame at `time` (ms).
    pub fn render(
        &mut self,
        config: &Config,
        surface: &mut dyn Surface,
        time: f64,
        rng: &mut dyn RandomSource,
    ) {
        // 1) Fresh grain every frame when animated.
        if config.grain_animate {
            self.regenerate_noise(config, rng);
        }

        // 2) Start from an empty surface.
        surface.clear();

        // 3) Blur applies to the blob fills only.
        if config.blur {
            surface.set_blur(Some(config.blur_amount));
        }

        // 4) Back blob first so the front blob covers it.
        let size = surface.size();
        let shift = Point::new(config.offset, config.offset);
        let back = self.back.points(config, size, time, shift, rng);
        surface.fill_path(&smooth_closed(&back), config.back_color);

        let front = self.front.points(config, size, time, Point::default(), rng);
        surface.fill_path(&smooth_closed(&front), config.front_color);

        // 5) Blur off, or the grain would be blurred too.
        surface.set_blur(None);

        // 6) Hard-edged grain over everything.
        if config.grain {
            surface.set_image_smoothing(false);
            surface.set_global_alpha(config.grain_amount);
            surface.draw_tiled(self.noise.image(), config.grain_size);
            surface.set_global_alpha(1.0);
            surface.set_image_smoothing(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;
    use crate::surface::{Call, RasterSurface, RecordingSurface};
    use crate::types::Rgb;
    use rstest::rstest;

    fn plain() -> Config {
        Config { blur: false, grain: false, grain_animate: false, ..Config::default() }
    }

    #[test]
    fn plain_frame_is_just_two_fills() {
        let config = plain();
        let mut rng = SeededRandom::from_seed(1);
        let mut scene = Scene::new(&config, &mut rng);
        let mut surface = RecordingSurface::new(800, 600);
        scene.render(&config, &mut surface, 16.0, &mut rng);

        assert_eq!(
            surface.calls,
            vec![
                Call::Clear,
                Call::FillPath { cubics: 8, color: config.back_color },
                Call::FillPath { cubics: 8, color: config.front_color },
                Call::SetBlur(None),
            ]
        );
    }

    #[test]
    fn full_frame_runs_steps_in_order() {
        let config = Config::default();
        let mut rng = SeededRandom::from_seed(1);
        let mut scene = Scene::new(&config, &mut rng);
        let mut surface = RecordingSurface::new(800, 600);
        scene.render(&config, &mut surface, 16.0, &mut rng);

        assert_eq!(
            surface.calls,
            vec![
                Call::Clear,
                Call::SetBlur(Some(config.blur_amount)),
                Call::FillPath { cubics: 8, color: config.back_color },
                Call::FillPath { cubics: 8, color: config.front_color },
                Call::SetBlur(None),
                Call::SetImageSmoothing(false),
                Call::SetGlobalAlpha(config.grain_amount),
                Call::DrawTiled { scale: config.grain_size },
                Call::SetGlobalAlpha(1.0),
                Call::SetImageSmoothing(true),
            ]
        );
    }

    #[test]
    fn back_blob_is_shifted_by_offset() {
        let config = Config {
            variation: 0.0,
            animation_amount: 0.0,
            offset: 50.0,
            ..plain()
        };
        let mut rng = SeededRandom::from_seed(4);
        let mut scene = Scene::new(&config, &mut rng);
        let mut surface = RecordingSurface::new(400, 400);
        scene.render(&config, &mut surface, 0.0, &mut rng);

        let start = |p: &crate::curve::Path| match p.cmds[0] {
            crate::curve::PathCmd::MoveTo(pt) => pt,
            _ => unreachable!(),
        };
        let back = start(&surface.paths[0]);
        let front = start(&surface.paths[1]);
        // Same circle radius, only the angle wobble differs (≤ 0.02 rad each).
        assert!((back.x - 50.0 - front.x).abs() < 5.0);
        assert!((back.y - 50.0 - front.y).abs() < 5.0);
    }

    #[test]
    fn grain_waits_for_explicit_regeneration_when_not_animated() {
        let mut config = plain();
        config.grain = true;
        let mut rng = SeededRandom::from_seed(9);
        let mut scene = Scene::new(&config, &mut rng);
        let before = scene.noise().image().clone();

        config.grain_color = Rgb::new(255, 0, 0);
        let mut surface = RecordingSurface::new(64, 64);
        scene.render(&config, &mut surface, 0.0, &mut rng);
        scene.render(&config, &mut surface, 16.0, &mut rng);
        assert_eq!(&before, scene.noise().image());

        scene.regenerate_noise(&config, &mut rng);
        assert!(scene.noise().image().pixels().all(|p| p[0] == 255 && p[1] == 0 && p[2] == 0));
    }

    #[test]
    fn animated_grain_changes_every_frame() {
        let config = Config { grain_animate: true, ..plain() };
        let mut rng = SeededRandom::from_seed(9);
        let mut scene = Scene::new(&config, &mut rng);
        let mut surface = RecordingSurface::new(64, 64);
        scene.render(&config, &mut surface, 0.0, &mut rng);
        let first = scene.noise().image().clone();
        scene.render(&config, &mut surface, 16.0, &mut rng);
        assert_ne!(&first, scene.noise().image());
    }

    #[test]
    fn segment_change_reaches_both_blobs() {
        let mut config = plain();
        let mut rng = SeededRandom::from_seed(2);
        let mut scene = Scene::new(&config, &mut rng);
        config.segments = 5;
        scene.resize_blobs(5, &mut rng);
        let mut surface = RecordingSurface::new(200, 200);
        scene.render(&config, &mut surface, 0.0, &mut rng);
        assert!(matches!(surface.calls[1], Call::FillPath { cubics: 5, .. }));
        assert!(matches!(surface.calls[2], Call::FillPath { cubics: 5, .. }));
    }

    #[test]
    fn front_blob_covers_back_blob_on_raster() {
        let config = Config { offset: 0.0, variation: 0.0, animation_amount: 0.0, ..plain() };
        let mut rng = SeededRandom::from_seed(6);
        let mut scene = Scene::new(&config, &mut rng);
        let mut surface = RasterSurface::new(300, 300, config.background).unwrap();
        scene.render(&config, &mut surface, 0.0, &mut rng);
        // Both blobs cover the center; the front color wins.
        let frame = surface.frame();
        assert_eq!(frame.get(150, 150), config.front_color.to_u32());
        assert_eq!(frame.get(0, 0), config.background.to_u32());
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    fn degenerate_segment_counts_still_render(#[case] n: usize) {
        let config = Config { segments: n, ..Config::default() };
        let mut rng = SeededRandom::from_seed(21);
        let mut scene = Scene::new(&config, &mut rng);

        let mut recorder = RecordingSurface::new(200, 200);
        scene.render(&config, &mut recorder, 100.0, &mut rng);
        assert_eq!(recorder.paths.len(), 2);
        for path in &recorder.paths {
            assert_eq!(path.cubic_count(), n);
        }

        let pts = scene.front.points(&config, (200, 200), 100.0, Point::default(), &mut rng);
        assert_eq!(pts.len(), n);

        let mut raster = RasterSurface::new(200, 200, config.background).unwrap();
        scene.render(&config, &mut raster, 116.0, &mut rng);
        assert_eq!(raster.size(), (200, 200));
    }
}

// The drawing surface the compositor talks to: a tiny subset of a 2D canvas.
// `RasterSurface` implements it with tiny-skia; the window shows a copy of
// its pixmap each frame.

use crate::curve::Path;
use crate::error::Error;
use crate::raster;
use crate::types::{FrameBuffer, Mask, Rgb};
use image::RgbaImage;
use tiny_skia::{Color, FillRule, FilterQuality, Paint, Pattern, Pixmap, Rect, SpreadMode, Transform};

pub trait Surface {
    /// (width, height) in pixels.
    fn size(&self) -> (usize, usize);
    /// Wipe the whole surface.
    fn clear(&mut self);
    /// Blur filter (Gaussian std-dev in px) applied to later fills, or none.
    fn set_blur(&mut self, radius: Option<f64>);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_image_smoothing(&mut self, enabled: bool);
    /// Fill a path (non-zero winding) with a solid color.
    fn fill_path(&mut self, path: &Path, color: Rgb);
    /// Repeat `image` from the top-left until the surface is covered,
    /// each texel drawn `scale` pixels wide.
    fn draw_tiled(&mut self, image: &RgbaImage, scale: f64);
}

/// Software canvas.
pub struct RasterSurface {
    pixmap: Pixmap,
    background: Rgb,
    blur: Option<f64>,
    global_alpha: f32,
    smoothing: bool,
    // Scratch buffers reused every blurred fill.
    clip: tiny_skia::Mask,
    coverage: Mask,
    blur_tmp: Mask,
}

fn allocate(width: usize, height: usize) -> Result<(Pixmap, tiny_skia::Mask), Error> {
    let (w, h) = (width as u32, height as u32);
    let pixmap = Pixmap::new(w, h).ok_or(Error::Canvas { width, height })?;
    let clip = tiny_skia::Mask::new(w, h).ok_or(Error::Canvas { width, height })?;
    Ok((pixmap, clip))
}

fn skia_color(color: Rgb, alpha: f32) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

impl RasterSurface {
    /// A surface already cleared to `background`. Fails for a zero-sized area.
    pub fn new(width: usize, height: usize, background: Rgb) -> Result<Self, Error> {
        let (mut pixmap, clip) = allocate(width, height)?;
        pixmap.fill(skia_color(background, 1.0));
        Ok(Self {
            pixmap,
            background,
            blur: None,
            global_alpha: 1.0,
            smoothing: true,
            clip,
            coverage: Mask::new(width, height),
            blur_tmp: Mask::new(width, height),
        })
    }

    /// Reallocate for a new window size. Contents are lost and the new area
    /// shows the background until the next frame is drawn.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), Error> {
        if (width, height) == self.size() {
            return Ok(());
        }
        let (mut pixmap, clip) = allocate(width, height)?;
        pixmap.fill(skia_color(self.background, 1.0));
        self.pixmap = pixmap;
        self.clip = clip;
        self.coverage = Mask::new(width, height);
        self.blur_tmp = Mask::new(width, height);
        Ok(())
    }

    /// Color that `clear` leaves behind (the page behind a transparent canvas).
    pub fn set_background(&mut self, background: Rgb) {
        self.background = background;
    }

    /// Copy of the current pixels in window format.
    pub fn frame(&self) -> FrameBuffer {
        let mut fb = FrameBuffer::new(self.pixmap.width() as usize, self.pixmap.height() as usize);
        raster::copy_to_frame(&self.pixmap, &mut fb);
        fb
    }

    fn whole_area(&self) -> Option<Rect> {
        Rect::from_xywh(0.0, 0.0, self.pixmap.width() as f32, self.pixmap.height() as f32)
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> (usize, usize) {
        (self.pixmap.width() as usize, self.pixmap.height() as usize)
    }

    fn clear(&mut self) {
        self.pixmap.fill(skia_color(self.background, 1.0));
    }

    fn set_blur(&mut self, radius: Option<f64>) {
        self.blur = radius.filter(|r| *r > 0.0 && r.is_finite());
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.global_alpha = alpha.clamp(0.0, 1.0) as f32;
    }

    fn set_image_smoothing(&mut self, enabled: bool) {
        self.smoothing = enabled;
    }

    fn fill_path(&mut self, path: &Path, color: Rgb) {
        let Some(path) = path.to_skia() else {
            tracing::trace!("nothing to fill");
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(skia_color(color, self.global_alpha));
        paint.anti_alias = true;

        let Some(sigma) = self.blur else {
            self.pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            return;
        };

        // The filter blurs this fill on its own, like a canvas filter does:
        // coverage → float mask → box blur → back into the clip mask.
        self.clip.data_mut().fill(0);
        self.clip.fill_path(&path, FillRule::Winding, true, Transform::identity());
        raster::coverage_from_bytes(&mut self.coverage, self.clip.data());
        raster::gaussian_blur_mask(&mut self.coverage, &mut self.blur_tmp, sigma);
        raster::coverage_to_bytes(&self.coverage, self.clip.data_mut());
        if let Some(area) = self.whole_area() {
            self.pixmap.fill_rect(area, &paint, Transform::identity(), Some(&self.clip));
        }
    }

    fn draw_tiled(&mut self, image: &RgbaImage, scale: f64) {
        if self.global_alpha <= 0.0 || !(scale > 0.0 && scale.is_finite()) {
            return;
        }
        let (Some(tile), Some(area)) = (raster::pixmap_from_rgba(image), self.whole_area()) else {
            return;
        };
        let quality = if self.smoothing { FilterQuality::Bilinear } else { FilterQuality::Nearest };
        let mut paint = Paint::default();
        paint.shader = Pattern::new(
            tile.as_ref(),
            SpreadMode::Repeat,
            quality,
            self.global_alpha,
            Transform::from_scale(scale as f32, scale as f32),
        );
        self.pixmap.fill_rect(area, &paint, Transform::identity(), None);
    }
}

/// Every call made on the surface, in order.
#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Clear,
    SetBlur(Option<f64>),
    SetGlobalAlpha(f64),
    SetImageSmoothing(bool),
    FillPath { cubics: usize, color: Rgb },
    DrawTiled { scale: f64 },
}

/// Surface that only records calls.
#[cfg(test)]
pub struct RecordingSurface {
    pub size: (usize, usize),
    pub calls: Vec<Call>,
    pub paths: Vec<Path>,
}

#[cfg(test)]
impl RecordingSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self { size: (width, height), calls: Vec::new(), paths: Vec::new() }
    }
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn size(&self) -> (usize, usize) { self.size }
    fn clear(&mut self) { self.calls.push(Call::Clear); }
    fn set_blur(&mut self, radius: Option<f64>) { self.calls.push(Call::SetBlur(radius)); }
    fn set_global_alpha(&mut self, alpha: f64) { self.calls.push(Call::SetGlobalAlpha(alpha)); }
    fn set_image_smoothing(&mut self, enabled: bool) { self.calls.push(Call::SetImageSmoothing(enabled)); }
    fn fill_path(&mut self, path: &Path, color: Rgb) {
        self.calls.push(Call::FillPath { cubics: path.cubic_count(), color });
        self.paths.push(path.clone());
    }
    fn draw_tiled(&mut self, _image: &RgbaImage, scale: f64) {
        self.calls.push(Call::DrawTiled { scale });
    }
}

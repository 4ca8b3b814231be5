// Save the current frame as a PNG (S key).

use crate::error::Error;
use crate::types::FrameBuffer;
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Convert 0x00RRGGBB pixels into an RGB image.
pub fn to_image(fb: &FrameBuffer) -> RgbImage {
    RgbImage::from_fn(fb.width as u32, fb.height as u32, |x, y| {
        let px = fb.get(x as usize, y as usize);
        Rgb([((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8])
    })
}

/// Write `fb` to `dir/blobs-<millis>.png` and return the path.
pub fn save_png(fb: &FrameBuffer, dir: &Path, millis: u128) -> Result<PathBuf, Error> {
    let path = dir.join(format!("blobs-{millis}.png"));
    to_image(fb)
        .save(&path)
        .map_err(|source| Error::Snapshot { path: path.clone(), source })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_channels() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.pixels = vec![0x00FE_5F38, 0x0061_44E3];
        let img = to_image(&fb);
        assert_eq!(img.get_pixel(0, 0), &Rgb([0xFE, 0x5F, 0x38]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([0x61, 0x44, 0xE3]));
    }

    #[test]
    fn writes_a_readable_png() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.fill(0x0010_2030);
        let dir = std::env::temp_dir();
        let path = save_png(&fb, &dir, std::process::id() as u128).unwrap();
        let back = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(2, 1), &Rgb([0x10, 0x20, 0x30]));
    }

    #[test]
    fn missing_directory_is_reported() {
        let fb = FrameBuffer::new(1, 1);
        let err = save_png(&fb, Path::new("/no/such/dir"), 1).unwrap_err();
        assert!(matches!(err, Error::Snapshot { .. }));
    }
}

//! Screenshot utilities for capturing the desktop.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{imageops, DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use std::thread;
use std::time::Duration;
use thiserror::Error;

use super::region::Region;

/// Default delay before grabbing the screen, so that the window that
/// triggered the capture is gone from the shot.
pub const DEFAULT_CAPTURE_DELAY_MS: u64 = 500;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Screenshot errors.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("No monitors found")]
    NoMonitor,
    #[error("Failed to capture screen: {0}")]
    CaptureFailed(String),
    #[error("Selected region {0} is outside the screen or empty")]
    EmptyRegion(Region),
    #[error("Invalid region '{0}', expected X,Y,W,H")]
    InvalidRegion(String),
    #[error("Failed to read image: {0}")]
    ImageReadFailed(String),
    #[error("Failed to encode image: {0}")]
    EncodeFailed(String),
}

/// A full frame of the primary screen as raw RGBA pixels.
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub image: RgbaImage,
}

impl Screenshot {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Cut a region out of the frame. The region is clipped to the frame first.
    pub fn crop(&self, region: Region) -> Result<RgbaImage, CaptureError> {
        let clipped = region
            .clamp_to(self.width(), self.height())
            .ok_or(CaptureError::EmptyRegion(region))?;

        Ok(imageops::crop_imm(
            &self.image,
            clipped.x,
            clipped.y,
            clipped.width,
            clipped.height,
        )
        .to_image())
    }
}

/// A PNG-encoded image ready to be sent to the model.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CapturedImage {
    /// Encode an RGBA image to PNG entirely in memory.
    ///
    /// When `max_width` is non-zero and the image is wider, it is scaled down
    /// keeping the aspect ratio.
    pub fn from_rgba(image: RgbaImage, max_width: u32) -> Result<Self, CaptureError> {
        let image = downscale(image, max_width);
        let (width, height) = image.dimensions();

        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| CaptureError::EncodeFailed(e.to_string()))?;

        Ok(Self {
            png: buffer.into_inner(),
            width,
            height,
        })
    }

    /// Base64 of the PNG bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.png)
    }

    /// `data:` URL accepted by the `image_url` content part.
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.to_base64())
    }
}

fn downscale(image: RgbaImage, max_width: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    if max_width == 0 || width <= max_width {
        return image;
    }

    let scale = max_width as f64 / width as f64;
    let new_height = ((height as f64 * scale).round() as u32).max(1);
    tracing::debug!(
        "Downscaling screenshot from {}x{} to {}x{}",
        width,
        height,
        max_width,
        new_height
    );
    imageops::resize(&image, max_width, new_height, imageops::FilterType::Triangle)
}

/// Capture the whole primary screen.
///
/// Uses the first monitor reported by the OS.
pub fn capture_screen() -> Result<Screenshot, CaptureError> {
    let monitors =
        xcap::Monitor::all().map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
    let monitor = monitors.first().ok_or(CaptureError::NoMonitor)?;

    let image = monitor
        .capture_image()
        .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

    tracing::info!("Captured screen {}x{}", image.width(), image.height());
    Ok(Screenshot { image })
}

/// Wait for `delay`, then capture the screen and cut out `region`.
///
/// Blocking; call it from `spawn_blocking` in async code.
pub fn capture_region(region: Region, delay: Duration) -> Result<RgbaImage, CaptureError> {
    if region.is_empty() {
        return Err(CaptureError::EmptyRegion(region));
    }
    if !delay.is_zero() {
        thread::sleep(delay);
    }
    capture_screen()?.crop(region)
}

/// Load an existing image file and re-encode it as PNG.
pub fn load_image_file(path: &Path, max_width: u32) -> Result<CapturedImage, CaptureError> {
    let bytes = std::fs::read(path)
        .map_err(|e| CaptureError::ImageReadFailed(format!("{}: {}", path.display(), e)))?;

    // Pass PNGs that need no resizing through untouched.
    if bytes.starts_with(PNG_MAGIC) {
        let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .map_err(|e| CaptureError::ImageReadFailed(e.to_string()))?;
        if max_width == 0 || img.width() <= max_width {
            return Ok(CapturedImage {
                width: img.width(),
                height: img.height(),
                png: bytes,
            });
        }
        return CapturedImage::from_rgba(img.to_rgba8(), max_width);
    }

    let img = image::load_from_memory(&bytes)
        .map_err(|e| CaptureError::ImageReadFailed(e.to_string()))?;
    CapturedImage::from_rgba(img.to_rgba8(), max_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checkerboard(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn test_encode_png_in_memory() {
        let captured = CapturedImage::from_rgba(checkerboard(40, 30), 0).unwrap();
        assert!(captured.png.starts_with(PNG_MAGIC));
        assert_eq!((captured.width, captured.height), (40, 30));

        let decoded = image::load_from_memory(&captured.png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }

    #[test]
    fn test_downscale_keeps_aspect_ratio() {
        let captured = CapturedImage::from_rgba(checkerboard(400, 200), 100).unwrap();
        assert_eq!((captured.width, captured.height), (100, 50));

        let small = CapturedImage::from_rgba(checkerboard(80, 60), 100).unwrap();
        assert_eq!((small.width, small.height), (80, 60));
    }

    #[test]
    fn test_data_url() {
        let captured = CapturedImage::from_rgba(checkerboard(2, 2), 0).unwrap();
        let url = captured.to_data_url();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert_eq!(STANDARD.decode(captured.to_base64()).unwrap(), captured.png);
    }

    #[test]
    fn test_crop_screenshot() {
        let shot = Screenshot {
            image: checkerboard(100, 80),
        };
        let cropped = shot.crop(Region::new(90, 70, 50, 50)).unwrap();
        assert_eq!(cropped.dimensions(), (10, 10));
        assert_eq!(cropped.get_pixel(0, 0), shot.image.get_pixel(90, 70));

        assert!(matches!(
            shot.crop(Region::new(100, 0, 10, 10)),
            Err(CaptureError::EmptyRegion(_))
        ));
    }

    #[test]
    fn test_capture_region_rejects_empty_selection() {
        let result = capture_region(Region::new(5, 5, 0, 20), Duration::ZERO);
        assert!(matches!(result, Err(CaptureError::EmptyRegion(_))));
    }

    #[test]
    fn test_load_image_file() {
        let dir = std::env::temp_dir();
        let png_path = dir.join(format!("coding-helper-test-{}.png", std::process::id()));
        checkerboard(300, 100).save(&png_path).unwrap();

        let untouched = load_image_file(&png_path, 0).unwrap();
        assert_eq!((untouched.width, untouched.height), (300, 100));
        assert_eq!(untouched.png, std::fs::read(&png_path).unwrap());

        let scaled = load_image_file(&png_path, 150).unwrap();
        assert_eq!((scaled.width, scaled.height), (150, 50));

        std::fs::remove_file(&png_path).unwrap();
        assert!(matches!(
            load_image_file(&png_path, 0),
            Err(CaptureError::ImageReadFailed(_))
        ));
    }
}

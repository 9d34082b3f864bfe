use crate::errors::AppError;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use std::sync::Arc;

pub const BYTES_PER_PIXEL: usize = 3;

/// One decoded image from a device, packed BGR8 (OpenCV's native order).
///
/// The pixel block is immutable and reference counted, so cloning a frame
/// copies a value without copying pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl Frame {
    pub fn from_bgr(width: u32, height: u32, data: Vec<u8>) -> Result<Self, AppError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(AppError::Encode(format!(
                "BGR frame {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Frame {
            width,
            height,
            data: data.into(),
        })
    }

    /// A frame filled with one `[b, g, r]` colour.
    pub fn solid(width: u32, height: u32, bgr: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let data: Vec<u8> = bgr.iter().copied().cycle().take(pixels * BYTES_PER_PIXEL).collect();
        Frame {
            width,
            height,
            data: data.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGB8 copy of the pixels, as image encoders expect.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(BYTES_PER_PIXEL) {
            rgb.extend_from_slice(&[px[2], px[1], px[0]]);
        }
        rgb
    }

    /// Baseline JPEG encoding at `quality` (1..=100).
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, AppError> {
        let rgb = self.to_rgb();
        let mut out = Vec::with_capacity(rgb.len() / 8);
        JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
            .encode(&rgb, self.width, self.height, ExtendedColorType::Rgb8)?;
        Ok(out)
    }
}

//! Atlas image - single channel pixel buffer

use std::path::Path;

use crate::geometry::Rect;
use crate::{ImportError, Result};

/// Alpha-only (A8) atlas pixels, row-major, top row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl AtlasImage {
    /// Create a fully transparent image
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![0; size],
        }
    }

    /// Wrap existing pixels, checking the length
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(ImportError::Format(format!(
                "atlas {}x{} expects {} pixels, got {}",
                width,
                height,
                width as usize * height as usize,
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    /// Whole image as a rect
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Read a pixel, 0 outside the image
    pub fn pixel(&self, x: u32, y: u32) -> u8 {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize]
        } else {
            0
        }
    }

    /// Set a pixel value
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) as usize;
            self.pixels[idx] = value;
        }
    }

    /// Copy a tightly packed `dest.width × dest.height` bitmap into `dest`
    pub fn blit(&mut self, dest: Rect, bitmap: &[u8]) -> Result<()> {
        if !self.bounds().contains(&dest) {
            return Err(ImportError::Format(format!(
                "blit target {dest:?} outside {}x{} atlas",
                self.width, self.height
            )));
        }
        if bitmap.len() != dest.area() as usize {
            return Err(ImportError::Format(format!(
                "bitmap has {} pixels, target needs {}",
                bitmap.len(),
                dest.area()
            )));
        }

        let stride = self.width as usize;
        let row_len = dest.width as usize;
        for row in 0..dest.height as usize {
            let src_start = row * row_len;
            let dst_start = (dest.y as usize + row) * stride + dest.x as usize;
            self.pixels[dst_start..dst_start + row_len]
                .copy_from_slice(&bitmap[src_start..src_start + row_len]);
        }

        Ok(())
    }

    /// Number of non-transparent pixels
    pub fn coverage(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != 0).count()
    }

    /// Convert to an `image` grayscale buffer
    pub fn to_gray_image(&self) -> Result<image::GrayImage> {
        image::GrayImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| ImportError::Format("atlas pixel count mismatch".into()))
    }

    /// Write the atlas as a grayscale PNG for inspection
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_gray_image()?
            .save_with_format(path, image::ImageFormat::Png)?;
        tracing::info!("Atlas image written to {}", path.display());
        Ok(())
    }
}

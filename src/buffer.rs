// The picture being edited: straight (non-premultiplied) RGBA8, row-major.

use image::RgbaImage;

use crate::error::{Error, Result};

pub const CHANNELS: usize = 4;
/// Index of the alpha byte inside one pixel.
pub const ALPHA: usize = 3;

/// `width * height * 4`, or `None` when that does not fit in a `usize`.
#[inline]
fn byte_len(width: usize, height: usize) -> Option<usize> {
    width.checked_mul(height)?.checked_mul(CHANNELS)
}

#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>, // width * height * 4
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

impl PixelBuffer {
    /// A buffer with no pixels.
    pub const fn empty() -> Self {
        Self { width: 0, height: 0, pixels: Vec::new() }
    }

    /// Wrap raw RGBA bytes. Fails unless `pixels.len() == width * height * 4`
    /// and both dimensions are non-zero.
    pub fn from_rgba(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        match byte_len(width, height) {
            Some(len) if len > 0 && pixels.len() == len => Ok(Self { width, height, pixels }),
            _ => Err(Error::EmptyImage { width, height, len: pixels.len() }),
        }
    }

    /// Copy a decoded picture at its natural resolution.
    pub fn load(image: &RgbaImage) -> Result<Self> {
        let (w, h) = image.dimensions();
        Self::from_rgba(w as usize, h as usize, image.as_raw().clone())
    }

    /// One color everywhere.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Result<Self> {
        if byte_len(width, height).is_none() {
            return Err(Error::EmptyImage { width, height, len: 0 });
        }
        let pixels = rgba.repeat(width * height);
        Self::from_rgba(width, height, pixels)
    }

    /// Overwrite every pixel with the pristine copy. Dimensions never change.
    pub fn reset(&mut self, original: &PixelBuffer) {
        debug_assert_eq!((self.width, self.height), (original.width, original.height));
        if self.pixels.len() == original.pixels.len() {
            self.pixels.copy_from_slice(&original.pixels);
        } else {
            *self = original.clone();
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfRange { x, y, width: self.width, height: self.height });
        }
        Ok((y * self.width + x) * CHANNELS)
    }

    /// RGBA at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Result<[u8; 4]> {
        let i = self.offset(x, y)?;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[i..i + CHANNELS]);
        Ok(px)
    }

    pub fn set(&mut self, x: usize, y: usize, rgba: [u8; 4]) -> Result<()> {
        let i = self.offset(x, y)?;
        self.pixels[i..i + CHANNELS].copy_from_slice(&rgba);
        Ok(())
    }

    pub fn alpha(&self, x: usize, y: usize) -> Result<u8> {
        let i = self.offset(x, y)?;
        Ok(self.pixels[i + ALPHA])
    }

    /// Brush write path: callers have already clipped to the buffer.
    #[inline]
    pub(crate) fn clear_alpha_unchecked(&mut self, x: usize, y: usize) {
        debug_assert!(x < self.width && y < self.height, "brush wrote outside the buffer");
        let i = (y * self.width + x) * CHANNELS + ALPHA;
        if let Some(a) = self.pixels.get_mut(i) {
            *a = 0;
        }
    }

    /// Alpha bytes only, row-major. Handy for comparing masks.
    pub fn alpha_channel(&self) -> Vec<u8> {
        self.pixels.chunks_exact(CHANNELS).map(|px| px[ALPHA]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_invariant_is_enforced() {
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            PixelBuffer::from_rgba(2, 2, vec![0; 15]),
            Err(Error::EmptyImage { .. })
        ));
        assert!(PixelBuffer::from_rgba(0, 3, Vec::new()).is_err());
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let huge = 1usize << (usize::BITS - 2);
        assert!(matches!(
            PixelBuffer::from_rgba(huge, 1, Vec::new()),
            Err(Error::EmptyImage { len: 0, .. })
        ));
        assert!(PixelBuffer::from_rgba(usize::MAX, 2, vec![0; 8]).is_err());
        assert!(PixelBuffer::filled(huge, huge, [0, 0, 0, 255]).is_err());
    }

    #[test]
    fn load_copies_natural_resolution() {
        let img = RgbaImage::from_pixel(7, 3, image::Rgba([1, 2, 3, 4]));
        let buf = PixelBuffer::load(&img).unwrap();
        assert_eq!(buf.dimensions(), (7, 3));
        assert_eq!(buf.get(6, 2).unwrap(), [1, 2, 3, 4]);
    }

    #[test]
    fn out_of_range_access_fails() {
        let mut buf = PixelBuffer::filled(3, 2, [0, 0, 0, 255]).unwrap();
        assert!(matches!(
            buf.get(3, 0),
            Err(Error::OutOfRange { x: 3, y: 0, width: 3, height: 2 })
        ));
        assert!(buf.set(0, 2, [1, 1, 1, 1]).is_err());
        buf.set(2, 1, [9, 8, 7, 6]).unwrap();
        assert_eq!(buf.get(2, 1).unwrap(), [9, 8, 7, 6]);
    }

    #[test]
    fn reset_restores_pristine_pixels() {
        let original = PixelBuffer::filled(4, 4, [10, 20, 30, 255]).unwrap();
        let mut buf = original.clone();
        buf.clear_alpha_unchecked(1, 1);
        buf.set(0, 0, [0, 0, 0, 0]).unwrap();
        assert_ne!(buf, original);
        buf.reset(&original);
        assert_eq!(buf, original);
    }
}

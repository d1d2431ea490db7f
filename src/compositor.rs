// Puts the edited picture over the chosen backdrop for preview and export.
// Blending is plain sRGB source-over, the same math a 2D canvas uses, so exports
// match what the user saw.

use crate::buffer::{ALPHA, CHANNELS, PixelBuffer};
use crate::types::{Background, Rgb};

/// Result of one render. Same size as the edit buffer; owns its own pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositedOutput {
    pub background: Background,
    pixels: PixelBuffer,
}

impl CompositedOutput {
    pub fn buffer(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.pixels.dimensions()
    }

    /// True when any pixel is less than fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.pixels.as_raw().chunks_exact(CHANNELS).any(|px| px[ALPHA] < 255)
    }
}

/// Composite `buffer` over `background`. Never touches `buffer`.
pub fn render(buffer: &PixelBuffer, background: Background) -> CompositedOutput {
    let pixels = match background {
        Background::Transparent => buffer.clone(),
        Background::Opaque(color) => over_opaque(buffer, color),
    };
    CompositedOutput { background, pixels }
}

/// `out = src * a + dst * (1 - a)`; the backdrop is opaque so the result is too.
fn over_opaque(buffer: &PixelBuffer, color: Rgb) -> PixelBuffer {
    let mut out = buffer.clone();
    let dst = [color.r, color.g, color.b];
    for px in out.as_raw_mut().chunks_exact_mut(CHANNELS) {
        let a = px[ALPHA] as u32;
        for (s, d) in px[..3].iter_mut().zip(dst) {
            *s = blend_channel(*s, d, a);
        }
        px[ALPHA] = 255;
    }
    out
}

/// One channel of source-over in 8-bit, rounded.
#[inline]
pub fn blend_channel(src: u8, dst: u8, alpha: u32) -> u8 {
    let v = src as u32 * alpha + dst as u32 * (255 - alpha);
    ((v + 127) / 255) as u8
}

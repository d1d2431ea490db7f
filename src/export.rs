// Turns a rendered preview into file bytes.
//
// PNG keeps every alpha value. JPEG has no alpha channel: whatever is still
// transparent gets flattened against white before encoding. With an opaque
// background selected there is nothing left to flatten.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::buffer::{ALPHA, CHANNELS};
use crate::compositor::{CompositedOutput, blend_channel};
use crate::config::{DEFAULT_JPEG_QUALITY, EXPORT_STEM};
use crate::error::{Error, Result};

/// What JPEG exports put behind leftover transparency.
pub const JPEG_MATTE: [u8; 3] = [255, 255, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Lossless, alpha preserved.
    Png,
    /// Lossy, no alpha.
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    /// `background-removed.png` / `background-removed.jpg`
    pub fn file_name(self) -> String {
        format!("{EXPORT_STEM}.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encode with the default JPEG quality.
pub fn encode(output: &CompositedOutput, format: ExportFormat) -> Result<Vec<u8>> {
    encode_with_quality(output, format, DEFAULT_JPEG_QUALITY)
}

/// Returns the complete encoded file or an error; never a partial byte stream.
pub fn encode_with_quality(output: &CompositedOutput, format: ExportFormat, quality: u8) -> Result<Vec<u8>> {
    let buffer = output.buffer();
    let (w, h) = buffer.dimensions();
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => {
            PngEncoder::new(&mut bytes).write_image(buffer.as_raw(), w as u32, h as u32, ExtendedColorType::Rgba8)?;
        }
        ExportFormat::Jpeg => {
            let rgb = flatten_rgb(buffer.as_raw(), JPEG_MATTE);
            JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)).write_image(
                &rgb,
                w as u32,
                h as u32,
                ExtendedColorType::Rgb8,
            )?;
        }
    }
    log::debug!("encoded {w}x{h} as {format}: {} bytes", bytes.len());
    Ok(bytes)
}

/// RGBA -> RGB, compositing each pixel over `matte`.
fn flatten_rgb(rgba: &[u8], matte: [u8; 3]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / CHANNELS * 3);
    for px in rgba.chunks_exact(CHANNELS) {
        let a = px[ALPHA] as u32;
        for (s, m) in px[..3].iter().zip(matte) {
            rgb.push(blend_channel(*s, m, a));
        }
    }
    rgb
}

/// Write `<dir>/background-removed.<ext>`. The bytes are produced before the
/// file is created.
pub fn write_to_dir(bytes: &[u8], format: ExportFormat, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format.file_name());
    std::fs::write(&path, bytes)?;
    log::info!("exported {}", path.display());
    Ok(path)
}

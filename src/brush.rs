// Hard-edged circular brush acting on the alpha channel only.
// A pixel belongs to the disc when its center (x + 0.5, y + 0.5) is within
// diameter / 2 of the brush center.

use crate::buffer::{ALPHA, CHANNELS, PixelBuffer};
use crate::types::{Mode, Point};

/// Inclusive pixel rectangle covering a disc, already clipped to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

/// Scan only the bounding box of the disc; `None` when it misses the buffer entirely.
fn disc_bounds(center: Point, radius: f32, width: usize, height: usize) -> Option<Bounds> {
    if width == 0 || height == 0 || radius.is_nan() || radius < 0.0 {
        return None;
    }
    // |x + 0.5 - cx| <= r  <=>  cx - r - 0.5 <= x <= cx + r - 0.5
    let lo_x = (center.x - radius - 0.5).ceil();
    let hi_x = (center.x + radius - 0.5).floor();
    let lo_y = (center.y - radius - 0.5).ceil();
    let hi_y = (center.y + radius - 0.5).floor();
    if hi_x < 0.0 || hi_y < 0.0 || lo_x >= width as f32 || lo_y >= height as f32 || lo_x > hi_x || lo_y > hi_y {
        return None;
    }
    Some(Bounds {
        x0: lo_x.max(0.0) as usize,
        y0: lo_y.max(0.0) as usize,
        x1: (hi_x as usize).min(width - 1),
        y1: (hi_y as usize).min(height - 1),
    })
}

#[inline]
fn inside(x: usize, y: usize, center: Point, r2: f32) -> bool {
    let dx = x as f32 + 0.5 - center.x;
    let dy = y as f32 + 0.5 - center.y;
    dx * dx + dy * dy <= r2
}

/// Visit every in-buffer pixel of the disc.
pub fn for_each_in_disc(
    center: Point,
    diameter: f32,
    width: usize,
    height: usize,
    mut f: impl FnMut(usize, usize),
) {
    let r = diameter / 2.0;
    let Some(b) = disc_bounds(center, r, width, height) else { return };
    let r2 = r * r;
    for y in b.y0..=b.y1 {
        for x in b.x0..=b.x1 {
            if inside(x, y, center, r2) {
                f(x, y);
            }
        }
    }
}

/// One brush sample. Both modes can only lower alpha; RGB is never touched so
/// erased pixels keep their color.
///
/// Does nothing on an empty buffer.
pub fn apply(buffer: &mut PixelBuffer, mode: Mode, center: Point, diameter: f32) {
    if buffer.is_empty() {
        return;
    }
    log::trace!("brush {mode} at ({:.1}, {:.1}) d={diameter}", center.x, center.y);
    match mode {
        Mode::Erase => erase_disc(buffer, center, diameter),
        Mode::Keep => keep_disc(buffer, center, diameter),
    }
}

fn erase_disc(buffer: &mut PixelBuffer, center: Point, diameter: f32) {
    let (w, h) = buffer.dimensions();
    for_each_in_disc(center, diameter, w, h, |x, y| buffer.clear_alpha_unchecked(x, y));
}

/// Intersect the whole buffer with the disc: alpha outside it goes to zero.
fn keep_disc(buffer: &mut PixelBuffer, center: Point, diameter: f32) {
    let (w, h) = buffer.dimensions();
    let r = diameter / 2.0;
    let r2 = r * r;
    let bounds = disc_bounds(center, r, w, h);
    for (row, line) in buffer.as_raw_mut().chunks_exact_mut(w * CHANNELS).enumerate() {
        let row_hit = bounds.filter(|b| row >= b.y0 && row <= b.y1);
        for (col, px) in line.chunks_exact_mut(CHANNELS).enumerate() {
            let keep = match row_hit {
                Some(b) => col >= b.x0 && col <= b.x1 && inside(col, row, center, r2),
                None => false,
            };
            if !keep {
                px[ALPHA] = 0;
            }
        }
    }
}

/// Union of every keep disc touched during one stroke. Applied once, at stroke end,
/// when keep samples are accumulated instead of intersected one by one.
#[derive(Debug, Clone)]
pub struct StrokeMask {
    width: usize,
    height: usize,
    covered: Vec<bool>, // width * height
    touched: bool,
}

impl StrokeMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, covered: vec![false; width * height], touched: false }
    }

    pub fn add_disc(&mut self, center: Point, diameter: f32) {
        let w = self.width;
        let covered = &mut self.covered;
        for_each_in_disc(center, diameter, self.width, self.height, |x, y| {
            covered[y * w + x] = true;
        });
        self.touched = true;
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.covered[y * self.width + x]
    }

    /// Zero alpha everywhere the stroke did not reach. Untouched masks leave the buffer alone.
    pub fn intersect(&self, buffer: &mut PixelBuffer) {
        if !self.touched || buffer.dimensions() != (self.width, self.height) {
            return;
        }
        for (px, &hit) in buffer.as_raw_mut().chunks_exact_mut(CHANNELS).zip(&self.covered) {
            if !hit {
                px[ALPHA] = 0;
            }
        }
    }
}

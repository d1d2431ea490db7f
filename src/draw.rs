// Window + software drawing utilities.
// What ends up on screen:
// 1) The picture being edited (or its preview) over a checkerboard, at the current zoom.
// 2) A circle that follows the mouse and shows the brush footprint.
// 3) A tiny 5x7 bitmap font for the status line.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::buffer::{ALPHA, PixelBuffer};
use crate::compositor::blend_channel;
use crate::error::{Error, Result};
use crate::mapper;
use crate::types::{FrameBuffer, Point, Rgb};

/// Area around the picture.
pub const PANEL_COLOR: u32 = 0x00_2B_2B_33;
/// The two checkerboard tones, 10px squares.
const CHECKER_LIGHT: [u8; 3] = [0xFF, 0xFF, 0xFF];
const CHECKER_DARK: [u8; 3] = [0xF0, 0xF0, 0xF0];
const CHECKER_CELL: usize = 10;

pub struct Drawer {
    window: Window,
}

impl Drawer {
    /// Open the editor window.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<()> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Mouse position in window pixels; `None` once the pointer leaves the window.
    pub fn mouse_pos(&self) -> Option<Point> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| Point::new(x, y))
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Edge-triggered key press (no auto-repeat).
    pub fn pressed_once(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    pub fn ctrl_down(&self) -> bool {
        self.window.is_key_down(Key::LeftCtrl) || self.window.is_key_down(Key::RightCtrl)
    }
}

/* ---------- Picture view ---------- */

/// Draw `picture` with its top-left at `origin`, scaled by `zoom` (nearest neighbour).
/// Transparent areas show the checkerboard; everything outside the picture is panel color.
pub fn draw_picture(fb: &mut FrameBuffer, picture: &PixelBuffer, origin: Point, zoom: f32) -> Result<()> {
    fb.fill(PANEL_COLOR);
    if picture.is_empty() {
        return Ok(());
    }
    let (pw, ph) = picture.dimensions();

    // Image column for every screen column (None = outside the picture).
    let mut columns = Vec::with_capacity(fb.width);
    for sx in 0..fb.width {
        let p = mapper::to_image_space(Point::new(sx as f32 + 0.5, 0.0), origin, zoom)?;
        columns.push((p.x >= 0.0 && (p.x as usize) < pw).then_some(p.x as usize));
    }

    let raw = picture.as_raw();
    for sy in 0..fb.height {
        let p = mapper::to_image_space(Point::new(0.0, sy as f32 + 0.5), origin, zoom)?;
        if p.y < 0.0 || p.y as usize >= ph {
            continue;
        }
        let iy = p.y as usize;
        let row = &mut fb.pixels[sy * fb.width..(sy + 1) * fb.width];
        for (sx, (out, col)) in row.iter_mut().zip(&columns).enumerate() {
            let Some(ix) = *col else { continue };
            let i = (iy * pw + ix) * 4;
            let px = &raw[i..i + 4];
            let checker = if ((sx / CHECKER_CELL) + (sy / CHECKER_CELL)) % 2 == 0 {
                CHECKER_LIGHT
            } else {
                CHECKER_DARK
            };
            let a = px[ALPHA] as u32;
            *out = Rgb::new(
                blend_channel(px[0], checker[0], a),
                blend_channel(px[1], checker[1], a),
                blend_channel(px[2], checker[2], a),
            )
            .to_u32();
        }
    }
    Ok(())
}

/* ---------- Software drawing: pixels, brush circle, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Circle outline (midpoint algorithm).
pub fn draw_circle(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, color: u32) {
    if radius <= 0 {
        put_pixel(fb, cx, cy, color);
        return;
    }
    let (mut x, mut y) = (radius, 0);
    let mut err = 1 - radius;
    while x >= y {
        for (dx, dy) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
            put_pixel(fb, cx + dx, cy + dy, color);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// The brush footprint as it will land on the picture: `diameter` image pixels,
/// so `diameter * zoom` on screen. Dark ring under a light one so it reads on any picture.
pub fn draw_brush_cursor(fb: &mut FrameBuffer, at: Point, diameter: f32, zoom: f32) {
    let r = (diameter * zoom / 2.0).round() as i32;
    let (cx, cy) = (at.x as i32, at.y as i32);
    draw_circle(fb, cx, cy, r + 1, 0x00_00_00_00);
    draw_circle(fb, cx, cy, r, 0x00_8B_5C_F6);
    put_pixel(fb, cx, cy, 0x00_8B_5C_F6);
}

/// Fill a solid rectangle (status bar background).
pub fn fill_rect(fb: &mut FrameBuffer, x: usize, y: usize, w: usize, h: usize, color: u32) {
    let x1 = (x + w).min(fb.width);
    let y1 = (y + h).min(fb.height);
    if x >= x1 {
        return;
    }
    for yy in y..y1 {
        let row = yy * fb.width;
        fb.pixels[row + x..row + x1].fill(color);
    }
}

/* ---------- 5x7 bitmap font (uppercase, digits, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap. Each u8 is a row; the low 5 bits are the pixels
/// (bit 4 = leftmost). Lowercase letters render as uppercase.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '%' => g!(0b11000,0b11001,0b00010,0b00100,0b01000,0b10011,0b00011),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),
        '/' => g!(0b00000,0b00001,0b00010,0b00100,0b01000,0b10000,0b00000),
        '[' => g!(0b01110,0b01000,0b01000,0b01000,0b01000,0b01000,0b01110),
        ']' => g!(0b01110,0b00010,0b00010,0b00010,0b00010,0b00010,0b01110),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (offset, tone) in [(1, 0x00000000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx + offset, y + ry as i32 + offset, tone);
                    }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs (6 pixels per character).
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}

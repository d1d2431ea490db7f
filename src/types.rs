// Small value types shared by the engine and the window front end.

use std::fmt;
use std::str::FromStr;

use crate::config::{BRUSH_DEFAULT, BRUSH_MAX, BRUSH_MIN, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::error::Error;

/// What minifb wants to show on screen.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // window width in pixels
    pub height: usize,     // window height in pixels
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }
}

/// A position in either screen or image space, in (fractional) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An opaque color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed as 0x00RRGGBB.
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Brush behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Clear alpha inside the disc.
    #[default]
    Erase,
    /// Clear alpha outside the disc.
    Keep,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "erase" => Ok(Mode::Erase),
            "keep" => Ok(Mode::Keep),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Erase => write!(f, "erase"),
            Mode::Keep => write!(f, "keep"),
        }
    }
}

/// The backdrop the edited picture is composited over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    Transparent,
    Opaque(Rgb),
}

impl Background {
    pub const WHITE: Background = Background::Opaque(Rgb::new(255, 255, 255));
    pub const RED: Background = Background::Opaque(Rgb::new(255, 0, 0));
    pub const BLUE: Background = Background::Opaque(Rgb::new(0, 0, 255));
    // CSS "green" is half intensity.
    pub const GREEN: Background = Background::Opaque(Rgb::new(0, 128, 0));
    pub const YELLOW: Background = Background::Opaque(Rgb::new(255, 255, 0));
    pub const BLACK: Background = Background::Opaque(Rgb::new(0, 0, 0));

    /// Every choice offered to the user, in menu order.
    pub const CHOICES: [Background; 7] = [
        Background::Transparent,
        Background::WHITE,
        Background::RED,
        Background::BLUE,
        Background::GREEN,
        Background::YELLOW,
        Background::BLACK,
    ];

    /// Next entry of [`Background::CHOICES`], wrapping around.
    /// A custom color not in the menu cycles back to transparent.
    pub fn next(self) -> Background {
        let pos = Self::CHOICES.iter().position(|b| *b == self);
        match pos {
            Some(i) => Self::CHOICES[(i + 1) % Self::CHOICES.len()],
            None => Background::Transparent,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Background::Transparent => "transparent",
            Background::WHITE => "white",
            Background::RED => "red",
            Background::BLUE => "blue",
            Background::GREEN => "green",
            Background::YELLOW => "yellow",
            Background::BLACK => "black",
            Background::Opaque(_) => "custom",
        }
    }
}

impl FromStr for Background {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::CHOICES
            .into_iter()
            .find(|b| b.name() == wanted)
            .ok_or_else(|| Error::UnknownBackground(s.to_string()))
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Control values set by the user. Passed into every engine call instead of
/// living in globals.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub mode: Mode,
    /// Brush diameter in image pixels.
    pub brush_diameter: f32,
    pub zoom: f32,
    pub background: Background,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            mode: Mode::Erase,
            brush_diameter: BRUSH_DEFAULT,
            zoom: 1.0,
            background: Background::Transparent,
        }
    }
}

impl EditorState {
    /// Slider semantics: whole pixels between 5 and 100. Non-finite input is ignored.
    pub fn set_brush_diameter(&mut self, diameter: f32) {
        if !diameter.is_finite() {
            log::warn!("ignoring brush diameter {diameter}");
            return;
        }
        self.brush_diameter = diameter.round().clamp(BRUSH_MIN, BRUSH_MAX);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    /// Snap to the nearest 0.25 step inside [0.5, 3.0].
    pub fn set_zoom(&mut self, zoom: f32) {
        if !zoom.is_finite() {
            log::warn!("ignoring zoom {zoom}");
            return;
        }
        let snapped = (zoom / ZOOM_STEP).round() * ZOOM_STEP;
        self.zoom = snapped.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_steps_are_clamped() {
        let mut state = EditorState::default();
        for _ in 0..20 {
            state.zoom_in();
        }
        assert_eq!(state.zoom, 3.0);
        for _ in 0..20 {
            state.zoom_out();
        }
        assert_eq!(state.zoom, 0.5);
        state.set_zoom(1.1);
        assert_eq!(state.zoom, 1.0);
        assert_eq!(state.zoom_percent(), 100);
    }

    #[test]
    fn brush_diameter_is_whole_and_bounded() {
        let mut state = EditorState::default();
        state.set_brush_diameter(2.0);
        assert_eq!(state.brush_diameter, 5.0);
        state.set_brush_diameter(42.6);
        assert_eq!(state.brush_diameter, 43.0);
        state.set_brush_diameter(250.0);
        assert_eq!(state.brush_diameter, 100.0);
    }

    #[test]
    fn non_finite_brush_and_zoom_keep_the_previous_value() {
        let mut state = EditorState::default();
        state.set_brush_diameter(30.0);
        state.set_brush_diameter(f32::NAN);
        state.set_brush_diameter(f32::INFINITY);
        assert_eq!(state.brush_diameter, 30.0);
        state.set_zoom(2.0);
        state.set_zoom(f32::NAN);
        assert_eq!(state.zoom, 2.0);
    }

    #[test]
    fn rgb_packs_as_window_pixel() {
        assert_eq!(Rgb::new(0x12, 0x34, 0x56).to_u32(), 0x00_12_34_56);
    }

    #[test]
    fn background_cycles_through_menu() {
        let mut bg = Background::Transparent;
        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(bg.name());
            bg = bg.next();
        }
        assert_eq!(seen, ["transparent", "white", "red", "blue", "green", "yellow", "black"]);
        assert_eq!(bg, Background::Transparent);
    }

    #[test]
    fn background_parses_named_colors() {
        assert_eq!("Blue".parse::<Background>().unwrap(), Background::BLUE);
        assert_eq!("green".parse::<Background>().unwrap(), Background::Opaque(Rgb::new(0, 128, 0)));
        assert!("magenta".parse::<Background>().is_err());
    }
}

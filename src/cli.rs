// Command-line arguments for the interactive eraser.
//
//   background-eraser photo.jpg
//   background-eraser photo.png --background white --brush 40 --output-dir out/
//   background-eraser photo.png --mode keep --keep-policy stroke-union

use std::path::PathBuf;

use clap::Parser;

use background_eraser::config::{BRUSH_DEFAULT, DEFAULT_JPEG_QUALITY};
use background_eraser::{Background, EditorState, KeepPolicy, Mode, SessionConfig};

/// Paint away the background of a picture and export it over a new one.
#[derive(Parser, Debug)]
#[command(
    name = "background-eraser",
    about = "Remove an image background by hand with a circular brush",
    long_about = "Opens the picture in a window. Hold the left mouse button to paint.\n\n\
                  Keys:\n  \
                  E / K      erase mode / keep mode\n  \
                  [ / ]      brush smaller / larger\n  \
                  - / =      zoom out / in\n  \
                  U, Ctrl+Z  undo last stroke\n  \
                  R          reset to the original picture\n  \
                  B          next background color\n  \
                  P          render preview\n  \
                  Tab        show edit view / preview\n  \
                  S / J      export PNG / JPG (needs a preview)\n  \
                  Esc        quit"
)]
pub struct CliArgs {
    /// Picture to edit (PNG, JPEG, BMP, GIF, WEBP).
    pub input: PathBuf,

    /// Where `background-removed.png` / `.jpg` are written.
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Brush diameter in image pixels (5-100).
    #[arg(short, long, default_value_t = BRUSH_DEFAULT)]
    pub brush: f32,

    /// Initial zoom (0.5-3.0, steps of 0.25).
    #[arg(short, long, default_value_t = 1.0)]
    pub zoom: f32,

    /// Initial brush mode: erase or keep.
    #[arg(short, long, default_value = "erase")]
    pub mode: Mode,

    /// Backdrop: transparent, white, red, blue, green, yellow, black.
    #[arg(long, default_value = "transparent")]
    pub background: Background,

    /// How keep strokes combine: per-sample or stroke-union.
    #[arg(long, default_value = "per-sample")]
    pub keep_policy: KeepPolicy,

    /// Cap on stored snapshots (pristine included). Unlimited when omitted.
    #[arg(long, value_name = "N")]
    pub history_limit: Option<usize>,

    /// JPEG quality (1-100).
    #[arg(short, long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    #[arg(long, default_value_t = 1024)]
    pub window_width: usize,

    #[arg(long, default_value_t = 768)]
    pub window_height: usize,
}

impl CliArgs {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            keep_policy: self.keep_policy,
            history_limit: self.history_limit,
            jpeg_quality: self.quality,
        }
    }

    /// Starting controls, pushed through the same clamps the keys use.
    pub fn editor_state(&self) -> EditorState {
        let mut state = EditorState { mode: self.mode, background: self.background, ..EditorState::default() };
        state.set_brush_diameter(self.brush);
        state.set_zoom(self.zoom);
        state
    }
}

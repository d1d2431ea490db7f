// Every way the eraser can refuse an operation.
// Rejections (nothing loaded, nothing to undo, no preview yet) are ordinary values
// the front end reports; none of them leave the edit buffer half-modified.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An edit or export was attempted before any picture was loaded.
    #[error("no image loaded")]
    NoImageLoaded,
    /// Undo with only the pristine snapshot left.
    #[error("nothing to undo")]
    NothingToUndo,
    /// Export before a preview was rendered.
    #[error("no preview rendered yet, render a preview before exporting")]
    NoCompositedOutput,
    #[error("invalid zoom factor {0}, must be positive")]
    InvalidZoom(f32),
    #[error("pixel ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// A decoded picture with a zero dimension, or raw data of the wrong length.
    #[error("image has no pixels or mismatched data ({width}x{height}, {len} bytes)")]
    EmptyImage { width: usize, height: usize, len: usize },

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown background '{0}' (expected transparent, white, red, blue, green, yellow or black)")]
    UnknownBackground(String),
    #[error("unknown export format '{0}' (expected png or jpg)")]
    UnknownFormat(String),
    #[error("unknown keep policy '{0}' (expected per-sample or stroke-union)")]
    UnknownPolicy(String),
    #[error("unknown brush mode '{0}' (expected erase or keep)")]
    UnknownMode(String),

    #[error("window init error: {0}")]
    WindowInit(String),
    #[error("window update error: {0}")]
    WindowUpdate(String),
}

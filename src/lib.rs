// Manual background removal for raster images.
//
// Paint over a picture with a circular brush to erase parts of it (or keep only
// what you circle), undo strokes, then composite the result over a chosen
// backdrop and export it as PNG or JPEG. `session::EditingSession` ties the
// pieces together; the other modules are usable on their own.

pub mod brush;
pub mod buffer;
pub mod compositor;
pub mod config;
pub mod draw;
pub mod error;
pub mod export;
pub mod history;
pub mod mapper;
pub mod session;
pub mod types;

pub use buffer::PixelBuffer;
pub use compositor::CompositedOutput;
pub use config::{KeepPolicy, SessionConfig};
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use history::HistoryStack;
pub use session::EditingSession;
pub use types::{Background, EditorState, Mode, Point, Rgb};

// One editing session: the only owner of the pixels being edited.
//
// Pointer events come in already split into down/move/up/leave. The brush is the
// only thing that writes to the buffer; history, preview and export only read it.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::brush::{self, StrokeMask};
use crate::buffer::PixelBuffer;
use crate::compositor::{self, CompositedOutput};
use crate::config::{KeepPolicy, SessionConfig};
use crate::error::{Error, Result};
use crate::export::{self, ExportFormat};
use crate::history::HistoryStack;
use crate::mapper;
use crate::types::{EditorState, Mode, Point};

/// Loaded picture plus its undo trail.
struct Document {
    buffer: PixelBuffer,
    history: HistoryStack,
}

pub struct EditingSession {
    config: SessionConfig,
    state: EditorState,
    doc: Option<Document>,
    /// Set between pointer-down and pointer-up/leave.
    drawing: bool,
    /// Keep samples collected during the current stroke (stroke-union policy only).
    stroke_mask: Option<StrokeMask>,
    /// Last rendered preview; what export encodes.
    preview: Option<CompositedOutput>,
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::new(SessionConfig::default(), EditorState::default())
    }
}

impl EditingSession {
    pub fn new(config: SessionConfig, state: EditorState) -> Self {
        Self { config, state, doc: None, drawing: false, stroke_mask: None, preview: None }
    }

    /* ---------- loading ---------- */

    /// Start over with a decoded picture at its natural size.
    pub fn load(&mut self, image: &RgbaImage) -> Result<()> {
        self.install(PixelBuffer::load(image)?);
        Ok(())
    }

    /// Same as [`load`](Self::load) from raw RGBA bytes.
    pub fn load_rgba(&mut self, width: usize, height: usize, pixels: Vec<u8>) -> Result<()> {
        self.install(PixelBuffer::from_rgba(width, height, pixels)?);
        Ok(())
    }

    /// Decode a file from disk and load it.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let image = image::open(path)?.to_rgba8();
        self.load(&image)?;
        log::info!("opened {}", path.display());
        Ok(())
    }

    fn install(&mut self, buffer: PixelBuffer) {
        let (w, h) = buffer.dimensions();
        let history = HistoryStack::with_limit(&buffer, self.config.history_limit);
        self.doc = Some(Document { buffer, history });
        self.drawing = false;
        self.stroke_mask = None;
        self.preview = None;
        log::info!("loaded {w}x{h} image");
    }

    /* ---------- accessors ---------- */

    pub fn is_loaded(&self) -> bool {
        self.doc.is_some()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Controls the UI is allowed to change at any time.
    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current pixels for display. `None` before a load.
    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.doc.as_ref().map(|d| &d.buffer)
    }

    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.buffer().map(PixelBuffer::dimensions)
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn history_len(&self) -> usize {
        self.doc.as_ref().map_or(0, |d| d.history.len())
    }

    pub fn can_undo(&self) -> bool {
        self.doc.as_ref().is_some_and(|d| d.history.can_undo())
    }

    pub fn preview_available(&self) -> bool {
        self.preview.is_some()
    }

    pub fn preview(&self) -> Option<&CompositedOutput> {
        self.preview.as_ref()
    }

    fn doc_mut(&mut self) -> Result<&mut Document> {
        self.doc.as_mut().ok_or(Error::NoImageLoaded)
    }

    /* ---------- strokes ---------- */

    /// Begin a stroke and paint the first sample. Returns `false` (and does
    /// nothing) while another stroke is still active.
    pub fn pointer_down(&mut self, pointer: Point, origin: Point) -> Result<bool> {
        if self.doc.is_none() {
            return Err(Error::NoImageLoaded);
        }
        if self.drawing {
            return Ok(false);
        }
        let at = mapper::to_image_space(pointer, origin, self.state.zoom)?;
        self.drawing = true;
        log::debug!("stroke start ({}) at ({:.1}, {:.1})", self.state.mode, at.x, at.y);
        self.paint(at)?;
        Ok(true)
    }

    /// One sample while the button is held. Moves without an active stroke are ignored.
    pub fn pointer_move(&mut self, pointer: Point, origin: Point) -> Result<()> {
        if self.doc.is_none() {
            return Err(Error::NoImageLoaded);
        }
        if !self.drawing {
            return Ok(());
        }
        let at = mapper::to_image_space(pointer, origin, self.state.zoom)?;
        self.paint(at)
    }

    fn paint(&mut self, at: Point) -> Result<()> {
        let mode = self.state.mode;
        let diameter = self.state.brush_diameter;
        if mode == Mode::Keep && self.config.keep_policy == KeepPolicy::StrokeUnion {
            // The mode may switch to keep mid-stroke, so the mask starts on first use.
            if self.stroke_mask.is_none() {
                let (w, h) = self.dimensions().unwrap_or_default();
                self.stroke_mask = Some(StrokeMask::new(w, h));
            }
            if let Some(mask) = self.stroke_mask.as_mut() {
                mask.add_disc(at, diameter);
            }
            return Ok(());
        }
        let doc = self.doc_mut()?;
        brush::apply(&mut doc.buffer, mode, at, diameter);
        Ok(())
    }

    /// Finish the stroke. Snapshots exactly once; returns whether a stroke ended.
    pub fn pointer_up(&mut self) -> Result<bool> {
        if !self.drawing {
            return if self.doc.is_some() { Ok(false) } else { Err(Error::NoImageLoaded) };
        }
        self.drawing = false;
        let mask = self.stroke_mask.take();
        let doc = self.doc_mut()?;
        if let Some(mask) = mask {
            mask.intersect(&mut doc.buffer);
        }
        doc.history.snapshot(&doc.buffer);
        log::debug!("stroke end, {} history entries", doc.history.len());
        Ok(true)
    }

    /// Pointer left the canvas: same as releasing the button.
    pub fn pointer_leave(&mut self) -> Result<bool> {
        self.pointer_up()
    }

    /* ---------- history ---------- */

    /// Revert the last stroke.
    pub fn undo(&mut self) -> Result<()> {
        let doc = self.doc_mut()?;
        match doc.history.undo() {
            Ok(previous) => {
                doc.buffer.reset(previous);
                log::info!("undo, {} history entries left", doc.history.len());
                Ok(())
            }
            Err(e) => {
                log::warn!("undo rejected: {e}");
                Err(e)
            }
        }
    }

    /// Back to the picture as loaded, history truncated to that one entry.
    pub fn reset(&mut self) -> Result<()> {
        let doc = self.doc_mut()?;
        let pristine = doc.history.reset();
        doc.buffer.reset(pristine);
        self.drawing = false;
        self.stroke_mask = None;
        log::info!("canvas reset");
        Ok(())
    }

    /* ---------- preview / export ---------- */

    /// Composite the current pixels over the current background and keep the result
    /// as the preview that export will encode.
    pub fn render_preview(&mut self) -> Result<&CompositedOutput> {
        let buffer = self.buffer().ok_or(Error::NoImageLoaded)?;
        let output = compositor::render(buffer, self.state.background);
        log::info!("preview rendered over {}", self.state.background);
        let preview: &CompositedOutput = self.preview.insert(output);
        Ok(preview)
    }

    /// Encode the last preview.
    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let Some(preview) = self.preview.as_ref() else {
            log::warn!("export rejected: no preview");
            return Err(Error::NoCompositedOutput);
        };
        export::encode_with_quality(preview, format, self.config.jpeg_quality)
    }

    /// Encode the last preview and write `background-removed.<ext>` into `dir`.
    pub fn export_to_dir(&self, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
        let bytes = self.export(format)?;
        export::write_to_dir(&bytes, format, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Background;
    use pretty_assertions::assert_eq;

    const ORIGIN: Point = Point::new(0.0, 0.0);

    fn loaded(w: usize, h: usize) -> EditingSession {
        let mut s = EditingSession::default();
        s.load_rgba(w, h, [255, 0, 0, 255].repeat(w * h)).unwrap();
        s
    }

    #[test]
    fn everything_is_rejected_before_load() {
        let mut s = EditingSession::default();
        assert!(matches!(s.pointer_down(ORIGIN, ORIGIN), Err(Error::NoImageLoaded)));
        assert!(matches!(s.pointer_move(ORIGIN, ORIGIN), Err(Error::NoImageLoaded)));
        assert!(matches!(s.pointer_up(), Err(Error::NoImageLoaded)));
        assert!(matches!(s.undo(), Err(Error::NoImageLoaded)));
        assert!(matches!(s.reset(), Err(Error::NoImageLoaded)));
        assert!(matches!(s.render_preview(), Err(Error::NoImageLoaded)));
        assert!(matches!(s.export(ExportFormat::Png), Err(Error::NoCompositedOutput)));
        assert!(!s.is_drawing());
    }

    #[test]
    fn second_pointer_down_is_ignored() {
        let mut s = loaded(10, 10);
        s.state_mut().set_brush_diameter(5.0);
        assert!(s.pointer_down(Point::new(2.0, 2.0), ORIGIN).unwrap());
        assert!(!s.pointer_down(Point::new(8.0, 8.0), ORIGIN).unwrap());
        let buf = s.buffer().unwrap();
        assert_eq!(buf.alpha(2, 2).unwrap(), 0);
        assert_eq!(buf.alpha(8, 8).unwrap(), 255);
        assert!(s.pointer_up().unwrap());
        assert_eq!(s.history_len(), 2);
    }

    #[test]
    fn one_snapshot_per_stroke() {
        let mut s = loaded(50, 50);
        s.pointer_down(Point::new(10.0, 10.0), ORIGIN).unwrap();
        for i in 0..10 {
            s.pointer_move(Point::new(10.0 + i as f32, 10.0), ORIGIN).unwrap();
        }
        s.pointer_leave().unwrap();
        // a stray up after leave does not snapshot again
        assert!(!s.pointer_up().unwrap());
        assert_eq!(s.history_len(), 2);
    }

    #[test]
    fn moves_without_a_stroke_do_nothing() {
        let mut s = loaded(10, 10);
        s.pointer_move(Point::new(5.0, 5.0), ORIGIN).unwrap();
        assert_eq!(s.buffer().unwrap().alpha(5, 5).unwrap(), 255);
        assert_eq!(s.history_len(), 1);
    }

    #[test]
    fn zoom_is_applied_to_pointer_positions() {
        let mut s = loaded(40, 40);
        s.state_mut().set_zoom(2.0);
        s.state_mut().set_brush_diameter(5.0);
        let origin = Point::new(100.0, 100.0);
        s.pointer_down(Point::new(100.0 + 2.0 * 30.5, 100.0 + 2.0 * 10.5), origin).unwrap();
        s.pointer_up().unwrap();
        let buf = s.buffer().unwrap();
        assert_eq!(buf.alpha(30, 10).unwrap(), 0);
        assert_eq!(buf.alpha(10, 30).unwrap(), 255);
    }

    #[test]
    fn stroke_union_keeps_every_disc_of_the_stroke() {
        let config = SessionConfig { keep_policy: KeepPolicy::StrokeUnion, ..SessionConfig::default() };
        let state = EditorState { mode: Mode::Keep, brush_diameter: 8.0, ..EditorState::default() };
        let mut s = EditingSession::new(config, state);
        s.load_rgba(40, 20, [0, 0, 255, 255].repeat(800)).unwrap();
        s.pointer_down(Point::new(10.0, 10.0), ORIGIN).unwrap();
        // nothing is cut until the stroke ends
        assert_eq!(s.buffer().unwrap().alpha(0, 0).unwrap(), 255);
        s.pointer_move(Point::new(30.0, 10.0), ORIGIN).unwrap();
        s.pointer_up().unwrap();
        let buf = s.buffer().unwrap();
        assert_eq!(buf.alpha(10, 10).unwrap(), 255);
        assert_eq!(buf.alpha(30, 10).unwrap(), 255);
        assert_eq!(buf.alpha(0, 0).unwrap(), 0);
    }

    #[test]
    fn switching_to_keep_mid_stroke_still_collects_a_union() {
        let config = SessionConfig { keep_policy: KeepPolicy::StrokeUnion, ..SessionConfig::default() };
        let state = EditorState { mode: Mode::Erase, brush_diameter: 8.0, ..EditorState::default() };
        let mut s = EditingSession::new(config, state);
        s.load_rgba(60, 20, [0, 0, 255, 255].repeat(1200)).unwrap();
        s.pointer_down(Point::new(50.0, 10.0), ORIGIN).unwrap();
        assert_eq!(s.buffer().unwrap().alpha(50, 10).unwrap(), 0);
        s.state_mut().mode = Mode::Keep;
        s.pointer_move(Point::new(10.0, 10.0), ORIGIN).unwrap();
        s.pointer_move(Point::new(30.0, 10.0), ORIGIN).unwrap();
        assert_eq!(s.buffer().unwrap().alpha(0, 0).unwrap(), 255);
        assert!(s.pointer_up().unwrap());
        let buf = s.buffer().unwrap();
        assert_eq!(buf.alpha(10, 10).unwrap(), 255);
        assert_eq!(buf.alpha(30, 10).unwrap(), 255);
        assert_eq!(buf.alpha(0, 0).unwrap(), 0);
        assert_eq!(s.history_len(), 2);
    }

    #[test]
    fn per_sample_keep_only_keeps_last_disc() {
        let state = EditorState { mode: Mode::Keep, brush_diameter: 8.0, ..EditorState::default() };
        let mut s = EditingSession::new(SessionConfig::default(), state);
        s.load_rgba(40, 20, [0, 0, 255, 255].repeat(800)).unwrap();
        s.pointer_down(Point::new(10.0, 10.0), ORIGIN).unwrap();
        s.pointer_move(Point::new(30.0, 10.0), ORIGIN).unwrap();
        s.pointer_up().unwrap();
        let buf = s.buffer().unwrap();
        assert_eq!(buf.alpha(10, 10).unwrap(), 0);
        assert_eq!(buf.alpha(30, 10).unwrap(), 0);
    }

    #[test]
    fn export_uses_the_last_rendered_preview() {
        let mut s = loaded(4, 4);
        assert!(!s.preview_available());
        s.state_mut().background = Background::WHITE;
        s.render_preview().unwrap();
        assert!(s.preview_available());
        // edits after the render don't show up until the next render
        s.pointer_down(Point::new(2.0, 2.0), ORIGIN).unwrap();
        s.pointer_up().unwrap();
        assert_eq!(s.preview().unwrap().buffer().get(2, 2).unwrap(), [255, 0, 0, 255]);
        assert!(!s.export(ExportFormat::Jpeg).unwrap().is_empty());
    }

    #[test]
    fn loading_a_new_image_drops_preview_and_history() {
        let mut s = loaded(4, 4);
        s.pointer_down(Point::new(1.0, 1.0), ORIGIN).unwrap();
        s.pointer_up().unwrap();
        s.render_preview().unwrap();
        s.load_rgba(2, 2, vec![0; 16]).unwrap();
        assert_eq!(s.history_len(), 1);
        assert!(!s.preview_available());
        assert_eq!(s.dimensions(), Some((2, 2)));
    }

    #[test]
    fn invalid_zoom_is_caught_at_the_boundary() {
        let mut s = loaded(4, 4);
        s.state_mut().zoom = 0.0;
        assert!(matches!(s.pointer_down(ORIGIN, ORIGIN), Err(Error::InvalidZoom(_))));
        assert!(!s.is_drawing());
    }
}

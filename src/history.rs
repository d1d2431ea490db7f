// Undo history made of full-resolution snapshots.
//
// Entry 0 is the picture as loaded and is never removed. One entry is pushed per
// finished stroke. Memory grows with `strokes * pixels`; pass a limit to
// `HistoryStack::with_limit` to drop the oldest strokes instead.

use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: Vec<PixelBuffer>,
    /// Maximum entries, pristine included. `None` = unbounded.
    limit: Option<usize>,
}

impl HistoryStack {
    /// Start a history whose only entry is the pristine load.
    pub fn new(pristine: &PixelBuffer) -> Self {
        Self::with_limit(pristine, None)
    }

    pub fn with_limit(pristine: &PixelBuffer, limit: Option<usize>) -> Self {
        // A limit below 2 would forbid any undo at all.
        let limit = limit.map(|l| l.max(2));
        Self { entries: vec![pristine.clone()], limit }
    }

    /// Record the buffer as it stands after a stroke.
    pub fn snapshot(&mut self, buffer: &PixelBuffer) {
        self.entries.push(buffer.clone());
        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                // Oldest stroke goes; the pristine entry stays at 0.
                self.entries.remove(1);
            }
        }
        log::debug!("history: {} entries", self.entries.len());
    }

    /// Drop the latest stroke and return the state to show now.
    pub fn undo(&mut self) -> Result<&PixelBuffer> {
        if self.entries.len() <= 1 {
            return Err(Error::NothingToUndo);
        }
        self.entries.pop();
        Ok(self.top())
    }

    /// Forget every stroke; the pristine load becomes current.
    pub fn reset(&mut self) -> &PixelBuffer {
        self.entries.truncate(1);
        self.top()
    }

    pub fn can_undo(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pristine(&self) -> &PixelBuffer {
        &self.entries[0]
    }

    pub fn top(&self) -> &PixelBuffer {
        // never empty: constructed with the pristine entry and undo keeps it
        &self.entries[self.entries.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn marked(value: u8) -> PixelBuffer {
        PixelBuffer::filled(2, 2, [value, value, value, 255]).unwrap()
    }

    #[test]
    fn undo_walks_back_to_pristine_then_refuses() {
        let mut history = HistoryStack::new(&marked(0));
        history.snapshot(&marked(1));
        history.snapshot(&marked(2));
        assert_eq!(history.len(), 3);

        assert_eq!(history.undo().unwrap(), &marked(1));
        assert_eq!(history.undo().unwrap(), &marked(0));
        assert!(matches!(history.undo(), Err(Error::NothingToUndo)));
        assert_eq!(history.len(), 1);
        assert_eq!(history.top(), &marked(0));
    }

    #[test]
    fn reset_truncates_to_one_entry() {
        let mut history = HistoryStack::new(&marked(0));
        for i in 1..5 {
            history.snapshot(&marked(i));
        }
        assert_eq!(history.reset(), &marked(0));
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
    }

    #[test]
    fn limit_drops_oldest_stroke_but_keeps_pristine() {
        let mut history = HistoryStack::with_limit(&marked(0), Some(3));
        for i in 1..=4 {
            history.snapshot(&marked(i));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.pristine(), &marked(0));
        assert_eq!(history.undo().unwrap(), &marked(3));
        assert_eq!(history.undo().unwrap(), &marked(0));
    }
}

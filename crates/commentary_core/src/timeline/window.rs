use serde::{Deserialize, Serialize};

use crate::error::CommentaryError;
use crate::event::Event;

/// Requested output span `[start, end)` in match seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    start: f64,
    end: f64,
}

impl Window {
    pub fn new(start: f64, end: f64) -> Result<Self, CommentaryError> {
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(CommentaryError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Event lies completely inside the window
    pub fn contains(&self, event: &Event) -> bool {
        self.start <= event.start_time() && event.end_time() <= self.end
    }

    /// Events inside the window, stably sorted by start time
    pub fn select_events<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        let mut inside: Vec<&Event> = events.iter().filter(|e| self.contains(e)).collect();
        inside.sort_by(|a, b| a.start_time().total_cmp(&b.start_time()));
        inside
    }
}

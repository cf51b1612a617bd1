/// Coalesces redraw requests to one draw per display frame.
///
/// Any number of [`RedrawScheduler::request`] calls between two frame boundaries produce a single
/// draw when the host calls [`RedrawScheduler::on_frame`] at the next boundary (trailing edge).
#[derive(Clone, Debug, Default)]
pub struct RedrawScheduler {
    pending: bool,
    requests: u64,
    draws: u64,
}

impl RedrawScheduler {
    /// Idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a redraw at the next frame boundary. Returns `true` if this request armed the slot,
    /// `false` if a redraw was already pending.
    pub fn request(&mut self) -> bool {
        self.requests += 1;
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// `true` when a redraw is waiting for the next frame.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Frame boundary: run `draw` once if a redraw is pending. Returns whether it ran.
    pub fn on_frame<F: FnOnce()>(&mut self, draw: F) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.draws += 1;
        draw();
        true
    }

    /// Drop a pending redraw without drawing.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// Total `(requests, draws)` seen so far.
    pub fn counters(&self) -> (u64, u64) {
        (self.requests, self.draws)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scheduler.rs"]
mod tests;

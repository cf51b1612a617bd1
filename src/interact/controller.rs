use crate::{
    foundation::core::{Point, Vec2},
    transform::placement::{ImagePosition, clamp_offset, clamp_scale},
};

/// Pointer interaction state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    /// No pointer is held on the preview.
    Idle,
    /// A pointer is held; `grab` is its offset from the photo's top-left corner.
    Dragging {
        /// Pointer position minus draw position at pointer-down.
        grab: Vec2,
    },
}

/// Two-tier position state for the preview.
///
/// `local` changes synchronously on every pointer move or slider change and is what gets drawn.
/// `committed` mirrors what the upstream owner last accepted and only moves at interaction
/// boundaries (pointer up/cancel, slider release).
#[derive(Clone, Debug)]
pub struct PositioningController {
    state: DragState,
    local: ImagePosition,
    committed: ImagePosition,
}

impl PositioningController {
    /// Start idle with both tiers at `position`.
    pub fn new(position: ImagePosition) -> Self {
        Self {
            state: DragState::Idle,
            local: position,
            committed: position,
        }
    }

    /// Current drag state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// `true` while a pointer is held.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Position to render right now.
    pub fn local(&self) -> ImagePosition {
        self.local
    }

    /// Last committed position.
    pub fn committed(&self) -> ImagePosition {
        self.committed
    }

    /// Replace both tiers, e.g. after a new photo was fitted. Cancels any drag in progress.
    pub fn reset(&mut self, position: ImagePosition) {
        self.state = DragState::Idle;
        self.local = position;
        self.committed = position;
    }

    /// Accept an upstream position while idle. Ignored mid-drag so the pointer keeps control.
    pub fn sync_committed(&mut self, position: ImagePosition) {
        if !self.is_dragging() {
            self.local = position;
            self.committed = position;
        }
    }

    /// Begin a drag. Returns `false` when a drag was already in progress.
    pub fn pointer_down(&mut self, pointer: Point) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.state = DragState::Dragging {
            grab: pointer - Point::new(self.local.x, self.local.y),
        };
        true
    }

    /// Move the photo under the pointer. Returns `true` when the local position changed and a
    /// redraw should be scheduled.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let DragState::Dragging { grab } = self.state else {
            return false;
        };
        let next = pointer - grab;
        if !(next.x.is_finite() && next.y.is_finite()) {
            return false;
        }
        if next.x == self.local.x && next.y == self.local.y {
            return false;
        }
        self.local.x = next.x;
        self.local.y = next.y;
        true
    }

    /// End the drag. Returns the position to commit upstream, if anything changed.
    pub fn pointer_up(&mut self) -> Option<ImagePosition> {
        if !self.is_dragging() {
            return None;
        }
        self.state = DragState::Idle;
        self.commit()
    }

    /// Pointer capture lost; treated like a release.
    pub fn pointer_cancel(&mut self) -> Option<ImagePosition> {
        self.pointer_up()
    }

    /// Slider zoom. Returns `true` when the local position changed.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        if !scale.is_finite() {
            return false;
        }
        let scale = clamp_scale(scale);
        let changed = scale != self.local.scale;
        self.local.scale = scale;
        changed
    }

    /// Slider horizontal offset. Returns `true` when the local position changed.
    pub fn set_x(&mut self, x: f64) -> bool {
        if !x.is_finite() {
            return false;
        }
        let x = clamp_offset(x);
        let changed = x != self.local.x;
        self.local.x = x;
        changed
    }

    /// Slider vertical offset. Returns `true` when the local position changed.
    pub fn set_y(&mut self, y: f64) -> bool {
        if !y.is_finite() {
            return false;
        }
        let y = clamp_offset(y);
        let changed = y != self.local.y;
        self.local.y = y;
        changed
    }

    /// A slider was released; commit whatever changed since the last commit.
    pub fn slider_released(&mut self) -> Option<ImagePosition> {
        if self.is_dragging() {
            return None;
        }
        self.commit()
    }

    fn commit(&mut self) -> Option<ImagePosition> {
        let next = ImagePosition {
            x: self.local.x,
            y: self.local.y,
            scale: self.local.scale,
            ..self.committed
        };
        if next == self.committed {
            return None;
        }
        self.committed = next;
        self.local = next;
        Some(next)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/controller.rs"]
mod tests;

//! `<custom-dropdown>` positioning.
//!
//! The overlay places itself right below its parent element using absolute
//! viewport coordinates. Recomputed on attach and on every visibility
//! change; each pass is a few geometry reads and one style write.

use serde::{Deserialize, Serialize};

/// Bounding rectangle in viewport pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width() / 2.0
    }
}

/// Geometry and style access for one overlay element.
pub trait OverlayHost {
    /// `None` when there is no parent or it cannot be measured.
    fn parent_rect(&self) -> Option<Rect>;
    fn own_rect(&self) -> Rect;
    fn is_visible(&self) -> bool;
    fn write_style(&mut self, style: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayPolicy {
    /// Center under the parent instead of aligning left edges.
    pub centered: bool,
    /// Skip positioning while the overlay itself is not visible.
    pub visibility_guard: bool,
    /// Reposition on every intersection change after attach.
    pub observe_intersections: bool,
    /// Gap between the parent's bottom edge and the overlay.
    pub top_offset_rem: f64,
}

impl Default for OverlayPolicy {
    fn default() -> Self {
        Self {
            centered: true,
            visibility_guard: true,
            observe_intersections: true,
            top_offset_rem: 0.5,
        }
    }
}

/// `top` is the parent's bottom edge; the rem offset is added in CSS so it
/// follows the root font size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayPosition {
    pub top: f64,
    pub left: f64,
}

impl OverlayPosition {
    pub fn compute(parent: Rect, own_width: f64, policy: &OverlayPolicy) -> Self {
        let left = if policy.centered {
            parent.center_x() - own_width / 2.0
        } else {
            parent.left
        };
        Self {
            top: parent.bottom,
            left,
        }
    }

    /// Replaces the whole inline style; `inset: unset` drops any inset
    /// shorthand that would fight `top`/`left`.
    pub fn to_style(&self, policy: &OverlayPolicy) -> String {
        format!(
            "inset: unset; top: calc({}rem + {}px); left: {}px",
            policy.top_offset_rem, self.top, self.left
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayState {
    Detached,
    Attached { observing: bool },
}

#[derive(Clone, Copy, Debug)]
pub struct OverlayWidget {
    policy: OverlayPolicy,
    state: OverlayState,
}

impl OverlayWidget {
    pub fn new(policy: OverlayPolicy) -> Self {
        Self {
            policy,
            state: OverlayState::Detached,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Positions once. The caller registers a visibility observer when the
    /// new state says `observing`.
    pub fn attach(&mut self, host: &mut impl OverlayHost) -> Option<OverlayPosition> {
        self.state = OverlayState::Attached {
            observing: self.policy.observe_intersections,
        };
        self.reposition(host)
    }

    /// Returns whether an observer was registered and must be released.
    pub fn detach(&mut self) -> bool {
        let observing = matches!(self.state, OverlayState::Attached { observing: true });
        self.state = OverlayState::Detached;
        observing
    }

    /// Visibility signal from the observer. Ignored unless observing.
    pub fn visibility_changed(&self, host: &mut impl OverlayHost) -> Option<OverlayPosition> {
        match self.state {
            OverlayState::Attached { observing: true } => self.reposition(host),
            _ => None,
        }
    }

    /// Writes the position, or does nothing when the parent cannot be
    /// measured or the overlay is hidden. The next trigger tries again.
    pub fn reposition(&self, host: &mut impl OverlayHost) -> Option<OverlayPosition> {
        let parent = host.parent_rect()?;
        if self.policy.visibility_guard && !host.is_visible() {
            return None;
        }
        let position = OverlayPosition::compute(parent, host.own_rect().width(), &self.policy);
        host.write_style(&position.to_style(&self.policy));
        Some(position)
    }
}

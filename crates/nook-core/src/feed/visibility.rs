/// Turns a level signal ("last item is visible") into rising edges.
#[derive(Debug, Default, Clone)]
pub struct VisibilityEdge {
    visible: bool,
}

impl VisibilityEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the latest level; returns `true` only on hidden → visible.
    pub fn observe(&mut self, visible: bool) -> bool {
        let rising = visible && !self.visible;
        self.visible = visible;
        rising
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

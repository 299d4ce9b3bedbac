use egui::Rect;

use crate::surface::{OverlayId, Surface, SurfaceId};

/// The window's content area: whatever is left after the egui panels.
pub struct HostView {
    id: SurfaceId,
    bounds: Rect,
    children: Vec<OverlayId>,
}

impl HostView {
    pub fn new(bounds: Rect) -> Self {
        Self {
            id: SurfaceId::next(),
            bounds,
            children: Vec::new(),
        }
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }
}

impl Surface for HostView {
    fn surface_id(&self) -> SurfaceId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn insert_child(&mut self, child: OverlayId) {
        self.children.retain(|c| *c != child);
        self.children.push(child);
    }

    fn remove_child(&mut self, child: OverlayId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| *c != child);
        self.children.len() != before
    }

    fn contains_child(&self, child: OverlayId) -> bool {
        self.children.contains(&child)
    }
}

use std::sync::atomic::{AtomicU64, Ordering};

use egui::Rect;

static NEXT_OVERLAY_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

impl OverlayId {
    pub fn next() -> Self {
        Self(NEXT_OVERLAY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub fn next() -> Self {
        Self(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A host view the overlay can cover: something with bounds and a child list.
pub trait Surface {
    fn surface_id(&self) -> SurfaceId;

    /// Area the overlay should cover, in logical units.
    fn bounds(&self) -> Rect;

    /// Add `child` on top of the z-order.
    fn insert_child(&mut self, child: OverlayId);

    /// Returns false if `child` was not present.
    fn remove_child(&mut self, child: OverlayId) -> bool;

    fn contains_child(&self, child: OverlayId) -> bool;
}

use crate::{
    core::geo::LatLng,
    markers::{MarkerHandle, MarkerId},
    prelude::HashMap,
};

/// The map surface markers are drawn on.
///
/// Only [`crate::markers::registry::MarkerRegistry`] adds or removes
/// markers; selection code may restyle and move the viewport.
pub trait MarkerCanvas {
    /// Attaches a new marker primitive to the map
    fn add_marker(&mut self, marker: &MarkerHandle);

    /// Moves or restyles an attached marker in place
    fn update_marker(&mut self, marker: &MarkerHandle);

    /// Detaches and destroys a marker
    fn remove_marker(&mut self, id: MarkerId);

    /// Animates the viewport to a position
    fn fly_to(&mut self, position: LatLng, zoom: f64);
}

#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    Add(MarkerId),
    Update(MarkerId),
    Remove(MarkerId),
    FlyTo(LatLng, f64),
}

/// In-memory canvas that keeps the attached markers and a log of every call
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    attached: HashMap<MarkerId, MarkerHandle>,
    ops: Vec<CanvasOp>,
    view: Option<(LatLng, f64)>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    /// Returns and clears the call log
    pub fn take_ops(&mut self) -> Vec<CanvasOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn attached(&self, id: MarkerId) -> Option<&MarkerHandle> {
        self.attached.get(&id)
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    /// Last viewport target set through `fly_to`
    pub fn view(&self) -> Option<(LatLng, f64)> {
        self.view
    }
}

impl MarkerCanvas for RecordingCanvas {
    fn add_marker(&mut self, marker: &MarkerHandle) {
        if self.attached.insert(marker.id(), marker.clone()).is_some() {
            log::warn!("{} attached twice", marker.id());
        }
        self.ops.push(CanvasOp::Add(marker.id()));
    }

    fn update_marker(&mut self, marker: &MarkerHandle) {
        match self.attached.get_mut(&marker.id()) {
            Some(slot) => *slot = marker.clone(),
            None => log::warn!("update of detached {}", marker.id()),
        }
        self.ops.push(CanvasOp::Update(marker.id()));
    }

    fn remove_marker(&mut self, id: MarkerId) {
        if self.attached.remove(&id).is_none() {
            log::warn!("remove of detached {}", id);
        }
        self.ops.push(CanvasOp::Remove(id));
    }

    fn fly_to(&mut self, position: LatLng, zoom: f64) {
        self.view = Some((position, zoom));
        self.ops.push(CanvasOp::FlyTo(position, zoom));
    }
}

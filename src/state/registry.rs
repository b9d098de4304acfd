//! Mapping between dataset uids and the curves drawn for them.
//!
//! `lookup` holds uids in backend z-order: `lookup[i]` is the i-th curve the
//! backend draws. `lines` and `by_handle` form the uid <-> handle map. Only
//! this type mutates any of them.

use std::collections::HashMap;
use std::thread::{self, ThreadId};

use uuid::Uuid;

use crate::error::GraphError;
use crate::render::backend::{LineHandle, Orientation, RenderBackend, StraightLineRole};
use crate::render::plot_interaction::Bounds;
use crate::state::dataset::{Dataset, DatasetStore, LineWidth, PlotType};

/// A curve bound to exactly one dataset.
#[derive(Debug, Clone)]
pub struct RegisteredLine {
    pub uid: Uuid,
    pub handle: LineHandle,
    /// Bounds of the drawn (transformed) samples.
    pub bounds: Option<Bounds>,
}

/// How lines are drawn right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStyle {
    pub plot_type: PlotType,
    pub width: LineWidth,
}

#[derive(Debug)]
pub struct LineRegistry {
    lookup: Vec<Uuid>,
    lines: HashMap<Uuid, RegisteredLine>,
    by_handle: HashMap<LineHandle, Uuid>,
    calibration: HashMap<Uuid, LineHandle>,
    owner: ThreadId,
}

impl Default for LineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRegistry {
    pub fn new() -> Self {
        Self {
            lookup: Vec::new(),
            lines: HashMap::new(),
            by_handle: HashMap::new(),
            calibration: HashMap::new(),
            owner: thread::current().id(),
        }
    }

    /// Uids in backend plot order.
    pub fn lookup_table(&self) -> &[Uuid] {
        &self.lookup
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    pub fn contains(&self, uid: Uuid) -> bool {
        self.lines.contains_key(&uid)
    }

    pub fn line(&self, uid: Uuid) -> Option<&RegisteredLine> {
        self.lines.get(&uid)
    }

    pub fn index_of(&self, uid: Uuid) -> Option<usize> {
        self.lookup.iter().position(|u| *u == uid)
    }

    pub fn uid_for_handle(&self, handle: LineHandle) -> Option<Uuid> {
        self.by_handle.get(&handle).copied()
    }

    pub fn calibration_line(&self, uid: Uuid) -> Option<LineHandle> {
        self.calibration.get(&uid).copied()
    }

    pub fn calibration_count(&self) -> usize {
        self.calibration.len()
    }

    /// Union of the drawn bounds of every registered line.
    pub fn bounds(&self) -> Option<Bounds> {
        self.lookup
            .iter()
            .filter_map(|uid| self.lines.get(uid).and_then(|l| l.bounds))
            .reduce(Bounds::union)
    }

    /// Whether lookup table, uid map and handle map agree with each other.
    pub fn is_consistent(&self) -> bool {
        self.lookup.len() == self.lines.len()
            && self.by_handle.len() == self.lines.len()
            && self.lookup.iter().all(|uid| {
                self.lines
                    .get(uid)
                    .is_some_and(|line| self.by_handle.get(&line.handle) == Some(uid))
            })
            && self.calibration.keys().all(|uid| self.lines.contains_key(uid))
    }

    /// Register a dataset from the store. An already registered uid is
    /// refreshed in place instead.
    pub fn add_line<S, B>(
        &mut self,
        uid: Uuid,
        store: &S,
        backend: &mut B,
        style: DrawStyle,
    ) -> Result<(), GraphError>
    where
        S: DatasetStore + ?Sized,
        B: RenderBackend,
    {
        let dataset = store.get_dataset(uid).ok_or(GraphError::UidNotFound(uid))?;
        self.insert_dataset(dataset, backend, style)
    }

    /// Register `dataset` directly, without going through a store.
    pub fn insert_dataset<B: RenderBackend>(
        &mut self,
        dataset: &Dataset,
        backend: &mut B,
        style: DrawStyle,
    ) -> Result<(), GraphError> {
        self.assert_owner();
        if self.contains(dataset.uid) {
            tracing::debug!("{}, updating instead", GraphError::DuplicateUid(dataset.uid));
            return self.update_with(dataset, backend, style);
        }
        let handle = backend.create_line();
        self.lookup.push(dataset.uid);
        self.lines.insert(
            dataset.uid,
            RegisteredLine {
                uid: dataset.uid,
                handle,
                bounds: None,
            },
        );
        self.by_handle.insert(handle, dataset.uid);
        tracing::debug!("registered {} ({}) at index {}", dataset.label, dataset.uid, self.lookup.len() - 1);
        self.draw_graph(self.lookup.len() - 1, dataset, backend, style)
    }

    /// Bind plot index `index` to the samples of `dataset`, transformed for
    /// the active plot type and styled with the active width.
    pub fn draw_graph<B: RenderBackend>(
        &mut self,
        index: usize,
        dataset: &Dataset,
        backend: &mut B,
        style: DrawStyle,
    ) -> Result<(), GraphError> {
        self.assert_owner();
        if self.lookup.get(index) != Some(&dataset.uid) {
            return Err(GraphError::NotRegistered(dataset.uid));
        }
        let line = self
            .lines
            .get_mut(&dataset.uid)
            .ok_or(GraphError::NotRegistered(dataset.uid))?;
        let samples = style.plot_type.transform(dataset.samples());
        backend.set_data(line.handle, &samples);
        backend.set_width(line.handle, style.width.pixels());
        line.bounds = Bounds::from_samples(&samples);
        Ok(())
    }

    /// Re-read a registered dataset from the store and replace its samples.
    pub fn update_line<S, B>(
        &mut self,
        uid: Uuid,
        store: &S,
        backend: &mut B,
        style: DrawStyle,
    ) -> Result<(), GraphError>
    where
        S: DatasetStore + ?Sized,
        B: RenderBackend,
    {
        if !self.contains(uid) {
            return Err(GraphError::NotRegistered(uid));
        }
        let dataset = store.get_dataset(uid).ok_or(GraphError::UidNotFound(uid))?;
        self.update_with(dataset, backend, style)
    }

    /// Replace the samples of a registered line; order is unchanged.
    pub fn update_with<B: RenderBackend>(
        &mut self,
        dataset: &Dataset,
        backend: &mut B,
        style: DrawStyle,
    ) -> Result<(), GraphError> {
        let index = self
            .index_of(dataset.uid)
            .ok_or(GraphError::NotRegistered(dataset.uid))?;
        self.draw_graph(index, dataset, backend, style)
    }

    /// Refresh every registered line. `live` is used in place of the store
    /// for its own uid. Returns how many lines were refreshed.
    pub fn update_lines<S, B>(
        &mut self,
        store: &S,
        backend: &mut B,
        style: DrawStyle,
        live: Option<&Dataset>,
    ) -> usize
    where
        S: DatasetStore + ?Sized,
        B: RenderBackend,
    {
        let uids = self.lookup.clone();
        let mut updated = 0;
        for uid in uids {
            let result = match live {
                Some(dataset) if dataset.uid == uid => self.update_with(dataset, backend, style),
                _ => self.update_line(uid, store, backend, style),
            };
            match result {
                Ok(()) => updated += 1,
                Err(e) => tracing::warn!("skipping line refresh: {e}"),
            }
        }
        updated
    }

    /// Remove a line, its lookup entry and its calibration line.
    pub fn remove_line<B: RenderBackend>(&mut self, uid: Uuid, backend: &mut B) -> Result<(), GraphError> {
        self.assert_owner();
        let line = self.lines.remove(&uid).ok_or(GraphError::NotRegistered(uid))?;
        backend.remove_line(line.handle);
        self.by_handle.remove(&line.handle);
        if let Some(pos) = self.index_of(uid) {
            self.lookup.remove(pos);
        }
        self.clear_calibration_line(uid, backend);
        Ok(())
    }

    /// Create or move the calibration line of a registered dataset.
    pub fn set_calibration_line<B: RenderBackend>(
        &mut self,
        uid: Uuid,
        x: f64,
        backend: &mut B,
        width: LineWidth,
    ) -> Result<(), GraphError> {
        self.assert_owner();
        if !self.contains(uid) {
            return Err(GraphError::NotRegistered(uid));
        }
        let handle = *self.calibration.entry(uid).or_insert_with(|| {
            backend.create_straight_line(Orientation::Vertical, StraightLineRole::Calibration)
        });
        backend.set_position(handle, x);
        backend.set_width(handle, width.pixels());
        Ok(())
    }

    /// Returns whether a calibration line was removed.
    pub fn clear_calibration_line<B: RenderBackend>(&mut self, uid: Uuid, backend: &mut B) -> bool {
        self.assert_owner();
        match self.calibration.remove(&uid) {
            Some(handle) => {
                backend.remove_line(handle);
                true
            }
            None => false,
        }
    }

    pub fn clear_calibration_lines<B: RenderBackend>(&mut self, backend: &mut B) {
        self.assert_owner();
        for (_, handle) in self.calibration.drain() {
            backend.remove_line(handle);
        }
    }

    /// Apply a stroke width to every curve and calibration line.
    pub fn set_width<B: RenderBackend>(&self, backend: &mut B, width: LineWidth) {
        let px = width.pixels();
        for line in self.lines.values() {
            backend.set_width(line.handle, px);
        }
        for handle in self.calibration.values() {
            backend.set_width(*handle, px);
        }
    }

    fn assert_owner(&self) {
        debug_assert_eq!(
            thread::current().id(),
            self.owner,
            "line registry mutated off its owning thread"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::scene::Scene;
    use crate::state::dataset::{MemoryStore, Sample};

    fn style() -> DrawStyle {
        DrawStyle {
            plot_type: PlotType::Time,
            width: LineWidth::Normal,
        }
    }

    fn dataset(label: &str, points: &[(f64, f64)]) -> Dataset {
        let samples = points.iter().map(|&(x, y)| Sample::new(x, y)).collect();
        Dataset::new(label, PlotType::Time, samples)
    }

    fn assert_matches_backend(registry: &LineRegistry, scene: &Scene) {
        assert!(registry.is_consistent());
        let handles: Vec<LineHandle> = scene.curves().iter().map(|c| c.handle).collect();
        let expected: Vec<LineHandle> = registry
            .lookup_table()
            .iter()
            .map(|uid| registry.line(*uid).unwrap().handle)
            .collect();
        assert_eq!(handles, expected);
    }

    #[test]
    fn add_then_remove_restores_state() {
        let mut store = MemoryStore::new();
        let mut scene = Scene::new();
        let mut registry = LineRegistry::new();
        let a = store.insert(dataset("a", &[(0.0, 0.0), (1.0, 1.0)]));
        let b = store.insert(dataset("b", &[(2.0, 4.0), (3.0, 9.0)]));

        registry.add_line(a, &store, &mut scene, style()).unwrap();
        let before = registry.lookup_table().to_vec();
        registry.add_line(b, &store, &mut scene, style()).unwrap();
        registry.remove_line(b, &mut scene).unwrap();
        assert_eq!(registry.lookup_table(), before.as_slice());
        assert_eq!(scene.line_count(), 1);
        assert_matches_backend(&registry, &scene);
    }

    #[test]
    fn removal_keeps_remaining_order() {
        let mut store = MemoryStore::new();
        let mut scene = Scene::new();
        let mut registry = LineRegistry::new();
        let uids: Vec<Uuid> = (0..4)
            .map(|i| store.insert(dataset(&format!("d{i}"), &[(i as f64, 0.0)])))
            .collect();
        for uid in &uids {
            registry.add_line(*uid, &store, &mut scene, style()).unwrap();
        }
        registry.remove_line(uids[1], &mut scene).unwrap();
        assert_eq!(registry.lookup_table(), &[uids[0], uids[2], uids[3]]);
        assert_matches_backend(&registry, &scene);
    }

    #[test]
    fn missing_dataset_leaves_registry_unchanged() {
        let store = MemoryStore::new();
        let mut scene = Scene::new();
        let mut registry = LineRegistry::new();
        let uid = Uuid::new_v4();
        assert_eq!(
            registry.add_line(uid, &store, &mut scene, style()),
            Err(GraphError::UidNotFound(uid))
        );
        assert!(registry.is_empty());
        assert_eq!(scene.line_count(), 0);
        assert_eq!(registry.remove_line(uid, &mut scene), Err(GraphError::NotRegistered(uid)));
    }

    #[test]
    fn duplicate_add_updates_in_place() {
        let mut store = MemoryStore::new();
        let mut scene = Scene::new();
        let mut registry = LineRegistry::new();
        let a = store.insert(dataset("a", &[(0.0, 0.0)]));
        registry.add_line(a, &store, &mut scene, style()).unwrap();
        store.get_mut(a).unwrap().set_samples(vec![Sample::new(5.0, 5.0)]);
        registry.add_line(a, &store, &mut scene, style()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(scene.curves()[0].samples, vec![Sample::new(5.0, 5.0)]);
    }

    #[test]
    fn update_line_replaces_samples_only() {
        let mut store = MemoryStore::new();
        let mut scene = Scene::new();
        let mut registry = LineRegistry::new();
        let a = store.insert(dataset("a", &[(0.0, 0.0)]));
        let b = store.insert(dataset("b", &[(1.0, 1.0)]));
        registry.add_line(a, &store, &mut scene, style()).unwrap();
        registry.add_line(b, &store, &mut scene, style()).unwrap();
        store.get_mut(a).unwrap().set_samples(vec![Sample::new(0.0, 2.0), Sample::new(1.0, 3.0)]);
        registry.update_line(a, &store, &mut scene, style()).unwrap();
        assert_eq!(registry.lookup_table(), &[a, b]);
        assert_eq!(scene.curves()[0].samples.len(), 2);
        let bounds = registry.line(a).unwrap().bounds.unwrap();
        assert_eq!((bounds.y_min, bounds.y_max), (2.0, 3.0));
    }

    #[test]
    fn update_lines_prefers_live_snapshot() {
        let mut store = MemoryStore::new();
        let mut scene = Scene::new();
        let mut registry = LineRegistry::new();
        let a = store.insert(dataset("a", &[(0.0, 0.0)]));
        let live = dataset("live", &[(0.0, 7.0)]);
        registry.add_line(a, &store, &mut scene, style()).unwrap();
        registry.insert_dataset(&live, &mut scene, style()).unwrap();
        assert_eq!(registry.update_lines(&store, &mut scene, style(), Some(&live)), 2);
        assert_eq!(registry.update_lines(&store, &mut scene, style(), None), 1);
    }

    #[test]
    fn draw_graph_rejects_mismatched_index() {
        let mut store = MemoryStore::new();
        let mut scene = Scene::new();
        let mut registry = LineRegistry::new();
        let a = dataset("a", &[(0.0, 0.0)]);
        let b = dataset("b", &[(1.0, 1.0)]);
        let a_uid = store.insert(a.clone());
        registry.add_line(a_uid, &store, &mut scene, style()).unwrap();
        assert_eq!(
            registry.draw_graph(0, &b, &mut scene, style()),
            Err(GraphError::NotRegistered(b.uid))
        );
        assert!(registry.draw_graph(0, &a, &mut scene, style()).is_ok());
    }

    #[test]
    fn calibration_line_follows_its_dataset() {
        let mut store = MemoryStore::new();
        let mut scene = Scene::new();
        let mut registry = LineRegistry::new();
        let a = store.insert(dataset("a", &[(0.0, 0.0)]));
        registry.add_line(a, &store, &mut scene, style()).unwrap();
        registry.set_calibration_line(a, 3.0, &mut scene, LineWidth::Large).unwrap();
        registry.set_calibration_line(a, 4.0, &mut scene, LineWidth::Large).unwrap();
        assert_eq!(registry.calibration_count(), 1);
        let handle = registry.calibration_line(a).unwrap();
        assert_eq!(scene.straight_line(handle).unwrap().value, 4.0);
        registry.remove_line(a, &mut scene).unwrap();
        assert_eq!(registry.calibration_count(), 0);
        assert!(scene.straight_lines().is_empty());
        assert!(registry.is_consistent());
    }

    #[test]
    fn width_applies_to_every_line() {
        let mut store = MemoryStore::new();
        let mut scene = Scene::new();
        let mut registry = LineRegistry::new();
        let a = store.insert(dataset("a", &[(0.0, 0.0)]));
        registry.add_line(a, &store, &mut scene, style()).unwrap();
        registry.set_calibration_line(a, 1.0, &mut scene, LineWidth::Normal).unwrap();
        registry.set_width(&mut scene, LineWidth::Larger);
        assert_eq!(scene.curves()[0].width, 3.0);
        assert_eq!(scene.straight_lines()[0].width, 3.0);
    }
}

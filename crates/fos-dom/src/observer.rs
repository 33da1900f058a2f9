//! DOM Observers
//!
//! MutationObserver and IntersectionObserver bookkeeping. Observers only
//! queue records; the host decides when to deliver them to callbacks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::{DOMRect, RootMargin};
use crate::{DomError, DomTree, NodeId};

static NEXT_OBSERVER_ID: AtomicU64 = AtomicU64::new(1);

fn next_observer_id() -> u64 {
    NEXT_OBSERVER_ID.fetch_add(1, Ordering::Relaxed)
}

/// Mutation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    CharacterData,
    ChildList,
}

/// Mutation record
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

impl MutationRecord {
    /// Attribute change on `target`
    pub fn attributes(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: Some(name.to_ascii_lowercase()),
            old_value,
        }
    }

    /// Children added to or removed from `target`
    pub fn child_list(target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes: added,
            removed_nodes: removed,
            attribute_name: None,
            old_value: None,
        }
    }
}

/// Mutation observer options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    pub subtree: bool,
    pub attribute_old_value: bool,
    pub character_data_old_value: bool,
    pub attribute_filter: Option<Vec<String>>,
}

impl MutationObserverInit {
    /// Attribute changes on the target only
    pub fn attributes_only() -> Self {
        Self { attributes: true, ..Default::default() }
    }

    fn accepts(&self, mutation: &MutationRecord) -> bool {
        match mutation.mutation_type {
            MutationType::Attributes => {
                self.attributes
                    && match (&self.attribute_filter, &mutation.attribute_name) {
                        (Some(filter), Some(attr)) => filter.iter().any(|f| f.eq_ignore_ascii_case(attr)),
                        _ => true,
                    }
            }
            MutationType::CharacterData => self.character_data,
            MutationType::ChildList => self.child_list,
        }
    }

    fn keeps_old_value(&self, mutation_type: MutationType) -> bool {
        match mutation_type {
            MutationType::Attributes => self.attribute_old_value,
            MutationType::CharacterData => self.character_data_old_value,
            MutationType::ChildList => false,
        }
    }
}

/// Mutation observer
#[derive(Debug)]
pub struct MutationObserver {
    id: u64,
    observations: Vec<(NodeId, MutationObserverInit)>,
    pending_records: Vec<MutationRecord>,
}

impl Default for MutationObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl MutationObserver {
    pub fn new() -> Self {
        Self {
            id: next_observer_id(),
            observations: Vec::new(),
            pending_records: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Observe a target, replacing any previous options for it
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) {
        match self.observations.iter_mut().find(|(t, _)| *t == target) {
            Some((_, existing)) => *existing = options,
            None => self.observations.push((target, options)),
        }
    }

    /// Stop observing everything and drop queued records
    pub fn disconnect(&mut self) {
        self.observations.clear();
        self.pending_records.clear();
    }

    /// Check if observing node
    pub fn is_observing(&self, node: NodeId) -> bool {
        self.observations.iter().any(|(t, _)| *t == node)
    }

    /// Whether any target is observed
    pub fn is_active(&self) -> bool {
        !self.observations.is_empty()
    }

    /// Queue `mutation` if any observation matches it. Returns whether it was queued.
    pub fn record(&mut self, mutation: &MutationRecord, tree: &DomTree) -> bool {
        let matched = self.observations.iter().find(|(target, options)| {
            let in_scope = *target == mutation.target
                || (options.subtree && tree.ancestors(mutation.target).any(|a| a == *target));
            in_scope && options.accepts(mutation)
        });

        let Some((_, options)) = matched else {
            return false;
        };
        tracing::trace!(observer = self.id, target = %mutation.target, kind = ?mutation.mutation_type, "Queued mutation record");

        let mut record = mutation.clone();
        if !options.keeps_old_value(record.mutation_type) {
            record.old_value = None;
        }
        self.pending_records.push(record);
        true
    }

    /// Take pending records
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.pending_records)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_records.is_empty()
    }
}

/// Intersection observer options
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionObserverInit {
    /// Root element (None = viewport)
    pub root: Option<NodeId>,
    /// Root margin, CSS margin shorthand
    pub root_margin: String,
    /// Thresholds to trigger callback
    pub threshold: Vec<f64>,
}

impl Default for IntersectionObserverInit {
    fn default() -> Self {
        Self {
            root: None,
            root_margin: "0px".to_string(),
            threshold: vec![0.0],
        }
    }
}

/// Intersection observer entry
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionObserverEntry {
    pub target: NodeId,
    pub bounding_client_rect: DOMRect,
    pub intersection_rect: DOMRect,
    pub root_bounds: Option<DOMRect>,
    pub intersection_ratio: f64,
    pub is_intersecting: bool,
    pub time: f64,
}

/// What was last reported for a target
#[derive(Debug, Clone, Copy, PartialEq)]
struct LastReport {
    threshold_index: usize,
    is_intersecting: bool,
}

/// Intersection observer
#[derive(Debug)]
pub struct IntersectionObserver {
    id: u64,
    root: Option<NodeId>,
    root_margin: RootMargin,
    thresholds: Vec<f64>,
    observed: Vec<(NodeId, Option<LastReport>)>,
    pending_entries: Vec<IntersectionObserverEntry>,
}

impl IntersectionObserver {
    pub fn new(init: IntersectionObserverInit) -> Result<Self, DomError> {
        let root_margin = RootMargin::parse(&init.root_margin)?;

        let mut thresholds = init.threshold;
        if let Some(&bad) = thresholds.iter().find(|t| !(0.0..=1.0).contains(*t)) {
            return Err(DomError::InvalidThreshold(bad));
        }
        if thresholds.is_empty() {
            thresholds.push(0.0);
        }
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();

        Ok(Self {
            id: next_observer_id(),
            root: init.root,
            root_margin,
            thresholds,
            observed: Vec::new(),
            pending_entries: Vec::new(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Observe an element. Its first check always produces an entry.
    pub fn observe(&mut self, target: NodeId) {
        if !self.observes(target) {
            self.observed.push((target, None));
        }
    }

    /// Stop observing, dropping queued entries for the target
    pub fn unobserve(&mut self, target: NodeId) {
        self.observed.retain(|(node, _)| *node != target);
        self.pending_entries.retain(|e| e.target != target);
    }

    /// Disconnect all
    pub fn disconnect(&mut self) {
        self.observed.clear();
        self.pending_entries.clear();
    }

    pub fn observes(&self, target: NodeId) -> bool {
        self.observed.iter().any(|(node, _)| *node == target)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Check intersections against `root_bounds` (None when the root is not rendered)
    pub fn check_intersections(
        &mut self,
        root_bounds: Option<DOMRect>,
        element_rects: &HashMap<NodeId, DOMRect>,
        time: f64,
    ) {
        let root = root_bounds.map(|bounds| self.root_margin.apply(bounds));

        for (node, last) in &mut self.observed {
            let rect = element_rects.get(node).copied();
            let intersection = match (rect, root) {
                (Some(rect), Some(root)) => rect.intersection(&root),
                _ => None,
            };

            let is_intersecting = intersection.is_some();
            let ratio = match (rect, intersection) {
                (Some(rect), Some(hit)) if rect.area() > 0.0 => hit.area() / rect.area(),
                (_, Some(_)) => 1.0,
                _ => 0.0,
            };
            let threshold_index = if is_intersecting {
                self.thresholds.iter().take_while(|&&t| t <= ratio).count()
            } else {
                0
            };

            let report = LastReport { threshold_index, is_intersecting };
            if *last == Some(report) {
                continue;
            }
            *last = Some(report);

            self.pending_entries.push(IntersectionObserverEntry {
                target: *node,
                bounding_client_rect: rect.unwrap_or_default(),
                intersection_rect: intersection.unwrap_or_default(),
                root_bounds: root,
                intersection_ratio: ratio,
                is_intersecting,
                time,
            });
        }
    }

    /// Take pending entries
    pub fn take_entries(&mut self) -> Vec<IntersectionObserverEntry> {
        std::mem::take(&mut self.pending_entries)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_entries.is_empty()
    }
}

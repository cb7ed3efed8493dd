//! Recently credited delivery ids.
//!
//! A bounded FIFO set: once full, crediting a new delivery evicts the
//! oldest id. A redelivery older than the window is no longer recognised,
//! so the capacity must cover the transport's redelivery horizon.

use std::collections::{HashSet, VecDeque};

use tidal_types::DeliveryId;

/// Default number of delivery ids remembered per adapter.
pub const DEFAULT_DEDUPE_CAPACITY: usize = 65_536;

#[derive(Clone, Debug)]
pub struct RecentDeliveries {
    set: HashSet<DeliveryId>,
    order: VecDeque<DeliveryId>,
    capacity: usize,
}

impl RecentDeliveries {
    pub fn new(capacity: usize) -> Self {
        Self {
            set: HashSet::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    /// Rebuild from ids listed oldest first, keeping the newest `capacity`.
    pub fn from_ids(capacity: usize, ids: impl IntoIterator<Item = DeliveryId>) -> Self {
        let mut recent = Self::new(capacity);
        for id in ids {
            recent.insert(id);
        }
        recent
    }

    /// Remember `id`, evicting the oldest entry when at capacity.
    pub fn insert(&mut self, id: DeliveryId) {
        if self.capacity == 0 || self.set.contains(&id) {
            return;
        }
        if self.order.len() >= self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.set.remove(&evicted);
            }
        }
        self.set.insert(id);
        self.order.push_back(id);
    }

    pub fn contains(&self, id: &DeliveryId) -> bool {
        self.set.contains(id)
    }

    /// Ids in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DeliveryId> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(byte: u8) -> DeliveryId {
        DeliveryId::new([byte; 32])
    }

    #[test]
    fn oldest_id_is_evicted_at_capacity() {
        let mut recent = RecentDeliveries::new(2);
        recent.insert(id(1));
        recent.insert(id(2));
        recent.insert(id(3));
        assert!(!recent.contains(&id(1)));
        assert!(recent.contains(&id(2)));
        assert!(recent.contains(&id(3)));
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn reinserting_does_not_refresh_or_grow() {
        let mut recent = RecentDeliveries::new(2);
        recent.insert(id(1));
        recent.insert(id(2));
        recent.insert(id(1));
        assert_eq!(recent.iter().copied().collect::<Vec<_>>(), vec![id(1), id(2)]);
    }

    #[test]
    fn zero_capacity_remembers_nothing() {
        let mut recent = RecentDeliveries::new(0);
        recent.insert(id(1));
        assert!(recent.is_empty());
    }

    #[test]
    fn rebuild_keeps_the_newest_ids() {
        let recent = RecentDeliveries::from_ids(2, [id(1), id(2), id(3)]);
        assert_eq!(recent.iter().copied().collect::<Vec<_>>(), vec![id(2), id(3)]);
        assert_eq!(recent.capacity(), 2);
    }
}

use hashbrown::HashSet;

use crate::payload::PlotIdentifier;

/// Identifiers with a fetch outstanding from one widget instance.
#[derive(Debug, Clone, Default)]
pub struct PendingSet {
    ids: HashSet<PlotIdentifier>,
}

impl PendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &PlotIdentifier) -> bool {
        self.ids.contains(id)
    }

    /// Returns false if `id` was already pending.
    pub fn insert(&mut self, id: PlotIdentifier) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: &PlotIdentifier) -> bool {
        self.ids.remove(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_already_pending_ids() {
        let mut p = PendingSet::new();
        let id = PlotIdentifier::from("/api/sources/ZTF1/plot");

        assert!(p.insert(id.clone()));
        assert!(!p.insert(id.clone()));
        assert_eq!(p.len(), 1);
        assert!(p.contains(&id));
    }

    #[test]
    fn remove_only_clears_the_given_id() {
        let mut p = PendingSet::new();
        let a = PlotIdentifier::from("a");
        let b = PlotIdentifier::from("b");
        p.insert(a.clone());
        p.insert(b.clone());

        assert!(p.remove(&a));
        assert!(!p.remove(&a));
        assert!(!p.contains(&a));
        assert!(p.contains(&b));
        assert_eq!(p.len(), 1);

        p.remove(&b);
        assert!(p.is_empty());
    }
}

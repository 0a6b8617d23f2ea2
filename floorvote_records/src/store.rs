//! In-memory keyed record collections for one pipeline run.
//!
//! Every collection keeps insertion order, so any pass over the store visits
//! records in the order they were ingested. Order-sensitive stages (identity
//! resolution, roll selection) rely on this.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::types::{Bill, BillId, Debate, Legislator, Roll};

/// A record that can be stored in a [`Collection`].
pub trait Keyed {
    type Key: Hash + Eq + Clone;

    fn key(&self) -> Self::Key;
}

impl Keyed for Legislator {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Keyed for Bill {
    type Key = BillId;

    fn key(&self) -> BillId {
        self.id.clone()
    }
}

impl Keyed for Roll {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Keyed for Debate {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Insertion-ordered map from a record's key to the record.
#[derive(Debug, Clone)]
pub struct Collection<T: Keyed> {
    items: Vec<T>,
    positions: HashMap<T::Key, usize>,
}

impl<T: Keyed> Default for Collection<T> {
    fn default() -> Self {
        Collection {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<T: Keyed> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record. A record with an existing key replaces the old one
    /// in place and the old record is returned.
    pub fn insert(&mut self, item: T) -> Option<T> {
        let key = item.key();
        match self.positions.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.items[pos], item)),
            None => {
                self.positions.insert(key, self.items.len());
                self.items.push(item);
                None
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.get(key).map(|&pos| &self.items[pos])
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut T>
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.positions.get(key) {
            Some(&pos) => Some(&mut self.items[pos]),
            None => None,
        }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.contains_key(key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Open-ended string annotations keyed by entity id.
///
/// Holds the rare per-entity facts that have no typed field (e.g. interest
/// group ratings). Keys within an entity are kept sorted.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    entries: HashMap<String, BTreeMap<String, String>>,
}

impl Annotations {
    pub fn set(&mut self, entity_id: &str, key: &str, value: impl Into<String>) {
        self.entries
            .entry(entity_id.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    pub fn get(&self, entity_id: &str, key: &str) -> Option<&str> {
        self.entries
            .get(entity_id)
            .and_then(|m| m.get(key))
            .map(String::as_str)
    }

    pub fn for_entity(&self, entity_id: &str) -> Option<&BTreeMap<String, String>> {
        self.entries.get(entity_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All records of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    legislators: Collection<Legislator>,
    bills: Collection<Bill>,
    rolls: Collection<Roll>,
    debates: Collection<Debate>,
    /// cross-source id -> legislator id
    cross_ids: HashMap<String, String>,
    annotations: Annotations,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a legislator, indexing its cross-source id when it has one.
    pub fn insert_legislator(&mut self, legislator: Legislator) {
        let old_cross = self
            .legislators
            .get(legislator.id.as_str())
            .and_then(|old| old.cross_id.clone());
        if let Some(old_cross) = old_cross {
            if self.cross_ids.get(&old_cross) == Some(&legislator.id) {
                self.cross_ids.remove(&old_cross);
            }
        }
        if let Some(cross_id) = &legislator.cross_id {
            self.cross_ids.insert(cross_id.clone(), legislator.id.clone());
        }
        self.legislators.insert(legislator);
    }

    pub fn insert_bill(&mut self, bill: Bill) -> Option<Bill> {
        self.bills.insert(bill)
    }

    pub fn insert_roll(&mut self, roll: Roll) -> Option<Roll> {
        self.rolls.insert(roll)
    }

    pub fn insert_debate(&mut self, debate: Debate) -> Option<Debate> {
        self.debates.insert(debate)
    }

    /// Attaches a cross-source id to a legislator. Any id the legislator held
    /// before is released from the cross-source index.
    ///
    /// Returns false when the legislator is unknown.
    pub fn attach_cross_id(&mut self, legislator_id: &str, cross_id: &str) -> bool {
        let Some(legislator) = self.legislators.get_mut(legislator_id) else {
            return false;
        };
        if let Some(previous) = legislator.cross_id.replace(cross_id.to_string()) {
            if previous != cross_id {
                self.cross_ids.remove(&previous);
            }
        }
        self.cross_ids
            .insert(cross_id.to_string(), legislator_id.to_string());
        true
    }

    pub fn has_cross_id(&self, cross_id: &str) -> bool {
        self.cross_ids.contains_key(cross_id)
    }

    pub fn legislator_by_cross_id(&self, cross_id: &str) -> Option<&Legislator> {
        self.cross_ids
            .get(cross_id)
            .and_then(|id| self.legislators.get(id.as_str()))
    }

    pub fn legislator_by_cross_id_mut(&mut self, cross_id: &str) -> Option<&mut Legislator> {
        let id = self.cross_ids.get(cross_id)?;
        self.legislators.get_mut(id.as_str())
    }

    /// Number of legislators holding a cross-source id.
    pub fn cross_id_count(&self) -> usize {
        self.cross_ids.len()
    }

    pub fn legislators(&self) -> &Collection<Legislator> {
        &self.legislators
    }

    pub fn bills(&self) -> &Collection<Bill> {
        &self.bills
    }

    pub fn bills_mut(&mut self) -> &mut Collection<Bill> {
        &mut self.bills
    }

    pub fn rolls(&self) -> &Collection<Roll> {
        &self.rolls
    }

    pub fn debates(&self) -> &Collection<Debate> {
        &self.debates
    }

    pub fn debates_mut(&mut self) -> &mut Collection<Debate> {
        &mut self.debates
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chamber, Party, PersonName};

    fn legislator(id: &str, last: &str) -> Legislator {
        Legislator::new(
            id,
            PersonName {
                last: last.to_string(),
                first: "Pat".to_string(),
                middle: None,
            },
            Chamber::Senator,
            Party::Democrat,
            "OH",
            None,
        )
    }

    #[test]
    fn test_collection_keeps_insertion_order() {
        let mut store = RecordStore::new();
        store.insert_legislator(legislator("3", "C"));
        store.insert_legislator(legislator("1", "A"));
        store.insert_legislator(legislator("2", "B"));
        let ids: Vec<&str> = store.legislators().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut coll = Collection::new();
        coll.insert(legislator("1", "A"));
        coll.insert(legislator("2", "B"));
        let old = coll.insert(legislator("1", "Z"));
        assert_eq!(old.map(|l| l.last_name), Some("A".to_string()));
        assert_eq!(coll.len(), 2);
        assert_eq!(coll.iter().next().map(|l| l.last_name.as_str()), Some("Z"));
    }

    #[test]
    fn test_attach_cross_id() {
        let mut store = RecordStore::new();
        store.insert_legislator(legislator("1", "A"));
        assert!(store.attach_cross_id("1", "29301"));
        assert!(store.has_cross_id("29301"));
        assert_eq!(store.legislator_by_cross_id("29301").map(|l| l.id.as_str()), Some("1"));

        assert!(store.attach_cross_id("1", "29302"));
        assert!(!store.has_cross_id("29301"));
        assert_eq!(store.cross_id_count(), 1);

        assert!(!store.attach_cross_id("missing", "1"));
    }

    #[test]
    fn test_insert_indexes_existing_cross_id() {
        let mut store = RecordStore::new();
        let mut leg = legislator("1", "A");
        leg.cross_id = Some("14000".to_string());
        store.insert_legislator(leg);
        assert!(store.has_cross_id("14000"));
    }

    #[test]
    fn test_annotations() {
        let mut ann = Annotations::default();
        ann.set("1", "freshman", "1");
        assert_eq!(ann.get("1", "freshman"), Some("1"));
        assert_eq!(ann.get("1", "other"), None);
        assert_eq!(ann.get("2", "freshman"), None);
        assert_eq!(ann.len(), 1);
    }
}

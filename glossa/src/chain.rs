//! Union of independently loaded dictionaries.
use std::collections::BTreeSet;
use std::sync::Arc;

use hashbrown::HashSet;
use indexmap::IndexMap;

use crate::dictionary::{Dictionary, Fingerprint};
use crate::errors::{GlossaError, Result};
use crate::gloss::Gloss;

/// Outcome of [`ChainDict::register()`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// The dictionary was added as a new member.
    Added(Fingerprint),

    /// The dictionary replaced the member with the same language and name.
    Replaced {
        /// Fingerprint of the removed member.
        old: Fingerprint,
        /// Fingerprint of the new member.
        new: Fingerprint,
    },

    /// An identical dictionary was already a member.
    Unchanged(Fingerprint),
}

/// Read-through union of dictionaries keyed by their fingerprints.
///
/// Members are shared, so cloning a union is cheap; the `with_*` methods
/// return an updated snapshot and leave `self` untouched, which lets readers
/// keep using the old union while a new one is published.
#[derive(Clone, Default)]
pub struct ChainDict {
    maps: IndexMap<Fingerprint, Arc<Dictionary>>,
}

impl ChainDict {
    /// Creates an empty union.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a union of the given dictionaries.
    pub fn from_dicts<I>(dicts: I) -> Self
    where
        I: IntoIterator<Item = Dictionary>,
    {
        let mut chain = Self::new();
        for dict in dicts {
            chain.add(dict);
        }
        chain
    }

    /// Gets the fingerprints of the members in member order.
    pub fn ids(&self) -> impl Iterator<Item = Fingerprint> + '_ {
        self.maps.keys().copied()
    }

    /// Gets the members in member order.
    pub fn dicts(&self) -> impl Iterator<Item = &Dictionary> {
        self.maps.values().map(AsRef::as_ref)
    }

    /// Gets the number of members.
    pub fn num_dicts(&self) -> usize {
        self.maps.len()
    }

    /// Gets the total number of keys over the members, counting shared keys
    /// once per member.
    pub fn len(&self) -> usize {
        self.dicts().map(Dictionary::len).sum()
    }

    /// Checks if no member has a key.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if any member has `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.dicts().any(|d| d.contains(key))
    }

    /// Gets the glosses of `key` from every member that has it, in member order.
    ///
    /// # Errors
    ///
    /// [`GlossaError::NotFound`] is returned when no member has `key`.
    pub fn lookup(&self, key: &str) -> Result<Vec<Gloss>> {
        let mut result = vec![];
        for dict in self.dicts() {
            if let Ok(glosses) = dict.lookup(key) {
                result.extend_from_slice(glosses);
            }
        }
        if result.is_empty() {
            Err(GlossaError::not_found(key))
        } else {
            Ok(result)
        }
    }

    /// Gets the keys of any member that are prefixes of `key`.
    ///
    /// Prefixes of one string sort by length, so the set goes from the
    /// shortest to the longest.
    pub fn iter_prefixes<'k>(&self, key: &'k str) -> BTreeSet<&'k str> {
        self.dicts().flat_map(|d| d.iter_prefixes(key)).collect()
    }

    /// Iterates over every key once, with the glosses of all members.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Vec<Gloss>)> + '_ {
        let mut seen = HashSet::new();
        self.dicts()
            .flat_map(|d| d.iter().map(|(k, _)| k))
            .filter(move |k| seen.insert(*k))
            .map(move |k| {
                let glosses = self
                    .dicts()
                    .filter_map(|d| d.lookup(k).ok())
                    .flat_map(|g| g.iter().cloned())
                    .collect();
                (k, glosses)
            })
    }

    /// Gets the member with the given fingerprint.
    pub fn get(&self, id: &Fingerprint) -> Option<&Dictionary> {
        self.maps.get(id).map(AsRef::as_ref)
    }

    /// Adds a member. A member with the same fingerprint is overwritten in place.
    pub fn add(&mut self, dict: Dictionary) {
        self.add_shared(Arc::new(dict));
    }

    /// Adds a shared member.
    pub fn add_shared(&mut self, dict: Arc<Dictionary>) {
        log::debug!("Loaded dictionary {dict:?}");
        self.maps.insert(dict.fingerprint(), dict);
    }

    /// Removes the member with the given fingerprint.
    pub fn remove(&mut self, id: &Fingerprint) -> Option<Arc<Dictionary>> {
        let removed = self.maps.shift_remove(id);
        if let Some(dict) = removed.as_ref() {
            log::debug!("Removed dictionary {dict:?}");
        }
        removed
    }

    /// Puts `dict` at the position of the member with fingerprint `id`.
    ///
    /// When `id` is not a member, `dict` is appended.
    pub fn replace(&mut self, id: &Fingerprint, dict: Dictionary) {
        let dict = Arc::new(dict);
        let Some(index) = self.maps.get_index_of(id) else {
            self.add_shared(dict);
            return;
        };
        log::debug!("Replaced dictionary {id} with {dict:?}");
        self.maps.shift_remove_index(index);
        let new_id = dict.fingerprint();
        let mut index = index;
        if let Some(dup) = self.maps.get_index_of(&new_id) {
            // An earlier duplicate shifts the slot one position left.
            self.maps.shift_remove_index(dup);
            if dup < index {
                index -= 1;
            }
        }
        self.maps.shift_insert(index, new_id, dict);
    }

    /// Adds `dict` unless an identical one is a member, replacing an older
    /// version with the same language and name.
    pub fn register(&mut self, dict: Dictionary) -> Registration {
        let new = dict.fingerprint();
        let same = self
            .dicts()
            .find(|d| (d.lang(), d.name()) == (dict.lang(), dict.name()))
            .map(|d| (d.fingerprint(), d.ver() == dict.ver()));
        match same {
            Some((old, true)) if old == new => Registration::Unchanged(old),
            Some((old, _)) => {
                self.replace(&old, dict);
                Registration::Replaced { old, new }
            }
            None => {
                self.add(dict);
                Registration::Added(new)
            }
        }
    }

    /// Returns a snapshot with `dict` added.
    pub fn with_added(&self, dict: Dictionary) -> Self {
        let mut chain = self.clone();
        chain.add(dict);
        chain
    }

    /// Returns a snapshot without the member `id`.
    pub fn with_removed(&self, id: &Fingerprint) -> Self {
        let mut chain = self.clone();
        chain.remove(id);
        chain
    }

    /// Returns a snapshot where `dict` takes the place of the member `id`.
    pub fn with_replaced(&self, id: &Fingerprint, dict: Dictionary) -> Self {
        let mut chain = self.clone();
        chain.replace(id, dict);
        chain
    }
}

impl std::fmt::Debug for ChainDict {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_list().entries(self.dicts()).finish()
    }
}

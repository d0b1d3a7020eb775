use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::dictionary::map::WordMap;
use crate::dictionary::{Dictionary, DictionaryInner, Fingerprint};
use crate::errors::Result;
use crate::gloss::Gloss;
use crate::utils;

/// Builder of [`Dictionary`].
///
/// Entries are appended in insertion order; every inserted pair is fed to a
/// running SHA-256 digest that becomes the fingerprint on [`build()`](Self::build).
pub struct DictionaryBuilder {
    lang: String,
    name: String,
    ver: String,
    map: BTreeMap<String, Vec<Gloss>>,
    hasher: Sha256,
}

impl Default for DictionaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            lang: String::new(),
            name: String::new(),
            ver: String::new(),
            map: BTreeMap::new(),
            hasher: Sha256::new(),
        }
    }

    /// Sets the language code.
    pub fn set_lang<S: Into<String>>(&mut self, lang: S) {
        self.lang = lang.into();
    }

    /// Sets the dictionary name.
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Sets the version string.
    pub fn set_ver<S: Into<String>>(&mut self, ver: S) {
        self.ver = ver.into();
    }

    /// Gets the number of keys inserted so far.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Checks if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Appends `gloss` to the candidates of `key`.
    ///
    /// Duplicates are kept. An empty key is skipped.
    pub fn insert<K>(&mut self, key: K, gloss: Gloss)
    where
        K: Into<String>,
    {
        let key = key.into();
        if key.is_empty() {
            log::warn!("Skipped an empty key for {gloss}");
            return;
        }
        feed_str(&mut self.hasher, &key);
        feed_gloss(&mut self.hasher, &gloss);
        self.map.entry(key).or_default().push(gloss);
    }

    /// Inserts `gloss` under `key` and, when it differs, under the detoned key.
    pub fn insert_detoned<K>(&mut self, key: K, gloss: Gloss)
    where
        K: Into<String>,
    {
        let key = key.into();
        let detoned = utils::detone(&key);
        if detoned != key {
            self.insert(detoned, gloss.clone());
        }
        self.insert(key, gloss);
    }

    /// Freezes the fingerprint and builds the dictionary.
    ///
    /// # Errors
    ///
    /// [`GlossaError`](crate::errors::GlossaError) is returned when the trie cannot be built.
    pub fn build(self) -> Result<Dictionary> {
        let fingerprint = Fingerprint::new(self.hasher.finalize().into());
        let map = WordMap::new(self.map)?;
        log::debug!(
            "Built dictionary {} {} {} with {} keys",
            self.lang,
            self.name,
            self.ver,
            map.len()
        );
        Ok(Dictionary(DictionaryInner {
            lang: self.lang,
            name: self.name,
            ver: self.ver,
            fingerprint,
            map,
        }))
    }
}

fn feed_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn feed_gloss(hasher: &mut Sha256, gloss: &Gloss) {
    feed_str(hasher, &gloss.form);
    hasher.update((gloss.ps.len() as u64).to_le_bytes());
    for ps in &gloss.ps {
        feed_str(hasher, ps);
    }
    feed_str(hasher, &gloss.gloss);
    hasher.update((gloss.morphemes.len() as u64).to_le_bytes());
    for m in &gloss.morphemes {
        feed_gloss(hasher, m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kan(gloss: &str) -> Gloss {
        Gloss::new("kan", ["n"], gloss, [])
    }

    #[test]
    fn test_fingerprint_by_content() {
        let mut a = DictionaryBuilder::new();
        a.insert("kan", kan("neck"));
        let mut b = DictionaryBuilder::new();
        b.set_name("other name");
        b.insert("kan", kan("neck"));
        let mut c = DictionaryBuilder::new();
        c.insert("kan", kan("voice"));

        let (a, b, c) = (a.build().unwrap(), b.build().unwrap(), c.build().unwrap());
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_fingerprint_order() {
        let mut a = DictionaryBuilder::new();
        a.insert("kan", kan("neck"));
        a.insert("kan", kan("voice"));
        let mut b = DictionaryBuilder::new();
        b.insert("kan", kan("voice"));
        b.insert("kan", kan("neck"));
        assert_ne!(a.build().unwrap().fingerprint(), b.build().unwrap().fingerprint());
    }

    #[test]
    fn test_insert_detoned() {
        let mut b = DictionaryBuilder::new();
        b.insert_detoned("ka\u{0300}n", Gloss::new("kàn", ["n"], "neck", []));
        b.insert_detoned("kɛ", Gloss::new("kɛ", ["v"], "do", []));
        let dict = b.build().unwrap();
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.lookup("kan").unwrap()[0].gloss, "neck");
        assert_eq!(dict.lookup("ka\u{0300}n").unwrap()[0].gloss, "neck");
    }

    #[test]
    fn test_skip_empty_key() {
        let mut b = DictionaryBuilder::new();
        b.insert("", kan("neck"));
        assert!(b.is_empty());
        assert!(b.build().unwrap().is_empty());
    }

    #[test]
    fn test_duplicates_kept() {
        let mut b = DictionaryBuilder::new();
        b.insert("kan", kan("neck"));
        b.insert("kan", kan("neck"));
        assert_eq!(b.build().unwrap().lookup("kan").unwrap().len(), 2);
    }
}

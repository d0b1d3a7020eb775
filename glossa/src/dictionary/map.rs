//! Index from normalized forms to their glosses.
use std::collections::BTreeMap;

use bincode::{
    de::Decoder,
    enc::Encoder,
    error::{DecodeError, EncodeError},
    Decode, Encode,
};
use crawdad::Trie;

use crate::errors::{GlossaError, Result};
use crate::gloss::Gloss;
use crate::utils::FromU32;

/// Mapping from normalized forms to their glosses.
///
/// Keys are held in sorted order; the double-array trie maps a key to its
/// position and is absent when there are no keys.
#[derive(Default)]
pub struct WordMap {
    trie: Option<Trie>,
    keys: Vec<String>,
    entries: Vec<Vec<Gloss>>,
}

impl Encode for WordMap {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        let trie = self.trie.as_ref().map(Trie::serialize_to_vec);
        Encode::encode(&trie, encoder)?;
        Encode::encode(&self.keys, encoder)?;
        Encode::encode(&self.entries, encoder)?;
        Ok(())
    }
}

impl Decode for WordMap {
    fn decode<D: Decoder>(decoder: &mut D) -> Result<Self, DecodeError> {
        let trie: Option<Vec<u8>> = Decode::decode(decoder)?;
        let keys: Vec<String> = Decode::decode(decoder)?;
        let entries: Vec<Vec<Gloss>> = Decode::decode(decoder)?;
        if keys.len() != entries.len() {
            return Err(DecodeError::Other("keys and entries differ in length"));
        }
        Ok(Self {
            trie: trie.map(|data| Trie::deserialize_from_slice(&data).0),
            keys,
            entries,
        })
    }
}

bincode::impl_borrow_decode!(WordMap);

impl WordMap {
    pub fn new(map: BTreeMap<String, Vec<Gloss>>) -> Result<Self> {
        if map.is_empty() {
            return Ok(Self::default());
        }
        let mut keys = Vec::with_capacity(map.len());
        let mut entries = Vec::with_capacity(map.len());
        for (key, glosses) in map {
            keys.push(key);
            entries.push(glosses);
        }
        let mut records = Vec::with_capacity(keys.len());
        for (i, key) in keys.iter().enumerate() {
            records.push((key.as_str(), u32::try_from(i)?));
        }
        let trie = Trie::from_records(records)
            .map_err(|e| GlossaError::invalid_argument("map", e.to_string()))?;
        Ok(Self {
            trie: Some(trie),
            keys,
            entries,
        })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline(always)]
    pub fn get(&self, key: &str) -> Option<&[Gloss]> {
        let id = self.trie.as_ref()?.exact_match(key.chars())?;
        Some(self.entries[usize::from_u32(id)].as_slice())
    }

    /// Returns the keys that are prefixes of `input`, shortest first.
    pub fn common_prefixes<'k>(&self, input: &'k str) -> Vec<&'k str> {
        let Some(trie) = self.trie.as_ref() else {
            return vec![];
        };
        // Byte offset after each character.
        let ends: Vec<usize> = input
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .collect();
        trie.common_prefix_search(input.chars())
            .filter(|&(_, end_char)| end_char != 0)
            .map(|(_, end_char)| &input[..ends[end_char - 1]])
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Gloss])> {
        self.keys
            .iter()
            .zip(&self.entries)
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

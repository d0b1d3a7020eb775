//! Lexicon of glossed word forms.
pub(crate) mod builder;
pub(crate) mod map;
pub(crate) mod toolbox;

use std::fmt;
use std::io::{Read, Write};

use bincode::{Decode, Encode};

use crate::common::{self, DICTIONARY_MAGIC};
use crate::errors::{GlossaError, Result};
use crate::gloss::Gloss;
use map::WordMap;

pub use builder::DictionaryBuilder;

/// Content-derived identity of a [`Dictionary`].
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Decode, Encode)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub(crate) const fn new(digest: [u8; 32]) -> Self {
        Self(digest)
    }

    /// Gets the raw digest.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

/// Inner data of [`Dictionary`].
#[derive(Decode, Encode)]
struct DictionaryInner {
    lang: String,
    name: String,
    ver: String,
    fingerprint: Fingerprint,
    map: WordMap,
}

/// Immutable lexicon mapping normalized forms to candidate glosses.
///
/// A dictionary is created by [`DictionaryBuilder`] or read from a binary
/// file, and never changes afterwards.
pub struct Dictionary(DictionaryInner);

impl Dictionary {
    /// Gets the language code.
    pub fn lang(&self) -> &str {
        &self.0.lang
    }

    /// Gets the dictionary name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Gets the version string.
    pub fn ver(&self) -> &str {
        &self.0.ver
    }

    /// Gets the content fingerprint.
    #[inline(always)]
    pub const fn fingerprint(&self) -> Fingerprint {
        self.0.fingerprint
    }

    /// Checks if the language, name and version are all set.
    pub fn attributed(&self) -> bool {
        !self.0.lang.is_empty() && !self.0.name.is_empty() && !self.0.ver.is_empty()
    }

    /// Gets the number of keys.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.map.len()
    }

    /// Checks if the dictionary has no keys.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if `form` is a key.
    #[inline(always)]
    pub fn contains(&self, form: &str) -> bool {
        self.0.map.get(form).is_some()
    }

    /// Gets the glosses of `form`.
    ///
    /// # Errors
    ///
    /// [`GlossaError::NotFound`] is returned when `form` is not a key.
    pub fn lookup(&self, form: &str) -> Result<&[Gloss]> {
        self.0
            .map
            .get(form)
            .ok_or_else(|| GlossaError::not_found(form))
    }

    /// Gets the keys that are prefixes of `form`, including `form` itself,
    /// from the shortest to the longest.
    #[inline(always)]
    pub fn iter_prefixes<'k>(&self, form: &'k str) -> Vec<&'k str> {
        self.0.map.common_prefixes(form)
    }

    /// Iterates over the keys and their glosses in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Gloss])> {
        self.0.map.iter()
    }

    /// Exports the dictionary data.
    ///
    /// # Errors
    ///
    /// When bincode generates an error, it will be returned as is.
    pub fn write<W>(&self, mut wtr: W) -> Result<usize>
    where
        W: Write,
    {
        wtr.write_all(DICTIONARY_MAGIC)?;
        let num_bytes =
            bincode::encode_into_std_write(&self.0, &mut wtr, common::bincode_config())?;
        Ok(DICTIONARY_MAGIC.len() + num_bytes)
    }

    /// Creates a dictionary from a reader.
    ///
    /// # Errors
    ///
    /// When bincode generates an error, it will be returned as is.
    /// An error is also returned when the magic number mismatches.
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut magic = [0; DICTIONARY_MAGIC.len()];
        rdr.read_exact(&mut magic)?;
        if magic != DICTIONARY_MAGIC {
            return Err(GlossaError::invalid_argument(
                "rdr",
                "The magic number of the input dictionary mismatches.",
            ));
        }
        let data = bincode::decode_from_std_read(&mut rdr, common::bincode_config())?;
        Ok(Self(data))
    }
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.0.lang, self.0.name, self.0.ver, self.0.fingerprint
        )
    }
}

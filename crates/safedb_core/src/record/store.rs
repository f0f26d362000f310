//! Encrypted per-record field storage.

use crate::crypto::{FieldCipher, BLOCK_SIZE};
use crate::error::{CoreError, CoreResult};
use safedb_codec::{text, FieldKind, FieldType};
use std::collections::BTreeMap;
use zeroize::Zeroizing;

#[derive(Clone)]
struct StoredValue {
    ciphertext: Vec<u8>,
    len: usize,
}

/// Mapping of field type to encrypted value.
///
/// Values are kept encrypted under the record's key and decrypted only for
/// the duration of a [`get`](FieldStore::get). Fixed-width values are
/// padded to a full cipher block before encryption; text is held as
/// UTF-16LE.
#[derive(Clone)]
pub struct FieldStore {
    cipher: FieldCipher,
    fields: BTreeMap<FieldType, StoredValue>,
}

impl FieldStore {
    /// Creates an empty store with a fresh record key.
    pub fn new() -> CoreResult<Self> {
        Ok(Self {
            cipher: FieldCipher::for_new_record()?,
            fields: BTreeMap::new(),
        })
    }

    /// Stores `value` for `field`. An empty value removes the field.
    ///
    /// # Errors
    ///
    /// Fails without modifying the store if a fixed-width field is given the
    /// wrong number of bytes, or a text field an odd number of bytes.
    pub fn set(&mut self, field: FieldType, value: &[u8]) -> CoreResult<()> {
        if value.is_empty() {
            self.fields.remove(&field);
            return Ok(());
        }

        let kind = field.kind();
        if let Some(width) = kind.fixed_width() {
            if value.len() != width {
                return Err(CoreError::InvalidFieldWidth {
                    field,
                    expected: width,
                    actual: value.len(),
                });
            }
        }
        if kind == FieldKind::Text && value.len() % 2 != 0 {
            return Err(CoreError::invalid_value(field, "odd-length UTF-16 text"));
        }

        let ciphertext = if kind.fixed_width().is_some() {
            let mut block = Zeroizing::new([0u8; BLOCK_SIZE]);
            block[..value.len()].copy_from_slice(value);
            self.cipher.encrypt(&block[..], &[field.as_byte()])?
        } else {
            self.cipher.encrypt(value, &[field.as_byte()])?
        };

        self.fields.insert(
            field,
            StoredValue {
                ciphertext,
                len: value.len(),
            },
        );
        Ok(())
    }

    /// Returns the decrypted value of `field`, or `None` if it is not set.
    pub fn get(&self, field: FieldType) -> CoreResult<Option<Zeroizing<Vec<u8>>>> {
        let Some(stored) = self.fields.get(&field) else {
            return Ok(None);
        };
        let mut plain = self.cipher.decrypt(&stored.ciphertext, &[field.as_byte()])?;
        if plain.len() < stored.len {
            return Err(CoreError::decryption_failed(format!(
                "field {field} shorter than recorded length"
            )));
        }
        plain.truncate(stored.len);
        Ok(Some(plain))
    }

    /// Stores text for `field` as UTF-16LE. Empty text removes the field.
    pub fn set_text(&mut self, field: FieldType, value: &str) -> CoreResult<()> {
        let wide = Zeroizing::new(text::to_utf16le(value));
        self.set(field, &wide)
    }

    /// Returns the text value of `field`.
    pub fn get_text(&self, field: FieldType) -> CoreResult<Option<String>> {
        match self.get(field)? {
            Some(bytes) => Ok(Some(text::from_utf16le(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Removes `field`.
    pub fn clear(&mut self, field: FieldType) {
        self.fields.remove(&field);
    }

    /// Returns true if `field` holds a value.
    #[must_use]
    pub fn is_set(&self, field: FieldType) -> bool {
        self.fields.contains_key(&field)
    }

    /// Plaintext length of `field` in bytes, zero if unset.
    #[must_use]
    pub fn value_len(&self, field: FieldType) -> usize {
        self.fields.get(&field).map_or(0, |v| v.len)
    }

    /// Set fields in type-byte order.
    pub fn fields(&self) -> impl Iterator<Item = FieldType> + '_ {
        self.fields.keys().copied()
    }

    /// Number of set fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for FieldStore {
    fn eq(&self, other: &Self) -> bool {
        if !self.fields.keys().eq(other.fields.keys()) {
            return false;
        }
        self.fields.keys().all(|&ft| match (self.get(ft), other.get(ft)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        })
    }
}

impl std::fmt::Debug for FieldStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldStore")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear() {
        let mut store = FieldStore::new().unwrap();
        store.set_text(FieldType::Title, "Bank").unwrap();
        assert!(store.is_set(FieldType::Title));
        assert_eq!(store.get_text(FieldType::Title).unwrap().as_deref(), Some("Bank"));
        assert_eq!(store.value_len(FieldType::Title), 8);

        store.clear(FieldType::Title);
        assert!(!store.is_set(FieldType::Title));
        assert_eq!(store.get(FieldType::Title).unwrap(), None);
    }

    #[test]
    fn empty_value_removes() {
        let mut store = FieldStore::new().unwrap();
        store.set_text(FieldType::User, "alice").unwrap();
        store.set(FieldType::User, &[]).unwrap();
        assert!(!store.is_set(FieldType::User));
        assert!(store.is_empty());
    }

    #[test]
    fn fixed_width_padded_and_restored() {
        let mut store = FieldStore::new().unwrap();
        store.set(FieldType::Dca, &3i16.to_le_bytes()).unwrap();
        let value = store.get(FieldType::Dca).unwrap().unwrap();
        assert_eq!(value.as_slice(), &3i16.to_le_bytes());
    }

    #[test]
    fn wrong_width_leaves_state_untouched() {
        let mut store = FieldStore::new().unwrap();
        store.set(FieldType::XTimeInterval, &30i32.to_le_bytes()).unwrap();
        let err = store.set(FieldType::XTimeInterval, &[1, 2]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidFieldWidth { expected: 4, actual: 2, .. }
        ));
        let value = store.get(FieldType::XTimeInterval).unwrap().unwrap();
        assert_eq!(value.as_slice(), &30i32.to_le_bytes());
    }

    #[test]
    fn odd_text_rejected() {
        let mut store = FieldStore::new().unwrap();
        assert!(store.set(FieldType::Notes, &[0x61]).is_err());
        assert!(!store.is_set(FieldType::Notes));
    }

    #[test]
    fn equality_compares_plaintext() {
        let mut a = FieldStore::new().unwrap();
        let mut b = FieldStore::new().unwrap();
        a.set_text(FieldType::Password, "pw").unwrap();
        b.set_text(FieldType::Password, "pw").unwrap();
        assert_eq!(a, b);
        b.set_text(FieldType::Password, "other").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn debug_hides_values() {
        let mut store = FieldStore::new().unwrap();
        store.set_text(FieldType::Password, "topsecret").unwrap();
        assert!(!format!("{store:?}").contains("topsecret"));
    }
}

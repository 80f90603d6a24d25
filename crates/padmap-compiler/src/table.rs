//! Fixed-capacity fingerprint table.
//!
//! Open addressing with linear probing. Slot `0` doubles as the empty
//! marker, so a fingerprint of zero cannot be stored. The slot an entry
//! lands in also picks its bucket (`slot % bucket_count`) and its
//! identification row (`slot / bucket_count`).

use indexmap::IndexMap;
use padmap_errors::{CompileError, CompileResult};
use padmap_format::EMPTY_SLOT;

/// Who registered a fingerprint: the catalogue entry and a description.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Registration {
    owner: usize,
    description: String,
}

/// Fingerprint slots plus the entry each fingerprint was registered by.
#[derive(Debug, Clone)]
pub struct FingerprintTable {
    slots: Vec<u32>,
    registered: IndexMap<u32, Registration>,
}

impl FingerprintTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![EMPTY_SLOT; capacity],
            registered: IndexMap::new(),
        }
    }

    /// Place `fingerprint`, returning its slot.
    ///
    /// `owner` is the catalogue position of the title registering it. The
    /// same owner registering a fingerprint again gets the slot it already
    /// occupies.
    ///
    /// # Errors
    ///
    /// - [`CompileError::ReservedFingerprint`] when `fingerprint` is the empty marker
    /// - [`CompileError::DuplicateFingerprint`] when another owner registered it
    /// - [`CompileError::TableFull`] when no slot is free
    pub fn insert(
        &mut self,
        fingerprint: u32,
        owner: usize,
        description: &str,
        title: &str,
    ) -> CompileResult<usize> {
        if fingerprint == EMPTY_SLOT {
            return Err(CompileError::ReservedFingerprint {
                description: description.to_string(),
            });
        }
        if let Some(existing) = self.registered.get(&fingerprint)
            && existing.owner != owner
        {
            return Err(CompileError::DuplicateFingerprint {
                fingerprint,
                description: description.to_string(),
                existing: existing.description.clone(),
            });
        }

        let capacity = self.slots.len();
        for slot in self.probe(fingerprint) {
            let Some(value) = self.slots.get_mut(slot) else {
                break;
            };
            if *value == EMPTY_SLOT {
                *value = fingerprint;
                self.registered.insert(
                    fingerprint,
                    Registration {
                        owner,
                        description: description.to_string(),
                    },
                );
                return Ok(slot);
            }
            if *value == fingerprint {
                return Ok(slot);
            }
        }
        Err(CompileError::TableFull {
            title: title.to_string(),
            capacity,
        })
    }

    /// Slot holding `fingerprint`, probing from its home slot.
    pub fn lookup(&self, fingerprint: u32) -> Option<usize> {
        if fingerprint == EMPTY_SLOT {
            return None;
        }
        for slot in self.probe(fingerprint) {
            match self.slots.get(slot).copied() {
                Some(value) if value == fingerprint => return Some(slot),
                Some(EMPTY_SLOT) | None => return None,
                Some(_) => {}
            }
        }
        None
    }

    /// Description the fingerprint was registered with.
    pub fn description(&self, fingerprint: u32) -> Option<&str> {
        self.registered
            .get(&fingerprint)
            .map(|registration| registration.description.as_str())
    }

    pub fn slots(&self) -> &[u32] {
        &self.slots
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Distinct fingerprints stored.
    pub fn occupied(&self) -> usize {
        self.registered.len()
    }

    /// Home slot first, then every other slot once, wrapping.
    fn probe(&self, fingerprint: u32) -> impl Iterator<Item = usize> + use<> {
        let capacity = self.slots.len();
        let home = if capacity == 0 {
            0
        } else {
            fingerprint as usize % capacity
        };
        (0..capacity).map(move |step| (home + step) % capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn home_slot_is_fingerprint_mod_capacity() -> TestResult {
        let mut table = FingerprintTable::new(10);
        assert_eq!(table.insert(23, 0, "a", "A")?, 3);
        assert_eq!(table.lookup(23), Some(3));
        assert_eq!(table.slots()[3], 23);
        Ok(())
    }

    #[test]
    fn collisions_probe_linearly_and_wrap() -> TestResult {
        let mut table = FingerprintTable::new(4);
        assert_eq!(table.insert(3, 0, "a", "A")?, 3);
        assert_eq!(table.insert(7, 1, "b", "B")?, 0);
        assert_eq!(table.insert(11, 2, "c", "C")?, 1);
        assert_eq!(table.lookup(11), Some(1));
        assert_eq!(table.lookup(15), None);
        assert_eq!(table.occupied(), 3);
        Ok(())
    }

    #[test]
    fn same_owner_reuses_slot() -> TestResult {
        let mut table = FingerprintTable::new(8);
        let first = table.insert(42, 3, "file X of Doom", "Doom")?;
        let again = table.insert(42, 3, "file X of Doom", "Doom")?;
        assert_eq!(first, again);
        assert_eq!(table.occupied(), 1);
        assert_eq!(table.slots().iter().filter(|&&v| v == 42).count(), 1);
        Ok(())
    }

    #[test]
    fn another_owner_with_the_same_description_is_a_duplicate() -> TestResult {
        let mut table = FingerprintTable::new(8);
        table.insert(42, 0, "file X of Doom", "Doom")?;
        let err = table.insert(42, 1, "file X of Doom", "Doom").err();
        assert_eq!(err.map(|e| e.code()), Some(6));
        assert_eq!(table.occupied(), 1);
        Ok(())
    }

    #[test]
    fn different_owner_is_a_duplicate() -> TestResult {
        let mut table = FingerprintTable::new(8);
        table.insert(42, 0, "file X of Doom", "Doom")?;
        let err = table.insert(42, 1, "file Y of Heretic", "Heretic").err();
        assert_eq!(
            err,
            Some(CompileError::DuplicateFingerprint {
                fingerprint: 42,
                description: "file Y of Heretic".into(),
                existing: "file X of Doom".into(),
            })
        );
        Ok(())
    }

    #[test]
    fn zero_is_reserved() {
        let mut table = FingerprintTable::new(8);
        let err = table.insert(0, 0, "empty", "E").err();
        assert_eq!(err.map(|e| e.code()), Some(9));
        assert_eq!(table.lookup(0), None);
    }

    #[test]
    fn full_table_is_reported() -> TestResult {
        let mut table = FingerprintTable::new(2);
        table.insert(1, 0, "a", "A")?;
        table.insert(2, 1, "b", "B")?;
        let err = table.insert(3, 2, "c", "C").err();
        assert_eq!(
            err,
            Some(CompileError::TableFull {
                title: "C".into(),
                capacity: 2
            })
        );
        assert_eq!(table.description(1), Some("a"));
        assert_eq!(table.description(3), None);
        Ok(())
    }
}

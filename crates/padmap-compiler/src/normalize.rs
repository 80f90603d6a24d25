//! Binding normalization and analog half-axis merging.
//!
//! Every catalogue binding becomes one [`MappingRecord`]. The two halves of
//! an analog axis (`lstick_left` + `lstick_right`) share a record: keys are
//! stored as interleaved `(negative, positive)` pairs and the labels are
//! joined by [`HALF_SEPARATOR`], collapsed to `"Move Left\x01Right"` when
//! both halves start with the same verb.

use padmap_errors::{CompileError, CompileResult, SymbolKind};
use padmap_format::{
    ButtonId, HALF_SEPARATOR, HALF_SEPARATOR_DISPLAY, MAX_KEYS_PER_BINDING, NO_ACTION_LABEL,
};
use padmap_registry::{AxisHalf, InputTarget, KeyCode, NO_KEY, input_target, key_code};

use crate::catalogue::BindingEntry;

/// Canonical form of one pad target binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingRecord {
    button: ButtonId,
    keys: Vec<KeyCode>,
    label: Option<String>,
}

impl MappingRecord {
    /// Build a record, or `None` when the key count does not fit the button byte.
    pub fn new(code: u8, keys: Vec<KeyCode>, label: Option<String>) -> Option<Self> {
        let per_half = if padmap_registry::is_analog_code(code) {
            keys.len() / 2
        } else {
            keys.len()
        };
        let button = ButtonId::new(code, per_half, label.is_some())?;
        Some(Self {
            button,
            keys,
            label,
        })
    }

    pub fn button(&self) -> ButtonId {
        self.button
    }

    pub fn code(&self) -> u8 {
        self.button.code
    }

    pub fn keys(&self) -> &[KeyCode] {
        &self.keys
    }

    /// Raw label; merged analog labels still contain [`HALF_SEPARATOR`].
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Label as interned into the action pool.
    pub fn display_label(&self) -> Option<String> {
        self.label.as_deref().map(|label| {
            let mut buf = [0u8; 4];
            label.replacen(HALF_SEPARATOR, HALF_SEPARATOR_DISPLAY.encode_utf8(&mut buf), 1)
        })
    }

    /// Append the pre-interning encoding: button byte, label and `\0` if
    /// labelled, then the key bytes. Mapping sets are compared on this form.
    pub fn write_raw(&self, out: &mut Vec<u8>) {
        out.push(self.button.encode());
        if let Some(label) = &self.label {
            out.extend_from_slice(label.as_bytes());
            out.push(0);
        }
        out.extend_from_slice(&self.keys);
    }
}

/// The ordered records of one title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MappingSet {
    records: Vec<MappingRecord>,
}

impl MappingSet {
    pub fn records(&self) -> &[MappingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Structural identity used for deduplication.
    pub fn key(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for record in &self.records {
            record.write_raw(&mut out);
        }
        out
    }
}

/// Accumulates the bindings of one title into a [`MappingSet`].
#[derive(Debug)]
pub struct MappingSetBuilder {
    title: String,
    records: Vec<MappingRecord>,
}

impl MappingSetBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            records: Vec::new(),
        }
    }

    /// Resolve and add one binding.
    ///
    /// # Errors
    ///
    /// - [`CompileError::UnknownSymbol`] for an unknown target or key name
    /// - [`CompileError::InvalidKeyCount`] for zero or more than three keys
    /// - [`CompileError::DuplicateBinding`] when a button or axis half is
    ///   already bound
    /// - [`CompileError::EmbeddedNul`] when the action label holds a NUL byte
    pub fn push(&mut self, binding: &BindingEntry) -> CompileResult<()> {
        let target = input_target(&binding.input).ok_or_else(|| CompileError::UnknownSymbol {
            kind: SymbolKind::Input,
            name: binding.input.clone(),
            title: self.title.clone(),
            binding: binding.to_string(),
        })?;

        let names = binding.keys.names();
        if names.is_empty() || names.len() > MAX_KEYS_PER_BINDING {
            return Err(CompileError::InvalidKeyCount {
                count: names.len(),
                title: self.title.clone(),
                binding: binding.to_string(),
            });
        }
        let keys = names
            .iter()
            .map(|name| {
                key_code(name).ok_or_else(|| CompileError::UnknownSymbol {
                    kind: SymbolKind::Key,
                    name: (*name).to_string(),
                    title: self.title.clone(),
                    binding: binding.to_string(),
                })
            })
            .collect::<CompileResult<Vec<_>>>()?;

        let label = binding
            .action
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());
        if let Some(text) = label {
            CompileError::check_nul(&self.title, text)?;
        }

        match target {
            InputTarget::Wheel => {
                let record = self.record(binding, target.code(), keys, label.map(str::to_string))?;
                self.records.push(record);
            }
            InputTarget::Button(code) => {
                if self.position(code).is_some() {
                    return Err(self.duplicate(binding));
                }
                let record = self.record(binding, code, keys, label.map(str::to_string))?;
                self.records.push(record);
            }
            InputTarget::AxisHalf { axis, half } => match self.position(axis) {
                None => {
                    let record = self.first_half(binding, axis, half, &keys, label)?;
                    self.records.push(record);
                }
                Some(index) => {
                    let record = self.second_half(binding, index, half, &keys, label)?;
                    if let Some(slot) = self.records.get_mut(index) {
                        *slot = record;
                    }
                }
            },
        }
        Ok(())
    }

    pub fn finish(self) -> MappingSet {
        MappingSet {
            records: self.records,
        }
    }

    fn position(&self, code: u8) -> Option<usize> {
        self.records.iter().position(|r| r.code() == code)
    }

    fn first_half(
        &self,
        binding: &BindingEntry,
        axis: u8,
        half: AxisHalf,
        keys: &[KeyCode],
        label: Option<&str>,
    ) -> CompileResult<MappingRecord> {
        let keys = keys
            .iter()
            .flat_map(|&key| match half {
                AxisHalf::Negative => [key, NO_KEY],
                AxisHalf::Positive => [NO_KEY, key],
            })
            .collect();
        let label = label.map(|text| match half {
            AxisHalf::Negative => format!("{text}{HALF_SEPARATOR}{NO_ACTION_LABEL}"),
            AxisHalf::Positive => format!("{NO_ACTION_LABEL}{HALF_SEPARATOR}{text}"),
        });
        self.record(binding, axis, keys, label)
    }

    fn second_half(
        &self,
        binding: &BindingEntry,
        index: usize,
        half: AxisHalf,
        keys: &[KeyCode],
        label: Option<&str>,
    ) -> CompileResult<MappingRecord> {
        let Some(existing) = self.records.get(index) else {
            return Err(self.duplicate(binding));
        };
        if existing.keys().get(half.index()).copied().unwrap_or(NO_KEY) != NO_KEY {
            return Err(self.duplicate(binding));
        }

        let kept: Vec<KeyCode> = existing
            .keys()
            .iter()
            .skip(half.other().index())
            .step_by(2)
            .copied()
            .collect();
        let width = kept.len().max(keys.len());
        let mut merged = Vec::with_capacity(width * 2);
        for i in 0..width {
            let new = keys.get(i).copied().unwrap_or(NO_KEY);
            let old = kept.get(i).copied().unwrap_or(NO_KEY);
            match half {
                AxisHalf::Negative => merged.extend([new, old]),
                AxisHalf::Positive => merged.extend([old, new]),
            }
        }

        let (old0, old1) = existing
            .label()
            .map(|l| l.split_once(HALF_SEPARATOR).unwrap_or((l, "")))
            .unwrap_or(("", ""));
        let text = label.unwrap_or("");
        let (text0, text1) = match half {
            AxisHalf::Negative => (text, old1),
            AxisHalf::Positive => (old0, text),
        };

        let code = existing.code();
        self.record(binding, code, merged, merge_labels(text0, text1))
    }

    fn record(
        &self,
        binding: &BindingEntry,
        code: u8,
        keys: Vec<KeyCode>,
        label: Option<String>,
    ) -> CompileResult<MappingRecord> {
        let count = keys.len();
        MappingRecord::new(code, keys, label).ok_or_else(|| CompileError::InvalidKeyCount {
            count,
            title: self.title.clone(),
            binding: binding.to_string(),
        })
    }

    fn duplicate(&self, binding: &BindingEntry) -> CompileError {
        CompileError::DuplicateBinding {
            title: self.title.clone(),
            binding: binding.to_string(),
        }
    }
}

/// Combine the labels of both axis halves.
pub fn merge_labels(text0: &str, text1: &str) -> Option<String> {
    match (split_verb(text0), split_verb(text1)) {
        (Some((verb0, rest0)), Some((verb1, rest1))) if verb0 == verb1 => {
            Some(format!("{verb0} {rest0}{HALF_SEPARATOR}{rest1}"))
        }
        _ if text0.is_empty() && text1.is_empty() => None,
        _ => Some(format!(
            "{}{HALF_SEPARATOR}{}",
            or_nothing(text0),
            or_nothing(text1)
        )),
    }
}

/// Split `"<verb> <rest>"`, where the verb has no whitespace and the rest is
/// non-empty.
fn split_verb(text: &str) -> Option<(&str, &str)> {
    let (verb, rest) = text.split_once(' ')?;
    if verb.is_empty() || verb.contains(char::is_whitespace) || rest.is_empty() {
        return None;
    }
    Some((verb, rest))
}

fn or_nothing(text: &str) -> &str {
    if text.is_empty() { NO_ACTION_LABEL } else { text }
}

/// Normalize all bindings of a title.
///
/// # Errors
///
/// Propagates the first error from [`MappingSetBuilder::push`].
pub fn normalize_bindings(title: &str, bindings: &[BindingEntry]) -> CompileResult<MappingSet> {
    let mut builder = MappingSetBuilder::new(title);
    for binding in bindings {
        builder.push(binding)?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn bind(input: &str, keys: &str, action: Option<&str>) -> BindingEntry {
        BindingEntry::new(input, keys, action)
    }

    fn single(bindings: &[BindingEntry]) -> Result<MappingRecord, Box<dyn std::error::Error>> {
        let set = normalize_bindings("Test", bindings)?;
        assert_eq!(set.len(), 1);
        set.records()
            .first()
            .cloned()
            .ok_or_else(|| "empty set".into())
    }

    #[test]
    fn digital_binding() -> TestResult {
        let record = single(&[bind("a", "z", None)])?;
        assert_eq!(record.code(), 8);
        assert_eq!(record.keys(), &[30]);
        assert_eq!(record.label(), None);
        assert_eq!(record.button().encode(), 0x08);
        Ok(())
    }

    #[test]
    fn labelled_multi_key_binding() -> TestResult {
        let record = single(&[bind("start", "leftctrl+x+enter", Some("  Fire  "))])?;
        assert_eq!(record.keys(), &[56, 31, 52]);
        assert_eq!(record.label(), Some("Fire"));
        assert_eq!(record.button().encode(), (2 << 6) | 0x20 | 3);
        Ok(())
    }

    #[test]
    fn blank_action_means_no_label() -> TestResult {
        let record = single(&[bind("b", "x", Some("   "))])?;
        assert_eq!(record.label(), None);
        assert!(!record.button().has_action);
        Ok(())
    }

    #[test]
    fn first_half_pads_the_other_direction() -> TestResult {
        let left = single(&[bind("lstick_left", "left", Some("Steer"))])?;
        assert_eq!(left.keys(), &[83, 0]);
        assert_eq!(left.label(), Some("Steer\u{1}Nothing"));

        let down = single(&[bind("rstick_down", "s+down", None)])?;
        assert_eq!(down.code(), 19);
        assert_eq!(down.keys(), &[0, 22, 0, 85]);
        assert_eq!(down.button().key_count, 2);
        assert_eq!(down.label(), None);
        Ok(())
    }

    #[test]
    fn halves_interleave_and_pad() -> TestResult {
        let record = single(&[
            bind("lstick_left", "a", None),
            bind("lstick_right", "b+c", None),
        ])?;
        assert_eq!(record.keys(), &[21, 34, 0, 32]);
        assert_eq!(record.button().key_count, 2);

        let reversed = single(&[
            bind("lstick_right", "b+c", None),
            bind("lstick_left", "a", None),
        ])?;
        assert_eq!(reversed.keys(), &[21, 34, 0, 32]);
        Ok(())
    }

    #[test]
    fn shared_verb_collapses() -> TestResult {
        let record = single(&[
            bind("lstick_left", "left", Some("Move Left")),
            bind("lstick_right", "right", Some("Move Right")),
        ])?;
        assert_eq!(record.label(), Some("Move Left\u{1}Right"));
        assert_eq!(record.display_label().as_deref(), Some("Move Left/Right"));
        Ok(())
    }

    #[test]
    fn differing_verbs_keep_both_labels() -> TestResult {
        let record = single(&[
            bind("lstick_up", "up", Some("Accelerate")),
            bind("lstick_down", "down", Some("Brake")),
        ])?;
        assert_eq!(record.display_label().as_deref(), Some("Accelerate/Brake"));

        let one_sided = single(&[
            bind("lstick_up", "up", None),
            bind("lstick_down", "down", Some("Crouch")),
        ])?;
        assert_eq!(one_sided.display_label().as_deref(), Some("Nothing/Crouch"));

        let unlabelled = single(&[bind("lstick_up", "up", None), bind("lstick_down", "down", None)])?;
        assert_eq!(unlabelled.label(), None);
        Ok(())
    }

    #[test]
    fn wheel_bindings_append() -> TestResult {
        let set = normalize_bindings(
            "Test",
            &[
                bind("wheel", "1", Some("Weapon 1")),
                bind("a", "z", None),
                bind("wheel", "2", Some("Weapon 2")),
            ],
        )?;
        let codes: Vec<u8> = set.records().iter().map(MappingRecord::code).collect();
        assert_eq!(codes, vec![20, 8, 20]);
        Ok(())
    }

    #[test]
    fn duplicate_button_is_rejected() {
        let err = normalize_bindings("Test", &[bind("a", "z", None), bind("a", "x", None)]).err();
        assert_eq!(err.map(|e| e.code()), Some(3));
    }

    #[test]
    fn duplicate_axis_half_is_rejected() {
        let err = normalize_bindings(
            "Test",
            &[
                bind("lstick_left", "left", None),
                bind("lstick_right", "right", None),
                bind("lstick_left", "a", None),
            ],
        )
        .err();
        assert_eq!(err.map(|e| e.code()), Some(3));
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = normalize_bindings("Test", &[bind("turbo", "z", None)]).err();
        assert!(matches!(
            err,
            Some(CompileError::UnknownSymbol {
                kind: SymbolKind::Input,
                ..
            })
        ));

        let err = normalize_bindings("Test", &[bind("a", "z+hyper", None)]).err();
        assert!(matches!(
            err,
            Some(CompileError::UnknownSymbol { kind: SymbolKind::Key, ref name, .. }) if name == "hyper"
        ));
    }

    #[test]
    fn empty_key_segment_is_an_unknown_key() {
        for keys in ["z++x", "z+", "+z"] {
            let err = normalize_bindings("Test", &[bind("a", keys, None)]).err();
            assert!(
                matches!(
                    err,
                    Some(CompileError::UnknownSymbol { kind: SymbolKind::Key, ref name, .. }) if name.is_empty()
                ),
                "{keys:?}"
            );
        }
    }

    #[test]
    fn nul_in_label_is_rejected() {
        let err = normalize_bindings("Test", &[bind("a", "z", Some("Fi\0re"))]).err();
        assert!(matches!(
            err,
            Some(CompileError::EmbeddedNul { ref title, ref text }) if title == "Test" && text == "Fi\0re"
        ));
    }

    #[test]
    fn key_count_is_bounded() {
        for keys in ["", "a+b+c+d"] {
            let err = normalize_bindings("Test", &[bind("a", keys, None)]).err();
            assert_eq!(err.map(|e| e.code()), Some(2), "{keys:?}");
        }
    }

    #[test]
    fn raw_key_distinguishes_labels() -> TestResult {
        let plain = normalize_bindings("Test", &[bind("a", "z", None)])?;
        let labelled = normalize_bindings("Test", &[bind("a", "z", Some("Fire"))])?;
        assert_eq!(plain.key(), vec![0x08, 30]);
        let expected: Vec<u8> = [&[0x28u8][..], &b"Fire\0"[..], &[30u8][..]].concat();
        assert_eq!(labelled.key(), expected);
        Ok(())
    }

    #[test]
    fn verb_split_rules() {
        assert_eq!(split_verb("Move Left"), Some(("Move", "Left")));
        assert_eq!(split_verb("Move  Left"), Some(("Move", " Left")));
        assert_eq!(split_verb("Nothing"), None);
        assert_eq!(split_verb(" Left"), None);
        assert_eq!(split_verb("Move "), None);
        assert_eq!(split_verb("A\tB C"), None);
    }
}

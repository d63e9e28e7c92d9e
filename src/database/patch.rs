use serde::{Deserialize, Deserializer};

/// Per-field presence marker for partial updates.
///
/// Distinguishes "field not in the payload" (leave the stored value alone) from
/// "field explicitly supplied" (write it, even if it is an empty string). With
/// `#[serde(default)]` an absent key deserializes to `Absent`, while any present
/// value, empty or not, deserializes to `Set`.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Absent,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Patch::Set)
    }
}

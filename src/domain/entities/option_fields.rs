use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidateLength;

/// Tri-state field for PATCH bodies.
///
/// - key absent → `Unchanged` (requires `#[serde(default)]` on the field)
/// - `null` → `SetToNull`
/// - value → `SetToValue`
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub enum OptionField<T> {
    #[default]
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => OptionField::SetToValue(value),
            None => OptionField::SetToNull,
        })
    }
}

impl<T> ValidateLength<u64> for OptionField<T>
where
    T: ValidateLength<u64>
{
    fn length(&self) -> Option<u64> {
        match self {
            OptionField::SetToValue(value) => value.length(),
            _ => None,
        }
    }

    fn validate_length(&self, min: Option<u64>, max: Option<u64>, equal: Option<u64>) -> bool {
        match self {
            OptionField::SetToValue(value) => value.validate_length(min, max, equal),
            _ => true,
        }
    }
}

impl<T> OptionField<T> {
    pub fn map_value<U, F: FnOnce(T) -> U>(self, f: F) -> OptionField<U> {
        match self {
            Self::Unchanged => OptionField::Unchanged,
            Self::SetToNull => OptionField::SetToNull,
            Self::SetToValue(v) => OptionField::SetToValue(f(v)),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

impl OptionField<String> {
    /// Treats a blank string like an explicit `null`.
    pub fn blank_as_null(self) -> Self {
        match self {
            OptionField::SetToValue(s) if s.trim().is_empty() => OptionField::SetToNull,
            OptionField::SetToValue(s) => OptionField::SetToValue(s.trim().to_string()),
            other => other,
        }
    }
}

pub type PatchString = OptionField<String>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default)]
        bio: OptionField<String>,
    }

    #[test]
    fn missing_null_and_value_are_distinguished() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert!(absent.bio.is_unchanged());

        let null: Patch = serde_json::from_str(r#"{"bio": null}"#).unwrap();
        assert_eq!(null.bio, OptionField::SetToNull);

        let value: Patch = serde_json::from_str(r#"{"bio": "hello"}"#).unwrap();
        assert_eq!(value.bio, OptionField::SetToValue("hello".to_string()));
    }

    #[test]
    fn blank_strings_clear_the_field() {
        assert_eq!(OptionField::SetToValue("  ".to_string()).blank_as_null(), OptionField::SetToNull);
        assert_eq!(
            OptionField::SetToValue(" x ".to_string()).blank_as_null(),
            OptionField::SetToValue("x".to_string())
        );
    }

    #[test]
    fn length_validation_only_applies_to_values() {
        let unchanged: OptionField<String> = OptionField::Unchanged;
        assert!(unchanged.validate_length(Some(3), None, None));
        assert!(!OptionField::SetToValue("ab".to_string()).validate_length(Some(3), None, None));
    }
}

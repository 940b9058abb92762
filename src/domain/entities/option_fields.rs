use serde::{Deserialize, Serialize};
use validator::ValidateLength;

/// Represents optional field semantics in partial update requests.
///
/// - `Unchanged` → field absent from the request, keep the stored value
/// - `SetToValue` → replace with the provided value (an empty string included)
///
/// There is no "clear" state: an empty value is the only way to blank a field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum OptionField<T> {
    #[default]
    Unchanged,
    SetToValue(T),
}

// ---------------------- Validation support ----------------------

impl<T> ValidateLength<u64> for OptionField<T>
where
    T: ValidateLength<u64>
{
    fn length(&self) -> Option<u64> {
        match self {
            OptionField::SetToValue(value) => value.length(),
            OptionField::Unchanged => None,
        }
    }
    fn validate_length(&self, min: Option<u64>, max: Option<u64>, equal: Option<u64>) -> bool {
        match self {
            OptionField::SetToValue(value) => value.validate_length(min, max, equal),
            OptionField::Unchanged => true,
        }
    }
}

// ---------------------- Core helpers & conversions ----------------------

impl<T> OptionField<T> {
    /// A present value becomes `SetToValue`, an absent one `Unchanged`.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => OptionField::SetToValue(v),
            None => OptionField::Unchanged,
        }
    }

    /// Transform inner value if `SetToValue`
    pub fn map_value<U, F: FnOnce(T) -> U>(self, f: F) -> OptionField<U> {
        match self {
            Self::Unchanged => OptionField::Unchanged,
            Self::SetToValue(v) => OptionField::SetToValue(f(v)),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Borrowed flatten into `Option<&T>` (what SQLx expects)
    pub fn flatten_ref(&self) -> Option<&T> {
        match self {
            OptionField::SetToValue(v) => Some(v),
            OptionField::Unchanged => None
        }
    }
}

// ---------------------- Type-specific convenience ----------------------

impl OptionField<String> {
    pub fn flatten_str(&self) -> Option<&str> {
        self.flatten_ref().map(|s| s.as_str())
    }
}

impl<T> OptionField<Vec<T>> {
    pub fn flatten_slice(&self) -> Option<&[T]> {
        self.flatten_ref().map(|v| v.as_slice())
    }
}

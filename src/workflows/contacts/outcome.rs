use serde::Serialize;

/// Why a field kept its original value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    Empty,
    ParseFailure,
    LookupMiss,
    WeakMatch,
}

impl FallbackReason {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::ParseFailure => "parse failure",
            Self::LookupMiss => "lookup miss",
            Self::WeakMatch => "weak match",
        }
    }
}

/// Result of a single field transform: the new value, or the untouched input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome<T> {
    Transformed(T),
    Fallback {
        original: String,
        reason: FallbackReason,
    },
}

impl<T> FieldOutcome<T> {
    pub fn fallback(original: &str, reason: FallbackReason) -> Self {
        Self::Fallback {
            original: original.to_string(),
            reason,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn reason(&self) -> Option<FallbackReason> {
        match self {
            Self::Transformed(_) => None,
            Self::Fallback { reason, .. } => Some(*reason),
        }
    }
}

impl FieldOutcome<String> {
    pub fn into_value(self) -> String {
        match self {
            Self::Transformed(value) => value,
            Self::Fallback { original, .. } => original,
        }
    }
}

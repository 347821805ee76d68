//! Action kinds carried by cart controls.

use core::fmt;

use serde::{Deserialize, Serialize};

/// What a control asks the cart service to do.
///
/// Controls carry their action as free text (`data-action`). Known values map
/// to named variants; anything else is kept verbatim in `Other` and forwarded
/// unchanged, since the update path does not validate it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    Add,
    Increment,
    Decrement,
    Remove,
    Other(String),
}

impl ActionKind {
    /// Map control text to an action kind.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "add" => Self::Add,
            "increment" => Self::Increment,
            "decrement" => Self::Decrement,
            "remove" => Self::Remove,
            other => Self::Other(other.to_owned()),
        }
    }

    /// The wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Add => "add",
            Self::Increment => "increment",
            Self::Decrement => "decrement",
            Self::Remove => "remove",
            Self::Other(value) => value,
        }
    }

    /// Whether the control carried no usable action text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ActionKind {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        kind.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values_map_to_variants() {
        assert_eq!(ActionKind::parse("increment"), ActionKind::Increment);
        assert_eq!(ActionKind::parse("decrement"), ActionKind::Decrement);
        assert_eq!(ActionKind::parse("remove"), ActionKind::Remove);
        assert_eq!(ActionKind::parse("add"), ActionKind::Add);
    }

    #[test]
    fn test_unknown_values_are_kept_verbatim() {
        let kind = ActionKind::parse("Increment");
        assert_eq!(kind, ActionKind::Other("Increment".to_owned()));
        assert_eq!(kind.as_str(), "Increment");
    }

    #[test]
    fn test_empty_action() {
        assert!(ActionKind::parse("").is_empty());
        assert!(!ActionKind::Remove.is_empty());
    }
}

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }
    };
}

opaque_id!(
    /// Backend-assigned semester identifier.
    SemesterId
);

opaque_id!(
    /// Backend-assigned transaction identifier.
    TransactionId
);

/// Backends are free to send identifiers as strings or integers; both are kept as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(text) => text,
            RawId::Integer(value) => value.to_string(),
        }
    }
}

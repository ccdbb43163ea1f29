//! Opaque provider identifiers.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Error returned when an identifier is empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must not be empty")]
pub struct EmptyId;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Arc<str>);

        impl $name {
            /// Wrap a provider-issued identifier. Only emptiness is rejected.
            pub fn new(id: impl AsRef<str>) -> Result<Self, EmptyId> {
                let id = id.as_ref();
                if id.is_empty() {
                    return Err(EmptyId);
                }
                Ok(Self(Arc::from(id)))
            }

            /// Returns the identifier as issued by the provider.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = EmptyId;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

opaque_id!(
    /// A bus stop pole or railway station, e.g. `odpt.BusstopPole:Tokyu.Shibuya.1`.
    ///
    /// Compared for equality only; the contents are never interpreted.
    ///
    /// # Examples
    ///
    /// ```
    /// use reach_server::domain::StopRef;
    ///
    /// let a = StopRef::new("odpt.Station:JR-East.Yamanote.Shibuya").unwrap();
    /// let b = StopRef::new("odpt.Station:JR-East.Yamanote.Shibuya").unwrap();
    /// assert_eq!(a, b);
    ///
    /// assert!(StopRef::new("").is_err());
    /// ```
    StopRef
);

opaque_id!(
    /// A bus route pattern or a railway line.
    RouteRef
);

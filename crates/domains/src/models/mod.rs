//! # Domain Models
//!
//! These structs represent the core entities of RightPool.
//! Identifiers are random UUID v4 values assigned on creation.

/// Declares a closed set of labels that travel as exact strings on the wire
/// and in the store (e.g. `"Full Time"`).
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::errors::DomainError::validation(format!(
                        "`{}` is not a valid {}; expected one of: {}",
                        other,
                        $label,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }
    };
}

pub mod account;
pub mod application;
pub mod identity;
pub mod opportunity;
pub mod query;
pub mod stats;

pub use account::*;
pub use application::*;
pub use identity::*;
pub use opportunity::*;
pub use query::*;
pub use stats::*;

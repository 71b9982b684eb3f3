//! Forward-compatible constant types.
//!
//! Azure adds new values to existing enumerations without bumping the API
//! version, so every constant type accepts unknown values: parsing is
//! case-insensitive against the known set and otherwise keeps the input
//! verbatim in an `Other` variant.
//!
//! ```rust
//! azure_mgmt_core::string_enum! {
//!     /// Access tier of a storage account.
//!     pub enum AccessTier {
//!         Cool => "Cool",
//!         Hot => "Hot",
//!     }
//! }
//!
//! assert_eq!("hot".parse::<AccessTier>().unwrap(), AccessTier::Hot);
//! assert_eq!(
//!     "Archive".parse::<AccessTier>().unwrap(),
//!     AccessTier::Other("Archive".into())
//! );
//! ```

/// Declare a string-backed constant type.
///
/// Generates the enum with an extra `Other(String)` variant, `as_str`,
/// `possible_values`, infallible `FromStr`, `Display`, and serde support as a
/// JSON string.
#[macro_export]
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $value:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// A value not known when this client was generated.
            Other(String),
        }

        impl $name {
            /// The wire value.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $value,)+
                    Self::Other(value) => value.as_str(),
                }
            }

            /// Every known wire value.
            pub fn possible_values() -> &'static [&'static str] {
                &[$($value),+]
            }

            /// Whether this is one of the known values.
            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::std::convert::Infallible;

            fn from_str(input: &str) -> ::std::result::Result<Self, Self::Err> {
                $(
                    if input.eq_ignore_ascii_case($value) {
                        return Ok(Self::$variant);
                    }
                )+
                Ok(Self::Other(input.to_string()))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let value = <::std::string::String as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                Ok(match value.parse::<$name>() {
                    Ok(parsed) => parsed,
                    Err(never) => match never {},
                })
            }
        }
    };
}

/// Declare an integer-backed constant type.
///
/// Same shape as [`string_enum!`] over `i64`: unknown values are kept in
/// `Other(i64)`.
#[macro_export]
macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $value:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// A value not known when this client was generated.
            Other(i64),
        }

        impl $name {
            /// The wire value.
            pub fn value(&self) -> i64 {
                match self {
                    $(Self::$variant => $value,)+
                    Self::Other(value) => *value,
                }
            }

            /// Every known wire value.
            pub fn possible_values() -> &'static [i64] {
                &[$($value),+]
            }
        }

        impl ::std::convert::From<i64> for $name {
            fn from(input: i64) -> Self {
                $(
                    if input == $value {
                        return Self::$variant;
                    }
                )+
                Self::Other(input)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.value())
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                serializer.serialize_i64(self.value())
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let value = <i64 as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from(value))
            }
        }
    };
}

crate::string_enum! {
    /// The type of identity that created or last modified a resource.
    pub enum CreatedByType {
        Application => "Application",
        Key => "Key",
        ManagedIdentity => "ManagedIdentity",
        User => "User",
    }
}

//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Provider names and similar identifiers travel as camelCase strings
//! (`"apiKey"`, `"userpass"`). This macro keeps the wire spelling for
//! `Display` while parsing case-insensitively.
//!
//! # Example
//!
//! ```rust
//! use stitch_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Flavor {
//!     Plain,
//!     ApiKey,
//! }
//!
//! impl_wire_name_conversions!(Flavor {
//!     Plain => "plain",
//!     ApiKey => "apiKey",
//! });
//!
//! assert_eq!(Flavor::ApiKey.to_string(), "apiKey");
//! assert_eq!("APIKEY".parse::<Flavor>().unwrap(), Flavor::ApiKey);
//! ```

/// Implements Display and FromStr traits for enums with a fixed wire name
///
/// This macro generates:
/// - Display trait: writes the wire name exactly as declared
/// - FromStr trait: matches the wire name ignoring ASCII case
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire name of this variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(if s.eq_ignore_ascii_case($str) {
                    return Ok(Self::$variant);
                })+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}

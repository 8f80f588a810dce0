//! Macros for domain enums and master records
//!
//! Master-data enums are stored and exchanged by their display label (mostly
//! Korean, e.g. `"시공팀"`, some English such as `"active"`). The macro keeps
//! `as_str`, `Display`, `FromStr` and the `ALL` list in one place so the
//! serde renames and the string conversions cannot drift apart.
//!
//! # Example
//!
//! ```rust
//! use smartcon_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Shift {
//!     Day,
//!     Night,
//! }
//!
//! impl_wire_name_conversions!(Shift {
//!     Day => "주간",
//!     Night => "야간",
//! });
//!
//! assert_eq!(Shift::Night.to_string(), "야간");
//! assert_eq!("주간".parse::<Shift>(), Ok(Shift::Day));
//! assert_eq!(Shift::ALL.len(), 2);
//! ```

/// Implements `as_str`, `ALL`, `Display` and `FromStr` for a fieldless enum.
///
/// Parsing trims surrounding whitespace and ignores ASCII case, so `"Active"`
/// and `" active "` both parse; Hangul labels must match exactly.
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$enum_name] = &[$(Self::$variant),+];

            /// Wire name of the variant.
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

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}

/// Implements `MasterRecord` for a struct with `id`, `name`, `created_at`
/// and `updated_at` fields.
#[macro_export]
macro_rules! impl_master_record {
    ($ty:ident, $collection:expr) => {
        impl $crate::types::MasterRecord for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> &str {
                &self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn touch(&mut self, now: i64) {
                self.updated_at = now;
            }

            fn initialize(&mut self, now: i64) {
                if self.id.trim().is_empty() {
                    self.id = $crate::types::new_document_id();
                }
                self.created_at = now;
                self.updated_at = now;
            }
        }
    };
}

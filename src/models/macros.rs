//! Macro for the crate's entity id newtypes.

/// Generates opaque `i64`-backed id newtypes, one per listed name.
///
/// Each id serializes as its bare number, prints as its bare number, and
/// converts to and from `i64`. The inner value is private; cross-type mixups
/// stay compile errors.
///
/// Usage:
///   define_id_type!(MeetingId, RoomId);
#[macro_export]
macro_rules! define_id_type {
    ($($name:ident),+ $(,)?) => {
        $(
            #[derive(
                Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(i64);

            impl $name {
                pub fn new(value: i64) -> Self {
                    Self(value)
                }

                pub fn value(self) -> i64 {
                    self.0
                }
            }

            impl ::std::fmt::Display for $name {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    self.0.fmt(f)
                }
            }

            impl ::std::convert::From<i64> for $name {
                fn from(value: i64) -> Self {
                    Self(value)
                }
            }

            impl ::std::convert::From<$name> for i64 {
                fn from(id: $name) -> Self {
                    id.0
                }
            }
        )+
    };
}

// ---------------------------------------------------------------------------
// Macro: defines a closed enum of wire tags.
//
// Unlike open enums with a catch-all variant, unknown tags are rejected: the
// store's API only ever sends the listed values, and anything else means the
// payload is malformed.
// ---------------------------------------------------------------------------
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, what = $what:expr,
        variants: [
            $( $(#[$vmeta:meta])* ($variant:ident, $str:expr) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Returns the wire tag.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $str, )+
                }
            }

            /// Looks up a variant by its wire tag.
            pub fn from_wire_type(tag: &str) -> Option<Self> {
                match tag {
                    $( $str => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::UnknownTag;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                Self::from_wire_type(s).ok_or_else(|| $crate::error::UnknownTag {
                    what: $what,
                    tag: s.to_owned(),
                })
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> ::std::result::Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

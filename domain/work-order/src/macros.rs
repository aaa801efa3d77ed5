/// Closed set of values with a fixed wire spelling.
///
/// Parsing is lenient about case, spaces, dashes and underscores so that
/// `in-progress`, `IN_PROGRESS` and `In Progress` all resolve to one variant.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant
            ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::model::vo::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = $crate::model::vo::loose_key(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| $crate::model::vo::loose_key(v.as_str()) == wanted)
                    .ok_or_else(|| $crate::model::vo::UnknownVariant {
                        kind: stringify!($name),
                        value: s.trim().to_owned(),
                    })
            }
        }
    };
}

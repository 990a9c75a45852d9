use serde::{Deserialize, Serialize};

macro_rules! id {
    ($($id:ident),*$(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
            #[serde(transparent)]
            #[repr(transparent)]
            pub struct $id(u64);

            impl $id {
                pub const fn get(self) -> u64 {
                    self.0
                }
            }

            impl From<u64> for $id {
                fn from(value: u64) -> Self {
                    Self(value)
                }
            }

            impl From<$id> for u64 {
                fn from(value: $id) -> Self {
                    value.0
                }
            }

            impl ::std::str::FromStr for $id {
                type Err = ::std::num::ParseIntError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    s.trim().parse().map(Self)
                }
            }

            impl ::std::fmt::Display for $id {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    ::std::fmt::Display::fmt(&self.0, f)
                }
            }
        )*
    };
}

id![ArtistId, AlbumId, SongId];

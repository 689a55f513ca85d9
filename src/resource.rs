//! The closed set of Foxhole resources the calculator knows about

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;

/// Ammunition calibres typed as `120mm`, `94.5MM`, ...
static CALIBRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([0-9.]+)\s*mm$").expect("calibre pattern is valid"));

macro_rules! resources {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// A resource identifier. Ordering follows declaration order and is only
        /// used to keep ledgers deterministic; reports sort by [`Resource::name`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Resource {
            $($variant),+
        }

        impl Resource {
            /// Every resource, in declaration order
            pub const ALL: &'static [Resource] = &[$(Resource::$variant),+];

            /// Canonical display name
            pub fn name(self) -> &'static str {
                match self {
                    $(Resource::$variant => $name),+
                }
            }
        }
    };
}

resources! {
    Salvage => "SALVAGE",
    Coal => "COAL",
    Comp => "COMP",
    Dcomp => "DCOMP",
    Sulfur => "SULFUR",
    Emat => "EMAT",
    Hemat => "HEMAT",
    Concrete => "CONCRETE",
    Oil => "OIL",
    Petrol => "PETROL",
    Water => "WATER",
    Coke => "COKE",
    Hoil => "HOIL",
    Eoil => "EOIL",
    Cmat => "CMAT",
    Pcon => "PCON",
    Scon => "SCON",
    Amat1 => "AMAT1",
    Amat2 => "AMAT2",
    Amat3 => "AMAT3",
    Amat4 => "AMAT4",
    Amat5 => "AMAT5",
    Sandbag => "SANDBAG",
    Bwire => "BWIRE",
    Mbeam => "MBEAM",
    Flame => "FLAME",
    A250 => "A250",
    A75 => "A75",
    A945 => "A945",
    A300 => "A300",
    A120 => "A120",
    A150 => "A150",
    HeRocket => "HEROCKET",
    FireRocket => "FIREROCKET",
    Pipe => "PIPE",
    Gsupp => "GSUPP",
}

impl Resource {
    /// Case-insensitive lookup by canonical name
    pub fn from_name(name: &str) -> Option<Resource> {
        let name = name.trim();
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }

    /// Lookup for names typed by a user.
    ///
    /// Accepts the shorthands players actually use: calibres such as `94.5mm`
    /// map to `A945`, and anything mentioning `3C` or `4C` maps to the matching
    /// rocket. Falls back to [`Resource::from_name`].
    pub fn resolve_alias(input: &str) -> Option<Resource> {
        let mut token = input.trim().to_ascii_uppercase();

        if let Some(cap) = CALIBRE_RE.captures(&token) {
            token = format!("A{}", cap[1].replace('.', ""));
        }

        if token == "A94.5" {
            token = "A945".to_string();
        }

        if token.contains("3C") {
            return Some(Resource::HeRocket);
        } else if token.contains("4C") {
            return Some(Resource::FireRocket);
        }

        Resource::from_name(&token)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::from_name(s).ok_or_else(|| ConfigError::UnknownResource(s.to_string()))
    }
}

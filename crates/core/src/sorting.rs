//! Name ordering for rosters and list sort parameters.
//!
//! Paginated lists are sorted by the server (see [`SortOrder`]). The only
//! list sorted on the client is the attendance roster, which is fetched in
//! a single request, so a whole-set client sort is correct there.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Sort direction sent to list endpoints as `orderBy=name:<dir>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Value of the `orderBy` query parameter for a name sort.
    pub fn name_query(self) -> String {
        format!("name:{}", self.as_str())
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Fold a name into a key that orders the way a pt-BR reader expects:
/// case-insensitive, with accented Latin letters sorting next to their
/// base letter.
pub fn collation_key(name: &str) -> String {
    name.trim().chars().flat_map(char::to_lowercase).map(fold_accent).collect()
}

/// Compare two names by [`collation_key`], falling back to the raw text so
/// the ordering is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

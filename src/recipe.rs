//! Recipe records and the aggregate counts derived from them.

use std::fmt;

use serde::de::{Error as _, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A stored recipe. `id` is assigned by the store and never changes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: u64,
    pub name: String,
    pub cooked: bool,
}

/// A recipe as submitted by a client, before the store assigns an id.
///
/// Only a JSON object decodes. Keys match case-insensitively (`"Name"` is
/// `name`), unknown keys are skipped and the last duplicate wins. `cooked`
/// may be omitted or `null`; both mean `false`. An `id` must be an integer
/// or `null` if present, and is then discarded.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NewRecipe {
    pub name: String,
    pub cooked: bool,
}

impl NewRecipe {
    pub fn new(name: impl Into<String>, cooked: bool) -> Self {
        Self { name: name.into(), cooked }
    }
}

impl<'de> Deserialize<'de> for NewRecipe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NewRecipeVisitor)
    }
}

struct NewRecipeVisitor;

impl<'de> Visitor<'de> for NewRecipeVisitor {
    type Value = NewRecipe;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a recipe object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<NewRecipe, A::Error> {
        let mut name: Option<String> = None;
        let mut cooked = false;

        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("name") {
                name = map.next_value()?;
            } else if key.eq_ignore_ascii_case("cooked") {
                cooked = map.next_value::<Option<bool>>()?.unwrap_or(false);
            } else if key.eq_ignore_ascii_case("id") {
                map.next_value::<Option<i64>>()?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        let name = name.ok_or_else(|| A::Error::missing_field("name"))?;
        Ok(NewRecipe { name, cooked })
    }
}

/// Totals over a snapshot of the catalog. Computed per request, never stored.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub cooked: usize,
}

impl Stats {
    pub fn from_recipes(recipes: &[Recipe]) -> Self {
        Self {
            total: recipes.len(),
            cooked: recipes.iter().filter(|r| r.cooked).count(),
        }
    }
}

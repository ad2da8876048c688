//! The recipe store.
//!
//! [`RecipeStore`] is the capability set the HTTP layer needs: append, snapshot,
//! and lookup by id. [`MemoryStore`] keeps everything in one vector behind a
//! reader/writer lock:
//!
//! - `add` takes the write lock, so bumping the counter and appending the
//!   record happen as one step. Ids are never duplicated or skipped.
//! - `list` and `get` take the read lock and run concurrently with each other.
//!   Neither can observe a half-finished `add`.
//!
//! Critical sections are pure memory operations; nothing awaits or performs
//! I/O while holding the lock.

use parking_lot::RwLock;
use tracing::debug;

use crate::recipe::{NewRecipe, Recipe};

/// Storage backend for the recipe API.
///
/// Operations are linearizable: concurrent calls behave as if they ran one at
/// a time in some order.
pub trait RecipeStore: Send + Sync + 'static {
    /// Assigns the next id, appends the recipe and returns the stored record.
    ///
    /// The candidate is stored as-is; validation belongs to the caller.
    fn add(&self, candidate: NewRecipe) -> Recipe;

    /// Returns an owned copy of every recipe, in insertion order.
    fn list(&self) -> Vec<Recipe>;

    /// Looks up a recipe by id. `None` means no such recipe.
    fn get(&self, id: u64) -> Option<Recipe>;
}

#[derive(Debug, Default)]
struct Catalog {
    recipes: Vec<Recipe>,
    next_id: u64,
}

/// In-process [`RecipeStore`]. State lives as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Catalog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored recipes.
    pub fn len(&self) -> usize {
        self.inner.read().recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecipeStore for MemoryStore {
    fn add(&self, candidate: NewRecipe) -> Recipe {
        let recipe = {
            let mut catalog = self.inner.write();
            catalog.next_id += 1;
            let recipe = Recipe {
                id: catalog.next_id,
                name: candidate.name,
                cooked: candidate.cooked,
            };
            catalog.recipes.push(recipe.clone());
            recipe
        };

        debug!(id = recipe.id, name = %recipe.name, "recipe added");
        recipe
    }

    fn list(&self) -> Vec<Recipe> {
        self.inner.read().recipes.clone()
    }

    fn get(&self, id: u64) -> Option<Recipe> {
        self.inner.read().recipes.iter().find(|r| r.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn assigns_ids_from_one() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        let tea = store.add(NewRecipe::new("Tea", false));
        let coffee = store.add(NewRecipe::new("Coffee", true));

        assert_eq!(tea, Recipe { id: 1, name: "Tea".into(), cooked: false });
        assert_eq!(coffee, Recipe { id: 2, name: "Coffee".into(), cooked: true });
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn get_finds_stored_recipe() {
        let store = MemoryStore::new();
        store.add(NewRecipe::new("Salad", false));

        let found = store.get(1).unwrap();
        assert_eq!(found.name, "Salad");
        assert!(store.get(0).is_none());
        assert!(store.get(999).is_none());
    }

    #[test]
    fn list_is_a_detached_snapshot() {
        let store = MemoryStore::new();
        store.add(NewRecipe::new("Soup", true));

        let snapshot = store.list();
        store.add(NewRecipe::new("Bread", false));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            store.add(NewRecipe::new(name, false));
        }

        let names: Vec<_> = store.list().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn concurrent_adds_never_duplicate_ids() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 250;

        let store = Arc::new(MemoryStore::new());
        std::thread::scope(|scope| {
            for t in 0..THREADS {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for i in 0..PER_THREAD {
                        store.add(NewRecipe::new(format!("{t}-{i}"), i % 2 == 0));
                    }
                });
            }
            // Readers racing the writers only ever see fully-formed records.
            for _ in 0..2 {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for _ in 0..200 {
                        let snapshot = store.list();
                        let ids: HashSet<_> = snapshot.iter().map(|r| r.id).collect();
                        assert_eq!(ids.len(), snapshot.len());
                        assert!(snapshot.iter().all(|r| r.id > 0));
                    }
                });
            }
        });

        let total = THREADS * PER_THREAD;
        let ids: Vec<u64> = store.list().iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=total as u64).collect::<Vec<_>>());
    }

    proptest! {
        #[test]
        fn ids_are_dense_and_increasing(names in prop::collection::vec("[a-z]{1,8}", 0..40)) {
            let store = MemoryStore::new();
            let ids: Vec<u64> = names
                .iter()
                .map(|n| store.add(NewRecipe::new(n.clone(), false)).id)
                .collect();

            prop_assert_eq!(ids, (1..=names.len() as u64).collect::<Vec<_>>());
            prop_assert_eq!(store.len(), names.len());
            for id in 1..=names.len() as u64 {
                prop_assert!(store.get(id).is_some());
            }
            prop_assert!(store.get(names.len() as u64 + 1).is_none());
        }

        #[test]
        fn stats_agree_with_snapshot(flags in prop::collection::vec(any::<bool>(), 0..40)) {
            let store = MemoryStore::new();
            for (i, cooked) in flags.iter().enumerate() {
                store.add(NewRecipe::new(format!("r{i}"), *cooked));
            }

            let stats = crate::recipe::Stats::from_recipes(&store.list());
            prop_assert_eq!(stats.total, flags.len());
            prop_assert_eq!(stats.cooked, flags.iter().filter(|c| **c).count());
        }
    }
}

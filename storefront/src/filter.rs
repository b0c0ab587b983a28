//! Catalog filtering.
//!
//! [`filter`] is a pure projection of `(catalog, category, search)` onto the
//! visible products. [`MemoizedFilter`] caches the last result by key for
//! callers that re-render often. [`CatalogViewReducer`] owns the active
//! filter inputs inside the session.

use crate::catalog::Catalog;
use crate::types::{CategoryFilter, Product};
use novamarket_core::{effect::Effect, reducer::Reducer, SmallVec};
use serde::{Deserialize, Serialize};

/// Products admitted by `category` whose name or description contains
/// `search` (case-insensitive). Catalog order is preserved; an empty
/// search matches everything.
#[must_use]
pub fn filter<'a>(products: &'a [Product], category: CategoryFilter, search: &str) -> Vec<&'a Product> {
    let needle = search.to_lowercase();
    products
        .iter()
        .filter(|product| matches(product, category, &needle))
        .collect()
}

/// `needle` must already be lowercase
fn matches(product: &Product, category: CategoryFilter, needle: &str) -> bool {
    category.admits(product.category)
        && (needle.is_empty()
            || product.name.to_lowercase().contains(needle)
            || product.description.to_lowercase().contains(needle))
}

/// [`filter`] with a one-entry cache keyed on `(category, search)`
#[derive(Debug, Default)]
pub struct MemoizedFilter {
    key: Option<(CategoryFilter, String)>,
    indices: Vec<usize>,
    recomputations: usize,
}

impl MemoizedFilter {
    /// An empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible products for the given inputs, recomputed only when the key
    /// differs from the previous call
    pub fn apply<'a>(
        &mut self,
        catalog: &'a Catalog,
        category: CategoryFilter,
        search: &str,
    ) -> Vec<&'a Product> {
        let fresh = self
            .key
            .as_ref()
            .is_some_and(|(cached_category, cached_search)| {
                *cached_category == category && cached_search == search
            });

        if !fresh {
            let needle = search.to_lowercase();
            self.indices = catalog
                .products()
                .iter()
                .enumerate()
                .filter(|(_, product)| matches(product, category, &needle))
                .map(|(index, _)| index)
                .collect();
            self.key = Some((category, search.to_string()));
            self.recomputations += 1;
        }

        let products = catalog.products();
        self.indices.iter().filter_map(|&i| products.get(i)).collect()
    }

    /// How many times the result was actually computed
    #[must_use]
    pub const fn recomputations(&self) -> usize {
        self.recomputations
    }
}

/// Active filter inputs
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogView {
    /// Selected category
    pub category: CategoryFilter,
    /// Current search text, as typed
    pub search: String,
}

/// Changes to the filter inputs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogAction {
    /// Pick a category (or "All")
    SelectCategory(CategoryFilter),
    /// Replace the search text
    SetSearch(String),
}

/// Reducer for [`CatalogView`]
#[derive(Clone, Copy, Debug, Default)]
pub struct CatalogViewReducer;

impl Reducer for CatalogViewReducer {
    type State = CatalogView;
    type Action = CatalogAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CatalogAction::SelectCategory(category) => {
                tracing::debug!(%category, "Category selected");
                state.category = category;
            },
            CatalogAction::SetSearch(search) => {
                tracing::debug!(search = %search, "Search updated");
                state.search = search;
            },
        }
        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use novamarket_testing::{ReducerTest, assertions};
    use proptest::prelude::*;

    fn names<'a>(products: &[&'a Product]) -> Vec<&'a str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn all_with_empty_search_returns_catalog_in_order() {
        let catalog = Catalog::standard();
        let visible = filter(catalog.products(), CategoryFilter::All, "");
        let ids: Vec<_> = visible.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn electronics_returns_the_two_devices() {
        let catalog = Catalog::standard();
        let visible = filter(
            catalog.products(),
            CategoryFilter::Only(Category::Electronics),
            "",
        );
        assert_eq!(
            names(&visible),
            ["Aether Noise-Cancelling Headphones", "Lumina Smart Watch Pro"]
        );
    }

    #[test]
    fn search_matches_description_case_insensitively() {
        let catalog = Catalog::standard();
        let visible = filter(catalog.products(), CategoryFilter::All, "ORGANIC");
        assert_eq!(names(&visible), ["Zenith Organic Essential Kit"]);
    }

    #[test]
    fn category_and_search_combine() {
        let catalog = Catalog::standard();
        let visible = filter(
            catalog.products(),
            CategoryFilter::Only(Category::Home),
            "headphones",
        );
        assert!(visible.is_empty());
    }

    #[test]
    fn memoized_filter_recomputes_only_on_key_change() {
        let catalog = Catalog::standard();
        let mut memo = MemoizedFilter::new();

        let first = memo.apply(&catalog, CategoryFilter::All, "oak");
        assert_eq!(names(&first), ["Nordic Oak Coffee Table"]);
        let again = memo.apply(&catalog, CategoryFilter::All, "oak");
        assert_eq!(names(&again), ["Nordic Oak Coffee Table"]);
        assert_eq!(memo.recomputations(), 1);

        let other = memo.apply(&catalog, CategoryFilter::Only(Category::Beauty), "");
        assert_eq!(names(&other), ["Velvet Cloud Skincare Set"]);
        assert_eq!(memo.recomputations(), 2);
    }

    #[test]
    fn select_category_updates_view() {
        ReducerTest::new(CatalogViewReducer)
            .with_env(())
            .given_state(CatalogView::default())
            .when_action(CatalogAction::SelectCategory(CategoryFilter::Only(
                Category::Fashion,
            )))
            .then_state(|view| {
                assert_eq!(view.category, CategoryFilter::Only(Category::Fashion));
                assert!(view.search.is_empty());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn set_search_keeps_category() {
        ReducerTest::new(CatalogViewReducer)
            .with_env(())
            .given_state(CatalogView {
                category: CategoryFilter::Only(Category::Home),
                search: String::new(),
            })
            .when_action(CatalogAction::SetSearch("table".to_string()))
            .then_state(|view| {
                assert_eq!(view.category, CategoryFilter::Only(Category::Home));
                assert_eq!(view.search, "table");
            })
            .run();
    }

    fn category_filter() -> impl Strategy<Value = CategoryFilter> {
        prop::sample::select(CategoryFilter::options())
    }

    proptest! {
        #[test]
        fn filter_is_an_ordered_subsequence(category in category_filter(), search in "[a-zA-Z ]{0,6}") {
            let catalog = Catalog::standard();
            let visible = filter(catalog.products(), category, &search);

            let positions = visible
                .iter()
                .map(|p| catalog.products().iter().position(|q| q.id == p.id));
            let mut last = None;
            for position in positions {
                prop_assert!(position.is_some());
                prop_assert!(position > last);
                last = position;
            }
        }

        #[test]
        fn every_visible_product_satisfies_the_predicate(category in category_filter(), search in "[a-z]{0,4}") {
            let catalog = Catalog::standard();
            for product in filter(catalog.products(), category, &search) {
                prop_assert!(category.admits(product.category));
                let haystack = format!("{} {}", product.name, product.description).to_lowercase();
                prop_assert!(haystack.contains(&search));
            }
        }

        #[test]
        fn memoized_matches_plain(category in category_filter(), search in "[a-z]{0,3}") {
            let catalog = Catalog::standard();
            let mut memo = MemoizedFilter::new();
            let plain: Vec<_> = filter(catalog.products(), category, &search).iter().map(|p| p.id.clone()).collect();
            let cached: Vec<_> = memo.apply(&catalog, category, &search).iter().map(|p| p.id.clone()).collect();
            prop_assert_eq!(plain, cached);
        }
    }
}

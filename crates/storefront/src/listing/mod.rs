//! Catalog filter/sort pipeline.
//!
//! A pure function from (full product list, criteria) to a filtered, ordered
//! list. No hidden state - safe to recompute on every render. The length of
//! the result is the displayed count.

use std::collections::BTreeSet;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use digital_store_core::Product;

/// Listing sort order, always keyed on the list price (not the discount).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Cheapest first.
    #[default]
    PriceAscending,
    /// Most expensive first.
    PriceDescending,
}

/// Filter criteria for the product listing.
///
/// Every dimension is optional; empty criteria return the full catalog in
/// the default sort order. Once a dimension is active, products missing that
/// field are excluded - a missing brand never wildcard-matches a brand
/// filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Free-text query matched accent- and case-insensitively against names.
    pub query: Option<String>,
    /// Selected brands; empty means no brand filtering.
    pub brands: BTreeSet<String>,
    /// Selected categories; empty means no category filtering.
    pub categories: BTreeSet<String>,
    /// Selected gender; exact match when set.
    pub gender: Option<String>,
    /// Price sort order.
    pub sort: SortOrder,
}

impl FilterCriteria {
    /// Criteria matching everything, sorted ascending by price.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Add a brand to the brand filter set.
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brands.insert(brand.into());
        self
    }

    /// Add a category to the category filter set.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    /// Set the gender filter.
    #[must_use]
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    /// Set the sort order.
    #[must_use]
    pub const fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Run the pipeline: filter the full list, then stable-sort by list
    /// price. The result's length is the displayed count.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let folded_query = self
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(fold_for_search);

        let mut result: Vec<Product> = products
            .iter()
            .filter(|product| self.matches(product, folded_query.as_deref()))
            .cloned()
            .collect();

        // Stable sort: ties keep their prior relative order
        match self.sort {
            SortOrder::PriceAscending => {
                result.sort_by(|a, b| a.price.amount.cmp(&b.price.amount));
            }
            SortOrder::PriceDescending => {
                result.sort_by(|a, b| b.price.amount.cmp(&a.price.amount));
            }
        }

        result
    }

    fn matches(&self, product: &Product, folded_query: Option<&str>) -> bool {
        if let Some(query) = folded_query
            && !fold_for_search(&product.name).contains(query)
        {
            return false;
        }

        if !self.brands.is_empty()
            && !product
                .brand
                .as_ref()
                .is_some_and(|brand| self.brands.contains(brand))
        {
            return false;
        }

        if !self.categories.is_empty()
            && !product
                .category
                .as_ref()
                .is_some_and(|category| self.categories.contains(category))
        {
            return false;
        }

        if let Some(gender) = self.gender.as_deref()
            && product.gender.as_deref() != Some(gender)
        {
            return false;
        }

        true
    }
}

/// Fold a string for accent- and case-insensitive matching: decompose to
/// NFD, drop combining marks, lowercase.
fn fold_for_search(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::{Decimal, dec};

    use digital_store_core::{CurrencyCode, Price};

    use super::*;

    fn product(id: &str, name: &str, price: Decimal) -> Product {
        Product::new(id, name, "img.jpeg", Price::new(price, CurrencyCode::BRL))
    }

    fn sample() -> Vec<Product> {
        vec![
            product("1", "Tênis Azul", dec!(100)).with_brand("Nike"),
            product("2", "Tenis Vermelho", dec!(50)).with_brand("Puma"),
            product("3", "Sandália Preta", dec!(200)),
        ]
    }

    #[test]
    fn test_fold_for_search_strips_accents_and_case() {
        assert_eq!(fold_for_search("Tênis"), "tenis");
        assert_eq!(fold_for_search("SANDÁLIA"), "sandalia");
        assert_eq!(fold_for_search("plain"), "plain");
    }

    #[test]
    fn test_empty_criteria_returns_full_list_sorted() {
        let result = FilterCriteria::new().apply(&sample());
        assert_eq!(result.len(), 3);
        // Default ascending price order
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["2", "1", "3"]);
    }

    #[test]
    fn test_query_matches_without_accents() {
        let result = FilterCriteria::new().with_query("tenis").apply(&sample());
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn test_accented_query_matches_unaccented_name() {
        let result = FilterCriteria::new().with_query("Tênis").apply(&sample());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_query_substring_match() {
        let result = FilterCriteria::new().with_query("Azul").apply(&sample());
        assert_eq!(result.len(), 1);
        assert_eq!(result.first().map(|p| p.id.as_str()), Some("1"));
    }

    #[test]
    fn test_blank_query_is_ignored() {
        let result = FilterCriteria::new().with_query("   ").apply(&sample());
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_brand_filter_excludes_missing_brand() {
        let result = FilterCriteria::new().with_brand("Nike").apply(&sample());
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        // Product 3 has no brand and is excluded once the filter is active
        assert_eq!(ids, ["1"]);
    }

    #[test]
    fn test_brand_filter_set_membership() {
        let result = FilterCriteria::new()
            .with_brand("Nike")
            .with_brand("Puma")
            .apply(&sample());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_category_filter() {
        let products = vec![
            product("1", "Tênis A", dec!(10)).with_category("Tênis"),
            product("2", "Camisa B", dec!(20)).with_category("Camisa"),
            product("3", "Sem categoria", dec!(30)),
        ];
        let result = FilterCriteria::new()
            .with_category("Tênis")
            .apply(&products);
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1"]);
    }

    #[test]
    fn test_gender_filter_is_exact() {
        let products = vec![
            product("1", "Tênis A", dec!(10)).with_gender("Masculino"),
            product("2", "Tênis B", dec!(20)).with_gender("Feminino"),
            product("3", "Tênis C", dec!(30)),
        ];
        let result = FilterCriteria::new()
            .with_gender("Masculino")
            .apply(&products);
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1"]);
    }

    #[test]
    fn test_sort_descending() {
        let products = vec![
            product("a", "A", dec!(100)),
            product("b", "B", dec!(50)),
            product("c", "C", dec!(200)),
        ];
        let result = FilterCriteria::new()
            .with_sort(SortOrder::PriceDescending)
            .apply(&products);
        let prices: Vec<Decimal> = result.iter().map(|p| p.price.amount).collect();
        assert_eq!(prices, [dec!(200), dec!(100), dec!(50)]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let products = vec![
            product("first", "A", dec!(100)),
            product("second", "B", dec!(100)),
            product("third", "C", dec!(100)),
        ];
        for sort in [SortOrder::PriceAscending, SortOrder::PriceDescending] {
            let result = FilterCriteria::new().with_sort(sort).apply(&products);
            let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
            assert_eq!(ids, ["first", "second", "third"]);
        }
    }

    #[test]
    fn test_sort_uses_list_price_not_discount() {
        let cheap_after_discount = product("a", "A", dec!(300)).with_discount(Price::new(
            dec!(10),
            CurrencyCode::BRL,
        ));
        let products = vec![product("b", "B", dec!(100)), cheap_after_discount];
        let result = FilterCriteria::new().apply(&products);
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        // "a" sorts by its 300 list price even though its effective price is 10
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_combined_filters() {
        let products = vec![
            product("1", "Tênis Azul", dec!(100))
                .with_brand("Nike")
                .with_category("Tênis")
                .with_gender("Masculino"),
            product("2", "Tênis Azul Feminino", dec!(90))
                .with_brand("Nike")
                .with_category("Tênis")
                .with_gender("Feminino"),
            product("3", "Tênis Azul", dec!(80)).with_brand("Puma"),
        ];
        let result = FilterCriteria::new()
            .with_query("azul")
            .with_brand("Nike")
            .with_gender("Masculino")
            .apply(&products);
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1"]);
    }
}

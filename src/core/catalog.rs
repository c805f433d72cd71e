//! Immutable catalog with category browsing and fuzzy search

use crate::core::error::Error;
use crate::core::search::{tokenize, FuzzyMatcher, SearchFields};
use crate::models::{CatalogItem, Category, ItemId};
use crate::Result;

use log::{debug, info};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// On-disk shape of a catalog document
#[derive(Debug, Deserialize)]
struct CatalogData {
    #[serde(default)]
    categories: Vec<Category>,
    items: Vec<CatalogItem>,
}

/// A search result with its distance (0 = perfect)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    /// The matching item
    pub item: &'a CatalogItem,
    /// Match distance, lower is better
    pub score: f64,
}

/// Catalog index answering "what should be displayed"
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    /// Items in catalog order
    items: Vec<CatalogItem>,
    /// Categories in display order
    categories: Vec<Category>,
    /// Position of each item id in `items`
    positions: HashMap<ItemId, usize>,
    /// Tokenized name/description, parallel to `items`
    fields: Vec<SearchFields>,
    /// Matcher used by `search`
    matcher: FuzzyMatcher,
}

impl CatalogIndex {
    /// Builds the index, rejecting duplicate item or category ids
    pub fn new(items: Vec<CatalogItem>, categories: Vec<Category>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if positions.insert(item.id, index).is_some() {
                return Err(Error::InvalidData(format!(
                    "Duplicate catalog item id: {}",
                    item.id
                )));
            }
        }

        let mut category_ids = HashSet::new();
        for category in &categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(Error::InvalidData(format!(
                    "Duplicate category id: {}",
                    category.id
                )));
            }
        }

        let fields = items
            .iter()
            .map(|item| SearchFields::new(&item.name, &item.description))
            .collect();

        info!(
            "Loaded catalog with {} items in {} categories",
            items.len(),
            categories.len()
        );

        Ok(Self {
            items,
            categories,
            positions,
            fields,
            matcher: FuzzyMatcher::default(),
        })
    }

    /// Parses a `{ "categories": [...], "items": [...] }` JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::new(data.items, data.categories)
    }

    /// Replaces the matcher used by `search`
    pub fn with_matcher(mut self, matcher: FuzzyMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Items tagged with `category_id`, in catalog order
    pub fn by_category(&self, category_id: &str) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|item| item.category == category_id)
            .collect()
    }

    /// Items matching `query`, best match first
    pub fn search(&self, query: &str) -> Vec<&CatalogItem> {
        self.search_scored(query)
            .into_iter()
            .map(|hit| hit.item)
            .collect()
    }

    /// Like `search`, keeping the match distances
    pub fn search_scored(&self, query: &str) -> Vec<SearchHit<'_>> {
        let tokens = tokenize(query);
        let mut hits: Vec<SearchHit<'_>> = self
            .items
            .iter()
            .zip(&self.fields)
            .filter_map(|(item, fields)| {
                self.matcher
                    .score(&tokens, fields)
                    .map(|score| SearchHit { item, score })
            })
            .collect();

        // Stable sort keeps catalog order for equal scores
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));

        debug!("Search {:?} matched {} items", query, hits.len());
        hits
    }

    /// Looks up an item by id
    pub fn get(&self, id: ItemId) -> Option<&CatalogItem> {
        self.positions.get(&id).map(|&index| &self.items[index])
    }

    /// Looks up a category by id
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// All items in catalog order
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// All categories in display order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the catalog has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_catalog() -> CatalogIndex {
        let items = vec![
            CatalogItem::new(1, "Classic Burger", 199, "burger")
                .with_description("Beef patty, cheddar and pickles"),
            CatalogItem::new(2, "Margherita Pizza", 299, "pizza")
                .with_description("Tomato, mozzarella and basil"),
            CatalogItem::new(3, "Veggie Burger", 179, "burger")
                .with_description("Crispy potato patty")
                .with_veg(true),
            CatalogItem::new(4, "Farmhouse Pizza", 349, "pizza")
                .with_description("Loaded with veggies and extra cheese"),
            CatalogItem::new(5, "Cheese Fries", 129, "sides")
                .with_description("Golden fries with cheese sauce"),
        ];
        let categories = vec![
            Category::new("burger", "Burgers").with_icon("🍔"),
            Category::new("pizza", "Pizzas").with_icon("🍕"),
            Category::new("sides", "Sides"),
            Category::new("desserts", "Desserts"),
        ];

        CatalogIndex::new(items, categories).unwrap()
    }

    #[test]
    fn test_by_category_preserves_order() {
        let catalog = create_test_catalog();

        let burgers: Vec<ItemId> = catalog.by_category("burger").iter().map(|i| i.id).collect();
        assert_eq!(burgers, vec![1, 3]);

        assert!(catalog.by_category("desserts").is_empty());
        assert!(catalog.by_category("unknown").is_empty());
    }

    #[test]
    fn test_search_tolerates_typos() {
        let catalog = create_test_catalog();

        let results = catalog.search("piza");
        let ids: Vec<ItemId> = results.iter().map(|i| i.id).collect();

        assert!(ids.contains(&2));
        assert!(ids.contains(&4));
        assert!(!ids.contains(&1));
    }

    #[test]
    fn test_search_ranks_name_matches_first() {
        let catalog = create_test_catalog();

        let hits = catalog.search_scored("cheese");
        let ids: Vec<ItemId> = hits.iter().map(|hit| hit.item.id).collect();

        // Name match first, then description matches in catalog order
        assert_eq!(ids.first(), Some(&5));
        assert!(ids.contains(&4));
        assert!(hits.windows(2).all(|w| w[0].score <= w[1].score));
    }

    #[test]
    fn test_search_no_match() {
        let catalog = create_test_catalog();
        assert!(catalog.search("sushi").is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let items = vec![
            CatalogItem::new(1, "Classic Burger", 199, "burger"),
            CatalogItem::new(1, "Another Burger", 149, "burger"),
        ];
        let result = CatalogIndex::new(items, vec![]);
        assert!(matches!(result, Err(Error::InvalidData(_))));

        let categories = vec![Category::new("pizza", "Pizzas"), Category::new("pizza", "Pies")];
        let result = CatalogIndex::new(vec![], categories);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "categories": [{ "id": "pizza", "name": "Pizzas", "icon": "🍕" }],
            "items": [
                { "id": 10, "name": "Margherita Pizza", "price": 299, "category": "pizza" }
            ]
        }"#;

        let catalog = CatalogIndex::from_json(json).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(10).map(|i| i.price), Some(299));
        assert_eq!(catalog.category("pizza").map(|c| c.name.as_str()), Some("Pizzas"));
        assert!(catalog.get(11).is_none());

        assert!(matches!(
            CatalogIndex::from_json(r#"{ "items": [{ "id": 1 }] }"#),
            Err(Error::Serialization(_))
        ));
    }
}

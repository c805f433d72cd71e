use serde::{Deserialize, Serialize};

/// Identifier of a catalog item
pub type ItemId = u32;

/// Represents a dish offered in the catalog
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Unique identifier for the item
    pub id: ItemId,
    /// Name of the item
    pub name: String,
    /// Short description shown on the card and searched by the catalog
    #[serde(default)]
    pub description: String,
    /// Unit price in the smallest currency unit
    pub price: u64,
    /// Category tag, matches a `Category::id`
    pub category: String,
    /// Average rating (0-5)
    #[serde(default)]
    pub rating: f32,
    /// Preparation time label, e.g. "15-20 min"
    #[serde(default)]
    pub prep_time: String,
    /// Vegetarian flag
    #[serde(default)]
    pub is_veg: bool,
    /// Promotional "best seller" badge
    #[serde(default)]
    pub is_best_seller: bool,
    /// Optional calorie count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    /// Optional image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CatalogItem {
    /// Creates a new CatalogItem with required fields
    pub fn new(id: ItemId, name: impl Into<String>, price: u64, category: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            price,
            category: category.into(),
            rating: 0.0,
            prep_time: String::new(),
            is_veg: false,
            is_best_seller: false,
            calories: None,
            image: None,
        }
    }

    /// Sets the description of the item
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the rating of the item
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = rating;
        self
    }

    /// Sets the preparation time label
    pub fn with_prep_time(mut self, prep_time: impl Into<String>) -> Self {
        self.prep_time = prep_time.into();
        self
    }

    /// Marks the item as vegetarian
    pub fn with_veg(mut self, is_veg: bool) -> Self {
        self.is_veg = is_veg;
        self
    }

    /// Marks the item as a best seller
    pub fn with_best_seller(mut self, is_best_seller: bool) -> Self {
        self.is_best_seller = is_best_seller;
        self
    }

    /// Sets the calorie count
    pub fn with_calories(mut self, calories: u32) -> Self {
        self.calories = Some(calories);
        self
    }

    /// Sets the image URL
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

use serde::{Deserialize, Serialize};

/// A browsable section of the menu
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Tag referenced by `CatalogItem::category`
    pub id: String,
    /// Display name
    pub name: String,
    /// Icon (usually an emoji)
    #[serde(default)]
    pub icon: String,
    /// One-line blurb
    #[serde(default)]
    pub description: String,
}

impl Category {
    /// Creates a new Category
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: String::new(),
            description: String::new(),
        }
    }

    /// Sets the icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

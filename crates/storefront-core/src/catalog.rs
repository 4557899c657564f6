//! # Catalog Helpers
//!
//! Filtering and sorting of product listings, category display names, and
//! the mapping from FakeStore API records to [`Product`].
//!
//! ## Filter Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products                                                               │
//! │     │                                                                   │
//! │     ├──► category == filters.category    (skipped for None / "all")     │
//! │     ├──► min_price ≤ price ≤ max_price   (bounds inclusive)             │
//! │     ├──► search ⊂ name | description     (case-insensitive)             │
//! │     └──► stable sort by filters.sort_by  (input order when None)        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::format::create_slug;
use crate::money::Money;
use crate::types::Product;

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

// =============================================================================
// Sort Options
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSortOption {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl ProductSortOption {
    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            ProductSortOption::NameAsc => compare_names(a, b),
            ProductSortOption::NameDesc => compare_names(b, a),
            ProductSortOption::PriceAsc => a.price.cmp(&b.price),
            ProductSortOption::PriceDesc => b.price.cmp(&a.price),
            ProductSortOption::RatingDesc => b.rating.total_cmp(&a.rating),
        }
    }
}

fn compare_names(a: &Product, b: &Product) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

// =============================================================================
// Filters
// =============================================================================

/// Listing filters. Every field is optional; an empty value filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub min_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub max_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<ProductSortOption>,
}

impl ProductFilters {
    fn matches(&self, product: &Product, needle: Option<&str>) -> bool {
        if let Some(category) = self.category.as_deref() {
            if category != ALL_CATEGORIES && product.category != category {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        match needle {
            Some(needle) => {
                product.name.to_lowercase().contains(needle)
                    || product.description.to_lowercase().contains(needle)
            }
            None => true,
        }
    }
}

/// Applies `filters` to `products`, returning the matches in display order.
pub fn filter_products(products: &[Product], filters: &ProductFilters) -> Vec<Product> {
    let needle = filters
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<Product> = products
        .iter()
        .filter(|p| filters.matches(p, needle.as_deref()))
        .cloned()
        .collect();

    if let Some(sort) = filters.sort_by {
        matched.sort_by(|a, b| sort.compare(a, b));
    }

    matched
}

/// Distinct categories in first-seen order.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !product.category.is_empty() && !seen.contains(&product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

// =============================================================================
// Display Names
// =============================================================================

/// Capitalizes the first letter of each space-separated word.
///
/// ```rust
/// use storefront_core::catalog::format_category_name;
///
/// assert_eq!(format_category_name("men's clothing"), "Men's Clothing");
/// ```
pub fn format_category_name(category: &str) -> String {
    category
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Display name for a known catalog category, falling back to
/// [`format_category_name`].
pub fn category_display_name(category: &str) -> String {
    match category {
        "electronics" => "Electronics".to_string(),
        "jewelery" => "Jewelry".to_string(),
        "men's clothing" => "Men's Clothing".to_string(),
        "women's clothing" => "Women's Clothing".to_string(),
        other => format_category_name(other),
    }
}

// =============================================================================
// Features
// =============================================================================

/// Derives a feature list from a product description.
///
/// The first three sentences longer than ten characters, or a per-category
/// default list when the description has fewer.
pub fn generate_features(description: &str, category: &str) -> Vec<String> {
    let sentences: Vec<String> = description
        .split('.')
        .map(str::trim)
        .filter(|s| s.chars().count() > 10)
        .map(str::to_string)
        .collect();

    if sentences.len() >= 3 {
        return sentences.into_iter().take(3).collect();
    }

    let defaults: &[&str] = match category {
        "electronics" => &["High Quality", "Latest Technology", "Warranty Included", "Fast Shipping"],
        "jewelery" => &["Premium Materials", "Elegant Design", "Gift Wrapped", "Certificate Included"],
        "men's clothing" => &["Comfortable Fit", "Durable Fabric", "Easy Care", "Modern Style"],
        "women's clothing" => &["Stylish Design", "Quality Fabric", "Perfect Fit", "Versatile"],
        _ => &["High Quality", "Fast Shipping", "Great Value"],
    };
    defaults.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// FakeStore Records
// =============================================================================

/// A product as the FakeStore API returns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FakeStoreProduct {
    pub id: u64,
    pub title: String,
    #[serde(deserialize_with = "crate::money::deserialize_non_negative")]
    pub price: Money,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: FakeStoreRating,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct FakeStoreRating {
    pub rate: f64,
    pub count: u32,
}

impl Product {
    /// Maps a FakeStore record onto a catalog product.
    ///
    /// The API carries no stock level, so the caller supplies `inventory`.
    /// Features and slug are derived from the description and title.
    pub fn from_fake_store(record: FakeStoreProduct, inventory: u32) -> Self {
        Product {
            id: record.id.to_string(),
            features: generate_features(&record.description, &record.category),
            slug: create_slug(&record.title, record.id),
            name: record.title,
            description: record.description,
            price: record.price,
            image: record.image,
            category: record.category,
            inventory,
            rating: record.rating.rate,
            review_count: record.rating.count,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Catalog product as returned by the API.
///
/// Pass-through: every field but `id` may be missing and nothing is
/// validated locally. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Product {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<f64>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub stock: Option<i64>,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub dimensions: Option<Dimensions>,
    pub weight: Option<f64>,
    pub rating: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub sku: Option<String>,
    pub availability_status: Option<String>,
    pub minimum_order_quantity: Option<i64>,
    pub shipping_information: Option<String>,
    pub return_policy: Option<String>,
    pub warranty_information: Option<String>,
    pub meta: Option<ProductMeta>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Dimensions {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub depth: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Review {
    pub rating: Option<f64>,
    pub comment: Option<String>,
    pub date: Option<String>,
    pub reviewer_name: Option<String>,
    pub reviewer_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ProductMeta {
    pub barcode: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub qr_code: Option<String>,
}

/// One page of `GET /products`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

/// Editable subset of a product, sent as the body of add and update
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    pub thumbnail: String,
}

impl ProductDraft {
    /// Prefill a draft from an existing product, for editing
    pub fn from_product(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            brand: product.brand.clone().unwrap_or_default(),
            category: product.category.clone().unwrap_or_default(),
            price: product.price.unwrap_or_default(),
            stock: product.stock.unwrap_or_default(),
            thumbnail: product.thumbnail.clone().unwrap_or_default(),
        }
    }
}

impl Product {
    pub fn barcode(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.barcode.as_deref())
    }
}

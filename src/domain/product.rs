use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product record extracted from one search listing slot.
///
/// Every field is present; anything the listing did not carry is an empty
/// string rather than `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    /// Rating label as rendered by the site, e.g. "4,5 de 5 estrelas"
    pub rating: String,
    /// Digits only, thousands separators stripped
    #[serde(rename = "reviewCount")]
    pub review_count: String,
    /// Absolute thumbnail URL
    pub image: String,
}

/// Response envelope for one keyword search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub success: bool,
    pub keyword: String,
    #[serde(rename = "totalProducts")]
    pub total_products: usize,
    pub products: Vec<Product>,
    #[serde(rename = "scrapedAt", with = "iso_millis")]
    pub scraped_at: DateTime<Utc>,
}

impl SearchResult {
    /// Build a successful result; `total_products` always mirrors `products.len()`.
    pub fn new(keyword: impl Into<String>, products: Vec<Product>, scraped_at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            keyword: keyword.into(),
            total_products: products.len(),
            products,
            scraped_at,
        }
    }

    /// Build a result stamped with the current time
    pub fn captured_now(keyword: impl Into<String>, products: Vec<Product>) -> Self {
        Self::new(keyword, products, Utc::now())
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// RFC 3339 timestamps with millisecond precision and a `Z` suffix
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

//! Mapping of the two remote item shapes into [`NormalizedItem`].

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;

use crate::constants::CREATED_AT_WINDOW_MS;
use crate::error::AppError;
use crate::models::{FeedKind, FeedPage, NormalizedItem};
use crate::schema_validation::validate_feed_page;

#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCompany {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub company: Option<RawCompany>,
}

#[derive(Debug, Deserialize)]
struct Counters {
    total: u32,
    skip: u32,
    limit: u32,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Neither source carries a timestamp; pick one inside the recent window.
pub fn synthesize_created_at<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> DateTime<Utc> {
    let offset_ms = rng.gen_range(0..CREATED_AT_WINDOW_MS);
    now - Duration::milliseconds(offset_ms)
}

pub fn normalize_product(raw: RawProduct, created_at: DateTime<Utc>) -> NormalizedItem {
    NormalizedItem {
        id: raw.id.to_string(),
        title: raw.title,
        body: raw.description,
        image: non_empty(raw.thumbnail),
        author: non_empty(raw.brand).unwrap_or_else(|| "Anonymous".to_string()),
        rating: raw.rating,
        price: raw.price,
        category: non_empty(raw.category),
        department: None,
        age: None,
        created_at,
    }
}

pub fn normalize_user(raw: RawUser, created_at: DateTime<Utc>) -> NormalizedItem {
    let company = raw.company.unwrap_or_default();
    let company_name = non_empty(company.name).unwrap_or_else(|| "N/A".to_string());
    NormalizedItem {
        id: format!("user-{}", raw.id),
        title: format!("{} {}", raw.first_name, raw.last_name),
        body: format!(
            "Email: {} | Phone: {} | Company: {}",
            raw.email, raw.phone, company_name
        ),
        image: non_empty(raw.image),
        author: raw.username,
        rating: None,
        price: None,
        category: None,
        department: non_empty(company.department),
        age: raw.age,
        created_at,
    }
}

/// Validate and normalize one response body.
///
/// The item array is read from the key named after the kind, with a
/// generic `items` key accepted as well.
pub fn parse_page(kind: FeedKind, body: &str) -> Result<FeedPage, AppError> {
    let mut value: Value = serde_json::from_str(body)?;
    validate_feed_page(&value)?;

    let counters: Counters = serde_json::from_value(value.clone())?;
    let raw_items = value
        .as_object_mut()
        .and_then(|obj| obj.remove(kind.endpoint()).or_else(|| obj.remove("items")))
        .ok_or_else(|| {
            AppError::InvalidResponse(format!("response has no '{}' array", kind.endpoint()))
        })?;

    let now = Utc::now();
    let mut rng = rand::thread_rng();
    let items = match kind {
        FeedKind::Products => serde_json::from_value::<Vec<RawProduct>>(raw_items)?
            .into_iter()
            .map(|raw| normalize_product(raw, synthesize_created_at(now, &mut rng)))
            .collect(),
        FeedKind::Users => serde_json::from_value::<Vec<RawUser>>(raw_items)?
            .into_iter()
            .map(|raw| normalize_user(raw, synthesize_created_at(now, &mut rng)))
            .collect(),
    };

    Ok(FeedPage {
        items,
        total: counters.total,
        offset: counters.skip,
        limit: counters.limit,
    })
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Poster account attached to a listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub has_email: bool,
    pub verified: bool,
    pub account_type: String,
    pub custom_fields: Vec<String>,
    pub show_phone_message: String,
    pub joined: String,
    pub phone: Option<String>,
    pub logo: String,
    pub company_name: String,
    pub legal_name: String,
    pub website: String,
    pub contact_phone: Option<String>,
    pub card_header_colour: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub id: u64,
    pub url: String,
    pub orig: String,
    pub is_flatplan: bool,
}

/// Category-specific attributes; JSON keys carry the `attrs__` prefix
/// used by the remote API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    #[serde(rename = "attrs__feet")]
    pub feet: i64,
    #[serde(rename = "attrs__type")]
    pub kind: i64,
    #[serde(rename = "attrs__floor")]
    pub floor: i64,
    #[serde(rename = "attrs__remont")]
    pub remont: i64,
    #[serde(rename = "attrs__sanuzel")]
    pub sanuzel: i64,
    #[serde(rename = "attrs__district")]
    pub district: String,
    #[serde(rename = "attrs__otoplenie")]
    pub otoplenie: i64,
    #[serde(rename = "attrs__sostoyanie")]
    pub sostoyanie: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Breadcrumb {
    pub id: u64,
    pub path: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Permissions {
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub cv_form: String,
    pub chat: String,
    pub delivery: String,
}

/// Geographic position of a listing; absent for ads without geo-tagging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One classified ad, mirroring the remote API's JSON shape.
///
/// Most fields are opaque pass-through data: they survive the
/// read-merge-write cycle untouched and only `id`, `title`, `slug`,
/// `coordinates` and `attributes.district` are ever interpreted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Listing {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub rubric: i64,
    pub description: String,
    pub city: i64,
    pub user: User,
    pub images: Vec<Image>,
    #[serde(rename = "attrs")]
    pub attributes: Attributes,
    pub price: String,
    pub start_price: String,
    pub contacts: Value,
    pub hit_count: i64,
    pub currency: String,
    #[serde(rename = "phone_hitcount")]
    pub phone_hit_count: i64,
    pub raise_dt: String,
    pub created_dt: String,
    pub owner_advert_count: i64,
    pub coordinates: Option<Coordinates>,
    pub zoom: Option<i64>,
    pub negotiable_price: bool,
    pub exchange: bool,
    pub price_description: String,
    pub in_top: bool,
    pub in_premium: bool,
    pub is_editable: bool,
    pub is_favorite: bool,
    pub city_districts: Vec<String>,
    pub flatplan: bool,
    pub video_link: String,
    pub credit_type: Option<String>,
    pub credit_attrs: Option<String>,
    pub credit_link: Option<String>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub templated_title: String,
    pub cloudinary_video: Value,
    pub whatsapp: String,
    pub viber: Option<String>,
    pub imei_checked: bool,
    pub imei_info: Vec<String>,
    pub phone_benchmark_results: Vec<String>,
    pub external_id: String,
    pub item_link: String,
    pub virtual_tour_link: String,
    pub square_meter_price: Option<String>,
    pub is_carcheck: bool,
    pub delivery: bool,
    pub has_online_viewing: bool,
    pub has_carcheck_report: bool,
    pub has_free_carcheck_report: bool,
    pub category_type: String,
    pub new_in_stock_label: bool,
    pub new_to_order_label: bool,
    pub price_from: bool,
    pub show_send_form: bool,
    pub show_whatsapp_btn: bool,
    pub permissions: Permissions,
    pub currency_id: i64,
}

impl Listing {
    /// Canonical detail-page URL for this listing
    pub fn detail_url(&self) -> String {
        format!("https://somon.tj/adv/{}_{}", self.id, self.slug)
    }
}

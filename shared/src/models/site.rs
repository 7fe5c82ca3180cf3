//! Site Config Model

use serde::{Deserialize, Serialize};

/// Site branding configuration (singleton row, id = 1)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SiteConfig {
    pub id: i64,
    #[serde(default)]
    pub brand_name: String,
    pub daily_special: Option<String>,
    pub logo_path: Option<String>,
    pub landing_poster_path: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub operating_hours: Option<String>,
}

/// Update site config payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfigUpdate {
    pub brand_name: Option<String>,
    pub daily_special: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub operating_hours: Option<String>,
}

//! Menu Model

use serde::{Deserialize, Serialize};

/// Menu item category (菜单分类)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum MenuItemCategory {
    Main,
    Set,
    Side,
    Drink,
}

impl MenuItemCategory {
    /// Parse from the form value sent by the admin panel
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Main" => Some(Self::Main),
            "Set" => Some(Self::Set),
            "Side" => Some(Self::Side),
            "Drink" => Some(Self::Drink),
            _ => None,
        }
    }
}

/// Menu item entity
///
/// Orders embed a snapshot of name/price at creation time, never a live
/// reference to this row, so later edits never alter historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price in cents
    pub price_cents: i64,
    pub category: MenuItemCategory,
    pub is_active: bool,
    /// Relative path under the uploads dir, e.g. `/uploads/abc.jpg`
    pub image: Option<String>,
    pub created_at: i64,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub category: MenuItemCategory,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub image: Option<String>,
}

/// Update menu item payload (None = keep current value)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub category: Option<MenuItemCategory>,
    pub is_active: Option<bool>,
    pub image: Option<String>,
}

fn default_true() -> bool {
    true
}

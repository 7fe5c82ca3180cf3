//! Cart Manager
//!
//! The customer's in-progress, not-yet-submitted selection. At most one
//! entry per menu item id; the total is always recomputed from the
//! entries, never cached. Every mutation persists the full snapshot
//! through a [`CartStore`] so a page reload restores the cart exactly;
//! persistence is fire-and-forget, a failed save is logged and the
//! in-memory state stays authoritative.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

use shared::models::MenuItem;
use shared::order::OrderLine;

/// One cart entry: a menu item selection with quantity ≥ 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub menu_item_id: i64,
    pub name: String,
    pub price_cents: i64,
    pub quantity: i64,
}

impl CartItem {
    pub fn line_total_cents(&self) -> i64 {
        self.price_cents * self.quantity
    }
}

/// Durable local storage for the cart snapshot
pub trait CartStore: Send {
    fn save(&self, items: &[CartItem]) -> std::io::Result<()>;
    fn load(&self) -> std::io::Result<Vec<CartItem>>;
}

/// In-memory store (tests, ephemeral sessions)
#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<Vec<CartItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStore for MemoryStore {
    fn save(&self, items: &[CartItem]) -> std::io::Result<()> {
        *self.saved.lock().unwrap() = items.to_vec();
        Ok(())
    }

    fn load(&self) -> std::io::Result<Vec<CartItem>> {
        Ok(self.saved.lock().unwrap().clone())
    }
}

/// JSON file store, the local-storage analog for native frontends
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CartStore for JsonFileStore {
    fn save(&self, items: &[CartItem]) -> std::io::Result<()> {
        let json = serde_json::to_string(items)
            .map_err(|e| std::io::Error::other(format!("Cart serialization failed: {e}")))?;
        std::fs::write(&self.path, json)
    }

    fn load(&self) -> std::io::Result<Vec<CartItem>> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json).unwrap_or_default()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

/// The cart manager
pub struct Cart<S: CartStore> {
    items: Vec<CartItem>,
    store: S,
}

impl<S: CartStore> Cart<S> {
    /// Restore the persisted snapshot; a corrupt or missing snapshot
    /// yields an empty cart.
    pub fn load(store: S) -> Self {
        let items = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to restore cart; starting empty");
            Vec::new()
        });
        Self { items, store }
    }

    /// Increment the entry for this menu item by exactly 1, inserting it
    /// with quantity 1 when absent.
    pub fn add(&mut self, item: &MenuItem) {
        match self.items.iter_mut().find(|i| i.menu_item_id == item.id) {
            Some(entry) => entry.quantity += 1,
            None => self.items.push(CartItem {
                menu_item_id: item.id,
                name: item.name.clone(),
                price_cents: item.price_cents,
                quantity: 1,
            }),
        }
        self.persist();
    }

    /// Add `delta` to an entry's quantity; a result ≤ 0 removes the entry
    /// entirely. Silently ignored when the id is absent.
    pub fn update_quantity(&mut self, menu_item_id: i64, delta: i64) {
        let Some(pos) = self
            .items
            .iter()
            .position(|i| i.menu_item_id == menu_item_id)
        else {
            return;
        };
        self.items[pos].quantity += delta;
        if self.items[pos].quantity <= 0 {
            self.items.remove(pos);
        }
        self.persist();
    }

    /// Σ(price × quantity), recomputed from the entries on every call
    pub fn total_cents(&self) -> i64 {
        self.items.iter().map(CartItem::line_total_cents).sum()
    }

    /// Empty the cart (called once, right after successful submission)
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot lines for an order submission
    pub fn to_order_lines(&self) -> Vec<OrderLine> {
        self.items
            .iter()
            .map(|i| OrderLine {
                name: i.name.clone(),
                quantity: i.quantity,
                price_cents: i.price_cents,
            })
            .collect()
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.items) {
            tracing::warn!(error = %e, "Failed to persist cart snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_item(id: i64, name: &str, price_cents: i64) -> MenuItem {
        MenuItem {
            id,
            name: name.into(),
            description: String::new(),
            price_cents,
            category: shared::models::MenuItemCategory::Main,
            is_active: true,
            image: None,
            created_at: 0,
        }
    }

    #[test]
    fn add_increments_by_exactly_one() {
        let mut cart = Cart::load(MemoryStore::new());
        let nasi = menu_item(1, "Nasi Ayam", 990);

        cart.add(&nasi);
        cart.add(&nasi);
        cart.add(&nasi);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.total_cents(), 2970);
    }

    #[test]
    fn quantity_floor_removes_entry() {
        let mut cart = Cart::load(MemoryStore::new());
        cart.add(&menu_item(1, "Nasi Ayam", 990));
        cart.add(&menu_item(1, "Nasi Ayam", 990));

        cart.update_quantity(1, -1);
        assert_eq!(cart.items()[0].quantity, 1);

        cart.update_quantity(1, -1);
        assert!(cart.is_empty());

        // A big negative delta never leaves a non-positive entry behind
        cart.add(&menu_item(2, "Teh Ais", 250));
        cart.update_quantity(2, -10);
        assert!(cart.is_empty());
    }

    #[test]
    fn update_quantity_on_absent_id_is_a_noop() {
        let mut cart = Cart::load(MemoryStore::new());
        cart.add(&menu_item(1, "Nasi Ayam", 990));
        cart.update_quantity(99, 5);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_cents(), 990);
    }

    #[test]
    fn total_always_matches_recomputed_sum() {
        // Randomized operation sequences: total() must equal the sum
        // recomputed from entries after every step
        use rand::{Rng, SeedableRng, rngs::StdRng};

        let menu: Vec<MenuItem> = (1..=5)
            .map(|i| menu_item(i, &format!("Item {i}"), i * 150))
            .collect();
        let mut rng = StdRng::seed_from_u64(42);
        let mut cart = Cart::load(MemoryStore::new());

        for _ in 0..500 {
            match rng.gen_range(0..3) {
                0 => cart.add(&menu[rng.gen_range(0..menu.len())]),
                1 => cart.update_quantity(rng.gen_range(0..=6), rng.gen_range(-3..=3)),
                _ => cart.update_quantity(rng.gen_range(1..=5), 1),
            }

            let recomputed: i64 = cart
                .items()
                .iter()
                .map(|i| i.price_cents * i.quantity)
                .sum();
            assert_eq!(cart.total_cents(), recomputed);
            assert!(cart.items().iter().all(|i| i.quantity >= 1));

            // At most one entry per menu item id
            let mut ids: Vec<i64> = cart.items().iter().map(|i| i.menu_item_id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), cart.items().len());
        }
    }

    #[test]
    fn persistence_restores_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");

        {
            let mut cart = Cart::load(JsonFileStore::new(&path));
            cart.add(&menu_item(1, "Nasi Ayam", 990));
            cart.add(&menu_item(1, "Nasi Ayam", 990));
            cart.add(&menu_item(2, "Teh Ais", 250));
        }

        // Reload from disk: same entries, same total
        let restored = Cart::load(JsonFileStore::new(&path));
        assert_eq!(restored.items().len(), 2);
        assert_eq!(restored.total_cents(), 2230);
        assert_eq!(restored.items()[0].quantity, 2);
    }

    #[test]
    fn clear_persists_the_empty_cart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");

        let mut cart = Cart::load(JsonFileStore::new(&path));
        cart.add(&menu_item(1, "Nasi Ayam", 990));
        cart.clear();

        let restored = Cart::load(JsonFileStore::new(&path));
        assert!(restored.is_empty());
    }
}

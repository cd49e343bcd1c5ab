//! Cart store seam.

use std::sync::{Arc, RwLock};

use common::CartItem;

/// Read access to the externally-owned cart, plus the one write the
/// checkout core is allowed: clearing it after a successful COD order.
pub trait CartStore: Send + Sync {
    /// Returns a snapshot of the cart contents.
    fn items(&self) -> Vec<CartItem>;

    /// Empties the cart.
    fn clear(&self);
}

#[derive(Debug, Default)]
struct InMemoryCartState {
    items: Vec<CartItem>,
    clear_calls: u32,
}

/// In-memory cart store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartStore {
    state: Arc<RwLock<InMemoryCartState>>,
}

impl InMemoryCartStore {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cart pre-filled with items.
    pub fn with_items(items: Vec<CartItem>) -> Self {
        let cart = Self::new();
        cart.state.write().unwrap().items = items;
        cart
    }

    /// Adds an item to the cart.
    pub fn add(&self, item: CartItem) {
        self.state.write().unwrap().items.push(item);
    }

    /// Returns the number of lines in the cart.
    pub fn item_count(&self) -> usize {
        self.state.read().unwrap().items.len()
    }

    /// Returns true if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Returns how many times the cart was cleared.
    pub fn clear_calls(&self) -> u32 {
        self.state.read().unwrap().clear_calls
    }
}

impl CartStore for InMemoryCartStore {
    fn items(&self) -> Vec<CartItem> {
        self.state.read().unwrap().items.clone()
    }

    fn clear(&self) {
        let mut state = self.state.write().unwrap();
        state.items.clear();
        state.clear_calls += 1;
    }
}

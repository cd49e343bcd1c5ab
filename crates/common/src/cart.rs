use serde::{Deserialize, Serialize};

use crate::Money;

/// Product identifier (SKU).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the product ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An item in the shopper's cart.
///
/// Cart items are owned by the cart store; the checkout core only reads
/// them to build tax and order payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product identifier.
    pub product_id: ProductId,

    /// Human-readable product name.
    pub name: String,

    /// Price per unit.
    pub price: Money,

    /// Quantity in the cart.
    pub quantity: u32,

    /// Tax category used for rate lookup (e.g. "books").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_category: Option<String>,

    /// HSN classification code, when the catalog provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsn_code: Option<String>,
}

impl CartItem {
    /// Creates a new cart item.
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            price,
            quantity,
            tax_category: None,
            hsn_code: None,
        }
    }

    /// Sets the tax category.
    pub fn with_tax_category(mut self, category: impl Into<String>) -> Self {
        self.tax_category = Some(category.into());
        self
    }

    /// Sets the HSN code.
    pub fn with_hsn_code(mut self, code: impl Into<String>) -> Self {
        self.hsn_code = Some(code.into());
        self
    }

    /// Returns the total price for this line (quantity * unit price).
    pub fn line_total(&self) -> Money {
        self.price.multiply(self.quantity)
    }
}

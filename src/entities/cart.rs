use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::product::{Product, ProductVariant};
use crate::errors::CartError;

/// Identity of a cart line: product id plus optional variant id.
///
/// Two lines are the same line iff their keys are equal; the cart never
/// holds two lines with the same key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: String,
    pub variant_id: Option<String>,
}

/// One line of the cart: value snapshots of the product and optional
/// variant taken at add time, plus the accumulated quantity.
///
/// Catalog changes after the add do not retroactively change the line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub variant: Option<ProductVariant>,
    /// Always >= 1 for a stored line; zero and below mean removal
    pub quantity: i32,
}

impl CartLine {
    /// Variant price when a variant is attached, else the product base price.
    pub fn unit_price(&self) -> Decimal {
        self.variant
            .as_ref()
            .map(|v| v.price)
            .unwrap_or(self.product.price)
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }

    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.id.clone(),
            variant_id: self.variant.as_ref().map(|v| v.id.clone()),
        }
    }

    pub fn matches(&self, product_id: &str, variant_id: Option<&str>) -> bool {
        self.product.id == product_id
            && self.variant.as_ref().map(|v| v.id.as_str()) == variant_id
    }
}

/// Outcome of associating the cart with a caller identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityChange {
    /// Candidate equals the stored identity
    Unchanged,
    /// Cart had no identity yet; lines are preserved
    Associated,
    /// Stored identity differed; lines were cleared
    Switched,
}

/// Serialized form of the cart's persistent subset.
///
/// Transient UI state (last-added line, panel flag) never persists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub id: Uuid,
    pub identity: Option<String>,
    pub lines: Vec<CartLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Checkout figures derived from the subtotal and the pricing policy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub shipping_total: Decimal,
    pub total: Decimal,
    pub currency: String,
}

/// The cart aggregate: an insertion-ordered collection of lines for the
/// active identity, plus transient notification-panel state.
#[derive(Clone, Debug)]
pub struct Cart {
    id: Uuid,
    identity: Option<String>,
    lines: Vec<CartLine>,
    last_added: Option<CartLine>,
    panel_open: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Creates an empty guest cart.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            identity: None,
            lines: Vec::new(),
            last_added: None,
            panel_open: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Restores a cart from its persisted snapshot. Transient state starts
    /// closed and empty.
    pub fn from_snapshot(snapshot: CartSnapshot) -> Self {
        Self {
            id: snapshot.id,
            identity: snapshot.identity,
            lines: snapshot.lines,
            last_added: None,
            panel_open: false,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        }
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            id: self.id,
            identity: self.identity.clone(),
            lines: self.lines.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn last_added(&self) -> Option<&CartLine> {
        self.last_added.as_ref()
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Associates the cart with the caller's identity.
    ///
    /// A cart that already belongs to a different identity is reset: lines,
    /// last-added snapshot, and panel state are all dropped before the new
    /// identity is stored. First association keeps the guest cart's lines.
    pub fn associate(&mut self, candidate: Option<&str>) -> IdentityChange {
        if self.identity.as_deref() == candidate {
            return IdentityChange::Unchanged;
        }
        let change = if self.identity.is_some() {
            self.lines.clear();
            self.last_added = None;
            self.panel_open = false;
            IdentityChange::Switched
        } else {
            IdentityChange::Associated
        };
        self.identity = candidate.map(str::to_owned);
        self.touch();
        change
    }

    /// Merges the product (and optional variant) into an existing line with
    /// the same key, or appends a new line. Returns the resulting line.
    ///
    /// The merge is additive: an existing line keeps its original snapshots
    /// and only its quantity grows. Rejects non-positive quantities and
    /// blank identifiers.
    pub fn add(
        &mut self,
        product: Product,
        variant: Option<ProductVariant>,
        quantity: i32,
    ) -> Result<&CartLine, CartError> {
        if quantity <= 0 {
            return Err(CartError::ValidationError(format!(
                "quantity must be positive, got {quantity}"
            )));
        }

        let mut product = product;
        product.id = product.id.trim().to_string();
        if product.id.is_empty() {
            return Err(CartError::InvalidProduct(
                "product id must not be blank".to_string(),
            ));
        }

        let mut variant = variant;
        if let Some(v) = variant.as_mut() {
            v.id = v.id.trim().to_string();
            if v.id.is_empty() {
                return Err(CartError::InvalidProduct(
                    "variant id must not be blank".to_string(),
                ));
            }
        }

        let variant_id = variant.as_ref().map(|v| v.id.clone());
        let index = match self
            .lines
            .iter()
            .position(|line| line.matches(&product.id, variant_id.as_deref()))
        {
            Some(i) => {
                let line = &mut self.lines[i];
                line.quantity = line.quantity.saturating_add(quantity);
                i
            }
            None => {
                self.lines.push(CartLine {
                    product,
                    variant,
                    quantity,
                });
                self.lines.len() - 1
            }
        };

        self.last_added = Some(self.lines[index].clone());
        self.touch();
        Ok(&self.lines[index])
    }

    /// Removes the line with the exact key. Idempotent: returns false
    /// without touching the cart when no line matches.
    pub fn remove(&mut self, product_id: &str, variant_id: Option<&str>) -> bool {
        let before = self.lines.len();
        self.lines
            .retain(|line| !line.matches(product_id, variant_id));
        let removed = self.lines.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Overwrites the matching line's quantity. Zero or negative delegates
    /// to removal. Returns false when no line matches.
    pub fn set_quantity(
        &mut self,
        product_id: &str,
        quantity: i32,
        variant_id: Option<&str>,
    ) -> bool {
        if quantity <= 0 {
            return self.remove(product_id, variant_id);
        }
        match self
            .lines
            .iter_mut()
            .find(|line| line.matches(product_id, variant_id))
        {
            Some(line) => {
                line.quantity = quantity;
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Full reset: lines, identity, and transient state are all forgotten.
    /// Stronger than an identity switch, which keeps the new identity.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.identity = None;
        self.last_added = None;
        self.panel_open = false;
        self.touch();
    }

    pub fn open_panel(&mut self) {
        self.panel_open = true;
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    /// Decimal-exact sum of line totals.
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total units across all lines, not the number of lines.
    pub fn item_count(&self) -> i32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::CartConfig;
use crate::entities::cart::{Cart, CartLine, CartSnapshot, CartTotals, IdentityChange};
use crate::entities::product::{Product, ProductVariant};
use crate::errors::CartError;
use crate::events::{Event, EventSender};
use crate::identity::IdentityProvider;
use crate::storage::CartStore;

/// Options for [`CartService::add_line`].
///
/// `open_panel` is tri-state: `None` falls back to the configured
/// `open_panel_on_add` default, `Some(false)` suppresses the panel (e.g. a
/// buy-now flow that registers the add without UI feedback), `Some(true)`
/// forces it open.
#[derive(Clone, Debug, Default)]
pub struct AddLineOptions {
    pub variant: Option<ProductVariant>,
    pub open_panel: Option<bool>,
}

impl AddLineOptions {
    pub fn with_variant(variant: ProductVariant) -> Self {
        Self {
            variant: Some(variant),
            open_panel: None,
        }
    }

    pub fn suppress_panel(mut self) -> Self {
        self.open_panel = Some(false);
        self
    }
}

/// Shopping cart engine.
///
/// Owns one [`Cart`] aggregate per session context and wires it to its
/// collaborators: the identity provider (resolved before every add so a
/// cart carried over from a previous session resets exactly once per
/// genuine identity change), the durable store (write-through after every
/// mutation; failures are logged, never surfaced through the mutation),
/// and the event channel.
///
/// All operations are synchronous; `&mut self` makes the single-mutator
/// discipline explicit. A concurrent embedding must wrap the service in a
/// per-identity lock, since merge-or-append is a check-then-act sequence.
pub struct CartService {
    cart: Cart,
    config: Arc<CartConfig>,
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn CartStore>,
    event_sender: EventSender,
}

impl CartService {
    /// Creates the engine, restoring any persisted cart from the store.
    ///
    /// Restore is fail-open: a store error or corrupted snapshot logs a
    /// warning and starts an empty cart rather than failing construction.
    pub fn new(
        config: Arc<CartConfig>,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn CartStore>,
        event_sender: EventSender,
    ) -> Self {
        let cart = match store.load() {
            Ok(Some(snapshot)) => Cart::from_snapshot(snapshot),
            Ok(None) => Cart::new(),
            Err(err) => {
                warn!(error = %err, "failed to restore persisted cart, starting empty");
                Cart::new()
            }
        };

        Self {
            cart,
            config,
            identity,
            store,
            event_sender,
        }
    }

    /// Re-reads the caller identity from the provider and associates the
    /// cart with it: a genuine switch clears the lines, a first association
    /// keeps them, a matching identity is a no-op.
    ///
    /// Called internally before every add; public so login/logout flows can
    /// drive the transition eagerly.
    #[instrument(skip(self))]
    pub fn sync_identity(&mut self) -> IdentityChange {
        let candidate = self.identity.current_identity();
        let change = self.cart.associate(candidate.as_deref());

        if change != IdentityChange::Unchanged {
            if change == IdentityChange::Switched {
                info!(cart_id = %self.cart.id(), "cart reset for new identity");
            }
            self.event_sender.send_or_log(Event::CartIdentityChanged {
                cart_id: self.cart.id(),
                identity: candidate,
            });
            self.persist();
        }
        change
    }

    /// Adds the product to the cart, merging additively into an existing
    /// line with the same `(product, variant)` identity or appending a new
    /// one. Sets the last-added snapshot and, unless suppressed, opens the
    /// notification panel.
    #[instrument(skip(self, product, options), fields(product_id = %product.id))]
    pub fn add_line(
        &mut self,
        product: Product,
        quantity: i32,
        options: AddLineOptions,
    ) -> Result<(), CartError> {
        self.sync_identity();

        let line = self.cart.add(product, options.variant, quantity)?;
        let product_id = line.product.id.clone();
        let variant_id = line.variant.as_ref().map(|v| v.id.clone());
        let merged_quantity = line.quantity;

        if options.open_panel.unwrap_or(self.config.open_panel_on_add) {
            self.cart.open_panel();
        }

        info!(
            cart_id = %self.cart.id(),
            product_id = %product_id,
            quantity = merged_quantity,
            "added line to cart"
        );
        self.event_sender.send_or_log(Event::CartLineAdded {
            cart_id: self.cart.id(),
            product_id,
            variant_id,
            quantity,
        });
        self.persist();
        Ok(())
    }

    /// Removes the line with the exact `(product, variant)` key. Idempotent:
    /// removing an absent line is a no-op.
    #[instrument(skip(self))]
    pub fn remove_line(&mut self, product_id: &str, variant_id: Option<&str>) {
        if self.cart.remove(product_id, variant_id) {
            info!(cart_id = %self.cart.id(), product_id, "removed line from cart");
            self.event_sender.send_or_log(Event::CartLineRemoved {
                cart_id: self.cart.id(),
                product_id: product_id.to_string(),
                variant_id: variant_id.map(str::to_owned),
            });
            self.persist();
        }
    }

    /// Overwrites the matching line's quantity; zero or negative removes
    /// the line instead. No-op when no line matches.
    ///
    /// Contrast with [`add_line`](Self::add_line), which accumulates: the
    /// quantity stepper sets, the add-to-cart button adds.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, product_id: &str, quantity: i32, variant_id: Option<&str>) {
        if quantity <= 0 {
            self.remove_line(product_id, variant_id);
            return;
        }
        if self.cart.set_quantity(product_id, quantity, variant_id) {
            self.event_sender.send_or_log(Event::CartQuantityUpdated {
                cart_id: self.cart.id(),
                product_id: product_id.to_string(),
                variant_id: variant_id.map(str::to_owned),
                quantity,
            });
            self.persist();
        }
    }

    /// Full reset back to an unassociated guest cart: lines, identity, and
    /// transient state are all dropped.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.cart.clear();
        info!(cart_id = %self.cart.id(), "cleared cart");
        self.event_sender
            .send_or_log(Event::CartCleared(self.cart.id()));
        self.persist();
    }

    pub fn open_panel(&mut self) {
        self.cart.open_panel();
    }

    pub fn close_panel(&mut self) {
        self.cart.close_panel();
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn last_added(&self) -> Option<&CartLine> {
        self.cart.last_added()
    }

    pub fn is_panel_open(&self) -> bool {
        self.cart.is_panel_open()
    }

    pub fn identity(&self) -> Option<&str> {
        self.cart.identity()
    }

    pub fn subtotal(&self) -> Decimal {
        self.cart.subtotal()
    }

    pub fn item_count(&self) -> i32 {
        self.cart.item_count()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.cart.snapshot()
    }

    /// Checkout figures layered on the subtotal: tax at the configured
    /// rate, free shipping at or above the threshold, flat rate below it,
    /// nothing to ship for an empty cart.
    pub fn totals(&self) -> CartTotals {
        let subtotal = self.cart.subtotal();
        let tax_total = subtotal * self.config.default_tax_rate;

        let shipping_total = if subtotal >= self.config.free_shipping_threshold {
            Decimal::ZERO
        } else if subtotal > Decimal::ZERO {
            self.config.flat_shipping_rate
        } else {
            Decimal::ZERO
        };

        let total = subtotal + tax_total + shipping_total;

        CartTotals {
            subtotal,
            tax_total,
            shipping_total,
            total,
            currency: self.config.currency.clone(),
        }
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.cart.snapshot()) {
            warn!(
                cart_id = %self.cart.id(),
                error = %err,
                "cart persistence failed, in-memory state remains authoritative"
            );
        }
    }
}

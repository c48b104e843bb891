#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use storefront_cart::{
    CartConfig, CartService, CartStore, Event, EventSender, InMemoryStore, Product,
    ProductVariant, StaticIdentity,
};
use tokio::sync::mpsc::UnboundedReceiver;

/// Everything an integration test needs to drive the engine.
pub struct TestEngine {
    pub service: CartService,
    pub identity: StaticIdentity,
    pub store: Arc<InMemoryStore>,
    pub events: UnboundedReceiver<Event>,
}

/// Routes engine logs through the test harness when RUST_LOG asks for them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn test_engine() -> TestEngine {
    engine_with_store(Arc::new(InMemoryStore::new()))
}

pub fn engine_with_store(store: Arc<InMemoryStore>) -> TestEngine {
    init_tracing();
    let identity = StaticIdentity::anonymous();
    let (sender, events) = EventSender::channel();
    let service = CartService::new(
        Arc::new(CartConfig::default()),
        Arc::new(identity.clone()),
        store.clone() as Arc<dyn CartStore>,
        sender,
    );
    TestEngine {
        service,
        identity,
        store,
        events,
    }
}

pub fn product(id: &str, price: Decimal) -> Product {
    Product::new(id, format!("Product {id}"), price)
}

pub fn variant(id: &str, price: Decimal) -> ProductVariant {
    ProductVariant::new(id, format!("Variant {id}"), price)
}

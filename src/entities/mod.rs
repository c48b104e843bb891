/// Cart engine entities
pub mod cart;
pub mod product;

// Re-export entities
pub use cart::{Cart, CartLine, CartSnapshot, CartTotals, IdentityChange, LineKey};
pub use product::{Product, ProductVariant};

/// Cart engine services
pub mod cart;

pub use cart::{AddLineOptions, CartService};

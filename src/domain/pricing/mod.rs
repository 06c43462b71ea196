//! Unit-price resolution with bounds checking and safe fallback

mod overrides;
mod resolver;

pub use overrides::PriceOverrides;
pub use resolver::{resolve_price, PriceRejection, PriceSpec};

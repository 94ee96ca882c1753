//! Tower defence shop built on weighted selection
//!
//! - [`roll_selection`] - Produce one selection of cards for a level and wave
//! - [`ShopSession`] - A player's shop: generator, offers, lock, purchases
//! - [`ShopSave`] - JSON save data for resuming a session

mod cards;
mod roll;
mod save;
mod session;

pub use cards::{ModuleCard, ShopOffer, TurretCard};
pub use roll::roll_selection;
pub use save::ShopSave;
pub use session::ShopSession;

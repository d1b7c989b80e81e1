//! Favorites - The per-identity set of saved item ids.
//!
//! [`FavoritesSync`] holds the set in memory and decides where it is
//! persisted: device-local storage while anonymous, the user's remote record
//! once signed in. On sign-in the two sets are unioned.

mod identity;
mod persist;
mod set;
mod sync;

pub use identity::Identity;
pub use persist::{PersistHandle, PersistMode, PersistOutcome};
pub use set::FavoritesSet;
pub use sync::{FavoritesSync, FAVORITES_CHANGED};

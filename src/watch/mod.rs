//! Watch - A shared cell that publishes every change to its subscribers.
//!
//! An `Observable` always holds a value. Subscribing delivers that value
//! first and then every value published afterwards, so a new subscriber
//! never has to wait for the next change to learn the current state.
//!
//! ## Example
//!
//! ```ignore
//! use shelfkeeper::watch::Observable;
//!
//! let cell = Observable::new(vec!["a".to_string()]);
//! let mut sub = cell.subscribe();
//! assert_eq!(sub.try_next(), Some(vec!["a".to_string()]));
//!
//! cell.set(vec![]);
//! assert_eq!(sub.try_next(), Some(vec![]));
//! ```

mod observable;
mod subscription;

pub use observable::Observable;
pub use subscription::{Derived, Subscription};

//! Method and event signatures, selectors, and call/return/log framing.

mod event;
mod method;
mod selector;

pub use event::Event;
pub use method::{Arg, Method};
pub use selector::{RETURN_PREFIX, SELECTOR_SIZE, Selector};

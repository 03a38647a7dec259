pub mod native;
pub mod uint;
pub mod value;

pub use native::Native;
pub use uint::{UFixed, Uint};
pub use value::{Address, Value};

pub(crate) use value::normalize_index;

#[cfg(test)]
mod native_test;

pub mod app;
pub mod debugging;
pub mod timing;

mod core_types;
pub use core_types::*;

#[doc(hidden)]
pub use log; // for debug_panic!

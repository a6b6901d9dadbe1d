mod euler;
pub use euler::*;

mod damping;
pub use damping::*;

mod transform;
pub use transform::*;

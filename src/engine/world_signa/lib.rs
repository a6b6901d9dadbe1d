mod node_index;
pub use node_index::*;

mod scene;
pub use scene::*;

pub mod gltf_import;

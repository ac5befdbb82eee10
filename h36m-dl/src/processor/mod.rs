//! Sample preprocessing building blocks.

pub mod augment;
pub mod crop;
pub mod remap;
pub mod voxel;

pub use augment::*;
pub use crop::*;
pub use remap::*;
pub use voxel::*;

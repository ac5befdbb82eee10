//! Dataset loading and sample assembly.

mod annotation;
mod dataset_;
mod h36m_;
mod record;
mod store;

pub use annotation::*;
pub use dataset_::*;
pub use h36m_::*;
pub use record::*;
pub use store::*;

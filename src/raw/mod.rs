mod arena;
mod handle;
mod node;
mod raw_rbtree;
mod validate;

pub use handle::Handle;
pub use node::Color;
pub(crate) use node::Side;
pub(crate) use raw_rbtree::RawRbTree;

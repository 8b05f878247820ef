mod arena;
mod erase;
mod handle;
mod insert;
mod node;
mod raw_rb_tree;
mod rotate;

pub(crate) use handle::Handle;
pub(crate) use insert::Slot;
pub(crate) use raw_rb_tree::RawRbTree;

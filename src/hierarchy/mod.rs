//! Hierarchical cluster index construction
//!
//! Turns a nested partition sequence into one flat index space:
//! `[leaves][level 0 clusters]...[coarsest level clusters][root]`.

pub mod allocator;
pub mod ancestors;
pub mod assembler;

pub use allocator::{IndexAllocator, LevelIndex};
pub use ancestors::AncestorChains;
pub use assembler::{AssemblyOptions, ClusterTree};

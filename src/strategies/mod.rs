//! Reordering strategies.
//!
//! Each strategy is a pure, stateless function over a scored chunk list.
//!
//! ```ascii
//! strategies/
//! ├── mod.rs            ─► re-exports
//! ├── score_spread.rs   ─► U-shaped interleave (default)
//! ├── preserve_order.rs ─► per-source document order (OP-RAG)
//! ├── chronological.rs  ─► timestamp ascending
//! └── custom.rs         ─► caller-supplied comparator
//! ```
//!
//! All sorts are stable with `original_index` as the final tie-breaker.

mod chronological;
mod custom;
mod preserve_order;
mod score_spread;

pub use chronological::chronological;
pub use custom::custom_sort;
pub use preserve_order::preserve_order;
pub use score_spread::score_spread;

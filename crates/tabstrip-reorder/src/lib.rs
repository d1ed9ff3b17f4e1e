// Drag-to-reorder engine for a tab strip: single tabs, multi-selections,
// whole groups, and drags that leave or enter the strip through native
// drag-and-drop.

mod delegate;
mod env;
mod settings;
mod strategy;
mod tests;
pub mod utils;

pub use delegate::{ObserverId, ReorderDelegate};
pub use env::ReorderEnv;
pub use settings::{EdgeScrollSettings, FolioMargins, ReorderSettings};
pub use strategy::StrategyKind;

pub mod walk;

pub use walk::{walk_tree, WalkOutcome, WalkOutput};

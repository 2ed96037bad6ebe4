pub mod aggregates;
pub mod parsers;
pub mod state;
pub mod styles;
pub mod timeline;
pub mod tree;
pub mod types;
pub mod view;

pub use tree::{build_tree, build_tree_with_diagnostics};
pub use types::{TraceNode, TreeDiagnostics};
pub use view::WorkflowView;

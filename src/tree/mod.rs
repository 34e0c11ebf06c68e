//! Postfix conversion, tree construction and tree optimization.

mod builder;
mod context;
mod element;
mod node;
mod optimizer;
mod postfix;

pub use builder::{BuildError, TreeBuilder};
pub use context::MathContext;
pub use element::MathElement;
pub use node::TreeNode;
pub use optimizer::TreeOptimizer;
pub use postfix::{InfixToPostfixTransformer, PostfixElement};

pub mod parser;
pub mod tree;

use thiserror::Error;

use parser::{ErrorCollector, ParserError, SyntaxParser, Tokenizer};
use tree::{
    BuildError, InfixToPostfixTransformer, MathContext, TreeBuilder, TreeNode, TreeOptimizer,
};

#[derive(Debug, Error)]
pub enum CompileError {
    /// The input itself is malformed; carries every problem found, ordered
    /// by source position.
    #[error("expression has {} syntax error(s), first: {}", .0.len(), .0[0])]
    Syntax(Vec<ParserError>),

    /// The input passed syntax validation but produced a postfix sequence
    /// that does not fold into a binary tree.
    #[error("expression structure error: {0}")]
    Internal(#[from] BuildError),
}

/// Runs the full pipeline: tokenize, validate, convert to postfix, build
/// the binary tree and optimize it.
pub fn compile(input: &str, context: &MathContext) -> Result<TreeNode, CompileError> {
    let mut errors = ErrorCollector::new();
    let tokens = Tokenizer::new(context).tokenize(input, &mut errors);
    let syntax_tokens = SyntaxParser::parse(tokens, &mut errors);
    if errors.has_errors() {
        return Err(CompileError::Syntax(errors.report()));
    }

    let postfix = InfixToPostfixTransformer::transform(&syntax_tokens);
    let tree = TreeBuilder::build(&postfix)?;
    Ok(TreeOptimizer::new(tree).optimize())
}

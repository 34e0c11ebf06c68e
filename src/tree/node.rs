use crate::tree::context::MathContext;
use crate::tree::element::MathElement;

/// A node of the binary expression tree. Leaves hold numbers or variables,
/// inner nodes hold operators or function names. The `brackets` flag records
/// that the node's subexpression was explicitly parenthesized in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub(crate) value: MathElement,
    pub(crate) left: Option<Box<TreeNode>>,
    pub(crate) right: Option<Box<TreeNode>>,
    pub(crate) brackets: bool,
}

impl TreeNode {
    pub fn new(value: MathElement, left: TreeNode, right: TreeNode) -> Self {
        Self {
            value,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
            brackets: false,
        }
    }

    pub fn leaf(value: MathElement) -> Self {
        Self {
            value,
            left: None,
            right: None,
            brackets: false,
        }
    }

    pub fn of_number(number: f64) -> Self {
        Self::leaf(MathElement::number(number))
    }

    pub fn with_brackets(mut self, brackets: bool) -> Self {
        self.brackets = brackets;
        self
    }

    pub fn value(&self) -> &MathElement {
        &self.value
    }

    pub fn left(&self) -> Option<&TreeNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&TreeNode> {
        self.right.as_deref()
    }

    pub fn has_brackets(&self) -> bool {
        self.brackets
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Longest root-to-leaf path, counting nodes. A leaf has height 1.
    pub fn height(&self) -> usize {
        let left = self.left().map_or(0, TreeNode::height);
        let right = self.right().map_or(0, TreeNode::height);
        1 + left.max(right)
    }

    /// Total number of nodes in the subtree.
    pub fn weight(&self) -> usize {
        let left = self.left().map_or(0, TreeNode::weight);
        let right = self.right().map_or(0, TreeNode::weight);
        1 + left + right
    }

    /// Evaluates the subtree. Variables resolve through the context and
    /// default to zero, as do function nodes and missing operands.
    pub fn compute(&self, context: &MathContext) -> f64 {
        match &self.value {
            // The lexer only produces digit/dot sequences, so parsing a
            // number leaf cannot fail on pipeline-built trees.
            MathElement::Number(text) => text.parse().unwrap_or(0.0),
            MathElement::Variable(name) => context.read_variable(name),
            MathElement::Function(_) => 0.0,
            operator => {
                let left = self.left().map_or(0.0, |n| n.compute(context));
                let right = self.right().map_or(0.0, |n| n.compute(context));
                match operator {
                    MathElement::Plus => left + right,
                    MathElement::Minus => left - right,
                    MathElement::Multiply => left * right,
                    MathElement::Divide => left / right,
                    _ => unreachable!("value kinds handled above"),
                }
            }
        }
    }

    /// Renders the subtree back to infix text. Only nodes that carry the
    /// brackets flag are parenthesized; a bare bracketed value like `(3)`
    /// carries the flag on its leaf.
    pub fn to_expression_string(&self) -> String {
        if self.is_leaf() {
            let symbol = self.value.symbol().to_string();
            return if self.brackets {
                format!("({})", symbol)
            } else {
                symbol
            };
        }
        let left = self.left().map_or(String::new(), |n| n.to_expression_string());
        let right = self.right().map_or(String::new(), |n| n.to_expression_string());
        match &self.value {
            MathElement::Function(name) => format!("{}({}, {})", name, left, right),
            operator => {
                let text = format!("{} {} {}", left, operator.symbol(), right);
                if self.brackets {
                    format!("({})", text)
                } else {
                    text
                }
            }
        }
    }

    /// Operator and function nodes grouped by their depth below the root.
    /// Levels that contain only leaves are omitted.
    pub fn operator_levels(&self) -> Vec<Vec<MathElement>> {
        let mut levels: Vec<Vec<MathElement>> = Vec::new();
        self.collect_levels(0, &mut levels);
        levels.retain(|level| !level.is_empty());
        levels
    }

    fn collect_levels(&self, depth: usize, levels: &mut Vec<Vec<MathElement>>) {
        if levels.len() <= depth {
            levels.resize(depth + 1, Vec::new());
        }
        if self.value.is_operator() {
            levels[depth].push(self.value.clone());
        }
        if let Some(left) = self.left() {
            left.collect_levels(depth + 1, levels);
        }
        if let Some(right) = self.right() {
            right.collect_levels(depth + 1, levels);
        }
    }
}

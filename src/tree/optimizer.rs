use log::debug;

use crate::tree::element::MathElement;
use crate::tree::node::TreeNode;

/// Algebraic simplification and rebalancing of an expression tree.
///
/// Simplification rules (constant folding, zero and one elimination, sign
/// normalization) run as one loop until the tree stops changing. The tree
/// then goes through the structural rewrites: subtraction chains become
/// additions, division chains become multiplications, the `+` and `*`
/// chains are rebalanced, and negated addends are folded back to
/// subtraction. The whole sequence is a fixpoint: running it on its own
/// output changes nothing.
pub struct TreeOptimizer {
    root: TreeNode,
}

impl TreeOptimizer {
    pub fn new(root: TreeNode) -> Self {
        Self { root }
    }

    pub fn optimize(self) -> TreeNode {
        let mut tree = self.root;
        loop {
            let previous = tree.clone();
            tree = Self::map_post_order(tree, &Self::fold_constants);
            tree = Self::map_post_order(tree, &Self::apply_zero_rules);
            tree = Self::map_post_order(tree, &Self::apply_one_rules);
            tree = Self::map_post_order(tree, &Self::normalize_negated_operand);
            if tree == previous {
                break;
            }
        }
        tree = Self::subtraction_to_addition(tree);
        tree = Self::map_post_order(tree, &Self::division_to_multiplication);
        // The rewrites can expose new constant operands, e.g. `1 / 2` split
        // off a division chain. Fold before rebalancing so subtree weights
        // are final.
        tree = Self::map_post_order(tree, &Self::fold_constants);
        tree = Self::rebalance(tree, &MathElement::Plus);
        tree = Self::rebalance(tree, &MathElement::Multiply);
        tree = Self::restore_subtraction(tree, false);
        debug!("optimized tree: {}", tree.to_expression_string());
        tree
    }

    fn map_post_order(node: TreeNode, rule: &dyn Fn(TreeNode) -> TreeNode) -> TreeNode {
        let TreeNode {
            value,
            left,
            right,
            brackets,
        } = node;
        let left = left.map(|n| Box::new(Self::map_post_order(*n, rule)));
        let right = right.map(|n| Box::new(Self::map_post_order(*n, rule)));
        rule(TreeNode {
            value,
            left,
            right,
            brackets,
        })
    }

    /// Folds `-` and `/` nodes over two number leaves into a single leaf.
    /// `+` and `*` are left alone so their chains stay available to the
    /// rebalancing pass.
    fn fold_constants(node: TreeNode) -> TreeNode {
        if !matches!(node.value, MathElement::Minus | MathElement::Divide) {
            return node;
        }
        let (left, right) = match (Self::leaf_number(node.left()), Self::leaf_number(node.right()))
        {
            (Some(left), Some(right)) => (left, right),
            _ => return node,
        };
        let folded = match node.value {
            MathElement::Minus => left - right,
            _ => left / right,
        };
        if folded.is_finite() {
            TreeNode::of_number(folded)
        } else {
            node
        }
    }

    fn apply_zero_rules(mut node: TreeNode) -> TreeNode {
        let left_zero = Self::leaf_equals(node.left(), 0.0);
        let right_zero = Self::leaf_equals(node.right(), 0.0);
        match node.value {
            MathElement::Multiply if left_zero || right_zero => TreeNode::of_number(0.0),
            MathElement::Divide if left_zero => TreeNode::of_number(0.0),
            MathElement::Plus if left_zero => Self::take_right(node),
            MathElement::Plus if right_zero => Self::take_left(node),
            MathElement::Minus if right_zero => Self::take_left(node),
            MathElement::Minus if left_zero => match node.right.take() {
                Some(right) => Self::negate(*right),
                None => node,
            },
            _ => node,
        }
    }

    fn apply_one_rules(mut node: TreeNode) -> TreeNode {
        let left_one = Self::leaf_equals(node.left(), 1.0);
        let left_minus_one = Self::leaf_equals(node.left(), -1.0);
        let right_one = Self::leaf_equals(node.right(), 1.0);
        let right_minus_one = Self::leaf_equals(node.right(), -1.0);
        match node.value {
            MathElement::Multiply | MathElement::Divide if right_one => Self::take_left(node),
            MathElement::Multiply | MathElement::Divide if right_minus_one => {
                match node.left.take() {
                    Some(left) => Self::negate(*left),
                    None => node,
                }
            }
            MathElement::Multiply if left_one => Self::take_right(node),
            MathElement::Multiply if left_minus_one => match node.right.take() {
                Some(right) => Self::negate(*right),
                None => node,
            },
            _ => node,
        }
    }

    /// Rewrites subtraction as addition of a negated operand wherever a
    /// `+`/`-` chain continues below, so chains like `a - b + c - d` become
    /// one `+` chain the rebalancer can collect. Applied root first: the
    /// rewrite exposes further chain links in its own left subtree.
    fn subtraction_to_addition(node: TreeNode) -> TreeNode {
        let node = if node.value == MathElement::Minus && Self::has_chain_child(&node) {
            let TreeNode {
                left,
                right,
                brackets,
                ..
            } = node;
            TreeNode {
                value: MathElement::Plus,
                left,
                right: right.map(|n| Box::new(Self::negate(*n))),
                brackets,
            }
        } else {
            node
        };
        let TreeNode {
            value,
            left,
            right,
            brackets,
        } = node;
        TreeNode {
            value,
            left: left.map(|n| Box::new(Self::subtraction_to_addition(*n))),
            right: right.map(|n| Box::new(Self::subtraction_to_addition(*n))),
            brackets,
        }
    }

    fn has_chain_child(node: &TreeNode) -> bool {
        [node.left(), node.right()].iter().any(|child| {
            child.is_some_and(|c| {
                matches!(c.value, MathElement::Plus | MathElement::Minus) && !c.brackets
            })
        })
    }

    /// Turns `x / y` into `x * (1 / y)` when `x` is itself a `/` or `*`
    /// node, flattening division chains into one `*` chain.
    fn division_to_multiplication(mut node: TreeNode) -> TreeNode {
        let chained = node.value == MathElement::Divide
            && node.left().is_some_and(|left| {
                matches!(left.value, MathElement::Divide | MathElement::Multiply)
                    && !left.brackets
            });
        if !chained {
            return node;
        }
        node.value = MathElement::Multiply;
        if let Some(right) = node.right.take() {
            node.right = Some(Box::new(TreeNode::new(
                MathElement::Divide,
                TreeNode::of_number(1.0),
                *right,
            )));
        }
        node
    }

    /// Rebalances every maximal unbracketed chain of `operator` into a
    /// height-minimal shape. Chain members are sorted by descending weight
    /// (stable, so equal weights keep their infix order) and refilled into
    /// the balanced skeleton left to right; the new root keeps the bracket
    /// flag of the old chain root.
    fn rebalance(node: TreeNode, operator: &MathElement) -> TreeNode {
        if node.value != *operator || node.is_leaf() {
            let TreeNode {
                value,
                left,
                right,
                brackets,
            } = node;
            return TreeNode {
                value,
                left: left.map(|n| Box::new(Self::rebalance(*n, operator))),
                right: right.map(|n| Box::new(Self::rebalance(*n, operator))),
                brackets,
            };
        }

        let brackets = node.brackets;
        let mut members = Vec::new();
        if let Some(left) = node.left {
            Self::collect_chain(*left, operator, &mut members);
        }
        if let Some(right) = node.right {
            Self::collect_chain(*right, operator, &mut members);
        }

        let mut members: Vec<TreeNode> = members
            .into_iter()
            .map(|member| {
                if member.value == *operator {
                    // A bracketed sub-chain: rebalance it as its own root.
                    Self::rebalance(member, operator)
                } else {
                    let TreeNode {
                        value,
                        left,
                        right,
                        brackets,
                    } = member;
                    TreeNode {
                        value,
                        left: left.map(|n| Box::new(Self::rebalance(*n, operator))),
                        right: right.map(|n| Box::new(Self::rebalance(*n, operator))),
                        brackets,
                    }
                }
            })
            .collect();
        members.sort_by(|a, b| b.weight().cmp(&a.weight()));

        Self::assemble(operator, members).with_brackets(brackets)
    }

    fn collect_chain(node: TreeNode, operator: &MathElement, members: &mut Vec<TreeNode>) {
        if node.value == *operator && !node.brackets && !node.is_leaf() {
            if let Some(left) = node.left {
                Self::collect_chain(*left, operator, members);
            }
            if let Some(right) = node.right {
                Self::collect_chain(*right, operator, members);
            }
        } else {
            members.push(node);
        }
    }

    /// Builds a balanced tree over the chain members: the left subtree gets
    /// the first half of the members, rounded up, the right subtree the rest.
    fn assemble(operator: &MathElement, mut members: Vec<TreeNode>) -> TreeNode {
        if members.len() == 1 {
            return members.remove(0);
        }
        let split = members.len().div_ceil(2);
        let right_members = members.split_off(split);
        TreeNode::new(
            operator.clone(),
            Self::assemble(operator, members),
            Self::assemble(operator, right_members),
        )
    }

    /// Turns `x - (-y)` into `x + y` so the negated operand can join an
    /// addition chain.
    fn normalize_negated_operand(mut node: TreeNode) -> TreeNode {
        let negated = node.value == MathElement::Minus
            && node
                .right()
                .is_some_and(|right| right.is_leaf() && right.value.is_negative_literal());
        if !negated {
            return node;
        }
        if let Some(mut right) = node.right.take() {
            right.value = Self::strip_sign(right.value);
            node.right = Some(right);
            node.value = MathElement::Plus;
        }
        node
    }

    /// Folds `x + (-y)` back to `x - y` when the negated operand is a leaf,
    /// undoing the cosmetic damage of the subtraction rewrite. A `+` node
    /// that is an inner link of a larger unbracketed `+` chain is left
    /// alone: rewriting it would change the chain the next rebalancing run
    /// collects. Skipped for two number leaves, which would form a foldable
    /// subtraction.
    fn restore_subtraction(mut node: TreeNode, parent_is_plus: bool) -> TreeNode {
        let inner_chain_link = parent_is_plus && !node.brackets;
        let restorable = node.value == MathElement::Plus
            && !inner_chain_link
            && node
                .right()
                .is_some_and(|right| right.is_leaf() && right.value.is_negative_literal())
            && !(Self::leaf_number(node.left()).is_some()
                && Self::leaf_number(node.right()).is_some());
        if restorable {
            if let Some(mut right) = node.right.take() {
                right.value = Self::strip_sign(right.value);
                node.right = Some(right);
                node.value = MathElement::Minus;
            }
        }
        let is_plus = node.value == MathElement::Plus;
        node.left = node
            .left
            .take()
            .map(|n| Box::new(Self::restore_subtraction(*n, is_plus)));
        node.right = node
            .right
            .take()
            .map(|n| Box::new(Self::restore_subtraction(*n, is_plus)));
        node
    }

    fn negate(mut node: TreeNode) -> TreeNode {
        match node.value {
            MathElement::Number(_) | MathElement::Variable(_) => {
                node.value = Self::toggle_sign(node.value);
                node
            }
            MathElement::Plus | MathElement::Minus => {
                if let Some(left) = node.left.take() {
                    node.left = Some(Box::new(Self::negate(*left)));
                }
                if let Some(right) = node.right.take() {
                    node.right = Some(Box::new(Self::negate(*right)));
                }
                node
            }
            MathElement::Multiply | MathElement::Divide => {
                if let Some(left) = node.left.take() {
                    node.left = Some(Box::new(Self::negate(*left)));
                }
                node
            }
            MathElement::Function(_) => {
                TreeNode::new(MathElement::Multiply, TreeNode::of_number(-1.0), node)
            }
        }
    }

    fn toggle_sign(element: MathElement) -> MathElement {
        let toggle = |text: String| {
            if let Some(stripped) = text.strip_prefix('-') {
                stripped.to_string()
            } else {
                format!("-{}", text)
            }
        };
        match element {
            MathElement::Number(text) => MathElement::Number(toggle(text)),
            MathElement::Variable(text) => MathElement::Variable(toggle(text)),
            other => other,
        }
    }

    fn strip_sign(element: MathElement) -> MathElement {
        match element {
            MathElement::Number(text) => {
                MathElement::Number(text.trim_start_matches('-').to_string())
            }
            MathElement::Variable(text) => {
                MathElement::Variable(text.trim_start_matches('-').to_string())
            }
            other => other,
        }
    }

    fn leaf_number(node: Option<&TreeNode>) -> Option<f64> {
        node.filter(|n| n.is_leaf())
            .and_then(|n| n.value.numeric_value())
    }

    fn leaf_equals(node: Option<&TreeNode>, expected: f64) -> bool {
        Self::leaf_number(node) == Some(expected)
    }

    fn take_left(mut node: TreeNode) -> TreeNode {
        match node.left.take() {
            Some(left) => *left,
            None => node,
        }
    }

    fn take_right(mut node: TreeNode) -> TreeNode {
        match node.right.take() {
            Some(right) => *right,
            None => node,
        }
    }
}

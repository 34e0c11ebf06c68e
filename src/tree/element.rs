/// A single value in the expression tree: either a leaf (number literal or
/// variable reference, both kept as literal text so a `-` sign prefix can be
/// baked in) or a binary operator. `^` survives parsing as `Function("^")`.
#[derive(Debug, Clone, PartialEq)]
pub enum MathElement {
    Number(String),
    Variable(String),
    Plus,
    Minus,
    Multiply,
    Divide,
    Function(String),
}

impl MathElement {
    pub fn number(value: f64) -> Self {
        MathElement::Number(value.to_string())
    }

    pub fn is_value(&self) -> bool {
        matches!(self, MathElement::Number(_) | MathElement::Variable(_))
    }

    pub fn is_operator(&self) -> bool {
        !self.is_value()
    }

    /// The source-text rendering of this element.
    pub fn symbol(&self) -> &str {
        match self {
            MathElement::Number(text) => text,
            MathElement::Variable(name) => name,
            MathElement::Plus => "+",
            MathElement::Minus => "-",
            MathElement::Multiply => "*",
            MathElement::Divide => "/",
            MathElement::Function(name) => name,
        }
    }

    /// Numeric value of a `Number` leaf, `None` for everything else.
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            MathElement::Number(text) => text.parse().ok(),
            _ => None,
        }
    }

    /// True for a `Number` or `Variable` leaf whose literal text carries a
    /// leading `-` sign.
    pub fn is_negative_literal(&self) -> bool {
        match self {
            MathElement::Number(text) | MathElement::Variable(text) => text.starts_with('-'),
            _ => false,
        }
    }
}

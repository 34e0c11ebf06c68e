use exprtree::tree::MathContext;
use exprtree::{compile, CompileError};
use std::collections::HashMap;

fn main() {
    pretty_env_logger::init();

    let context = MathContext::new(
        ["min", "max", "pow", "sqrt"],
        HashMap::from([
            ("price".to_string(), 120.0),
            ("volume".to_string(), 3000.0),
        ]),
    );

    let expressions = [
        "price * 2 + max(volume - 100, min(price, 50))",
        "1+2+3+4+5+6+7+8",
        "5040/8/7/6/5/4/3/2",
        "(price + 7) - (0 - volume)",
        "1 ++ 2 * (",
    ];

    for expression in expressions {
        match compile(expression, &context) {
            Ok(tree) => println!(
                "{:40} => {} (height {}, value {})",
                expression,
                tree.to_expression_string(),
                tree.height(),
                tree.compute(&context)
            ),
            Err(CompileError::Syntax(errors)) => {
                println!("{:40} => {} syntax error(s):", expression, errors.len());
                for error in errors {
                    println!("    {}", error);
                }
            }
            Err(error) => println!("{:40} => {}", expression, error),
        }
    }
}

use std::rc::Rc;
use std::time::Instant;

use pest::error::{Error, ErrorVariant};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::debug;

use super::ast::*;

#[derive(Parser)]
#[grammar = "parser/bundle_grammar.pest"] // relative to src
pub struct BundleParser;

pub type ParseError = Error<Rule>;

const TAB_WIDTH: usize = 2;

/// Renders the raw token tree for a source text; used by the CLI for
/// grammar debugging.
pub fn parse_to_token_tree(source: &str) -> Result<String, String> {
    let mut tree = vec![];
    let start = Instant::now();
    let result = BundleParser::parse(Rule::program, source);
    debug!(
        elapsed_ms = Instant::now().saturating_duration_since(start).as_millis(),
        "token tree parse finished"
    );

    match result {
        Ok(pairs) => {
            for pair in pairs {
                tree.push(pair_to_string(pair, 0).join("\n"));
            }
        }
        Err(e) => {
            return Err(format!("Parse error due to {}", e));
        }
    }
    Ok(tree.join("\n"))
}

fn pair_to_string(pair: Pair<Rule>, level: usize) -> Vec<String> {
    let mut tree = vec![];
    let span = pair.as_span();
    let rule_name = format!(
        "{:?} => ({},{}) #{:?}",
        pair.as_rule(),
        span.start(),
        span.end(),
        span.as_str()
    );
    let mut string_pads = String::with_capacity(level * TAB_WIDTH);
    for _ in 1..level * TAB_WIDTH + 1 {
        string_pads.push(' ');
    }
    tree.push(format!("{}{}", string_pads, rule_name));
    for child_pair in pair.into_inner() {
        tree.append(pair_to_string(child_pair, level + 1).as_mut());
    }
    tree
}

pub fn parse_to_ast(source: &str) -> Result<ProgramData, ParseError> {
    let mut pairs = BundleParser::parse(Rule::program, source)?;
    let program_pair = pairs.next().unwrap();
    let meta = span_to_meta(&program_pair);
    let mut body = vec![];
    for pair in program_pair.into_inner() {
        match pair.as_rule() {
            Rule::statement => body.push(build_ast_from_statement(pair)?),
            Rule::EOI => { /* Do nothing */ }
            _ => return Err(get_unexpected_error(1, &pair)),
        }
    }
    Ok(ProgramData { meta, body })
}

fn span_to_meta(pair: &Pair<Rule>) -> Meta {
    let span = pair.as_span();
    Meta {
        start_index: span.start(),
        end_index: span.end(),
    }
}

fn get_unexpected_error(id: i32, pair: &Pair<Rule>) -> ParseError {
    let message = format!("Unexpected state reached ({}) at rule {:?}", id, pair.as_rule());
    Error::new_from_span(ErrorVariant::CustomError { message }, pair.as_span())
}

fn get_validation_error(message: &str, pair: &Pair<Rule>) -> ParseError {
    Error::new_from_span(
        ErrorVariant::CustomError {
            message: message.to_string(),
        },
        pair.as_span(),
    )
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

fn build_ast_from_statement(pair: Pair<Rule>) -> Result<Statement, ParseError> {
    let inner_pair = pair.into_inner().next().unwrap();
    Ok(match inner_pair.as_rule() {
        Rule::variable_statement => build_ast_from_variable_statement(inner_pair)?,
        Rule::function_declaration => {
            Statement::FunctionDeclaration(build_function_data(inner_pair, true)?)
        }
        Rule::if_statement => build_ast_from_if_statement(inner_pair)?,
        Rule::while_statement => build_ast_from_while_statement(inner_pair)?,
        Rule::for_statement => build_ast_from_for_statement(inner_pair)?,
        Rule::return_statement => {
            let meta = span_to_meta(&inner_pair);
            let mut argument = None;
            for p in inner_pair.into_inner() {
                if p.as_rule() == Rule::expression {
                    argument = Some(build_ast_from_expression(p)?);
                }
            }
            Statement::ReturnStatement { meta, argument }
        }
        Rule::throw_statement => {
            let meta = span_to_meta(&inner_pair);
            let expr_pair = inner_pair
                .into_inner()
                .find(|p| p.as_rule() == Rule::expression)
                .unwrap();
            Statement::ThrowStatement {
                meta,
                argument: build_ast_from_expression(expr_pair)?,
            }
        }
        Rule::break_statement => Statement::BreakStatement {
            meta: span_to_meta(&inner_pair),
        },
        Rule::continue_statement => Statement::ContinueStatement {
            meta: span_to_meta(&inner_pair),
        },
        Rule::block_statement => {
            let meta = span_to_meta(&inner_pair);
            Statement::BlockStatement {
                meta,
                body: build_statement_list(inner_pair)?,
            }
        }
        Rule::empty_statement => Statement::EmptyStatement {
            meta: span_to_meta(&inner_pair),
        },
        Rule::expression_statement => {
            let meta = span_to_meta(&inner_pair);
            let expr_pair = inner_pair.into_inner().next().unwrap();
            Statement::ExpressionStatement {
                meta,
                expression: build_ast_from_expression(expr_pair)?,
            }
        }
        _ => return Err(get_unexpected_error(2, &inner_pair)),
    })
}

fn build_statement_list(pair: Pair<Rule>) -> Result<Vec<Statement>, ParseError> {
    let mut body = vec![];
    for p in pair.into_inner() {
        if p.as_rule() == Rule::statement {
            body.push(build_ast_from_statement(p)?);
        }
    }
    Ok(body)
}

fn declaration_kind_from_pair(pair: &Pair<Rule>) -> Result<DeclarationKind, ParseError> {
    Ok(match pair.as_str() {
        "var" => DeclarationKind::Var,
        "let" => DeclarationKind::Let,
        "const" => DeclarationKind::Const,
        _ => return Err(get_unexpected_error(3, pair)),
    })
}

fn build_ast_from_variable_statement(pair: Pair<Rule>) -> Result<Statement, ParseError> {
    let meta = span_to_meta(&pair);
    let mut pair_iter = pair.into_inner();
    let kind_pair = pair_iter.next().unwrap();
    let kind = declaration_kind_from_pair(&kind_pair)?;
    let mut declarations = vec![];
    for declarator_pair in pair_iter {
        if declarator_pair.as_rule() == Rule::variable_declarator {
            declarations.push(build_variable_declarator(declarator_pair)?);
        }
    }
    Ok(Statement::VariableDeclaration {
        meta,
        kind,
        declarations,
    })
}

fn build_variable_declarator(pair: Pair<Rule>) -> Result<VariableDeclaratorData, ParseError> {
    let mut name = String::new();
    let mut init = None;
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::identifier => name = p.as_str().to_string(),
            Rule::assign_token => { /* Do nothing */ }
            Rule::assignment_expression => init = Some(build_ast_from_expression(p)?),
            _ => return Err(get_unexpected_error(4, &p)),
        }
    }
    Ok(VariableDeclaratorData { name, init })
}

fn build_ast_from_if_statement(pair: Pair<Rule>) -> Result<Statement, ParseError> {
    let meta = span_to_meta(&pair);
    let mut test = None;
    let mut consequent = None;
    let mut alternate = None;
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::kw_if | Rule::kw_else => { /* Do nothing */ }
            Rule::expression => test = Some(build_ast_from_expression(p)?),
            Rule::statement => {
                let s = Box::new(build_ast_from_statement(p)?);
                if consequent.is_none() {
                    consequent = Some(s);
                } else {
                    alternate = Some(s);
                }
            }
            _ => return Err(get_unexpected_error(5, &p)),
        }
    }
    Ok(Statement::IfStatement {
        meta,
        test: test.unwrap(),
        consequent: consequent.unwrap(),
        alternate,
    })
}

fn build_ast_from_while_statement(pair: Pair<Rule>) -> Result<Statement, ParseError> {
    let meta = span_to_meta(&pair);
    let mut test = None;
    let mut body = None;
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::kw_while => { /* Do nothing */ }
            Rule::expression => test = Some(build_ast_from_expression(p)?),
            Rule::statement => body = Some(Box::new(build_ast_from_statement(p)?)),
            _ => return Err(get_unexpected_error(6, &p)),
        }
    }
    Ok(Statement::WhileStatement {
        meta,
        test: test.unwrap(),
        body: body.unwrap(),
    })
}

fn build_ast_from_for_statement(pair: Pair<Rule>) -> Result<Statement, ParseError> {
    let meta = span_to_meta(&pair);
    let mut init = None;
    let mut test = None;
    let mut update = None;
    let mut body = None;
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::kw_for => { /* Do nothing */ }
            Rule::for_init => init = Some(build_for_init(p)?),
            Rule::for_test => {
                let expr_pair = p.into_inner().next().unwrap();
                test = Some(build_ast_from_expression(expr_pair)?);
            }
            Rule::for_update => {
                let expr_pair = p.into_inner().next().unwrap();
                update = Some(build_ast_from_expression(expr_pair)?);
            }
            Rule::statement => body = Some(Box::new(build_ast_from_statement(p)?)),
            _ => return Err(get_unexpected_error(7, &p)),
        }
    }
    Ok(Statement::ForStatement {
        meta,
        init,
        test,
        update,
        body: body.unwrap(),
    })
}

fn build_for_init(pair: Pair<Rule>) -> Result<ForInit, ParseError> {
    let inner_pair = pair.into_inner().next().unwrap();
    Ok(match inner_pair.as_rule() {
        Rule::for_declaration => {
            let mut pair_iter = inner_pair.into_inner();
            let kind_pair = pair_iter.next().unwrap();
            let kind = declaration_kind_from_pair(&kind_pair)?;
            let mut declarations = vec![];
            for declarator_pair in pair_iter {
                if declarator_pair.as_rule() == Rule::variable_declarator {
                    declarations.push(build_variable_declarator(declarator_pair)?);
                }
            }
            ForInit::Declaration { kind, declarations }
        }
        Rule::expression => ForInit::Expression(build_ast_from_expression(inner_pair)?),
        _ => return Err(get_unexpected_error(8, &inner_pair)),
    })
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

fn build_ast_from_expression(pair: Pair<Rule>) -> Result<ExpressionType, ParseError> {
    match pair.as_rule() {
        Rule::expression | Rule::paren_expression => {
            build_ast_from_expression(pair.into_inner().next().unwrap())
        }
        Rule::assignment_expression => build_ast_from_assignment_expression(pair),
        Rule::conditional_expression => build_ast_from_conditional_expression(pair),
        Rule::logical_or_expression | Rule::logical_and_expression => {
            build_ast_from_logical_chain(pair)
        }
        Rule::equality_expression
        | Rule::relational_expression
        | Rule::additive_expression
        | Rule::multiplicative_expression => build_ast_from_binary_chain(pair),
        Rule::unary_expression => build_ast_from_unary_expression(pair),
        Rule::postfix_expression => build_ast_from_postfix_expression(pair),
        Rule::call_expression => build_ast_from_call_expression(pair),
        Rule::new_expression => build_ast_from_new_expression(pair),
        Rule::primary_expression => build_ast_from_primary_expression(pair),
        _ => Err(get_unexpected_error(9, &pair)),
    }
}

fn is_assignment_target(expr: &ExpressionType) -> bool {
    matches!(
        expr,
        ExpressionType::Identifier(_) | ExpressionType::MemberExpression(_)
    )
}

fn build_ast_from_assignment_expression(pair: Pair<Rule>) -> Result<ExpressionType, ParseError> {
    let meta = span_to_meta(&pair);
    let mut pair_iter = pair.into_inner();
    let target_pair = pair_iter.next().unwrap();
    let operator_pair = match pair_iter.next() {
        Some(p) => p,
        None => return build_ast_from_expression(target_pair),
    };
    let target = build_ast_from_expression(target_pair.clone())?;
    if !is_assignment_target(&target) {
        return Err(get_validation_error(
            "invalid assignment target",
            &target_pair,
        ));
    }
    let operator = match operator_pair.as_str() {
        "=" => AssignmentOperator::Equals,
        "+=" => AssignmentOperator::AddEquals,
        "-=" => AssignmentOperator::SubtractEquals,
        _ => return Err(get_unexpected_error(10, &operator_pair)),
    };
    let value_pair = pair_iter.next().unwrap();
    Ok(ExpressionType::AssignmentExpression {
        meta,
        operator,
        target: Box::new(target),
        value: Box::new(build_ast_from_expression(value_pair)?),
    })
}

fn build_ast_from_conditional_expression(pair: Pair<Rule>) -> Result<ExpressionType, ParseError> {
    let meta = span_to_meta(&pair);
    let mut pair_iter = pair.into_inner();
    let test_pair = pair_iter.next().unwrap();
    match pair_iter.next() {
        None => build_ast_from_expression(test_pair),
        Some(consequent_pair) => {
            let alternate_pair = pair_iter.next().unwrap();
            Ok(ExpressionType::ConditionalExpression {
                meta,
                test: Box::new(build_ast_from_expression(test_pair)?),
                consequent: Box::new(build_ast_from_expression(consequent_pair)?),
                alternate: Box::new(build_ast_from_expression(alternate_pair)?),
            })
        }
    }
}

fn build_ast_from_logical_chain(pair: Pair<Rule>) -> Result<ExpressionType, ParseError> {
    let mut pair_iter = pair.into_inner();
    let mut expr = build_ast_from_expression(pair_iter.next().unwrap())?;
    while let Some(op_pair) = pair_iter.next() {
        let operator = match op_pair.as_str() {
            "||" => LogicalOperator::Or,
            "&&" => LogicalOperator::And,
            _ => return Err(get_unexpected_error(11, &op_pair)),
        };
        let rhs = build_ast_from_expression(pair_iter.next().unwrap())?;
        let meta = Meta {
            start_index: expr.get_meta().start_index,
            end_index: rhs.get_meta().end_index,
        };
        expr = ExpressionType::LogicalExpression {
            meta,
            operator,
            left: Box::new(expr),
            right: Box::new(rhs),
        };
    }
    Ok(expr)
}

fn build_ast_from_binary_chain(pair: Pair<Rule>) -> Result<ExpressionType, ParseError> {
    let mut pair_iter = pair.into_inner();
    let mut expr = build_ast_from_expression(pair_iter.next().unwrap())?;
    while let Some(op_pair) = pair_iter.next() {
        let operator = match op_pair.as_str() {
            "==" => BinaryOperator::LooselyEqual,
            "!=" => BinaryOperator::LooselyUnequal,
            "===" => BinaryOperator::StrictlyEqual,
            "!==" => BinaryOperator::StrictlyUnequal,
            "<" => BinaryOperator::LessThan,
            "<=" => BinaryOperator::LessThanEqual,
            ">" => BinaryOperator::GreaterThan,
            ">=" => BinaryOperator::GreaterThanEqual,
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Subtract,
            "*" => BinaryOperator::Multiply,
            "/" => BinaryOperator::Divide,
            "%" => BinaryOperator::Modulo,
            _ => return Err(get_unexpected_error(12, &op_pair)),
        };
        let rhs = build_ast_from_expression(pair_iter.next().unwrap())?;
        let meta = Meta {
            start_index: expr.get_meta().start_index,
            end_index: rhs.get_meta().end_index,
        };
        expr = ExpressionType::BinaryExpression {
            meta,
            operator,
            left: Box::new(expr),
            right: Box::new(rhs),
        };
    }
    Ok(expr)
}

fn build_ast_from_unary_expression(pair: Pair<Rule>) -> Result<ExpressionType, ParseError> {
    let meta = span_to_meta(&pair);
    let mut pair_iter = pair.into_inner();
    let first_pair = pair_iter.next().unwrap();
    match first_pair.as_rule() {
        Rule::unary_operator => {
            // The operator span can carry trailing whitespace ("- x").
            let operator = match first_pair.as_str().trim_end() {
                "typeof" => UnaryOperator::TypeOf,
                "!" => UnaryOperator::LogicalNot,
                "-" => UnaryOperator::Minus,
                "+" => UnaryOperator::Plus,
                _ => return Err(get_unexpected_error(13, &first_pair)),
            };
            let argument = build_ast_from_expression(pair_iter.next().unwrap())?;
            Ok(ExpressionType::UnaryExpression {
                meta,
                operator,
                argument: Box::new(argument),
            })
        }
        Rule::postfix_expression => build_ast_from_expression(first_pair),
        _ => Err(get_unexpected_error(14, &first_pair)),
    }
}

fn build_ast_from_postfix_expression(pair: Pair<Rule>) -> Result<ExpressionType, ParseError> {
    let meta = span_to_meta(&pair);
    let mut pair_iter = pair.into_inner();
    let target_pair = pair_iter.next().unwrap();
    match pair_iter.next() {
        None => build_ast_from_expression(target_pair),
        Some(op_pair) => {
            let target = build_ast_from_expression(target_pair.clone())?;
            if !is_assignment_target(&target) {
                return Err(get_validation_error(
                    "invalid increment/decrement target",
                    &target_pair,
                ));
            }
            let operator = match op_pair.as_str() {
                "++" => UpdateOperator::PlusPlus,
                "--" => UpdateOperator::MinusMinus,
                _ => return Err(get_unexpected_error(15, &op_pair)),
            };
            Ok(ExpressionType::UpdateExpression {
                meta,
                operator,
                target: Box::new(target),
            })
        }
    }
}

fn build_ast_from_call_expression(pair: Pair<Rule>) -> Result<ExpressionType, ParseError> {
    let mut pair_iter = pair.into_inner();
    let mut expr = build_ast_from_expression(pair_iter.next().unwrap())?;
    for suffix_pair in pair_iter {
        let end_index = suffix_pair.as_span().end();
        let meta = Meta {
            start_index: expr.get_meta().start_index,
            end_index,
        };
        expr = apply_suffix(expr, suffix_pair.into_inner().next().unwrap(), meta)?;
    }
    Ok(expr)
}

fn apply_suffix(
    callee_or_object: ExpressionType,
    suffix_pair: Pair<Rule>,
    meta: Meta,
) -> Result<ExpressionType, ParseError> {
    Ok(match suffix_pair.as_rule() {
        Rule::call_suffix => ExpressionType::CallExpression {
            meta,
            callee: Box::new(callee_or_object),
            arguments: build_argument_list(suffix_pair)?,
        },
        Rule::dot_suffix => {
            let name_pair = suffix_pair.into_inner().next().unwrap();
            ExpressionType::MemberExpression(MemberExpressionData {
                meta,
                object: Box::new(callee_or_object),
                key: MemberKey::Simple(name_pair.as_str().to_string()),
            })
        }
        Rule::index_suffix => {
            let index_pair = suffix_pair.into_inner().next().unwrap();
            ExpressionType::MemberExpression(MemberExpressionData {
                meta,
                object: Box::new(callee_or_object),
                key: MemberKey::Computed(Box::new(build_ast_from_expression(index_pair)?)),
            })
        }
        _ => return Err(get_unexpected_error(16, &suffix_pair)),
    })
}

fn build_argument_list(call_suffix_pair: Pair<Rule>) -> Result<Vec<ExpressionType>, ParseError> {
    let mut arguments = vec![];
    if let Some(list_pair) = call_suffix_pair.into_inner().next() {
        for arg_pair in list_pair.into_inner() {
            arguments.push(build_ast_from_expression(arg_pair)?);
        }
    }
    Ok(arguments)
}

fn build_ast_from_new_expression(pair: Pair<Rule>) -> Result<ExpressionType, ParseError> {
    let meta = span_to_meta(&pair);
    let mut pair_iter = pair.into_inner();
    let kw_pair = pair_iter.next().unwrap();
    if kw_pair.as_rule() != Rule::kw_new {
        return Err(get_unexpected_error(17, &kw_pair));
    }
    let mut callee = build_ast_from_expression(pair_iter.next().unwrap())?;
    let mut arguments = vec![];
    for suffix_pair in pair_iter {
        match suffix_pair.as_rule() {
            Rule::dot_suffix | Rule::index_suffix => {
                let end_index = suffix_pair.as_span().end();
                let member_meta = Meta {
                    start_index: callee.get_meta().start_index,
                    end_index,
                };
                callee = apply_suffix(callee, suffix_pair, member_meta)?;
            }
            Rule::call_suffix => arguments = build_argument_list(suffix_pair)?,
            _ => return Err(get_unexpected_error(18, &suffix_pair)),
        }
    }
    Ok(ExpressionType::NewExpression {
        meta,
        callee: Box::new(callee),
        arguments,
    })
}

fn build_ast_from_primary_expression(pair: Pair<Rule>) -> Result<ExpressionType, ParseError> {
    let inner_pair = pair.into_inner().next().unwrap();
    Ok(match inner_pair.as_rule() {
        Rule::literal => ExpressionType::Literal(build_ast_from_literal(inner_pair)?),
        Rule::array_literal => {
            let meta = span_to_meta(&inner_pair);
            let mut elements = vec![];
            for element_pair in inner_pair.into_inner() {
                elements.push(build_ast_from_expression(element_pair)?);
            }
            ExpressionType::ArrayExpression { meta, elements }
        }
        Rule::object_literal => {
            let meta = span_to_meta(&inner_pair);
            let mut properties = vec![];
            for property_pair in inner_pair.into_inner() {
                properties.push(build_ast_from_property(property_pair)?);
            }
            ExpressionType::ObjectExpression { meta, properties }
        }
        Rule::function_expression => {
            ExpressionType::FunctionExpression(build_function_data(inner_pair, false)?)
        }
        Rule::kw_this => ExpressionType::ThisExpression {
            meta: span_to_meta(&inner_pair),
        },
        Rule::identifier => ExpressionType::Identifier(IdentifierData {
            name: inner_pair.as_str().to_string(),
            meta: span_to_meta(&inner_pair),
        }),
        Rule::paren_expression => build_ast_from_expression(inner_pair)?,
        _ => return Err(get_unexpected_error(19, &inner_pair)),
    })
}

fn build_ast_from_property(pair: Pair<Rule>) -> Result<PropertyData, ParseError> {
    let mut pair_iter = pair.into_inner();
    let key_pair = pair_iter.next().unwrap();
    let key = build_property_key(key_pair)?;
    let value_pair = pair_iter.next().unwrap();
    Ok(PropertyData {
        key,
        value: build_ast_from_expression(value_pair)?,
    })
}

fn build_property_key(pair: Pair<Rule>) -> Result<String, ParseError> {
    let inner_pair = pair.into_inner().next().unwrap();
    match inner_pair.as_rule() {
        Rule::identifier_name => Ok(inner_pair.as_str().to_string()),
        Rule::string_literal => build_string_value(inner_pair),
        _ => Err(get_unexpected_error(20, &inner_pair)),
    }
}

fn build_function_data(pair: Pair<Rule>, name_required: bool) -> Result<FunctionData, ParseError> {
    let meta = span_to_meta(&pair);
    let error_pair = pair.clone();
    let mut name = None;
    let mut params = vec![];
    let mut body = vec![];
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::kw_function => { /* Do nothing */ }
            Rule::identifier => name = Some(p.as_str().to_string()),
            Rule::parameter_list => {
                for param_pair in p.into_inner() {
                    params.push(param_pair.as_str().to_string());
                }
            }
            Rule::function_body => body = build_statement_list(p)?,
            _ => return Err(get_unexpected_error(21, &p)),
        }
    }
    if name_required && name.is_none() {
        return Err(get_validation_error(
            "function declaration requires a name",
            &error_pair,
        ));
    }
    Ok(FunctionData {
        meta,
        name,
        params,
        body: Rc::new(body),
    })
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

fn build_ast_from_literal(pair: Pair<Rule>) -> Result<LiteralData, ParseError> {
    let meta = span_to_meta(&pair);
    let inner_pair = pair.into_inner().next().unwrap();
    let value = match inner_pair.as_rule() {
        Rule::null_literal => LiteralType::NullLiteral,
        Rule::undefined_literal => LiteralType::UndefinedLiteral,
        Rule::boolean_literal => LiteralType::BooleanLiteral(inner_pair.as_str() == "true"),
        Rule::numeric_literal => LiteralType::NumberLiteral(build_numeric_value(inner_pair)?),
        Rule::string_literal => LiteralType::StringLiteral(build_string_value(inner_pair)?),
        _ => return Err(get_unexpected_error(22, &inner_pair)),
    };
    Ok(LiteralData { meta, value })
}

fn build_numeric_value(pair: Pair<Rule>) -> Result<NumberLiteralType, ParseError> {
    let inner_pair = pair.into_inner().next().unwrap();
    Ok(match inner_pair.as_rule() {
        Rule::hex_literal => {
            let digits = &inner_pair.as_str()[2..];
            match i64::from_str_radix(digits, 16) {
                Ok(i) => NumberLiteralType::IntegerLiteral(i),
                // Past i64: fall back to the float form like decimal
                // literals do.
                Err(_) => {
                    let value = digits.chars().fold(0f64, |acc, c| {
                        acc * 16.0 + c.to_digit(16).unwrap_or(0) as f64
                    });
                    NumberLiteralType::FloatLiteral(value)
                }
            }
        }
        Rule::float_literal => match inner_pair.as_str().parse::<f64>() {
            Ok(f) => NumberLiteralType::FloatLiteral(f),
            Err(_) => {
                return Err(get_validation_error("malformed number literal", &inner_pair))
            }
        },
        Rule::integer_literal => {
            let s = inner_pair.as_str();
            match s.parse::<i64>() {
                Ok(i) => NumberLiteralType::IntegerLiteral(i),
                // Past i64: fall back to the float form like an engine would.
                Err(_) => match s.parse::<f64>() {
                    Ok(f) => NumberLiteralType::FloatLiteral(f),
                    Err(_) => {
                        return Err(get_validation_error(
                            "malformed number literal",
                            &inner_pair,
                        ))
                    }
                },
            }
        }
        _ => return Err(get_unexpected_error(23, &inner_pair)),
    })
}

fn build_string_value(pair: Pair<Rule>) -> Result<String, ParseError> {
    let chars_pair = pair.into_inner().next().unwrap();
    let raw = chars_pair.as_str();
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let mut code = String::new();
                for _ in 0..4 {
                    match chars.next() {
                        Some(h) => code.push(h),
                        None => {
                            return Err(get_validation_error(
                                "truncated unicode escape",
                                &chars_pair,
                            ))
                        }
                    }
                }
                let scalar = u32::from_str_radix(&code, 16)
                    .ok()
                    .and_then(char::from_u32);
                match scalar {
                    Some(ch) => out.push(ch),
                    None => {
                        return Err(get_validation_error(
                            "invalid unicode escape",
                            &chars_pair,
                        ))
                    }
                }
            }
            // Unknown escapes keep the escaped character, like `\'` or `\\`.
            Some(other) => out.push(other),
            None => {
                return Err(get_validation_error("truncated escape sequence", &chars_pair))
            }
        }
    }
    Ok(out)
}

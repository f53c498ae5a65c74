use std::fmt::Debug;
use std::rc::Rc;

/// Source span of a node, as byte offsets into the parsed text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Meta {
    pub start_index: usize,
    pub end_index: usize,
}

pub trait HasMeta {
    fn get_meta(&self) -> &Meta;
}

#[derive(Debug)]
pub struct IdentifierData {
    pub name: String,
    pub meta: Meta,
}

#[derive(Debug)]
pub struct LiteralData {
    pub meta: Meta,
    pub value: LiteralType,
}

#[derive(Debug)]
pub enum LiteralType {
    StringLiteral(String),
    BooleanLiteral(bool),
    NullLiteral,
    UndefinedLiteral,
    NumberLiteral(NumberLiteralType),
}

#[derive(Debug)]
pub enum NumberLiteralType {
    IntegerLiteral(i64),
    FloatLiteral(f64),
}

/// Function declaration or expression: shared shape, the body behind `Rc`
/// so closures can hold it without cloning statements.
#[derive(Debug)]
pub struct FunctionData {
    pub meta: Meta,
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Rc<Vec<Statement>>,
}

#[derive(Debug)]
pub struct PropertyData {
    pub key: String,
    pub value: ExpressionType,
}

#[derive(Debug)]
pub enum MemberKey {
    /// `obj.name` access, including reserved names like `exports.default`.
    Simple(String),
    /// `obj[expr]` access.
    Computed(Box<ExpressionType>),
}

#[derive(Debug)]
pub struct MemberExpressionData {
    pub meta: Meta,
    pub object: Box<ExpressionType>,
    pub key: MemberKey,
}

#[derive(Debug)]
pub enum ExpressionType {
    Literal(LiteralData),
    Identifier(IdentifierData),
    ThisExpression {
        meta: Meta,
    },
    ArrayExpression {
        meta: Meta,
        elements: Vec<ExpressionType>,
    },
    ObjectExpression {
        meta: Meta,
        properties: Vec<PropertyData>,
    },
    FunctionExpression(FunctionData),
    MemberExpression(MemberExpressionData),
    UnaryExpression {
        meta: Meta,
        operator: UnaryOperator,
        argument: Box<ExpressionType>,
    },
    UpdateExpression {
        meta: Meta,
        operator: UpdateOperator,
        target: Box<ExpressionType>,
    },
    BinaryExpression {
        meta: Meta,
        operator: BinaryOperator,
        left: Box<ExpressionType>,
        right: Box<ExpressionType>,
    },
    LogicalExpression {
        meta: Meta,
        operator: LogicalOperator,
        left: Box<ExpressionType>,
        right: Box<ExpressionType>,
    },
    AssignmentExpression {
        meta: Meta,
        operator: AssignmentOperator,
        target: Box<ExpressionType>,
        value: Box<ExpressionType>,
    },
    ConditionalExpression {
        meta: Meta,
        test: Box<ExpressionType>,
        consequent: Box<ExpressionType>,
        alternate: Box<ExpressionType>,
    },
    CallExpression {
        meta: Meta,
        callee: Box<ExpressionType>,
        arguments: Vec<ExpressionType>,
    },
    NewExpression {
        meta: Meta,
        callee: Box<ExpressionType>,
        arguments: Vec<ExpressionType>,
    },
}

impl HasMeta for ExpressionType {
    fn get_meta(&self) -> &Meta {
        match self {
            ExpressionType::Literal(data) => &data.meta,
            ExpressionType::Identifier(data) => &data.meta,
            ExpressionType::ThisExpression { meta } => meta,
            ExpressionType::ArrayExpression { meta, .. } => meta,
            ExpressionType::ObjectExpression { meta, .. } => meta,
            ExpressionType::FunctionExpression(data) => &data.meta,
            ExpressionType::MemberExpression(data) => &data.meta,
            ExpressionType::UnaryExpression { meta, .. } => meta,
            ExpressionType::UpdateExpression { meta, .. } => meta,
            ExpressionType::BinaryExpression { meta, .. } => meta,
            ExpressionType::LogicalExpression { meta, .. } => meta,
            ExpressionType::AssignmentExpression { meta, .. } => meta,
            ExpressionType::ConditionalExpression { meta, .. } => meta,
            ExpressionType::CallExpression { meta, .. } => meta,
            ExpressionType::NewExpression { meta, .. } => meta,
        }
    }
}

#[derive(Debug)]
pub enum AssignmentOperator {
    Equals,
    AddEquals,
    SubtractEquals,
}

#[derive(Debug)]
pub enum UnaryOperator {
    Minus,
    Plus,
    LogicalNot,
    TypeOf,
}

#[derive(Debug)]
pub enum UpdateOperator {
    PlusPlus,
    MinusMinus,
}

#[derive(Debug)]
pub enum BinaryOperator {
    LooselyEqual,
    LooselyUnequal,
    StrictlyEqual,
    StrictlyUnequal,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

#[derive(Debug)]
pub enum LogicalOperator {
    Or,
    And,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

#[derive(Debug)]
pub struct VariableDeclaratorData {
    pub name: String,
    pub init: Option<ExpressionType>,
}

#[derive(Debug)]
pub enum ForInit {
    Declaration {
        kind: DeclarationKind,
        declarations: Vec<VariableDeclaratorData>,
    },
    Expression(ExpressionType),
}

#[derive(Debug)]
pub enum Statement {
    VariableDeclaration {
        meta: Meta,
        kind: DeclarationKind,
        declarations: Vec<VariableDeclaratorData>,
    },
    FunctionDeclaration(FunctionData),
    ExpressionStatement {
        meta: Meta,
        expression: ExpressionType,
    },
    IfStatement {
        meta: Meta,
        test: ExpressionType,
        consequent: Box<Statement>,
        alternate: Option<Box<Statement>>,
    },
    WhileStatement {
        meta: Meta,
        test: ExpressionType,
        body: Box<Statement>,
    },
    ForStatement {
        meta: Meta,
        init: Option<ForInit>,
        test: Option<ExpressionType>,
        update: Option<ExpressionType>,
        body: Box<Statement>,
    },
    ReturnStatement {
        meta: Meta,
        argument: Option<ExpressionType>,
    },
    ThrowStatement {
        meta: Meta,
        argument: ExpressionType,
    },
    BreakStatement {
        meta: Meta,
    },
    ContinueStatement {
        meta: Meta,
    },
    BlockStatement {
        meta: Meta,
        body: Vec<Statement>,
    },
    EmptyStatement {
        meta: Meta,
    },
}

impl HasMeta for Statement {
    fn get_meta(&self) -> &Meta {
        match self {
            Statement::VariableDeclaration { meta, .. } => meta,
            Statement::FunctionDeclaration(data) => &data.meta,
            Statement::ExpressionStatement { meta, .. } => meta,
            Statement::IfStatement { meta, .. } => meta,
            Statement::WhileStatement { meta, .. } => meta,
            Statement::ForStatement { meta, .. } => meta,
            Statement::ReturnStatement { meta, .. } => meta,
            Statement::ThrowStatement { meta, .. } => meta,
            Statement::BreakStatement { meta } => meta,
            Statement::ContinueStatement { meta } => meta,
            Statement::BlockStatement { meta, .. } => meta,
            Statement::EmptyStatement { meta } => meta,
        }
    }
}

#[derive(Debug)]
pub struct ProgramData {
    pub meta: Meta,
    pub body: Vec<Statement>,
}

impl HasMeta for ProgramData {
    fn get_meta(&self) -> &Meta {
        &self.meta
    }
}

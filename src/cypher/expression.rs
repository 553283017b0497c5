use std::collections::BTreeMap;
use std::fmt;

use crate::cypher::ast::PatternElement;
use crate::pgsql::annotations::{
    AnnotatedKindMatcher, AnnotatedLiteral, AnnotatedParameter, AnnotatedPropertyLookup,
    AnnotatedVariable, EdgeEndpointReference, EdgeKindReference, Entity, NodeKindsReference,
    PropertiesReference, Subquery,
};
use crate::pgsql::types::CypherValue;

/// The closed expression node set. The first group of variants is what the
/// parser produces; the second group is introduced by the binder and the
/// rewrite passes. Every pass and the emitter dispatch over this enum
/// exhaustively, so an AST shape a step does not recognize surfaces as a
/// descriptive error instead of being dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Variable(Variable),
    Parameter(Parameter),
    PropertyLookup(PropertyLookup),
    Comparison(Comparison),
    Conjunction(Vec<Expression>),
    Disjunction(Vec<Expression>),
    ExclusiveDisjunction(Vec<Expression>),
    Negation(Box<Expression>),
    Parenthetical(Box<Expression>),
    FunctionInvocation(FunctionInvocation),
    KindMatcher(KindMatcher),
    PatternPredicate(PatternPredicate),

    AnnotatedLiteral(AnnotatedLiteral),
    AnnotatedVariable(AnnotatedVariable),
    AnnotatedParameter(AnnotatedParameter),
    AnnotatedPropertyLookup(AnnotatedPropertyLookup),
    AnnotatedKindMatcher(AnnotatedKindMatcher),
    Entity(Entity),
    NodeKindsReference(NodeKindsReference),
    EdgeKindReference(EdgeKindReference),
    PropertiesReference(PropertiesReference),
    EdgeEndpointReference(EdgeEndpointReference),
    Subquery(Box<Subquery>),
}

impl Expression {
    pub fn variable(symbol: impl Into<String>) -> Self {
        Expression::Variable(Variable {
            symbol: symbol.into(),
        })
    }

    pub fn parameter(symbol: impl Into<String>, value: CypherValue) -> Self {
        Expression::Parameter(Parameter {
            symbol: symbol.into(),
            value,
        })
    }

    pub fn literal(literal: Literal) -> Self {
        Expression::Literal(literal)
    }

    /// Single-depth property lookup on a variable: `s.name`.
    pub fn property(atom: impl Into<String>, name: impl Into<String>) -> Self {
        Expression::PropertyLookup(PropertyLookup {
            atom: Box::new(Expression::variable(atom)),
            path: vec![name.into()],
        })
    }

    /// Comparison with a single partial: `left <operator> right`.
    pub fn comparison(left: Expression, operator: Operator, right: Expression) -> Self {
        Expression::Comparison(Comparison {
            left: Box::new(left),
            partials: vec![PartialComparison {
                operator,
                right: Box::new(right),
            }],
        })
    }

    pub fn conjunction(expressions: Vec<Expression>) -> Self {
        Expression::Conjunction(expressions)
    }

    pub fn disjunction(expressions: Vec<Expression>) -> Self {
        Expression::Disjunction(expressions)
    }

    pub fn negation(expression: Expression) -> Self {
        Expression::Negation(Box::new(expression))
    }

    pub fn parenthetical(expression: Expression) -> Self {
        Expression::Parenthetical(Box::new(expression))
    }

    pub fn function(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Expression::FunctionInvocation(FunctionInvocation {
            name: name.into(),
            arguments,
        })
    }

    pub fn kind_matcher(reference: Expression, kinds: Vec<String>) -> Self {
        Expression::KindMatcher(KindMatcher {
            reference: Box::new(reference),
            kinds,
        })
    }

    /// The symbol of a plain or annotated variable reference.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Expression::Variable(variable) => Some(&variable.symbol),
            Expression::AnnotatedVariable(variable) => Some(&variable.symbol),
            _ => None,
        }
    }

    /// Variant name for error reporting.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Literal(_) => "Literal",
            Expression::Variable(_) => "Variable",
            Expression::Parameter(_) => "Parameter",
            Expression::PropertyLookup(_) => "PropertyLookup",
            Expression::Comparison(_) => "Comparison",
            Expression::Conjunction(_) => "Conjunction",
            Expression::Disjunction(_) => "Disjunction",
            Expression::ExclusiveDisjunction(_) => "ExclusiveDisjunction",
            Expression::Negation(_) => "Negation",
            Expression::Parenthetical(_) => "Parenthetical",
            Expression::FunctionInvocation(_) => "FunctionInvocation",
            Expression::KindMatcher(_) => "KindMatcher",
            Expression::PatternPredicate(_) => "PatternPredicate",
            Expression::AnnotatedLiteral(_) => "AnnotatedLiteral",
            Expression::AnnotatedVariable(_) => "AnnotatedVariable",
            Expression::AnnotatedParameter(_) => "AnnotatedParameter",
            Expression::AnnotatedPropertyLookup(_) => "AnnotatedPropertyLookup",
            Expression::AnnotatedKindMatcher(_) => "AnnotatedKindMatcher",
            Expression::Entity(_) => "Entity",
            Expression::NodeKindsReference(_) => "NodeKindsReference",
            Expression::EdgeKindReference(_) => "EdgeKindReference",
            Expression::PropertiesReference(_) => "PropertiesReference",
            Expression::EdgeEndpointReference(_) => "EdgeEndpointReference",
            Expression::Subquery(_) => "Subquery",
        }
    }
}

/// A literal value. Parser-sourced string literals arrive wrapped in single
/// quote characters; list and map literals hold sub-expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Scalar(CypherValue),
    List(Vec<Expression>),
    Map(BTreeMap<String, Expression>),
}

impl Literal {
    pub fn null() -> Self {
        Literal::Scalar(CypherValue::Null)
    }

    pub fn boolean(value: bool) -> Self {
        Literal::Scalar(CypherValue::Bool(value))
    }

    pub fn integer(value: i64) -> Self {
        Literal::Scalar(CypherValue::Int64(value))
    }

    pub fn float(value: f64) -> Self {
        Literal::Scalar(CypherValue::Float64(value))
    }

    /// A string literal in the parser's convention: wrapped in single quotes.
    pub fn string(value: impl AsRef<str>) -> Self {
        Literal::Scalar(CypherValue::Text(format!("'{}'", value.as_ref())))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Scalar(CypherValue::Null))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub symbol: String,
    pub value: CypherValue,
}

/// `atom.property`. The path always has exactly one segment in accepted
/// queries; deeper paths are rejected during translation.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyLookup {
    pub atom: Box<Expression>,
    pub path: Vec<String>,
}

impl PropertyLookup {
    pub fn new(atom: impl Into<String>, name: impl Into<String>) -> Self {
        PropertyLookup {
            atom: Box::new(Expression::variable(atom)),
            path: vec![name.into()],
        }
    }
}

/// A left operand plus an ordered list of `(operator, right)` partials,
/// which is how chained comparisons (`a < b < c`) are represented.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Box<Expression>,
    pub partials: Vec<PartialComparison>,
}

impl Comparison {
    pub fn first_partial(&self) -> &PartialComparison {
        &self.partials[0]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartialComparison {
    pub operator: Operator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    Is,
    IsNot,
    In,
    StartsWith,
    EndsWith,
    Contains,
    Like,
    JsonbFieldExists,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Operator::Equals => "=",
            Operator::NotEquals => "<>",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqualTo => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqualTo => "<=",
            Operator::Is => "is",
            Operator::IsNot => "is not",
            Operator::In => "in",
            Operator::StartsWith => "starts with",
            Operator::EndsWith => "ends with",
            Operator::Contains => "contains",
            Operator::Like => "like",
            Operator::JsonbFieldExists => "?",
        };
        f.write_str(token)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInvocation {
    pub name: String,
    pub arguments: Vec<Expression>,
}

/// `reference:Kind1:Kind2` used as a boolean expression.
#[derive(Debug, Clone, PartialEq)]
pub struct KindMatcher {
    pub reference: Box<Expression>,
    pub kinds: Vec<String>,
}

/// An inline existential pattern used as a boolean expression, e.g.
/// `(s)-[]->()` inside a `WHERE` clause. Translated into a correlated
/// subquery during rewriting.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternPredicate {
    pub elements: Vec<PatternElement>,
}

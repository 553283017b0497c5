use thiserror::Error;

use crate::cypher::expression::Operator;
use crate::pgsql::types::DataType;

/// Translation failures. The first error aborts the whole translation;
/// there is no partial SQL output.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranslateError {
    #[error("variable reference `{0}` is not bound")]
    UnboundVariable(String),

    #[error("mutation variable reference `{0}` is not bound")]
    UnboundMutationTarget(String),

    #[error("variable `{0}` for projection item is not bound")]
    UnboundProjection(String),

    #[error("comparison contains mixed types: {left} and {right}")]
    MixedComparisonTypes { left: DataType, right: DataType },

    #[error("list literal contains mixed types")]
    MixedListTypes,

    #[error("expected a single-depth property lookup")]
    NestedPropertyLookup,

    #[error("data type {0} is not an array type")]
    NotAnArrayType(DataType),

    #[error("data type {0} has no array form")]
    NoArrayForm(DataType),

    #[error("unsupported SQL type for kind mutation: {0}")]
    UnsupportedKindMutation(DataType),

    #[error("create clauses are not supported")]
    CreateUnsupported,

    #[error("multi-part queries are not supported")]
    MultiPartQueryUnsupported,

    #[error("mixed node and edge deletions are not supported")]
    MixedDeleteUnsupported,

    #[error("multiple node delete statements are not supported")]
    MultipleNodeDeletes,

    #[error("multiple edge delete statements are not supported")]
    MultipleEdgeDeletes,

    #[error("invalid pattern direction for delete join predicate")]
    InvalidDeleteDirection,

    #[error("unsupported function invocation `{0}`")]
    UnsupportedFunction(String),

    #[error("string operator `{0}` expects a string literal or parameter as its right operand")]
    StringOperandExpected(Operator),

    #[error("property matcher parameter is not supported for `{0}`")]
    PropertyMatcherParameter(String),

    #[error("path projection is not supported")]
    PathProjectionUnsupported,

    #[error("variable-length traversal does not support undirected relationships")]
    UndirectedTraversal,

    #[error("variable-length traversal is not supported in {0}")]
    TraversalUnsupportedIn(String),

    #[error(
        "invalid variable-length range: minimum hops ({min}) cannot be greater than maximum hops ({max})"
    )]
    InvalidTraversalRange { min: u32, max: u32 },

    #[error("query references the following undefined kinds: {}", .0.join(", "))]
    UnknownKinds(Vec<String>),

    #[error("literal type is not supported for SQL translation")]
    UnsupportedLiteral,

    #[error("unexpected expression for {context}: {found}")]
    UnexpectedExpression { context: String, found: String },
}

impl TranslateError {
    /// Loud failure for an AST shape a step does not recognize.
    pub fn unexpected(context: impl Into<String>, found: &crate::cypher::expression::Expression) -> Self {
        TranslateError::UnexpectedExpression {
            context: context.into(),
            found: found.kind_name().to_string(),
        }
    }
}

//! Translation test harness.
//!
//! Queries are built through the AST constructors (standing in for the
//! external parser) and translated against a fixed kind catalog; tests
//! assert the exact SQL text and parameter tables.

use graphpg::cypher::ast::{
    Match, PatternElement, PatternPart, Projection, ProjectionItem, ReadingClause, RegularQuery,
    SinglePartQuery,
};
use graphpg::cypher::expression::Expression;
use graphpg::{translate, InMemoryKindCatalog, TranslateError, Translation};

mod translation_tests;
mod traversal_tests;

pub fn catalog() -> InMemoryKindCatalog {
    InMemoryKindCatalog::new()
        .with_kind("NodeKindA", 1)
        .with_kind("NodeKindB", 2)
        .with_kind("NodeKindC", 3)
        .with_kind("EdgeKindA", 100)
        .with_kind("EdgeKindB", 101)
        .with_kind("EdgeKindC", 102)
}

pub fn translate_query(query: RegularQuery) -> Result<Translation, TranslateError> {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut query = query;
    translate(&mut query, &catalog())
}

/// Translate and assert the exact SQL text.
pub fn check(query: RegularQuery, expected: &str) {
    let translation = translate_query(query).expect("translation failed");
    assert_eq!(expected, translation.sql);
}

/// Translate expecting a failure.
pub fn check_error(query: RegularQuery) -> TranslateError {
    translate_query(query).expect_err("translation unexpectedly succeeded")
}

/// A single-match query over one pattern part.
pub fn select_query(
    elements: Vec<PatternElement>,
    where_expression: Option<Expression>,
    projection: Projection,
) -> RegularQuery {
    select_query_parts(vec![elements], where_expression, projection)
}

/// A single-match query over several comma-separated pattern parts.
pub fn select_query_parts(
    parts: Vec<Vec<PatternElement>>,
    where_expression: Option<Expression>,
    projection: Projection,
) -> RegularQuery {
    let mut match_clause = Match::new(parts.into_iter().map(PatternPart::new).collect());
    if let Some(expression) = where_expression {
        match_clause = match_clause.with_where(expression);
    }

    RegularQuery::single_part(SinglePartQuery {
        reading_clauses: vec![ReadingClause::Match(match_clause)],
        updating_clauses: vec![],
        return_clause: Some(projection),
    })
}

/// `return a, b, c` over bare variables.
pub fn return_variables(names: &[&str]) -> Projection {
    Projection::new(
        names
            .iter()
            .map(|name| ProjectionItem::new(Expression::variable(*name)))
            .collect(),
    )
}

//! Mutable tree walkers.
//!
//! `Expression::walk_mut` visits a subtree in post-order (children before the
//! node itself) and hands the callback a `&mut Expression`, so a pass can
//! replace a node inside its parent directly. Post-order means a callback
//! that wraps the visited node in new structure does not see its own output
//! again. Annotated forms are leaves: once the binder has wrapped a node the
//! walk does not descend back into it.

use crate::cypher::ast::{
    PatternElement, PropertyMatcher, ReadingClause, SetItem, SinglePartQuery, UpdatingClause,
};
use crate::cypher::expression::{Expression, Literal};

impl Expression {
    pub fn walk_mut<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&mut Expression) -> Result<(), E>,
    {
        self.walk_children_mut(f)?;
        f(self)
    }

    fn walk_children_mut<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&mut Expression) -> Result<(), E>,
    {
        match self {
            Expression::Literal(Literal::List(items)) => {
                for item in items {
                    item.walk_mut(f)?;
                }
            }
            Expression::Literal(Literal::Map(entries)) => {
                for value in entries.values_mut() {
                    value.walk_mut(f)?;
                }
            }
            Expression::Literal(Literal::Scalar(_)) => {}
            Expression::Variable(_) | Expression::Parameter(_) => {}
            Expression::PropertyLookup(lookup) => lookup.atom.walk_mut(f)?,
            Expression::Comparison(comparison) => {
                comparison.left.walk_mut(f)?;
                for partial in &mut comparison.partials {
                    partial.right.walk_mut(f)?;
                }
            }
            Expression::Conjunction(expressions)
            | Expression::Disjunction(expressions)
            | Expression::ExclusiveDisjunction(expressions) => {
                for expression in expressions {
                    expression.walk_mut(f)?;
                }
            }
            Expression::Negation(inner) | Expression::Parenthetical(inner) => inner.walk_mut(f)?,
            Expression::FunctionInvocation(function) => {
                for argument in &mut function.arguments {
                    argument.walk_mut(f)?;
                }
            }
            Expression::KindMatcher(matcher) => matcher.reference.walk_mut(f)?,
            Expression::PatternPredicate(predicate) => {
                for element in &mut predicate.elements {
                    walk_pattern_element_expressions(element, f)?;
                }
            }
            Expression::Subquery(subquery) => {
                if let Some(filter) = &mut subquery.filter {
                    filter.walk_mut(f)?;
                }
            }
            Expression::AnnotatedLiteral(_)
            | Expression::AnnotatedVariable(_)
            | Expression::AnnotatedParameter(_)
            | Expression::AnnotatedPropertyLookup(_)
            | Expression::AnnotatedKindMatcher(_)
            | Expression::Entity(_)
            | Expression::NodeKindsReference(_)
            | Expression::EdgeKindReference(_)
            | Expression::PropertiesReference(_)
            | Expression::EdgeEndpointReference(_) => {}
        }

        Ok(())
    }
}

/// Walk the expressions held by a pattern element's property matcher.
pub fn walk_pattern_element_expressions<E, F>(
    element: &mut PatternElement,
    f: &mut F,
) -> Result<(), E>
where
    F: FnMut(&mut Expression) -> Result<(), E>,
{
    let properties = match element {
        PatternElement::Node(node) => &mut node.properties,
        PatternElement::Relationship(relationship) => &mut relationship.properties,
    };

    if let Some(PropertyMatcher::Map(map)) = properties {
        for value in map.values_mut() {
            value.walk_mut(f)?;
        }
    }

    Ok(())
}

/// Walk every expression position of a single-part query in document order:
/// pattern property matchers, `WHERE` clauses, updating-clause expressions,
/// then the projection with its ordering and paging expressions.
pub fn walk_expressions<E, F>(query: &mut SinglePartQuery, f: &mut F) -> Result<(), E>
where
    F: FnMut(&mut Expression) -> Result<(), E>,
{
    for reading_clause in &mut query.reading_clauses {
        let ReadingClause::Match(match_clause) = reading_clause;

        for part in &mut match_clause.pattern {
            for element in &mut part.elements {
                walk_pattern_element_expressions(element, f)?;
            }
        }

        if let Some(where_clause) = &mut match_clause.where_clause {
            for expression in &mut where_clause.expressions {
                expression.walk_mut(f)?;
            }
        }
    }

    for updating_clause in &mut query.updating_clauses {
        match updating_clause {
            UpdatingClause::Set(set) => {
                for item in &mut set.items {
                    if let SetItem::Property { value, .. } = item {
                        value.walk_mut(f)?;
                    }
                }
            }
            UpdatingClause::Delete(delete) => {
                for expression in &mut delete.expressions {
                    expression.walk_mut(f)?;
                }
            }
            UpdatingClause::Create(_)
            | UpdatingClause::Remove(_)
            | UpdatingClause::Mutation(_) => {}
        }
    }

    if let Some(projection) = &mut query.return_clause {
        for item in &mut projection.items {
            item.expression.walk_mut(f)?;
        }

        if let Some(order) = &mut projection.order {
            for item in &mut order.items {
                item.expression.walk_mut(f)?;
            }
        }

        if let Some(skip) = &mut projection.skip {
            skip.walk_mut(f)?;
        }

        if let Some(limit) = &mut projection.limit {
            limit.walk_mut(f)?;
        }
    }

    Ok(())
}

//! Recursive CTE lowering for variable-length relationship patterns.
//!
//! Each `*`-ranged relationship in a reading pattern becomes one
//! `expansion_<i>(root_id, next_id, depth, path)` common table expression.
//! The base case selects the first hop at depth 0 with a single-element edge
//! path; the recursive case extends the path by one edge per iteration.
//! Revisited edges are pruned through the path array, so unbounded ranges
//! terminate on finite graphs.

use crate::cypher::ast::{Direction, PatternElement, ReadingClause, SinglePartQuery};
use crate::cypher::expression::Expression;
use crate::graph_catalog::KindMapper;
use crate::pgsql::annotations::AnnotatedVariable;
use crate::pgsql::emitter::Emitter;
use crate::pgsql::errors::TranslateError;
use crate::pgsql::translator::pattern_element_criteria;
use crate::pgsql::types::DataType;

#[derive(Debug, Clone)]
pub struct TraversalCte {
    /// Deterministic CTE name: `expansion_<i>` in pattern order.
    pub name: String,
    /// The relationship binding; doubles as the edge alias inside the CTE.
    pub binding: AnnotatedVariable,
    pub direction: Direction,
    pub min_hops: u32,
    pub max_hops: Option<u32>,
    /// Per-hop filters over the edge alias: kind tests and property
    /// matchers, applied in both the base and the recursive case.
    pub criteria: Vec<Expression>,
}

impl TraversalCte {
    /// Collect one CTE per variable-length relationship in the query's
    /// reading patterns, in pattern order.
    pub fn collect(query: &SinglePartQuery) -> Result<Vec<TraversalCte>, TranslateError> {
        let mut traversals = Vec::new();

        for reading_clause in &query.reading_clauses {
            let ReadingClause::Match(match_clause) = reading_clause;

            for part in &match_clause.pattern {
                for element in &part.elements {
                    let PatternElement::Relationship(relationship) = element else {
                        continue;
                    };
                    let Some(range) = relationship.range else {
                        continue;
                    };

                    if relationship.direction == Direction::Both {
                        return Err(TranslateError::UndirectedTraversal);
                    }

                    if let (Some(min), Some(max)) = (range.min_hops, range.max_hops) {
                        if min > max {
                            return Err(TranslateError::InvalidTraversalRange { min, max });
                        }
                    }

                    let binding = match &relationship.binding {
                        Some(Expression::AnnotatedVariable(variable)) => variable.clone(),
                        Some(other) => {
                            return Err(TranslateError::unexpected(
                                "relationship pattern binding",
                                other,
                            ))
                        }
                        None => {
                            return Err(TranslateError::UnexpectedExpression {
                                context: "relationship pattern binding".to_string(),
                                found: "None".to_string(),
                            })
                        }
                    };

                    let criteria = pattern_element_criteria(
                        &binding,
                        &relationship.kinds,
                        relationship.properties.as_ref(),
                        DataType::Edge,
                    )?;

                    traversals.push(TraversalCte {
                        name: format!("expansion_{}", traversals.len()),
                        binding,
                        direction: relationship.direction,
                        min_hops: range.effective_min_hops(),
                        max_hops: range.max_hops,
                        criteria,
                    });
                }
            }
        }

        Ok(traversals)
    }

    /// Render `name(root_id, next_id, depth, path) as (<base> union all
    /// <recursive>)`.
    pub fn write_definition<K: KindMapper + ?Sized>(
        &self,
        output: &mut String,
        emitter: &Emitter<'_, K>,
    ) -> Result<(), TranslateError> {
        let edge = &self.binding.symbol;
        let name = &self.name;

        // root_id always tracks the pattern-order previous node, so an
        // inbound relationship traverses end to start.
        let (root_column, next_column) = match self.direction {
            Direction::Outbound => ("start_id", "end_id"),
            Direction::Inbound => ("end_id", "start_id"),
            Direction::Both => return Err(TranslateError::UndirectedTraversal),
        };

        output.push_str(&format!(
            "{name}(root_id, next_id, depth, path) as (select {edge}.{root_column}, {edge}.{next_column}, 0, array[{edge}.id] from edge {edge}"
        ));

        if !self.criteria.is_empty() {
            output.push_str(" where ");
            self.write_criteria(output, emitter)?;
        }

        output.push_str(&format!(
            " union all select {name}.root_id, {edge}.{next_column}, {name}.depth + 1, {name}.path || {edge}.id from {name} join edge {edge} on {edge}.{root_column} = {name}.next_id where "
        ));

        if !self.criteria.is_empty() {
            self.write_criteria(output, emitter)?;
            output.push_str(" and ");
        }

        output.push_str(&format!("not {edge}.id = any({name}.path)"));

        if let Some(max) = self.max_hops {
            output.push_str(&format!(" and {name}.depth < {}", max.saturating_sub(1)));
        }

        output.push(')');

        Ok(())
    }

    fn write_criteria<K: KindMapper + ?Sized>(
        &self,
        output: &mut String,
        emitter: &Emitter<'_, K>,
    ) -> Result<(), TranslateError> {
        for (index, criterion) in self.criteria.iter().enumerate() {
            if index > 0 {
                output.push_str(" and ");
            }
            emitter.write_expression(output, criterion)?;
        }

        Ok(())
    }
}

//! The rewrite pipeline.
//!
//! Two explicitly ordered pass groups run over the bound query tree. The
//! semantic group performs correctness-preserving rewrites whose order
//! matters; the optimization group applies pure simplifications. Each pass
//! is a full walk of the tree, so the preconditions between passes are the
//! list order below rather than visitation coincidence.

use crate::cypher::ast::{
    Direction, NodePattern, PatternElement, PropertyMatcher, ReadingClause, RelationshipPattern,
    SinglePartQuery, Where,
};
use crate::cypher::expression::{
    Comparison, Expression, Literal, Operator, PartialComparison, PropertyLookup,
};
use crate::cypher::walk::walk_expressions;
use crate::graph_catalog::KindMapper;
use crate::pgsql::annotations::{
    AnnotatedKindMatcher, AnnotatedLiteral, AnnotatedPropertyLookup, AnnotatedVariable,
    PropertiesReference, Subquery,
};
use crate::pgsql::binder::Binder;
use crate::pgsql::errors::TranslateError;
use crate::pgsql::function_registry::{
    CYPHER_EDGE_TYPE_FUNCTION, CYPHER_IDENTITY_FUNCTION, CYPHER_NODE_LABELS_FUNCTION,
    CYPHER_TO_LOWER_FUNCTION, PGSQL_ANY_FUNCTION, PGSQL_TO_JSONB_FUNCTION,
    TEMPORAL_FUNCTION_TYPES,
};
use crate::pgsql::types::{expression_sql_type, CypherValue, DataType};
use crate::pgsql::update_rewriter::UpdateClauseRewriter;

pub struct Translator<'a, K: KindMapper + ?Sized> {
    binder: &'a mut Binder,
    kind_mapper: &'a K,
}

impl<'a, K: KindMapper + ?Sized> Translator<'a, K> {
    pub fn new(binder: &'a mut Binder, kind_mapper: &'a K) -> Self {
        Translator {
            binder,
            kind_mapper,
        }
    }

    /// Correctness-preserving rewrites. Order matters: kind matchers must be
    /// annotated before criteria lifting, lifting before comparison
    /// annotation, comparison annotation before pattern-predicate
    /// translation.
    pub fn run_semantic_passes(
        &mut self,
        query: &mut SinglePartQuery,
    ) -> Result<(), TranslateError> {
        log::trace!("semantic pass: string negation desugaring");
        walk_expressions(query, &mut |expression| {
            self.rewrite_string_negation(expression)
        })?;

        log::trace!("semantic pass: projection annotation");
        self.annotate_projection_items(query)?;

        log::trace!("semantic pass: property lookup validation");
        walk_expressions(query, &mut |expression| {
            self.validate_property_lookup(expression)
        })?;

        log::trace!("semantic pass: kind matcher annotation");
        walk_expressions(query, &mut |expression| {
            self.annotate_kind_matcher(expression)
        })?;

        log::trace!("semantic pass: pattern criteria lifting");
        self.lift_match_criteria(query)?;

        log::trace!("semantic pass: comparison annotation");
        walk_expressions(query, &mut |expression| self.annotate_comparison(expression))?;

        log::trace!("semantic pass: pattern predicate translation");
        walk_expressions(query, &mut |expression| {
            self.translate_pattern_predicate(expression)
        })?;

        log::trace!("semantic pass: function rewriting");
        walk_expressions(query, &mut |expression| {
            self.rewrite_function_invocation(expression)
        })?;

        log::trace!("semantic pass: updating clause rewriting");
        UpdateClauseRewriter::new(self.binder, self.kind_mapper).rewrite(query)
    }

    /// Pure simplifications over the rewritten tree.
    pub fn run_optimization_passes(
        &mut self,
        query: &mut SinglePartQuery,
    ) -> Result<(), TranslateError> {
        log::trace!("optimization pass: negation normalization");
        walk_expressions(query, &mut |expression| {
            self.normalize_negation(expression)
        })?;

        log::trace!("optimization pass: kind filter merging");
        walk_expressions(query, &mut |expression| self.merge_kind_filters(expression))?;

        log::trace!("optimization pass: empty list pruning");
        self.prune_empty_expression_lists(query);

        Ok(())
    }

    /// `not (x STARTS WITH y)` must also accept a null `x` under Cypher's
    /// truth table, so the negation is widened into
    /// `(not (...) or x IS NULL)`.
    fn rewrite_string_negation(
        &mut self,
        expression: &mut Expression,
    ) -> Result<(), TranslateError> {
        let applies = match &*expression {
            Expression::Negation(inner) => match &**inner {
                Expression::Comparison(comparison) if !comparison.partials.is_empty() => {
                    matches!(
                        comparison.first_partial().operator,
                        Operator::StartsWith | Operator::EndsWith | Operator::Contains
                    )
                }
                _ => false,
            },
            _ => false,
        };

        if !applies {
            return Ok(());
        }

        let Expression::Negation(inner) =
            std::mem::replace(expression, Expression::Literal(Literal::null()))
        else {
            unreachable!()
        };
        let Expression::Comparison(comparison) = &*inner else {
            unreachable!()
        };

        let null_check = Expression::comparison(
            (*comparison.left).clone(),
            Operator::Is,
            Expression::AnnotatedLiteral(AnnotatedLiteral::null()),
        );

        *expression = Expression::parenthetical(Expression::disjunction(vec![
            Expression::Negation(inner),
            null_check,
        ]));

        Ok(())
    }

    /// Bare-variable projection items become full entity projections and
    /// receive an implicit alias equal to the variable name.
    fn annotate_projection_items(
        &mut self,
        query: &mut SinglePartQuery,
    ) -> Result<(), TranslateError> {
        let Some(projection) = &mut query.return_clause else {
            return Ok(());
        };

        for item in &mut projection.items {
            let symbol = match &item.expression {
                Expression::Variable(variable) => variable.symbol.clone(),
                _ => continue,
            };

            let sql_type = self
                .binder
                .binding_type(&symbol)
                .ok_or_else(|| TranslateError::UnboundProjection(symbol.clone()))?;
            let annotated = AnnotatedVariable::new(&symbol, sql_type);

            item.expression = Expression::Entity(crate::pgsql::annotations::Entity {
                binding: annotated.clone(),
            });

            if item.alias.is_none() {
                item.alias = Some(Expression::AnnotatedVariable(annotated));
            }
        }

        Ok(())
    }

    fn validate_property_lookup(
        &mut self,
        expression: &mut Expression,
    ) -> Result<(), TranslateError> {
        if let Expression::PropertyLookup(lookup) = expression {
            if lookup.path.len() != 1 {
                return Err(TranslateError::NestedPropertyLookup);
            }
        }

        Ok(())
    }

    /// Resolve whether a kind matcher addresses a node or an edge binding;
    /// the two are stored differently (an id array vs a scalar column).
    fn annotate_kind_matcher(
        &mut self,
        expression: &mut Expression,
    ) -> Result<(), TranslateError> {
        let sql_type = match &*expression {
            Expression::KindMatcher(matcher) => match matcher.reference.as_ref() {
                Expression::AnnotatedVariable(variable) => variable.sql_type,
                Expression::Variable(variable) => self
                    .binder
                    .binding_type(&variable.symbol)
                    .ok_or_else(|| TranslateError::UnboundVariable(variable.symbol.clone()))?,
                other => return Err(TranslateError::unexpected("kind matcher reference", other)),
            },
            _ => return Ok(()),
        };

        let Expression::KindMatcher(matcher) =
            std::mem::replace(expression, Expression::Literal(Literal::null()))
        else {
            unreachable!()
        };

        *expression = Expression::AnnotatedKindMatcher(AnnotatedKindMatcher {
            reference: matcher.reference,
            kinds: matcher.kinds,
            sql_type,
        });

        Ok(())
    }

    /// Move inline kind labels and property matchers into the `WHERE`
    /// conjunction, ahead of any user-written criteria. Variable-length
    /// relationships keep their criteria inline: those are rendered per hop
    /// inside the recursive CTE.
    fn lift_match_criteria(&mut self, query: &mut SinglePartQuery) -> Result<(), TranslateError> {
        for reading_clause in &mut query.reading_clauses {
            let ReadingClause::Match(match_clause) = reading_clause;
            let mut additional = Vec::new();

            for part in &mut match_clause.pattern {
                for element in &mut part.elements {
                    match element {
                        PatternElement::Node(node) => {
                            additional.extend(self.lift_node_pattern_criteria(node)?);
                        }
                        PatternElement::Relationship(relationship) => {
                            if let Some(range) = relationship.range {
                                if let (Some(min), Some(max)) = (range.min_hops, range.max_hops) {
                                    if min > max {
                                        return Err(TranslateError::InvalidTraversalRange {
                                            min,
                                            max,
                                        });
                                    }
                                }
                                if relationship.direction == Direction::Both {
                                    return Err(TranslateError::UndirectedTraversal);
                                }
                            } else {
                                additional
                                    .extend(self.lift_relationship_pattern_criteria(relationship)?);
                            }
                        }
                    }
                }
            }

            if !additional.is_empty() {
                let existing = match_clause
                    .where_clause
                    .take()
                    .map(|where_clause| where_clause.expressions)
                    .unwrap_or_default();
                additional.extend(existing);
                match_clause.where_clause = Some(Where {
                    expressions: vec![Expression::conjunction(additional)],
                });
            }
        }

        Ok(())
    }

    fn lift_node_pattern_criteria(
        &mut self,
        node: &mut NodePattern,
    ) -> Result<Vec<Expression>, TranslateError> {
        if node.binding.is_none() {
            let annotated = self.binder.new_annotated_variable("n", DataType::Node);
            node.binding = Some(Expression::AnnotatedVariable(annotated));
        }

        let binding = annotated_binding(&node.binding, "node pattern binding")?;
        pattern_element_criteria(&binding, &node.kinds, node.properties.as_ref(), DataType::Node)
    }

    fn lift_relationship_pattern_criteria(
        &mut self,
        relationship: &mut RelationshipPattern,
    ) -> Result<Vec<Expression>, TranslateError> {
        if relationship.binding.is_none() {
            let annotated = self.binder.new_annotated_variable("e", DataType::Edge);
            relationship.binding = Some(Expression::AnnotatedVariable(annotated));
        }

        let binding = annotated_binding(&relationship.binding, "relationship pattern binding")?;
        pattern_element_criteria(
            &binding,
            &relationship.kinds,
            relationship.properties.as_ref(),
            DataType::Edge,
        )
    }

    /// Comparison annotation: null-predicate desugaring, partial rewrites,
    /// then unification of the operand types onto the left property lookup.
    fn annotate_comparison(&mut self, expression: &mut Expression) -> Result<(), TranslateError> {
        if !matches!(expression, Expression::Comparison(_)) {
            return Ok(());
        }

        if self.rewrite_null_comparison(expression)? {
            return Ok(());
        }

        let Expression::Comparison(comparison) = expression else {
            unreachable!()
        };

        // The original operator drives array handling below, so record it
        // before the partial rewrites change it.
        let operator = comparison.partials.first().map(|partial| partial.operator);

        for partial in &mut comparison.partials {
            self.rewrite_partial_comparison(partial)?;
        }

        let mut annotation: Option<DataType> = None;
        gather_comparison_types(&comparison.left, &mut annotation)?;
        for partial in &comparison.partials {
            gather_comparison_types(&partial.right, &mut annotation)?;
        }

        let Some(found) = annotation else {
            return Ok(());
        };

        if !matches!(comparison.left.as_ref(), Expression::PropertyLookup(_)) {
            return Ok(());
        }

        let left_type = if found.is_array() {
            match operator {
                // The element test runs against unnested values, so the left
                // side takes the array's base type.
                Some(Operator::In) => found.array_base_type()?,
                // Any other operator compares serialized array values.
                _ => DataType::JsonB,
            }
        } else {
            found
        };

        let Expression::PropertyLookup(lookup) = std::mem::replace(
            comparison.left.as_mut(),
            Expression::Literal(Literal::null()),
        ) else {
            unreachable!()
        };
        *comparison.left = Expression::AnnotatedPropertyLookup(AnnotatedPropertyLookup {
            lookup,
            sql_type: left_type,
        });

        for partial in &mut comparison.partials {
            if matches!(partial.right.as_ref(), Expression::PropertyLookup(_)) {
                let Expression::PropertyLookup(lookup) = std::mem::replace(
                    partial.right.as_mut(),
                    Expression::Literal(Literal::null()),
                ) else {
                    unreachable!()
                };
                *partial.right = Expression::AnnotatedPropertyLookup(AnnotatedPropertyLookup {
                    lookup,
                    sql_type: found,
                });
            }
        }

        Ok(())
    }

    /// `p IS NULL` / `p IS NOT NULL` become JSONB field-existence tests.
    /// Returns true when the comparison was a null check and needs no
    /// further annotation.
    fn rewrite_null_comparison(
        &mut self,
        expression: &mut Expression,
    ) -> Result<bool, TranslateError> {
        let Expression::Comparison(comparison) = &*expression else {
            return Ok(false);
        };

        if comparison.partials.len() != 1 {
            return Ok(false);
        }

        let partial = &comparison.partials[0];
        match partial.right.as_ref() {
            Expression::AnnotatedLiteral(literal) if literal.literal.is_null() => {}
            _ => return Ok(false),
        }

        let operator = partial.operator;
        if !matches!(operator, Operator::Is | Operator::IsNot) {
            return Ok(true);
        }

        let Expression::PropertyLookup(lookup) = comparison.left.as_ref() else {
            return Err(TranslateError::unexpected(
                "left operand of null comparison",
                comparison.left.as_ref(),
            ));
        };

        let symbol = match lookup.atom.as_ref() {
            Expression::Variable(variable) => variable.symbol.clone(),
            Expression::AnnotatedVariable(variable) => variable.symbol.clone(),
            other => {
                return Err(TranslateError::unexpected(
                    "null comparison property atom",
                    other,
                ))
            }
        };

        let reference = self
            .binder
            .lookup_variable(&symbol)
            .ok_or(TranslateError::UnboundVariable(symbol))?;
        let property_name = lookup.path.first().cloned().unwrap_or_default();

        let check = Expression::comparison(
            Expression::PropertiesReference(PropertiesReference { reference }),
            Operator::JsonbFieldExists,
            Expression::AnnotatedLiteral(AnnotatedLiteral::text(&property_name)),
        );

        *expression = match operator {
            Operator::IsNot => check,
            _ => Expression::negation(check),
        };

        Ok(true)
    }

    /// Operator-level desugaring within a comparison partial.
    fn rewrite_partial_comparison(
        &mut self,
        partial: &mut PartialComparison,
    ) -> Result<(), TranslateError> {
        match partial.operator {
            Operator::In => {
                // `in $param` runs against an array value and must become
                // `= any($param)`.
                if matches!(partial.right.as_ref(), Expression::AnnotatedParameter(_)) {
                    partial.operator = Operator::Equals;
                    let right = std::mem::replace(
                        partial.right.as_mut(),
                        Expression::Literal(Literal::null()),
                    );
                    *partial.right = Expression::function(PGSQL_ANY_FUNCTION, vec![right]);
                }
            }
            Operator::StartsWith | Operator::EndsWith | Operator::Contains => {
                let operator = partial.operator;
                partial.operator = Operator::Like;

                match partial.right.as_mut() {
                    Expression::AnnotatedLiteral(literal) => {
                        let Literal::Scalar(CypherValue::Text(text)) = &mut literal.literal else {
                            return Err(TranslateError::StringOperandExpected(operator));
                        };

                        // Literal strings carry their wrapping quotes; strip
                        // them before splicing in the wildcard.
                        let inner = if text.len() >= 2 {
                            text[1..text.len() - 1].to_string()
                        } else {
                            String::new()
                        };

                        *text = match operator {
                            Operator::StartsWith => format!("'{}%'", inner),
                            Operator::Contains => format!("'%{}%'", inner),
                            _ => format!("'%{}'", inner),
                        };
                    }
                    Expression::AnnotatedParameter(parameter) => {
                        // Parameter values are raw and unquoted.
                        let value = self
                            .binder
                            .parameter_value(&parameter.symbol)
                            .cloned()
                            .ok_or_else(|| {
                                TranslateError::UnboundVariable(parameter.symbol.clone())
                            })?;
                        let CypherValue::Text(raw) = value else {
                            return Err(TranslateError::StringOperandExpected(operator));
                        };

                        let rewritten = match operator {
                            Operator::StartsWith => format!("{}%", raw),
                            Operator::Contains => format!("%{}%", raw),
                            _ => format!("%{}", raw),
                        };
                        self.binder
                            .update_parameter(&parameter.symbol, CypherValue::Text(rewritten));
                    }
                    _ => return Err(TranslateError::StringOperandExpected(operator)),
                }
            }
            Operator::Equals => {
                let wrap_literal = matches!(
                    partial.right.as_ref(),
                    Expression::AnnotatedLiteral(literal) if literal.sql_type.is_array()
                );

                if wrap_literal {
                    // Equality over an array literal compares serialized
                    // values.
                    let right = std::mem::replace(
                        partial.right.as_mut(),
                        Expression::Literal(Literal::null()),
                    );
                    *partial.right = Expression::function(PGSQL_TO_JSONB_FUNCTION, vec![right]);
                } else if let Expression::AnnotatedParameter(parameter) = partial.right.as_ref() {
                    if parameter.sql_type.is_array() {
                        let symbol = parameter.symbol.clone();
                        let value = self
                            .binder
                            .parameter_value(&symbol)
                            .cloned()
                            .ok_or_else(|| TranslateError::UnboundVariable(symbol.clone()))?;
                        self.binder
                            .update_parameter(&symbol, CypherValue::Json(value.to_json()?));
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Inline existential patterns become correlated subqueries. A pattern
    /// element bound to an outer *pattern* binding is renamed to a fresh
    /// local and constrained by identity equality against the outer row.
    fn translate_pattern_predicate(
        &mut self,
        expression: &mut Expression,
    ) -> Result<(), TranslateError> {
        if !matches!(expression, Expression::PatternPredicate(_)) {
            return Ok(());
        }

        let Expression::PatternPredicate(predicate) =
            std::mem::replace(expression, Expression::Literal(Literal::null()))
        else {
            unreachable!()
        };

        let mut elements = predicate.elements;
        let mut filters = Vec::new();

        for element in &mut elements {
            match element {
                PatternElement::Node(node) => {
                    let binding = annotated_binding(&node.binding, "node pattern binding")?;

                    if !self.binder.is_synthetic(&binding.symbol)
                        && self.binder.is_pattern_binding(&binding.symbol)
                    {
                        let renamed = self
                            .binder
                            .new_annotated_variable("n", binding.sql_type);
                        node.binding = Some(Expression::AnnotatedVariable(renamed.clone()));
                        filters.push(identity_equality(binding, renamed));
                    }

                    filters.extend(self.lift_node_pattern_criteria(node)?);
                }
                PatternElement::Relationship(relationship) => {
                    if relationship.range.is_some() {
                        return Err(TranslateError::TraversalUnsupportedIn(
                            "pattern predicates".to_string(),
                        ));
                    }

                    let binding =
                        annotated_binding(&relationship.binding, "relationship pattern binding")?;

                    if !self.binder.is_synthetic(&binding.symbol)
                        && self.binder.is_pattern_binding(&binding.symbol)
                    {
                        let renamed = self
                            .binder
                            .new_annotated_variable("e", binding.sql_type);
                        relationship.binding = Some(Expression::AnnotatedVariable(renamed.clone()));
                        filters.push(identity_equality(binding, renamed));
                    }

                    filters.extend(self.lift_relationship_pattern_criteria(relationship)?);
                }
            }
        }

        let filter = if filters.is_empty() {
            None
        } else {
            Some(Expression::conjunction(filters))
        };

        *expression = Expression::Subquery(Box::new(Subquery { elements, filter }));

        Ok(())
    }

    /// Map Cypher built-ins onto their storage-level equivalents.
    fn rewrite_function_invocation(
        &mut self,
        expression: &mut Expression,
    ) -> Result<(), TranslateError> {
        let name = match &*expression {
            Expression::FunctionInvocation(function) => function.name.clone(),
            _ => return Ok(()),
        };

        match name.as_str() {
            CYPHER_NODE_LABELS_FUNCTION | CYPHER_EDGE_TYPE_FUNCTION => {
                let entity_type = if name == CYPHER_NODE_LABELS_FUNCTION {
                    DataType::Node
                } else {
                    DataType::Edge
                };

                let variable = {
                    let Expression::FunctionInvocation(function) = &*expression else {
                        unreachable!()
                    };
                    match function.arguments.first() {
                        Some(Expression::Variable(variable)) => {
                            AnnotatedVariable::new(&variable.symbol, entity_type)
                        }
                        Some(Expression::AnnotatedVariable(variable)) => variable.clone(),
                        Some(other) => {
                            return Err(TranslateError::unexpected(
                                format!("first argument in {} function", name),
                                other,
                            ))
                        }
                        None => return Err(TranslateError::UnsupportedFunction(name)),
                    }
                };

                *expression = if entity_type == DataType::Node {
                    Expression::NodeKindsReference(crate::pgsql::annotations::NodeKindsReference {
                        variable,
                    })
                } else {
                    Expression::EdgeKindReference(crate::pgsql::annotations::EdgeKindReference {
                        variable,
                    })
                };
            }
            CYPHER_TO_LOWER_FUNCTION => {
                let Expression::FunctionInvocation(function) = expression else {
                    unreachable!()
                };
                if let Some(argument) = function.arguments.first_mut() {
                    if matches!(argument, Expression::PropertyLookup(_)) {
                        let Expression::PropertyLookup(lookup) =
                            std::mem::replace(argument, Expression::Literal(Literal::null()))
                        else {
                            unreachable!()
                        };
                        *argument =
                            Expression::AnnotatedPropertyLookup(AnnotatedPropertyLookup {
                                lookup,
                                sql_type: DataType::Text,
                            });
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Parenthesize negated expression lists so rendered precedence matches
    /// the query's grouping.
    fn normalize_negation(&mut self, expression: &mut Expression) -> Result<(), TranslateError> {
        if let Expression::Negation(inner) = expression {
            if matches!(
                inner.as_ref(),
                Expression::Conjunction(_)
                    | Expression::Disjunction(_)
                    | Expression::ExclusiveDisjunction(_)
            ) {
                let wrapped =
                    std::mem::replace(inner.as_mut(), Expression::Literal(Literal::null()));
                **inner = Expression::parenthetical(wrapped);
            }
        }

        Ok(())
    }

    /// Collapse a disjunction of kind matchers over one binding into a
    /// single matcher carrying the union of kinds.
    fn merge_kind_filters(&mut self, expression: &mut Expression) -> Result<(), TranslateError> {
        if !matches!(expression, Expression::Disjunction(_)) {
            return Ok(());
        }

        let Expression::Disjunction(members) =
            std::mem::replace(expression, Expression::Literal(Literal::null()))
        else {
            unreachable!()
        };

        let mut merged: Vec<(String, AnnotatedKindMatcher)> = Vec::new();
        let mut rest: Vec<Expression> = Vec::new();

        for member in members {
            match member {
                Expression::AnnotatedKindMatcher(matcher) => {
                    let symbol = matcher
                        .reference
                        .symbol()
                        .ok_or_else(|| {
                            TranslateError::unexpected(
                                "kind filter reference",
                                matcher.reference.as_ref(),
                            )
                        })?
                        .to_string();

                    if let Some((_, existing)) =
                        merged.iter_mut().find(|(existing_symbol, _)| *existing_symbol == symbol)
                    {
                        existing.kinds.extend(matcher.kinds);
                    } else {
                        merged.push((symbol, matcher));
                    }
                }
                other => rest.push(other),
            }
        }

        let mut matchers: Vec<Expression> = merged
            .into_iter()
            .map(|(_, matcher)| Expression::AnnotatedKindMatcher(matcher))
            .collect();

        *expression = if rest.is_empty() {
            if matchers.len() == 1 {
                matchers.pop().unwrap()
            } else {
                Expression::Disjunction(matchers)
            }
        } else {
            rest.extend(matchers);
            Expression::Disjunction(rest)
        };

        Ok(())
    }

    /// Drop expression lists emptied by earlier rewrites and unwrap
    /// parenthesized singletons.
    fn prune_empty_expression_lists(&mut self, query: &mut SinglePartQuery) {
        for reading_clause in &mut query.reading_clauses {
            let ReadingClause::Match(match_clause) = reading_clause;
            if let Some(where_clause) = &mut match_clause.where_clause {
                for expression in &mut where_clause.expressions {
                    prune_expression(expression);
                    collapse_parenthesized_singleton(expression);
                }
                where_clause
                    .expressions
                    .retain(|expression| !is_empty_expression_list(expression));
            }
        }

        if let Some(projection) = &mut query.return_clause {
            for item in &mut projection.items {
                prune_expression(&mut item.expression);
            }
        }
    }
}

/// Criteria equivalent to a pattern element's inline kinds and property
/// matchers, referencing the element's binding.
pub(crate) fn pattern_element_criteria(
    binding: &AnnotatedVariable,
    kinds: &[String],
    properties: Option<&PropertyMatcher>,
    kind_type: DataType,
) -> Result<Vec<Expression>, TranslateError> {
    let mut criteria = Vec::new();

    if !kinds.is_empty() {
        criteria.push(Expression::AnnotatedKindMatcher(AnnotatedKindMatcher {
            reference: Box::new(Expression::AnnotatedVariable(binding.clone())),
            kinds: kinds.to_vec(),
            sql_type: kind_type,
        }));
    }

    match properties {
        Some(PropertyMatcher::Parameter(_)) => {
            return Err(TranslateError::PropertyMatcherParameter(
                binding.symbol.clone(),
            ))
        }
        Some(PropertyMatcher::Map(map)) => {
            for (name, value) in map {
                let sql_type = expression_sql_type(value)?;
                criteria.push(Expression::Comparison(Comparison {
                    left: Box::new(Expression::AnnotatedPropertyLookup(
                        AnnotatedPropertyLookup {
                            lookup: PropertyLookup {
                                atom: Box::new(Expression::variable(binding.symbol.clone())),
                                path: vec![name.clone()],
                            },
                            sql_type,
                        },
                    )),
                    partials: vec![PartialComparison {
                        operator: Operator::Equals,
                        right: Box::new(value.clone()),
                    }],
                }));
            }
        }
        None => {}
    }

    Ok(criteria)
}

fn annotated_binding(
    binding: &Option<Expression>,
    context: &str,
) -> Result<AnnotatedVariable, TranslateError> {
    match binding {
        Some(Expression::AnnotatedVariable(variable)) => Ok(variable.clone()),
        Some(other) => Err(TranslateError::unexpected(context, other)),
        None => Err(TranslateError::UnexpectedExpression {
            context: context.to_string(),
            found: "None".to_string(),
        }),
    }
}

fn identity_equality(outer: AnnotatedVariable, local: AnnotatedVariable) -> Expression {
    Expression::comparison(
        Expression::function(
            CYPHER_IDENTITY_FUNCTION,
            vec![Expression::AnnotatedVariable(outer)],
        ),
        Operator::Equals,
        Expression::function(
            CYPHER_IDENTITY_FUNCTION,
            vec![Expression::AnnotatedVariable(local)],
        ),
    )
}

/// Unify a single data type over a comparison operand tree. Temporal
/// constructor calls contribute their result type; other function calls are
/// searched through their arguments.
fn gather_comparison_types(
    expression: &Expression,
    annotation: &mut Option<DataType>,
) -> Result<(), TranslateError> {
    match expression {
        Expression::AnnotatedParameter(parameter) => {
            merge_annotation(annotation, parameter.sql_type)
        }
        Expression::AnnotatedLiteral(literal) => merge_annotation(annotation, literal.sql_type),
        Expression::FunctionInvocation(function) => {
            if let Some(sql_type) = TEMPORAL_FUNCTION_TYPES.get(function.name.as_str()) {
                merge_annotation(annotation, *sql_type)
            } else {
                for argument in &function.arguments {
                    gather_comparison_types(argument, annotation)?;
                }
                Ok(())
            }
        }
        Expression::Comparison(comparison) => {
            gather_comparison_types(&comparison.left, annotation)?;
            for partial in &comparison.partials {
                gather_comparison_types(&partial.right, annotation)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn merge_annotation(
    annotation: &mut Option<DataType>,
    sql_type: DataType,
) -> Result<(), TranslateError> {
    match annotation {
        None => {
            *annotation = Some(sql_type);
            Ok(())
        }
        Some(existing) if *existing == sql_type => Ok(()),
        Some(existing) => Err(TranslateError::MixedComparisonTypes {
            left: *existing,
            right: sql_type,
        }),
    }
}

fn prune_expression(expression: &mut Expression) {
    match expression {
        Expression::Conjunction(members)
        | Expression::Disjunction(members)
        | Expression::ExclusiveDisjunction(members) => {
            for member in members.iter_mut() {
                prune_expression(member);
                collapse_parenthesized_singleton(member);
            }
            members.retain(|member| !is_empty_expression_list(member));
        }
        Expression::Parenthetical(inner) | Expression::Negation(inner) => {
            prune_expression(inner);
        }
        Expression::Comparison(comparison) => {
            prune_expression(&mut comparison.left);
            for partial in &mut comparison.partials {
                prune_expression(&mut partial.right);
            }
        }
        Expression::Subquery(subquery) => {
            if let Some(filter) = &mut subquery.filter {
                prune_expression(filter);
                if is_empty_expression_list(filter) {
                    subquery.filter = None;
                }
            }
        }
        _ => {}
    }
}

fn collapse_parenthesized_singleton(expression: &mut Expression) {
    let applies = match &*expression {
        Expression::Parenthetical(inner) => matches!(
            inner.as_ref(),
            Expression::Conjunction(members)
                | Expression::Disjunction(members)
                | Expression::ExclusiveDisjunction(members)
            if members.len() == 1
        ),
        _ => false,
    };

    if !applies {
        return;
    }

    let Expression::Parenthetical(inner) =
        std::mem::replace(expression, Expression::Literal(Literal::null()))
    else {
        unreachable!()
    };

    let single = match *inner {
        Expression::Conjunction(mut members)
        | Expression::Disjunction(mut members)
        | Expression::ExclusiveDisjunction(mut members) => members.pop().unwrap(),
        _ => unreachable!(),
    };

    *expression = single;
}

fn is_empty_expression_list(expression: &Expression) -> bool {
    matches!(
        expression,
        Expression::Conjunction(members)
            | Expression::Disjunction(members)
            | Expression::ExclusiveDisjunction(members)
        if members.is_empty()
    )
}

//! SET/REMOVE/DELETE rewriting into storage-level mutation descriptors.
//!
//! Repeated additions and removals against the same binding are merged into
//! one descriptor per binding. Parameter allocation order is fixed:
//! additions before removals within a mutation, property mutations before
//! kind mutations across them, with the delete descriptor first.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value as JsonValue;

use crate::cypher::ast::{
    DeleteClause, Direction, PatternElement, ReadingClause, Remove, RemoveItem, Set, SetItem,
    SinglePartQuery, UpdatingClause, Where,
};
use crate::cypher::expression::{Expression, Literal, Operator};
use crate::graph_catalog::KindMapper;
use crate::pgsql::annotations::{
    AnnotatedVariable, Delete, EdgeEndpoint, EdgeEndpointReference, KindMutation, Mutation,
    PropertiesReference, PropertyMutation,
};
use crate::pgsql::binder::Binder;
use crate::pgsql::errors::TranslateError;
use crate::pgsql::function_registry::CYPHER_IDENTITY_FUNCTION;
use crate::pgsql::types::{CypherValue, DataType};

pub struct UpdateClauseRewriter<'a, K: KindMapper + ?Sized> {
    binder: &'a mut Binder,
    kind_mapper: &'a K,
    delete_binding: Option<AnnotatedVariable>,
    node_delete: bool,
    edge_delete: bool,
    property_additions: BTreeMap<String, BTreeMap<String, CypherValue>>,
    property_removals: BTreeMap<String, Vec<String>>,
    kind_additions: BTreeMap<String, Vec<String>>,
    kind_removals: BTreeMap<String, Vec<String>>,
}

impl<'a, K: KindMapper + ?Sized> UpdateClauseRewriter<'a, K> {
    pub fn new(binder: &'a mut Binder, kind_mapper: &'a K) -> Self {
        UpdateClauseRewriter {
            binder,
            kind_mapper,
            delete_binding: None,
            node_delete: false,
            edge_delete: false,
            property_additions: BTreeMap::new(),
            property_removals: BTreeMap::new(),
            kind_additions: BTreeMap::new(),
            kind_removals: BTreeMap::new(),
        }
    }

    pub fn rewrite(mut self, query: &mut SinglePartQuery) -> Result<(), TranslateError> {
        if query.updating_clauses.is_empty() {
            return Ok(());
        }

        // Update and delete statements join plain tables; a traversal CTE
        // has no place in them.
        for reading_clause in &query.reading_clauses {
            let ReadingClause::Match(match_clause) = reading_clause;
            for part in &match_clause.pattern {
                for element in &part.elements {
                    if let PatternElement::Relationship(relationship) = element {
                        if relationship.range.is_some() {
                            return Err(TranslateError::TraversalUnsupportedIn(
                                "updating statements".to_string(),
                            ));
                        }
                    }
                }
            }
        }

        let clauses = std::mem::take(&mut query.updating_clauses);

        for clause in clauses {
            match clause {
                UpdatingClause::Create(_) => return Err(TranslateError::CreateUnsupported),
                UpdatingClause::Delete(delete) => {
                    self.rewrite_delete_clause(&mut query.reading_clauses, &delete)?;
                }
                UpdatingClause::Set(set) => self.rewrite_set_clause(set)?,
                UpdatingClause::Remove(remove) => self.rewrite_remove_clause(remove)?,
                UpdatingClause::Mutation(_) => {
                    return Err(TranslateError::UnexpectedExpression {
                        context: "updating clause rewriting".to_string(),
                        found: "Mutation".to_string(),
                    })
                }
            }
        }

        query.updating_clauses = self.into_mutations()?;

        Ok(())
    }

    fn rewrite_set_clause(&mut self, set: Set) -> Result<(), TranslateError> {
        for item in set.items {
            match item {
                SetItem::Kinds { variable, kinds } => {
                    let symbol = variable
                        .symbol()
                        .ok_or_else(|| TranslateError::unexpected("kind setter target", &variable))?
                        .to_string();
                    self.track_kind_addition(&symbol, kinds);
                }
                SetItem::Property { target, value } => {
                    let symbol = target
                        .atom
                        .symbol()
                        .ok_or_else(|| {
                            TranslateError::unexpected("property setter target", target.atom.as_ref())
                        })?
                        .to_string();
                    let name = target.path.first().cloned().unwrap_or_default();
                    let value = self.setter_value(value)?;
                    self.track_property_addition(&symbol, &name, value);
                }
            }
        }

        Ok(())
    }

    /// The raw value a SET item assigns. Parser-quoted string literals are
    /// unquoted here: the mutation payload carries values, not SQL text.
    fn setter_value(&self, value: Expression) -> Result<CypherValue, TranslateError> {
        match value {
            Expression::AnnotatedLiteral(annotated) => match annotated.literal {
                Literal::Scalar(CypherValue::Text(text)) => Ok(CypherValue::Text(unquote(&text))),
                Literal::Scalar(scalar) => Ok(scalar),
                Literal::List(_) => Err(TranslateError::UnexpectedExpression {
                    context: "right side operand for property setter".to_string(),
                    found: "ListLiteral".to_string(),
                }),
                Literal::Map(_) => Err(TranslateError::UnexpectedExpression {
                    context: "right side operand for property setter".to_string(),
                    found: "MapLiteral".to_string(),
                }),
            },
            Expression::AnnotatedParameter(parameter) => self
                .binder
                .parameter_value(&parameter.symbol)
                .cloned()
                .ok_or(TranslateError::UnboundMutationTarget(parameter.symbol)),
            other => Err(TranslateError::unexpected(
                "right side operand for property setter",
                &other,
            )),
        }
    }

    fn rewrite_remove_clause(&mut self, remove: Remove) -> Result<(), TranslateError> {
        for item in remove.items {
            match item {
                RemoveItem::Kinds(matcher) => {
                    let symbol = matcher
                        .reference
                        .symbol()
                        .ok_or_else(|| {
                            TranslateError::unexpected(
                                "remove matcher reference",
                                matcher.reference.as_ref(),
                            )
                        })?
                        .to_string();
                    self.track_kind_removal(&symbol, matcher.kinds);
                }
                RemoveItem::Property(lookup) => {
                    let symbol = lookup
                        .atom
                        .symbol()
                        .ok_or_else(|| {
                            TranslateError::unexpected(
                                "property removal target",
                                lookup.atom.as_ref(),
                            )
                        })?
                        .to_string();
                    let name = lookup.path.first().cloned().unwrap_or_default();
                    self.track_property_removal(&symbol, name);
                }
            }
        }

        Ok(())
    }

    /// Record the delete target and synthesize the node-to-relationship
    /// identity join predicates the multi-table delete needs.
    fn rewrite_delete_clause(
        &mut self,
        reading_clauses: &mut [ReadingClause],
        delete: &DeleteClause,
    ) -> Result<(), TranslateError> {
        for expression in &delete.expressions {
            let Expression::AnnotatedVariable(variable) = expression else {
                return Err(TranslateError::unexpected("delete target", expression));
            };

            match variable.sql_type {
                DataType::Node => {
                    if self.node_delete {
                        return Err(TranslateError::MultipleNodeDeletes);
                    }
                    self.delete_binding = Some(variable.clone());
                    self.node_delete = true;
                }
                DataType::Edge => {
                    if self.edge_delete {
                        return Err(TranslateError::MultipleEdgeDeletes);
                    }
                    self.delete_binding = Some(variable.clone());
                    self.edge_delete = true;
                }
                other => {
                    return Err(TranslateError::UnexpectedExpression {
                        context: "delete target type".to_string(),
                        found: other.to_string(),
                    })
                }
            }
        }

        if self.node_delete && self.edge_delete {
            return Err(TranslateError::MixedDeleteUnsupported);
        }

        for reading_clause in reading_clauses {
            let ReadingClause::Match(match_clause) = reading_clause;
            let mut additional = Vec::new();

            for part in &match_clause.pattern {
                if part.elements.len() <= 1 {
                    // No relationship, so no joining criteria required.
                    continue;
                }

                for (index, element) in part.elements.iter().enumerate() {
                    let PatternElement::Node(node) = element else {
                        continue;
                    };

                    let last_node = index + 1 >= part.elements.len();
                    let (relationship, direction) = if !last_node {
                        match &part.elements[index + 1] {
                            PatternElement::Relationship(relationship) => {
                                (relationship, relationship.direction)
                            }
                            PatternElement::Node(_) => {
                                return Err(TranslateError::UnexpectedExpression {
                                    context: "pattern element sequence".to_string(),
                                    found: "Node".to_string(),
                                })
                            }
                        }
                    } else {
                        match &part.elements[index - 1] {
                            PatternElement::Relationship(relationship) => {
                                (relationship, relationship.direction.reverse())
                            }
                            PatternElement::Node(_) => {
                                return Err(TranslateError::UnexpectedExpression {
                                    context: "pattern element sequence".to_string(),
                                    found: "Node".to_string(),
                                })
                            }
                        }
                    };

                    let relationship_binding = match &relationship.binding {
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

                    let node_binding = node.binding.clone().ok_or_else(|| {
                        TranslateError::UnexpectedExpression {
                            context: "node pattern binding".to_string(),
                            found: "None".to_string(),
                        }
                    })?;

                    let endpoint = match direction {
                        Direction::Outbound => EdgeEndpoint::Start,
                        Direction::Inbound => EdgeEndpoint::End,
                        Direction::Both => return Err(TranslateError::InvalidDeleteDirection),
                    };

                    additional.push(Expression::comparison(
                        Expression::function(CYPHER_IDENTITY_FUNCTION, vec![node_binding]),
                        Operator::Equals,
                        Expression::EdgeEndpointReference(EdgeEndpointReference {
                            binding: relationship_binding,
                            endpoint,
                        }),
                    ));
                }
            }

            if !additional.is_empty() {
                let joined = Expression::conjunction(additional);

                match &mut match_clause.where_clause {
                    Some(where_clause) if !where_clause.expressions.is_empty() => {
                        let mut existing = std::mem::take(&mut where_clause.expressions);
                        existing.push(joined);
                        where_clause.expressions = vec![Expression::conjunction(existing)];
                    }
                    Some(where_clause) => where_clause.expressions.push(joined),
                    None => {
                        match_clause.where_clause = Some(Where {
                            expressions: vec![joined],
                        })
                    }
                }
            }
        }

        Ok(())
    }

    fn track_property_addition(&mut self, symbol: &str, name: &str, value: CypherValue) {
        self.property_additions
            .entry(symbol.to_string())
            .or_default()
            .insert(name.to_string(), value);
    }

    fn track_property_removal(&mut self, symbol: &str, name: String) {
        self.property_removals
            .entry(symbol.to_string())
            .or_default()
            .push(name);
    }

    fn track_kind_addition(&mut self, symbol: &str, kinds: Vec<String>) {
        self.kind_additions
            .entry(symbol.to_string())
            .or_default()
            .extend(kinds);
    }

    fn track_kind_removal(&mut self, symbol: &str, kinds: Vec<String>) {
        self.kind_removals
            .entry(symbol.to_string())
            .or_default()
            .extend(kinds);
    }

    fn into_mutations(mut self) -> Result<Vec<UpdatingClause>, TranslateError> {
        let mut mutations = Vec::new();

        if self.node_delete || self.edge_delete {
            if let Some(binding) = self.delete_binding.take() {
                mutations.push(UpdatingClause::Mutation(Mutation::Delete(Delete {
                    binding,
                    node_delete: self.node_delete,
                    edge_delete: self.edge_delete,
                })));
            }
        }

        let property_symbols: BTreeSet<String> = self
            .property_additions
            .keys()
            .chain(self.property_removals.keys())
            .cloned()
            .collect();

        for symbol in property_symbols {
            let reference = self
                .binder
                .lookup_variable(&symbol)
                .ok_or_else(|| TranslateError::UnboundMutationTarget(symbol.clone()))?;

            let mut mutation = PropertyMutation {
                reference: PropertiesReference { reference },
                additions: None,
                removals: None,
            };

            if let Some(additions) = self.property_additions.get(&symbol) {
                let mut payload = serde_json::Map::new();
                for (name, value) in additions {
                    payload.insert(name.clone(), value.to_json()?);
                }
                mutation.additions = Some(
                    self.binder
                        .new_parameter(CypherValue::Json(JsonValue::Object(payload))),
                );
            }

            if let Some(removals) = self.property_removals.get(&symbol) {
                mutation.removals = Some(
                    self.binder
                        .new_parameter(CypherValue::TextArray(removals.clone())),
                );
            }

            mutations.push(UpdatingClause::Mutation(Mutation::Properties(mutation)));
        }

        let kind_symbols: BTreeSet<String> = self
            .kind_additions
            .keys()
            .chain(self.kind_removals.keys())
            .cloned()
            .collect();

        for symbol in kind_symbols {
            let variable = self
                .binder
                .lookup_variable(&symbol)
                .ok_or_else(|| TranslateError::UnboundMutationTarget(symbol.clone()))?;

            let mut mutation = KindMutation {
                variable,
                additions: None,
                removals: None,
            };

            if let Some(additions) = self.kind_additions.get(&symbol) {
                let ids = self.map_kinds(additions)?;
                mutation.additions = Some(self.binder.new_parameter(CypherValue::Int16Array(ids)));
            }

            if let Some(removals) = self.kind_removals.get(&symbol) {
                let ids = self.map_kinds(removals)?;
                mutation.removals = Some(self.binder.new_parameter(CypherValue::Int16Array(ids)));
            }

            mutations.push(UpdatingClause::Mutation(Mutation::Kinds(mutation)));
        }

        Ok(mutations)
    }

    fn map_kinds(&self, kinds: &[String]) -> Result<Vec<i16>, TranslateError> {
        let (ids, missing) = self.kind_mapper.map_kinds(kinds);
        if !missing.is_empty() {
            return Err(TranslateError::UnknownKinds(missing));
        }
        Ok(ids)
    }
}

fn unquote(text: &str) -> String {
    if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        text[1..text.len() - 1].to_string()
    } else {
        text.to_string()
    }
}

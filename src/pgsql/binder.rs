//! Variable and parameter binding.
//!
//! One `Binder` is created per translation call and discarded afterwards;
//! only its parameter table survives into the output. Concurrent
//! translations therefore never share mutable state.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::cypher::ast::{
    Match, NodePattern, PatternElement, PropertyMatcher, ReadingClause, RegularQuery,
    RelationshipPattern, SetItem, SingleQuery, SinglePartQuery, UpdatingClause,
};
use crate::cypher::expression::{Expression, Literal};
use crate::pgsql::annotations::{AnnotatedLiteral, AnnotatedParameter, AnnotatedVariable};
use crate::pgsql::errors::TranslateError;
use crate::pgsql::types::{literal_sql_type, CypherValue, DataType};

#[derive(Debug, Default)]
pub struct Binder {
    parameters: BTreeMap<String, (CypherValue, DataType)>,
    binding_types: HashMap<String, DataType>,
    aliases: HashMap<String, String>,
    pattern_bindings: HashSet<String>,
    synthetic_bindings: HashSet<String>,
    next_parameter_id: usize,
    next_binding_id: usize,
}

impl Binder {
    pub fn new() -> Self {
        Binder::default()
    }

    /// The collected parameter table, keyed by the generated symbols.
    pub fn parameters(&self) -> BTreeMap<String, CypherValue> {
        self.parameters
            .iter()
            .map(|(symbol, (value, _))| (symbol.clone(), value.clone()))
            .collect()
    }

    pub fn bind_variable(&mut self, symbol: &str, sql_type: DataType) -> AnnotatedVariable {
        self.binding_types.insert(symbol.to_string(), sql_type);
        AnnotatedVariable::new(symbol, sql_type)
    }

    pub fn bind_pattern_variable(&mut self, symbol: &str, sql_type: DataType) -> AnnotatedVariable {
        self.pattern_bindings.insert(symbol.to_string());
        self.bind_variable(symbol, sql_type)
    }

    pub fn binding_type(&self, symbol: &str) -> Option<DataType> {
        self.binding_types.get(symbol).copied()
    }

    pub fn lookup_variable(&self, symbol: &str) -> Option<AnnotatedVariable> {
        self.binding_type(symbol)
            .map(|sql_type| AnnotatedVariable::new(symbol, sql_type))
    }

    pub fn is_bound(&self, symbol: &str) -> bool {
        self.binding_types.contains_key(symbol)
    }

    pub fn is_synthetic(&self, symbol: &str) -> bool {
        self.synthetic_bindings.contains(symbol)
    }

    pub fn is_pattern_binding(&self, symbol: &str) -> bool {
        self.pattern_bindings.contains(symbol)
    }

    /// Generate a fresh binding name with the given prefix, skipping names
    /// the query already uses.
    pub fn new_binding(&mut self, prefix: &str) -> String {
        loop {
            let binding = format!("{}{}", prefix, self.next_binding_id);
            self.next_binding_id += 1;

            if !self.is_bound(&binding) {
                self.synthetic_bindings.insert(binding.clone());
                return binding;
            }
        }
    }

    pub fn new_annotated_variable(&mut self, prefix: &str, sql_type: DataType) -> AnnotatedVariable {
        let binding = self.new_binding(prefix);
        self.bind_variable(&binding, sql_type)
    }

    /// Record a parameter value under a fresh `pN` symbol.
    pub fn new_parameter(&mut self, value: CypherValue) -> AnnotatedParameter {
        let symbol = format!("p{}", self.next_parameter_id);
        self.next_parameter_id += 1;

        let sql_type = value.sql_type();
        self.parameters.insert(symbol.clone(), (value, sql_type));

        AnnotatedParameter { symbol, sql_type }
    }

    pub fn parameter_value(&self, symbol: &str) -> Option<&CypherValue> {
        self.parameters.get(symbol).map(|(value, _)| value)
    }

    /// Replace a recorded parameter's value, preserving its symbol.
    pub fn update_parameter(&mut self, symbol: &str, value: CypherValue) {
        let sql_type = value.sql_type();
        self.parameters.insert(symbol.to_string(), (value, sql_type));
    }

    pub fn annotate_literal(&self, literal: Literal) -> Result<AnnotatedLiteral, TranslateError> {
        let sql_type = literal_sql_type(&literal)?;
        Ok(AnnotatedLiteral::new(literal, sql_type))
    }

    /// Register a projection alias, binding it with the aliased variable's
    /// type when that is known.
    pub fn new_alias(&mut self, original: &str, alias: &str) -> AnnotatedVariable {
        self.aliases.insert(original.to_string(), alias.to_string());

        match self.binding_type(original) {
            Some(sql_type) => self.bind_variable(alias, sql_type),
            None => self.bind_variable(alias, DataType::Unknown),
        }
    }

    pub fn alias_of(&self, original: &str) -> Option<&str> {
        self.aliases.get(original).map(String::as_str)
    }

    /// The single depth-first annotation pass over the query.
    pub fn scan(&mut self, query: &mut RegularQuery) -> Result<(), TranslateError> {
        match &mut query.single_query {
            SingleQuery::MultiPart(_) => Err(TranslateError::MultiPartQueryUnsupported),
            SingleQuery::SinglePart(single_part) => self.scan_single_part(single_part),
        }
    }

    fn scan_single_part(&mut self, query: &mut SinglePartQuery) -> Result<(), TranslateError> {
        for reading_clause in &mut query.reading_clauses {
            let ReadingClause::Match(match_clause) = reading_clause;
            self.scan_match(match_clause)?;
        }

        for updating_clause in &mut query.updating_clauses {
            match updating_clause {
                UpdatingClause::Set(set) => {
                    for item in &mut set.items {
                        if let SetItem::Property { value, .. } = item {
                            self.scan_expression(value)?;
                        }
                    }
                }
                UpdatingClause::Delete(delete) => {
                    for expression in &mut delete.expressions {
                        let symbol = match &*expression {
                            Expression::Variable(variable) => variable.symbol.clone(),
                            _ => continue,
                        };

                        let annotated = self
                            .lookup_variable(&symbol)
                            .ok_or(TranslateError::UnboundVariable(symbol))?;
                        *expression = Expression::AnnotatedVariable(annotated);
                    }
                }
                UpdatingClause::Create(_)
                | UpdatingClause::Remove(_)
                | UpdatingClause::Mutation(_) => {}
            }
        }

        if let Some(projection) = &mut query.return_clause {
            for item in &mut projection.items {
                self.scan_expression(&mut item.expression)?;

                // Register `return s as m` style aliases so later passes can
                // re-type the alias.
                let alias_pair = match (&item.alias, &item.expression) {
                    (Some(Expression::Variable(alias)), Expression::Variable(original)) => {
                        Some((original.symbol.clone(), alias.symbol.clone()))
                    }
                    _ => None,
                };

                if let Some((original, alias)) = alias_pair {
                    let annotated = self.new_alias(&original, &alias);
                    item.alias = Some(Expression::AnnotatedVariable(annotated));
                }
            }

            if let Some(order) = &mut projection.order {
                for item in &mut order.items {
                    self.scan_expression(&mut item.expression)?;
                }
            }

            if let Some(skip) = &mut projection.skip {
                self.scan_expression(skip)?;
            }

            if let Some(limit) = &mut projection.limit {
                self.scan_expression(limit)?;
            }
        }

        log::trace!(
            "binder scan complete: {} bindings, {} parameters",
            self.binding_types.len(),
            self.parameters.len()
        );

        Ok(())
    }

    fn scan_match(&mut self, match_clause: &mut Match) -> Result<(), TranslateError> {
        for part in &mut match_clause.pattern {
            if let Some(binding) = &mut part.binding {
                let symbol = match &*binding {
                    Expression::Variable(variable) => variable.symbol.clone(),
                    other => {
                        return Err(TranslateError::unexpected("pattern part binding", other))
                    }
                };

                let annotated = self.bind_pattern_variable(&symbol, DataType::Path);
                *binding = Expression::AnnotatedVariable(annotated);
            }

            for element in &mut part.elements {
                self.scan_pattern_element(element, false)?;
            }
        }

        if let Some(where_clause) = &mut match_clause.where_clause {
            for expression in &mut where_clause.expressions {
                self.scan_expression(expression)?;
            }
        }

        Ok(())
    }

    fn scan_pattern_element(
        &mut self,
        element: &mut PatternElement,
        in_predicate: bool,
    ) -> Result<(), TranslateError> {
        match element {
            PatternElement::Node(node) => self.scan_node_pattern(node, in_predicate),
            PatternElement::Relationship(relationship) => {
                self.scan_relationship_pattern(relationship, in_predicate)
            }
        }
    }

    fn scan_node_pattern(
        &mut self,
        node: &mut NodePattern,
        in_predicate: bool,
    ) -> Result<(), TranslateError> {
        let symbol = match &node.binding {
            None => None,
            Some(Expression::Variable(variable)) => Some(variable.symbol.clone()),
            Some(other) => return Err(TranslateError::unexpected("node pattern binding", other)),
        };

        let annotated = match symbol {
            None => self.new_annotated_variable("n", DataType::Node),
            // Nested existential checks get a plain binding so they never
            // collide with outer pattern bindings of the same name.
            Some(symbol) if in_predicate => self.bind_variable(&symbol, DataType::Node),
            Some(symbol) => self.bind_pattern_variable(&symbol, DataType::Node),
        };
        node.binding = Some(Expression::AnnotatedVariable(annotated));

        self.scan_property_matcher(&mut node.properties)
    }

    fn scan_relationship_pattern(
        &mut self,
        relationship: &mut RelationshipPattern,
        in_predicate: bool,
    ) -> Result<(), TranslateError> {
        let symbol = match &relationship.binding {
            None => None,
            Some(Expression::Variable(variable)) => Some(variable.symbol.clone()),
            Some(other) => {
                return Err(TranslateError::unexpected(
                    "relationship pattern binding",
                    other,
                ))
            }
        };

        let annotated = match symbol {
            None => self.new_annotated_variable("e", DataType::Edge),
            Some(symbol) if in_predicate => self.bind_variable(&symbol, DataType::Edge),
            Some(symbol) => self.bind_pattern_variable(&symbol, DataType::Edge),
        };
        relationship.binding = Some(Expression::AnnotatedVariable(annotated));

        self.scan_property_matcher(&mut relationship.properties)
    }

    fn scan_property_matcher(
        &mut self,
        properties: &mut Option<PropertyMatcher>,
    ) -> Result<(), TranslateError> {
        if let Some(PropertyMatcher::Map(map)) = properties {
            for value in map.values_mut() {
                self.scan_expression(value)?;
            }
        }

        Ok(())
    }

    /// Annotate literals and parameters within an expression tree and bind
    /// the elements of any nested pattern predicate.
    fn scan_expression(&mut self, expression: &mut Expression) -> Result<(), TranslateError> {
        match expression {
            Expression::Parameter(parameter) => {
                let annotated = self.new_parameter(parameter.value.clone());
                *expression = Expression::AnnotatedParameter(annotated);
            }
            Expression::Literal(_) => {
                let Expression::Literal(literal) =
                    std::mem::replace(expression, Expression::Literal(Literal::null()))
                else {
                    unreachable!()
                };
                let annotated = self.annotate_literal(literal)?;
                *expression = Expression::AnnotatedLiteral(annotated);
            }
            Expression::PatternPredicate(predicate) => {
                for element in &mut predicate.elements {
                    self.scan_pattern_element(element, true)?;
                }
            }
            Expression::PropertyLookup(lookup) => self.scan_expression(&mut lookup.atom)?,
            Expression::Comparison(comparison) => {
                self.scan_expression(&mut comparison.left)?;
                for partial in &mut comparison.partials {
                    self.scan_expression(&mut partial.right)?;
                }
            }
            Expression::Conjunction(expressions)
            | Expression::Disjunction(expressions)
            | Expression::ExclusiveDisjunction(expressions) => {
                for expression in expressions {
                    self.scan_expression(expression)?;
                }
            }
            Expression::Negation(inner) | Expression::Parenthetical(inner) => {
                self.scan_expression(inner)?;
            }
            Expression::FunctionInvocation(function) => {
                for argument in &mut function.arguments {
                    self.scan_expression(argument)?;
                }
            }
            Expression::KindMatcher(matcher) => self.scan_expression(&mut matcher.reference)?,
            Expression::Variable(_) => {}
            Expression::AnnotatedLiteral(_)
            | Expression::AnnotatedVariable(_)
            | Expression::AnnotatedParameter(_)
            | Expression::AnnotatedPropertyLookup(_)
            | Expression::AnnotatedKindMatcher(_)
            | Expression::Entity(_)
            | Expression::NodeKindsReference(_)
            | Expression::EdgeKindReference(_)
            | Expression::PropertiesReference(_)
            | Expression::EdgeEndpointReference(_)
            | Expression::Subquery(_) => {}
        }

        Ok(())
    }
}

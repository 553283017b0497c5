//! SQL text generation over the fully rewritten query tree.

use crate::cypher::ast::{
    Direction, PatternElement, Projection, ReadingClause, RegularQuery, RelationshipPattern,
    SingleQuery, SinglePartQuery, Where,
};
use crate::cypher::expression::{Expression, FunctionInvocation, Literal};
use crate::graph_catalog::KindMapper;
use crate::pgsql::annotations::{EdgeEndpoint, Mutation};
use crate::pgsql::errors::TranslateError;
use crate::pgsql::function_registry::{
    CYPHER_COUNT_FUNCTION, CYPHER_IDENTITY_FUNCTION, CYPHER_TO_LOWER_FUNCTION, PGSQL_ANY_FUNCTION,
    PGSQL_TO_JSONB_FUNCTION, PGSQL_TO_LOWER_FUNCTION, TEMPORAL_FUNCTION_RENDERING,
};
use crate::pgsql::types::DataType;
use crate::pgsql::variable_length_cte::TraversalCte;
use crate::pgsql::{EDGE_TABLE, NODE_TABLE};

const STRIPPED_LITERAL: &str = "$STRIPPED";

pub struct Emitter<'a, K: KindMapper + ?Sized> {
    /// Replace literal text with a placeholder, for log-safe fingerprints.
    strip_literals: bool,
    kind_mapper: &'a K,
}

impl<'a, K: KindMapper + ?Sized> Emitter<'a, K> {
    pub fn new(strip_literals: bool, kind_mapper: &'a K) -> Self {
        Emitter {
            strip_literals,
            kind_mapper,
        }
    }

    pub fn write(&self, query: &RegularQuery) -> Result<String, TranslateError> {
        match &query.single_query {
            SingleQuery::MultiPart(_) => Err(TranslateError::MultiPartQueryUnsupported),
            SingleQuery::SinglePart(single_part) => {
                let mut output = String::new();
                self.write_single_part_query(&mut output, single_part)?;
                Ok(output)
            }
        }
    }

    fn write_single_part_query(
        &self,
        output: &mut String,
        query: &SinglePartQuery,
    ) -> Result<(), TranslateError> {
        if query.updating_clauses.is_empty() {
            self.write_select(output, query)
        } else {
            self.write_updating_clauses(output, query)
        }
    }

    fn write_select(
        &self,
        output: &mut String,
        query: &SinglePartQuery,
    ) -> Result<(), TranslateError> {
        let traversals = TraversalCte::collect(query)?;

        if !traversals.is_empty() {
            output.push_str("with recursive ");
            for (index, traversal) in traversals.iter().enumerate() {
                if index > 0 {
                    output.push_str(", ");
                }
                traversal.write_definition(output, self)?;
            }
            output.push(' ');
        }

        output.push_str("select ");

        if let Some(projection) = &query.return_clause {
            self.write_projection(output, projection)?;
        }

        output.push_str(" from ");

        for reading_clause in &query.reading_clauses {
            let ReadingClause::Match(match_clause) = reading_clause;

            for (index, part) in match_clause.pattern.iter().enumerate() {
                if index > 0 {
                    output.push_str(", ");
                }
                self.write_pattern_elements(output, &part.elements, &traversals)?;
            }

            if let Some(where_clause) = &match_clause.where_clause {
                self.write_where(output, where_clause)?;
            }
        }

        if let Some(projection) = &query.return_clause {
            if let Some(order) = &projection.order {
                output.push_str(" order by ");
                for (index, item) in order.items.iter().enumerate() {
                    if index > 0 {
                        output.push_str(", ");
                    }
                    self.write_expression(output, &item.expression)?;
                    output.push_str(if item.ascending { " asc" } else { " desc" });
                }
            }

            if let Some(skip) = &projection.skip {
                output.push_str(" offset ");
                self.write_expression(output, skip)?;
            }

            if let Some(limit) = &projection.limit {
                output.push_str(" limit ");
                self.write_expression(output, limit)?;
            }
        }

        Ok(())
    }

    fn write_projection(
        &self,
        output: &mut String,
        projection: &Projection,
    ) -> Result<(), TranslateError> {
        if projection.distinct {
            output.push_str("distinct ");
        }

        for (index, item) in projection.items.iter().enumerate() {
            if index > 0 {
                output.push_str(", ");
            }

            self.write_expression(output, &item.expression)?;
            output.push_str(" as ");

            match &item.alias {
                Some(alias) => self.write_expression(output, alias)?,
                None => {
                    // No explicit alias: quote a readable rendering of the
                    // projected expression.
                    output.push('"');
                    match &item.expression {
                        Expression::PropertyLookup(lookup) => {
                            self.write_expression(output, &lookup.atom)?;
                            output.push('.');
                            output.push_str(lookup.path.first().map(String::as_str).unwrap_or(""));
                        }
                        Expression::AnnotatedPropertyLookup(annotated) => {
                            self.write_expression(output, &annotated.lookup.atom)?;
                            output.push('.');
                            output.push_str(
                                annotated.lookup.path.first().map(String::as_str).unwrap_or(""),
                            );
                        }
                        Expression::Entity(entity) => output.push_str(&entity.binding.symbol),
                        Expression::NodeKindsReference(_)
                        | Expression::EdgeKindReference(_)
                        | Expression::FunctionInvocation(_)
                        | Expression::AnnotatedVariable(_) => {
                            self.write_expression(output, &item.expression)?;
                        }
                        other => {
                            return Err(TranslateError::unexpected(
                                "projection item alias formatting",
                                other,
                            ))
                        }
                    }
                    output.push('"');
                }
            }
        }

        Ok(())
    }

    fn write_where(&self, output: &mut String, where_clause: &Where) -> Result<(), TranslateError> {
        if where_clause.expressions.is_empty() {
            return Ok(());
        }

        output.push_str(" where ");

        for (index, expression) in where_clause.expressions.iter().enumerate() {
            if index > 0 {
                output.push_str(" and ");
            }
            self.write_expression(output, expression)?;
        }

        Ok(())
    }

    /// Render a pattern as a join chain. The first element names its table
    /// with an alias; every following element joins on the adjacent
    /// relationship's endpoint columns, or on a traversal CTE when the
    /// relationship is variable-length.
    fn write_pattern_elements(
        &self,
        output: &mut String,
        elements: &[PatternElement],
        traversals: &[TraversalCte],
    ) -> Result<(), TranslateError> {
        for (index, element) in elements.iter().enumerate() {
            match element {
                PatternElement::Node(node) => {
                    let binding = pattern_binding(&node.binding)?;

                    if index == 0 {
                        output.push_str(NODE_TABLE);
                        output.push_str(" as ");
                        self.write_expression(output, binding)?;
                        continue;
                    }

                    let PatternElement::Relationship(previous) = &elements[index - 1] else {
                        return Err(TranslateError::UnexpectedExpression {
                            context: "pattern element sequence".to_string(),
                            found: "Node".to_string(),
                        });
                    };

                    output.push_str(" join ");
                    output.push_str(NODE_TABLE);
                    output.push(' ');
                    self.write_expression(output, binding)?;
                    output.push_str(" on ");

                    if previous.range.is_some() {
                        let traversal = find_traversal(traversals, previous)?;
                        self.write_expression(output, binding)?;
                        output.push_str(".id = ");
                        output.push_str(&traversal.name);
                        output.push_str(".next_id");
                        continue;
                    }

                    let previous_binding = pattern_binding(&previous.binding)?;

                    match previous.direction {
                        Direction::Outbound => {
                            self.write_expression(output, binding)?;
                            output.push_str(".id = ");
                            self.write_expression(output, previous_binding)?;
                            output.push_str(".end_id");
                        }
                        Direction::Inbound => {
                            self.write_expression(output, binding)?;
                            output.push_str(".id = ");
                            self.write_expression(output, previous_binding)?;
                            output.push_str(".start_id");
                        }
                        Direction::Both => {
                            self.write_expression(output, binding)?;
                            output.push_str(".id = ");
                            self.write_expression(output, previous_binding)?;
                            output.push_str(".start_id or ");
                            self.write_expression(output, binding)?;
                            output.push_str(".id = ");
                            self.write_expression(output, previous_binding)?;
                            output.push_str(".end_id");
                        }
                    }
                }
                PatternElement::Relationship(relationship) => {
                    if relationship.range.is_some() {
                        let traversal = find_traversal(traversals, relationship)?;

                        if index == 0 {
                            return Err(TranslateError::UnexpectedExpression {
                                context: "variable-length pattern".to_string(),
                                found: "Relationship".to_string(),
                            });
                        }

                        let PatternElement::Node(previous) = &elements[index - 1] else {
                            return Err(TranslateError::UnexpectedExpression {
                                context: "pattern element sequence".to_string(),
                                found: "Relationship".to_string(),
                            });
                        };
                        let previous_binding = pattern_binding(&previous.binding)?;

                        output.push_str(" join ");
                        output.push_str(&traversal.name);
                        output.push_str(" on ");
                        output.push_str(&traversal.name);
                        output.push_str(".root_id = ");
                        self.write_expression(output, previous_binding)?;
                        output.push_str(".id");

                        if traversal.min_hops > 1 {
                            output.push_str(&format!(
                                " and {}.depth >= {}",
                                traversal.name,
                                traversal.min_hops - 1
                            ));
                        }

                        continue;
                    }

                    let binding = pattern_binding(&relationship.binding)?;

                    if index == 0 {
                        output.push_str(EDGE_TABLE);
                        output.push_str(" as ");
                        self.write_expression(output, binding)?;
                        continue;
                    }

                    let PatternElement::Node(previous) = &elements[index - 1] else {
                        return Err(TranslateError::UnexpectedExpression {
                            context: "pattern element sequence".to_string(),
                            found: "Relationship".to_string(),
                        });
                    };
                    let previous_binding = pattern_binding(&previous.binding)?;

                    output.push_str(" join ");
                    output.push_str(EDGE_TABLE);
                    output.push(' ');
                    self.write_expression(output, binding)?;
                    output.push_str(" on ");

                    match relationship.direction {
                        Direction::Outbound => {
                            self.write_expression(output, binding)?;
                            output.push_str(".start_id = ");
                            self.write_expression(output, previous_binding)?;
                            output.push_str(".id");
                        }
                        Direction::Inbound => {
                            self.write_expression(output, binding)?;
                            output.push_str(".end_id = ");
                            self.write_expression(output, previous_binding)?;
                            output.push_str(".id");
                        }
                        Direction::Both => {
                            self.write_expression(output, binding)?;
                            output.push_str(".start_id = ");
                            self.write_expression(output, previous_binding)?;
                            output.push_str(".id or ");
                            self.write_expression(output, binding)?;
                            output.push_str(".end_id = ");
                            self.write_expression(output, previous_binding)?;
                            output.push_str(".id");
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn write_updating_clauses(
        &self,
        output: &mut String,
        query: &SinglePartQuery,
    ) -> Result<(), TranslateError> {
        // Delete statements render as their own outputs.
        let mut delete_count = 0;

        for clause in &query.updating_clauses {
            if let crate::cypher::ast::UpdatingClause::Mutation(Mutation::Delete(delete)) = clause {
                delete_count += 1;
                self.write_delete(output, query, delete)?;
            }
        }

        if query.updating_clauses.len() > delete_count {
            self.write_updates(output, query)?;
        }

        Ok(())
    }

    fn write_delete(
        &self,
        output: &mut String,
        query: &SinglePartQuery,
        delete: &crate::pgsql::annotations::Delete,
    ) -> Result<(), TranslateError> {
        output.push_str("delete from ");
        output.push_str(delete.table());
        output.push_str(" as ");
        output.push_str(&delete.binding.symbol);

        let mut first = true;

        for reading_clause in &query.reading_clauses {
            let ReadingClause::Match(match_clause) = reading_clause;

            for part in &match_clause.pattern {
                for element in &part.elements {
                    match element {
                        PatternElement::Node(node) => {
                            let binding = pattern_binding(&node.binding)?;
                            if binding.symbol() == Some(delete.binding.symbol.as_str()) {
                                continue;
                            }
                            self.write_using_entry(output, &mut first, NODE_TABLE, binding)?;
                        }
                        PatternElement::Relationship(relationship) => {
                            // An edge delete joins only the node tables.
                            if !delete.node_delete {
                                continue;
                            }
                            let binding = pattern_binding(&relationship.binding)?;
                            if binding.symbol() == Some(delete.binding.symbol.as_str()) {
                                continue;
                            }
                            self.write_using_entry(output, &mut first, EDGE_TABLE, binding)?;
                        }
                    }
                }
            }
        }

        for reading_clause in &query.reading_clauses {
            let ReadingClause::Match(match_clause) = reading_clause;
            if let Some(where_clause) = &match_clause.where_clause {
                self.write_where(output, where_clause)?;
            }
        }

        Ok(())
    }

    fn write_using_entry(
        &self,
        output: &mut String,
        first: &mut bool,
        table: &str,
        binding: &Expression,
    ) -> Result<(), TranslateError> {
        if *first {
            output.push_str(" using ");
            *first = false;
        } else {
            output.push_str(", ");
        }

        output.push_str(table);
        output.push_str(" as ");
        self.write_expression(output, binding)
    }

    fn write_updates(
        &self,
        output: &mut String,
        query: &SinglePartQuery,
    ) -> Result<(), TranslateError> {
        output.push_str("update ");

        for reading_clause in &query.reading_clauses {
            let ReadingClause::Match(match_clause) = reading_clause;
            for (index, part) in match_clause.pattern.iter().enumerate() {
                if index > 0 {
                    output.push_str(", ");
                }
                self.write_pattern_elements(output, &part.elements, &[])?;
            }
        }

        output.push_str(" set ");

        let mut first = true;

        for clause in &query.updating_clauses {
            let crate::cypher::ast::UpdatingClause::Mutation(mutation) = clause else {
                return Err(TranslateError::UnexpectedExpression {
                    context: "update clause item".to_string(),
                    found: "unrewritten updating clause".to_string(),
                });
            };

            match mutation {
                Mutation::Delete(_) => continue,
                Mutation::Properties(property_mutation) => {
                    if !first {
                        output.push_str(", ");
                    }
                    first = false;

                    // Aliased names are not valid in a set clause, so the
                    // raw column name is used.
                    output.push_str("properties = properties");

                    if let Some(additions) = &property_mutation.additions {
                        if let Some(removals) = &property_mutation.removals {
                            output.push_str(" - @");
                            output.push_str(&removals.symbol);
                            output.push_str("::text[]");
                        }
                        output.push_str(" || @");
                        output.push_str(&additions.symbol);
                    } else if let Some(removals) = &property_mutation.removals {
                        output.push_str(" - @");
                        output.push_str(&removals.symbol);
                        output.push_str("::text[]");
                    }
                }
                Mutation::Kinds(kind_mutation) => {
                    // Kind mutation of relationships is not expressible.
                    if kind_mutation.variable.sql_type != DataType::Node {
                        return Err(TranslateError::UnsupportedKindMutation(
                            kind_mutation.variable.sql_type,
                        ));
                    }

                    if !first {
                        output.push_str(", ");
                    }
                    first = false;

                    output.push_str("kind_ids = kind_ids");

                    if let Some(additions) = &kind_mutation.additions {
                        if let Some(removals) = &kind_mutation.removals {
                            output.push_str(" - @");
                            output.push_str(&removals.symbol);
                        }
                        output.push_str(" || @");
                        output.push_str(&additions.symbol);
                    } else if let Some(removals) = &kind_mutation.removals {
                        output.push_str(" - @");
                        output.push_str(&removals.symbol);
                    }
                }
            }
        }

        for reading_clause in &query.reading_clauses {
            let ReadingClause::Match(match_clause) = reading_clause;
            if let Some(where_clause) = &match_clause.where_clause {
                self.write_where(output, where_clause)?;
            }
        }

        if let Some(projection) = &query.return_clause {
            output.push_str(" returning ");
            self.write_projection(output, projection)?;
        }

        Ok(())
    }

    pub fn write_expression(
        &self,
        output: &mut String,
        expression: &Expression,
    ) -> Result<(), TranslateError> {
        match expression {
            Expression::Subquery(subquery) => {
                output.push_str("exists(select * from ");
                self.write_pattern_elements(output, &subquery.elements, &[])?;
                if let Some(filter) = &subquery.filter {
                    output.push_str(" where ");
                    self.write_expression(output, filter)?;
                }
                output.push_str(" limit 1)");
            }
            Expression::Negation(inner) => {
                output.push_str("not ");
                self.write_expression(output, inner)?;
            }
            Expression::Conjunction(members) => {
                self.write_joined(output, members, " and ")?;
            }
            Expression::Disjunction(members) => {
                self.write_joined(output, members, " or ")?;
            }
            Expression::Comparison(comparison) => {
                self.write_expression(output, &comparison.left)?;
                for partial in &comparison.partials {
                    output.push(' ');
                    output.push_str(&partial.operator.to_string());
                    output.push(' ');
                    self.write_expression(output, &partial.right)?;
                }
            }
            Expression::AnnotatedLiteral(annotated) => {
                self.write_literal(output, &annotated.literal)?;
            }
            Expression::Literal(literal) => self.write_literal(output, literal)?,
            Expression::Variable(variable) => output.push_str(&variable.symbol),
            Expression::AnnotatedVariable(variable) => output.push_str(&variable.symbol),
            Expression::Entity(entity) => {
                let symbol = &entity.binding.symbol;
                match entity.binding.sql_type {
                    DataType::Node => output.push_str(&format!(
                        "({symbol}.id, {symbol}.kind_ids, {symbol}.properties)::nodeComposite"
                    )),
                    DataType::Edge => output.push_str(&format!(
                        "({symbol}.id, {symbol}.start_id, {symbol}.end_id, {symbol}.kind_id, {symbol}.properties)::edgeComposite"
                    )),
                    DataType::Path => return Err(TranslateError::PathProjectionUnsupported),
                    other => {
                        return Err(TranslateError::UnexpectedExpression {
                            context: "entity projection".to_string(),
                            found: other.to_string(),
                        })
                    }
                }
            }
            Expression::NodeKindsReference(reference) => {
                output.push_str(&reference.variable.symbol);
                output.push_str(".kind_ids");
            }
            Expression::EdgeKindReference(reference) => {
                output.push_str(&reference.variable.symbol);
                output.push_str(".kind_id");
            }
            Expression::AnnotatedPropertyLookup(annotated) => {
                output.push('(');
                self.write_expression(output, &annotated.lookup.atom)?;

                // Temporal and text types cannot be cast straight out of a
                // JSONB value; the `->>` operator coerces to text first.
                let extraction = match annotated.sql_type {
                    DataType::Date
                    | DataType::TimeWithTimeZone
                    | DataType::TimeWithoutTimeZone
                    | DataType::TimestampWithTimeZone
                    | DataType::TimestampWithoutTimeZone
                    | DataType::Text => ".properties->>'",
                    _ => ".properties->'",
                };
                output.push_str(extraction);
                output.push_str(annotated.lookup.path.first().map(String::as_str).unwrap_or(""));
                output.push_str("')::");
                output.push_str(&annotated.sql_type.to_string());
            }
            Expression::PropertyLookup(lookup) => {
                self.write_expression(output, &lookup.atom)?;
                output.push_str(".properties->'");
                output.push_str(lookup.path.first().map(String::as_str).unwrap_or(""));
                output.push('\'');
            }
            Expression::AnnotatedKindMatcher(matcher) => {
                self.write_expression(output, &matcher.reference)?;

                let (ids, missing) = self.kind_mapper.map_kinds(&matcher.kinds);
                if !missing.is_empty() {
                    return Err(TranslateError::UnknownKinds(missing));
                }

                let id_list = ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");

                match matcher.sql_type {
                    DataType::Node => output.push_str(&format!(
                        ".kind_ids operator(pg_catalog.&&) array[{id_list}]::int2[]"
                    )),
                    DataType::Edge => {
                        output.push_str(&format!(".kind_id = any(array[{id_list}]::int2[])"))
                    }
                    other => {
                        return Err(TranslateError::UnexpectedExpression {
                            context: "kind matcher type".to_string(),
                            found: other.to_string(),
                        })
                    }
                }
            }
            Expression::FunctionInvocation(function) => {
                self.write_function_invocation(output, function)?;
            }
            Expression::Parameter(parameter) => {
                output.push('@');
                output.push_str(&parameter.symbol);
            }
            Expression::AnnotatedParameter(parameter) => {
                output.push('@');
                output.push_str(&parameter.symbol);
            }
            Expression::Parenthetical(inner) => {
                output.push('(');
                self.write_expression(output, inner)?;
                output.push(')');
            }
            Expression::PropertiesReference(reference) => {
                output.push_str(&reference.reference.symbol);
                output.push_str(".properties");
            }
            Expression::EdgeEndpointReference(reference) => {
                output.push_str(&reference.binding.symbol);
                output.push_str(match reference.endpoint {
                    EdgeEndpoint::Start => ".start_id",
                    EdgeEndpoint::End => ".end_id",
                });
            }
            other @ (Expression::ExclusiveDisjunction(_)
            | Expression::KindMatcher(_)
            | Expression::PatternPredicate(_)) => {
                return Err(TranslateError::unexpected("SQL formatting", other))
            }
        }

        Ok(())
    }

    fn write_joined(
        &self,
        output: &mut String,
        members: &[Expression],
        separator: &str,
    ) -> Result<(), TranslateError> {
        for (index, member) in members.iter().enumerate() {
            if index > 0 {
                output.push_str(separator);
            }
            self.write_expression(output, member)?;
        }

        Ok(())
    }

    fn write_literal(&self, output: &mut String, literal: &Literal) -> Result<(), TranslateError> {
        if self.strip_literals {
            output.push_str(STRIPPED_LITERAL);
            return Ok(());
        }

        match literal {
            Literal::Scalar(value) => value.write_sql(output)?,
            Literal::List(items) => {
                output.push_str("array[");
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        output.push_str(", ");
                    }
                    self.write_expression(output, item)?;
                }
                output.push(']');
            }
            Literal::Map(entries) => {
                output.push('{');
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        output.push_str(", ");
                    }
                    output.push_str(key);
                    output.push_str(": ");
                    self.write_expression(output, value)?;
                }
                output.push('}');
            }
        }

        Ok(())
    }

    fn write_function_invocation(
        &self,
        output: &mut String,
        function: &FunctionInvocation,
    ) -> Result<(), TranslateError> {
        match function.name.as_str() {
            CYPHER_IDENTITY_FUNCTION => {
                self.write_expression(output, first_argument(function)?)?;
                output.push_str(".id");
            }
            name if TEMPORAL_FUNCTION_RENDERING.contains_key(name) => {
                let rendering = &TEMPORAL_FUNCTION_RENDERING[name];
                match function.arguments.first() {
                    Some(argument) => {
                        self.write_expression(output, argument)?;
                        output.push_str(rendering.cast);
                    }
                    None => output.push_str(rendering.no_argument),
                }
            }
            CYPHER_TO_LOWER_FUNCTION => {
                output.push_str(PGSQL_TO_LOWER_FUNCTION);
                output.push('(');
                self.write_expression(output, first_argument(function)?)?;
                output.push(')');
            }
            CYPHER_COUNT_FUNCTION => {
                output.push_str("count(");
                for argument in &function.arguments {
                    self.write_expression(output, argument)?;
                }
                output.push(')');
            }
            PGSQL_ANY_FUNCTION | PGSQL_TO_JSONB_FUNCTION => {
                output.push_str(&function.name);
                output.push('(');
                self.write_expression(output, first_argument(function)?)?;
                output.push(')');
            }
            _ => return Err(TranslateError::UnsupportedFunction(function.name.clone())),
        }

        Ok(())
    }
}

fn first_argument(function: &FunctionInvocation) -> Result<&Expression, TranslateError> {
    function
        .arguments
        .first()
        .ok_or_else(|| TranslateError::UnsupportedFunction(function.name.clone()))
}

fn pattern_binding(binding: &Option<Expression>) -> Result<&Expression, TranslateError> {
    binding
        .as_ref()
        .ok_or_else(|| TranslateError::UnexpectedExpression {
            context: "pattern element binding".to_string(),
            found: "None".to_string(),
        })
}

fn find_traversal<'t>(
    traversals: &'t [TraversalCte],
    relationship: &RelationshipPattern,
) -> Result<&'t TraversalCte, TranslateError> {
    let symbol = relationship
        .binding
        .as_ref()
        .and_then(|binding| binding.symbol())
        .unwrap_or("");

    traversals
        .iter()
        .find(|traversal| traversal.binding.symbol == symbol)
        .ok_or_else(|| TranslateError::TraversalUnsupportedIn("this clause".to_string()))
}

use std::collections::BTreeMap;

use graphpg::cypher::ast::{
    Direction, MultiPartQuery, NodePattern, Order, OrderItem, PatternElement, Projection,
    ProjectionItem, RegularQuery, RelationshipPattern, SingleQuery,
};

use graphpg::cypher::expression::{Expression, Literal, Operator, PatternPredicate};
use graphpg::pgsql::types::CypherValue;
use graphpg::pgsql::Emitter;
use graphpg::TranslateError;

use super::{
    catalog, check, check_error, return_variables, select_query, select_query_parts,
    translate_query,
};

fn node(symbol: &str) -> PatternElement {
    PatternElement::Node(NodePattern::named(symbol))
}

fn anonymous_node() -> PatternElement {
    PatternElement::Node(NodePattern::anonymous())
}

fn relationship(symbol: &str, direction: Direction) -> PatternElement {
    PatternElement::Relationship(RelationshipPattern::named(symbol, direction))
}

fn anonymous_relationship(direction: Direction) -> PatternElement {
    PatternElement::Relationship(RelationshipPattern::anonymous(direction))
}

#[test]
fn select_with_skip_and_limit() {
    let mut projection = return_variables(&["s"]);
    projection.skip = Some(Expression::literal(Literal::integer(5)));
    projection.limit = Some(Expression::literal(Literal::integer(10)));

    check(
        select_query(vec![node("s")], None, projection),
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s offset 5 limit 10",
    );
}

#[test]
fn select_with_order_by() {
    let mut projection = return_variables(&["s"]);
    projection.order = Some(Order {
        items: vec![
            OrderItem {
                expression: Expression::property("s", "name"),
                ascending: true,
            },
            OrderItem {
                expression: Expression::property("s", "other_prop"),
                ascending: false,
            },
        ],
    });

    check(
        select_query(vec![node("s")], None, projection),
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s order by s.properties->'name' asc, s.properties->'other_prop' desc",
    );
}

#[test]
fn projection_alias_is_preserved() {
    let projection = Projection::new(vec![ProjectionItem::aliased(
        Expression::variable("s"),
        "m",
    )]);

    check(
        select_query(vec![node("s")], None, projection),
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as m from node as s",
    );
}

#[test]
fn kind_filters_are_lifted_from_the_pattern() {
    let elements = vec![
        PatternElement::Node(NodePattern::named("s").with_kind("NodeKindA")),
        PatternElement::Relationship(
            RelationshipPattern::named("r", Direction::Outbound)
                .with_kind("EdgeKindA")
                .with_kind("EdgeKindB"),
        ),
        PatternElement::Node(NodePattern::named("e").with_kind("NodeKindB")),
    ];

    let projection = Projection::new(vec![
        ProjectionItem::new(Expression::property("s", "name")),
        ProjectionItem::new(Expression::property("e", "name")),
    ]);

    check(
        select_query(elements, None, projection),
        "select s.properties->'name' as \"s.name\", e.properties->'name' as \"e.name\" from node as s join edge r on r.start_id = s.id join node e on e.id = r.end_id where s.kind_ids operator(pg_catalog.&&) array[1]::int2[] and r.kind_id = any(array[100, 101]::int2[]) and e.kind_ids operator(pg_catalog.&&) array[2]::int2[]",
    );
}

#[test]
fn inbound_relationships_reverse_the_join_columns() {
    let elements = vec![
        node("s"),
        PatternElement::Relationship(
            RelationshipPattern::named("r", Direction::Inbound)
                .with_kind("EdgeKindA")
                .with_kind("EdgeKindB"),
        ),
        node("e"),
    ];

    let projection = Projection::new(vec![
        ProjectionItem::new(Expression::property("s", "name")),
        ProjectionItem::new(Expression::property("e", "name")),
    ]);

    check(
        select_query(elements, None, projection),
        "select s.properties->'name' as \"s.name\", e.properties->'name' as \"e.name\" from node as s join edge r on r.end_id = s.id join node e on e.id = r.start_id where r.kind_id = any(array[100, 101]::int2[])",
    );
}

#[test]
fn property_matchers_lift_ahead_of_the_user_where_clause() {
    let elements = vec![
        PatternElement::Node(
            NodePattern::named("s").with_property("value", Expression::literal(Literal::string("PII"))),
        ),
        PatternElement::Relationship(
            RelationshipPattern::named("r", Direction::Outbound)
                .with_property("other", Expression::literal(Literal::integer(234))),
        ),
        PatternElement::Node(
            NodePattern::named("e").with_property("that", Expression::literal(Literal::integer(456))),
        ),
    ];

    let where_expression = Expression::conjunction(vec![
        Expression::comparison(
            Expression::property("s", "other"),
            Operator::Equals,
            Expression::literal(Literal::string("more pii")),
        ),
        Expression::comparison(
            Expression::property("e", "number"),
            Operator::Equals,
            Expression::literal(Literal::integer(411)),
        ),
    ]);

    check(
        select_query(elements, Some(where_expression), return_variables(&["s", "r", "e"])),
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s, (r.id, r.start_id, r.end_id, r.kind_id, r.properties)::edgeComposite as r, (e.id, e.kind_ids, e.properties)::nodeComposite as e from node as s join edge r on r.start_id = s.id join node e on e.id = r.end_id where (s.properties->>'value')::text = 'PII' and (r.properties->'other')::int8 = 234 and (e.properties->'that')::int8 = 456 and (s.properties->>'other')::text = 'more pii' and (e.properties->'number')::int8 = 411",
    );
}

#[test]
fn inline_and_where_spellings_translate_identically() {
    let inline = select_query(
        vec![PatternElement::Node(
            NodePattern::named("s")
                .with_kind("NodeKindA")
                .with_property("x", Expression::literal(Literal::integer(1))),
        )],
        None,
        return_variables(&["s"]),
    );

    let spelled_out = select_query(
        vec![PatternElement::Node(NodePattern::named("s").with_kind("NodeKindA"))],
        Some(Expression::comparison(
            Expression::property("s", "x"),
            Operator::Equals,
            Expression::literal(Literal::integer(1)),
        )),
        return_variables(&["s"]),
    );

    let expected = "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where s.kind_ids operator(pg_catalog.&&) array[1]::int2[] and (s.properties->'x')::int8 = 1";

    check(inline, expected);
    check(spelled_out, expected);
}

#[test]
fn kind_disjunctions_merge_into_one_matcher() {
    let where_expression = Expression::disjunction(vec![
        Expression::kind_matcher(Expression::variable("s"), vec!["NodeKindA".to_string()]),
        Expression::kind_matcher(Expression::variable("s"), vec!["NodeKindB".to_string()]),
    ]);

    check(
        select_query(vec![node("s")], Some(where_expression), return_variables(&["s"])),
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where s.kind_ids operator(pg_catalog.&&) array[1, 2]::int2[]",
    );
}

#[test]
fn string_operators_desugar_to_like() {
    for (operator, pattern) in [
        (Operator::StartsWith, "'123%'"),
        (Operator::Contains, "'%123%'"),
        (Operator::EndsWith, "'%123'"),
    ] {
        let where_expression = Expression::comparison(
            Expression::property("s", "name"),
            operator,
            Expression::literal(Literal::string("123")),
        );

        check(
            select_query(vec![node("s")], Some(where_expression), return_variables(&["s"])),
            &format!(
                "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where (s.properties->>'name')::text like {pattern}"
            ),
        );
    }
}

#[test]
fn string_operator_parameters_are_rewritten_in_the_parameter_table() {
    let where_expression = Expression::comparison(
        Expression::property("s", "objectid"),
        Operator::EndsWith,
        Expression::parameter("suffix", CypherValue::Text("-5-1-9".to_string())),
    );

    let translation = translate_query(select_query(
        vec![node("s")],
        Some(where_expression),
        return_variables(&["s"]),
    ))
    .unwrap();

    assert_eq!(
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where (s.properties->>'objectid')::text like @p0",
        translation.sql
    );
    assert_eq!(
        Some(&CypherValue::Text("%-5-1-9".to_string())),
        translation.parameters.get("p0")
    );
}

#[test]
fn in_over_a_list_literal_stays_an_in_test() {
    let where_expression = Expression::comparison(
        Expression::property("s", "name"),
        Operator::In,
        Expression::literal(Literal::List(vec![
            Expression::literal(Literal::string("option 1")),
            Expression::literal(Literal::string("option 2")),
        ])),
    );

    check(
        select_query(vec![node("s")], Some(where_expression), return_variables(&["s"])),
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where (s.properties->>'name')::text in array['option 1', 'option 2']",
    );
}

#[test]
fn in_over_a_parameter_becomes_equals_any() {
    let where_expression = Expression::comparison(
        Expression::property("s", "prop"),
        Operator::In,
        Expression::parameter(
            "options",
            CypherValue::TextArray(vec!["1".to_string(), "2".to_string(), "3".to_string()]),
        ),
    );

    let projection = Projection::new(vec![ProjectionItem::new(Expression::function(
        "id",
        vec![Expression::variable("s")],
    ))]);

    check(
        select_query(vec![node("s")], Some(where_expression), projection),
        "select s.id as \"s.id\" from node as s where (s.properties->>'prop')::text = any(@p0)",
    );
}

#[test]
fn identity_lookups_are_not_cast() {
    let where_expression = Expression::comparison(
        Expression::function("id", vec![Expression::variable("s")]),
        Operator::In,
        Expression::literal(Literal::List(vec![
            Expression::literal(Literal::integer(1)),
            Expression::literal(Literal::integer(2)),
            Expression::literal(Literal::integer(3)),
            Expression::literal(Literal::integer(4)),
        ])),
    );

    check(
        select_query(vec![node("s")], Some(where_expression), return_variables(&["s"])),
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where s.id in array[1, 2, 3, 4]",
    );
}

#[test]
fn array_equality_compares_serialized_values() {
    let where_expression = Expression::comparison(
        Expression::property("s", "ekus"),
        Operator::Equals,
        Expression::parameter(
            "ekus",
            CypherValue::TextArray(vec!["1.3.6.1.5.5.7.3.2".to_string()]),
        ),
    );

    let translation = translate_query(select_query(
        vec![node("s")],
        Some(where_expression),
        return_variables(&["s"]),
    ))
    .unwrap();

    assert_eq!(
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where (s.properties->'ekus')::jsonb = @p0",
        translation.sql
    );
    assert_eq!(
        Some(&CypherValue::Json(serde_json::json!(["1.3.6.1.5.5.7.3.2"]))),
        translation.parameters.get("p0")
    );
}

#[test]
fn temporal_functions_type_the_property_and_cast_their_argument() {
    let where_expression = Expression::comparison(
        Expression::property("s", "created_at"),
        Operator::Equals,
        Expression::function(
            "localtime",
            vec![Expression::literal(Literal::string("12:12:12"))],
        ),
    );

    check(
        select_query(vec![node("s")], Some(where_expression), return_variables(&["s"])),
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where (s.properties->>'created_at')::time without time zone = '12:12:12'::time without time zone",
    );
}

#[test]
fn temporal_functions_without_arguments_render_current_values() {
    let where_expression = Expression::comparison(
        Expression::property("s", "created_at"),
        Operator::Equals,
        Expression::function("datetime", vec![]),
    );

    check(
        select_query(vec![node("s")], Some(where_expression), return_variables(&["s"])),
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where (s.properties->>'created_at')::timestamp with time zone = now()",
    );
}

#[test]
fn null_predicates_become_field_existence_tests() {
    let is_null = Expression::comparison(
        Expression::property("s", "created_at"),
        Operator::Is,
        Expression::literal(Literal::null()),
    );
    check(
        select_query(vec![node("s")], Some(is_null), return_variables(&["s"])),
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where not s.properties ? 'created_at'",
    );

    let is_not_null = Expression::comparison(
        Expression::property("s", "created_at"),
        Operator::IsNot,
        Expression::literal(Literal::null()),
    );
    check(
        select_query(vec![node("s")], Some(is_not_null), return_variables(&["s"])),
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where s.properties ? 'created_at'",
    );
}

#[test]
fn negated_string_operators_accept_null_operands() {
    let where_expression = Expression::negation(Expression::comparison(
        Expression::property("s", "name"),
        Operator::StartsWith,
        Expression::literal(Literal::string("123")),
    ));

    check(
        select_query(vec![node("s")], Some(where_expression), return_variables(&["s"])),
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where (not (s.properties->>'name')::text like '123%' or not s.properties ? 'name')",
    );
}

#[test]
fn negated_comparisons_keep_their_grouping() {
    let where_expression = Expression::negation(Expression::parenthetical(Expression::comparison(
        Expression::property("s", "name"),
        Operator::Equals,
        Expression::literal(Literal::string("123")),
    )));

    check(
        select_query(vec![node("s")], Some(where_expression), return_variables(&["s"])),
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where not ((s.properties->>'name')::text = '123')",
    );
}

#[test]
fn to_lower_renders_as_lower_with_a_text_cast() {
    let where_expression = Expression::comparison(
        Expression::function("toLower", vec![Expression::property("s", "name")]),
        Operator::Equals,
        Expression::literal(Literal::string("1234")),
    );

    let mut projection = return_variables(&["s"]);
    projection.distinct = true;

    check(
        select_query(vec![node("s")], Some(where_expression), projection),
        "select distinct (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where lower((s.properties->>'name')::text) = '1234'",
    );
}

#[test]
fn labels_projects_the_kind_id_array() {
    let where_expression = Expression::comparison(
        Expression::property("s", "name"),
        Operator::Equals,
        Expression::literal(Literal::string("1234")),
    );

    let projection = Projection::new(vec![ProjectionItem::new(Expression::function(
        "labels",
        vec![Expression::variable("s")],
    ))]);

    check(
        select_query(vec![node("s")], Some(where_expression), projection),
        "select s.kind_ids as \"s.kind_ids\" from node as s where (s.properties->>'name')::text = '1234'",
    );
}

#[test]
fn type_projects_the_edge_kind_column() {
    let elements = vec![
        anonymous_node(),
        relationship("r", Direction::Outbound),
        anonymous_node(),
    ];

    let where_expression = Expression::comparison(
        Expression::property("r", "name"),
        Operator::Equals,
        Expression::literal(Literal::string("1234")),
    );

    let projection = Projection::new(vec![ProjectionItem::new(Expression::function(
        "type",
        vec![Expression::variable("r")],
    ))]);

    check(
        select_query(elements, Some(where_expression), projection),
        "select r.kind_id as \"r.kind_id\" from node as n0 join edge r on r.start_id = n0.id join node n1 on n1.id = r.end_id where (r.properties->>'name')::text = '1234'",
    );
}

#[test]
fn count_projection_with_alias() {
    let where_expression = Expression::comparison(
        Expression::property("s", "name"),
        Operator::Equals,
        Expression::literal(Literal::string("1234")),
    );

    let projection = Projection::new(vec![ProjectionItem::aliased(
        Expression::function("count", vec![Expression::variable("s")]),
        "num",
    )]);

    check(
        select_query(vec![node("s")], Some(where_expression), projection),
        "select count(s) as num from node as s where (s.properties->>'name')::text = '1234'",
    );
}

#[test]
fn cartesian_pattern_parts_share_one_where_clause() {
    let where_expression = Expression::conjunction(vec![
        Expression::comparison(
            Expression::property("s", "objectid"),
            Operator::Equals,
            Expression::literal(Literal::string("123")),
        ),
        Expression::comparison(
            Expression::property("o", "linked"),
            Operator::Equals,
            Expression::property("s", "linkid"),
        ),
    ]);

    check(
        select_query_parts(
            vec![
                vec![PatternElement::Node(NodePattern::named("s").with_kind("NodeKindA"))],
                vec![PatternElement::Node(NodePattern::named("o").with_kind("NodeKindB"))],
            ],
            Some(where_expression),
            return_variables(&["o"]),
        ),
        "select (o.id, o.kind_ids, o.properties)::nodeComposite as o from node as s, node as o where s.kind_ids operator(pg_catalog.&&) array[1]::int2[] and o.kind_ids operator(pg_catalog.&&) array[2]::int2[] and (s.properties->>'objectid')::text = '123' and o.properties->'linked' = s.properties->'linkid'",
    );
}

#[test]
fn pattern_predicates_become_correlated_subqueries() {
    let where_expression = Expression::PatternPredicate(PatternPredicate {
        elements: vec![
            node("s"),
            anonymous_relationship(Direction::Outbound),
            anonymous_node(),
        ],
    });

    check(
        select_query(vec![node("s")], Some(where_expression), return_variables(&["s"])),
        "select (s.id, s.kind_ids, s.properties)::nodeComposite as s from node as s where exists(select * from node as n2 join edge e0 on e0.start_id = n2.id join node n1 on n1.id = e0.end_id where s.id = n2.id limit 1)",
    );
}

#[test]
fn pattern_predicates_correlate_relationship_bindings_too() {
    let elements = vec![
        anonymous_node(),
        relationship("r", Direction::Outbound),
        anonymous_node(),
    ];

    let where_expression = Expression::PatternPredicate(PatternPredicate {
        elements: vec![
            PatternElement::Node(
                NodePattern::named("s")
                    .with_property("name", Expression::literal(Literal::string("test"))),
            ),
            relationship("r", Direction::Outbound),
            anonymous_node(),
        ],
    });

    check(
        select_query(elements, Some(where_expression), return_variables(&["r"])),
        "select (r.id, r.start_id, r.end_id, r.kind_id, r.properties)::edgeComposite as r from node as n0 join edge r on r.start_id = n0.id join node n1 on n1.id = r.end_id where exists(select * from node as s join edge e3 on e3.start_id = s.id join node n2 on n2.id = e3.end_id where (s.properties->>'name')::text = 'test' and r.id = e3.id limit 1)",
    );
}

#[test]
fn translation_is_deterministic() {
    let build = || {
        select_query(
            vec![PatternElement::Node(
                NodePattern::named("s")
                    .with_kind("NodeKindA")
                    .with_property("b", Expression::literal(Literal::integer(2)))
                    .with_property("a", Expression::parameter("a", CypherValue::Text("x".to_string()))),
            )],
            None,
            return_variables(&["s"]),
        )
    };

    let first = translate_query(build()).unwrap();
    let second = translate_query(build()).unwrap();

    assert_eq!(first.sql, second.sql);
    assert_eq!(first.parameters, second.parameters);
}

#[test]
fn mixed_comparison_types_are_rejected() {
    let where_expression = Expression::Comparison(graphpg::cypher::expression::Comparison {
        left: Box::new(Expression::property("s", "x")),
        partials: vec![
            graphpg::cypher::expression::PartialComparison {
                operator: Operator::Equals,
                right: Box::new(Expression::literal(Literal::integer(1))),
            },
            graphpg::cypher::expression::PartialComparison {
                operator: Operator::Equals,
                right: Box::new(Expression::literal(Literal::string("a"))),
            },
        ],
    });

    let error = check_error(select_query(
        vec![node("s")],
        Some(where_expression),
        return_variables(&["s"]),
    ));

    assert!(matches!(error, TranslateError::MixedComparisonTypes { .. }));
}

#[test]
fn mixed_list_literals_are_rejected() {
    let where_expression = Expression::comparison(
        Expression::property("s", "name"),
        Operator::In,
        Expression::literal(Literal::List(vec![
            Expression::literal(Literal::string("option 1")),
            Expression::literal(Literal::integer(1234)),
        ])),
    );

    let error = check_error(select_query(
        vec![node("s")],
        Some(where_expression),
        return_variables(&["s"]),
    ));

    assert_eq!(TranslateError::MixedListTypes, error);
}

#[test]
fn unresolved_kinds_name_the_missing_kind() {
    let error = check_error(select_query(
        vec![PatternElement::Node(NodePattern::named("n").with_kind("NodeKindZ"))],
        None,
        return_variables(&["n"]),
    ));

    assert_eq!(
        TranslateError::UnknownKinds(vec!["NodeKindZ".to_string()]),
        error
    );
}

#[test]
fn unbound_projection_variables_are_rejected() {
    let error = check_error(select_query(
        vec![node("s")],
        None,
        return_variables(&["missing"]),
    ));

    assert_eq!(
        TranslateError::UnboundProjection("missing".to_string()),
        error
    );
}

#[test]
fn nested_property_lookups_are_rejected() {
    let where_expression = Expression::comparison(
        Expression::PropertyLookup(graphpg::cypher::expression::PropertyLookup {
            atom: Box::new(Expression::variable("s")),
            path: vec!["a".to_string(), "b".to_string()],
        }),
        Operator::Equals,
        Expression::literal(Literal::integer(1)),
    );

    let error = check_error(select_query(
        vec![node("s")],
        Some(where_expression),
        return_variables(&["s"]),
    ));

    assert_eq!(TranslateError::NestedPropertyLookup, error);
}

#[test]
fn multi_part_queries_are_rejected() {
    let query = RegularQuery {
        single_query: SingleQuery::MultiPart(MultiPartQuery { parts: vec![] }),
    };

    assert_eq!(TranslateError::MultiPartQueryUnsupported, check_error(query));
}

#[test]
fn exclusive_disjunctions_are_rejected_at_emission() {
    let where_expression = Expression::ExclusiveDisjunction(vec![
        Expression::comparison(
            Expression::property("s", "a"),
            Operator::Equals,
            Expression::literal(Literal::integer(1)),
        ),
        Expression::comparison(
            Expression::property("s", "b"),
            Operator::Equals,
            Expression::literal(Literal::integer(2)),
        ),
    ]);

    let error = check_error(select_query(
        vec![node("s")],
        Some(where_expression),
        return_variables(&["s"]),
    ));

    assert!(matches!(error, TranslateError::UnexpectedExpression { .. }));
}

#[test]
fn stripped_literals_replace_values_with_a_placeholder() -> anyhow::Result<()> {
    let mut query = select_query(
        vec![node("s")],
        Some(Expression::comparison(
            Expression::property("s", "name"),
            Operator::Equals,
            Expression::literal(Literal::string("123")),
        )),
        return_variables(&["s"]),
    );

    let kind_catalog = catalog();
    graphpg::rewrite(&mut query, &kind_catalog)?;

    let emitter = Emitter::new(true, &kind_catalog);
    let sql = emitter.write(&query)?;

    assert!(sql.contains("$STRIPPED"));
    assert!(!sql.contains("'123'"));

    Ok(())
}

#[test]
fn every_parameter_in_the_output_is_recorded() {
    let where_expression = Expression::conjunction(vec![
        Expression::comparison(
            Expression::property("s", "a"),
            Operator::Equals,
            Expression::parameter("first", CypherValue::Text("x".to_string())),
        ),
        Expression::comparison(
            Expression::property("s", "b"),
            Operator::Equals,
            Expression::parameter("second", CypherValue::Int64(7)),
        ),
    ]);

    let translation = translate_query(select_query(
        vec![node("s")],
        Some(where_expression),
        return_variables(&["s"]),
    ))
    .unwrap();

    let expected: BTreeMap<String, CypherValue> = [
        ("p0".to_string(), CypherValue::Text("x".to_string())),
        ("p1".to_string(), CypherValue::Int64(7)),
    ]
    .into_iter()
    .collect();

    assert_eq!(expected, translation.parameters);
    assert!(translation.sql.contains("@p0"));
    assert!(translation.sql.contains("@p1"));
}

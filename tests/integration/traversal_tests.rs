use graphpg::cypher::ast::{
    Direction, Match, NodePattern, PatternElement, PatternPart, ReadingClause, RegularQuery,
    RelationshipPattern, SinglePartQuery, VariableLengthRange,
};
use graphpg::TranslateError;

use super::{check, check_error, return_variables, select_query, translate_query};

fn traversal_elements(
    direction: Direction,
    range: VariableLengthRange,
    kinds: &[&str],
) -> Vec<PatternElement> {
    let mut relationship = RelationshipPattern::anonymous(direction).with_range(range);
    for kind in kinds {
        relationship = relationship.with_kind(*kind);
    }

    vec![
        PatternElement::Node(NodePattern::named("s")),
        PatternElement::Relationship(relationship),
        PatternElement::Node(NodePattern::named("e")),
    ]
}

#[test]
fn bounded_traversal_emits_a_recursive_cte() {
    let query = select_query(
        traversal_elements(
            Direction::Outbound,
            VariableLengthRange::range(1, 3),
            &["EdgeKindA"],
        ),
        None,
        return_variables(&["s", "e"]),
    );

    check(
        query,
        "with recursive expansion_0(root_id, next_id, depth, path) as \
         (select e0.start_id, e0.end_id, 0, array[e0.id] from edge e0 \
         where e0.kind_id = any(array[100]::int2[]) \
         union all \
         select expansion_0.root_id, e0.end_id, expansion_0.depth + 1, expansion_0.path || e0.id \
         from expansion_0 join edge e0 on e0.start_id = expansion_0.next_id \
         where e0.kind_id = any(array[100]::int2[]) and not e0.id = any(expansion_0.path) \
         and expansion_0.depth < 2) \
         select (s.id, s.kind_ids, s.properties)::nodeComposite as s, \
         (e.id, e.kind_ids, e.properties)::nodeComposite as e \
         from node as s \
         join expansion_0 on expansion_0.root_id = s.id \
         join node e on e.id = expansion_0.next_id",
    );
}

#[test]
fn minimum_hops_constrain_the_driving_join() {
    let query = select_query(
        traversal_elements(Direction::Outbound, VariableLengthRange::min_only(2), &[]),
        None,
        return_variables(&["s", "e"]),
    );

    let translation = translate_query(query).unwrap();

    assert!(translation
        .sql
        .contains("join expansion_0 on expansion_0.root_id = s.id and expansion_0.depth >= 1"));
    // No upper bound: recursion is stopped by the cycle check alone.
    assert!(!translation.sql.contains("depth <"));
    assert!(translation
        .sql
        .contains("not e0.id = any(expansion_0.path)"));
}

#[test]
fn inbound_traversals_flip_the_hop_orientation() {
    let query = select_query(
        traversal_elements(Direction::Inbound, VariableLengthRange::unbounded(), &[]),
        None,
        return_variables(&["s", "e"]),
    );

    let translation = translate_query(query).unwrap();

    assert!(translation
        .sql
        .contains("select e0.end_id, e0.start_id, 0, array[e0.id] from edge e0"));
    assert!(translation
        .sql
        .contains("join edge e0 on e0.end_id = expansion_0.next_id"));
}

#[test]
fn undirected_traversals_are_rejected() {
    let query = select_query(
        traversal_elements(Direction::Both, VariableLengthRange::unbounded(), &[]),
        None,
        return_variables(&["s", "e"]),
    );

    assert_eq!(TranslateError::UndirectedTraversal, check_error(query));
}

#[test]
fn inverted_ranges_are_rejected() {
    let query = select_query(
        traversal_elements(Direction::Outbound, VariableLengthRange::range(3, 1), &[]),
        None,
        return_variables(&["s", "e"]),
    );

    assert_eq!(
        TranslateError::InvalidTraversalRange { min: 3, max: 1 },
        check_error(query)
    );
}

#[test]
fn path_projections_are_rejected() {
    let part = PatternPart::new(traversal_elements(
        Direction::Outbound,
        VariableLengthRange::unbounded(),
        &[],
    ))
    .with_binding("p");

    let query = RegularQuery::single_part(SinglePartQuery {
        reading_clauses: vec![ReadingClause::Match(Match::new(vec![part]))],
        updating_clauses: vec![],
        return_clause: Some(return_variables(&["p"])),
    });

    assert_eq!(
        TranslateError::PathProjectionUnsupported,
        check_error(query)
    );
}

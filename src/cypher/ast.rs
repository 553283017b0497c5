use std::collections::BTreeMap;

use crate::cypher::expression::{Expression, KindMatcher, PropertyLookup};

#[derive(Debug, Clone, PartialEq)]
pub struct RegularQuery {
    pub single_query: SingleQuery,
}

impl RegularQuery {
    pub fn single_part(query: SinglePartQuery) -> Self {
        RegularQuery {
            single_query: SingleQuery::SinglePart(query),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SingleQuery {
    SinglePart(SinglePartQuery),
    /// `WITH`-chained query parts. Recognized so the translator can reject
    /// them explicitly rather than mistranslate.
    MultiPart(MultiPartQuery),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiPartQuery {
    pub parts: Vec<SinglePartQuery>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SinglePartQuery {
    pub reading_clauses: Vec<ReadingClause>,
    pub updating_clauses: Vec<UpdatingClause>,
    pub return_clause: Option<Projection>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReadingClause {
    Match(Match),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub pattern: Vec<PatternPart>,
    pub where_clause: Option<Where>,
}

impl Match {
    pub fn new(pattern: Vec<PatternPart>) -> Self {
        Match {
            pattern,
            where_clause: None,
        }
    }

    pub fn with_where(mut self, expression: Expression) -> Self {
        self.where_clause = Some(Where {
            expressions: vec![expression],
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Where {
    pub expressions: Vec<Expression>,
}

/// One comma-separated pattern: an optional path binding plus an alternating
/// node/relationship element sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternPart {
    pub binding: Option<Expression>,
    pub elements: Vec<PatternElement>,
}

impl PatternPart {
    pub fn new(elements: Vec<PatternElement>) -> Self {
        PatternPart {
            binding: None,
            elements,
        }
    }

    pub fn with_binding(mut self, symbol: impl Into<String>) -> Self {
        self.binding = Some(Expression::variable(symbol));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternElement {
    Node(NodePattern),
    Relationship(RelationshipPattern),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodePattern {
    pub binding: Option<Expression>,
    pub kinds: Vec<String>,
    pub properties: Option<PropertyMatcher>,
}

impl NodePattern {
    pub fn anonymous() -> Self {
        NodePattern {
            binding: None,
            kinds: vec![],
            properties: None,
        }
    }

    pub fn named(symbol: impl Into<String>) -> Self {
        NodePattern {
            binding: Some(Expression::variable(symbol)),
            kinds: vec![],
            properties: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kinds.push(kind.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: Expression) -> Self {
        match &mut self.properties {
            Some(PropertyMatcher::Map(map)) => {
                map.insert(name.into(), value);
            }
            _ => {
                let mut map = BTreeMap::new();
                map.insert(name.into(), value);
                self.properties = Some(PropertyMatcher::Map(map));
            }
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipPattern {
    pub binding: Option<Expression>,
    pub kinds: Vec<String>,
    pub direction: Direction,
    pub range: Option<VariableLengthRange>,
    pub properties: Option<PropertyMatcher>,
}

impl RelationshipPattern {
    pub fn anonymous(direction: Direction) -> Self {
        RelationshipPattern {
            binding: None,
            kinds: vec![],
            direction,
            range: None,
            properties: None,
        }
    }

    pub fn named(symbol: impl Into<String>, direction: Direction) -> Self {
        RelationshipPattern {
            binding: Some(Expression::variable(symbol)),
            ..RelationshipPattern::anonymous(direction)
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kinds.push(kind.into());
        self
    }

    pub fn with_range(mut self, range: VariableLengthRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: Expression) -> Self {
        match &mut self.properties {
            Some(PropertyMatcher::Map(map)) => {
                map.insert(name.into(), value);
            }
            _ => {
                let mut map = BTreeMap::new();
                map.insert(name.into(), value);
                self.properties = Some(PropertyMatcher::Map(map));
            }
        }
        self
    }
}

/// Inline `{name: value, ...}` matcher, or a whole-map parameter matcher
/// (`{$props}`, rejected during translation).
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyMatcher {
    Map(BTreeMap<String, Expression>),
    Parameter(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outbound,
    Inbound,
    Both,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Outbound => Direction::Inbound,
            Direction::Inbound => Direction::Outbound,
            Direction::Both => Direction::Both,
        }
    }
}

/// `*`, `*n..`, `*n..m` hop ranges on a relationship pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableLengthRange {
    pub min_hops: Option<u32>,
    pub max_hops: Option<u32>,
}

impl VariableLengthRange {
    pub fn unbounded() -> Self {
        VariableLengthRange {
            min_hops: None,
            max_hops: None,
        }
    }

    pub fn range(min: u32, max: u32) -> Self {
        VariableLengthRange {
            min_hops: Some(min),
            max_hops: Some(max),
        }
    }

    pub fn min_only(min: u32) -> Self {
        VariableLengthRange {
            min_hops: Some(min),
            max_hops: None,
        }
    }

    /// Minimum hop count, defaulting to a single hop.
    pub fn effective_min_hops(&self) -> u32 {
        self.min_hops.unwrap_or(1).max(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdatingClause {
    Create(Create),
    Set(Set),
    Remove(Remove),
    Delete(DeleteClause),
    /// Storage-level mutation descriptor, produced by the updating-clause
    /// rewriter. Never present in parser output.
    Mutation(crate::pgsql::annotations::Mutation),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Create {
    pub pattern: Vec<PatternPart>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    pub items: Vec<SetItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetItem {
    /// `set s.name = <value>`
    Property {
        target: PropertyLookup,
        value: Expression,
    },
    /// `set s:Kind`
    Kinds {
        variable: Expression,
        kinds: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Remove {
    pub items: Vec<RemoveItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoveItem {
    Property(PropertyLookup),
    Kinds(KindMatcher),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteClause {
    pub detach: bool,
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub distinct: bool,
    pub items: Vec<ProjectionItem>,
    pub order: Option<Order>,
    pub skip: Option<Expression>,
    pub limit: Option<Expression>,
}

impl Projection {
    pub fn new(items: Vec<ProjectionItem>) -> Self {
        Projection {
            items,
            ..Projection::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionItem {
    pub expression: Expression,
    pub alias: Option<Expression>,
}

impl ProjectionItem {
    pub fn new(expression: Expression) -> Self {
        ProjectionItem {
            expression,
            alias: None,
        }
    }

    pub fn aliased(expression: Expression, alias: impl Into<String>) -> Self {
        ProjectionItem {
            expression,
            alias: Some(Expression::variable(alias)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub expression: Expression,
    pub ascending: bool,
}

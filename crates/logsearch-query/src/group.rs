//! Composite nodes.
//!
//! A [`Group`] owns an ordered list of `(LogicalOperator, Node)` edges. The
//! operator belongs to the edge, not to the child: the same leaf can be
//! added under AND in one group and under OR in another.

use logsearch_types::Field;

use crate::error::QueryError;
use crate::leaf::{
    Leaf, LeafQuery, Match, Polarity, QueryString, Range, SimpleQueryString, Term,
};
use crate::value::{QueryTarget, RangeValue, Scalar};

/// How a child combines with its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl std::fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalOperator::And => write!(f, "AND"),
            LogicalOperator::Or => write!(f, "OR"),
        }
    }
}

/// Node of the query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Leaf),
    Group(Group),
}

impl Node {
    pub fn polarity(&self) -> Polarity {
        match self {
            Node::Leaf(leaf) => leaf.polarity(),
            Node::Group(group) => group.polarity(),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Node::Group(_))
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Node::Group(group) => Some(group),
            Node::Leaf(_) => None,
        }
    }
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        Node::Leaf(leaf)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}

impl From<Match> for Node {
    fn from(leaf: Match) -> Self {
        Node::Leaf(leaf.into())
    }
}

impl From<Term> for Node {
    fn from(leaf: Term) -> Self {
        Node::Leaf(leaf.into())
    }
}

impl From<Range> for Node {
    fn from(leaf: Range) -> Self {
        Node::Leaf(leaf.into())
    }
}

impl From<QueryString> for Node {
    fn from(leaf: QueryString) -> Self {
        Node::Leaf(leaf.into())
    }
}

impl From<SimpleQueryString> for Node {
    fn from(leaf: SimpleQueryString) -> Self {
        Node::Leaf(leaf.into())
    }
}

/// Ordered collection of child nodes joined by logical operators.
///
/// ```rust
/// use logsearch_query::{Group, Term, Match};
/// use logsearch_types::Field;
///
/// let query = Group::new()
///     .add(Match::new(Field::Message, "disk"))
///     .or(Term::new(Field::Level, "error"))
///     .or(Term::new(Field::Level, "warn"));
/// assert_eq!(query.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    edges: Vec<(LogicalOperator, Node)>,
    polarity: Polarity,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group whose children are all joined with AND.
    pub fn with_children<I, N>(nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Self::with_operator(LogicalOperator::And, nodes)
    }

    /// Group whose children are all joined with `operator`.
    pub fn with_operator<I, N>(operator: LogicalOperator, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Self {
            edges: nodes.into_iter().map(|n| (operator, n.into())).collect(),
            polarity: Polarity::Equals,
        }
    }

    /// Append a child under AND.
    pub fn add(self, node: impl Into<Node>) -> Self {
        self.add_with(LogicalOperator::And, node)
    }

    pub fn add_with(mut self, operator: LogicalOperator, node: impl Into<Node>) -> Self {
        self.push(operator, node);
        self
    }

    /// Append a child under OR.
    pub fn or(self, node: impl Into<Node>) -> Self {
        self.add_with(LogicalOperator::Or, node)
    }

    /// Append a nested group under AND.
    pub fn group(self, group: Group) -> Self {
        self.add(group)
    }

    pub fn term(self, field: Field, value: impl Into<Scalar>) -> Self {
        self.add(Term::new(field, value))
    }

    pub fn match_value(self, field: Field, value: impl Into<Scalar>) -> Self {
        self.add(Match::new(field, value))
    }

    pub fn range(self, field: Field, value: RangeValue) -> Self {
        self.add(Range::of(field, value))
    }

    pub fn query_string(
        self,
        target: impl Into<QueryTarget>,
        query: impl Into<String>,
    ) -> Result<Self, QueryError> {
        Ok(self.add(QueryString::new(target, query)?))
    }

    pub fn simple_query_string(
        self,
        target: impl Into<QueryTarget>,
        query: impl Into<String>,
    ) -> Result<Self, QueryError> {
        Ok(self.add(SimpleQueryString::new(target, query)?))
    }

    /// In-place append for callers holding a `&mut Group`.
    pub fn push(&mut self, operator: LogicalOperator, node: impl Into<Node>) {
        self.edges.push((operator, node.into()));
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn negated(self) -> Self {
        self.with_polarity(Polarity::NotEquals)
    }

    pub fn set_polarity(&mut self, polarity: Polarity) {
        self.polarity = polarity;
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Immediate children in insertion order.
    pub fn children(&self) -> Vec<&Node> {
        self.edges.iter().map(|(_, node)| node).collect()
    }

    pub fn edges(&self) -> &[(LogicalOperator, Node)] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }
}

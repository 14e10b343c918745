//! Tree-to-DSL compilation and the JSON serializer.
//!
//! A non-empty group compiles to a single `bool` query. Its children are
//! stably partitioned by edge operator into at most one AND bucket and one
//! OR bucket, handled in order of first appearance:
//!
//! - AND, one child: `must` (or `must_not` when negated) on the group's bool.
//! - AND, several children: each non-negated child is a `must` clause; the
//!   negated children are collected into one nested bool (`must_not`) which
//!   is itself required through `must`.
//! - OR: one nested bool with a `should` branch per child, required through
//!   `must`. A negated child becomes the branch `bool { must_not: [child] }`.
//!
//! An empty group compiles to `match_all` wherever it appears.

use std::fmt;

use tracing::{debug, trace};

use crate::dsl::{BoolQuery, QueryObject};
use crate::group::{Group, LogicalOperator, Node};
use crate::leaf::{Leaf, LeafQuery, Match, Polarity, QueryString, Range, SimpleQueryString, Term};

impl Node {
    /// Compile to the backend query object.
    ///
    /// The node's own polarity is not applied here; the enclosing group
    /// decides where the compiled node is placed.
    pub fn compile(&self) -> QueryObject {
        match self {
            Node::Leaf(leaf) => leaf.compile(),
            Node::Group(group) => group.compile(),
        }
    }
}

impl Group {
    pub fn compile(&self) -> QueryObject {
        if self.is_empty() {
            trace!("empty group compiled to match_all");
            return QueryObject::match_all();
        }

        let mut root = BoolQuery::new();
        for (operator, bucket) in self.buckets() {
            trace!(%operator, children = bucket.len(), "compiling bucket");
            match operator {
                LogicalOperator::And => compile_and_bucket(&mut root, &bucket),
                LogicalOperator::Or => compile_or_bucket(&mut root, &bucket),
            }
        }

        debug!(
            children = self.len(),
            must = root.must.len(),
            must_not = root.must_not.len(),
            "group compiled"
        );
        QueryObject::Bool(root)
    }

    /// Children partitioned by edge operator, buckets in order of first appearance.
    fn buckets(&self) -> Vec<(LogicalOperator, Vec<&Node>)> {
        let mut buckets: Vec<(LogicalOperator, Vec<&Node>)> = Vec::with_capacity(2);
        for (operator, node) in self.edges() {
            match buckets.iter_mut().find(|(op, _)| *op == *operator) {
                Some((_, nodes)) => nodes.push(node),
                None => buckets.push((*operator, vec![node])),
            }
        }
        buckets
    }
}

fn compile_and_bucket(root: &mut BoolQuery, bucket: &[&Node]) {
    if let [only] = bucket {
        match only.polarity() {
            Polarity::Equals => root.must.push(only.compile()),
            Polarity::NotEquals => root.must_not.push(only.compile()),
        }
        return;
    }

    let mut excluded = Vec::new();
    for node in bucket {
        match node.polarity() {
            Polarity::Equals => root.must.push(node.compile()),
            Polarity::NotEquals => excluded.push(node.compile()),
        }
    }
    if !excluded.is_empty() {
        root.must.push(QueryObject::Bool(BoolQuery::excluding(excluded)));
    }
}

fn compile_or_bucket(root: &mut BoolQuery, bucket: &[&Node]) {
    let branches = bucket
        .iter()
        .map(|node| match node.polarity() {
            Polarity::Equals => node.compile(),
            Polarity::NotEquals => QueryObject::Bool(BoolQuery::excluding(vec![node.compile()])),
        })
        .collect();
    root.must.push(QueryObject::Bool(BoolQuery::any_of(branches)));
}

macro_rules! display_compiled {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(&self.compile(), f)
                }
            }
        )*
    };
}

display_compiled!(Node, Group, Leaf, Match, Term, Range, QueryString, SimpleQueryString);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::RangeValue;
    use logsearch_types::Field;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn term_json(field: &str, value: &str) -> serde_json::Value {
        json!({ "term": { field: { "value": value, "boost": 1.0 } } })
    }

    #[test]
    fn test_empty_group_is_match_all() {
        assert!(Group::new().compile().is_match_all());
    }

    #[test]
    fn test_empty_group_nested_is_match_all() {
        let query = Group::new().group(Group::new().group(Group::new())).compile();
        let root = query.as_bool().unwrap();
        let inner = root.must[0].as_bool().unwrap();
        assert!(inner.must[0].is_match_all());
    }

    #[test]
    fn test_single_and_child_is_must() {
        let query = Group::new().term(Field::Level, "error").compile();
        assert_eq!(
            query.to_json(),
            json!({ "bool": { "must": [term_json("level.keyword", "error")] } })
        );
    }

    #[test]
    fn test_single_negated_and_child_is_must_not() {
        let query = Group::new()
            .add(Term::new(Field::Level, "debug").negated())
            .compile();
        assert_eq!(
            query.to_json(),
            json!({ "bool": { "must_not": [term_json("level.keyword", "debug")] } })
        );
    }

    #[test]
    fn test_and_bucket_of_n_equals() {
        for n in 2..6 {
            let group = Group::with_children(
                (0..n).map(|i| Term::new(Field::Thread, format!("worker-{}", i))),
            );
            let query = group.compile();
            let root = query.as_bool().unwrap();
            assert_eq!(root.must.len(), n);
            assert!(root.must_not.is_empty());
            assert!(root.should.is_empty());
        }
    }

    #[test]
    fn test_and_bucket_of_n_not_equals() {
        let group = Group::with_children(
            ["trace", "debug", "info"].map(|l| Term::new(Field::Level, l).negated()),
        );
        let query = group.compile();
        let root = query.as_bool().unwrap();
        assert_eq!(root.must.len(), 1);
        let nested = root.must[0].as_bool().unwrap();
        assert_eq!(nested.must_not.len(), 3);
        assert!(nested.must.is_empty());
    }

    #[test]
    fn test_mixed_and_bucket_keeps_every_clause() {
        let query = Group::new()
            .add(Term::new(Field::Level, "error"))
            .add(Term::new(Field::Level, "debug").negated())
            .compile();
        assert_eq!(
            query.to_json(),
            json!({ "bool": { "must": [
                term_json("level.keyword", "error"),
                { "bool": { "must_not": [term_json("level.keyword", "debug")] } }
            ] } })
        );
    }

    #[test]
    fn test_or_bucket_cardinality() {
        for n in 2..6 {
            let group = Group::with_operator(
                LogicalOperator::Or,
                (0..n).map(|i| Match::new(Field::Message, format!("token{}", i))),
            );
            let query = group.compile();
            let root = query.as_bool().unwrap();
            assert_eq!(root.must.len(), 1);
            assert_eq!(root.must[0].as_bool().unwrap().should.len(), n);
        }
    }

    #[test]
    fn test_single_or_child_is_still_a_disjunction() {
        let query = Group::new().or(Term::new(Field::Level, "error")).compile();
        assert_eq!(
            query.to_json(),
            json!({ "bool": { "must": [
                { "bool": { "should": [term_json("level.keyword", "error")] } }
            ] } })
        );
    }

    #[test]
    fn test_negated_or_child_becomes_negated_branch() {
        let query = Group::new()
            .or(Term::new(Field::Level, "error"))
            .or(Term::new(Field::Level, "debug").negated())
            .compile();
        let should = &query.as_bool().unwrap().must[0].as_bool().unwrap().should;
        assert_eq!(should[0].to_json(), term_json("level.keyword", "error"));
        assert_eq!(
            should[1].to_json(),
            json!({ "bool": { "must_not": [term_json("level.keyword", "debug")] } })
        );
    }

    #[test]
    fn test_buckets_follow_first_appearance() {
        let query = Group::new()
            .or(Term::new(Field::Level, "error"))
            .add(Match::new(Field::Message, "disk"))
            .or(Term::new(Field::Level, "warn"))
            .compile();
        let root = query.as_bool().unwrap();
        assert_eq!(root.must.len(), 2);
        assert_eq!(root.must[0].as_bool().unwrap().should.len(), 2);
        assert_eq!(root.must[1].kind(), "match");
    }

    #[test]
    fn test_negated_nested_group_goes_to_must_not() {
        let inner = Group::new()
            .term(Field::Level, "debug")
            .term(Field::Thread, "main")
            .negated();
        let query = Group::new().group(inner).compile();
        let root = query.as_bool().unwrap();
        assert!(root.must.is_empty());
        assert_eq!(root.must_not.len(), 1);
        assert_eq!(root.must_not[0].as_bool().unwrap().must.len(), 2);
    }

    #[test]
    fn test_boosts_survive_grouping() {
        let query = Group::new()
            .add(Match::new(Field::Message, "disk").with_boost(3.0).unwrap())
            .add(Range::of(Field::CreationTimeMs, RangeValue::new(0, 1)))
            .compile();
        let root = query.as_bool().unwrap();
        assert_eq!(root.must[0].boost(), Some(3.0));
        assert_eq!(root.must[1].boost(), Some(1.0));
    }

    #[test]
    fn test_display_is_pretty_json_of_compiled_form() {
        let group = Group::new().term(Field::Level, "error");
        let rendered = group.to_string();
        assert!(rendered.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, group.compile().to_json());

        let leaf = Term::new(Field::Level, "error");
        assert_eq!(leaf.to_string(), leaf.compile().to_string());
        let node: Node = leaf.into();
        assert!(node.to_string().contains("level.keyword"));
    }

    #[test]
    fn test_display_recomputed_after_mutation() {
        let mut group = Group::new();
        let before = group.to_string();
        group.push(LogicalOperator::And, Term::new(Field::Level, "error"));
        assert_ne!(before, group.to_string());
    }

    #[test]
    fn test_compile_is_deterministic() {
        let group = Group::new()
            .match_value(Field::Message, "disk")
            .or(Term::new(Field::Level, "error"))
            .or(Term::new(Field::Level, "fatal"));
        assert_eq!(group.compile(), group.compile());
    }
}

//! Leaf nodes of the query tree.
//!
//! Each leaf binds one field (or a field set for the query-string kinds), a
//! typed value, a polarity and a boost. `compile_leaf` produces the
//! kind-specific encoding; `compile` applies the boost on top of it.

use logsearch_types::{Field, Fuzziness, FuzzyConfig};

use crate::dsl::{
    MatchQuery, QueryObject, QueryStringQuery, RangeQuery, SimpleQueryStringQuery, TermQuery,
    DEFAULT_BOOST,
};
use crate::error::QueryError;
use crate::value::{DefaultOperator, QueryTarget, RangeValue, Scalar};

/// Whether a node is required to match or required not to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    #[default]
    Equals,
    NotEquals,
}

impl Polarity {
    pub fn is_negated(&self) -> bool {
        matches!(self, Polarity::NotEquals)
    }
}

/// Attributes shared by every leaf kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafOptions {
    pub polarity: Polarity,
    pub boost: f64,
}

impl Default for LeafOptions {
    fn default() -> Self {
        Self {
            polarity: Polarity::Equals,
            boost: DEFAULT_BOOST,
        }
    }
}

/// Borrowed view of a leaf's comparison value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeafValue<'a> {
    Scalar(&'a Scalar),
    Range(&'a RangeValue),
    Query(&'a str),
}

/// Behaviour common to all leaf kinds.
pub trait LeafQuery {
    fn options(&self) -> &LeafOptions;

    fn options_mut(&mut self) -> &mut LeafOptions;

    /// Bound field; `None` when the leaf searches zero or several fields.
    fn field(&self) -> Option<Field>;

    fn value(&self) -> LeafValue<'_>;

    /// Kind-specific encoding, before the boost is applied.
    fn compile_leaf(&self) -> QueryObject;

    fn polarity(&self) -> Polarity {
        self.options().polarity
    }

    fn boost(&self) -> f64 {
        self.options().boost
    }

    fn set_polarity(&mut self, polarity: Polarity) {
        self.options_mut().polarity = polarity;
    }

    /// Set the relevance weight; it must be finite and not negative.
    fn set_boost(&mut self, boost: f64) -> Result<(), QueryError> {
        if !boost.is_finite() || boost < 0.0 {
            return Err(QueryError::InvalidBoost(boost));
        }
        self.options_mut().boost = boost;
        Ok(())
    }

    fn with_polarity(mut self, polarity: Polarity) -> Self
    where
        Self: Sized,
    {
        self.set_polarity(polarity);
        self
    }

    /// Shorthand for `with_polarity(Polarity::NotEquals)`.
    fn negated(self) -> Self
    where
        Self: Sized,
    {
        self.with_polarity(Polarity::NotEquals)
    }

    fn with_boost(mut self, boost: f64) -> Result<Self, QueryError>
    where
        Self: Sized,
    {
        self.set_boost(boost)?;
        Ok(self)
    }

    fn compile(&self) -> QueryObject {
        self.compile_leaf().with_boost(self.boost())
    }
}

/// `base` (or the backend defaults) with a fixed edit distance.
fn fixed_distance(base: Option<FuzzyConfig>, distance: u8) -> Result<FuzzyConfig, QueryError> {
    let fuzziness = Fuzziness::fixed(distance)?;
    Ok(base.unwrap_or(FuzzyConfig::AUTO).with_fuzziness(fuzziness))
}

fn require_query(query: Option<String>) -> Result<String, QueryError> {
    match query {
        Some(q) if !q.trim().is_empty() => Ok(q),
        _ => Err(QueryError::MissingQueryValue),
    }
}

/// Analyzed full-text match on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    field: Field,
    value: Scalar,
    fuzzy: Option<FuzzyConfig>,
    operator: Option<DefaultOperator>,
    options: LeafOptions,
}

impl Match {
    pub fn new(field: Field, value: impl Into<Scalar>) -> Self {
        Self {
            field,
            value: value.into(),
            fuzzy: FuzzyConfig::DISABLED,
            operator: None,
            options: LeafOptions::default(),
        }
    }

    /// Build from a field name, failing on names outside the registry.
    pub fn resolve(field: &str, value: impl Into<Scalar>) -> Result<Self, QueryError> {
        Ok(Self::new(Field::resolve(field)?, value))
    }

    pub fn fuzzy(mut self, fuzzy: FuzzyConfig) -> Self {
        self.fuzzy = Some(fuzzy);
        self
    }

    /// Set or clear fuzzy matching (`FuzzyConfig::DISABLED` clears).
    pub fn with_fuzzy(mut self, fuzzy: Option<FuzzyConfig>) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    /// Enable fuzzy matching with a fixed edit distance, keeping any other
    /// fuzzy parameters already set.
    pub fn edit_distance(mut self, distance: u8) -> Result<Self, QueryError> {
        self.fuzzy = Some(fixed_distance(self.fuzzy, distance)?);
        Ok(self)
    }

    pub fn operator(mut self, operator: DefaultOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn fuzzy_config(&self) -> Option<&FuzzyConfig> {
        self.fuzzy.as_ref()
    }
}

impl LeafQuery for Match {
    fn options(&self) -> &LeafOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut LeafOptions {
        &mut self.options
    }

    fn field(&self) -> Option<Field> {
        Some(self.field)
    }

    fn value(&self) -> LeafValue<'_> {
        LeafValue::Scalar(&self.value)
    }

    fn compile_leaf(&self) -> QueryObject {
        QueryObject::Match(MatchQuery {
            field: self.field.path().to_string(),
            query: self.value.clone(),
            operator: self.operator,
            fuzzy: self.fuzzy,
            boost: DEFAULT_BOOST,
        })
    }
}

/// Exact match against the unanalyzed variant of a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    field: Field,
    value: Scalar,
    options: LeafOptions,
}

impl Term {
    pub fn new(field: Field, value: impl Into<Scalar>) -> Self {
        Self {
            field,
            value: value.into(),
            options: LeafOptions::default(),
        }
    }

    pub fn resolve(field: &str, value: impl Into<Scalar>) -> Result<Self, QueryError> {
        Ok(Self::new(Field::resolve(field)?, value))
    }
}

impl LeafQuery for Term {
    fn options(&self) -> &LeafOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut LeafOptions {
        &mut self.options
    }

    fn field(&self) -> Option<Field> {
        Some(self.field)
    }

    fn value(&self) -> LeafValue<'_> {
        LeafValue::Scalar(&self.value)
    }

    fn compile_leaf(&self) -> QueryObject {
        QueryObject::Term(TermQuery {
            field: self.field.exact_variant(),
            value: self.value.clone(),
            boost: DEFAULT_BOOST,
        })
    }
}

/// Inclusive range on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    field: Field,
    value: RangeValue,
    options: LeafOptions,
}

impl Range {
    pub fn new(field: Field, from: impl Into<Scalar>, to: impl Into<Scalar>) -> Self {
        Self::of(field, RangeValue::new(from, to))
    }

    pub fn of(field: Field, value: RangeValue) -> Self {
        Self {
            field,
            value,
            options: LeafOptions::default(),
        }
    }

    /// Incremental construction where either bound may be left out by mistake.
    pub fn builder(field: Field) -> RangeBuilder {
        RangeBuilder {
            field,
            from: None,
            to: None,
        }
    }
}

/// Builder for [`Range`]; `build` fails when a bound is missing.
#[derive(Debug, Clone)]
pub struct RangeBuilder {
    field: Field,
    from: Option<Scalar>,
    to: Option<Scalar>,
}

impl RangeBuilder {
    pub fn from(mut self, from: impl Into<Scalar>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn to(mut self, to: impl Into<Scalar>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn build(self) -> Result<Range, QueryError> {
        let missing = |bound| QueryError::InvalidRange {
            field: self.field.name().to_string(),
            missing: bound,
        };
        let from = self.from.clone().ok_or_else(|| missing("from"))?;
        let to = self.to.clone().ok_or_else(|| missing("to"))?;
        Ok(Range::of(self.field, RangeValue { from, to }))
    }
}

impl LeafQuery for Range {
    fn options(&self) -> &LeafOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut LeafOptions {
        &mut self.options
    }

    fn field(&self) -> Option<Field> {
        Some(self.field)
    }

    fn value(&self) -> LeafValue<'_> {
        LeafValue::Range(&self.value)
    }

    fn compile_leaf(&self) -> QueryObject {
        QueryObject::Range(RangeQuery {
            field: self.field.path().to_string(),
            gte: self.value.from.clone(),
            lte: self.value.to.clone(),
            boost: DEFAULT_BOOST,
        })
    }
}

/// Query in the strict query-string mini language.
///
/// The text is passed through verbatim. Syntax errors are only detected by
/// the backend, at execution time.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryString {
    target: QueryTarget,
    query: String,
    fuzzy: Option<FuzzyConfig>,
    operator: Option<DefaultOperator>,
    options: LeafOptions,
}

impl QueryString {
    pub fn new(target: impl Into<QueryTarget>, query: impl Into<String>) -> Result<Self, QueryError> {
        Self::from_optional(target, Some(query.into()))
    }

    /// Like [`QueryString::new`] for callers whose query text may be absent.
    pub fn from_optional(
        target: impl Into<QueryTarget>,
        query: Option<String>,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            target: target.into(),
            query: require_query(query)?,
            fuzzy: FuzzyConfig::DISABLED,
            operator: None,
            options: LeafOptions::default(),
        })
    }

    pub fn fuzzy(mut self, fuzzy: FuzzyConfig) -> Self {
        self.fuzzy = Some(fuzzy);
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: Option<FuzzyConfig>) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    pub fn edit_distance(mut self, distance: u8) -> Result<Self, QueryError> {
        self.fuzzy = Some(fixed_distance(self.fuzzy, distance)?);
        Ok(self)
    }

    pub fn operator(mut self, operator: DefaultOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn target(&self) -> &QueryTarget {
        &self.target
    }
}

impl LeafQuery for QueryString {
    fn options(&self) -> &LeafOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut LeafOptions {
        &mut self.options
    }

    fn field(&self) -> Option<Field> {
        self.target.single()
    }

    fn value(&self) -> LeafValue<'_> {
        LeafValue::Query(&self.query)
    }

    fn compile_leaf(&self) -> QueryObject {
        let (default_field, fields) = match self.target.single() {
            Some(field) => (Some(field.path().to_string()), Vec::new()),
            None => (None, self.target.paths()),
        };
        QueryObject::QueryString(QueryStringQuery {
            query: self.query.clone(),
            default_field,
            fields,
            default_operator: self.operator,
            fuzzy: self.fuzzy,
            boost: DEFAULT_BOOST,
        })
    }
}

/// Query in the lenient query-string mini language; never rejected by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleQueryString {
    target: QueryTarget,
    query: String,
    fuzzy: Option<FuzzyConfig>,
    operator: Option<DefaultOperator>,
    options: LeafOptions,
}

impl SimpleQueryString {
    pub fn new(target: impl Into<QueryTarget>, query: impl Into<String>) -> Result<Self, QueryError> {
        Self::from_optional(target, Some(query.into()))
    }

    pub fn from_optional(
        target: impl Into<QueryTarget>,
        query: Option<String>,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            target: target.into(),
            query: require_query(query)?,
            fuzzy: FuzzyConfig::DISABLED,
            operator: None,
            options: LeafOptions::default(),
        })
    }

    pub fn fuzzy(mut self, fuzzy: FuzzyConfig) -> Self {
        self.fuzzy = Some(fuzzy);
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: Option<FuzzyConfig>) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    pub fn operator(mut self, operator: DefaultOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn target(&self) -> &QueryTarget {
        &self.target
    }
}

impl LeafQuery for SimpleQueryString {
    fn options(&self) -> &LeafOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut LeafOptions {
        &mut self.options
    }

    fn field(&self) -> Option<Field> {
        self.target.single()
    }

    fn value(&self) -> LeafValue<'_> {
        LeafValue::Query(&self.query)
    }

    fn compile_leaf(&self) -> QueryObject {
        QueryObject::SimpleQueryString(SimpleQueryStringQuery {
            query: self.query.clone(),
            fields: self.target.paths(),
            default_operator: self.operator,
            fuzzy: self.fuzzy,
            boost: DEFAULT_BOOST,
        })
    }
}

/// Any leaf kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Match(Match),
    Term(Term),
    Range(Range),
    QueryString(QueryString),
    SimpleQueryString(SimpleQueryString),
}

impl Leaf {
    fn inner(&self) -> &dyn LeafQuery {
        match self {
            Leaf::Match(l) => l,
            Leaf::Term(l) => l,
            Leaf::Range(l) => l,
            Leaf::QueryString(l) => l,
            Leaf::SimpleQueryString(l) => l,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn LeafQuery {
        match self {
            Leaf::Match(l) => l,
            Leaf::Term(l) => l,
            Leaf::Range(l) => l,
            Leaf::QueryString(l) => l,
            Leaf::SimpleQueryString(l) => l,
        }
    }
}

impl LeafQuery for Leaf {
    fn options(&self) -> &LeafOptions {
        self.inner().options()
    }

    fn options_mut(&mut self) -> &mut LeafOptions {
        self.inner_mut().options_mut()
    }

    fn field(&self) -> Option<Field> {
        self.inner().field()
    }

    fn value(&self) -> LeafValue<'_> {
        self.inner().value()
    }

    fn compile_leaf(&self) -> QueryObject {
        self.inner().compile_leaf()
    }
}

impl From<Match> for Leaf {
    fn from(leaf: Match) -> Self {
        Leaf::Match(leaf)
    }
}

impl From<Term> for Leaf {
    fn from(leaf: Term) -> Self {
        Leaf::Term(leaf)
    }
}

impl From<Range> for Leaf {
    fn from(leaf: Range) -> Self {
        Leaf::Range(leaf)
    }
}

impl From<QueryString> for Leaf {
    fn from(leaf: QueryString) -> Self {
        Leaf::QueryString(leaf)
    }
}

impl From<SimpleQueryString> for Leaf {
    fn from(leaf: SimpleQueryString) -> Self {
        Leaf::SimpleQueryString(leaf)
    }
}

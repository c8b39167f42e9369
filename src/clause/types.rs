//! core types for trigger clauses

use std::fmt;

use crate::error::{Error, Result};

/// operand of an equality clause
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClauseValue {
    String(String),
    Int(i64),
    Bool(bool),
}

impl ClauseValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClauseValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ClauseValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ClauseValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<i64> for ClauseValue {
    fn from(n: i64) -> Self {
        ClauseValue::Int(n)
    }
}

impl From<i32> for ClauseValue {
    fn from(n: i32) -> Self {
        ClauseValue::Int(n as i64)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

impl fmt::Display for ClauseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseValue::String(s) => write!(f, "\"{}\"", s),
            ClauseValue::Int(n) => write!(f, "{}", n),
            ClauseValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// numeric limit of a range bound
///
/// integer and double limits are kept apart so that an integer limit is
/// still an integer after a trip through JSON. A double limit must be finite
/// to become part of a [`Bound`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Limit {
    Int(i64),
    Double(f64),
}

impl Limit {
    pub fn as_f64(&self) -> f64 {
        match self {
            Limit::Int(n) => *n as f64,
            Limit::Double(d) => *d,
        }
    }

    /// NaN and infinities have no JSON form
    pub fn is_finite(&self) -> bool {
        match self {
            Limit::Int(_) => true,
            Limit::Double(d) => d.is_finite(),
        }
    }
}

impl From<i64> for Limit {
    fn from(n: i64) -> Self {
        Limit::Int(n)
    }
}

impl From<i32> for Limit {
    fn from(n: i32) -> Self {
        Limit::Int(n as i64)
    }
}

impl From<f64> for Limit {
    fn from(d: f64) -> Self {
        Limit::Double(d)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Int(n) => write!(f, "{}", n),
            Limit::Double(d) => write!(f, "{}", d),
        }
    }
}

/// one side of a range; the limit is always finite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    limit: Limit,
    included: bool,
}

impl Bound {
    pub fn new(limit: impl Into<Limit>, included: bool) -> Result<Self> {
        let limit = limit.into();
        if !limit.is_finite() {
            return Err(Error::InvalidClause(format!(
                "range limit must be finite, got {}",
                limit
            )));
        }
        Ok(Self { limit, included })
    }

    pub fn limit(&self) -> Limit {
        self.limit
    }

    pub fn included(&self) -> bool {
        self.included
    }
}

/// field equality comparison, also the payload of a not-equals clause
#[derive(Debug, Clone, PartialEq)]
pub struct EqualsClause {
    pub field: String,
    pub value: ClauseValue,
}

impl fmt::Display for EqualsClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.field, self.value)
    }
}

/// numeric range over a field; at least one bound is always set
#[derive(Debug, Clone, PartialEq)]
pub struct RangeClause {
    field: String,
    lower: Option<Bound>,
    upper: Option<Bound>,
}

impl RangeClause {
    /// fails when neither bound is given
    pub fn new(
        field: impl Into<String>,
        lower: Option<Bound>,
        upper: Option<Bound>,
    ) -> Result<Self> {
        if lower.is_none() && upper.is_none() {
            return Err(Error::InvalidClause(
                "range needs a lower or an upper bound".to_string(),
            ));
        }
        Ok(Self {
            field: field.into(),
            lower,
            upper,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn lower(&self) -> Option<Bound> {
        self.lower
    }

    pub fn upper(&self) -> Option<Bound> {
        self.upper
    }
}

impl fmt::Display for RangeClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.lower, &self.upper) {
            (Some(lo), Some(hi)) => write!(
                f,
                "{} {} {} {} {}",
                lo.limit,
                if lo.included { "<=" } else { "<" },
                self.field,
                if hi.included { "<=" } else { "<" },
                hi.limit
            ),
            (Some(lo), None) => write!(
                f,
                "{} {} {}",
                self.field,
                if lo.included { ">=" } else { ">" },
                lo.limit
            ),
            (None, Some(hi)) => write!(
                f,
                "{} {} {}",
                self.field,
                if hi.included { "<=" } else { "<" },
                hi.limit
            ),
            (None, None) => write!(f, "{} in ()", self.field),
        }
    }
}

/// children of an and/or clause; never fewer than two
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseList(Vec<Clause>);

impl ClauseList {
    pub fn new(children: Vec<Clause>) -> Result<Self> {
        check_arity("composite", &children)?;
        Ok(Self(children))
    }

    fn pair(first: Clause, second: Clause) -> Self {
        Self(vec![first, second])
    }

    pub fn as_slice(&self) -> &[Clause] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// never true for a constructed list
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Clause> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ClauseList {
    type Item = &'a Clause;
    type IntoIter = std::slice::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// the clause AST of a state trigger condition
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Equals(EqualsClause),
    NotEquals(EqualsClause),
    Range(RangeClause),
    /// every child must hold
    And(ClauseList),
    /// some child must hold
    Or(ClauseList),
}

impl Clause {
    pub fn equals(field: impl Into<String>, value: impl Into<ClauseValue>) -> Self {
        Clause::Equals(EqualsClause {
            field: field.into(),
            value: value.into(),
        })
    }

    pub fn not_equals(field: impl Into<String>, value: impl Into<ClauseValue>) -> Self {
        Clause::NotEquals(EqualsClause {
            field: field.into(),
            value: value.into(),
        })
    }

    /// `field > limit`
    pub fn greater_than(field: impl Into<String>, limit: impl Into<Limit>) -> Result<Self> {
        let lower = Bound::new(limit, false)?;
        RangeClause::new(field, Some(lower), None).map(Clause::Range)
    }

    /// `field < limit`
    pub fn less_than(field: impl Into<String>, limit: impl Into<Limit>) -> Result<Self> {
        let upper = Bound::new(limit, false)?;
        RangeClause::new(field, None, Some(upper)).map(Clause::Range)
    }

    /// `field <= limit`
    pub fn not_greater_than(field: impl Into<String>, limit: impl Into<Limit>) -> Result<Self> {
        let upper = Bound::new(limit, true)?;
        RangeClause::new(field, None, Some(upper)).map(Clause::Range)
    }

    /// `field >= limit`
    pub fn not_less_than(field: impl Into<String>, limit: impl Into<Limit>) -> Result<Self> {
        let lower = Bound::new(limit, true)?;
        RangeClause::new(field, Some(lower), None).map(Clause::Range)
    }

    /// two-sided range
    pub fn range(
        field: impl Into<String>,
        lower: impl Into<Limit>,
        lower_included: bool,
        upper: impl Into<Limit>,
        upper_included: bool,
    ) -> Result<Self> {
        let lower = Bound::new(lower, lower_included)?;
        let upper = Bound::new(upper, upper_included)?;
        RangeClause::new(field, Some(lower), Some(upper)).map(Clause::Range)
    }

    pub fn and(first: Clause, second: Clause) -> Self {
        Clause::And(ClauseList::pair(first, second))
    }

    pub fn or(first: Clause, second: Clause) -> Self {
        Clause::Or(ClauseList::pair(first, second))
    }

    /// n-ary AND; fails with fewer than two children
    pub fn all(children: Vec<Clause>) -> Result<Self> {
        check_arity("and", &children)?;
        Ok(Clause::And(ClauseList(children)))
    }

    /// n-ary OR; fails with fewer than two children
    pub fn any(children: Vec<Clause>) -> Result<Self> {
        check_arity("or", &children)?;
        Ok(Clause::Or(ClauseList(children)))
    }

    /// field the clause compares, `None` for and/or
    pub fn field(&self) -> Option<&str> {
        match self {
            Clause::Equals(eq) | Clause::NotEquals(eq) => Some(&eq.field),
            Clause::Range(r) => Some(&r.field),
            Clause::And(_) | Clause::Or(_) => None,
        }
    }

    /// children of an and/or clause, empty for leaves
    pub fn children(&self) -> &[Clause] {
        match self {
            Clause::And(children) | Clause::Or(children) => children.as_slice(),
            _ => &[],
        }
    }

    /// number of leaf comparisons in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            Clause::And(children) | Clause::Or(children) => {
                children.iter().map(Clause::leaf_count).sum()
            }
            _ => 1,
        }
    }
}

pub(crate) fn check_arity(kind: &str, children: &[Clause]) -> Result<()> {
    if children.len() < 2 {
        return Err(Error::InvalidClause(format!(
            "'{}' needs at least 2 clauses, got {}",
            kind,
            children.len()
        )));
    }
    Ok(())
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Equals(eq) => write!(f, "{}", eq),
            Clause::NotEquals(eq) => write!(f, "not({})", eq),
            Clause::Range(r) => write!(f, "{}", r),
            Clause::And(children) => write_list(f, "all", children.as_slice()),
            Clause::Or(children) => write_list(f, "any", children.as_slice()),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, children: &[Clause]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, c) in children.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, ")")
}

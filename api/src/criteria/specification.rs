use super::filter::{Filter, RangeFilter, StringFilter};
use chrono::NaiveDate;
use std::fmt::Debug;

/// Value bound into a rendered query
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Text(String),
    Date(NaiveDate),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Integer(value as i64)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

/// A column qualified by the table alias it is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub table: &'static str,
    pub name: &'static str,
}

impl Column {
    pub const fn new(table: &'static str, name: &'static str) -> Self {
        Self { table, name }
    }

    pub fn qualified(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }
}

/// LEFT join from an owning column to a related table's key.
///
/// LEFT keeps rows without a related entity, so `specified=false` on the
/// joined key selects exactly those rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Join {
    pub table: &'static str,
    pub alias: &'static str,
    pub owner: Column,
    pub key: Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "<>",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

/// Boolean condition over entity columns, interpreted by the store adapter
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every row
    True,
    And(Vec<Predicate>),
    Compare {
        column: Column,
        op: CompareOp,
        value: SqlValue,
    },
    In {
        column: Column,
        values: Vec<SqlValue>,
        negated: bool,
    },
    IsNull {
        column: Column,
        negated: bool,
    },
    /// Substring match; `needle` is the raw text, wildcards are added when rendering
    Contains {
        column: Column,
        needle: String,
        negated: bool,
    },
}

impl Predicate {
    /// Conjoin `other`, keeping the tree flat and dropping `True` operands
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::True, p) | (p, Predicate::True) => p,
            (Predicate::And(mut left), Predicate::And(right)) => {
                left.extend(right);
                Predicate::And(left)
            }
            (Predicate::And(mut left), p) => {
                left.push(p);
                Predicate::And(left)
            }
            (p, Predicate::And(mut right)) => {
                right.insert(0, p);
                Predicate::And(right)
            }
            (a, b) => Predicate::And(vec![a, b]),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Predicate::True)
    }
}

/// A predicate together with the joins it reads from and the distinct flag
#[derive(Debug, Clone, PartialEq)]
pub struct Specification {
    pub distinct: bool,
    pub joins: Vec<Join>,
    pub predicate: Predicate,
}

impl Default for Specification {
    fn default() -> Self {
        Self {
            distinct: false,
            joins: Vec::new(),
            predicate: Predicate::True,
        }
    }
}

/// Implemented by every per-entity criteria type
pub trait Criteria: Debug {
    /// Translate into a specification. Must not touch the store.
    fn build_specification(&self) -> Specification;
}

/// Accumulates filter translations onto an initially unconstrained specification
#[derive(Debug, Default)]
pub struct SpecificationBuilder {
    spec: Specification,
}

impl SpecificationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distinct(mut self, distinct: Option<bool>) -> Self {
        if let Some(distinct) = distinct {
            self.spec.distinct = distinct;
        }
        self
    }

    pub fn range<T>(mut self, filter: Option<&RangeFilter<T>>, column: Column) -> Self
    where
        T: Clone + PartialOrd + Into<SqlValue>,
    {
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            self.push(range_predicate(filter, column));
        }
        self
    }

    pub fn string(mut self, filter: Option<&StringFilter>, column: Column) -> Self {
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            self.push(string_predicate(filter, column));
        }
        self
    }

    /// Filter on a related entity's key through a LEFT join.
    /// An empty filter adds neither the join nor a constraint.
    pub fn related<T>(mut self, filter: Option<&RangeFilter<T>>, join: Join) -> Self
    where
        T: Clone + PartialOrd + Into<SqlValue>,
    {
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            if !self.spec.joins.iter().any(|j| j.alias == join.alias) {
                self.spec.joins.push(join);
            }
            self.push(range_predicate(filter, join.key));
        }
        self
    }

    pub fn build(self) -> Specification {
        self.spec
    }

    fn push(&mut self, predicate: Predicate) {
        let current = std::mem::replace(&mut self.spec.predicate, Predicate::True);
        self.spec.predicate = current.and(predicate);
    }
}

fn compare<T: Clone + Into<SqlValue>>(column: Column, op: CompareOp, value: &T) -> Predicate {
    Predicate::Compare {
        column,
        op,
        value: value.clone().into(),
    }
}

fn membership<T: Clone + Into<SqlValue>>(column: Column, values: &[T], negated: bool) -> Predicate {
    Predicate::In {
        column,
        values: values.iter().cloned().map(Into::into).collect(),
        negated,
    }
}

fn base_predicate<T: Clone + Into<SqlValue>>(filter: &Filter<T>, column: Column) -> Predicate {
    let mut predicate = Predicate::True;
    if let Some(v) = &filter.equals {
        predicate = predicate.and(compare(column, CompareOp::Eq, v));
    }
    if let Some(v) = &filter.not_equals {
        predicate = predicate.and(compare(column, CompareOp::NotEq, v));
    }
    if let Some(values) = &filter.in_list {
        predicate = predicate.and(membership(column, values, false));
    }
    if let Some(values) = &filter.not_in {
        predicate = predicate.and(membership(column, values, true));
    }
    if let Some(specified) = filter.specified {
        predicate = predicate.and(Predicate::IsNull {
            column,
            negated: specified,
        });
    }
    predicate
}

fn range_predicate<T: Clone + Into<SqlValue>>(filter: &RangeFilter<T>, column: Column) -> Predicate {
    let mut predicate = base_predicate(&filter.base, column);
    let bounds = [
        (&filter.greater_than, CompareOp::Gt),
        (&filter.greater_than_or_equal, CompareOp::Gte),
        (&filter.less_than, CompareOp::Lt),
        (&filter.less_than_or_equal, CompareOp::Lte),
    ];
    for (bound, op) in bounds {
        if let Some(v) = bound {
            predicate = predicate.and(compare(column, op, v));
        }
    }
    predicate
}

fn string_predicate(filter: &StringFilter, column: Column) -> Predicate {
    let mut predicate = base_predicate(&filter.base, column);
    if let Some(needle) = &filter.contains {
        predicate = predicate.and(Predicate::Contains {
            column,
            needle: needle.clone(),
            negated: false,
        });
    }
    if let Some(needle) = &filter.does_not_contain {
        predicate = predicate.and(Predicate::Contains {
            column,
            needle: needle.clone(),
            negated: true,
        });
    }
    predicate
}

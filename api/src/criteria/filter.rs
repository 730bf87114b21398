//! Per-field filter value objects
//!
//! A filter carries any subset of its operations. Operations that only make
//! sense for ordered values live on [`RangeFilter`], substring operations live
//! on [`StringFilter`], so a filter can never hold an operation its value type
//! does not support.

use chrono::NaiveDate;

/// Equality, membership and null-check operations shared by every filter
#[derive(Debug, Clone, PartialEq)]
pub struct Filter<T> {
    pub equals: Option<T>,
    pub not_equals: Option<T>,
    pub in_list: Option<Vec<T>>,
    pub not_in: Option<Vec<T>>,
    pub specified: Option<bool>,
}

// Manual impl so `T` does not need `Default`
impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self {
            equals: None,
            not_equals: None,
            in_list: None,
            not_in: None,
            specified: None,
        }
    }
}

impl<T> Filter<T> {
    /// True when no operation is set
    pub fn is_empty(&self) -> bool {
        self.equals.is_none()
            && self.not_equals.is_none()
            && self.in_list.is_none()
            && self.not_in.is_none()
            && self.specified.is_none()
    }
}

/// Filter over an ordered value: adds the four range comparisons
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter<T> {
    pub base: Filter<T>,
    pub greater_than: Option<T>,
    pub greater_than_or_equal: Option<T>,
    pub less_than: Option<T>,
    pub less_than_or_equal: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            base: Filter::default(),
            greater_than: None,
            greater_than_or_equal: None,
            less_than: None,
            less_than_or_equal: None,
        }
    }
}

impl<T: PartialOrd> RangeFilter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(mut self, value: T) -> Self {
        self.base.equals = Some(value);
        self
    }

    pub fn not_equals(mut self, value: T) -> Self {
        self.base.not_equals = Some(value);
        self
    }

    pub fn in_list(mut self, values: Vec<T>) -> Self {
        self.base.in_list = Some(values);
        self
    }

    pub fn not_in(mut self, values: Vec<T>) -> Self {
        self.base.not_in = Some(values);
        self
    }

    pub fn specified(mut self, specified: bool) -> Self {
        self.base.specified = Some(specified);
        self
    }

    pub fn greater_than(mut self, value: T) -> Self {
        self.greater_than = Some(value);
        self
    }

    pub fn greater_than_or_equal(mut self, value: T) -> Self {
        self.greater_than_or_equal = Some(value);
        self
    }

    pub fn less_than(mut self, value: T) -> Self {
        self.less_than = Some(value);
        self
    }

    pub fn less_than_or_equal(mut self, value: T) -> Self {
        self.less_than_or_equal = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
            && self.greater_than.is_none()
            && self.greater_than_or_equal.is_none()
            && self.less_than.is_none()
            && self.less_than_or_equal.is_none()
    }
}

/// Filter over text: adds substring matching
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringFilter {
    pub base: Filter<String>,
    pub contains: Option<String>,
    pub does_not_contain: Option<String>,
}

impl StringFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(mut self, value: impl Into<String>) -> Self {
        self.base.equals = Some(value.into());
        self
    }

    pub fn not_equals(mut self, value: impl Into<String>) -> Self {
        self.base.not_equals = Some(value.into());
        self
    }

    pub fn in_list(mut self, values: Vec<String>) -> Self {
        self.base.in_list = Some(values);
        self
    }

    pub fn not_in(mut self, values: Vec<String>) -> Self {
        self.base.not_in = Some(values);
        self
    }

    pub fn specified(mut self, specified: bool) -> Self {
        self.base.specified = Some(specified);
        self
    }

    pub fn contains(mut self, value: impl Into<String>) -> Self {
        self.contains = Some(value.into());
        self
    }

    pub fn does_not_contain(mut self, value: impl Into<String>) -> Self {
        self.does_not_contain = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.contains.is_none() && self.does_not_contain.is_none()
    }
}

pub type LongFilter = RangeFilter<i64>;
pub type IntegerFilter = RangeFilter<i32>;
pub type LocalDateFilter = RangeFilter<NaiveDate>;

//! Criteria filtering: per-field filters, their translation into a
//! [`Specification`], and decoding from `field.operation=value` parameters.

mod company;
mod computer;
mod filter;
mod params;
mod specification;

pub use company::CompanyCriteria;
pub use computer::ComputerCriteria;
pub use filter::LongFilter;
pub use params::{parse_company_criteria, parse_computer_criteria};
pub use specification::{Column, Criteria, Join, Predicate, Specification, SqlValue};

#[cfg(test)]
pub use filter::{IntegerFilter, LocalDateFilter, StringFilter};

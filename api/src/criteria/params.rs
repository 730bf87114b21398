//! Decodes `field.operation=value` query parameters into criteria
//!
//! ```text
//! name.contains=Mac&hardware.greaterThanOrEqual=5&companyId.in=1,2&distinct=true
//! ```

use super::filter::{Filter, RangeFilter, StringFilter};
use super::{CompanyCriteria, ComputerCriteria};
use std::str::FromStr;

/// Keys that are not filters: paging is parsed separately, the rest are client noise
const NON_FILTER_KEYS: &[&str] = &["page", "size", "sort", "eagerload", "cacheBuster"];

pub fn parse_computer_criteria(params: &[(String, String)]) -> Result<ComputerCriteria, String> {
    let mut criteria = ComputerCriteria::default();

    for (key, raw) in params {
        if NON_FILTER_KEYS.contains(&key.as_str()) {
            continue;
        }
        if key == "distinct" {
            criteria.distinct = Some(parse_distinct(raw)?);
            continue;
        }

        let (field, op) = split_key(key)?;
        match field {
            "id" => apply_range(&mut criteria.id, field, op, raw)?,
            "name" => apply_string(&mut criteria.name, field, op, raw)?,
            "introduced" => apply_range(&mut criteria.introduced, field, op, raw)?,
            "removed" => apply_range(&mut criteria.removed, field, op, raw)?,
            "hardware" => apply_range(&mut criteria.hardware, field, op, raw)?,
            "software" => apply_range(&mut criteria.software, field, op, raw)?,
            "companyId" => apply_range(&mut criteria.company_id, field, op, raw)?,
            _ => return Err(format!("Unknown filter field: {}", field)),
        }
    }

    Ok(criteria)
}

pub fn parse_company_criteria(params: &[(String, String)]) -> Result<CompanyCriteria, String> {
    let mut criteria = CompanyCriteria::default();

    for (key, raw) in params {
        if NON_FILTER_KEYS.contains(&key.as_str()) {
            continue;
        }
        if key == "distinct" {
            criteria.distinct = Some(parse_distinct(raw)?);
            continue;
        }

        let (field, op) = split_key(key)?;
        match field {
            "id" => apply_range(&mut criteria.id, field, op, raw)?,
            "name" => apply_string(&mut criteria.name, field, op, raw)?,
            _ => return Err(format!("Unknown filter field: {}", field)),
        }
    }

    Ok(criteria)
}

fn split_key(key: &str) -> Result<(&str, &str), String> {
    match key.split_once('.') {
        Some((field, op)) if !field.is_empty() && !op.is_empty() => Ok((field, op)),
        _ => Err(format!(
            "Invalid filter parameter '{}', expected <field>.<operation>",
            key
        )),
    }
}

fn parse_value<T: FromStr>(field: &str, op: &str, raw: &str) -> Result<T, String> {
    raw.parse::<T>()
        .map_err(|_| format!("Invalid value '{}' for {}.{}", raw, field, op))
}

fn parse_list<T: FromStr>(field: &str, op: &str, raw: &str) -> Result<Vec<T>, String> {
    raw.split(',')
        .map(|item| parse_value(field, op, item))
        .collect()
}

fn parse_distinct(raw: &str) -> Result<bool, String> {
    raw.parse::<bool>()
        .map_err(|_| format!("Invalid value '{}' for distinct", raw))
}

fn unsupported(field: &str, op: &str) -> String {
    format!("Operation '{}' is not supported for field '{}'", op, field)
}

/// Applies one of the operations every filter has. Returns false if `op` is not one of them.
fn apply_base<T: FromStr>(
    filter: &mut Filter<T>,
    field: &str,
    op: &str,
    raw: &str,
) -> Result<bool, String> {
    match op {
        "equals" => filter.equals = Some(parse_value(field, op, raw)?),
        "notEquals" => filter.not_equals = Some(parse_value(field, op, raw)?),
        "in" => filter.in_list = Some(parse_list(field, op, raw)?),
        "notIn" => filter.not_in = Some(parse_list(field, op, raw)?),
        "specified" => filter.specified = Some(parse_value(field, op, raw)?),
        _ => return Ok(false),
    }
    Ok(true)
}

fn apply_range<T: FromStr + PartialOrd>(
    slot: &mut Option<RangeFilter<T>>,
    field: &str,
    op: &str,
    raw: &str,
) -> Result<(), String> {
    let filter = slot.get_or_insert_with(RangeFilter::default);
    if apply_base(&mut filter.base, field, op, raw)? {
        return Ok(());
    }

    match op {
        "greaterThan" => filter.greater_than = Some(parse_value(field, op, raw)?),
        "greaterThanOrEqual" => filter.greater_than_or_equal = Some(parse_value(field, op, raw)?),
        "lessThan" => filter.less_than = Some(parse_value(field, op, raw)?),
        "lessThanOrEqual" => filter.less_than_or_equal = Some(parse_value(field, op, raw)?),
        _ => return Err(unsupported(field, op)),
    }
    Ok(())
}

fn apply_string(
    slot: &mut Option<StringFilter>,
    field: &str,
    op: &str,
    raw: &str,
) -> Result<(), String> {
    let filter = slot.get_or_insert_with(StringFilter::default);
    if apply_base(&mut filter.base, field, op, raw)? {
        return Ok(());
    }

    match op {
        "contains" => filter.contains = Some(raw.to_string()),
        "doesNotContain" => filter.does_not_contain = Some(raw.to_string()),
        _ => return Err(unsupported(field, op)),
    }
    Ok(())
}

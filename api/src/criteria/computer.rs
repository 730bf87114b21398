use super::filter::{IntegerFilter, LocalDateFilter, LongFilter, StringFilter};
use super::specification::{Criteria, Specification, SpecificationBuilder};
use crate::database::schema::computer;

/// Filters accepted by the computer listing and count endpoints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputerCriteria {
    pub id: Option<LongFilter>,
    pub name: Option<StringFilter>,
    pub introduced: Option<LocalDateFilter>,
    pub removed: Option<LocalDateFilter>,
    pub hardware: Option<IntegerFilter>,
    pub software: Option<IntegerFilter>,
    pub company_id: Option<LongFilter>,
    pub distinct: Option<bool>,
}

impl Criteria for ComputerCriteria {
    fn build_specification(&self) -> Specification {
        // distinct is applied before any filter
        SpecificationBuilder::new()
            .distinct(self.distinct)
            .range(self.id.as_ref(), computer::ID)
            .string(self.name.as_ref(), computer::NAME)
            .range(self.introduced.as_ref(), computer::INTRODUCED)
            .range(self.removed.as_ref(), computer::REMOVED)
            .range(self.hardware.as_ref(), computer::HARDWARE)
            .range(self.software.as_ref(), computer::SOFTWARE)
            .related(self.company_id.as_ref(), computer::COMPANY_JOIN)
            .build()
    }
}

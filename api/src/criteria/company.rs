use super::filter::{LongFilter, StringFilter};
use super::specification::{Criteria, Specification, SpecificationBuilder};
use crate::database::schema::company;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyCriteria {
    pub id: Option<LongFilter>,
    pub name: Option<StringFilter>,
    pub distinct: Option<bool>,
}

impl Criteria for CompanyCriteria {
    fn build_specification(&self) -> Specification {
        SpecificationBuilder::new()
            .distinct(self.distinct)
            .range(self.id.as_ref(), company::ID)
            .string(self.name.as_ref(), company::NAME)
            .build()
    }
}

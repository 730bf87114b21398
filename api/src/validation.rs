use crate::database::{CompanyDto, ComputerDto, ComputerPatch};
use anyhow::{bail, Result};

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_HARDWARE: i32 = 40;
pub const MAX_SOFTWARE: i32 = 60;

pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Name cannot be empty");
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        bail!("Name is too long (max {} characters)", MAX_NAME_LENGTH);
    }
    Ok(())
}

pub fn validate_hardware(hardware: Option<i32>) -> Result<()> {
    if let Some(value) = hardware {
        if !(0..=MAX_HARDWARE).contains(&value) {
            bail!("Hardware must be between 0 and {}", MAX_HARDWARE);
        }
    }
    Ok(())
}

pub fn validate_software(software: Option<i32>) -> Result<()> {
    if let Some(value) = software {
        if !(0..=MAX_SOFTWARE).contains(&value) {
            bail!("Software must be between 0 and {}", MAX_SOFTWARE);
        }
    }
    Ok(())
}

pub fn validate_company(company: &CompanyDto) -> Result<()> {
    validate_name(&company.name)
}

pub fn validate_computer(computer: &ComputerDto) -> Result<()> {
    validate_name(&computer.name)?;
    validate_hardware(computer.hardware)?;
    validate_software(computer.software)
}

/// Only fields present in the patch are checked
pub fn validate_computer_patch(patch: &ComputerPatch) -> Result<()> {
    if let Some(name) = &patch.name {
        validate_name(name)?;
    }
    validate_hardware(patch.hardware)?;
    validate_software(patch.software)
}

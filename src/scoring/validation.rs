use super::factors::{FactorError, FactorSet};

/// Validate every factor in a set.
/// Returns all validation errors at once (not just the first).
pub fn validate_factors(factors: &FactorSet) -> Result<(), Vec<FactorError>> {
    let errors: Vec<FactorError> = factors
        .iter()
        .filter_map(|(factor, value)| FactorSet::check(factor, value).err())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

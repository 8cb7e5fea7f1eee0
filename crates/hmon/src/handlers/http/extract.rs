//! Response body assertions.

use regex::bytes::Regex;

use crate::error::CheckError;

/// Check every pattern against the body, in order.
///
/// Stops at the first pattern that does not match anywhere in the body and
/// reports it. Patterns are expected to be validated upstream, but one that
/// fails to compile is reported as an error instead of panicking.
pub fn evaluate_assertions(body: &[u8], patterns: &[String]) -> Result<(), CheckError> {
    for pattern in patterns {
        let regex = Regex::new(pattern).map_err(|error| CheckError::InvalidPattern {
            pattern: pattern.clone(),
            reason: error.to_string(),
        })?;

        if !regex.is_match(body) {
            return Err(CheckError::Assertion { pattern: pattern.clone() });
        }
    }

    Ok(())
}

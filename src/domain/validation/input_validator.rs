use super::raw_record::{RawRecord, RawValue};
use crate::domain::errors::{ValidationError, ValidationReason};
use crate::domain::ml::feature_schema::{FEATURE_COUNT, FEATURE_SCHEMA, FieldSpec};
use crate::domain::ml::feature_vector::FeatureVector;
use tracing::debug;

/// Checks raw records against the static feature schema.
///
/// Fields are checked in schema order and the first failure wins, so the
/// reported field is stable for a given input. Unknown keys are ignored.
pub struct InputValidator;

impl InputValidator {
    pub fn validate(raw: &RawRecord) -> Result<FeatureVector, ValidationError> {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, spec) in values.iter_mut().zip(FEATURE_SCHEMA.iter()) {
            *slot = Self::check_field(spec, raw.get(spec.name)).inspect_err(|err| {
                debug!("Validation FAILED: {}", err);
            })?;
        }
        Ok(FeatureVector::from_validated(values))
    }

    fn check_field(spec: &FieldSpec, value: Option<&RawValue>) -> Result<f64, ValidationError> {
        let number =
            Self::coerce(spec, value).map_err(|reason| ValidationError::new(spec.name, reason))?;

        if !spec.domain.contains(number) {
            return Err(ValidationError::new(
                spec.name,
                ValidationReason::OutOfDomain {
                    detail: format!("{} not in {}", number, spec.domain),
                },
            ));
        }
        Ok(number)
    }

    fn coerce(spec: &FieldSpec, value: Option<&RawValue>) -> Result<f64, ValidationReason> {
        let wrong_type = || ValidationReason::WrongType {
            expected: spec.kind.expected(),
        };

        let number = match value {
            None | Some(RawValue::Other(serde_json::Value::Null)) => {
                return Err(ValidationReason::Missing);
            }
            Some(RawValue::Number(n)) => *n,
            Some(RawValue::Text(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ValidationReason::Missing);
                }
                trimmed.parse::<f64>().map_err(|_| wrong_type())?
            }
            Some(RawValue::Other(_)) => return Err(wrong_type()),
        };

        // "nan" and "inf" parse as f64
        if !number.is_finite() {
            return Err(wrong_type());
        }
        if spec.kind.is_integral() && number.fract() != 0.0 {
            return Err(wrong_type());
        }
        Ok(number)
    }
}

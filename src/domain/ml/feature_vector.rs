use super::feature_schema::{FEATURE_COUNT, FEATURE_SCHEMA, position};

/// Validated 13-attribute patient record in pipeline order.
///
/// Only `InputValidator` builds one, so every value is present and inside
/// its schema domain. There is no mutating API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub(crate) fn from_validated(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Values in pipeline order, ready to be fed to a model.
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Value of a field by schema name.
    pub fn get(&self, name: &str) -> Option<f64> {
        position(name).map(|idx| self.values[idx])
    }

    /// `(name, value)` pairs in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_SCHEMA
            .iter()
            .zip(self.values.iter())
            .map(|(spec, value)| (spec.name, *value))
    }

    pub fn age(&self) -> f64 {
        self.values[0]
    }

    pub fn sex(&self) -> u8 {
        self.values[1] as u8
    }

    pub fn cp(&self) -> u8 {
        self.values[2] as u8
    }

    pub fn trestbps(&self) -> u32 {
        self.values[3] as u32
    }

    pub fn chol(&self) -> u32 {
        self.values[4] as u32
    }

    pub fn fbs(&self) -> u8 {
        self.values[5] as u8
    }

    pub fn restecg(&self) -> u8 {
        self.values[6] as u8
    }

    pub fn thalach(&self) -> u32 {
        self.values[7] as u32
    }

    pub fn exang(&self) -> u8 {
        self.values[8] as u8
    }

    pub fn oldpeak(&self) -> f64 {
        self.values[9]
    }

    pub fn slope(&self) -> u8 {
        self.values[10] as u8
    }

    pub fn ca(&self) -> u8 {
        self.values[11] as u8
    }

    pub fn thal(&self) -> u8 {
        self.values[12] as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors_follow_schema_order() {
        let v = FeatureVector::from_validated([
            55.0, 1.0, 0.0, 130.0, 250.0, 0.0, 0.0, 150.0, 0.0, 1.0, 1.0, 0.0, 2.0,
        ]);
        assert_eq!(v.age(), 55.0);
        assert_eq!(v.trestbps(), 130);
        assert_eq!(v.chol(), 250);
        assert_eq!(v.thalach(), 150);
        assert_eq!(v.oldpeak(), 1.0);
        assert_eq!(v.thal(), 2);
        assert_eq!(v.get("chol"), Some(250.0));
        assert_eq!(v.get("unknown"), None);
        assert_eq!(v.iter().count(), FEATURE_COUNT);
    }
}

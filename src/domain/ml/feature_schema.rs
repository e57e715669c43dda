use serde::Serialize;
use std::fmt;

/// Number of attributes the pipeline consumes.
pub const FEATURE_COUNT: usize = 13;

/// Semantic type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Continuous measurement.
    Float,
    /// Whole-number count or measurement.
    Integer,
    /// Integer code drawn from a closed set.
    Categorical,
}

impl FieldKind {
    /// Human readable name used in `WrongType` reasons.
    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::Float => "number",
            FieldKind::Integer => "integer",
            FieldKind::Categorical => "integer code",
        }
    }

    pub fn is_integral(&self) -> bool {
        !matches!(self, FieldKind::Float)
    }
}

/// Valid domain of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Domain {
    /// `min < x <= max` (or `min <= x <= max` when `min_inclusive`).
    Range {
        min: f64,
        min_inclusive: bool,
        max: f64,
    },
    /// Closed set of integer codes.
    OneOf { values: &'static [i64] },
}

impl Domain {
    pub fn contains(&self, value: f64) -> bool {
        match self {
            Domain::Range {
                min,
                min_inclusive,
                max,
            } => {
                let above_min = if *min_inclusive {
                    value >= *min
                } else {
                    value > *min
                };
                above_min && value <= *max
            }
            Domain::OneOf { values } => values.iter().any(|&code| code as f64 == value),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Range {
                min,
                min_inclusive,
                max,
            } => {
                let open = if *min_inclusive { '[' } else { '(' };
                write!(f, "{open}{min}, {max}]")
            }
            Domain::OneOf { values } => {
                let codes: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{{{}}}", codes.join(", "))
            }
        }
    }
}

/// Static description of one accepted attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub domain: Domain,
    pub description: &'static str,
}

const BINARY: &[i64] = &[0, 1];
const THREE_CODES: &[i64] = &[0, 1, 2];
const FOUR_CODES: &[i64] = &[0, 1, 2, 3];

/// Ordered field table.
/// This order MUST match the column order the pipeline was trained on,
/// and it is also the order in which validation reports the first failure.
pub const FEATURE_SCHEMA: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec {
        name: "age",
        kind: FieldKind::Float,
        domain: Domain::Range {
            min: 0.0,
            min_inclusive: false,
            max: 120.0,
        },
        description: "Age of the patient in years",
    },
    FieldSpec {
        name: "sex",
        kind: FieldKind::Categorical,
        domain: Domain::OneOf { values: BINARY },
        description: "Sex (0: female, 1: male)",
    },
    FieldSpec {
        name: "cp",
        kind: FieldKind::Categorical,
        domain: Domain::OneOf { values: FOUR_CODES },
        description: "Chest pain type (0-3)",
    },
    FieldSpec {
        name: "trestbps",
        kind: FieldKind::Integer,
        domain: Domain::Range {
            min: 0.0,
            min_inclusive: false,
            max: 300.0,
        },
        description: "Resting blood pressure (mm Hg)",
    },
    FieldSpec {
        name: "chol",
        kind: FieldKind::Integer,
        domain: Domain::Range {
            min: 0.0,
            min_inclusive: true,
            max: 600.0,
        },
        description: "Serum cholesterol (mg/dl)",
    },
    FieldSpec {
        name: "fbs",
        kind: FieldKind::Categorical,
        domain: Domain::OneOf { values: BINARY },
        description: "Fasting blood sugar > 120 mg/dl (0: no, 1: yes)",
    },
    FieldSpec {
        name: "restecg",
        kind: FieldKind::Categorical,
        domain: Domain::OneOf {
            values: THREE_CODES,
        },
        description: "Resting electrocardiographic results (0-2)",
    },
    FieldSpec {
        name: "thalach",
        kind: FieldKind::Integer,
        domain: Domain::Range {
            min: 0.0,
            min_inclusive: false,
            max: 300.0,
        },
        description: "Maximum heart rate achieved",
    },
    FieldSpec {
        name: "exang",
        kind: FieldKind::Categorical,
        domain: Domain::OneOf { values: BINARY },
        description: "Exercise induced angina (0: no, 1: yes)",
    },
    FieldSpec {
        name: "oldpeak",
        kind: FieldKind::Float,
        domain: Domain::Range {
            min: 0.0,
            min_inclusive: true,
            max: 10.0,
        },
        description: "ST depression induced by exercise relative to rest",
    },
    FieldSpec {
        name: "slope",
        kind: FieldKind::Categorical,
        domain: Domain::OneOf {
            values: THREE_CODES,
        },
        description: "Slope of the peak exercise ST segment (0-2)",
    },
    FieldSpec {
        name: "ca",
        kind: FieldKind::Integer,
        domain: Domain::Range {
            min: 0.0,
            min_inclusive: true,
            max: 4.0,
        },
        description: "Number of major vessels colored by fluoroscopy (0-4)",
    },
    FieldSpec {
        name: "thal",
        kind: FieldKind::Categorical,
        domain: Domain::OneOf { values: FOUR_CODES },
        description: "Thalassemia (0-3)",
    },
];

/// Feature names in pipeline order.
pub fn feature_names() -> Vec<&'static str> {
    FEATURE_SCHEMA.iter().map(|spec| spec.name).collect()
}

/// Looks up a field by name.
pub fn field(name: &str) -> Option<&'static FieldSpec> {
    FEATURE_SCHEMA.iter().find(|spec| spec.name == name)
}

/// Position of a field in pipeline order.
pub fn position(name: &str) -> Option<usize> {
    FEATURE_SCHEMA.iter().position(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_order_is_stable() {
        assert_eq!(
            feature_names(),
            vec![
                "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang",
                "oldpeak", "slope", "ca", "thal"
            ]
        );
    }

    #[test]
    fn test_field_lookup() {
        let chol = field("chol").unwrap();
        assert_eq!(chol.kind, FieldKind::Integer);
        assert_eq!(position("thal"), Some(12));
        assert!(field("bmi").is_none());
    }

    #[test]
    fn test_range_bounds() {
        let age = field("age").unwrap().domain;
        assert!(!age.contains(0.0));
        assert!(age.contains(0.5));
        assert!(age.contains(120.0));
        assert!(!age.contains(120.5));

        let chol = field("chol").unwrap().domain;
        assert!(chol.contains(0.0));
        assert!(!chol.contains(-1.0));
    }

    #[test]
    fn test_categorical_membership() {
        let restecg = field("restecg").unwrap().domain;
        assert!(restecg.contains(2.0));
        assert!(!restecg.contains(3.0));
        assert_eq!(restecg.to_string(), "{0, 1, 2}");
    }

    #[test]
    fn test_range_display() {
        assert_eq!(field("age").unwrap().domain.to_string(), "(0, 120]");
        assert_eq!(field("ca").unwrap().domain.to_string(), "[0, 4]");
    }
}

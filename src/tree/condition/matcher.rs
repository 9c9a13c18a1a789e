//! Condition construction and answer matching

use serde_json::Value;

use super::literal::{ConditionKind, Literal};
use crate::error::TreeError;

/// A validated branch condition
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    kind: ConditionKind,
    value: Literal,
}

impl Condition {
    /// Build a condition, rejecting unknown types and values the type cannot hold
    pub fn new(kind: &str, value: impl Into<Literal>) -> Result<Self, TreeError> {
        let kind: ConditionKind = kind.parse()?;
        Self::typed(kind, value.into())
    }

    /// Build a condition from its serialized parts
    pub fn from_parts(kind: &str, value: Option<&Value>) -> Result<Self, TreeError> {
        let kind: ConditionKind = kind.parse()?;
        let value = value.ok_or_else(|| TreeError::invalid_condition("condition value is absent"))?;
        let literal = Literal::try_from(value).map_err(TreeError::invalid_condition)?;
        Self::typed(kind, literal)
    }

    fn typed(kind: ConditionKind, value: Literal) -> Result<Self, TreeError> {
        if let Literal::Number(n) = value {
            if !n.is_finite() {
                return Err(TreeError::invalid_condition(format!(
                    "condition value {} is not a finite number",
                    n
                )));
            }
        }
        if kind == ConditionKind::Bool && value.as_bool().is_none() {
            return Err(TreeError::invalid_condition(format!(
                "bool condition cannot hold a {} value",
                value.type_name()
            )));
        }
        Ok(Self { kind, value })
    }

    pub fn bool(value: bool) -> Self {
        Self {
            kind: ConditionKind::Bool,
            value: Literal::Bool(value),
        }
    }

    /// Equality on any literal: `bool` for booleans, `comparison` otherwise
    pub fn equals(value: impl Into<Literal>) -> Result<Self, TreeError> {
        let value = value.into();
        let kind = match value {
            Literal::Bool(_) => ConditionKind::Bool,
            _ => ConditionKind::Comparison,
        };
        Self::typed(kind, value)
    }

    pub fn kind(&self) -> ConditionKind {
        self.kind
    }

    pub fn value(&self) -> &Literal {
        &self.value
    }

    /// Check whether an answer satisfies this condition
    pub fn matches(&self, answer: &Literal) -> bool {
        match self.kind {
            ConditionKind::Bool => match (&self.value, answer) {
                (Literal::Bool(expected), Literal::Bool(actual)) => expected == actual,
                _ => false,
            },
            ConditionKind::Comparison => values_equal(&self.value, answer),
        }
    }
}

fn values_equal(left: &Literal, right: &Literal) -> bool {
    match (left, right) {
        (Literal::Bool(a), Literal::Bool(b)) => a == b,
        (Literal::Number(a), Literal::Number(b)) => (a - b).abs() < f64::EPSILON,
        (Literal::String(a), Literal::String(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bool_condition_matches_equal_bool() {
        let cond = Condition::new("bool", true).unwrap();
        assert!(cond.matches(&Literal::Bool(true)));
        assert!(!cond.matches(&Literal::Bool(false)));
    }

    #[test]
    fn test_bool_condition_never_matches_other_types() {
        let cond = Condition::bool(true);
        assert!(!cond.matches(&Literal::String("true".to_string())));
        assert!(!cond.matches(&Literal::Number(1.0)));
    }

    #[test]
    fn test_comparison_condition() {
        let cond = Condition::new("comparison", "gold").unwrap();
        assert!(cond.matches(&Literal::from("gold")));
        assert!(!cond.matches(&Literal::from("silver")));

        let cond = Condition::new("comparison", 2.5).unwrap();
        assert!(cond.matches(&Literal::Number(2.5)));
        assert!(!cond.matches(&Literal::Number(2.6)));
        assert!(!cond.matches(&Literal::from("2.5")));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = Condition::new("regex", "a.*").unwrap_err();
        assert!(matches!(err, TreeError::InvalidConditionData(_)));
    }

    #[test]
    fn test_bool_type_with_string_value_rejected() {
        let err = Condition::new("bool", "yes").unwrap_err();
        assert!(matches!(err, TreeError::InvalidConditionData(_)));
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        for n in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                Condition::new("comparison", n),
                Err(TreeError::InvalidConditionData(_))
            ));
            assert!(matches!(
                Condition::equals(n),
                Err(TreeError::InvalidConditionData(_))
            ));
        }
        assert_eq!(
            Condition::equals(100.0).unwrap().kind(),
            ConditionKind::Comparison
        );
        assert_eq!(Condition::equals(true).unwrap(), Condition::bool(true));
    }

    #[test]
    fn test_from_parts() {
        let cond = Condition::from_parts("bool", Some(&json!(false))).unwrap();
        assert_eq!(cond.kind(), ConditionKind::Bool);
        assert_eq!(cond.value(), &Literal::Bool(false));

        assert!(matches!(
            Condition::from_parts("bool", None),
            Err(TreeError::InvalidConditionData(_))
        ));
        assert!(matches!(
            Condition::from_parts("", Some(&json!(true))),
            Err(TreeError::InvalidConditionData(_))
        ));
        assert!(matches!(
            Condition::from_parts("comparison", Some(&json!([1]))),
            Err(TreeError::InvalidConditionData(_))
        ));
    }
}

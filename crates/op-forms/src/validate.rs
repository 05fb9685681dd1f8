//! Value checks and the error-collecting validation builder.

use op_schema::{ConfigMap, FieldKind, FieldSpec, TypeDescriptor};
use serde_json::{Number, Value};

use crate::error::{FieldError, FieldErrors};

/// Whether a bound value counts as "not answered".
///
/// Unset, `null`, and blank strings are empty. Any other value, including
/// `false` and `0`, is an answer.
#[must_use]
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Parse a numeric entry into a JSON number.
///
/// Integral entries become integers so that `"5432"` and `5432` normalize
/// identically. Integers are tried as `i64` then `u64` before falling back to
/// `f64`, so no in-range integer loses digits. Non-finite values are rejected.
#[must_use]
pub fn parse_number(raw: &str) -> Option<Number> {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Some(Number::from(u));
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Normalize an answered value according to its field's kind.
pub(crate) fn normalize(spec: &FieldSpec, value: &Value) -> Result<Value, FieldError> {
    match spec.kind {
        FieldKind::Number => match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) => parse_number(s)
                .map(Value::Number)
                .ok_or_else(|| FieldError::not_a_number(&spec.key, &spec.label)),
            _ => Err(FieldError::not_a_number(&spec.key, &spec.label)),
        },
        FieldKind::Select => match value {
            Value::String(s) if spec.options().contains(s) => Ok(value.clone()),
            _ => Err(FieldError::not_an_option(&spec.key, &spec.label, spec.options())),
        },
        FieldKind::String | FieldKind::Password | FieldKind::Textarea => Ok(value.clone()),
    }
}

/// The value recorded for an unanswered optional field.
///
/// Free-text fields keep an explicitly entered blank string; everything else
/// becomes `null` so the key is present but marked as not answered.
pub(crate) fn unanswered(spec: &FieldSpec, value: Option<&Value>) -> Value {
    match value {
        Some(Value::String(s)) if spec.kind.is_text() => Value::String(s.clone()),
        _ => Value::Null,
    }
}

/// A builder for performing field checks with error collection.
///
/// Every check runs; the first failure per key is kept.
///
/// # Example
///
/// ```
/// use op_forms::ValidationBuilder;
/// use serde_json::json;
///
/// let result = ValidationBuilder::new()
///     .require("name", "Connector Name", Some(&json!("SAP Production")))
///     .require("host", "Host", Some(&json!("")))
///     .finish();
///
/// let errors = result.unwrap_err();
/// assert_eq!(errors.message("host").as_deref(), Some("Host is required"));
/// ```
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    errors: Vec<FieldError>,
}

impl ValidationBuilder {
    /// Create a new validation builder.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record an error unless its key already has one.
    pub fn push(&mut self, error: FieldError) {
        if !self.errors.iter().any(|e| e.key == error.key) {
            self.errors.push(error);
        }
    }

    /// Add a validation check.
    ///
    /// The closure should return `Ok(())` if validation passes,
    /// or `Err(FieldError)` if it fails.
    #[must_use]
    pub fn validate<F>(mut self, check: F) -> Self
    where
        F: FnOnce() -> Result<(), FieldError>,
    {
        if let Err(e) = check() {
            self.push(e);
        }
        self
    }

    /// Validate that a value is answered.
    #[must_use]
    pub fn require(mut self, key: &str, label: &str, value: Option<&Value>) -> Self {
        if is_blank(value) {
            self.push(FieldError::required(key, label));
        }
        self
    }

    /// Check if any errors have been collected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of errors collected.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Finish validation and return result.
    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(FieldErrors::from_vec(self.errors))
        }
    }
}

/// Check a persisted configuration map against a descriptor.
///
/// Keys the schema does not declare and unanswered required keys are errors;
/// values of answered keys must also satisfy their field's kind.
pub fn validate_config(descriptor: &TypeDescriptor, config: &ConfigMap) -> Result<(), FieldErrors> {
    let mut builder = ValidationBuilder::new();

    for field in &descriptor.fields {
        let value = config.get(&field.key);
        if is_blank(value) {
            if field.required {
                builder.push(FieldError::required(&field.key, &field.label));
            }
        } else if let Some(value) = value {
            if let Err(e) = normalize(field, value) {
                builder.push(e);
            }
        }
    }

    for key in config.keys() {
        if descriptor.field(key).is_none() {
            builder.push(FieldError::unexpected_key(key));
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldErrorKind;
    use op_schema::SchemaRegistry;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(None, true ; "unset")]
    #[test_case(Some(json!(null)), true ; "null")]
    #[test_case(Some(json!("")), true ; "empty string")]
    #[test_case(Some(json!("   ")), true ; "whitespace")]
    #[test_case(Some(json!("x")), false ; "text")]
    #[test_case(Some(json!(0)), false ; "zero")]
    #[test_case(Some(json!(false)), false ; "false")]
    fn test_is_blank(value: Option<Value>, expected: bool) {
        assert_eq!(is_blank(value.as_ref()), expected);
    }

    #[test_case("5432", Some(json!(5432)) ; "integer")]
    #[test_case(" 22 ", Some(json!(22)) ; "padded")]
    #[test_case("-1", Some(json!(-1)) ; "negative")]
    #[test_case("2.5", Some(json!(2.5)) ; "float")]
    #[test_case("1e3", Some(json!(1000.0)) ; "exponent")]
    #[test_case("18446744073709551615", Some(json!(u64::MAX)) ; "beyond i64")]
    #[test_case("-9223372036854775808", Some(json!(i64::MIN)) ; "i64 minimum")]
    #[test_case("NaN", None ; "nan")]
    #[test_case("inf", None ; "infinity")]
    #[test_case("ssh", None ; "word")]
    fn test_parse_number(raw: &str, expected: Option<Value>) {
        assert_eq!(parse_number(raw).map(Value::Number), expected);
    }

    #[test]
    fn test_normalize_number() {
        let spec = FieldSpec::number("port", "Port");
        assert_eq!(normalize(&spec, &json!("5432")).unwrap(), json!(5432));
        assert_eq!(normalize(&spec, &json!(5432)).unwrap(), json!(5432));
        assert_eq!(
            normalize(&spec, &json!("five")).unwrap_err().kind,
            FieldErrorKind::NotANumber
        );
        assert!(normalize(&spec, &json!(true)).is_err());
    }

    #[test]
    fn test_normalize_select() {
        let spec = FieldSpec::select("db_type", "Type", ["PostgreSQL", "MySQL"]);
        assert_eq!(normalize(&spec, &json!("MySQL")).unwrap(), json!("MySQL"));
        assert!(normalize(&spec, &json!("mysql")).is_err());
        assert!(normalize(&spec, &json!(1)).is_err());
    }

    #[test]
    fn test_normalize_text_keeps_value() {
        let spec = FieldSpec::string("ssl", "Use SSL");
        assert_eq!(normalize(&spec, &json!(false)).unwrap(), json!(false));
        assert_eq!(normalize(&spec, &json!(" a b ")).unwrap(), json!(" a b "));
    }

    #[test]
    fn test_unanswered_markers() {
        let text = FieldSpec::string("region", "Region");
        let number = FieldSpec::number("port", "Port");

        assert_eq!(unanswered(&text, Some(&json!(""))), json!(""));
        assert_eq!(unanswered(&text, None), Value::Null);
        assert_eq!(unanswered(&number, Some(&json!(""))), Value::Null);
    }

    #[test]
    fn test_builder_keeps_first_error_per_key() {
        let result = ValidationBuilder::new()
            .require("port", "Port", None)
            .validate(|| Err(FieldError::not_a_number("port", "Port")))
            .finish();

        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get("port").unwrap().is_required_error());
    }

    #[test]
    fn test_builder_all_pass() {
        let builder = ValidationBuilder::new()
            .require("name", "Connector Name", Some(&json!("x")))
            .validate(|| Ok(()));

        assert!(!builder.has_errors());
        assert_eq!(builder.error_count(), 0);
        assert!(builder.finish().is_ok());
    }

    #[test]
    fn test_validate_config_accepts_complete_map() {
        let registry = SchemaRegistry::builtin();
        let aws = registry.lookup("aws_s3").unwrap();
        let config = json!({
            "access_key_id": "AKIA",
            "secret_access_key": "s3cr3t",
            "region": null
        });

        assert!(validate_config(aws, config.as_object().unwrap()).is_ok());
    }

    #[test]
    fn test_validate_config_reports_extra_and_missing() {
        let registry = SchemaRegistry::builtin();
        let aws = registry.lookup("aws_s3").unwrap();
        let config = json!({
            "access_key_id": "AKIA",
            "bucket": "reports"
        });

        let errors = validate_config(aws, config.as_object().unwrap()).unwrap_err();
        assert_eq!(errors.keys().collect::<Vec<_>>(), ["secret_access_key", "bucket"]);
        assert_eq!(errors.get("bucket").unwrap().kind, FieldErrorKind::UnexpectedKey);
    }

    #[test]
    fn test_validate_config_checks_kinds() {
        let registry = SchemaRegistry::builtin();
        let email = registry.lookup("email").unwrap();
        let config = json!({
            "host": "smtp.example.com",
            "port": "twenty-five",
            "username": "ops",
            "password": "pw"
        });

        let errors = validate_config(email, config.as_object().unwrap()).unwrap_err();
        assert_eq!(errors.message("port").as_deref(), Some("Port must be a number"));
    }
}

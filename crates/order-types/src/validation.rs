//! Configuration validation utilities.
//!
//! Schemas check the TOML tables handed to pluggable implementations before
//! those implementations are constructed. Every field is optional; a present
//! field must have the declared type and stay within its bounds.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// Error that occurs when a field has an invalid value.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// Error that occurs when field type is incorrect.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

/// Represents the type of a configuration field.
#[derive(Debug)]
pub enum FieldType {
	/// An integer value with optional minimum and maximum bounds.
	Integer {
		/// Minimum allowed value (inclusive).
		min: Option<i64>,
		/// Maximum allowed value (inclusive).
		max: Option<i64>,
	},
}

/// A named field in a configuration schema.
#[derive(Debug)]
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
}

impl Field {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
		}
	}
}

/// Defines a validation schema for TOML configuration.
#[derive(Debug)]
pub struct Schema {
	pub fields: Vec<Field>,
}

impl Schema {
	pub fn new(fields: Vec<Field>) -> Self {
		Self { fields }
	}

	/// Validates a TOML value against this schema.
	///
	/// The value must be a table. Absent fields are accepted.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.fields {
			if let Some(value) = table.get(&field.name) {
				validate_field_type(&field.name, value, &field.field_type)?;
			}
		}

		Ok(())
	}
}

/// Validates that a value matches the expected field type, checking integer
/// bounds.
fn validate_field_type(
	field_name: &str,
	value: &toml::Value,
	expected_type: &FieldType,
) -> Result<(), ValidationError> {
	match expected_type {
		FieldType::Integer { min, max } => {
			let int_val = value
				.as_integer()
				.ok_or_else(|| ValidationError::TypeMismatch {
					field: field_name.to_string(),
					expected: "integer".to_string(),
					actual: value.type_str().to_string(),
				})?;

			if let Some(min_val) = min.filter(|min_val| int_val < *min_val) {
				return Err(ValidationError::InvalidValue {
					field: field_name.to_string(),
					message: format!("Value {} is less than minimum {}", int_val, min_val),
				});
			}
			if let Some(max_val) = max.filter(|max_val| int_val > *max_val) {
				return Err(ValidationError::InvalidValue {
					field: field_name.to_string(),
					message: format!("Value {} is greater than maximum {}", int_val, max_val),
				});
			}
		},
	}

	Ok(())
}

/// Trait defining a configuration schema that can validate TOML values.
///
/// Each pluggable implementation exposes one so its configuration table can
/// be checked before the implementation is constructed.
pub trait ConfigSchema: Send + Sync {
	/// Validates a TOML configuration value against this schema.
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn capacity_schema() -> Schema {
		Schema::new(vec![Field::new(
			"capacity",
			FieldType::Integer {
				min: Some(0),
				max: Some(10),
			},
		)])
	}

	fn table(source: &str) -> toml::Value {
		toml::Value::Table(toml::from_str(source).unwrap())
	}

	#[test]
	fn test_integer_bounds() {
		let too_big = capacity_schema().validate(&table("capacity = 12")).unwrap_err();
		assert!(too_big.to_string().contains("greater than maximum 10"));

		let negative = capacity_schema().validate(&table("capacity = -1")).unwrap_err();
		assert!(negative.to_string().contains("less than minimum 0"));

		assert!(capacity_schema().validate(&table("capacity = 0")).is_ok());
		assert!(capacity_schema().validate(&table("capacity = 10")).is_ok());
	}

	#[test]
	fn test_type_mismatch() {
		let err = capacity_schema()
			.validate(&table("capacity = \"many\""))
			.unwrap_err();
		assert!(matches!(
			err,
			ValidationError::TypeMismatch { ref field, ref actual, .. }
				if field == "capacity" && actual == "string"
		));
	}

	#[test]
	fn test_absent_field_accepted() {
		assert!(capacity_schema().validate(&table("")).is_ok());
		assert!(capacity_schema().validate(&table("other = true")).is_ok());
	}

	#[test]
	fn test_non_table_rejected() {
		let err = capacity_schema()
			.validate(&toml::Value::Integer(3))
			.unwrap_err();
		assert!(matches!(err, ValidationError::TypeMismatch { ref field, .. } if field == "root"));
	}
}

//! Input validation for write endpoints. Rejects bad data before it
//! reaches the database.

use crate::errors::AppError;

const MAX_FIELD_LEN: usize = 120;

pub fn ensure_max_len(value: &str, max: usize) -> bool {
    value.len() <= max
}

fn validate_label(field: &str, value: &str) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} must not be empty", field)));
    }
    if !ensure_max_len(trimmed, MAX_FIELD_LEN) {
        return Err(AppError::InvalidInput(format!(
            "{} must be at most {} bytes",
            field, MAX_FIELD_LEN
        )));
    }
    // Any printable text is a valid name; HTML escaping happens at render time.
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(AppError::InvalidInput(format!(
            "{} must not contain control characters",
            field
        )));
    }
    Ok(())
}

pub fn validate_animal(name: &str, species: &str, age: i32) -> Result<(), AppError> {
    validate_label("name", name)?;
    validate_label("species", species)?;
    if age < 0 {
        return Err(AppError::InvalidInput(
            "age must be a non-negative integer".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_animals() {
        assert!(validate_animal("Larry", "Leopard", 5).is_ok());
        assert!(validate_animal("Mrs. O'Leary", "Hell-Hound", 0).is_ok());
    }

    #[test]
    fn accepts_unicode_names() {
        assert!(validate_animal("Žofka", "Léopard", 2).is_ok());
        assert!(validate_animal("大きな虎", "トラ", 6).is_ok());
    }

    #[test]
    fn rejects_negative_age() {
        assert!(validate_animal("Larry", "Leopard", -1).is_err());
    }

    #[test]
    fn rejects_empty_and_oversized_fields() {
        assert!(validate_animal("", "Leopard", 5).is_err());
        assert!(validate_animal("Larry", "   ", 5).is_err());
        let long = "x".repeat(MAX_FIELD_LEN + 1);
        assert!(validate_animal(&long, "Leopard", 5).is_err());
    }

    #[test]
    fn rejects_control_characters() {
        assert!(validate_animal("Lar\nry", "Leopard", 5).is_err());
        assert!(validate_animal("Larry", "Leo\u{0}pard", 5).is_err());
    }
}

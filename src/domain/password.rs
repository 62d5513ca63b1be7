use validator::ValidationError;
use zxcvbn::zxcvbn;

use crate::domain::validation::new_validation_error;

const MIN_LENGTH: usize = 8;
const MIN_STRENGTH_SCORE: u8 = 3;
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:,.?/~";

/// Length, character-class and zxcvbn strength checks for new passwords.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_LENGTH {
        return Err(new_validation_error(
            "password_length",
            &format!("Must be at least {} characters", MIN_LENGTH),
        ));
    }

    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| SYMBOLS.contains(c));

    if !(has_upper && has_digit && has_symbol) {
        return Err(new_validation_error(
            "password_complexity",
            "Must include uppercase, number, and symbol",
        ));
    }

    let estimate = zxcvbn(password, &[]);
    let score = estimate.score() as u8;

    if score < MIN_STRENGTH_SCORE {
        let feedback = estimate.feedback()
            .and_then(|f| f.warning().map(|w| w.to_string()))
            .unwrap_or_else(|| "Password is too weak".to_string());

        return Err(new_validation_error("password_strength", &feedback));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_fail() {
        let err = validate_password_strength("Ab1!").unwrap_err();
        assert_eq!(err.code, "password_length");
    }

    #[test]
    fn missing_character_classes_fail() {
        let err = validate_password_strength("alllowercase1!").unwrap_err();
        assert_eq!(err.code, "password_complexity");
    }

    #[test]
    fn predictable_passwords_fail_strength_check() {
        let err = validate_password_strength("Password1!").unwrap_err();
        assert_eq!(err.code, "password_strength");
    }

    #[test]
    fn strong_passwords_pass() {
        assert!(validate_password_strength("Gebeta#Lalibela42Tej").is_ok());
    }
}

use validator::ValidationError;

/// Password strength rule: at least 8 characters containing a lowercase
/// letter, an uppercase letter, a digit and a symbol. All four classes are
/// mandatory. Underscore counts as a symbol.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= 8;
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_alphanumeric());

    if long_enough && has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        let mut error = ValidationError::new("password_strength");
        error.message = Some(
            "Contraseña débil. Debe tener mínimo 8 caracteres, mayúscula, minúscula, número y símbolo."
                .into(),
        );
        Err(error)
    }
}

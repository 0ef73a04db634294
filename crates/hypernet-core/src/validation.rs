// Client-side contact form checks, run before anything touches the network
use crate::models::ContactForm;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Loose `local@domain.tld` shape - no whitespace, exactly one `@`, a dot after it
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Why a form was rejected; the `Display` text is what the user sees
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields.")]
    MissingFields { fields: Vec<&'static str> },

    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check required fields first, then the email shape
pub fn validate(form: &ContactForm) -> Result<(), ValidationError> {
    let required = [
        ("name", &form.name),
        ("email", &form.email),
        ("interest", &form.interest),
        ("message", &form.message),
    ];

    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingFields { fields: missing });
    }

    if !is_valid_email(form.email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            name: "Jo".into(),
            email: "jo@x.com".into(),
            interest: "demo".into(),
            message: "hi".into(),
            newsletter: false,
        }
    }

    #[test]
    fn test_complete_form_passes() {
        assert_eq!(validate(&filled()), Ok(()));
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        let blank: [fn(&mut ContactForm); 4] = [
            |f| f.name.clear(),
            |f| f.email = "   ".into(),
            |f| f.interest.clear(),
            |f| f.message = "\n\t".into(),
        ];

        for (blanker, field) in blank.iter().zip(["name", "email", "interest", "message"]) {
            let mut form = filled();
            blanker(&mut form);
            assert_eq!(
                validate(&form),
                Err(ValidationError::MissingFields { fields: vec![field] })
            );
        }
    }

    #[test]
    fn test_missing_fields_beat_bad_email() {
        let form = ContactForm {
            email: "nope".into(),
            ..Default::default()
        };
        let err = validate(&form).unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all required fields.");
    }

    #[test]
    fn test_email_shapes() {
        for good in ["jo@x.com", "a.b+c@sub.example.org", "x@y.z"] {
            assert!(is_valid_email(good), "{} should pass", good);
        }
        for bad in ["jo", "jo@x", "@x.com", "jo@.com", "jo @x.com", "jo@x.com ", "a@b@c.d", ""] {
            assert!(!is_valid_email(bad), "{} should fail", bad);
        }
    }

    #[test]
    fn test_invalid_email_message() {
        let form = ContactForm {
            email: "jo@x".into(),
            ..filled()
        };
        assert_eq!(validate(&form), Err(ValidationError::InvalidEmail));
        assert_eq!(
            ValidationError::InvalidEmail.to_string(),
            "Please enter a valid email address."
        );
    }
}

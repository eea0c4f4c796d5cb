use std::fmt;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::{AccountError, AccountResult};

/// Field order used to pick the reported error when several fail.
const FIELDS: [&str; 3] = ["username", "email", "display_name"];

/// Transfer representation of an account as submitted by a client.
///
/// Every field is optional so the same shape serves creation and partial
/// updates. Secrets live here only in transit and are never written back
/// out.
#[derive(Clone, Default, PartialEq, Eq, Validate)]
pub struct AccountView {
    #[validate(
        length(max = 100, message = "must be at most 100 characters"),
        custom(function = "printable", message = "must contain only printable characters")
    )]
    pub username: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    pub password: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub display_name: Option<String>,
    /// Old secret, required by self-update when `password` is set.
    pub current_password: Option<String>,
}

fn printable(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c == ' ' || c.is_ascii_graphic()) {
        Ok(())
    } else {
        Err(ValidationError::new("printable"))
    }
}

impl AccountView {
    /// Structural validation of the fields present.
    ///
    /// With `is_update == false`, username and email are required. With
    /// `is_update == true`, absent or empty fields mean "no change". The
    /// password is never checked here.
    pub fn valid(&self, is_update: bool) -> AccountResult<()> {
        if !is_update {
            if non_empty(&self.username).is_none() {
                return Err(AccountError::field_required("username"));
            }
            if non_empty(&self.email).is_none() {
                return Err(AccountError::field_required("email"));
            }
        }

        // Empty means "no change" and is not run through the rules
        let present = Self {
            username: non_empty(&self.username).map(str::to_owned),
            email: non_empty(&self.email).map(str::to_owned),
            display_name: self.display_name.clone(),
            ..Self::default()
        };
        present.validate().map_err(first_violation)
    }

    /// The new secret, if one was actually supplied.
    pub fn new_password(&self) -> Option<&str> {
        non_empty(&self.password)
    }
}

fn first_violation(errors: ValidationErrors) -> AccountError {
    let by_field = errors.field_errors();
    for field in FIELDS {
        if let Some(error) = by_field.get(field).and_then(|errs| errs.first()) {
            let reason = error
                .message
                .as_deref()
                .unwrap_or("is invalid")
                .to_string();
            return AccountError::validation(field, reason);
        }
    }
    AccountError::validation("view", errors.to_string())
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

impl fmt::Debug for AccountView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountView")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("display_name", &self.display_name)
            .field(
                "current_password",
                &self.current_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> AccountView {
        AccountView {
            username: Some("alice".into()),
            email: Some("alice@example.com".into()),
            password: Some("s3cret".into()),
            ..Default::default()
        }
    }

    fn field_of(err: AccountError) -> &'static str {
        match err {
            AccountError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn complete_view_is_valid_for_create() {
        assert!(full().valid(false).is_ok());
    }

    #[test]
    fn create_requires_username() {
        let view = AccountView {
            username: None,
            ..full()
        };
        assert_eq!(field_of(view.valid(false).unwrap_err()), "username");
    }

    #[test]
    fn create_requires_email() {
        let view = AccountView {
            email: Some(String::new()),
            ..full()
        };
        assert_eq!(field_of(view.valid(false).unwrap_err()), "email");
    }

    #[test]
    fn update_allows_empty_view() {
        assert!(AccountView::default().valid(true).is_ok());
    }

    #[test]
    fn malformed_email_rejected_in_both_modes() {
        let view = AccountView {
            email: Some("not-an-email".into()),
            ..full()
        };
        assert_eq!(field_of(view.clone().valid(false).unwrap_err()), "email");
        assert_eq!(field_of(view.valid(true).unwrap_err()), "email");
    }

    #[test]
    fn username_must_be_printable() {
        let view = AccountView {
            username: Some("ali\tce".into()),
            ..full()
        };
        assert_eq!(field_of(view.valid(true).unwrap_err()), "username");
    }

    #[test]
    fn overlong_username_rejected() {
        let view = AccountView {
            username: Some("a".repeat(101)),
            ..full()
        };
        assert_eq!(field_of(view.valid(false).unwrap_err()), "username");
    }

    #[test]
    fn overlong_display_name_rejected() {
        let view = AccountView {
            display_name: Some("x".repeat(101)),
            ..Default::default()
        };
        assert_eq!(
            view.valid(true).unwrap_err(),
            AccountError::validation("display_name", "must be at most 100 characters")
        );
    }

    #[test]
    fn empty_fields_on_update_are_not_validated() {
        let view = AccountView {
            username: Some(String::new()),
            email: Some(String::new()),
            ..Default::default()
        };
        assert!(view.valid(true).is_ok());
    }

    #[test]
    fn reported_field_follows_declaration_order() {
        let view = AccountView {
            username: Some("bad\u{7}name".into()),
            email: Some("nope".into()),
            ..Default::default()
        };
        assert_eq!(
            view.valid(true).unwrap_err(),
            AccountError::validation("username", "must contain only printable characters")
        );
    }

    #[test]
    fn password_is_not_checked_here() {
        let view = AccountView {
            password: None,
            ..full()
        };
        assert!(view.valid(false).is_ok());
    }

    #[test]
    fn empty_password_is_no_new_password() {
        let view = AccountView {
            password: Some(String::new()),
            ..full()
        };
        assert_eq!(view.new_password(), None);
        assert_eq!(full().new_password(), Some("s3cret"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", full());
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}

//! Classification of mutation results for user-facing reporting.
//!
//! Business endpoints report failures as status codes, not exceptions.
//! Each mutating call collapses its response into one [`Outcome`]; the UI
//! raises exactly one feedback request from it (success or error), so no
//! action's result goes unreported.

/// Classified result of a mutating API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx.
    Success { code: u16 },
    /// 422, optionally with the server's field-specific detail.
    ValidationError { code: u16, detail: Option<String> },
    /// 409, e.g. duplicate email or phone.
    Conflict { code: u16 },
    /// 404.
    NotFound { code: u16 },
    /// 5xx, and any status outside the classes above.
    ServerError { code: u16 },
}

impl Outcome {
    /// Maps an HTTP status (plus optional error detail) to an outcome.
    pub fn classify(code: u16, detail: Option<String>) -> Self {
        match code {
            200..=299 => Outcome::Success { code },
            422 => Outcome::ValidationError { code, detail },
            409 => Outcome::Conflict { code },
            404 => Outcome::NotFound { code },
            _ => Outcome::ServerError { code },
        }
    }

    /// The numeric status code, displayed alongside the message for
    /// support purposes.
    pub fn code(&self) -> u16 {
        match self {
            Outcome::Success { code }
            | Outcome::ValidationError { code, .. }
            | Outcome::Conflict { code }
            | Outcome::NotFound { code }
            | Outcome::ServerError { code } => *code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Human-readable message for the feedback modal.
    pub fn message(&self) -> String {
        match self {
            Outcome::Success { code: 201 } => "Created.".to_string(),
            Outcome::Success { .. } => "Saved.".to_string(),
            Outcome::ValidationError {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Outcome::ValidationError { detail: None, .. } => {
                "The submitted fields were rejected by the server.".to_string()
            }
            Outcome::Conflict { .. } => {
                "A record with these details already exists.".to_string()
            }
            Outcome::NotFound { .. } => "The record no longer exists.".to_string(),
            Outcome::ServerError { .. } => {
                "The server could not process the request.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Outcome::classify(200, None).is_success());
        assert!(Outcome::classify(201, None).is_success());
        assert_eq!(
            Outcome::classify(422, None),
            Outcome::ValidationError {
                code: 422,
                detail: None
            }
        );
        assert_eq!(Outcome::classify(409, None), Outcome::Conflict { code: 409 });
        assert_eq!(Outcome::classify(404, None), Outcome::NotFound { code: 404 });
        assert_eq!(
            Outcome::classify(500, None),
            Outcome::ServerError { code: 500 }
        );
        // Unclassified 4xx folds into the server-error bucket.
        assert_eq!(
            Outcome::classify(418, None),
            Outcome::ServerError { code: 418 }
        );
    }

    #[test]
    fn test_code_preserved_for_display() {
        assert_eq!(Outcome::classify(503, None).code(), 503);
        assert_eq!(Outcome::classify(201, None).code(), 201);
    }

    #[test]
    fn test_validation_detail_wins_over_generic_message() {
        let outcome = Outcome::classify(422, Some("phone: invalid format".to_string()));
        assert_eq!(outcome.message(), "phone: invalid format");

        let generic = Outcome::classify(422, None);
        assert!(generic.message().contains("rejected"));
    }
}

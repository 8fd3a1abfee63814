use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const KEYWORDS_REQUIRED: &str = "Please enter keywords to search.";

/// Search form input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchForm {
    #[validate(
        length(min = 1, message = "Please enter keywords to search."),
        custom(function = "not_blank")
    )]
    #[serde(default)]
    pub keywords: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed(KEYWORDS_REQUIRED)));
    }
    Ok(())
}

/// A search keyword that passed form validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchKeyword(String);

impl SearchKeyword {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct KeywordError {
    pub message: String,
}

impl SearchForm {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self { keywords: keywords.into() }
    }

    /// Validate the form, yielding the keyword or the message to show next
    /// to the search field.
    pub fn keyword(self) -> Result<SearchKeyword, KeywordError> {
        match self.validate() {
            Ok(()) => Ok(SearchKeyword(self.keywords)),
            Err(errors) => {
                let message = errors
                    .field_errors()
                    .get("keywords")
                    .and_then(|errs| errs.iter().find_map(|e| e.message.clone()))
                    .map(|m| m.into_owned())
                    .unwrap_or_else(|| KEYWORDS_REQUIRED.to_string());
                Err(KeywordError { message })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_rejected() {
        let err = SearchForm::new("   ").keyword().unwrap_err();
        assert_eq!(err.message, KEYWORDS_REQUIRED);
    }

    #[test]
    fn test_empty_rejected() {
        let err = SearchForm::new("").keyword().unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_keyword_accepted_verbatim() {
        let keyword = SearchForm::new("batman").keyword().unwrap();
        assert_eq!(keyword.as_str(), "batman");

        let keyword = SearchForm::new(" the dark knight ").keyword().unwrap();
        assert_eq!(keyword.as_str(), " the dark knight ");
    }
}

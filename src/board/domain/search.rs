//! Case-insensitive substring search over card fields.

use super::{BoardDomainError, Card, ParseSearchFieldError};
use serde::{Deserialize, Serialize};

/// Number of results returned when the caller sets no limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// A card field that can be searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    /// Card title.
    Title,
    /// Card description.
    Description,
    /// External link identifier.
    ExternalId,
}

impl SearchField {
    /// Fields searched when the caller names none.
    pub const DEFAULTS: [Self; 2] = [Self::Title, Self::Description];

    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::ExternalId => "external_id",
        }
    }

    fn haystack(self, card: &Card) -> Option<&str> {
        match self {
            Self::Title => Some(card.fields().title()),
            Self::Description => Some(card.fields().description()),
            Self::ExternalId => card.external_link().map(|link| link.external_id()),
        }
    }
}

impl TryFrom<&str> for SearchField {
    type Error = ParseSearchFieldError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "title" => Ok(Self::Title),
            "description" | "body" => Ok(Self::Description),
            "external_id" => Ok(Self::ExternalId),
            _ => Err(ParseSearchFieldError(value.to_owned())),
        }
    }
}

/// Validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
    fields: Vec<SearchField>,
    limit: usize,
}

impl SearchQuery {
    /// Creates a query over the default fields.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::BlankSearchQuery`] when `query` is blank.
    /// Surrounding whitespace in a non-blank query is part of the needle.
    pub fn new(query: &str) -> Result<Self, BoardDomainError> {
        if query.trim().is_empty() {
            return Err(BoardDomainError::BlankSearchQuery);
        }
        Ok(Self {
            needle: query.to_lowercase(),
            fields: SearchField::DEFAULTS.to_vec(),
            limit: DEFAULT_SEARCH_LIMIT,
        })
    }

    /// Restricts the search to the named fields.
    ///
    /// An empty list keeps the defaults. Duplicates are collapsed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownSearchField`] for an unknown name.
    pub fn with_field_names<S: AsRef<str>>(
        mut self,
        names: &[S],
    ) -> Result<Self, BoardDomainError> {
        if names.is_empty() {
            return Ok(self);
        }
        let mut fields = Vec::with_capacity(names.len());
        for name in names {
            let field = SearchField::try_from(name.as_ref())?;
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        self.fields = fields;
        Ok(self)
    }

    /// Caps the number of results.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidSearchLimit`] unless `limit >= 1`.
    pub fn with_limit(mut self, limit: i64) -> Result<Self, BoardDomainError> {
        self.limit = usize::try_from(limit)
            .ok()
            .filter(|value| *value > 0)
            .ok_or(BoardDomainError::InvalidSearchLimit(limit))?;
        Ok(self)
    }

    /// Returns the lowercased needle.
    #[must_use]
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Returns the searched fields.
    #[must_use]
    pub fn fields(&self) -> &[SearchField] {
        &self.fields
    }

    /// Returns the result cap.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns whether any selected field of `card` contains the needle.
    #[must_use]
    pub fn matches(&self, card: &Card) -> bool {
        self.fields.iter().any(|field| {
            field
                .haystack(card)
                .is_some_and(|text| text.to_lowercase().contains(&self.needle))
        })
    }
}

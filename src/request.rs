use crate::error::{ErrorCode, GenError, Result};
use std::fmt;

/// Longest username the form will ask for.
pub const MAX_USERNAME_LENGTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Fantasy,
    Futuristic,
    Funny,
}

impl Theme {
    /// Fixed order used when themes are rendered into a prompt.
    pub const ALL: [Theme; 3] = [Theme::Fantasy, Theme::Futuristic, Theme::Funny];

    fn bit(self) -> u8 {
        match self {
            Theme::Fantasy => 0b001,
            Theme::Futuristic => 0b010,
            Theme::Funny => 0b100,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Theme::Fantasy => "fantasy",
            Theme::Futuristic => "futuristic",
            Theme::Funny => "funny",
        };
        f.write_str(name)
    }
}

/// Set of theme flags. Iteration always follows `Theme::ALL`, whatever the insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeSet(u8);

impl ThemeSet {
    #[must_use]
    pub fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn with(mut self, theme: Theme) -> Self {
        self.insert(theme);
        self
    }

    pub fn insert(&mut self, theme: Theme) {
        self.0 |= theme.bit();
    }

    pub fn contains(&self, theme: Theme) -> bool {
        self.0 & theme.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Theme> + '_ {
        Theme::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}

impl FromIterator<Theme> for ThemeSet {
    fn from_iter<I: IntoIterator<Item = Theme>>(iter: I) -> Self {
        let mut set = ThemeSet::empty();
        for theme in iter {
            set.insert(theme);
        }
        set
    }
}

/// Options captured from the form at the moment "Generate" is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    desired_length: usize,
    allow_numbers: bool,
    themes: ThemeSet,
}

impl GenerationRequest {
    pub fn new(desired_length: usize, allow_numbers: bool, themes: ThemeSet) -> Result<Self> {
        if desired_length == 0 {
            return Err(GenError::Validation {
                code: ErrorCode::ValidationFailed,
                message: "Username length must be at least 1".to_string(),
                context: "desired_length".to_string(),
            });
        }
        if desired_length > MAX_USERNAME_LENGTH {
            return Err(GenError::Validation {
                code: ErrorCode::BoundsExceeded,
                message: format!("Username length exceeds max {MAX_USERNAME_LENGTH}"),
                context: format!("desired_length={desired_length}"),
            });
        }
        Ok(Self { desired_length, allow_numbers, themes })
    }

    /// Builds a request from the raw spin-box value, which Slint hands over as `i32`.
    pub fn from_form(length: i32, allow_numbers: bool, themes: ThemeSet) -> Result<Self> {
        let desired_length = usize::try_from(length).map_err(|_| GenError::Validation {
            code: ErrorCode::ValidationFailed,
            message: "Username length must be a positive number".to_string(),
            context: format!("desired_length={length}"),
        })?;
        Self::new(desired_length, allow_numbers, themes)
    }

    pub fn desired_length(&self) -> usize {
        self.desired_length
    }

    pub fn allow_numbers(&self) -> bool {
        self.allow_numbers
    }

    pub fn themes(&self) -> ThemeSet {
        self.themes
    }
}

/// A candidate that passed validation for the request it was generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedUsername(String);

impl AcceptedUsername {
    pub(crate) fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AcceptedUsername {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_set_iterates_in_fixed_order() {
        let set: ThemeSet = [Theme::Funny, Theme::Fantasy].into_iter().collect();
        let order: Vec<Theme> = set.iter().collect();
        assert_eq!(order, vec![Theme::Fantasy, Theme::Funny]);
        assert!(!set.contains(Theme::Futuristic));
    }

    #[test]
    fn rejects_zero_length() {
        let err = GenerationRequest::new(0, false, ThemeSet::empty()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn rejects_oversized_length() {
        let err = GenerationRequest::new(MAX_USERNAME_LENGTH + 1, true, ThemeSet::empty()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::BoundsExceeded);
    }

    #[test]
    fn rejects_negative_form_value() {
        assert!(GenerationRequest::from_form(-3, false, ThemeSet::empty()).is_err());
        let req = GenerationRequest::from_form(8, true, ThemeSet::empty().with(Theme::Funny)).unwrap();
        assert_eq!(req.desired_length(), 8);
        assert!(req.allow_numbers());
        assert!(req.themes().contains(Theme::Funny));
    }
}

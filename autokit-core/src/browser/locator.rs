//! Element locators as `(strategy, value)` pairs

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BrowserError;

/// How a locator value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorStrategy {
    /// CSS selector
    Css,
    /// Element id attribute
    Id,
    /// Element name attribute
    Name,
    /// XPath expression
    XPath,
    /// Exact link text
    LinkText,
    /// Tag name
    TagName,
    /// Single class name
    ClassName,
}

impl LocatorStrategy {
    /// Returns all strategies
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Css,
            Self::Id,
            Self::Name,
            Self::XPath,
            Self::LinkText,
            Self::TagName,
            Self::ClassName,
        ]
    }

    /// Canonical prefix used in `strategy=value` strings
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Id => "id",
            Self::Name => "name",
            Self::XPath => "xpath",
            Self::LinkText => "link_text",
            Self::TagName => "tag_name",
            Self::ClassName => "class_name",
        }
    }
}

impl FromStr for LocatorStrategy {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "css" | "css_selector" => Ok(Self::Css),
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "xpath" => Ok(Self::XPath),
            "link_text" | "link" => Ok(Self::LinkText),
            "tag_name" | "tag" => Ok(Self::TagName),
            "class_name" | "class" => Ok(Self::ClassName),
            other => Err(BrowserError::InvalidLocator(format!(
                "unknown strategy {other:?}"
            ))),
        }
    }
}

/// Element locator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    /// Lookup strategy
    pub strategy: LocatorStrategy,
    /// Strategy-specific value
    pub value: String,
}

/// WebDriver query a locator translates to
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LocatorQuery {
    Css(String),
    Id(String),
    XPath(String),
    LinkText(String),
}

impl LocatorQuery {
    pub(crate) fn as_locator(&self) -> fantoccini::Locator<'_> {
        match self {
            Self::Css(v) => fantoccini::Locator::Css(v),
            Self::Id(v) => fantoccini::Locator::Id(v),
            Self::XPath(v) => fantoccini::Locator::XPath(v),
            Self::LinkText(v) => fantoccini::Locator::LinkText(v),
        }
    }
}

impl Locator {
    /// Creates a locator
    #[must_use]
    pub fn new(strategy: LocatorStrategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Locator by `name` attribute
    #[must_use]
    pub fn by_name(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Name, value)
    }

    /// Locator by XPath
    #[must_use]
    pub fn by_xpath(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::XPath, value)
    }

    /// Locator by CSS selector
    #[must_use]
    pub fn by_css(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Css, value)
    }

    /// Locator by id
    #[must_use]
    pub fn by_id(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Id, value)
    }

    /// WebDriver only knows css, id, xpath and link text; the rest map onto CSS
    pub(crate) fn to_query(&self) -> LocatorQuery {
        match self.strategy {
            LocatorStrategy::Css | LocatorStrategy::TagName => LocatorQuery::Css(self.value.clone()),
            LocatorStrategy::Id => LocatorQuery::Id(self.value.clone()),
            LocatorStrategy::XPath => LocatorQuery::XPath(self.value.clone()),
            LocatorStrategy::LinkText => LocatorQuery::LinkText(self.value.clone()),
            LocatorStrategy::Name => LocatorQuery::Css(format!(
                "[name=\"{}\"]",
                self.value.replace('\\', "\\\\").replace('"', "\\\"")
            )),
            LocatorStrategy::ClassName => {
                LocatorQuery::Css(format!(".{}", css_escape_ident(&self.value)))
            }
        }
    }
}

/// Escapes a value so CSS reads it as one identifier
fn css_escape_ident(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        if i == 0 && c.is_ascii_digit() {
            // leading digits need the hex form
            escaped.push_str(&format!("\\{:x} ", u32::from(c)));
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            escaped.push(c);
        } else {
            escaped.push('\\');
            escaped.push(c);
        }
    }
    escaped
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.strategy.as_str(), self.value)
    }
}

impl FromStr for Locator {
    type Err = BrowserError;

    /// Parses `strategy=value`; only the first `=` separates the two
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (strategy, value) = s.split_once('=').ok_or_else(|| {
            BrowserError::InvalidLocator(format!("expected strategy=value, got {s:?}"))
        })?;
        if value.is_empty() {
            return Err(BrowserError::InvalidLocator(format!("empty value in {s:?}")));
        }
        Ok(Self::new(strategy.parse()?, value))
    }
}

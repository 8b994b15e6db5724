use std::fmt;

/// How an element is looked up, mirroring the lookups the site scripts need
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Id(String),
    ClassName(String),
    Tag(String),
    /// Raw CSS selector, e.g. `#doc_agreement > div:nth-of-type(4) > input`
    Css(String),
}

impl Locator {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn class_name(class: impl Into<String>) -> Self {
        Self::ClassName(class.into())
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// CSS selector equivalent, as consumed by `querySelectorAll`
    pub fn to_css(&self) -> String {
        match self {
            Self::Id(id) => format!("#{id}"),
            Self::ClassName(class) => format!(".{class}"),
            Self::Tag(tag) => tag.clone(),
            Self::Css(selector) => selector.clone(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={id}"),
            Self::ClassName(class) => write!(f, "class={class}"),
            Self::Tag(tag) => write!(f, "tag={tag}"),
            Self::Css(selector) => write!(f, "css={selector}"),
        }
    }
}

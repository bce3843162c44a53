//! # Search query predicates
//!
//! This module contains the leaf conditions of a filter tree, and
//! the [`interpret`] function that turns a single query word into a
//! [`Predicate`].
//!
//! # Fields
//!
//! - `from:`, `to:`, `cc:`, `bcc:`, `subject:`, `body:` search text
//!   in the given field.
//! - `has:attachment` matches emails having attachments.
//! - `is:read`, `is:unread`, `is:flagged` (`is:starred`),
//!   `is:unflagged` (`is:unstarred`), `is:draft` and `is:answered`
//!   test email keywords.
//! - `in:`, `folder:` and `mailbox:` reference a mailbox.
//! - `before:` and `after:` bound the received date.
//!
//! Field names, as well as `is:` and `has:` values, are case
//! insensitive. Other values are kept as is. Anything else is
//! searched as free text.

/// A text field of an email.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum TextField {
    From,
    To,
    Cc,
    Bcc,
    Subject,
    Body,
}

impl TextField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "from" => Some(Self::From),
            "to" => Some(Self::To),
            "cc" => Some(Self::Cc),
            "bcc" => Some(Self::Bcc),
            "subject" => Some(Self::Subject),
            "body" => Some(Self::Body),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::From => "from",
            Self::To => "to",
            Self::Cc => "cc",
            Self::Bcc => "bcc",
            Self::Subject => "subject",
            Self::Body => "body",
        }
    }
}

/// An email keyword, as defined in the JMAP mail specification.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Keyword {
    Seen,
    Flagged,
    Draft,
    Answered,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seen => "$seen",
            Self::Flagged => "$flagged",
            Self::Draft => "$draft",
            Self::Answered => "$answered",
        }
    }
}

/// The side a date bound restricts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum DateBoundKind {
    Before,
    After,
}

/// The leaf condition of a filter tree.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Predicate {
    /// Text searched everywhere.
    FreeText(String),

    /// Text searched in the given field.
    FieldText(TextField, String),

    HasAttachment(bool),

    /// Presence (`true`) or absence (`false`) of a keyword.
    KeywordPresence(Keyword, bool),

    /// Unresolved mailbox name, id or role.
    MailboxRef(String),

    /// Date bound, the date being kept as typed.
    DateBound(DateBoundKind, String),
}

/// Interpret a single query word.
///
/// A word of the form `field:value` with a known field gives the
/// matching predicate. Any other word, including the ones with an
/// unknown field or an unknown `is:`/`has:` value, is searched as
/// free text.
pub fn interpret(word: &str) -> Predicate {
    word.split_once(':')
        .filter(|(field, _)| !field.is_empty())
        .and_then(|(field, value)| interpret_field(&field.to_lowercase(), value))
        .unwrap_or_else(|| Predicate::FreeText(word.to_owned()))
}

fn interpret_field(field: &str, value: &str) -> Option<Predicate> {
    if let Some(field) = TextField::from_name(field) {
        return Some(Predicate::FieldText(field, value.to_owned()));
    }

    match field {
        "has" if value.eq_ignore_ascii_case("attachment") => Some(Predicate::HasAttachment(true)),
        "is" => interpret_is(value),
        "in" | "folder" | "mailbox" => Some(Predicate::MailboxRef(value.to_owned())),
        "before" => Some(Predicate::DateBound(DateBoundKind::Before, value.to_owned())),
        "after" => Some(Predicate::DateBound(DateBoundKind::After, value.to_owned())),
        _ => None,
    }
}

fn interpret_is(value: &str) -> Option<Predicate> {
    let (keyword, present) = match value.to_lowercase().as_str() {
        "read" => (Keyword::Seen, true),
        "unread" => (Keyword::Seen, false),
        "flagged" | "starred" => (Keyword::Flagged, true),
        "unflagged" | "unstarred" => (Keyword::Flagged, false),
        "draft" => (Keyword::Draft, true),
        "answered" => (Keyword::Answered, true),
        _ => return None,
    };

    Some(Predicate::KeywordPresence(keyword, present))
}

use std::fmt::{self, Debug, Display, Formatter};

use crate::{escape_segment, JsonPointer};

pub trait ToJsonPointerRef {
    fn to_json_pointer_ref(&self) -> JsonPointerRef<'_>;
}

/// A borrowed pointer made of a `base` (usually a scope prefix) followed by
/// the tokens of `rest`.
#[derive(Copy, Clone)]
pub struct JsonPointerRef<'a> {
    pub(crate) base: &'a [String],
    pub(crate) rest: &'a [String],
}

impl<'a> ToJsonPointerRef for JsonPointerRef<'a> {
    fn to_json_pointer_ref(&self) -> JsonPointerRef<'a> {
        *self
    }
}

impl PartialEq<JsonPointer> for JsonPointerRef<'_> {
    fn eq(&self, other: &JsonPointer) -> bool {
        self.iter().eq(other.0.iter())
    }
}

impl PartialEq for JsonPointerRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for JsonPointerRef<'_> {}

impl Display for JsonPointerRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|token| {
            f.write_str("/")?;
            f.write_str(&escape_segment(token))
        })
    }
}

impl Debug for JsonPointerRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl<'a> JsonPointerRef<'a> {
    pub fn to_owned(&self) -> JsonPointer {
        JsonPointer(self.iter().cloned().collect())
    }

    /// Splits off the last token, returning the parent pointer and the token.
    /// `None` for the root pointer.
    pub fn split_last(&self) -> Option<(JsonPointerRef<'a>, &'a str)> {
        match self.rest.split_last() {
            Some((token, rest)) => Some((
                JsonPointerRef {
                    base: self.base,
                    rest,
                },
                token.as_str(),
            )),
            None => self.base.split_last().map(|(token, base)| {
                (
                    JsonPointerRef { base, rest: &[] },
                    token.as_str(),
                )
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a String> {
        self.base.iter().chain(self.rest.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.rest.is_empty()
    }

    pub fn len(&self) -> usize {
        self.base.len() + self.rest.len()
    }

    pub fn starts_with(&self, other: JsonPointerRef<'_>) -> bool {
        other.len() <= self.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }

    /// Whether `self` addresses a location strictly inside `ancestor`.
    pub fn is_descendant_of(&self, ancestor: JsonPointerRef<'_>) -> bool {
        self.len() > ancestor.len() && self.starts_with(ancestor)
    }
}

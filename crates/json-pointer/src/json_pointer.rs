use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

use crate::{parser::parse_json_pointer, JsonPointerRef, ParseJsonPointerError, ToJsonPointerRef};

/// An owned RFC 6901 pointer, stored as unescaped reference tokens.
#[derive(Clone, Default, Eq)]
pub struct JsonPointer(pub(crate) Vec<String>);

impl ToJsonPointerRef for JsonPointer {
    fn to_json_pointer_ref(&self) -> JsonPointerRef<'_> {
        self.as_ref()
    }
}

impl<'a> ToJsonPointerRef for &'a JsonPointer {
    fn to_json_pointer_ref(&self) -> JsonPointerRef<'a> {
        self.as_ref()
    }
}

impl PartialEq<JsonPointerRef<'_>> for JsonPointer {
    fn eq(&self, other: &JsonPointerRef<'_>) -> bool {
        self.0.iter().eq(other.iter())
    }
}

impl PartialEq for JsonPointer {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}

impl Display for JsonPointer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.as_ref(), f)
    }
}

impl Debug for JsonPointer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for JsonPointer {
    type Err = ParseJsonPointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_json_pointer(s).map(Self)
    }
}

impl<S: Into<String>> FromIterator<S> for JsonPointer {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl Serialize for JsonPointer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JsonPointer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        parse_json_pointer(&String::deserialize(deserializer)?)
            .map(Self)
            .map_err(|err| D::Error::custom(err.to_string()))
    }
}

impl JsonPointer {
    #[inline]
    pub fn root() -> JsonPointer {
        JsonPointer(Vec::new())
    }

    #[inline]
    pub fn as_ref(&self) -> JsonPointerRef<'_> {
        JsonPointerRef {
            base: &[],
            rest: &self.0,
        }
    }

    #[inline]
    pub fn with_prefix_opt<'a>(&'a self, prefix: Option<&'a JsonPointer>) -> JsonPointerRef<'a> {
        JsonPointerRef {
            base: prefix.map(|prefix| prefix.0.as_slice()).unwrap_or_default(),
            rest: &self.0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Appends an unescaped reference token.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    pub fn push_index(&mut self, index: usize) {
        self.0.push(index.to_string());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    #[must_use]
    pub fn join(&self, segment: impl Into<String>) -> JsonPointer {
        let mut pointer = self.clone();
        pointer.push(segment);
        pointer
    }
}

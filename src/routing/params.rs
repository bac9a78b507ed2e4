//! Typed access to captured path parameters.
//!
//! Captures are always strings; the character classes in the patterns
//! constrain their shape, and these helpers coerce them for handlers.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::routing::router::RouteMatch;

/// Errors raised while coercing a captured parameter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("parameter '{0}' is absent")]
    Missing(String),

    #[error("parameter '{name}' has invalid value '{value}'")]
    Invalid { name: String, value: String },
}

/// An `obj_type` value other than `roi` or `shape`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown object type '{0}'")]
pub struct UnknownObjectType(pub String);

/// Kind of object addressed by the `obj_type` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Roi,
    Shape,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Roi => "roi",
            ObjectType::Shape => "shape",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = UnknownObjectType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "roi" => Ok(ObjectType::Roi),
            "shape" => Ok(ObjectType::Shape),
            other => Err(UnknownObjectType(other.to_string())),
        }
    }
}

/// A plane index with an optional inclusive upper bound.
///
/// `end == None` means no upper bound was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaneRange<T> {
    pub start: T,
    pub end: Option<T>,
}

impl<T> PlaneRange<T> {
    pub fn is_bounded(&self) -> bool {
        self.end.is_some()
    }
}

impl<H> RouteMatch<H> {
    /// Raw value of a parameter; `None` when absent or not captured.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(|v| v.as_deref())
    }

    /// Parse a parameter if present.
    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, ParamError> {
        match self.get(name) {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| ParamError::Invalid {
                name: name.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// Parse a parameter that must be present.
    pub fn required<T: FromStr>(&self, name: &str) -> Result<T, ParamError> {
        self.parse(name)?
            .ok_or_else(|| ParamError::Missing(name.to_string()))
    }

    /// Combine a start parameter and its optional end parameter.
    pub fn range<T: FromStr>(&self, start: &str, end: &str) -> Result<PlaneRange<T>, ParamError> {
        Ok(PlaneRange {
            start: self.required(start)?,
            end: self.parse(end)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::types::Params;

    fn matched(pairs: &[(&str, Option<&str>)]) -> RouteMatch<()> {
        let params: Params = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect();
        RouteMatch {
            name: "test".into(),
            handler: (),
            params,
        }
    }

    #[test]
    fn test_required_and_optional() {
        let m = matched(&[("image_id", Some("12")), ("z_end", None)]);
        assert_eq!(m.required::<u64>("image_id").unwrap(), 12);
        assert_eq!(m.parse::<u32>("z_end").unwrap(), None);
        assert_eq!(
            m.required::<u32>("z_end"),
            Err(ParamError::Missing("z_end".into()))
        );
    }

    #[test]
    fn test_invalid_value() {
        let m = matched(&[("obj_type", Some("polygon"))]);
        assert_eq!(
            m.required::<ObjectType>("obj_type"),
            Err(ParamError::Invalid {
                name: "obj_type".into(),
                value: "polygon".into()
            })
        );
    }

    #[test]
    fn test_range() {
        let m = matched(&[("the_z", Some("2")), ("z_end", Some("10"))]);
        let range: PlaneRange<u32> = m.range("the_z", "z_end").unwrap();
        assert_eq!(range, PlaneRange { start: 2, end: Some(10) });
        assert!(range.is_bounded());

        let m = matched(&[("the_z", Some("2")), ("z_end", None)]);
        let range: PlaneRange<u32> = m.range("the_z", "z_end").unwrap();
        assert!(!range.is_bounded());
    }

    #[test]
    fn test_object_type() {
        assert_eq!("roi".parse::<ObjectType>(), Ok(ObjectType::Roi));
        assert_eq!(ObjectType::Shape.to_string(), "shape");
        assert_eq!(
            "ellipse".parse::<ObjectType>(),
            Err(UnknownObjectType("ellipse".into()))
        );
    }
}

//! URI templates.
//!
//! Resource URIs are written with angle-bracket placeholders, optionally typed:
//! `/class/<class_id:int>/student/<student_id>`.

use std::fmt::Display;

use crate::RouteShape;

const OPEN_MARKER: &str = "/<";
const CLOSE_MARKER: char = '>';
const SEPARATOR: char = '/';

/// The URIs of the two shapes of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUris {
    /// The collection URI.
    pub collection: String,

    /// The item URI, empty if the template has no placeholder.
    pub item: String,
}

impl ResourceUris {
    /// Get the URI for the specified shape, if it is not empty.
    pub fn uri(&self, shape: RouteShape) -> Option<&str> {
        let uri = match shape {
            RouteShape::Collection => &self.collection,
            RouteShape::Item => &self.item,
        };

        (!uri.is_empty()).then_some(uri.as_str())
    }
}

/// Split a URI template into its collection and item URIs.
///
/// The item URI is the template itself, as long as it contains a placeholder. The collection URI
/// stops right before the first placeholder, keeping a single trailing slash if the placeholder is
/// at the very start or if the template ends with a slash.
///
/// An opening marker without any closing one is not a placeholder.
pub fn split_uri_template(template: &str) -> ResourceUris {
    let idx = match template.find(OPEN_MARKER) {
        Some(idx) if template.contains(CLOSE_MARKER) => idx,
        _ => {
            return ResourceUris {
                collection: template.to_string(),
                item: String::new(),
            };
        }
    };

    let end = if idx == 0 || template.ends_with(SEPARATOR) {
        idx + SEPARATOR.len_utf8()
    } else {
        idx
    };

    ResourceUris {
        collection: template[..end].to_string(),
        item: template.to_string(),
    }
}

/// The kind of value a path parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamKind {
    /// Any non-empty segment.
    #[default]
    Str,

    /// A signed integer.
    Int,

    /// A floating-point number.
    Float,

    /// ASCII letters only.
    Alpha,

    /// Lowercase ASCII letters, digits and hyphens.
    Slug,

    /// A hyphenated UUID.
    Uuid,
}

impl ParamKind {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "str" | "string" => Self::Str,
            "int" => Self::Int,
            "float" => Self::Float,
            "alpha" => Self::Alpha,
            "slug" => Self::Slug,
            "uuid" => Self::Uuid,
            _ => return None,
        })
    }

    /// Check whether a captured value is acceptable for this kind.
    pub fn accepts(self, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }

        match self {
            Self::Str => true,
            Self::Int => {
                let digits = value.strip_prefix('-').unwrap_or(value);
                !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
            }
            Self::Float => value.parse::<f64>().is_ok(),
            Self::Alpha => value.bytes().all(|b| b.is_ascii_alphabetic()),
            Self::Slug => value
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-'),
            Self::Uuid => uuid::Uuid::try_parse(value).is_ok(),
        }
    }
}

/// An error that can occur when parsing a URI template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// A segment has unbalanced angle brackets.
    #[error("unbalanced placeholder markers in segment `{segment}` of `{template}`")]
    Unbalanced {
        /// The template.
        template: String,

        /// The offending segment.
        segment: String,
    },

    /// A placeholder has no name.
    #[error("placeholder with an empty name in `{template}`")]
    EmptyName {
        /// The template.
        template: String,
    },

    /// A placeholder name contains characters that are not allowed.
    #[error("invalid placeholder name `{name}` in `{template}`")]
    InvalidName {
        /// The template.
        template: String,

        /// The placeholder name.
        name: String,
    },

    /// A placeholder has an unknown type.
    #[error("unknown type `{kind}` for placeholder `{name}` in `{template}`")]
    UnknownKind {
        /// The template.
        template: String,

        /// The placeholder name.
        name: String,

        /// The unknown type.
        kind: String,
    },

    /// The same placeholder name appears twice.
    #[error("placeholder `{name}` appears more than once in `{template}`")]
    DuplicateName {
        /// The template.
        template: String,

        /// The placeholder name.
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param { name: String, kind: ParamKind },
}

/// A parsed URI template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    template: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl UriTemplate {
    /// Parse a URI template.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let trimmed = template.strip_prefix(SEPARATOR).unwrap_or(template);
        let trailing_slash = !trimmed.is_empty() && trimmed.ends_with(SEPARATOR);
        let trimmed = trimmed.strip_suffix(SEPARATOR).unwrap_or(trimmed);

        let mut segments = Vec::new();

        for segment in trimmed.split(SEPARATOR).filter(|s| !s.is_empty()) {
            let segment = match segment
                .strip_prefix('<')
                .and_then(|s| s.strip_suffix(CLOSE_MARKER))
            {
                Some(inner) => Self::parse_param(template, segment, inner)?,
                None => {
                    if segment.contains(['<', CLOSE_MARKER]) {
                        return Err(TemplateError::Unbalanced {
                            template: template.to_string(),
                            segment: segment.to_string(),
                        });
                    }

                    Segment::Static(segment.to_string())
                }
            };

            if let Segment::Param { name, .. } = &segment {
                if segments
                    .iter()
                    .any(|s| matches!(s, Segment::Param { name: other, .. } if other == name))
                {
                    return Err(TemplateError::DuplicateName {
                        template: template.to_string(),
                        name: name.clone(),
                    });
                }
            }

            segments.push(segment);
        }

        Ok(Self {
            template: template.to_string(),
            segments,
            trailing_slash,
        })
    }

    fn parse_param(template: &str, segment: &str, inner: &str) -> Result<Segment, TemplateError> {
        if inner.contains(['<', CLOSE_MARKER]) {
            return Err(TemplateError::Unbalanced {
                template: template.to_string(),
                segment: segment.to_string(),
            });
        }

        let (name, kind) = match inner.split_once(':') {
            Some((name, kind)) => (name, Some(kind)),
            None => (inner, None),
        };

        if name.is_empty() {
            return Err(TemplateError::EmptyName {
                template: template.to_string(),
            });
        }

        if !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Err(TemplateError::InvalidName {
                template: template.to_string(),
                name: name.to_string(),
            });
        }

        let kind = match kind {
            Some(kind) => ParamKind::from_name(kind).ok_or_else(|| TemplateError::UnknownKind {
                template: template.to_string(),
                name: name.to_string(),
                kind: kind.to_string(),
            })?,
            None => ParamKind::default(),
        };

        Ok(Segment::Param {
            name: name.to_string(),
            kind,
        })
    }

    /// Get the original template.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Get the path parameters, in order.
    pub fn params(&self) -> impl Iterator<Item = (&str, ParamKind)> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Static(_) => None,
            Segment::Param { name, kind } => Some((name.as_str(), *kind)),
        })
    }

    /// Check whether the template ends with a slash.
    pub fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Render the template as an axum path, with `{name}` captures.
    pub fn to_axum_path(&self) -> String {
        let mut path = String::new();

        for segment in &self.segments {
            path.push(SEPARATOR);

            match segment {
                Segment::Static(s) => path.push_str(s),
                Segment::Param { name, .. } => {
                    path.push('{');
                    path.push_str(name);
                    path.push('}');
                }
            }
        }

        if path.is_empty() || self.trailing_slash {
            path.push(SEPARATOR);
        }

        path
    }
}

impl Display for UriTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.template)
    }
}

//! Parameter signatures — validation and rendering
//!
//! A parameter list is a set of `ParameterSpec`s, each in one of five
//! categories. Validation tallies the list by category, applies each
//! category's arity rule and renders the groups in canonical order:
//!
//! ```text
//! positional-required, positional-optional, keyword-required, keyword-optional, block
//! a, b=1, c:, d: 2, &blk
//! ```
//!
//! Input order does not matter: `[opt b 1, req a]` renders as `a, b=1`.
//!
//! ## Raw form
//!
//! ```yaml
//! parameters:
//!   - [req, a]
//!   - [opt, b, 1]
//!   - [keyreq, c]
//!   - [key, d, 2]
//!   - [block, blk]
//! ```

use crate::double::CallArgs;
use crate::util::is_identifier;
use crate::value::Value;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;
use thiserror::Error;

/// The closed set of parameter categories, declared in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParameterCategory {
    PositionalRequired,
    PositionalOptional,
    KeywordRequired,
    KeywordOptional,
    Block,
}

impl ParameterCategory {
    pub const CANONICAL_ORDER: [ParameterCategory; 5] = [
        ParameterCategory::PositionalRequired,
        ParameterCategory::PositionalOptional,
        ParameterCategory::KeywordRequired,
        ParameterCategory::KeywordOptional,
        ParameterCategory::Block,
    ];

    /// Short tag used in the raw tuple form
    pub fn short_name(self) -> &'static str {
        match self {
            ParameterCategory::PositionalRequired => "req",
            ParameterCategory::PositionalOptional => "opt",
            ParameterCategory::KeywordRequired => "keyreq",
            ParameterCategory::KeywordOptional => "key",
            ParameterCategory::Block => "block",
        }
    }
}

impl std::fmt::Display for ParameterCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ParameterCategory::PositionalRequired => "positional-required",
            ParameterCategory::PositionalOptional => "positional-optional",
            ParameterCategory::KeywordRequired => "keyword-required",
            ParameterCategory::KeywordOptional => "keyword-optional",
            ParameterCategory::Block => "block",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ParameterCategory {
    type Err = ParameterListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "req" | "positional_required" | "positional-required" => {
                Ok(ParameterCategory::PositionalRequired)
            }
            "opt" | "positional_optional" | "positional-optional" => {
                Ok(ParameterCategory::PositionalOptional)
            }
            "keyreq" | "keyword_required" | "keyword-required" => {
                Ok(ParameterCategory::KeywordRequired)
            }
            "key" | "keyword_optional" | "keyword-optional" => {
                Ok(ParameterCategory::KeywordOptional)
            }
            "block" => Ok(ParameterCategory::Block),
            other => Err(ParameterListError::UnknownCategory(other.to_string())),
        }
    }
}

/// Why a parameter list was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterListError {
    #[error("unknown parameter category `{0}`")]
    UnknownCategory(String),

    #[error("{category} parameter `{name}` requires exactly one default value")]
    MissingDefault {
        category: ParameterCategory,
        name: String,
    },

    #[error("{category} parameter `{name}` does not take a default value")]
    UnexpectedDefault {
        category: ParameterCategory,
        name: String,
    },

    #[error("{category} parameter `{name}` has {len} elements, expected {expected}")]
    WrongArity {
        category: ParameterCategory,
        name: String,
        len: usize,
        expected: usize,
    },

    #[error("block: at most one block parameter allowed, found {count}")]
    MultipleBlocks { count: usize },

    #[error("duplicate parameter name `{0}`")]
    DuplicateName(String),

    #[error("malformed parameter: {0}")]
    Malformed(String),
}

impl ParameterListError {
    /// The category whose rule failed, when one applies
    pub fn category(&self) -> Option<ParameterCategory> {
        match self {
            ParameterListError::MissingDefault { category, .. }
            | ParameterListError::UnexpectedDefault { category, .. }
            | ParameterListError::WrongArity { category, .. } => Some(*category),
            ParameterListError::MultipleBlocks { .. } => Some(ParameterCategory::Block),
            _ => None,
        }
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub category: ParameterCategory,
    pub name: String,
    pub default: Option<Value>,
}

impl ParameterSpec {
    pub fn required(name: impl Into<String>) -> Self {
        Self::new(ParameterCategory::PositionalRequired, name, None)
    }

    pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::new(
            ParameterCategory::PositionalOptional,
            name,
            Some(default.into()),
        )
    }

    pub fn keyword(name: impl Into<String>) -> Self {
        Self::new(ParameterCategory::KeywordRequired, name, None)
    }

    pub fn keyword_optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::new(
            ParameterCategory::KeywordOptional,
            name,
            Some(default.into()),
        )
    }

    pub fn block(name: impl Into<String>) -> Self {
        Self::new(ParameterCategory::Block, name, None)
    }

    fn new(category: ParameterCategory, name: impl Into<String>, default: Option<Value>) -> Self {
        Self {
            category,
            name: name.into(),
            default,
        }
    }

    /// Number of elements in this category's raw tuple
    fn tuple_len(category: ParameterCategory) -> usize {
        match category {
            ParameterCategory::PositionalOptional | ParameterCategory::KeywordOptional => 3,
            _ => 2,
        }
    }

    /// Parse the raw tuple form `[category, name]` / `[category, name, default]`
    pub fn from_value(raw: &Value) -> Result<Self, ParameterListError> {
        let items = match raw {
            Value::List(items) => items,
            other => {
                return Err(ParameterListError::Malformed(format!(
                    "expected [category, name, default?], got {}",
                    other.kind()
                )))
            }
        };

        let category = items
            .first()
            .and_then(Value::as_text)
            .ok_or_else(|| ParameterListError::Malformed(format!("missing category in {}", raw)))?
            .parse::<ParameterCategory>()?;

        let name = items
            .get(1)
            .and_then(Value::as_text)
            .ok_or_else(|| ParameterListError::Malformed(format!("missing name in {}", raw)))?
            .to_string();

        // Tuple size carries the arity: 2 means no default, 3 means one.
        // Sizes 2 and 3 in the wrong category are reported by `validate`.
        let default = match items.len() {
            2 => None,
            3 => Some(items[2].clone()),
            len => {
                return Err(ParameterListError::WrongArity {
                    category,
                    name,
                    len,
                    expected: Self::tuple_len(category),
                })
            }
        };

        Ok(Self {
            category,
            name,
            default,
        })
    }
}

/// A validated parameter list, grouped in canonical order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSignature {
    required: Vec<String>,
    optional: Vec<(String, Value)>,
    keyword_required: Vec<String>,
    keyword_optional: Vec<(String, Value)>,
    block: Option<String>,
}

impl ParameterSignature {
    /// Validate typed parameter specs
    pub fn validate(params: &[ParameterSpec]) -> Result<Self, ParameterListError> {
        let mut seen = HashSet::new();
        for param in params {
            let plain = is_identifier(&param.name) && !param.name.ends_with(['?', '!', '=']);
            if !plain {
                return Err(ParameterListError::Malformed(format!(
                    "`{}` is not a valid parameter name",
                    param.name
                )));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(ParameterListError::DuplicateName(param.name.clone()));
            }
        }

        let mut tally: BTreeMap<ParameterCategory, Vec<&ParameterSpec>> = BTreeMap::new();
        for param in params {
            tally.entry(param.category).or_default().push(param);
        }

        let mut signature = ParameterSignature::default();
        for category in ParameterCategory::CANONICAL_ORDER {
            let Some(entries) = tally.remove(&category) else {
                continue;
            };
            match category {
                ParameterCategory::PositionalRequired => {
                    signature.required = names_without_default(category, &entries)?;
                }
                ParameterCategory::PositionalOptional => {
                    signature.optional = names_with_default(category, &entries)?;
                }
                ParameterCategory::KeywordRequired => {
                    signature.keyword_required = names_without_default(category, &entries)?;
                }
                ParameterCategory::KeywordOptional => {
                    signature.keyword_optional = names_with_default(category, &entries)?;
                }
                ParameterCategory::Block => {
                    if entries.len() > 1 {
                        return Err(ParameterListError::MultipleBlocks {
                            count: entries.len(),
                        });
                    }
                    signature.block = names_without_default(category, &entries)?.pop();
                }
            }
        }

        Ok(signature)
    }

    /// Parse and validate raw parameter tuples
    pub fn parse(raw: &[Value]) -> Result<Self, ParameterListError> {
        let params = raw
            .iter()
            .map(ParameterSpec::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Self::validate(&params)
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
            && self.optional.is_empty()
            && self.keyword_required.is_empty()
            && self.keyword_optional.is_empty()
            && self.block.is_none()
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn optional(&self) -> &[(String, Value)] {
        &self.optional
    }

    pub fn keyword_required(&self) -> &[String] {
        &self.keyword_required
    }

    pub fn keyword_optional(&self) -> &[(String, Value)] {
        &self.keyword_optional
    }

    pub fn block(&self) -> Option<&str> {
        self.block.as_deref()
    }

    /// Render as `a, b=1, c:, d: 2, &blk`
    pub fn render(&self) -> String {
        let mut fragments = Vec::new();

        if !self.required.is_empty() {
            fragments.push(self.required.join(", "));
        }
        if !self.optional.is_empty() {
            fragments.push(join_pairs(&self.optional, "="));
        }
        if !self.keyword_required.is_empty() {
            let keys: Vec<_> = self
                .keyword_required
                .iter()
                .map(|n| format!("{}:", n))
                .collect();
            fragments.push(keys.join(", "));
        }
        if !self.keyword_optional.is_empty() {
            fragments.push(join_pairs(&self.keyword_optional, ": "));
        }
        if let Some(block) = &self.block {
            fragments.push(format!("&{}", block));
        }

        fragments.join(", ")
    }

    /// Check call-time arguments against the signature; the error is a reason
    pub fn accepts(&self, args: &CallArgs) -> Result<(), String> {
        let min = self.required.len();
        let max = min + self.optional.len();
        let given = args.positional().len();
        if given < min || given > max {
            let expected = if min == max {
                min.to_string()
            } else {
                format!("{}..{}", min, max)
            };
            return Err(format!(
                "wrong number of arguments (given {}, expected {})",
                given, expected
            ));
        }

        let missing: Vec<_> = self
            .keyword_required
            .iter()
            .filter(|k| !args.keywords().contains_key(k.as_str()))
            .map(|k| format!(":{}", k))
            .collect();
        if !missing.is_empty() {
            return Err(format!("missing keyword(s): {}", missing.join(", ")));
        }

        let unknown: Vec<_> = args
            .keywords()
            .keys()
            .filter(|k| {
                !self.keyword_required.contains(*k)
                    && !self.keyword_optional.iter().any(|(name, _)| name == *k)
            })
            .map(|k| format!(":{}", k))
            .collect();
        if !unknown.is_empty() {
            return Err(format!("unknown keyword(s): {}", unknown.join(", ")));
        }

        Ok(())
    }
}

impl std::fmt::Display for ParameterSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

fn names_without_default(
    category: ParameterCategory,
    entries: &[&ParameterSpec],
) -> Result<Vec<String>, ParameterListError> {
    entries
        .iter()
        .map(|p| match p.default {
            None => Ok(p.name.clone()),
            Some(_) => Err(ParameterListError::UnexpectedDefault {
                category,
                name: p.name.clone(),
            }),
        })
        .collect()
}

fn names_with_default(
    category: ParameterCategory,
    entries: &[&ParameterSpec],
) -> Result<Vec<(String, Value)>, ParameterListError> {
    entries
        .iter()
        .map(|p| match &p.default {
            Some(default) => Ok((p.name.clone(), default.clone())),
            None => Err(ParameterListError::MissingDefault {
                category,
                name: p.name.clone(),
            }),
        })
        .collect()
}

fn join_pairs(pairs: &[(String, Value)], separator: &str) -> String {
    pairs
        .iter()
        .map(|(name, default)| format!("{}{}{}", name, separator, default))
        .collect::<Vec<_>>()
        .join(", ")
}

//! Identifier sanitization and per-scope name allocation.
//!
//! Raw names from a Swagger document (`is-nick-name`, `5 Things are Neato!`)
//! are turned into GraphQL-safe identifiers. Each naming scope guarantees
//! uniqueness by suffixing collisions with `2`, `3`, ... in declaration
//! order, so the first occurrence always keeps the plain name.

use std::collections::HashSet;

use heck::{ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use swagql_runtime::NameMap;

use crate::errors::GeneratorError;

/// Target case of a naming scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// Fields, arguments and root operation fields.
    LowerCamel,
    /// Type names.
    UpperCamel,
    /// Enum items.
    ShoutySnake,
    /// Rust function names in the emitted module.
    Snake,
}

/// Sanitizes `raw` into an identifier of the given case.
///
/// Returns an empty string when nothing usable remains.
///
/// ## Examples
///
/// ```
/// use swagql_gen::identifiers::{Case, sanitize};
///
/// assert_eq!(sanitize("is-nick-name", Case::LowerCamel), "isNickName");
/// assert_eq!(sanitize("5 Things are Neato!", Case::LowerCamel), "_5ThingsAreNeato");
/// assert_eq!(sanitize("Totally Not Safe!", Case::LowerCamel), "totallyNotSafe");
/// assert_eq!(sanitize("4", Case::LowerCamel), "_4");
/// assert_eq!(sanitize("on-hold", Case::ShoutySnake), "ON_HOLD");
/// ```
pub fn sanitize(raw: &str, case: Case) -> String {
    let cased = match case {
        Case::LowerCamel => raw.to_lower_camel_case(),
        Case::UpperCamel => raw.to_upper_camel_case(),
        Case::ShoutySnake => raw.to_shouty_snake_case(),
        Case::Snake => raw.to_snake_case(),
    };

    let mut ident: String = cased
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    if ident.chars().all(|c| c == '_') {
        return String::new();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// One naming scope: the fields of a type, the arguments of an operation,
/// the items of an enum, or the global type names.
#[derive(Debug, Clone)]
pub struct Scope {
    label: String,
    case: Case,
    names: NameMap,
    taken: HashSet<String>,
}

impl Scope {
    /// Creates an empty scope; `label` appears in error messages.
    pub fn new(label: impl Into<String>, case: Case) -> Self {
        Self {
            label: label.into(),
            case,
            names: NameMap::new(),
            taken: HashSet::new(),
        }
    }

    /// Marks names as unavailable without mapping them.
    pub fn with_reserved(mut self, reserved: &[&str]) -> Self {
        for name in reserved {
            self.reserve(name);
        }
        self
    }

    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Maps a raw name, returning its existing mapping if it has one.
    ///
    /// ```
    /// use swagql_gen::identifiers::{Case, Scope};
    ///
    /// let mut scope = Scope::new("fields of Pet", Case::LowerCamel);
    /// assert_eq!(scope.assign("is-nick-name").unwrap(), "isNickName");
    /// assert_eq!(scope.assign("is_nick_name").unwrap(), "isNickName2");
    /// assert_eq!(scope.assign("is-nick-name").unwrap(), "isNickName");
    /// assert_eq!(scope.names().raw("isNickName2"), Some("is_nick_name"));
    /// ```
    pub fn assign(&mut self, raw: &str) -> Result<String, GeneratorError> {
        if let Some(existing) = self.names.sanitized(raw) {
            return Ok(existing.to_string());
        }
        let name = self.fresh(raw)?;
        self.names
            .insert(raw, name.as_str())
            .map_err(|e| GeneratorError::CodeGenError(e.to_string()))?;
        Ok(name)
    }

    /// Allocates a new name derived from `raw`, even if `raw` was seen before.
    ///
    /// Used where raw names are not keys, e.g. anonymous types that share a
    /// declaration path.
    pub fn fresh(&mut self, raw: &str) -> Result<String, GeneratorError> {
        let base = sanitize(raw, self.case);
        if base.is_empty() {
            return Err(GeneratorError::InvalidIdentifier {
                raw: raw.to_string(),
                scope: self.label.clone(),
            });
        }

        let name = if self.taken.contains(&base) {
            let mut n = 2;
            loop {
                let candidate = format!("{base}{n}");
                if !self.taken.contains(&candidate) {
                    break candidate;
                }
                n += 1;
            }
        } else {
            base
        };

        self.taken.insert(name.clone());
        Ok(name)
    }

    /// The raw ↔ sanitized table of names allocated with [`Scope::assign`].
    pub fn names(&self) -> &NameMap {
        &self.names
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

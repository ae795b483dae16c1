//! Typed permissions.
//!
//! Permission strings have the form `MODULE:ACTION`. Parsing happens once
//! at the boundary; everything downstream works with the typed form, so a
//! malformed string is rejected up front instead of silently never
//! matching.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use sentra_core::error::AppError;

/// A parsed `MODULE:ACTION` permission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    /// The module (resource family) the permission applies to.
    pub module: String,
    /// The action within the module. `*` grants every action.
    pub action: String,
}

impl Permission {
    /// Builds a permission from its parts, normalizing to uppercase.
    pub fn new(module: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            module: module.into().to_uppercase(),
            action: action.into().to_uppercase(),
        }
    }

    /// Whether this permission grants every action in its module.
    pub fn is_wildcard(&self) -> bool {
        self.action == "*"
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (module, action) = s
            .split_once(':')
            .ok_or_else(|| AppError::validation(format!("Malformed permission: {s:?}")))?;
        if module.is_empty() || action.is_empty() {
            return Err(AppError::validation(format!("Malformed permission: {s:?}")));
        }
        if action.contains(':') {
            return Err(AppError::validation(format!("Malformed permission: {s:?}")));
        }
        Ok(Permission::new(module, action))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        let p: Permission = "REPORTS:READ".parse().unwrap();
        assert_eq!(p.module, "REPORTS");
        assert_eq!(p.action, "READ");
        assert_eq!(p.to_string(), "REPORTS:READ");
    }

    #[test]
    fn test_parse_normalizes_case() {
        let p: Permission = "reports:read".parse().unwrap();
        assert_eq!(p.to_string(), "REPORTS:READ");
    }

    #[test]
    fn test_malformed_rejected() {
        assert!("REPORTS".parse::<Permission>().is_err());
        assert!(":READ".parse::<Permission>().is_err());
        assert!("REPORTS:".parse::<Permission>().is_err());
        assert!("A:B:C".parse::<Permission>().is_err());
    }

    #[test]
    fn test_wildcard() {
        let p: Permission = "REPORTS:*".parse().unwrap();
        assert!(p.is_wildcard());
    }
}

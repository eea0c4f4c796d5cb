//! Capability scopes granted to an authenticated caller

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Capability required to invoke an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// See and edit one's own account
    #[serde(rename = "login")]
    Login,
    /// Search and read any account
    #[serde(rename = "view-accounts")]
    ViewAccounts,
    /// Create, modify and delete any account
    #[serde(rename = "edit-accounts")]
    EditAccounts,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Login, Scope::ViewAccounts, Scope::EditAccounts];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Login => "login",
            Scope::ViewAccounts => "view-accounts",
            Scope::EditAccounts => "edit-accounts",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| format!("unknown scope: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_scopes() {
        for scope in Scope::ALL {
            assert_eq!(scope.as_str().parse::<Scope>(), Ok(scope));
        }
    }

    #[test]
    fn rejects_unknown_scope() {
        assert!("servers.admin".parse::<Scope>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Scope::EditAccounts).unwrap();
        assert_eq!(json, "\"edit-accounts\"");
    }
}

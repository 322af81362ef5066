//! Asset identity on the ledger.
//!
//! An asset is a code plus an optional issuing account. The network's native
//! reference currency has no issuer and always carries the fixed code `XLM`.

use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// Code of the native reference currency.
pub const NATIVE_CODE: &str = "XLM";

/// Issuer marker used in asset ids for the native currency.
pub const NATIVE_MARKER: &str = "native";

/// Wire-level asset type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetType {
    Native,
    CreditAlphanum4,
    CreditAlphanum12,
}

impl AssetType {
    /// Credit asset type implied by the length of its code.
    #[must_use]
    pub fn for_code(code: &str) -> Self {
        if code.len() <= 4 {
            Self::CreditAlphanum4
        } else {
            Self::CreditAlphanum12
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::CreditAlphanum4 => "credit_alphanum4",
            Self::CreditAlphanum12 => "credit_alphanum12",
        }
    }
}

impl FromStr for AssetType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(Self::Native),
            "credit_alphanum4" => Ok(Self::CreditAlphanum4),
            "credit_alphanum12" => Ok(Self::CreditAlphanum12),
            other => Err(DomainError::UnknownAssetType {
                value: other.to_string(),
            }),
        }
    }
}

/// Asset identity: two assets are equal iff code and issuer address match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Asset {
    code: String,
    issuer: Option<String>,
}

impl Asset {
    /// The native reference currency.
    #[must_use]
    pub fn native() -> Self {
        Self {
            code: NATIVE_CODE.to_string(),
            issuer: None,
        }
    }

    /// An issued (credit) asset.
    pub fn credit(code: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            issuer: Some(issuer.into()),
        }
    }

    /// Build an asset from the `{type, code, issuer}` triple found on the wire.
    pub fn from_wire(
        asset_type: &str,
        code: Option<&str>,
        issuer: Option<&str>,
    ) -> Result<Self, DomainError> {
        match asset_type.parse::<AssetType>()? {
            AssetType::Native => Ok(Self::native()),
            AssetType::CreditAlphanum4 | AssetType::CreditAlphanum12 => {
                let code = code
                    .filter(|c| !c.is_empty())
                    .ok_or(DomainError::IncompleteAsset { field: "code" })?;
                let issuer = issuer
                    .filter(|i| !i.is_empty())
                    .ok_or(DomainError::IncompleteAsset { field: "issuer" })?;
                Ok(Self::credit(code, issuer))
            }
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    #[must_use]
    pub const fn is_native(&self) -> bool {
        self.issuer.is_none()
    }

    #[must_use]
    pub fn asset_type(&self) -> AssetType {
        if self.is_native() {
            AssetType::Native
        } else {
            AssetType::for_code(&self.code)
        }
    }

    /// Asset id: `CODE-ISSUER`, or `XLM-native` for the reference currency.
    #[must_use]
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.issuer {
            Some(issuer) => write!(f, "{}-{}", self.code, issuer),
            None => write!(f, "{NATIVE_CODE}-{NATIVE_MARKER}"),
        }
    }
}

impl FromStr for Asset {
    type Err = DomainError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidAssetId { id: id.to_string() };
        let (code, issuer) = id.split_once('-').ok_or_else(invalid)?;
        if code.is_empty() || issuer.is_empty() || issuer.contains('-') {
            return Err(invalid());
        }
        if issuer == NATIVE_MARKER {
            return Ok(Self::native());
        }
        Ok(Self::credit(code, issuer))
    }
}

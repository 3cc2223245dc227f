use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ListingError;

macro_rules! name_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

name_newtype!(ResourcePath);
name_newtype!(FieldKey);
name_newtype!(RowId);
name_newtype!(CategoryTag);
name_newtype!(NodeIdent);

impl ResourcePath {
    pub fn project() -> Self {
        Self::new("project")
    }

    pub fn asset(path: &str) -> Self {
        Self(format!("asset/{path}"))
    }

    pub fn job(job_id: JobId) -> Self {
        Self(format!("job/{job_id}"))
    }

    pub fn node(ident: &NodeIdent) -> Self {
        Self(format!("node/{ident}"))
    }

    pub fn role(ident: &str) -> Self {
        Self(format!("role/{ident}"))
    }

    pub fn ext_asset(ident: &str) -> Self {
        Self(format!("ext_asset/{ident}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(JobId)
    }
}

/// Indicator state of one bound field. `Ok` doubles as the idle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    #[default]
    Ok,
    Pending,
    Error,
}

impl SyncState {
    pub fn css_class(self) -> &'static str {
        match self {
            SyncState::Ok => "state_ok",
            SyncState::Pending => "state_sync",
            SyncState::Error => "state_error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Type,
    Owner,
    State,
    Priority,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Name,
        SortKey::Type,
        SortKey::Owner,
        SortKey::State,
        SortKey::Priority,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Type => "type",
            SortKey::Owner => "owner",
            SortKey::State => "state",
            SortKey::Priority => "priority",
        }
    }
}

impl FromStr for SortKey {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ListingError::UnsupportedSortKey(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn suffix(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "dsc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortMode {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortMode {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }
}

impl Default for SortMode {
    fn default() -> Self {
        Self::ascending(SortKey::Name)
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.key.as_str(), self.direction.suffix())
    }
}

/// Parses the raw value of the sort selector, `<key>_asc` or `<key>_dsc`.
impl FromStr for SortMode {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, suffix) = s
            .rsplit_once('_')
            .ok_or_else(|| ListingError::UnknownSortMode(s.to_string()))?;
        let direction = match suffix {
            "asc" => SortDirection::Ascending,
            "dsc" => SortDirection::Descending,
            _ => return Err(ListingError::UnknownSortMode(s.to_string())),
        };
        Ok(Self {
            key: key.parse()?,
            direction,
        })
    }
}

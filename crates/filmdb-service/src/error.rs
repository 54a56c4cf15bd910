use std::fmt::Display;

use filmdb_dal::EntityKind;
use serde::Serialize;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// What the caller used to look an entity up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Identifier {
    Id(i64),
    Name(String),
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identifier::Id(id) => write!(f, "{id}"),
            Identifier::Name(name) => write!(f, "{name}"),
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Id(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Name(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Name(value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Entity '{kind}' with identifier '{identifier}' not found.")]
    EntityNotFound {
        kind: EntityKind,
        identifier: Identifier,
    },

    /// Infrastructure failure, passed through untouched.
    #[error(transparent)]
    Store(filmdb_dal::Error),
}

impl Error {
    pub fn not_found(kind: EntityKind, identifier: impl Into<Identifier>) -> Self {
        Error::EntityNotFound {
            kind,
            identifier: identifier.into(),
        }
    }
}

impl From<filmdb_dal::Error> for Error {
    fn from(value: filmdb_dal::Error) -> Self {
        match value {
            filmdb_dal::Error::RecordNotFound { kind, id } => Error::not_found(kind, id),
            other => Error::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = Error::not_found(EntityKind::Movie, 3);
        assert_eq!(
            err.to_string(),
            "Entity 'Movie' with identifier '3' not found."
        );
        let err = Error::not_found(EntityKind::Character, "Nonexistent");
        assert_eq!(
            err.to_string(),
            "Entity 'Character' with identifier 'Nonexistent' not found."
        );
    }

    #[test]
    fn test_store_not_found_converts() {
        let err: Error = filmdb_dal::Error::RecordNotFound {
            kind: EntityKind::Franchise,
            id: 7,
        }
        .into();
        assert!(matches!(
            err,
            Error::EntityNotFound {
                kind: EntityKind::Franchise,
                identifier: Identifier::Id(7),
            }
        ));

        let err: Error = filmdb_dal::Error::DatabaseError(filmdb_dal::SqlxError::PoolClosed).into();
        assert!(matches!(err, Error::Store(_)));
    }
}

pub mod character;
pub mod franchise;
pub mod movie;
pub mod setup;

use filmdb_service::{EntityKind, Error, Identifier, Services};
use serde::Serialize;

#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(self, services: &Services) -> anyhow::Result<()>;
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Machine readable form of a failed lookup, printed to stdout.
#[derive(Debug, Serialize)]
pub struct NotFoundReport<'a> {
    pub kind: EntityKind,
    pub identifier: &'a Identifier,
    pub message: String,
}

pub fn not_found_report(err: &anyhow::Error) -> Option<NotFoundReport<'_>> {
    match err.downcast_ref::<Error>()? {
        e @ Error::EntityNotFound { kind, identifier } => Some(NotFoundReport {
            kind: *kind,
            identifier,
            message: e.to_string(),
        }),
        Error::Store(_) => None,
    }
}

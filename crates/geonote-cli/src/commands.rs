//! Note commands run against any [`NoteRepository`].
//!
//! Successful results are wrapped in a `{"note": ...}` or `{"notes": [...]}`
//! envelope. Failures become an `{"error": ...}` envelope through
//! [`error_envelope`].

use serde_json::{json, Value};
use tracing::info;

use geonote_core::logging::SUBSYSTEM_CLI;
use geonote_core::{validate_note, Error, NearbyQuery, Note, NoteRepository, Result, Validator};

use crate::cli::NoteCommand;

/// Message shown for store-side failures.
pub const SERVER_ERROR_MESSAGE: &str =
    "the store encountered a problem and could not process the request";

/// Check a command's input without touching any store.
///
/// New notes go through the full field validation. Search centers and radii
/// are range-checked.
pub fn check(command: &NoteCommand) -> Result<()> {
    match command {
        NoteCommand::Add {
            user,
            lat,
            lon,
            text,
        } => {
            let mut v = Validator::new();
            validate_note(&mut v, &Note::new(*user, *lat, *lon, text.as_str()));
            v.into_result()
        }
        NoteCommand::List | NoteCommand::Mine { .. } => Ok(()),
        NoteCommand::Nearby {
            lat, lon, radius, ..
        }
        | NoteCommand::Around { lat, lon, radius } => {
            NearbyQuery::new(*lat, *lon, *radius).validate()
        }
    }
}

/// Run a note command and return its JSON envelope.
pub async fn run(repo: &dyn NoteRepository, command: NoteCommand) -> Result<Value> {
    check(&command)?;

    match command {
        NoteCommand::Add {
            user,
            lat,
            lon,
            text,
        } => {
            let mut note = Note::new(user, lat, lon, text);
            repo.insert(&mut note).await?;
            info!(
                subsystem = SUBSYSTEM_CLI,
                op = "add",
                note_id = note.id,
                user_id = user,
                "Note created"
            );
            Ok(json!({ "note": note }))
        }
        NoteCommand::List => notes_envelope(repo.list_all().await?),
        NoteCommand::Mine { user } => notes_envelope(repo.list_by_user(user).await?),
        NoteCommand::Nearby {
            user,
            lat,
            lon,
            radius,
        } => notes_envelope(
            repo.find_nearby_for_user(user, &NearbyQuery::new(lat, lon, radius))
                .await?,
        ),
        NoteCommand::Around { lat, lon, radius } => {
            notes_envelope(repo.find_nearby(&NearbyQuery::new(lat, lon, radius)).await?)
        }
    }
}

fn notes_envelope(notes: Vec<Note>) -> Result<Value> {
    Ok(json!({ "notes": notes }))
}

/// JSON body describing `err`.
///
/// Validation failures list the messages per field. Store-side failures are
/// reported opaquely; their details only go to the log.
pub fn error_envelope(err: &Error) -> Value {
    match err {
        Error::Validation(errors) => json!({ "error": errors }),
        Error::InvalidInput(msg) | Error::Config(msg) => json!({ "error": msg }),
        _ => json!({ "error": SERVER_ERROR_MESSAGE }),
    }
}

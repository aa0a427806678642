use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::form_id::FormIdError;
use crate::lookup::AmbiguousKey;

/// A failure that aborts loading the database.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid form ID on `{editor_id}` in {}: {source}", path.display())]
    FormId {
        path: PathBuf,
        editor_id: String,
        #[source]
        source: FormIdError,
    },
    #[error("`{editor_id}` in {} belongs to unknown ESM `{file}`", path.display())]
    UnknownEsm {
        path: PathBuf,
        editor_id: String,
        file: String,
    },
    #[error(transparent)]
    AmbiguousKey(#[from] AmbiguousKey),
}

/// A failure that rejects one weapon mod. Other candidates are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Ambiguous(#[from] AmbiguousKey),
    #[error(
        "`{loose_mod}` spans several ESMs: loose mod in `{loose_mod_file}`, object modifier in `{object_modifier_file}`, recipe in `{craftable_object_file}`"
    )]
    EsmMismatch {
        loose_mod: String,
        loose_mod_file: String,
        object_modifier_file: String,
        craftable_object_file: String,
    },
    #[error("recipe `{recipe}` requires unknown perk `{perk}`")]
    UnknownPerk { recipe: String, perk: String },
}

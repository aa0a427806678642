//! Hand-maintained reference tables describing how records appear on the wiki.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::form_id::FormId;

pub const BASE_GAME_FILE: &str = "Fallout4.esm";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Esm {
    pub file_name: String,
    pub name: String,
    pub page: String,
    pub abbreviation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mod_category: Option<String>,
}

impl Esm {
    pub fn is_base_game(&self) -> bool {
        self.file_name.eq_ignore_ascii_case(BASE_GAME_FILE)
    }

    pub fn is_same_file(&self, other: &Esm) -> bool {
        self.file_name.eq_ignore_ascii_case(&other.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub model: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perk {
    #[serde(rename = "editorID")]
    pub editor_id: String,
    pub name: String,
    pub page: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCatalogWeapon {
    pub file: String,
    pub keyword: String,
    #[serde(rename = "formID")]
    pub form_id: String,
    pub name: String,
    pub page: String,
}

/// A weapon as the wiki knows it, matched to modifiers by keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogWeapon {
    pub file: Rc<Esm>,
    pub keyword: String,
    pub form_id: FormId,
    pub name: String,
    pub page: String,
}

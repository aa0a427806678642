use std::fmt;

use tracing::{debug, error, warn};

use crate::lookup::Lookup;
use crate::records::{Component, CraftableObject, LooseMod, Perk};

use super::database::GameDatabase;
use super::error::ResolveError;
use super::types::{SearchOutcome, WeaponMod, WeaponModGroup};

#[derive(Debug, Clone)]
pub enum Resolution<'db> {
    Resolved(WeaponMod<'db>),
    Unresolved(UnresolvedReason),
}

/// Why a loose mod is not a craftable weapon mod. Expected for many
/// records in the game data, so not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    NoObjectModifier {
        loose_mod: String,
    },
    NoCraftableObject {
        object_modifier: String,
    },
    NoWeapon {
        object_modifier: String,
        keyword: Option<String>,
    },
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoObjectModifier { loose_mod } => {
                write!(f, "no object modifier references `{loose_mod}`")
            }
            Self::NoCraftableObject { object_modifier } => {
                write!(f, "no recipe creates `{object_modifier}`")
            }
            Self::NoWeapon {
                object_modifier,
                keyword: Some(keyword),
            } => write!(
                f,
                "`{object_modifier}` attaches to unknown weapon keyword `{keyword}`"
            ),
            Self::NoWeapon {
                object_modifier,
                keyword: None,
            } => write!(f, "`{object_modifier}` names no weapon"),
        }
    }
}

/// Joins a loose mod with its object modifier, recipe, components, perks
/// and weapon.
pub fn resolve<'db>(
    loose_mod: &'db LooseMod,
    database: &'db GameDatabase,
) -> Result<Resolution<'db>, ResolveError> {
    let Lookup::Found(object_modifier) = database.object_modifier_for(loose_mod)? else {
        return Ok(Resolution::Unresolved(UnresolvedReason::NoObjectModifier {
            loose_mod: loose_mod.editor_id.clone(),
        }));
    };
    let Lookup::Found(craftable_object) = database.craftable_object_for(object_modifier)? else {
        return Ok(Resolution::Unresolved(UnresolvedReason::NoCraftableObject {
            object_modifier: object_modifier.editor_id.clone(),
        }));
    };

    if !loose_mod.file.is_same_file(&object_modifier.file)
        || !loose_mod.file.is_same_file(&craftable_object.file)
    {
        return Err(ResolveError::EsmMismatch {
            loose_mod: loose_mod.editor_id.clone(),
            loose_mod_file: loose_mod.file.file_name.clone(),
            object_modifier_file: object_modifier.file.file_name.clone(),
            craftable_object_file: craftable_object.file.file_name.clone(),
        });
    }

    let components = resolve_components(craftable_object, database)?;
    let perks = resolve_perks(craftable_object, database)?;

    let Some(keyword) = object_modifier.weapon.as_deref() else {
        return Ok(Resolution::Unresolved(UnresolvedReason::NoWeapon {
            object_modifier: object_modifier.editor_id.clone(),
            keyword: None,
        }));
    };
    let Lookup::Found(weapon) = database.catalog_weapons().get(keyword)? else {
        return Ok(Resolution::Unresolved(UnresolvedReason::NoWeapon {
            object_modifier: object_modifier.editor_id.clone(),
            keyword: Some(keyword.to_string()),
        }));
    };
    let game_weapon = database.game_weapon_for(weapon);

    Ok(Resolution::Resolved(WeaponMod::new(
        loose_mod,
        object_modifier,
        craftable_object,
        weapon,
        game_weapon,
        components,
        perks,
    )))
}

fn resolve_components<'db>(
    recipe: &CraftableObject,
    database: &'db GameDatabase,
) -> Result<Vec<(&'db Component, u32)>, ResolveError> {
    let mut components = Vec::with_capacity(recipe.components.len());
    for entry in &recipe.components {
        let Lookup::Found(component) = database.components().get(&entry.component)? else {
            warn!(
                recipe = %recipe.editor_id,
                component = %entry.component,
                "recipe uses unknown component; leaving it out"
            );
            continue;
        };
        insert_last_wins(
            &mut components,
            component,
            entry.count,
            |c| c.editor_id.as_str(),
            recipe,
        );
    }
    Ok(components)
}

fn resolve_perks<'db>(
    recipe: &CraftableObject,
    database: &'db GameDatabase,
) -> Result<Vec<(&'db Perk, u32)>, ResolveError> {
    let mut perks = Vec::with_capacity(recipe.conditions.len());
    for condition in &recipe.conditions {
        let Lookup::Found(perk) = database.perks().get(&condition.perk)? else {
            return Err(ResolveError::UnknownPerk {
                recipe: recipe.editor_id.clone(),
                perk: condition.perk.clone(),
            });
        };
        insert_last_wins(&mut perks, perk, condition.rank, |p| p.editor_id.as_str(), recipe);
    }
    Ok(perks)
}

/// Keeps keys unique while preserving first-insertion order. A repeated key
/// takes the later amount.
fn insert_last_wins<'db, T>(
    entries: &mut Vec<(&'db T, u32)>,
    key: &'db T,
    amount: u32,
    editor_id: impl Fn(&T) -> &str,
    recipe: &CraftableObject,
) {
    match entries
        .iter_mut()
        .find(|(existing, _)| std::ptr::eq(*existing, key))
    {
        Some(entry) => {
            warn!(
                recipe = %recipe.editor_id,
                key = editor_id(key),
                previous = entry.1,
                amount,
                "recipe lists the same entry twice; keeping the later one"
            );
            entry.1 = amount;
        }
        None => entries.push((key, amount)),
    }
}

impl GameDatabase {
    /// Weapon mods whose loose mod name contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> SearchOutcome<'_> {
        let needle = query.trim().to_lowercase();
        let mut mods = Vec::new();
        for loose_mod in self
            .loose_mods()
            .iter()
            .filter(|loose_mod| loose_mod.name.to_lowercase().contains(&needle))
        {
            match resolve(loose_mod, self) {
                Ok(Resolution::Resolved(weapon_mod)) => mods.push(weapon_mod),
                Ok(Resolution::Unresolved(reason)) => {
                    debug!(loose_mod = %loose_mod.editor_id, %reason, "skipping loose mod");
                }
                Err(err) => {
                    error!(
                        loose_mod = %loose_mod.editor_id,
                        error = %err,
                        "failed to resolve weapon mod"
                    );
                }
            }
        }

        if mods.is_empty() {
            SearchOutcome::NoResults {
                query: query.to_string(),
            }
        } else {
            SearchOutcome::Found(WeaponModGroup::new(query, mods))
        }
    }
}

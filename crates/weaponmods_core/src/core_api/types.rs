use tracing::debug;

use crate::records::{
    CatalogWeapon, Component, CraftableObject, Esm, GameWeapon, LooseMod, ObjectModifier, Perk,
};

/// One weapon mod as it applies to one weapon.
///
/// Borrowed from the database it was resolved against. The three records
/// of the mod always share one ESM.
#[derive(Debug, Clone)]
pub struct WeaponMod<'db> {
    loose_mod: &'db LooseMod,
    object_modifier: &'db ObjectModifier,
    craftable_object: &'db CraftableObject,
    weapon: &'db CatalogWeapon,
    game_weapon: Option<&'db GameWeapon>,
    components: Vec<(&'db Component, u32)>,
    perks: Vec<(&'db Perk, u32)>,
}

/// Component and perk keys of a recipe, in recipe order.
pub type RecipeShape<'db> = (Vec<(&'db str, u32)>, Vec<(&'db str, u32)>);

impl<'db> WeaponMod<'db> {
    pub(crate) fn new(
        loose_mod: &'db LooseMod,
        object_modifier: &'db ObjectModifier,
        craftable_object: &'db CraftableObject,
        weapon: &'db CatalogWeapon,
        game_weapon: Option<&'db GameWeapon>,
        components: Vec<(&'db Component, u32)>,
        perks: Vec<(&'db Perk, u32)>,
    ) -> Self {
        Self {
            loose_mod,
            object_modifier,
            craftable_object,
            weapon,
            game_weapon,
            components,
            perks,
        }
    }

    pub fn loose_mod(&self) -> &'db LooseMod {
        self.loose_mod
    }

    pub fn object_modifier(&self) -> &'db ObjectModifier {
        self.object_modifier
    }

    pub fn craftable_object(&self) -> &'db CraftableObject {
        self.craftable_object
    }

    pub fn weapon(&self) -> &'db CatalogWeapon {
        self.weapon
    }

    pub fn game_weapon(&self) -> Option<&'db GameWeapon> {
        self.game_weapon
    }

    pub fn components(&self) -> &[(&'db Component, u32)] {
        &self.components
    }

    pub fn perks(&self) -> &[(&'db Perk, u32)] {
        &self.perks
    }

    pub fn esm(&self) -> &'db Esm {
        &self.loose_mod.file
    }

    pub fn name(&self) -> &'db str {
        &self.loose_mod.name
    }

    pub fn value(&self) -> i64 {
        self.loose_mod.value
    }

    pub fn weight(&self) -> f64 {
        self.loose_mod.weight
    }

    pub fn description(&self) -> &'db str {
        &self.object_modifier.description
    }

    /// The name prefix the mod gives the weapon.
    pub fn prefix(&self) -> &'db str {
        &self.object_modifier.name
    }

    pub fn form_id_template(&self) -> String {
        self.loose_mod.form_id.template()
    }

    pub fn image(&self) -> Option<&'db str> {
        self.loose_mod.model.as_ref().map(|model| model.image.as_str())
    }

    pub fn recipe_shape(&self) -> RecipeShape<'db> {
        (
            self.components
                .iter()
                .map(|(component, count)| (component.editor_id.as_str(), *count))
                .collect(),
            self.perks
                .iter()
                .map(|(perk, rank)| (perk.editor_id.as_str(), *rank))
                .collect(),
        )
    }
}

/// The most common image among `mods`; the earliest one wins a tie.
/// Empty when no mod has an image.
pub fn aggregate_image(mods: &[WeaponMod<'_>]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for image in mods.iter().filter_map(WeaponMod::image) {
        match counts.iter_mut().find(|(seen, _)| *seen == image) {
            Some((_, count)) => *count += 1,
            None => counts.push((image, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (image, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((image, count));
        }
    }
    match best {
        Some((image, _)) => image.to_string(),
        None => {
            debug!(mods = mods.len(), "no image found for weapon mods");
            String::new()
        }
    }
}

/// Every weapon mod found for one search.
#[derive(Debug, Clone)]
pub struct WeaponModGroup<'db> {
    query: String,
    mods: Vec<WeaponMod<'db>>,
}

impl<'db> WeaponModGroup<'db> {
    /// Sorts `mods` by weapon name.
    pub fn new(query: impl Into<String>, mut mods: Vec<WeaponMod<'db>>) -> Self {
        mods.sort_by_cached_key(|weapon_mod| weapon_mod.weapon().name.to_lowercase());
        Self {
            query: query.into(),
            mods,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mods(&self) -> &[WeaponMod<'db>] {
        &self.mods
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    /// Display name of the group, taken from its first mod.
    pub fn name(&self) -> &'db str {
        self.mods.first().map_or("", |weapon_mod| weapon_mod.name())
    }

    /// The ESMs the mods come from, once each, sorted by name.
    pub fn games(&self) -> Vec<&'db Esm> {
        let mut games: Vec<&'db Esm> = Vec::new();
        for weapon_mod in &self.mods {
            let esm = weapon_mod.esm();
            if !games.iter().any(|seen| seen.is_same_file(esm)) {
                games.push(esm);
            }
        }
        games.sort_by(|a, b| a.name.cmp(&b.name));
        games
    }

    pub fn image(&self) -> String {
        aggregate_image(&self.mods)
    }

    /// True when every mod needs the same components and perks.
    pub fn has_uniform_recipe(&self) -> bool {
        let mut shapes = self.mods.iter().map(WeaponMod::recipe_shape);
        match shapes.next() {
            Some(first) => shapes.all(|shape| shape == first),
            None => true,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SearchOutcome<'db> {
    Found(WeaponModGroup<'db>),
    NoResults { query: String },
}

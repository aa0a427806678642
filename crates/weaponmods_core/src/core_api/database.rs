use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::form_id::FormId;
use crate::lookup::{AmbiguousKey, KeyIndex, Lookup, Table};
use crate::records::wiki::RawCatalogWeapon;
use crate::records::xedit::{
    RawComponent, RawCraftableObject, RawGameWeapon, RawLooseMod, RawObjectModifier,
};
use crate::records::{
    CatalogWeapon, Component, CraftableObject, Esm, GameWeapon, LooseMod, Model, ObjectModifier,
    Perk,
};

use super::error::LoadError;

pub const ESMS_FILE: &str = "esms.json";
pub const MODELS_FILE: &str = "models.json";
pub const PERKS_FILE: &str = "perks.json";
pub const CATALOG_WEAPONS_FILE: &str = "weapons.json";

pub const COMPONENTS_FILE: &str = "cmpo.json";
pub const LOOSE_MODS_FILE: &str = "misc.json";
pub const OBJECT_MODIFIERS_FILE: &str = "omod.json";
pub const CRAFTABLE_OBJECTS_FILE: &str = "cobj.json";
pub const GAME_WEAPONS_FILE: &str = "weap.json";

/// Where the two halves of the input live: the wiki reference tables and
/// the xEdit export of the game data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub reference_dir: PathBuf,
    pub game_data_dir: PathBuf,
}

impl DataPaths {
    pub fn new(reference_dir: impl Into<PathBuf>, game_data_dir: impl Into<PathBuf>) -> Self {
        Self {
            reference_dir: reference_dir.into(),
            game_data_dir: game_data_dir.into(),
        }
    }

    pub fn reference(&self, file: &str) -> PathBuf {
        self.reference_dir.join(file)
    }

    pub fn game_data(&self, file: &str) -> PathBuf {
        self.game_data_dir.join(file)
    }
}

#[derive(Debug)]
pub struct GameDatabase {
    esms: Table<Rc<Esm>>,
    models: Table<Rc<Model>>,
    perks: Table<Perk>,
    catalog_weapons: Table<Rc<CatalogWeapon>>,
    game_weapons: Table<GameWeapon>,
    components: Table<Component>,
    loose_mods: Table<LooseMod>,
    object_modifiers: Table<ObjectModifier>,
    craftable_objects: Table<CraftableObject>,
    game_weapons_by_keyword: KeyIndex,
    object_modifiers_by_loose_mod: KeyIndex,
    craftable_objects_by_created_mod: KeyIndex,
}

impl GameDatabase {
    pub fn load(paths: &DataPaths) -> Result<Self, LoadError> {
        let esms = load_esms(&paths.reference(ESMS_FILE))?;
        let models = load_models(&paths.reference(MODELS_FILE))?;
        let perks = load_perks(&paths.reference(PERKS_FILE))?;
        let catalog_weapons = load_catalog_weapons(&paths.reference(CATALOG_WEAPONS_FILE), &esms)?;

        let components = load_components(&paths.game_data(COMPONENTS_FILE), &esms)?;
        let game_weapons = load_game_weapons(
            &paths.game_data(GAME_WEAPONS_FILE),
            &esms,
            &catalog_weapons,
        )?;
        let loose_mods = load_loose_mods(&paths.game_data(LOOSE_MODS_FILE), &esms, &models)?;
        let object_modifiers =
            load_object_modifiers(&paths.game_data(OBJECT_MODIFIERS_FILE), &esms)?;
        let craftable_objects =
            load_craftable_objects(&paths.game_data(CRAFTABLE_OBJECTS_FILE), &esms)?;

        let game_weapons = Table::new("game weapon", game_weapons, |weapon| {
            weapon.editor_id.as_str()
        });
        report_duplicates(&game_weapons);

        let game_weapons_by_keyword =
            game_weapons.index_by(|weapon| Some(weapon.keyword.as_str()));
        let object_modifiers_by_loose_mod =
            object_modifiers.index_by(|modifier| modifier.loose_mod.as_deref());
        let craftable_objects_by_created_mod =
            craftable_objects.index_by(|recipe| recipe.created_mod.as_deref());

        debug!(
            esms = esms.len(),
            components = components.len(),
            loose_mods = loose_mods.len(),
            object_modifiers = object_modifiers.len(),
            craftable_objects = craftable_objects.len(),
            game_weapons = game_weapons.len(),
            "loaded game database"
        );

        Ok(Self {
            esms,
            models,
            perks,
            catalog_weapons,
            game_weapons,
            components,
            loose_mods,
            object_modifiers,
            craftable_objects,
            game_weapons_by_keyword,
            object_modifiers_by_loose_mod,
            craftable_objects_by_created_mod,
        })
    }

    pub fn esms(&self) -> &Table<Rc<Esm>> {
        &self.esms
    }

    pub fn models(&self) -> &Table<Rc<Model>> {
        &self.models
    }

    pub fn perks(&self) -> &Table<Perk> {
        &self.perks
    }

    pub fn catalog_weapons(&self) -> &Table<Rc<CatalogWeapon>> {
        &self.catalog_weapons
    }

    pub fn game_weapons(&self) -> &Table<GameWeapon> {
        &self.game_weapons
    }

    pub fn components(&self) -> &Table<Component> {
        &self.components
    }

    pub fn loose_mods(&self) -> &Table<LooseMod> {
        &self.loose_mods
    }

    pub fn object_modifiers(&self) -> &Table<ObjectModifier> {
        &self.object_modifiers
    }

    pub fn craftable_objects(&self) -> &Table<CraftableObject> {
        &self.craftable_objects
    }

    pub fn object_modifier_for(
        &self,
        loose_mod: &LooseMod,
    ) -> Result<Lookup<'_, ObjectModifier>, AmbiguousKey> {
        self.object_modifiers
            .get_by(&self.object_modifiers_by_loose_mod, &loose_mod.editor_id)
    }

    pub fn craftable_object_for(
        &self,
        object_modifier: &ObjectModifier,
    ) -> Result<Lookup<'_, CraftableObject>, AmbiguousKey> {
        self.craftable_objects.get_by(
            &self.craftable_objects_by_created_mod,
            &object_modifier.editor_id,
        )
    }

    /// The game record of a catalog weapon. Variants of one gun share its
    /// keyword; among several, the one with the catalog weapon's form ID and
    /// ESM is taken. Without a single such record none is attached.
    pub fn game_weapon_for(&self, weapon: &CatalogWeapon) -> Option<&GameWeapon> {
        let candidates = self
            .game_weapons
            .all_by(&self.game_weapons_by_keyword, &weapon.keyword);
        match candidates.as_slice() {
            [] => None,
            [only] => Some(*only),
            many => {
                let mut exact = many.iter().copied().filter(|candidate| {
                    candidate.form_id == weapon.form_id
                        && candidate.file.is_same_file(&weapon.file)
                });
                match (exact.next(), exact.next()) {
                    (Some(found), None) => Some(found),
                    _ => {
                        warn!(
                            keyword = %weapon.keyword,
                            matches = many.len(),
                            "no single game weapon carries the catalog form ID; attaching none"
                        );
                        None
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Reference tables
// ---------------------------------------------------------------------------

pub fn load_esms(path: &Path) -> Result<Table<Rc<Esm>>, LoadError> {
    let esms: Vec<Rc<Esm>> = read_records::<Esm>(path)?
        .into_iter()
        .map(Rc::new)
        .collect();
    let table = Table::new("ESM", esms, |esm| esm.file_name.as_str());
    report_duplicates(&table);
    Ok(table)
}

pub fn load_models(path: &Path) -> Result<Table<Rc<Model>>, LoadError> {
    let models: Vec<Rc<Model>> = read_records::<Model>(path)?
        .into_iter()
        .map(Rc::new)
        .collect();
    let table = Table::new("model", models, |model| model.model.as_str());
    report_duplicates(&table);
    Ok(table)
}

pub fn load_perks(path: &Path) -> Result<Table<Perk>, LoadError> {
    let perks: Vec<Perk> = read_records(path)?;
    let table = Table::new("perk", perks, |perk| perk.editor_id.as_str());
    report_duplicates(&table);
    Ok(table)
}

pub fn load_catalog_weapons(
    path: &Path,
    esms: &Table<Rc<Esm>>,
) -> Result<Table<Rc<CatalogWeapon>>, LoadError> {
    let linker = Linker { path, esms };
    let raw: Vec<RawCatalogWeapon> = read_records(path)?;
    let mut weapons = Vec::with_capacity(raw.len());
    for weapon in raw {
        weapons.push(Rc::new(CatalogWeapon {
            file: linker.esm(&weapon.keyword, &weapon.file)?,
            form_id: linker.form_id(&weapon.keyword, &weapon.form_id)?,
            keyword: weapon.keyword,
            name: weapon.name,
            page: weapon.page,
        }));
    }
    let table = Table::new("catalog weapon", weapons, |weapon| weapon.keyword.as_str());
    report_duplicates(&table);
    Ok(table)
}

// ---------------------------------------------------------------------------
// Game data
// ---------------------------------------------------------------------------

pub fn load_components(path: &Path, esms: &Table<Rc<Esm>>) -> Result<Table<Component>, LoadError> {
    let linker = Linker { path, esms };
    let raw: Vec<RawComponent> = read_records(path)?;
    let mut components = Vec::with_capacity(raw.len());
    for component in raw {
        components.push(Component {
            file: linker.esm(&component.editor_id, &component.file)?,
            form_id: linker.form_id(&component.editor_id, &component.form_id)?,
            editor_id: component.editor_id,
            name: component.name,
        });
    }
    let table = Table::new("component", components, |component| {
        component.editor_id.as_str()
    });
    report_duplicates(&table);
    Ok(table)
}

/// Loads the game's weapon records and matches each one to a catalog weapon,
/// by keyword when the export carries one and by form ID otherwise.
/// Weapons without exactly one match are dropped.
pub fn load_game_weapons(
    path: &Path,
    esms: &Table<Rc<Esm>>,
    catalog: &Table<Rc<CatalogWeapon>>,
) -> Result<Vec<GameWeapon>, LoadError> {
    let linker = Linker { path, esms };
    let raw: Vec<RawGameWeapon> = read_records(path)?;
    let mut weapons = Vec::with_capacity(raw.len());
    for weapon in raw {
        let file = linker.esm(&weapon.editor_id, &weapon.file)?;
        let form_id = linker.form_id(&weapon.editor_id, &weapon.form_id)?;
        let keyword = match match_catalog_weapon(catalog, weapon.keyword.as_deref(), &file, &form_id)
        {
            Ok(Lookup::Found(matched)) => matched.keyword.clone(),
            Ok(Lookup::NotFound) => {
                warn!(
                    weapon = %weapon.editor_id,
                    form_id = %form_id,
                    "game weapon has no catalog entry; dropping it"
                );
                continue;
            }
            Err(err) => {
                warn!(weapon = %weapon.editor_id, error = %err, "dropping game weapon");
                continue;
            }
        };
        weapons.push(GameWeapon {
            file,
            form_id,
            editor_id: weapon.editor_id,
            name: weapon.name,
            keyword,
            speed: weapon.speed,
            reload_speed: weapon.reload_speed,
            reach: weapon.reach,
            min_range: weapon.min_range,
            max_range: weapon.max_range,
            attack_delay: weapon.attack_delay,
            weight: weapon.weight,
            value: weapon.value,
            base_damage: weapon.base_damage,
        });
    }
    Ok(weapons)
}

fn match_catalog_weapon<'c>(
    catalog: &'c Table<Rc<CatalogWeapon>>,
    keyword: Option<&str>,
    file: &Esm,
    form_id: &FormId,
) -> Result<Lookup<'c, Rc<CatalogWeapon>>, AmbiguousKey> {
    if let Some(keyword) = keyword {
        return catalog.get(keyword);
    }
    let matches: Vec<&Rc<CatalogWeapon>> = catalog
        .iter()
        .filter(|weapon| weapon.form_id == *form_id && weapon.file.is_same_file(file))
        .collect();
    match matches.as_slice() {
        [] => Ok(Lookup::NotFound),
        [weapon] => Ok(Lookup::Found(*weapon)),
        many => Err(AmbiguousKey {
            table: catalog.name(),
            key: form_id.to_string(),
            matches: many.len(),
        }),
    }
}

pub fn load_loose_mods(
    path: &Path,
    esms: &Table<Rc<Esm>>,
    models: &Table<Rc<Model>>,
) -> Result<Table<LooseMod>, LoadError> {
    let linker = Linker { path, esms };
    let raw: Vec<RawLooseMod> = read_records(path)?;
    let mut loose_mods = Vec::with_capacity(raw.len());
    for loose_mod in raw {
        let model = match loose_mod.model.as_deref() {
            Some(model_path) => match models.get(model_path)? {
                Lookup::Found(model) => Some(Rc::clone(model)),
                Lookup::NotFound => {
                    debug!(
                        loose_mod = %loose_mod.editor_id,
                        model = model_path,
                        "no image known for model"
                    );
                    None
                }
            },
            None => None,
        };
        loose_mods.push(LooseMod {
            file: linker.esm(&loose_mod.editor_id, &loose_mod.file)?,
            form_id: linker.form_id(&loose_mod.editor_id, &loose_mod.form_id)?,
            editor_id: loose_mod.editor_id,
            name: loose_mod.name,
            value: loose_mod.value,
            weight: loose_mod.weight,
            model,
        });
    }
    let table = Table::new("loose mod", loose_mods, |loose_mod| {
        loose_mod.editor_id.as_str()
    });
    report_duplicates(&table);
    Ok(table)
}

pub fn load_object_modifiers(
    path: &Path,
    esms: &Table<Rc<Esm>>,
) -> Result<Table<ObjectModifier>, LoadError> {
    let linker = Linker { path, esms };
    let raw: Vec<RawObjectModifier> = read_records(path)?;
    let mut modifiers = Vec::with_capacity(raw.len());
    for modifier in raw {
        modifiers.push(ObjectModifier {
            file: linker.esm(&modifier.editor_id, &modifier.file)?,
            form_id: linker.form_id(&modifier.editor_id, &modifier.form_id)?,
            editor_id: modifier.editor_id,
            name: modifier.name,
            description: modifier.description,
            loose_mod: modifier.loose_mod,
            weapon: modifier.weapon,
            effects: modifier.effects,
        });
    }
    let table = Table::new("object modifier", modifiers, |modifier| {
        modifier.editor_id.as_str()
    });
    report_duplicates(&table);
    Ok(table)
}

pub fn load_craftable_objects(
    path: &Path,
    esms: &Table<Rc<Esm>>,
) -> Result<Table<CraftableObject>, LoadError> {
    let linker = Linker { path, esms };
    let raw: Vec<RawCraftableObject> = read_records(path)?;
    let mut recipes = Vec::with_capacity(raw.len());
    for recipe in raw {
        recipes.push(CraftableObject {
            file: linker.esm(&recipe.editor_id, &recipe.file)?,
            form_id: linker.form_id(&recipe.editor_id, &recipe.form_id)?,
            editor_id: recipe.editor_id,
            created_mod: recipe.created_mod,
            components: recipe.components,
            conditions: recipe.conditions,
        });
    }
    let table = Table::new("craftable object", recipes, |recipe| {
        recipe.editor_id.as_str()
    });
    report_duplicates(&table);
    Ok(table)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn report_duplicates<T>(table: &Table<T>) {
    for key in table.duplicate_keys() {
        warn!(
            table = table.name(),
            key, "duplicate key; lookups on it will be rejected as ambiguous"
        );
    }
}

/// Links the ESM and form ID of records read from one file.
struct Linker<'a> {
    path: &'a Path,
    esms: &'a Table<Rc<Esm>>,
}

impl Linker<'_> {
    fn esm(&self, editor_id: &str, file: &str) -> Result<Rc<Esm>, LoadError> {
        match self.esms.get(file)? {
            Lookup::Found(esm) => Ok(Rc::clone(esm)),
            Lookup::NotFound => Err(LoadError::UnknownEsm {
                path: self.path.to_path_buf(),
                editor_id: editor_id.to_string(),
                file: file.to_string(),
            }),
        }
    }

    fn form_id(&self, editor_id: &str, raw: &str) -> Result<FormId, LoadError> {
        FormId::parse(raw).map_err(|source| LoadError::FormId {
            path: self.path.to_path_buf(),
            editor_id: editor_id.to_string(),
            source,
        })
    }
}

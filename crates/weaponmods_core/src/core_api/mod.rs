mod database;
mod error;
mod resolver;
mod types;

pub use database::{
    CATALOG_WEAPONS_FILE, COMPONENTS_FILE, CRAFTABLE_OBJECTS_FILE, DataPaths, ESMS_FILE,
    GAME_WEAPONS_FILE, GameDatabase, LOOSE_MODS_FILE, MODELS_FILE, OBJECT_MODIFIERS_FILE,
    PERKS_FILE, load_catalog_weapons, load_components, load_craftable_objects, load_esms,
    load_game_weapons, load_loose_mods, load_models, load_object_modifiers, load_perks,
};
pub use error::{LoadError, ResolveError};
pub use resolver::{Resolution, UnresolvedReason, resolve};
pub use types::{RecipeShape, SearchOutcome, WeaponMod, WeaponModGroup, aggregate_image};

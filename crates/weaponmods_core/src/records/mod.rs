pub mod wiki;
pub mod xedit;

pub use wiki::{BASE_GAME_FILE, CatalogWeapon, Esm, Model, Perk};
pub use xedit::{
    Component, ComponentCount, CraftableObject, Effect, EffectValue, GameWeapon, LooseMod,
    ObjectModifier, PerkRequirement,
};

use serde_json::{Map as JsonMap, Value as JsonValue, json};
use weaponmods_core::core_api::{WeaponMod, WeaponModGroup};
use weaponmods_core::records::{
    CatalogWeapon, CraftableObject, Effect, EffectValue, GameWeapon, LooseMod, ObjectModifier,
};

/// The group as JSON. Records keep the field names of the input files and
/// resolved references carry the key of the record they resolved to.
pub fn render_json(group: &WeaponModGroup<'_>) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("query".to_string(), JsonValue::from(group.query()));
    out.insert("name".to_string(), JsonValue::from(group.name()));
    out.insert("image".to_string(), JsonValue::from(group.image()));
    out.insert(
        "games".to_string(),
        JsonValue::Array(
            group
                .games()
                .iter()
                .map(|game| JsonValue::from(game.abbreviation.as_str()))
                .collect(),
        ),
    );
    out.insert(
        "mods".to_string(),
        JsonValue::Array(group.mods().iter().map(weapon_mod_to_json).collect()),
    );
    JsonValue::Object(out)
}

fn weapon_mod_to_json(weapon_mod: &WeaponMod<'_>) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert(
        "baseid".to_string(),
        JsonValue::from(weapon_mod.form_id_template()),
    );
    m.insert(
        "looseMod".to_string(),
        loose_mod_to_json(weapon_mod.loose_mod()),
    );
    m.insert(
        "objectModifier".to_string(),
        object_modifier_to_json(weapon_mod),
    );
    m.insert(
        "craftableObject".to_string(),
        craftable_object_to_json(weapon_mod),
    );
    m.insert(
        "weapon".to_string(),
        catalog_weapon_to_json(weapon_mod.weapon()),
    );
    m.insert(
        "gameWeapon".to_string(),
        weapon_mod
            .game_weapon()
            .map_or(JsonValue::Null, game_weapon_to_json),
    );
    JsonValue::Object(m)
}

fn loose_mod_to_json(loose_mod: &LooseMod) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("file".to_string(), JsonValue::from(loose_mod.file.file_name.as_str()));
    m.insert("formID".to_string(), JsonValue::from(loose_mod.form_id.id()));
    m.insert("editorID".to_string(), JsonValue::from(loose_mod.editor_id.as_str()));
    m.insert("name".to_string(), JsonValue::from(loose_mod.name.as_str()));
    m.insert("value".to_string(), JsonValue::from(loose_mod.value));
    m.insert("weight".to_string(), JsonValue::from(loose_mod.weight));
    m.insert(
        "model".to_string(),
        loose_mod
            .model
            .as_ref()
            .map_or(JsonValue::Null, |model| JsonValue::from(model.model.as_str())),
    );
    JsonValue::Object(m)
}

fn object_modifier_to_json(weapon_mod: &WeaponMod<'_>) -> JsonValue {
    let modifier: &ObjectModifier = weapon_mod.object_modifier();
    let mut m = JsonMap::new();
    m.insert("file".to_string(), JsonValue::from(modifier.file.file_name.as_str()));
    m.insert("formID".to_string(), JsonValue::from(modifier.form_id.id()));
    m.insert("editorID".to_string(), JsonValue::from(modifier.editor_id.as_str()));
    m.insert("name".to_string(), JsonValue::from(modifier.name.as_str()));
    m.insert(
        "description".to_string(),
        JsonValue::from(modifier.description.as_str()),
    );
    m.insert(
        "looseMod".to_string(),
        JsonValue::from(weapon_mod.loose_mod().editor_id.as_str()),
    );
    m.insert(
        "weapon".to_string(),
        JsonValue::from(weapon_mod.weapon().keyword.as_str()),
    );
    m.insert(
        "effects".to_string(),
        JsonValue::Array(modifier.effects.iter().map(effect_to_json).collect()),
    );
    JsonValue::Object(m)
}

fn effect_to_json(effect: &Effect) -> JsonValue {
    json!({
        "valueType": effect.value_type,
        "functionType": effect.function_type,
        "property": effect.property,
        "value1": effect_value_to_json(&effect.value1),
        "value2": effect_value_to_json(&effect.value2),
        "step": effect.step,
    })
}

fn effect_value_to_json(value: &EffectValue) -> JsonValue {
    match value {
        EffectValue::Bool(flag) => JsonValue::from(*flag),
        EffectValue::Int(number) => JsonValue::from(*number),
        EffectValue::Number(number) => JsonValue::from(*number),
        EffectValue::Text(text) => JsonValue::from(text.as_str()),
    }
}

/// The recipe with components and perks replaced by the records they
/// resolved to. Unresolved components are not listed.
fn craftable_object_to_json(weapon_mod: &WeaponMod<'_>) -> JsonValue {
    let recipe: &CraftableObject = weapon_mod.craftable_object();
    let mut m = JsonMap::new();
    m.insert("file".to_string(), JsonValue::from(recipe.file.file_name.as_str()));
    m.insert("formID".to_string(), JsonValue::from(recipe.form_id.id()));
    m.insert("editorID".to_string(), JsonValue::from(recipe.editor_id.as_str()));
    m.insert(
        "createdMod".to_string(),
        JsonValue::from(weapon_mod.object_modifier().editor_id.as_str()),
    );
    m.insert(
        "components".to_string(),
        JsonValue::Array(
            weapon_mod
                .components()
                .iter()
                .map(|(component, count)| {
                    json!({
                        "component": component.editor_id,
                        "name": component.name,
                        "count": count,
                    })
                })
                .collect(),
        ),
    );
    m.insert(
        "conditions".to_string(),
        JsonValue::Array(
            weapon_mod
                .perks()
                .iter()
                .map(|(perk, rank)| {
                    json!({
                        "perk": perk.editor_id,
                        "name": perk.name,
                        "rank": rank,
                    })
                })
                .collect(),
        ),
    );
    JsonValue::Object(m)
}

fn catalog_weapon_to_json(weapon: &CatalogWeapon) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("file".to_string(), JsonValue::from(weapon.file.file_name.as_str()));
    m.insert("keyword".to_string(), JsonValue::from(weapon.keyword.as_str()));
    m.insert("formID".to_string(), JsonValue::from(weapon.form_id.id()));
    m.insert("name".to_string(), JsonValue::from(weapon.name.as_str()));
    m.insert("page".to_string(), JsonValue::from(weapon.page.as_str()));
    JsonValue::Object(m)
}

fn game_weapon_to_json(weapon: &GameWeapon) -> JsonValue {
    json!({
        "file": weapon.file.file_name,
        "formID": weapon.form_id.id(),
        "editorID": weapon.editor_id,
        "name": weapon.name,
        "keyword": weapon.keyword,
        "speed": weapon.speed,
        "reloadSpeed": weapon.reload_speed,
        "reach": weapon.reach,
        "minRange": weapon.min_range,
        "maxRange": weapon.max_range,
        "attackDelay": weapon.attack_delay,
        "weight": weapon.weight,
        "value": weapon.value,
        "baseDamage": weapon.base_damage,
    })
}

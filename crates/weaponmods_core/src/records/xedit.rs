//! Records exported from the game data by xEdit scripts.
//!
//! Each `Raw*` type is the decoded JSON row with its references still held
//! as strings. The loader links ESM and model references and keeps the rest
//! as key strings for the resolver.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::form_id::FormId;
use crate::records::wiki::{Esm, Model};

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawComponent {
    pub file: String,
    #[serde(rename = "formID")]
    pub form_id: String,
    #[serde(rename = "editorID")]
    pub editor_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub file: Rc<Esm>,
    pub form_id: FormId,
    pub editor_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawGameWeapon {
    pub file: String,
    #[serde(rename = "formID")]
    pub form_id: String,
    #[serde(rename = "editorID")]
    pub editor_id: String,
    pub name: String,
    #[serde(default)]
    pub keyword: Option<String>,
    pub speed: f64,
    pub reload_speed: f64,
    pub reach: f64,
    pub min_range: f64,
    pub max_range: f64,
    pub attack_delay: f64,
    pub weight: f64,
    pub value: i64,
    pub base_damage: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameWeapon {
    pub file: Rc<Esm>,
    pub form_id: FormId,
    pub editor_id: String,
    pub name: String,
    /// Keyword of the catalog weapon this record was matched to.
    pub keyword: String,
    pub speed: f64,
    pub reload_speed: f64,
    pub reach: f64,
    pub min_range: f64,
    pub max_range: f64,
    pub attack_delay: f64,
    pub weight: f64,
    pub value: i64,
    pub base_damage: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawLooseMod {
    pub file: String,
    #[serde(rename = "formID")]
    pub form_id: String,
    #[serde(rename = "editorID")]
    pub editor_id: String,
    pub name: String,
    pub value: i64,
    pub weight: f64,
    #[serde(default)]
    pub model: Option<String>,
}

/// The inventory item of a weapon mod.
#[derive(Debug, Clone, PartialEq)]
pub struct LooseMod {
    pub file: Rc<Esm>,
    pub form_id: FormId,
    pub editor_id: String,
    pub name: String,
    pub value: i64,
    pub weight: f64,
    pub model: Option<Rc<Model>>,
}

/// An operand of an object modifier effect. Most are numbers; the engine
/// stores form references as text. Integers stay integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectValue {
    Bool(bool),
    Int(i64),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub value_type: String,
    pub function_type: String,
    pub property: String,
    pub value1: EffectValue,
    pub value2: EffectValue,
    pub step: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawObjectModifier {
    pub file: String,
    #[serde(rename = "formID")]
    pub form_id: String,
    #[serde(rename = "editorID")]
    pub editor_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub loose_mod: Option<String>,
    #[serde(default)]
    pub weapon: Option<String>,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

/// The mechanical half of a weapon mod.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectModifier {
    pub file: Rc<Esm>,
    pub form_id: FormId,
    pub editor_id: String,
    pub name: String,
    pub description: String,
    /// Editor ID of the loose mod this modifier belongs to.
    pub loose_mod: Option<String>,
    /// Keyword of the weapon this modifier attaches to.
    pub weapon: Option<String>,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentCount {
    pub component: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerkRequirement {
    pub perk: String,
    pub rank: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCraftableObject {
    pub file: String,
    #[serde(rename = "formID")]
    pub form_id: String,
    #[serde(rename = "editorID")]
    pub editor_id: String,
    #[serde(default)]
    pub created_mod: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentCount>,
    #[serde(default)]
    pub conditions: Vec<PerkRequirement>,
}

/// A workbench recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftableObject {
    pub file: Rc<Esm>,
    pub form_id: FormId,
    pub editor_id: String,
    /// Editor ID of the object modifier this recipe produces.
    pub created_mod: Option<String>,
    pub components: Vec<ComponentCount>,
    pub conditions: Vec<PerkRequirement>,
}

#[cfg(test)]
mod tests {
    use super::{Effect, EffectValue};

    #[test]
    fn effect_operands_keep_their_json_type() {
        let effect: Effect = serde_json::from_str(
            r#"{"valueType": "Int", "functionType": "ADD", "property": "AmmoCapacity",
                "value1": 5, "value2": 0.5, "step": 0}"#,
        )
        .expect("valid effect");
        assert_eq!(effect.value1, EffectValue::Int(5));
        assert_eq!(effect.value2, EffectValue::Number(0.5));

        let effect: Effect = serde_json::from_str(
            r#"{"valueType": "Bool", "functionType": "SET", "property": "IsAutomatic",
                "value1": true, "value2": "dn_HasReceiver_Automatic", "step": 0}"#,
        )
        .expect("valid effect");
        assert_eq!(effect.value1, EffectValue::Bool(true));
        assert_eq!(
            effect.value2,
            EffectValue::Text("dn_HasReceiver_Automatic".to_string())
        );
    }
}

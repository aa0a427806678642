use std::path::PathBuf;

use serde_json::{Value, json};
use weaponmods_core::core_api::{DataPaths, GameDatabase, SearchOutcome, WeaponModGroup};
use weaponmods_render::{crafting_table, render_article, render_json};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn load_fixtures() -> GameDatabase {
    let fixtures = workspace_root().join("tests/fixtures");
    GameDatabase::load(&DataPaths::new(
        fixtures.join("reference"),
        fixtures.join("game"),
    ))
    .expect("fixtures should load")
}

fn search<'db>(db: &'db GameDatabase, query: &str) -> WeaponModGroup<'db> {
    match db.search(query) {
        SearchOutcome::Found(group) => group,
        SearchOutcome::NoResults { query } => panic!("expected results for `{query}`"),
    }
}

const CHAOTIC_ARTICLE: &str = "\
{{Infobox item
|games    =FO4
|type     =mod
|icon     =
|image    =Fo4 10mm chaotic receiver.png
|effects  =<!-- Variable -->
|modifies =[[10mm pistol (Fallout 4)|10mm pistol]]
|value    =45
|weight   =1.5
|baseid   ={{ID|01a2b3}}
}}{{Games|FO4}}

The '''Chaotic Receiver''' is a [[Fallout 4 weapon mods|weapon mod]] in ''[[Fallout 4]]''.

==Effects==
{{Weapon mod effects|start}}
{{Weapon mod effects|row|weapon=10mm pistol|desc=Damage is randomized.|prefix=Chaotic}}
{{Weapon mod effects|end}}

==Production==
{{Crafting table
|type       =
|material1  =adhesive
|material#1 =2
|material2  =steel
|material#2 =4
|workspace  =[[Weapons workbench]]
|perk1      =Gun Nut (1)
|product1   =Chaotic Receiver
|product#1  =1
}}

==Location==
The Chaotic Receiver can be crafted at any [[weapons workbench]].

{{Navbox weapon mods FO4}}

[[Category:Fallout 4 weapon mods]]

";

#[test]
fn single_mod_article_matches_wiki_layout() {
    let db = load_fixtures();
    let group = search(&db, "Chaotic");
    assert_eq!(render_article(&group), CHAOTIC_ARTICLE);
}

#[test]
fn differing_values_are_listed_per_weapon() {
    let db = load_fixtures();
    let article = render_article(&search(&db, "Calibrated"));

    assert!(article.starts_with("{{Infobox item\n|games    =FO4AUT, FO4\n"));
    assert!(article.contains(
        "|modifies =[[10mm pistol (Fallout 4)|10mm pistol]]<br />[[Pipe gun]]<br />[[Tesla rifle]]\n"
    ));
    assert!(article.contains("|value    =60 (10mm pistol)<br />25 (Pipe gun)<br />80 (Tesla rifle)\n"));
    assert!(article.contains("|weight   =1.5\n"));
    assert!(article.contains(
        "|baseid   ={{ID|01c0de}} (10mm pistol)<br />{{ID|02ca11}} (Pipe gun)<br />{{DLC ID|00ca1b}} (Tesla rifle)\n"
    ));
    assert!(article.contains("}}{{Games|FO4AUT|FO4}}\n\n"));
}

#[test]
fn add_on_appearance_is_phrased_after_base_game() {
    let db = load_fixtures();
    let article = render_article(&search(&db, "Calibrated"));
    assert!(article.contains(
        "in ''[[Fallout 4]]'' and its [[Fallout 4 add-ons|add-on]] ''[[Automatron (add-on)|Automatron]]''.\n\n"
    ));
    assert!(article.ends_with(
        "[[Category:Automatron weapon mods]]\n[[Category:Fallout 4 weapon mods]]\n\n"
    ));
}

#[test]
fn differing_recipes_get_a_subsection_per_weapon() {
    let db = load_fixtures();
    let article = render_article(&search(&db, "Calibrated"));

    assert!(article.contains("==Production==\n===[[10mm pistol (Fallout 4)|10mm pistol]]===\n{{Crafting table\n"));
    assert!(article.contains("}}\n\n===[[Pipe gun]]===\n{{Crafting table\n"));
    assert!(article.contains("}}\n\n===[[Tesla rifle]]===\n{{Crafting table\n"));
    assert!(article.contains("|perk1      =Science! (1)\n"));
    assert_eq!(article.matches("{{Crafting table").count(), 3);
}

#[test]
fn crafting_table_lists_materials_by_name() {
    let db = load_fixtures();
    let group = search(&db, "Heavy Grip");
    let table = crafting_table(&group.mods()[0], "Heavy Grip");

    assert_eq!(table.get("material1"), Some("adhesive"));
    assert_eq!(table.get("material#1"), Some("1"));
    assert_eq!(table.get("material2"), Some("steel"));
    assert_eq!(table.get("material#2"), Some("5"));
    assert_eq!(table.get("perk1"), Some("Gun Nut (2)"));
    assert_eq!(table.get("material3"), None);
}

#[test]
fn json_uses_stable_top_level_order() {
    let db = load_fixtures();
    let value = render_json(&search(&db, "Chaotic"));
    let keys: Vec<&str> = value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["query", "name", "image", "games", "mods"]);

    let mod_keys: Vec<&str> = value["mods"][0]
        .as_object()
        .expect("mod should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        mod_keys,
        vec![
            "baseid",
            "looseMod",
            "objectModifier",
            "craftableObject",
            "weapon",
            "gameWeapon"
        ]
    );
}

#[test]
fn json_references_use_resolved_keys() {
    let db = load_fixtures();
    let value = render_json(&search(&db, "Chaotic"));
    let weapon_mod = &value["mods"][0];

    // The object modifier spells both references in upper case.
    assert_eq!(
        weapon_mod["objectModifier"]["looseMod"],
        json!("miscmod_mod_10mm_Receiver_Chaotic")
    );
    assert_eq!(weapon_mod["objectModifier"]["weapon"], json!("ma_10mm"));
    assert_eq!(
        weapon_mod["objectModifier"]["effects"][1]["value1"],
        json!("dn_HasReceiver_Chaotic")
    );
    assert_eq!(
        weapon_mod["craftableObject"]["components"],
        json!([
            {"component": "c_Steel", "name": "steel", "count": 4},
            {"component": "c_Adhesive", "name": "adhesive", "count": 2},
        ])
    );
    assert_eq!(
        weapon_mod["craftableObject"]["conditions"],
        json!([{"perk": "GunNut01", "name": "Gun Nut", "rank": 1}])
    );
    assert_eq!(weapon_mod["gameWeapon"]["editorID"], json!("10mm"));
    assert_eq!(weapon_mod["looseMod"]["formID"], json!("01a2b3"));
    assert_eq!(value["games"], json!(["FO4"]));
    assert_eq!(value["image"], Value::from("Fo4 10mm chaotic receiver.png"));
}

#[test]
fn json_effect_operands_keep_integers() {
    let db = load_fixtures();
    let value = render_json(&search(&db, "Chaotic"));
    let effects = &value["mods"][0]["objectModifier"]["effects"];

    assert_eq!(effects[0]["value1"], json!(0.25));
    assert!(effects[1]["value2"].is_i64());
    assert_eq!(effects[1]["value2"], json!(1));
}

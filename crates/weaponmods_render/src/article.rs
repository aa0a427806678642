use weaponmods_core::core_api::{WeaponMod, WeaponModGroup};
use weaponmods_core::records::{CatalogWeapon, Esm};

use crate::markup::{Article, Section, WikiTemplate, capitalize, capitalized_link, category, link};

const INFOBOX_TEMPLATE: &str = "Infobox item";
const CRAFTING_TEMPLATE: &str = "Crafting table";
const EFFECTS_TEMPLATE: &str = "Weapon mod effects";
const NAVBOX_TEMPLATE: &str = "Navbox weapon mods FO4";
const WORKSPACE: &str = "[[Weapons workbench]]";
const WEAPON_MODS_LINK: &str = "[[Fallout 4 weapon mods|weapon mod]]";

pub fn render_article(group: &WeaponModGroup<'_>) -> String {
    build_article(group).render()
}

pub fn build_article(group: &WeaponModGroup<'_>) -> Article {
    let games = group.games();
    Article {
        infoboxes: vec![infobox(group, &games)],
        games: games.iter().map(|game| game.abbreviation.clone()).collect(),
        intro: format!(
            "The '''{}''' is a {WEAPON_MODS_LINK} in {}.",
            group.name(),
            appearance(&games)
        ),
        sections: vec![
            effects_section(group),
            production_section(group),
            location_section(group),
        ],
        navboxes: vec![WikiTemplate::new(NAVBOX_TEMPLATE)],
        categories: mod_categories(&games),
    }
}

fn infobox(group: &WeaponModGroup<'_>, games: &[&Esm]) -> WikiTemplate {
    let modifies = group
        .mods()
        .iter()
        .map(|weapon_mod| weapon_link(weapon_mod.weapon()))
        .collect::<Vec<_>>()
        .join("<br />");

    WikiTemplate::new(INFOBOX_TEMPLATE)
        .param(
            "games",
            games
                .iter()
                .map(|game| game.abbreviation.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
        .param("type", "mod")
        .param("icon", "")
        .param("image", group.image())
        .param("effects", "<!-- Variable -->")
        .param("modifies", modifies)
        .param("value", per_weapon(group, |m| m.value().to_string()))
        .param("weight", per_weapon(group, |m| m.weight().to_string()))
        .param("baseid", per_weapon(group, |m| m.form_id_template()))
}

/// The shared value when every mod agrees, else `value (Weapon)` per mod.
fn per_weapon(group: &WeaponModGroup<'_>, value: impl Fn(&WeaponMod<'_>) -> String) -> String {
    let values: Vec<String> = group.mods().iter().map(&value).collect();
    match values.split_first() {
        Some((first, rest)) if rest.iter().all(|other| other == first) => first.clone(),
        _ => group
            .mods()
            .iter()
            .zip(&values)
            .map(|(weapon_mod, value)| {
                format!("{value} ({})", capitalize(&weapon_mod.weapon().name))
            })
            .collect::<Vec<_>>()
            .join("<br />"),
    }
}

/// "''[[Fallout 4]]''", optionally followed by its add-ons.
fn appearance(games: &[&Esm]) -> String {
    let (base, add_ons): (Vec<&Esm>, Vec<&Esm>) =
        games.iter().copied().partition(|game| game.is_base_game());
    let add_on_list = italic_list(&add_ons);
    match (base.first(), add_ons.len()) {
        (Some(base), 0) => italic(base),
        (Some(base), 1) => format!(
            "{} and its [[Fallout 4 add-ons|add-on]] {add_on_list}",
            italic(base)
        ),
        (Some(base), _) => format!(
            "{} and its [[Fallout 4 add-ons|add-ons]] {add_on_list}",
            italic(base)
        ),
        (None, _) => add_on_list,
    }
}

fn italic(game: &Esm) -> String {
    format!("''{}''", link(&game.page, &game.name))
}

/// `''A''`, `''A'' and ''B''`, `''A'', ''B'' and ''C''`.
fn italic_list(games: &[&Esm]) -> String {
    let items: Vec<String> = games.iter().copied().map(italic).collect();
    match items.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, init)) => format!("{} and {last}", init.join(", ")),
    }
}

fn effects_section(group: &WeaponModGroup<'_>) -> Section {
    let mut rows = vec![WikiTemplate::new(EFFECTS_TEMPLATE).arg("start").render_inline()];
    for weapon_mod in group.mods() {
        rows.push(
            WikiTemplate::new(EFFECTS_TEMPLATE)
                .arg("row")
                .param("weapon", capitalize(&weapon_mod.weapon().name))
                .param("desc", weapon_mod.description())
                .param("prefix", weapon_mod.prefix())
                .render_inline(),
        );
    }
    rows.push(WikiTemplate::new(EFFECTS_TEMPLATE).arg("end").render_inline());
    Section::new("Effects", rows.join("\n"))
}

fn production_section(group: &WeaponModGroup<'_>) -> Section {
    let product = capitalize(group.name());
    match group.mods() {
        [first, ..] if group.has_uniform_recipe() => Section::new(
            "Production",
            crafting_table(first, &product).render_multiline(),
        ),
        mods => Section::new("Production", "").subsections(
            mods.iter()
                .map(|weapon_mod| {
                    Section::new(
                        weapon_link(weapon_mod.weapon()),
                        crafting_table(weapon_mod, &product).render_multiline(),
                    )
                    .level(3)
                })
                .collect(),
        ),
    }
}

/// The `{{Crafting table}}` for one recipe. Materials and perks are
/// listed by name.
pub fn crafting_table(weapon_mod: &WeaponMod<'_>, product: &str) -> WikiTemplate {
    let mut materials: Vec<(&str, u32)> = weapon_mod
        .components()
        .iter()
        .map(|(component, count)| (component.name.as_str(), *count))
        .collect();
    materials.sort_by(|a, b| a.0.cmp(b.0));
    let mut perks: Vec<(&str, u32)> = weapon_mod
        .perks()
        .iter()
        .map(|(perk, rank)| (perk.name.as_str(), *rank))
        .collect();
    perks.sort_by(|a, b| a.0.cmp(b.0));

    let mut table = WikiTemplate::new(CRAFTING_TEMPLATE).param("type", "");
    for (index, (name, count)) in materials.iter().enumerate() {
        table.push(format!("material{}", index + 1), *name);
        table.push(format!("material#{}", index + 1), count.to_string());
    }
    table.push("workspace", WORKSPACE);
    for (index, (name, rank)) in perks.iter().enumerate() {
        table.push(format!("perk{}", index + 1), format!("{name} ({rank})"));
    }
    table.push("product1", product);
    table.push("product#1", "1");
    table
}

fn location_section(group: &WeaponModGroup<'_>) -> Section {
    Section::new(
        "Location",
        format!(
            "The {} can be crafted at any [[weapons workbench]].",
            group.name()
        ),
    )
}

fn mod_categories(games: &[&Esm]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for name in games.iter().filter_map(|game| game.mod_category.as_deref()) {
        let rendered = category(name);
        if !categories.contains(&rendered) {
            categories.push(rendered);
        }
    }
    categories
}

fn weapon_link(weapon: &CatalogWeapon) -> String {
    capitalized_link(&weapon.page, &weapon.name)
}

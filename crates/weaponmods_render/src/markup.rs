//! MediaWiki building blocks.

use std::fmt::Write as _;

/// Upper-cases the first character, the way wiki page titles are normalized.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `[[target|text]]`, or `[[text]]` when both name the same page.
pub fn link(target: &str, text: &str) -> String {
    if capitalize(target) == capitalize(text) {
        format!("[[{text}]]")
    } else {
        format!("[[{target}|{text}]]")
    }
}

/// Like [`link`] with the displayed text capitalized.
pub fn capitalized_link(target: &str, text: &str) -> String {
    link(target, &capitalize(text))
}

pub fn category(name: &str) -> String {
    link(&format!("Category:{name}"), &format!("Category:{name}"))
}

/// A template invocation with ordered parameters. Keys made only of digits
/// are positional and render without a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiTemplate {
    name: String,
    params: Vec<(String, String)>,
}

impl WikiTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Appends a positional parameter.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        let position = self.params.len() + 1;
        self.push(position.to_string(), value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.push((key.into(), value.into()));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// One parameter per line with the `=` signs aligned.
    pub fn render_multiline(&self) -> String {
        let width = self
            .params
            .iter()
            .map(|(key, _)| key.chars().count())
            .max()
            .unwrap_or(0)
            + 1;

        let mut out = String::new();
        writeln!(out, "{{{{{}", self.name).expect("writing to String cannot fail");
        for (key, value) in &self.params {
            if is_positional(key) {
                writeln!(out, "|{value}").expect("writing to String cannot fail");
            } else {
                writeln!(out, "|{key:<width$}={value}").expect("writing to String cannot fail");
            }
        }
        out.push_str("}}");
        out
    }

    pub fn render_inline(&self) -> String {
        let mut out = format!("{{{{{}", self.name);
        for (key, value) in &self.params {
            if is_positional(key) {
                write!(out, "|{value}").expect("writing to String cannot fail");
            } else {
                write!(out, "|{key}={value}").expect("writing to String cannot fail");
            }
        }
        out.push_str("}}");
        out
    }
}

fn is_positional(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    title: String,
    contents: String,
    level: usize,
    subsections: Vec<Section>,
}

impl Section {
    pub fn new(title: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            contents: contents.into(),
            level: 2,
            subsections: Vec::new(),
        }
    }

    pub fn level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    pub fn subsections(mut self, subsections: Vec<Section>) -> Self {
        self.subsections = subsections;
        self
    }

    pub fn render(&self) -> String {
        let marks = "=".repeat(self.level);
        let mut out = format!("{marks}{}{marks}\n{}", self.title, self.contents);
        if !self.subsections.is_empty() {
            if !self.contents.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(&join(self.subsections.iter().map(Section::render), "\n\n"));
        }
        out
    }
}

/// A complete wiki page. Empty parts are left out along with their spacing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    pub infoboxes: Vec<WikiTemplate>,
    pub games: Vec<String>,
    pub intro: String,
    pub sections: Vec<Section>,
    pub navboxes: Vec<WikiTemplate>,
    pub categories: Vec<String>,
}

impl Article {
    pub fn render(&self) -> String {
        let mut header = join(self.infoboxes.iter().map(WikiTemplate::render_multiline), "\n");
        if !self.games.is_empty() {
            let games = self
                .games
                .iter()
                .fold(WikiTemplate::new("Games"), |template, game| {
                    template.arg(game.as_str())
                });
            header.push_str(&games.render_inline());
        }

        let mut out = String::new();
        push_block(&mut out, header);
        push_block(&mut out, self.intro.clone());
        push_block(&mut out, join(self.sections.iter().map(Section::render), "\n\n"));
        push_block(
            &mut out,
            join(self.navboxes.iter().map(WikiTemplate::render_inline), "\n"),
        );
        push_block(&mut out, self.categories.join("\n"));
        out
    }
}

fn push_block(out: &mut String, block: String) {
    if !block.is_empty() {
        out.push_str(&block);
        out.push_str("\n\n");
    }
}

fn join(parts: impl Iterator<Item = String>, separator: &str) -> String {
    parts.collect::<Vec<_>>().join(separator)
}

#[cfg(test)]
mod tests {
    use super::{Article, Section, WikiTemplate, capitalize, capitalized_link, category, link};

    #[test]
    fn link_collapses_when_target_matches_text() {
        assert_eq!(link("Fallout 4", "Fallout 4"), "[[Fallout 4]]");
        assert_eq!(link("10mm pistol", "10mm pistol"), "[[10mm pistol]]");
        assert_eq!(link("Automatron (add-on)", "Automatron"), "[[Automatron (add-on)|Automatron]]");
        assert_eq!(link("Weapons workbench", "weapons workbench"), "[[weapons workbench]]");
    }

    #[test]
    fn capitalized_link_only_touches_text() {
        assert_eq!(capitalized_link("Pipe gun", "pipe gun"), "[[Pipe gun]]");
        assert_eq!(
            capitalized_link("Pipe gun (Fallout 4)", "pipe gun"),
            "[[Pipe gun (Fallout 4)|Pipe gun]]"
        );
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn category_links_to_category_namespace() {
        assert_eq!(category("Automatron weapon mods"), "[[Category:Automatron weapon mods]]");
    }

    #[test]
    fn multiline_template_aligns_keys() {
        let template = WikiTemplate::new("Infobox item")
            .param("type", "mod")
            .param("modifies", "[[10mm pistol]]")
            .param("icon", "");
        assert_eq!(
            template.render_multiline(),
            "{{Infobox item\n|type     =mod\n|modifies =[[10mm pistol]]\n|icon     =\n}}"
        );
    }

    #[test]
    fn inline_template_renders_positional_args_bare() {
        let template = WikiTemplate::new("Games").arg("FO4").arg("FO4AUT");
        assert_eq!(template.render_inline(), "{{Games|FO4|FO4AUT}}");

        let row = WikiTemplate::new("Effects").param("1", "row").param("weapon", "Pipe gun");
        assert_eq!(row.render_inline(), "{{Effects|row|weapon=Pipe gun}}");
    }

    #[test]
    fn section_joins_subsections() {
        let plain = Section::new("Location", "Somewhere.");
        assert_eq!(plain.render(), "==Location==\nSomewhere.");

        let nested = Section::new("Production", "").subsections(vec![
            Section::new("A", "one").level(3),
            Section::new("B", "two").level(3),
        ]);
        assert_eq!(nested.render(), "==Production==\n===A===\none\n\n===B===\ntwo");

        let with_contents = Section::new("Production", "intro")
            .subsections(vec![Section::new("A", "one").level(3)]);
        assert_eq!(with_contents.render(), "==Production==\nintro\n\n===A===\none");
    }

    #[test]
    fn article_skips_empty_parts() {
        let article = Article {
            intro: "Hello.".to_string(),
            categories: vec![category("Mods")],
            ..Article::default()
        };
        assert_eq!(article.render(), "Hello.\n\n[[Category:Mods]]\n\n");
    }

    #[test]
    fn article_header_appends_games_to_infobox() {
        let article = Article {
            infoboxes: vec![WikiTemplate::new("Infobox item").param("type", "mod")],
            games: vec!["FO4".to_string()],
            intro: "Hi.".to_string(),
            ..Article::default()
        };
        assert_eq!(
            article.render(),
            "{{Infobox item\n|type =mod\n}}{{Games|FO4}}\n\nHi.\n\n"
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeEntry {
    pub name: &'static str,
    pub slug: &'static str,
    pub color: &'static str,
    pub accent: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssetEntry {
    pub name: &'static str,
    pub icon: &'static str,
    pub theme: &'static str,
}

include!(concat!(env!("OUT_DIR"), "/sandplay_catalog.rs"));

pub fn theme_by_slug(slug: &str) -> Option<&'static ThemeEntry> {
    let trimmed = slug.trim();
    THEME_CATALOG
        .iter()
        .find(|entry| entry.slug.eq_ignore_ascii_case(trimmed))
}

pub fn theme_by_name(name: &str) -> Option<&'static ThemeEntry> {
    let trimmed = name.trim();
    THEME_CATALOG
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(trimmed))
}

/// Resolves either a slug ("deep-sea") or a display name ("Deep Sea").
pub fn find_theme(value: &str) -> Option<&'static ThemeEntry> {
    theme_by_slug(value).or_else(|| theme_by_name(value))
}

pub fn default_theme() -> &'static ThemeEntry {
    theme_by_slug(DEFAULT_THEME_SLUG).unwrap_or(&THEME_CATALOG[0])
}

pub fn assets_for_theme(slug: &str) -> impl Iterator<Item = &'static AssetEntry> + '_ {
    ASSET_CATALOG
        .iter()
        .filter(move |entry| entry.theme.eq_ignore_ascii_case(slug.trim()))
}

pub fn asset_by_name(name: &str) -> Option<&'static AssetEntry> {
    let trimmed = name.trim();
    ASSET_CATALOG
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(trimmed))
}

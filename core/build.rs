use std::collections::HashSet;
use std::env;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Deserialize)]
struct CatalogFile {
    default_theme: Option<String>,
    themes: Vec<ThemeEntry>,
    assets: Vec<AssetEntry>,
}

#[derive(Deserialize)]
struct ThemeEntry {
    name: String,
    slug: String,
    color: String,
    accent: String,
}

#[derive(Deserialize)]
struct AssetEntry {
    name: String,
    icon: String,
    theme: String,
}

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("missing CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir.parent().unwrap_or(&manifest_dir);
    let env_path = workspace_root.join(".env");
    let env_local_path = workspace_root.join(".env.local");

    let _ = dotenvy::from_filename(&env_local_path);
    let _ = dotenvy::from_filename(&env_path);

    println!("cargo:rerun-if-env-changed=SANDPLAY_CATALOG_PATH");
    println!("cargo:rerun-if-changed={}", env_path.display());
    println!("cargo:rerun-if-changed={}", env_local_path.display());

    let catalog_path = resolve_catalog_path(workspace_root);
    println!("cargo:rerun-if-changed={}", catalog_path.display());

    let contents = fs::read_to_string(&catalog_path).unwrap_or_else(|err| {
        panic!(
            "failed to read asset catalog at {}: {err}",
            catalog_path.display()
        )
    });

    let catalog: CatalogFile = toml::from_str(&contents).unwrap_or_else(|err| {
        panic!(
            "failed to parse asset catalog at {}: {err}",
            catalog_path.display()
        )
    });

    if catalog.themes.is_empty() {
        panic!("asset catalog {} has no themes", catalog_path.display());
    }

    validate_themes(&catalog.themes, &catalog_path);
    validate_assets(&catalog.assets, &catalog.themes, &catalog_path);

    let default_theme = catalog
        .default_theme
        .as_deref()
        .unwrap_or(catalog.themes[0].slug.as_str());
    if !catalog.themes.iter().any(|theme| theme.slug == default_theme) {
        panic!(
            "default_theme '{}' not found in {}",
            default_theme,
            catalog_path.display()
        );
    }

    let mut output = String::new();
    writeln!(
        &mut output,
        "pub const DEFAULT_THEME_SLUG: &str = {};",
        rust_string(default_theme)
    )
    .unwrap();
    writeln!(&mut output).unwrap();
    writeln!(&mut output, "pub const THEME_CATALOG: &[ThemeEntry] = &[").unwrap();
    for theme in &catalog.themes {
        writeln!(&mut output, "    ThemeEntry {{").unwrap();
        writeln!(&mut output, "        name: {},", rust_string(&theme.name)).unwrap();
        writeln!(&mut output, "        slug: {},", rust_string(&theme.slug)).unwrap();
        writeln!(&mut output, "        color: {},", rust_string(&theme.color)).unwrap();
        writeln!(&mut output, "        accent: {},", rust_string(&theme.accent)).unwrap();
        writeln!(&mut output, "    }},").unwrap();
    }
    writeln!(&mut output, "];").unwrap();
    writeln!(&mut output).unwrap();
    writeln!(&mut output, "pub const ASSET_CATALOG: &[AssetEntry] = &[").unwrap();
    for asset in &catalog.assets {
        writeln!(&mut output, "    AssetEntry {{").unwrap();
        writeln!(&mut output, "        name: {},", rust_string(&asset.name)).unwrap();
        writeln!(&mut output, "        icon: {},", rust_string(&asset.icon)).unwrap();
        writeln!(&mut output, "        theme: {},", rust_string(&asset.theme)).unwrap();
        writeln!(&mut output, "    }},").unwrap();
    }
    writeln!(&mut output, "];").unwrap();

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("missing OUT_DIR"));
    let out_path = out_dir.join("sandplay_catalog.rs");
    fs::write(&out_path, output).unwrap_or_else(|err| {
        panic!("failed to write {}: {err}", out_path.display())
    });
}

fn resolve_catalog_path(workspace_root: &Path) -> PathBuf {
    let env_value = env::var("SANDPLAY_CATALOG_PATH").ok();
    let raw_path = match env_value {
        Some(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => workspace_root.join("assets/catalog.toml"),
    };
    if raw_path.is_relative() {
        workspace_root.join(raw_path)
    } else {
        raw_path
    }
}

fn rust_string(value: &str) -> String {
    format!("{:?}", value)
}

fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|ch| ch.is_ascii_hexdigit())
}

fn validate_themes(themes: &[ThemeEntry], catalog_path: &Path) {
    let mut slugs = HashSet::new();
    let mut names = HashSet::new();

    for theme in themes {
        if theme.slug.trim().is_empty() {
            panic!("theme slug cannot be empty in {}", catalog_path.display());
        }
        if theme.name.trim().is_empty() {
            panic!(
                "theme '{}' has an empty name in {}",
                theme.slug,
                catalog_path.display()
            );
        }
        if !is_hex_color(&theme.color) || !is_hex_color(&theme.accent) {
            panic!(
                "theme '{}' colors must be #rgb or #rrggbb in {}",
                theme.slug,
                catalog_path.display()
            );
        }
        if !slugs.insert(theme.slug.clone()) {
            panic!(
                "duplicate theme slug '{}' in {}",
                theme.slug,
                catalog_path.display()
            );
        }
        if !names.insert(theme.name.to_ascii_lowercase()) {
            panic!(
                "duplicate theme name '{}' in {}",
                theme.name,
                catalog_path.display()
            );
        }
    }
}

fn validate_assets(assets: &[AssetEntry], themes: &[ThemeEntry], catalog_path: &Path) {
    let mut names = HashSet::new();

    for asset in assets {
        if asset.name.trim().is_empty() {
            panic!("asset name cannot be empty in {}", catalog_path.display());
        }
        if asset.icon.trim().is_empty() {
            panic!(
                "asset '{}' has an empty icon in {}",
                asset.name,
                catalog_path.display()
            );
        }
        if !themes.iter().any(|theme| theme.slug == asset.theme) {
            panic!(
                "asset '{}' references unknown theme '{}' in {}",
                asset.name,
                asset.theme,
                catalog_path.display()
            );
        }
        if !names.insert(asset.name.to_ascii_lowercase()) {
            panic!(
                "duplicate asset name '{}' in {}",
                asset.name,
                catalog_path.display()
            );
        }
    }
}

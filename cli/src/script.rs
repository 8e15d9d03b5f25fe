use std::fs;
use std::path::Path;

use sandplay::{ReflectError, ReflectionRequest, Reflector, SandplaySession, SessionError};
use sandplay_core::catalog::asset_by_name;
use sandplay_core::{GridCoord, ObjectId, PendingAsset, Reframe, ReframeKind, TalismanSummary};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse script: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown asset '{0}'")]
    UnknownAsset(String),
    #[error("unknown reframe kind '{0}'")]
    UnknownReframe(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// A recorded build session: the theme, what the hands did on the tray, and
/// the answers the reflection service would give.
#[derive(Debug, Deserialize)]
pub struct ReplayScript {
    pub theme: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub reframes: Vec<ScriptReframe>,
    pub talisman: ScriptTalisman,
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Select { asset: String },
    Generate { prompt: String, url: String },
    Drop { col: u32, row: u32 },
    Move { object: u64, col: u32, row: u32 },
    Remove { object: u64 },
    Clear,
}

#[derive(Debug, Deserialize)]
pub struct ScriptReframe {
    pub kind: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub struct ScriptTalisman {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub accent: String,
    pub mood: String,
}

impl ReplayScript {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let raw = fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_steps(&self, session: &mut SandplaySession) -> Result<(), ScriptError> {
        for step in &self.steps {
            match step {
                Step::Select { asset } => {
                    let entry = asset_by_name(asset)
                        .ok_or_else(|| ScriptError::UnknownAsset(asset.clone()))?;
                    session.select_asset(PendingAsset::from_entry(entry))?;
                }
                Step::Generate { prompt, url } => {
                    session.select_asset(PendingAsset::generated(prompt.as_str(), url.as_str()))?;
                }
                Step::Drop { col, row } => {
                    if session.target_cell(GridCoord::new(*col, *row))?.is_none() {
                        tracing::debug!(col, row, "cell held until an asset is chosen");
                    }
                }
                Step::Move { object, col, row } => {
                    if !session.move_object(ObjectId(*object), GridCoord::new(*col, *row))? {
                        tracing::warn!(object, "move skipped, object not on tray");
                    }
                }
                Step::Remove { object } => {
                    if !session.remove_object(ObjectId(*object))? {
                        tracing::warn!(object, "remove skipped, object not on tray");
                    }
                }
                Step::Clear => session.clear_scene()?,
            }
        }
        Ok(())
    }

    pub fn reflector(&self) -> Result<ScriptedReflector, ScriptError> {
        let reframes = self
            .reframes
            .iter()
            .map(|entry| {
                let kind = ReframeKind::parse(&entry.kind)
                    .ok_or_else(|| ScriptError::UnknownReframe(entry.kind.clone()))?;
                Ok(Reframe {
                    kind,
                    title: entry.title.clone(),
                    content: entry.content.clone(),
                    color: entry.color.clone(),
                })
            })
            .collect::<Result<Vec<_>, ScriptError>>()?;
        Ok(ScriptedReflector {
            reframes,
            summary: TalismanSummary {
                name: self.talisman.name.clone(),
                image_url: self.talisman.image_url.clone(),
                accent: self.talisman.accent.clone(),
                mood: self.talisman.mood.clone(),
            },
        })
    }
}

/// Answers reflection requests with canned results.
#[derive(Debug, Clone)]
pub struct ScriptedReflector {
    reframes: Vec<Reframe>,
    summary: TalismanSummary,
}

impl Reflector for ScriptedReflector {
    fn reframes(&self, request: &ReflectionRequest) -> Result<Vec<Reframe>, ReflectError> {
        tracing::debug!(layout = %request.layout, "scripted reframes");
        Ok(self.reframes.clone())
    }

    fn summarize(&self, _request: &ReflectionRequest) -> Result<TalismanSummary, ReflectError> {
        if self.summary.name.trim().is_empty() {
            return Err(ReflectError::Malformed("talisman has no name".to_string()));
        }
        Ok(self.summary.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandplay::Phase;

    const SCRIPT: &str = r##"
theme = "deep-sea"

[[steps]]
action = "drop"
col = 4
row = 9

[[steps]]
action = "select"
asset = "Heavy Anchor"

[[steps]]
action = "generate"
prompt = "a paper boat"
url = "https://img.test/boat.png"

[[steps]]
action = "drop"
col = 30
row = 0

[[steps]]
action = "move"
object = 1
col = 6
row = 6

[[steps]]
action = "remove"
object = 9

[[reframes]]
kind = "poet"
title = "Weight"
content = "The anchor remembers the shore."

[[reframes]]
kind = "Mirror"
title = "Holding"
content = "You kept one thing still."

[talisman]
name = "Harbor Stone"
accent = "#075985"
mood = "Steady"
"##;

    #[test]
    fn parses_tagged_steps() {
        let script = ReplayScript::parse(SCRIPT).unwrap();
        assert_eq!(script.theme, "deep-sea");
        assert_eq!(script.steps.len(), 6);
        assert_eq!(script.steps[0], Step::Drop { col: 4, row: 9 });
        assert_eq!(
            script.steps[1],
            Step::Select {
                asset: "Heavy Anchor".to_string()
            }
        );
        assert_eq!(script.talisman.image_url, None);
    }

    #[test]
    fn clear_step_needs_no_fields() {
        let raw = "theme = \"forest\"\n[[steps]]\naction = \"clear\"\n[talisman]\nname = \"x\"\naccent = \"#000\"\nmood = \"m\"\n";
        let script = ReplayScript::parse(raw).unwrap();
        assert_eq!(script.steps, vec![Step::Clear]);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let raw = "theme = \"forest\"\n[[steps]]\naction = \"shake\"\n[talisman]\nname = \"x\"\naccent = \"#000\"\nmood = \"m\"\n";
        assert!(matches!(ReplayScript::parse(raw), Err(ScriptError::Parse(_))));
    }

    #[test]
    fn replay_builds_the_scene() {
        let script = ReplayScript::parse(SCRIPT).unwrap();
        let mut session = SandplaySession::default();
        session.start(&script.theme).unwrap();
        script.apply_steps(&mut session).unwrap();

        let tray = session.tray();
        assert_eq!(tray.len(), 2);
        let anchor = tray.get(ObjectId(1)).unwrap();
        assert_eq!(anchor.kind(), "Heavy Anchor");
        assert_eq!(anchor.position(), GridCoord::new(6, 6));
        let boat = tray.get(ObjectId(2)).unwrap();
        assert!(boat.is_generated());
        assert_eq!(boat.position(), GridCoord::new(11, 0));

        let reflector = script.reflector().unwrap();
        let reframes = session.reflect_with(&reflector).unwrap();
        let kinds: Vec<ReframeKind> = reframes.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ReframeKind::Mirror, ReframeKind::Poet]);
        let talisman = session.release_with(&reflector, 1).unwrap();
        assert_eq!(talisman.color, "#e0f2fe");
        assert_eq!(session.phase(), Phase::Community);
    }

    #[test]
    fn unknown_asset_stops_replay() {
        let raw = "theme = \"forest\"\n[[steps]]\naction = \"select\"\nasset = \"Dragon\"\n[talisman]\nname = \"x\"\naccent = \"#000\"\nmood = \"m\"\n";
        let script = ReplayScript::parse(raw).unwrap();
        let mut session = SandplaySession::default();
        session.start(&script.theme).unwrap();
        assert!(matches!(
            script.apply_steps(&mut session),
            Err(ScriptError::UnknownAsset(name)) if name == "Dragon"
        ));
    }
}

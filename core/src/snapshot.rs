use std::fmt;

use rkyv::{Archive, Deserialize, Serialize};

use crate::grid::{
    TrayBounds, TrayGeometry, BACK_TOLERANCE_DEFAULT, FRONT_TOLERANCE_DEFAULT,
    TRAY_CELL_SIZE_DEFAULT, TRAY_COLS_DEFAULT, TRAY_ROWS_DEFAULT,
};
use crate::placement::PlacedObject;
use crate::user_id::UserId;

pub const JOURNAL_VERSION: u32 = 1;

pub const TRAY_DIM_MIN: u32 = 2;
pub const TRAY_DIM_MAX: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize)]
pub struct TrayRules {
    pub cols: u32,
    pub rows: u32,
    pub cell_size: f32,
    pub front_tolerance: f32,
    pub back_tolerance: f32,
}

impl Default for TrayRules {
    fn default() -> Self {
        Self {
            cols: TRAY_COLS_DEFAULT,
            rows: TRAY_ROWS_DEFAULT,
            cell_size: TRAY_CELL_SIZE_DEFAULT,
            front_tolerance: FRONT_TOLERANCE_DEFAULT,
            back_tolerance: BACK_TOLERANCE_DEFAULT,
        }
    }
}

impl TrayRules {
    pub fn bounds(&self) -> TrayBounds {
        TrayBounds::new(
            self.cols.clamp(TRAY_DIM_MIN, TRAY_DIM_MAX),
            self.rows.clamp(TRAY_DIM_MIN, TRAY_DIM_MAX),
        )
        .with_tolerance(self.front_tolerance, self.back_tolerance)
    }

    pub fn geometry(&self) -> TrayGeometry {
        TrayGeometry::new(self.bounds(), self.cell_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[repr(u8)]
pub enum ReframeKind {
    Mirror,
    Architect,
    Poet,
}

impl ReframeKind {
    pub const ALL: [ReframeKind; 3] = [ReframeKind::Mirror, ReframeKind::Architect, ReframeKind::Poet];

    pub fn label(self) -> &'static str {
        match self {
            ReframeKind::Mirror => "Mirror",
            ReframeKind::Architect => "Architect",
            ReframeKind::Poet => "Poet",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for ReframeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct Reframe {
    pub kind: ReframeKind,
    pub title: String,
    pub content: String,
    pub color: String,
}

/// What the summary collaborator hands back for a finished scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalismanSummary {
    pub name: String,
    pub image_url: Option<String>,
    pub accent: String,
    pub mood: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct Talisman {
    pub name: String,
    pub image_url: Option<String>,
    pub color: String,
    pub accent: String,
    pub mood: String,
    pub created_at: u64,
}

impl Talisman {
    pub fn from_summary(summary: TalismanSummary, theme_color: &str, created_at: u64) -> Self {
        Self {
            name: summary.name,
            image_url: summary.image_url.filter(|url| !url.trim().is_empty()),
            color: theme_color.to_string(),
            accent: summary.accent,
            mood: summary.mood,
            created_at,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize,
)]
pub struct ShardId(pub u64);

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "talisman-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct Shard {
    pub id: ShardId,
    pub user: UserId,
    pub theme: String,
    pub talisman: Talisman,
    pub objects: Vec<PlacedObject>,
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
pub struct JournalSnapshot {
    pub version: u32,
    pub next_id: u64,
    pub shards: Vec<Shard>,
}

impl Default for JournalSnapshot {
    fn default() -> Self {
        Self {
            version: JOURNAL_VERSION,
            next_id: 1,
            shards: Vec::new(),
        }
    }
}

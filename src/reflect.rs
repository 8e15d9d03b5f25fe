use sandplay_core::{describe_layout, PlacedObject, Reframe, ReframeKind, TalismanSummary};

#[derive(Debug, thiserror::Error)]
pub enum ReflectError {
    #[error("reflection service unavailable: {0}")]
    Unavailable(String),
    #[error("reflection service returned malformed data: {0}")]
    Malformed(String),
}

/// Scene handed to the reflection service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReflectionRequest {
    pub theme: String,
    pub objects: Vec<PlacedObject>,
    pub layout: String,
}

impl ReflectionRequest {
    pub fn new(theme: impl Into<String>, objects: Vec<PlacedObject>) -> Self {
        let layout = describe_layout(&objects);
        Self {
            theme: theme.into(),
            objects,
            layout,
        }
    }

    pub fn object_names(&self) -> Vec<&str> {
        self.objects.iter().map(PlacedObject::kind).collect()
    }
}

/// The external service that interprets a scene. How it retries or falls
/// back is its own business; only final results cross this boundary.
pub trait Reflector {
    fn reframes(&self, request: &ReflectionRequest) -> Result<Vec<Reframe>, ReflectError>;

    fn summarize(&self, request: &ReflectionRequest) -> Result<TalismanSummary, ReflectError>;
}

/// At most one reframe per kind, in Mirror, Architect, Poet order.
pub fn normalize_reframes(reframes: Vec<Reframe>) -> Vec<Reframe> {
    let mut slots: [Option<Reframe>; 3] = [None, None, None];
    for reframe in reframes {
        let index = ReframeKind::ALL
            .iter()
            .position(|kind| *kind == reframe.kind)
            .unwrap_or(0);
        if slots[index].is_none() {
            slots[index] = Some(reframe);
        }
    }
    slots.into_iter().flatten().collect()
}

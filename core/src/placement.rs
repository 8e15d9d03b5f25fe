use std::fmt;

use rkyv::{Archive, Deserialize, Serialize};

use crate::grid::{GridCoord, TrayBounds};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize,
)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
pub enum ObjectVisual {
    Icon { icon: String },
    Image { url: String },
}

impl ObjectVisual {
    pub fn icon(&self) -> Option<&str> {
        match self {
            ObjectVisual::Icon { icon } => Some(icon),
            ObjectVisual::Image { .. } => None,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            ObjectVisual::Icon { .. } => None,
            ObjectVisual::Image { url } => Some(url),
        }
    }
}

/// One item on the tray. Only the position changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct PlacedObject {
    id: ObjectId,
    kind: String,
    position: GridCoord,
    visual: ObjectVisual,
    generated: bool,
}

impl PlacedObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn position(&self) -> GridCoord {
        self.position
    }

    pub fn visual(&self) -> &ObjectVisual {
        &self.visual
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }
}

#[derive(Clone, Debug)]
pub struct PlacementStore {
    bounds: TrayBounds,
    objects: Vec<PlacedObject>,
    next_id: u64,
}

impl PlacementStore {
    pub fn new(bounds: TrayBounds) -> Self {
        Self {
            bounds,
            objects: Vec::new(),
            next_id: 1,
        }
    }

    pub fn bounds(&self) -> &TrayBounds {
        &self.bounds
    }

    pub fn add(
        &mut self,
        kind: impl Into<String>,
        visual: ObjectVisual,
        position: GridCoord,
        generated: bool,
    ) -> PlacedObject {
        let object = PlacedObject {
            id: ObjectId(self.next_id),
            kind: kind.into(),
            position: self.bounds.clamp(position),
            visual,
            generated,
        };
        self.next_id += 1;
        self.objects.push(object.clone());
        object
    }

    /// Returns false when `id` is not on the tray.
    pub fn move_object(&mut self, id: ObjectId, position: GridCoord) -> bool {
        let clamped = self.bounds.clamp(position);
        let Some(object) = self.objects.iter_mut().find(|object| object.id == id) else {
            return false;
        };
        object.position = clamped;
        true
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<PlacedObject> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        Some(self.objects.remove(index))
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn get(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Insertion order.
    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedObject> {
        self.objects.iter()
    }

    /// Back-to-front draw order; equal depths keep insertion order.
    pub fn render_order(&self) -> Vec<&PlacedObject> {
        let mut ordered: Vec<&PlacedObject> = self.objects.iter().collect();
        ordered.sort_by_key(|object| object.position.depth());
        ordered
    }

    /// The object drawn last at `cell`, if any.
    pub fn topmost_at(&self, cell: GridCoord) -> Option<&PlacedObject> {
        self.objects
            .iter()
            .rev()
            .find(|object| object.position == cell)
    }

    pub fn describe_layout(&self) -> String {
        describe_layout(&self.objects)
    }
}

impl Default for PlacementStore {
    fn default() -> Self {
        Self::new(TrayBounds::default())
    }
}

pub fn describe_layout(objects: &[PlacedObject]) -> String {
    objects
        .iter()
        .map(|object| {
            format!(
                "{} at ({}, {})",
                object.kind, object.position.col, object.position.row
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

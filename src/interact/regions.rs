use crate::foundation::core::{Point, Rect};

/// Opaque id carried by an interactive region (a project card, a link).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct RegionId(pub u32);

/// Identity of an element in a hit-testable scene.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(pub u32);

/// One element found under a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    /// The element itself.
    pub element: ElementId,
    /// Tag of the interactive region the element belongs to, if any.
    pub region: Option<RegionId>,
}

/// Point query against a layered scene.
pub trait HitTester {
    /// Append every element containing `point` to `out`, topmost first.
    fn hits_at(&self, point: Point, out: &mut Vec<Hit>);
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    hit: Hit,
    rect: Rect,
    z: i32,
    order: usize,
}

/// Flat list of z-ordered rectangles. Equal `z` stacks later insertions on top.
#[derive(Clone, Debug, Default)]
pub struct RegionLayer {
    entries: Vec<Entry>,
}

impl RegionLayer {
    /// Empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element covering `rect` at stacking level `z`.
    pub fn push(&mut self, element: ElementId, rect: Rect, z: i32, region: Option<RegionId>) {
        let order = self.entries.len();
        self.entries.push(Entry {
            hit: Hit { element, region },
            rect,
            z,
            order,
        });
        self.entries.sort_by(|a, b| b.z.cmp(&a.z).then(b.order.cmp(&a.order)));
    }

    /// Move an existing element. Returns `false` if it is unknown.
    pub fn set_rect(&mut self, element: ElementId, rect: Rect) -> bool {
        match self.entries.iter_mut().find(|e| e.hit.element == element) {
            Some(e) => {
                e.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the layer has no elements.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HitTester for RegionLayer {
    fn hits_at(&self, point: Point, out: &mut Vec<Hit>) {
        // Half-open on the far edges so adjacent rects never both claim a point.
        out.extend(
            self.entries
                .iter()
                .filter(|e| {
                    point.x >= e.rect.x0
                        && point.x < e.rect.x1
                        && point.y >= e.rect.y0
                        && point.y < e.rect.y1
                })
                .map(|e| e.hit),
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/regions.rs"]
mod tests;

//! Registry of interactive screen regions.
//!
//! Hosts register elements (inversion zones, blocked zones, hotspots) and keep
//! their rectangles current; effects query the registry each frame instead of
//! walking the element tree under the pointer.

use fnv::FnvHashMap;
use glam::Vec2;

/// Axis-aligned rectangle in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.width && p.y < self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Region roles understood by the cursor effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Invert,
    Block,
    Hotspot,
}

impl RegionKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invert" => Some(Self::Invert),
            "block" | "blocked" => Some(Self::Block),
            "hotspot" => Some(Self::Hotspot),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u32);

#[derive(Clone, Copy, Debug)]
struct Region<K> {
    kind: K,
    rect: Rect,
}

#[derive(Debug)]
pub struct RegionRegistry<K = RegionKind> {
    regions: FnvHashMap<RegionId, Region<K>>,
    next_id: u32,
}

impl<K> Default for RegionRegistry<K> {
    fn default() -> Self {
        Self {
            regions: FnvHashMap::default(),
            next_id: 1,
        }
    }
}

impl<K: Copy + PartialEq> RegionRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a region with an empty rectangle; the host fills it in with
    /// `update_rect` before it can match anything.
    pub fn register(&mut self, kind: K) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.regions.insert(
            id,
            Region {
                kind,
                rect: Rect::default(),
            },
        );
        id
    }

    /// Returns `false` for unknown ids.
    pub fn update_rect(&mut self, id: RegionId, rect: Rect) -> bool {
        match self.regions.get_mut(&id) {
            Some(r) => {
                r.rect = rect;
                true
            }
            None => false,
        }
    }

    pub fn unregister(&mut self, id: RegionId) -> bool {
        self.regions.remove(&id).is_some()
    }

    pub fn contains_kind(&self, point: Vec2, kind: K) -> bool {
        self.regions
            .values()
            .any(|r| r.kind == kind && !r.rect.is_empty() && r.rect.contains(point))
    }

    pub fn kinds_at(&self, point: Vec2) -> Vec<K> {
        let mut hits: Vec<(RegionId, K)> = self
            .regions
            .iter()
            .filter(|(_, r)| !r.rect.is_empty() && r.rect.contains(point))
            .map(|(id, r)| (*id, r.kind))
            .collect();
        // Registration order keeps results stable across hash iteration.
        hits.sort_by_key(|(id, _)| *id);
        hits.into_iter().map(|(_, k)| k).collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.regions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }
}

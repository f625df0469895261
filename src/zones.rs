use crate::core::regions::{RegionId, RegionKind, RegionRegistry};
use crate::dom;
use fnv::FnvHashMap;
use web_sys as web;

/// Host elements registered as cursor regions. Rects are re-read from the
/// layout once per frame so scrolling and reflow are picked up.
#[derive(Default)]
pub struct Zones {
    registry: RegionRegistry,
    elements: FnvHashMap<RegionId, web::Element>,
}

impl Zones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn register(&mut self, el: web::Element, kind: RegionKind) -> RegionId {
        let id = self.registry.register(kind);
        self.registry.update_rect(id, dom::element_rect(&el));
        self.elements.insert(id, el);
        id
    }

    pub fn unregister(&mut self, id: RegionId) -> bool {
        self.elements.remove(&id);
        self.registry.unregister(id)
    }

    pub fn refresh(&mut self) {
        for (id, el) in &self.elements {
            self.registry.update_rect(*id, dom::element_rect(el));
        }
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.registry.clear();
    }
}

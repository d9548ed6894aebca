use std::collections::BTreeSet;

use crate::{
    document::selector::Selector,
    foundation::{
        core::{ElementId, Rect, Viewport},
        error::{StageError, StageResult},
    },
};

/// Serialized element description; children are nested.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementDef {
    /// Unique element id (`#id`).
    #[serde(default)]
    pub id: Option<String>,
    /// Class names (`.class`).
    #[serde(default)]
    pub class: Vec<String>,
    /// `[x, y, width, height]` in document pixels.
    pub rect: [f64; 4],
    /// Text content.
    #[serde(default)]
    pub text: Option<String>,
    /// Split the text into one child element per visible character.
    #[serde(default)]
    pub split: Option<SplitDef>,
    /// Nested elements.
    #[serde(default)]
    pub children: Vec<ElementDef>,
}

/// Per-character split options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SplitDef {
    /// Class given to every character element.
    #[serde(default = "SplitDef::default_class")]
    pub class: String,
}

impl SplitDef {
    fn default_class() -> String {
        "char".to_owned()
    }
}

impl Default for SplitDef {
    fn default() -> Self {
        Self {
            class: Self::default_class(),
        }
    }
}

/// A node of the document.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Unique id, if any.
    pub id: Option<String>,
    /// Class names.
    pub classes: Vec<String>,
    /// Parent element.
    pub parent: Option<ElementId>,
    /// Box in document coordinates (y grows downward).
    pub rect: Rect,
    /// Text content.
    pub text: Option<String>,
    /// `false` once the element (or an ancestor) was unmounted.
    pub mounted: bool,
}

/// Flat element arena with parent links.
#[derive(Clone, Debug)]
pub struct Document {
    viewport: Viewport,
    elements: Vec<Element>,
}

impl Document {
    /// Empty document.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            elements: Vec::new(),
        }
    }

    /// Build a document from nested definitions.
    pub fn from_defs(viewport: Viewport, defs: &[ElementDef]) -> StageResult<Self> {
        let mut doc = Self::new(viewport);
        for def in defs {
            doc.add(None, def)?;
        }
        Ok(doc)
    }

    /// Viewport the document is laid out for.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of elements ever inserted.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// `true` when the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element by id.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize)
    }

    /// `true` when `id` exists and is mounted.
    pub fn is_mounted(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(|el| el.mounted)
    }

    /// Insert a definition (and its children) under `parent`.
    pub fn add(&mut self, parent: Option<ElementId>, def: &ElementDef) -> StageResult<ElementId> {
        let [x, y, w, h] = def.rect;
        if !def.rect.iter().all(|v| v.is_finite()) || w < 0.0 || h < 0.0 {
            return Err(StageError::validation(format!(
                "element {:?} has an invalid rect {:?}",
                def.id, def.rect
            )));
        }
        let id = self.insert(
            parent,
            def.id.clone(),
            def.class.clone(),
            Rect::new(x, y, x + w, y + h),
            def.text.clone(),
        )?;
        if let Some(split) = &def.split {
            self.split_chars(id, &split.class)?;
        }
        for child in &def.children {
            self.add(Some(id), child)?;
        }
        Ok(id)
    }

    /// Insert a single element.
    pub fn insert(
        &mut self,
        parent: Option<ElementId>,
        id: Option<String>,
        classes: Vec<String>,
        rect: Rect,
        text: Option<String>,
    ) -> StageResult<ElementId> {
        if let Some(p) = parent
            && self.get(p).is_none()
        {
            return Err(StageError::validation(format!("unknown parent element {p}")));
        }
        if let Some(name) = &id
            && self.elements.iter().any(|el| el.id.as_ref() == Some(name))
        {
            return Err(StageError::validation(format!(
                "duplicate element id '{name}'"
            )));
        }
        let new_id = ElementId(u32::try_from(self.elements.len()).map_err(|_| {
            StageError::validation("document holds too many elements")
        })?);
        self.elements.push(Element {
            id,
            classes,
            parent,
            rect,
            text,
            mounted: true,
        });
        Ok(new_id)
    }

    /// Split `el`'s text into one child per non-whitespace character, laid out evenly across
    /// the parent's width.
    pub fn split_chars(&mut self, el: ElementId, class: &str) -> StageResult<Vec<ElementId>> {
        let parent = self
            .get(el)
            .ok_or_else(|| StageError::validation(format!("unknown element {el}")))?;
        let text = parent.text.clone().unwrap_or_default();
        let rect = parent.rect;
        let count = text.chars().count().max(1) as f64;
        let cell = rect.width() / count;

        let mut out = Vec::new();
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let x0 = rect.x0 + cell * i as f64;
            let id = self.insert(
                Some(el),
                None,
                vec![class.to_owned()],
                Rect::new(x0, rect.y0, x0 + cell, rect.y1),
                Some(ch.to_string()),
            )?;
            out.push(id);
        }
        Ok(out)
    }

    /// Mounted elements matching `selector`, in document order.
    pub fn select(&self, selector: &str) -> StageResult<Vec<ElementId>> {
        let parsed: Selector = selector.parse()?;
        Ok(self.select_parsed(&parsed))
    }

    /// First mounted element matching `selector`.
    pub fn first(&self, selector: &str) -> StageResult<Option<ElementId>> {
        Ok(self.select(selector)?.into_iter().next())
    }

    /// Mounted elements matching an already parsed selector.
    pub fn select_parsed(&self, selector: &Selector) -> Vec<ElementId> {
        (0..self.elements.len())
            .map(|i| ElementId(i as u32))
            .filter(|&id| self.is_mounted(id) && self.matches(id, selector))
            .collect()
    }

    fn matches(&self, id: ElementId, selector: &Selector) -> bool {
        let Some((last, ancestors)) = selector.parts.split_last() else {
            return false;
        };
        let Some(el) = self.get(id) else {
            return false;
        };
        if !last.matches(el.id.as_deref(), &el.classes) {
            return false;
        }
        let mut wanted = ancestors.iter().rev().peekable();
        let mut cursor = el.parent;
        while let Some(want) = wanted.peek() {
            let Some(pid) = cursor else {
                return false;
            };
            let Some(p) = self.get(pid) else {
                return false;
            };
            if want.matches(p.id.as_deref(), &p.classes) {
                wanted.next();
            }
            cursor = p.parent;
        }
        true
    }

    /// `true` when `el` is `ancestor` or lies beneath it.
    pub fn is_within(&self, el: ElementId, ancestor: ElementId) -> bool {
        let mut cursor = Some(el);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.get(id).and_then(|e| e.parent);
        }
        false
    }

    /// Unmount `el` and its whole subtree; returns the affected elements.
    pub fn unmount(&mut self, el: ElementId) -> BTreeSet<ElementId> {
        let affected: BTreeSet<ElementId> = (0..self.elements.len())
            .map(|i| ElementId(i as u32))
            .filter(|&id| self.is_mounted(id) && self.is_within(id, el))
            .collect();
        for id in &affected {
            self.elements[id.0 as usize].mounted = false;
        }
        affected
    }

    /// Bottom edge of the lowest mounted element.
    pub fn scroll_height(&self) -> f64 {
        self.elements
            .iter()
            .filter(|el| el.mounted)
            .map(|el| el.rect.y1)
            .fold(self.viewport.height, f64::max)
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height() - self.viewport.height).max(0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/tree.rs"]
mod tests;

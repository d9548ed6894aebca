use std::{collections::BTreeSet, fs::File, io::BufReader, path::Path};

use crate::{
    document::selector::Selector,
    foundation::{
        core::Viewport,
        error::{StageError, StageResult},
    },
    scene::model::{DriveDef, PageDef},
};

const PORTFOLIO_JSON: &str = include_str!("../../pages/portfolio.json");
const CONTACT_JSON: &str = include_str!("../../pages/contact.json");

/// Page definition boundary object.
///
/// This is the JSON-facing, human-edited description of a page. It is validated here and turned
/// into live state by [`crate::stage::Stage::new`].
#[derive(Debug, Clone)]
pub struct Page {
    def: PageDef,
}

impl Page {
    /// Names accepted by [`Page::builtin`].
    pub const BUILTIN: [&'static str; 2] = ["portfolio", "contact"];

    /// Parse a page from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> StageResult<Self> {
        let def: PageDef = serde_json::from_reader(r)
            .map_err(|e| StageError::validation(format!("parse page JSON: {e}")))?;
        Ok(Self { def })
    }

    /// Parse a page from a JSON string.
    pub fn from_json(src: &str) -> StageResult<Self> {
        let def: PageDef = serde_json::from_str(src)
            .map_err(|e| StageError::validation(format!("parse page JSON: {e}")))?;
        Ok(Self { def })
    }

    /// Parse a page from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StageResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StageError::validation(format!("open page JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// One of the pages shipped with the crate.
    pub fn builtin(name: &str) -> StageResult<Self> {
        match name {
            "portfolio" => Self::from_json(PORTFOLIO_JSON),
            "contact" => Self::from_json(CONTACT_JSON),
            other => Err(StageError::validation(format!(
                "unknown page '{other}' (expected one of {:?})",
                Self::BUILTIN
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn def(&self) -> &PageDef {
        &self.def
    }

    pub fn viewport(&self) -> StageResult<Viewport> {
        Viewport::new(self.def.viewport.width, self.def.viewport.height)
    }

    /// Check cross references and value ranges that serde cannot.
    pub fn validate(&self) -> StageResult<()> {
        let def = &self.def;
        self.viewport()?;
        def.smooth_scroll.validate()?;

        for (name, trigger) in &def.triggers {
            parse_selector(&trigger.region, || format!("trigger '{name}'"))?;
            if trigger.start.is_relative() {
                return Err(StageError::validation(format!(
                    "trigger '{name}': start marker cannot be relative"
                )));
            }
        }
        for selector in def.base.keys() {
            parse_selector(selector, || "base styles".to_owned())?;
        }

        let mut names = BTreeSet::new();
        for scene in &def.scenes {
            if !names.insert(scene.name.as_str()) {
                return Err(StageError::validation(format!(
                    "duplicate scene name '{}'",
                    scene.name
                )));
            }
        }
        for scene in &def.scenes {
            let ctx = || format!("scene '{}'", scene.name);
            match &scene.drive {
                DriveDef::Autoplay { delay } | DriveDef::After { delay, .. }
                    if !(delay.is_finite() && *delay >= 0.0) =>
                {
                    return Err(StageError::validation(format!(
                        "{}: delay must be finite and >= 0",
                        ctx()
                    )));
                }
                DriveDef::After { scene: other, .. } if other == &scene.name => {
                    return Err(StageError::validation(format!(
                        "{}: cannot wait for itself",
                        ctx()
                    )));
                }
                DriveDef::After { scene: other, .. } if !names.contains(other.as_str()) => {
                    return Err(StageError::validation(format!(
                        "{}: unknown scene '{other}'",
                        ctx()
                    )));
                }
                DriveDef::Scrub { trigger } | DriveDef::Toggle { trigger, .. }
                    if !def.triggers.contains_key(trigger) =>
                {
                    return Err(StageError::validation(format!(
                        "{}: unknown trigger '{trigger}'",
                        ctx()
                    )));
                }
                _ => {}
            }
            if let Some(sel) = &scene.unmount_on_complete {
                parse_selector(sel, || format!("{} unmountOnComplete", ctx()))?;
            }
            for (i, step) in scene.steps.iter().enumerate() {
                parse_selector(&step.targets, || format!("{} step {i}", ctx()))?;
                if step.from.is_empty() && step.to.is_empty() {
                    return Err(StageError::validation(format!(
                        "{} step {i}: no properties to animate",
                        ctx()
                    )));
                }
                if step.set && !step.from.is_empty() {
                    return Err(StageError::validation(format!(
                        "{} step {i}: a set step only takes 'to' values",
                        ctx()
                    )));
                }
            }
        }

        if let Some(menu) = &def.menu {
            let scene = def
                .scenes
                .iter()
                .find(|s| s.name == menu.scene)
                .ok_or_else(|| {
                    StageError::validation(format!("menu: unknown scene '{}'", menu.scene))
                })?;
            if scene.drive != DriveDef::Manual {
                return Err(StageError::validation(format!(
                    "menu: scene '{}' must use the manual drive",
                    menu.scene
                )));
            }
            parse_selector(&menu.links, || "menu links".to_owned())?;
            parse_selector(&menu.letters, || "menu letters".to_owned())?;
            if let Some(header) = &menu.header {
                parse_selector(header, || "menu header".to_owned())?;
            }
        }
        Ok(())
    }
}

fn parse_selector(src: &str, ctx: impl FnOnce() -> String) -> StageResult<Selector> {
    src.parse::<Selector>()
        .map_err(|e| StageError::validation(format!("{}: {e}", ctx())))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/page.rs"]
mod tests;

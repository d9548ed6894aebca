use std::collections::BTreeMap;

use tokio::sync::watch;

use crate::{
    animation::{
        property::{Property, PropertyMap, coerce_map},
        value::Value,
    },
    document::Document,
    foundation::{
        core::ElementId,
        error::{StageError, StageResult},
    },
    menu::{
        links::MenuLink,
        machine::{MenuMachine, MenuState},
    },
    render::sink::StyleSink,
    scene::page::Page,
    scroll::smooth::{ScrollFrame, SmoothScroll, SmoothScrollOpts},
    stage::{
        hover::Hover,
        scenes::{Drive, Scene},
    },
    timeline::{
        playhead::PlaybackEvent,
        timeline::StyleFrame,
    },
    trigger::binder::{PinState, TriggerBinder, TriggerId, TriggerSpec, TriggerUpdate},
};

/// What happened during one [`Stage::frame`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameReport {
    pub index: u64,
    pub scroll: ScrollFrame,
    pub triggers: Vec<TriggerUpdate>,
    /// Scenes whose time-driven playback reached its end this frame.
    pub completed: Vec<String>,
    /// New menu state, if it changed this frame.
    pub menu: Option<MenuState>,
    /// Elements that received style updates.
    pub updated: usize,
}

#[derive(Debug)]
struct MenuBinding {
    machine: MenuMachine,
    scene: usize,
    links: Vec<ElementId>,
    letters: String,
    /// Hidden while the menu is anywhere but closed.
    header: Vec<ElementId>,
}

/// Live page: scroll input in, style updates out.
#[derive(Debug)]
pub struct Stage {
    name: String,
    doc: Document,
    scroll: SmoothScroll,
    binder: TriggerBinder,
    trigger_names: BTreeMap<String, TriggerId>,
    scenes: Vec<Scene>,
    menu: Option<MenuBinding>,
    hovers: Vec<Hover>,
    rendered: StyleFrame,
    pins: BTreeMap<ElementId, PinState>,
    frame_index: u64,
}

impl Stage {
    /// Build the runtime for a validated page.
    pub fn new(page: &Page, smooth: SmoothScrollOpts) -> StageResult<Self> {
        page.validate()?;
        let def = page.def();
        let doc = Document::from_defs(page.viewport()?, &def.elements)?;

        let mut base = StyleFrame::new();
        for (selector, props) in &def.base {
            let props = coerce_map(props.clone())?;
            for el in doc.select(selector)? {
                base.entry(el).or_default().extend(props.clone());
            }
        }

        let mut binder = TriggerBinder::new();
        let mut trigger_names = BTreeMap::new();
        for (name, t) in &def.triggers {
            let region = doc.first(&t.region)?;
            if region.is_none() {
                tracing::debug!(trigger = %name, selector = %t.region, "trigger region not found");
            }
            let id = binder.register(
                TriggerSpec {
                    region,
                    start: t.start,
                    end: t.end,
                    pin: t.pin,
                    pin_spacing: t.pin_spacing,
                    scrub: t.scrub,
                },
                &doc,
            )?;
            trigger_names.insert(name.clone(), id);
        }
        binder.refresh(&doc)?;

        let scene_index: BTreeMap<&str, usize> = def
            .scenes
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.as_str(), i))
            .collect();
        let scenes = def
            .scenes
            .iter()
            .map(|s| Scene::build(s, &doc, &base, def.overlap, &trigger_names, &scene_index))
            .collect::<StageResult<Vec<_>>>()?;

        let scroll = SmoothScroll::new(smooth, doc.max_scroll() + binder.total_pin_spacing())?;

        let menu = match &def.menu {
            Some(m) => {
                let scene = scene_index.get(m.scene.as_str()).copied().ok_or_else(|| {
                    StageError::validation(format!("menu: unknown scene '{}'", m.scene))
                })?;
                let duration = scenes[scene].timeline.duration();
                Some(MenuBinding {
                    machine: MenuMachine::new(duration, scroll.lock().clone()),
                    scene,
                    links: doc.select(&m.links)?,
                    letters: m.letters.clone(),
                    header: match &m.header {
                        Some(selector) => doc.select(selector)?,
                        None => Vec::new(),
                    },
                })
            }
            None => None,
        };

        tracing::info!(
            page = %def.name,
            elements = doc.len(),
            triggers = binder.len(),
            scenes = scenes.len(),
            limit = scroll.limit(),
            "stage ready"
        );
        Ok(Self {
            name: def.name.clone(),
            doc,
            scroll,
            binder,
            trigger_names,
            scenes,
            menu,
            hovers: Vec::new(),
            rendered: StyleFrame::new(),
            pins: BTreeMap::new(),
            frame_index: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn binder(&self) -> &TriggerBinder {
        &self.binder
    }

    /// Id of a named trigger, while registered.
    pub fn trigger(&self, name: &str) -> Option<TriggerId> {
        self.trigger_names
            .get(name)
            .copied()
            .filter(|id| self.binder.contains(*id))
    }

    /// Named triggers still registered, by name.
    pub fn triggers(&self) -> impl Iterator<Item = (&str, TriggerId)> + '_ {
        self.trigger_names
            .iter()
            .filter(|(_, id)| self.binder.contains(**id))
            .map(|(name, id)| (name.as_str(), *id))
    }

    /// Smoothed scroll offset.
    pub fn scroll_position(&self) -> f64 {
        self.scroll.position()
    }

    pub fn scroll_limit(&self) -> f64 {
        self.scroll.limit()
    }

    /// Playhead time of a scene that is still live.
    pub fn scene_time(&self, name: &str) -> Option<f64> {
        self.scenes
            .iter()
            .find(|s| s.name == name && !s.retired)
            .map(|s| s.playhead.time())
    }

    /// Values pushed to the sink so far.
    pub fn rendered(&self) -> &StyleFrame {
        &self.rendered
    }

    pub fn value(&self, el: ElementId, prop: Property) -> Option<&Value> {
        self.rendered.get(&el).and_then(|p| p.get(&prop))
    }

    /// Feed a raw wheel delta (ignored while the menu holds the scroll lock).
    pub fn wheel(&mut self, delta: f64) {
        self.scroll.on_wheel(delta);
    }

    /// Move the scroll position without smoothing.
    pub fn jump_to(&mut self, offset: f64) {
        self.scroll.scroll_to(offset, true);
    }

    /// Smoothly scroll back to the top (the logo button).
    pub fn scroll_to_top(&mut self) {
        self.scroll.scroll_to(0.0, false);
    }

    pub fn menu_state(&self) -> Option<MenuState> {
        self.menu.as_ref().map(|m| m.machine.state())
    }

    /// Receiver for menu state changes.
    pub fn subscribe_menu(&self) -> Option<watch::Receiver<MenuState>> {
        self.menu.as_ref().map(|m| m.machine.subscribe())
    }

    /// The header shows only while the menu is closed (or when the page has no menu).
    pub fn header_visible(&self) -> bool {
        self.menu.as_ref().is_none_or(|m| m.machine.header_visible())
    }

    pub fn open_menu(&mut self) -> bool {
        self.menu.as_mut().is_some_and(|m| m.machine.open())
    }

    pub fn close_menu(&mut self) -> bool {
        self.menu.as_mut().is_some_and(|m| m.machine.close())
    }

    pub fn force_close_menu(&mut self) {
        if let Some(m) = self.menu.as_mut() {
            m.machine.force_close();
        }
    }

    /// Click a menu link: the menu closes and the route is returned for the router.
    pub fn click_menu_link(&mut self, index: usize) -> Option<&'static MenuLink> {
        self.menu.as_mut().and_then(|m| m.machine.click_link(index))
    }

    /// Start the letter color animation of menu link `index`. Returns `false` if there is no
    /// such link.
    pub fn hover_menu_link(&mut self, index: usize, enter: bool) -> StageResult<bool> {
        let Some(menu) = &self.menu else {
            return Ok(false);
        };
        let Some(&link) = menu.links.get(index) else {
            return Ok(false);
        };
        if !self.doc.is_mounted(link) {
            return Ok(false);
        }
        let letters: Vec<ElementId> = self
            .doc
            .select(&menu.letters)?
            .into_iter()
            .filter(|&el| el != link && self.doc.is_within(el, link))
            .collect();
        let hover = Hover::start(link, letters, enter, &self.rendered)?;
        self.hovers.retain(|h| h.link != link);
        self.hovers.push(hover);
        Ok(true)
    }

    /// Advance every subsystem by `dt` seconds and push changed styles to `sink`.
    #[tracing::instrument(level = "trace", skip_all, fields(page = %self.name, frame = self.frame_index))]
    pub fn frame(&mut self, dt: f64, sink: &mut dyn StyleSink) -> StageResult<FrameReport> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let index = self.frame_index;
        self.frame_index += 1;

        let scroll = self.scroll.tick(dt);
        let triggers = self.binder.update(scroll.position, dt);

        for update in &triggers {
            if let Some(state) = update.pin
                && let Some(region) = self.binder.region(update.id)
                && self.doc.is_mounted(region)
                && self.pins.get(&region) != Some(&state)
            {
                sink.apply_pin(region, state)?;
                self.pins.insert(region, state);
            }
            for scene in self.scenes.iter_mut().filter(|s| !s.retired) {
                scene.on_trigger(update);
            }
        }

        let mut completed = Vec::new();
        for (i, scene) in self.scenes.iter_mut().enumerate() {
            if scene.retired || !scene.is_timed() {
                continue;
            }
            if scene.advance(dt) == Some(PlaybackEvent::Complete) {
                completed.push(i);
            }
        }
        for &done in &completed {
            for scene in self.scenes.iter_mut() {
                if scene.drive == Drive::After(done) && !scene.retired {
                    scene.arm();
                }
            }
        }

        let menu = self.menu.as_mut().and_then(|m| m.machine.tick(dt));
        for hover in &mut self.hovers {
            hover.advance(dt);
        }

        let updated = self.push_styles(sink)?;
        sink.end_frame(index)?;
        self.hovers.retain(|h| !h.finished);

        for &done in &completed {
            if let Some(selector) = self.scenes[done].unmount_on_complete.clone() {
                for el in self.doc.select(&selector)? {
                    self.unmount_element(el)?;
                }
            }
        }

        Ok(FrameReport {
            index,
            scroll,
            triggers,
            completed: completed
                .iter()
                .map(|&i| self.scenes[i].name.clone())
                .collect(),
            menu,
            updated,
        })
    }

    fn scene_time_now(&self, index: usize) -> f64 {
        let scene = &self.scenes[index];
        match scene.drive {
            Drive::Scrub(trigger) => {
                self.binder.scrubbed(trigger).unwrap_or(0.0) * scene.timeline.duration()
            }
            Drive::Manual => match &self.menu {
                Some(m) if m.scene == index => m.machine.time(),
                _ => scene.playhead.time(),
            },
            _ => scene.playhead.time(),
        }
    }

    /// Compose every live scene (declaration order), hovers and the menu header, then push what
    /// changed.
    fn push_styles(&mut self, sink: &mut dyn StyleSink) -> StageResult<usize> {
        let mut frame = StyleFrame::new();
        for i in 0..self.scenes.len() {
            if self.scenes[i].retired {
                continue;
            }
            let t = self.scene_time_now(i);
            merge(&mut frame, self.scenes[i].timeline.sample(t)?);
        }
        for hover in &self.hovers {
            merge(&mut frame, hover.sample()?);
        }
        if let Some(menu) = &self.menu {
            let opacity = if menu.machine.header_visible() { 1.0 } else { 0.0 };
            for &el in &menu.header {
                frame
                    .entry(el)
                    .or_default()
                    .insert(Property::Opacity, Value::Number(opacity));
            }
        }

        let mut updated = 0;
        for (el, props) in frame {
            if !self.doc.is_mounted(el) {
                continue;
            }
            let prev = self.rendered.entry(el).or_default();
            let changed: PropertyMap = props
                .into_iter()
                .filter(|(prop, value)| prev.get(prop) != Some(value))
                .collect();
            if changed.is_empty() {
                continue;
            }
            sink.apply_styles(el, &changed)?;
            prev.extend(changed);
            updated += 1;
        }
        Ok(updated)
    }

    /// Unmount every element matching `selector`; returns how many elements were removed.
    pub fn unmount(&mut self, selector: &str) -> StageResult<usize> {
        let mut removed = 0;
        for el in self.doc.select(selector)? {
            removed += self.unmount_element(el)?;
        }
        Ok(removed)
    }

    /// Unmount `el` and its subtree, killing the triggers of regions inside it. Nothing is
    /// pushed to the removed elements afterwards.
    pub fn unmount_element(&mut self, el: ElementId) -> StageResult<usize> {
        let affected = self.doc.unmount(el);
        if affected.is_empty() {
            return Ok(0);
        }
        let killed = self.binder.kill_within(&self.doc, el);

        for scene in &mut self.scenes {
            let orphaned = match scene.drive {
                Drive::Scrub(t) | Drive::Toggle { trigger: t, .. } => killed.contains(&t),
                _ => false,
            };
            let targets = scene.timeline.targets();
            let gone = !targets.is_empty() && targets.iter().all(|t| affected.contains(t));
            if !scene.retired && (orphaned || gone) {
                tracing::debug!(scene = %scene.name, "scene retired");
                scene.retired = true;
            }
        }
        if let Some(menu) = &self.menu
            && menu.links.iter().any(|l| affected.contains(l))
        {
            self.force_close_menu();
            self.menu = None;
        }
        self.hovers.retain(|h| !affected.contains(&h.link));
        self.rendered.retain(|id, _| !affected.contains(id));
        self.pins.retain(|id, _| !affected.contains(id));

        self.binder.refresh(&self.doc)?;
        self.scroll
            .set_limit(self.doc.max_scroll() + self.binder.total_pin_spacing());
        tracing::debug!(element = %el, removed = affected.len(), killed = killed.len(), "unmounted");
        Ok(affected.len())
    }

    /// Kill every trigger, stop every scene and close the menu.
    pub fn teardown(&mut self) {
        let killed = self.binder.kill_all();
        for scene in &mut self.scenes {
            scene.retired = true;
        }
        self.hovers.clear();
        self.force_close_menu();
        tracing::info!(page = %self.name, killed, "stage torn down");
    }
}

fn merge(into: &mut StyleFrame, from: StyleFrame) {
    for (el, props) in from {
        into.entry(el).or_default().extend(props);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/runtime.rs"]
mod tests;

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    contact::{delivery::EMAILJS_ENDPOINT, handler::Credentials},
    foundation::error::{StageError, StageResult},
    scroll::smooth::SmoothScrollOpts,
};

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "scrollstage.toml";

/// Frame rate of the owned frame loop unless configured.
pub const DEFAULT_FPS: u32 = 60;

/// Runtime settings: defaults, then the TOML file, then environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub emailjs_service_id: Option<String>,
    pub emailjs_template_id: Option<String>,
    pub emailjs_public_key: Option<String>,
    pub emailjs_endpoint: String,
    /// Overrides the page's smooth-scroll lerp.
    pub lerp: Option<f64>,
    pub fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            emailjs_service_id: None,
            emailjs_template_id: None,
            emailjs_public_key: None,
            emailjs_endpoint: EMAILJS_ENDPOINT.to_owned(),
            lerp: None,
            fps: DEFAULT_FPS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    fps: Option<u32>,
    scroll: ScrollSection,
    emailjs: EmailJsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ScrollSection {
    lerp: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EmailJsSection {
    service_id: Option<String>,
    template_id: Option<String>,
    public_key: Option<String>,
    endpoint: Option<String>,
}

impl Settings {
    /// Load from `path` (or [`DEFAULT_CONFIG_FILE`] if present) and the process environment.
    pub fn load(path: Option<&Path>) -> StageResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`Settings::load`] with an injected environment lookup.
    pub fn load_with(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> StageResult<Self> {
        let mut settings = Self::default();

        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };
        if let Some(file) = file {
            let raw = fs::read_to_string(&file).map_err(|e| {
                StageError::config(format!("read config '{}': {e}", file.display()))
            })?;
            settings.apply_toml(&raw).map_err(|e| {
                StageError::config(format!("config '{}': {e}", file.display()))
            })?;
        }

        settings.apply_env(env)?;
        settings.validate()?;
        Ok(settings)
    }

    fn apply_toml(&mut self, raw: &str) -> StageResult<()> {
        let file: FileSettings =
            toml::from_str(raw).map_err(|e| StageError::config(e.to_string()))?;
        if let Some(v) = file.fps {
            self.fps = v;
        }
        if let Some(v) = file.scroll.lerp {
            self.lerp = Some(v);
        }
        let mail = file.emailjs;
        if mail.service_id.is_some() {
            self.emailjs_service_id = mail.service_id;
        }
        if mail.template_id.is_some() {
            self.emailjs_template_id = mail.template_id;
        }
        if mail.public_key.is_some() {
            self.emailjs_public_key = mail.public_key;
        }
        if let Some(v) = mail.endpoint {
            self.emailjs_endpoint = v;
        }
        Ok(())
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> StageResult<()> {
        if let Some(v) = env("EMAILJS_SERVICE_ID") {
            self.emailjs_service_id = Some(v);
        }
        if let Some(v) = env("EMAILJS_TEMPLATE_ID") {
            self.emailjs_template_id = Some(v);
        }
        if let Some(v) = env("EMAILJS_PUBLIC_KEY") {
            self.emailjs_public_key = Some(v);
        }
        if let Some(v) = env("EMAILJS_ENDPOINT") {
            self.emailjs_endpoint = v;
        }
        if let Some(v) = env("SCROLLSTAGE_LERP") {
            let lerp = v.trim().parse::<f64>().map_err(|_| {
                StageError::config(format!("SCROLLSTAGE_LERP must be a number, got '{v}'"))
            })?;
            self.lerp = Some(lerp);
        }
        if let Some(v) = env("SCROLLSTAGE_FPS") {
            self.fps = v.trim().parse::<u32>().map_err(|_| {
                StageError::config(format!("SCROLLSTAGE_FPS must be an integer, got '{v}'"))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> StageResult<()> {
        if self.fps == 0 {
            return Err(StageError::config("fps must be > 0"));
        }
        if let Some(lerp) = self.lerp
            && !(lerp > 0.0 && lerp <= 1.0)
        {
            return Err(StageError::config(format!("lerp must be in (0, 1], got {lerp}")));
        }
        Ok(())
    }

    /// Page smoothing options with the configured lerp applied.
    pub fn smooth_scroll(&self, page: SmoothScrollOpts) -> SmoothScrollOpts {
        SmoothScrollOpts {
            lerp: self.lerp.unwrap_or(page.lerp),
            ..page
        }
    }

    /// Delivery credentials; an error naming every missing variable.
    pub fn credentials(&self) -> StageResult<Credentials> {
        let fields = [
            ("EMAILJS_SERVICE_ID", &self.emailjs_service_id),
            ("EMAILJS_TEMPLATE_ID", &self.emailjs_template_id),
            ("EMAILJS_PUBLIC_KEY", &self.emailjs_public_key),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, v)| v.as_deref().is_none_or(|s| s.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(StageError::config(format!(
                "missing email delivery credentials: {}",
                missing.join(", ")
            )));
        }
        let get = |v: &Option<String>| v.clone().unwrap_or_default();
        Ok(Credentials {
            service_id: get(&self.emailjs_service_id),
            template_id: get(&self.emailjs_template_id),
            public_key: get(&self.emailjs_public_key),
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

use std::{env, path::PathBuf};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_LANDING_PATH: &str = "/home";

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub base_url: String,
    /// Where the page goes after a confirmed submission. `None` keeps the
    /// page where it is.
    pub landing_path: Option<String>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            landing_path: Some(DEFAULT_LANDING_PATH.to_string()),
        }
    }
}

impl ControllerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("TRACKER_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(path) = env::var("TRACKER_LANDING_PATH") {
            config.landing_path = landing_from(&path);
        }
        config
    }
}

fn landing_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn resolve_page_path() -> PathBuf {
    if let Ok(path) = env::var("TRACKER_PAGE_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/page.json")
}

#[derive(Debug, Clone)]
pub struct PopupSpec {
    pub name: &'static str,
    pub link_id: &'static str,
    pub panel_id: &'static str,
    pub overlay_id: &'static str,
    pub form_id: &'static str,
    pub endpoint: &'static str,
}

impl PopupSpec {
    pub fn prospective() -> Self {
        Self {
            name: "add prospective",
            link_id: "add-qa-link",
            panel_id: "add-prospective-popup",
            overlay_id: "qaf-overlay",
            form_id: "qa-form",
            endpoint: "/submit_prospective",
        }
    }

    pub fn new_scribe() -> Self {
        Self {
            name: "add new scribe",
            link_id: "add-scribe-link",
            panel_id: "add-scribe-popup",
            overlay_id: "qaf-overlay",
            form_id: "scribe-form",
            endpoint: "/add_new_scribe",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DivisionSpec {
    pub division_id: &'static str,
    pub scribes_id: &'static str,
    pub providers_id: &'static str,
    pub endpoint: &'static str,
}

impl Default for DivisionSpec {
    fn default() -> Self {
        Self {
            division_id: "qaf-division",
            scribes_id: "qaf-scribe",
            providers_id: "qaf-provider",
            endpoint: "/get_scribes_providers_per_division",
        }
    }
}

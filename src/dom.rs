use crate::errors::PageError;
use crate::models::{Display, FormPayload, FormValue, SelectOption, Visibility};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PROSPECTIVE_REGION: &str = "prospective";
pub const DUE_REGION: &str = "due";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Link {
        href: String,
    },
    Panel {
        display: Display,
    },
    Overlay {
        visibility: Visibility,
    },
    Form {
        controls: Vec<String>,
    },
    Input {
        name: String,
        value: FormValue,
    },
    Select {
        name: String,
        value: String,
        options: Vec<SelectOption>,
    },
    Region {
        rows: Vec<Vec<String>>,
        empty_state: Display,
    },
}

impl Element {
    fn kind(&self) -> &'static str {
        match self {
            Element::Link { .. } => "link",
            Element::Panel { .. } => "panel",
            Element::Overlay { .. } => "overlay",
            Element::Form { .. } => "form",
            Element::Input { .. } => "input",
            Element::Select { .. } => "select",
            Element::Region { .. } => "region",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Document {
    pub location: String,
    #[serde(default)]
    pub navigations: Vec<String>,
    pub elements: BTreeMap<String, Element>,
}

impl Document {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            navigations: Vec::new(),
            elements: BTreeMap::new(),
        }
    }

    pub fn tracker_page() -> Self {
        let mut doc = Self::new("/home");

        doc.insert(PROSPECTIVE_REGION, region(&[
            "Scribe", "Date", "Division", "Assessor", "Provider",
        ]));
        doc.insert(DUE_REGION, region(&["Scribe", "Due date", "Division", "QA #"]));

        doc.insert("qaf-overlay", Element::Overlay {
            visibility: Visibility::Hidden,
        });

        doc.insert("add-qa-link", link("#"));
        doc.insert("add-prospective-popup", Element::Panel {
            display: Display::None,
        });
        doc.insert("qaf-scribe", select("qaf-scribe"));
        doc.insert("qaf-date", input("qaf-date"));
        doc.insert("qaf-division", select("qaf-division"));
        doc.insert("qaf-assessor", input("qaf-assessor"));
        doc.insert("qaf-provider", select("qaf-provider"));
        doc.insert("qaf-comments", input("qaf-comments"));
        doc.insert("qa-form", form(&[
            "qaf-scribe",
            "qaf-date",
            "qaf-division",
            "qaf-assessor",
            "qaf-provider",
            "qaf-comments",
        ]));

        doc.insert("add-scribe-link", link("#"));
        doc.insert("add-scribe-popup", Element::Panel {
            display: Display::None,
        });
        doc.insert("scribe-name", input("scribe-name"));
        doc.insert("scribe-qat", input("scribe-qat"));
        doc.insert("scribe-division", input("scribe-division"));
        doc.insert("scribe-solo-date", input("scribe-solo-date"));
        doc.insert("scribe-form", form(&[
            "scribe-name",
            "scribe-qat",
            "scribe-division",
            "scribe-solo-date",
        ]));

        doc
    }

    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, PageError> {
        let doc: Self = serde_json::from_slice(bytes)?;
        if doc.location.is_empty() {
            return Err(PageError::decode("page snapshot has no location"));
        }
        Ok(doc)
    }

    pub fn to_snapshot(&self) -> Result<Vec<u8>, PageError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn insert(&mut self, id: &str, element: Element) {
        self.elements.insert(id.to_string(), element);
    }

    pub fn get(&self, id: &str) -> Result<&Element, PageError> {
        self.elements
            .get(id)
            .ok_or_else(|| PageError::missing_element(id))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut Element, PageError> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| PageError::missing_element(id))
    }

    pub fn href(&self, id: &str) -> Result<&str, PageError> {
        match self.get(id)? {
            Element::Link { href } => Ok(href),
            _ => Err(PageError::wrong_element(id, "link")),
        }
    }

    pub fn display(&self, id: &str) -> Result<Display, PageError> {
        match self.get(id)? {
            Element::Panel { display } => Ok(*display),
            _ => Err(PageError::wrong_element(id, "panel")),
        }
    }

    pub fn set_display(&mut self, id: &str, value: Display) -> Result<(), PageError> {
        match self.get_mut(id)? {
            Element::Panel { display } => {
                *display = value;
                Ok(())
            }
            _ => Err(PageError::wrong_element(id, "panel")),
        }
    }

    pub fn visibility(&self, id: &str) -> Result<Visibility, PageError> {
        match self.get(id)? {
            Element::Overlay { visibility } => Ok(*visibility),
            _ => Err(PageError::wrong_element(id, "overlay")),
        }
    }

    pub fn set_visibility(&mut self, id: &str, value: Visibility) -> Result<(), PageError> {
        match self.get_mut(id)? {
            Element::Overlay { visibility } => {
                *visibility = value;
                Ok(())
            }
            _ => Err(PageError::wrong_element(id, "overlay")),
        }
    }

    pub fn row_count(&self, id: &str) -> Result<usize, PageError> {
        match self.get(id)? {
            Element::Region { rows, .. } => Ok(rows.len()),
            _ => Err(PageError::wrong_element(id, "region")),
        }
    }

    pub fn push_row(&mut self, id: &str, row: Vec<String>) -> Result<(), PageError> {
        match self.get_mut(id)? {
            Element::Region { rows, .. } => {
                rows.push(row);
                Ok(())
            }
            _ => Err(PageError::wrong_element(id, "region")),
        }
    }

    pub fn empty_state(&self, id: &str) -> Result<Display, PageError> {
        match self.get(id)? {
            Element::Region { empty_state, .. } => Ok(*empty_state),
            _ => Err(PageError::wrong_element(id, "region")),
        }
    }

    pub fn set_empty_state(&mut self, id: &str, value: Display) -> Result<(), PageError> {
        match self.get_mut(id)? {
            Element::Region { empty_state, .. } => {
                *empty_state = value;
                Ok(())
            }
            _ => Err(PageError::wrong_element(id, "region")),
        }
    }

    pub fn value(&self, id: &str) -> Result<&str, PageError> {
        match self.get(id)? {
            Element::Select { value, .. } => Ok(value),
            Element::Input {
                value: FormValue::Text { value },
                ..
            } => Ok(value),
            _ => Err(PageError::wrong_element(id, "text control")),
        }
    }

    pub fn set_value(&mut self, id: &str, new_value: &str) -> Result<(), PageError> {
        match self.get_mut(id)? {
            Element::Select { value, .. } => {
                *value = new_value.to_string();
                Ok(())
            }
            Element::Input { value, .. } => {
                *value = FormValue::text(new_value);
                Ok(())
            }
            _ => Err(PageError::wrong_element(id, "form control")),
        }
    }

    pub fn set_file(
        &mut self,
        id: &str,
        file_name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<(), PageError> {
        match self.get_mut(id)? {
            Element::Input { value, .. } => {
                *value = FormValue::File {
                    file_name: file_name.to_string(),
                    content_type: content_type.map(str::to_string),
                    bytes,
                };
                Ok(())
            }
            _ => Err(PageError::wrong_element(id, "input")),
        }
    }

    pub fn options(&self, id: &str) -> Result<&[SelectOption], PageError> {
        match self.get(id)? {
            Element::Select { options, .. } => Ok(options),
            _ => Err(PageError::wrong_element(id, "select")),
        }
    }

    // Selection moves to the first new option, or clears.
    pub fn replace_options(
        &mut self,
        id: &str,
        new_options: Vec<SelectOption>,
    ) -> Result<(), PageError> {
        match self.get_mut(id)? {
            Element::Select { value, options, .. } => {
                *value = new_options
                    .first()
                    .map(|option| option.value.clone())
                    .unwrap_or_default();
                *options = new_options;
                Ok(())
            }
            _ => Err(PageError::wrong_element(id, "select")),
        }
    }

    pub fn form_payload(&self, id: &str) -> Result<FormPayload, PageError> {
        let controls = match self.get(id)? {
            Element::Form { controls } => controls,
            _ => return Err(PageError::wrong_element(id, "form")),
        };

        let mut payload = FormPayload::default();
        for control in controls {
            match self.get(control)? {
                Element::Input { name, value } => {
                    payload.fields.insert(name.clone(), value.clone());
                }
                Element::Select { name, value, .. } => {
                    payload.fields.insert(name.clone(), FormValue::text(value.clone()));
                }
                other => {
                    return Err(PageError::wrong_element(
                        control,
                        &format!("form control (found {})", other.kind()),
                    ));
                }
            }
        }
        Ok(payload)
    }

    pub fn navigate(&mut self, path: &str) {
        self.location = path.to_string();
        self.navigations.push(path.to_string());
    }
}

fn region(header: &[&str]) -> Element {
    Element::Region {
        rows: vec![header.iter().map(|cell| cell.to_string()).collect()],
        empty_state: Display::None,
    }
}

fn link(href: &str) -> Element {
    Element::Link {
        href: href.to_string(),
    }
}

fn form(controls: &[&str]) -> Element {
    Element::Form {
        controls: controls.iter().map(|id| id.to_string()).collect(),
    }
}

fn input(name: &str) -> Element {
    Element::Input {
        name: name.to_string(),
        value: FormValue::text(""),
    }
}

fn select(name: &str) -> Element {
    Element::Select {
        name: name.to_string(),
        value: String::new(),
        options: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn form_payload_reads_current_control_values() {
        let mut doc = Document::tracker_page();
        doc.set_value("qaf-scribe", "Therry Malone").unwrap();
        doc.set_value("qaf-comments", "late start").unwrap();

        let payload = doc.form_payload("qa-form").unwrap();
        assert_eq!(payload.len(), 6);
        assert_eq!(payload.text("qaf-scribe"), Some("Therry Malone"));
        assert_eq!(payload.text("qaf-comments"), Some("late start"));
        assert_eq!(payload.text("qaf-date"), Some(""));
    }

    #[test]
    fn form_payload_keeps_file_values() {
        let mut doc = Document::tracker_page();
        doc.set_file("scribe-solo-date", "solo.txt", Some("text/plain"), b"2021-12-01".to_vec())
            .unwrap();

        let payload = doc.form_payload("scribe-form").unwrap();
        assert_eq!(payload.text("scribe-solo-date"), None);
        assert!(matches!(
            payload.fields.get("scribe-solo-date"),
            Some(FormValue::File { file_name, .. }) if file_name == "solo.txt"
        ));
    }

    #[test]
    fn replace_options_selects_first_or_clears() {
        let mut doc = Document::tracker_page();
        doc.replace_options("qaf-scribe", vec![SelectOption::same("A"), SelectOption::same("B")])
            .unwrap();
        assert_eq!(doc.value("qaf-scribe").unwrap(), "A");

        doc.replace_options("qaf-scribe", Vec::new()).unwrap();
        assert_eq!(doc.value("qaf-scribe").unwrap(), "");
        assert!(doc.options("qaf-scribe").unwrap().is_empty());
    }

    #[test]
    fn trigger_links_keep_their_href() {
        let mut doc = Document::tracker_page();
        assert_eq!(doc.href("add-qa-link").unwrap(), "#");
        doc.insert("add-qa-link", Element::Link {
            href: "/prospective/new".to_string(),
        });
        assert_eq!(doc.href("add-qa-link").unwrap(), "/prospective/new");
        assert_eq!(doc.href("qa-form").unwrap_err().kind, ErrorKind::WrongElement);
    }

    #[test]
    fn lookups_report_missing_and_mismatched_elements() {
        let doc = Document::tracker_page();
        assert_eq!(doc.get("nope").unwrap_err().kind, ErrorKind::MissingElement);
        assert_eq!(
            doc.visibility("add-prospective-popup").unwrap_err().kind,
            ErrorKind::WrongElement
        );
    }

    #[test]
    fn snapshot_survives_json() {
        let mut doc = Document::tracker_page();
        doc.push_row(DUE_REGION, vec!["Zaki".into(), "12/1/21".into(), "MED".into(), "2".into()])
            .unwrap();
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}

use crate::config::PopupSpec;
use crate::dom::Document;
use crate::errors::PageError;
use crate::models::{Display, Event, Visibility};
use crate::transport::Transport;
use reqwest::StatusCode;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted {
        status: StatusCode,
        navigated_to: Option<String>,
    },
    Rejected {
        status: StatusCode,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct Popup {
    spec: PopupSpec,
}

impl Popup {
    pub fn new(spec: PopupSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &PopupSpec {
        &self.spec
    }

    pub fn wire(&self, doc: &Document) -> Result<(), PageError> {
        doc.href(self.spec.link_id)?;
        doc.display(self.spec.panel_id)?;
        doc.visibility(self.spec.overlay_id)?;
        doc.form_payload(self.spec.form_id)?;
        Ok(())
    }

    pub fn is_open(&self, doc: &Document) -> Result<bool, PageError> {
        Ok(doc.display(self.spec.panel_id)? == Display::Block)
    }

    pub fn open(&self, doc: &mut Document, event: &mut Event) -> Result<(), PageError> {
        let href = doc.href(self.spec.link_id)?;
        debug!("{} link: not following {href}", self.spec.name);
        event.prevent_default();
        doc.set_display(self.spec.panel_id, Display::Block)?;
        doc.set_visibility(self.spec.overlay_id, Visibility::Visible)?;
        Ok(())
    }

    /// Request failures are logged and reported in the outcome; only a
    /// missing element is an error.
    pub async fn submit<T: Transport>(
        &self,
        doc: &mut Document,
        event: &mut Event,
        transport: &T,
        landing_path: Option<&str>,
    ) -> Result<SubmitOutcome, PageError> {
        event.prevent_default();
        doc.set_display(self.spec.panel_id, Display::None)?;
        doc.set_visibility(self.spec.overlay_id, Visibility::Hidden)?;

        let payload = doc.form_payload(self.spec.form_id)?;

        let response = match transport.post_form(self.spec.endpoint, &payload).await {
            Ok(response) => response,
            Err(err) => {
                error!("{} submission failed: {err}", self.spec.name);
                return Ok(SubmitOutcome::Failed {
                    message: err.to_string(),
                });
            }
        };

        if !response.status.is_success() {
            let err = PageError::status(self.spec.endpoint, response.status);
            error!("{} submission failed: {err}", self.spec.name);
            return Ok(SubmitOutcome::Rejected {
                status: response.status,
            });
        }

        info!("{} submitted successfully", self.spec.name);
        let navigated_to = landing_path.map(|path| {
            doc.navigate(path);
            path.to_string()
        });

        Ok(SubmitOutcome::Accepted {
            status: response.status,
            navigated_to,
        })
    }
}

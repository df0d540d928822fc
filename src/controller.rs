use crate::config::{ControllerConfig, DivisionSpec, PopupSpec};
use crate::division::{DivisionUpdater, UpdateOutcome};
use crate::dom::Document;
use crate::errors::PageError;
use crate::models::Event;
use crate::popup::{Popup, SubmitOutcome};
use crate::reconcile::{RegionState, TRACKED_REGIONS, reconcile_region};
use crate::transport::Transport;
use std::str::FromStr;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    Click(String),
    Submit(String),
    Change { id: String, value: String },
}

impl FromStr for DomEvent {
    type Err = PageError;

    // click:<id>, submit:<id>, change:<id>=<value>
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (kind, target) = spec
            .split_once(':')
            .ok_or_else(|| PageError::invalid_event(spec))?;
        if target.is_empty() {
            return Err(PageError::invalid_event(spec));
        }
        match kind {
            "click" => Ok(Self::Click(target.to_string())),
            "submit" => Ok(Self::Submit(target.to_string())),
            "change" => {
                let (id, value) = target
                    .split_once('=')
                    .ok_or_else(|| PageError::invalid_event(spec))?;
                Ok(Self::Change {
                    id: id.to_string(),
                    value: value.to_string(),
                })
            }
            _ => Err(PageError::invalid_event(spec)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    Opened { popup: &'static str },
    Submitted(SubmitOutcome),
    Updated(UpdateOutcome),
    Unbound,
}

#[derive(Debug)]
pub struct Dispatch {
    pub event: Event,
    pub handled: Handled,
}

pub struct PageController<T> {
    config: ControllerConfig,
    transport: T,
    popups: Vec<Popup>,
    division: DivisionUpdater,
}

impl<T: Transport> PageController<T> {
    pub fn new(config: ControllerConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            popups: vec![
                Popup::new(PopupSpec::prospective()),
                Popup::new(PopupSpec::new_scribe()),
            ],
            division: DivisionUpdater::new(DivisionSpec::default()),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn division(&self) -> &DivisionUpdater {
        &self.division
    }

    // A feature whose elements are missing is logged and skipped; the others
    // still run.
    pub fn on_load(&self, doc: &mut Document) -> Vec<RegionState> {
        for popup in &self.popups {
            if let Err(err) = popup.wire(doc) {
                error!("{} popup is not usable: {err}", popup.spec().name);
            }
        }
        if let Err(err) = self.division.wire(doc) {
            error!("division selector is not usable: {err}");
        }
        TRACKED_REGIONS
            .iter()
            .filter_map(|region| match reconcile_region(doc, region) {
                Ok(state) => Some(state),
                Err(err) => {
                    error!("{region} region is not usable: {err}");
                    None
                }
            })
            .collect()
    }

    pub async fn dispatch(
        &self,
        doc: &mut Document,
        dom_event: &DomEvent,
    ) -> Result<Dispatch, PageError> {
        let mut event = Event::new();
        let handled = match dom_event {
            DomEvent::Click(id) => match self.popup_by(|spec| spec.link_id == id) {
                Some(popup) => {
                    popup.open(doc, &mut event)?;
                    Handled::Opened {
                        popup: popup.spec().name,
                    }
                }
                None => Handled::Unbound,
            },
            DomEvent::Submit(id) => match self.popup_by(|spec| spec.form_id == id) {
                Some(popup) => {
                    let outcome = popup
                        .submit(
                            doc,
                            &mut event,
                            &self.transport,
                            self.config.landing_path.as_deref(),
                        )
                        .await?;
                    Handled::Submitted(outcome)
                }
                None => Handled::Unbound,
            },
            DomEvent::Change { id, value } => {
                doc.set_value(id, value)?;
                if id == self.division.spec().division_id {
                    let outcome = self.division.on_change(doc, &self.transport).await?;
                    Handled::Updated(outcome)
                } else {
                    Handled::Unbound
                }
            }
        };

        if handled == Handled::Unbound {
            warn!("no handler bound for {dom_event:?}");
        }
        Ok(Dispatch { event, handled })
    }

    // Runs every event in order; a failing event is logged and the rest
    // still run.
    pub async fn replay(
        &self,
        doc: &mut Document,
        events: &[DomEvent],
    ) -> Vec<Result<Dispatch, PageError>> {
        let mut results = Vec::with_capacity(events.len());
        for dom_event in events {
            let result = self.dispatch(doc, dom_event).await;
            match &result {
                Ok(dispatch) => info!(
                    "{dom_event:?} -> {:?} (default prevented: {})",
                    dispatch.handled,
                    dispatch.event.default_prevented()
                ),
                Err(err) => error!("{dom_event:?} failed: {err}"),
            }
            results.push(result);
        }
        results
    }

    fn popup_by(&self, matches: impl Fn(&PopupSpec) -> bool) -> Option<&Popup> {
        self.popups.iter().find(|popup| matches(popup.spec()))
    }
}

use crate::config::DivisionSpec;
use crate::dom::Document;
use crate::errors::PageError;
use crate::models::{DivisionRequest, ScribesProviders, SelectOption};
use crate::transport::Transport;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, info};

/// One change of the division selector. The generation orders changes so a
/// late answer to an old change cannot overwrite a newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionChange {
    pub generation: u64,
    pub division: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied { scribes: usize, providers: usize },
    Stale { generation: u64, latest: u64 },
    Failed { message: String },
}

#[derive(Debug, Default)]
pub struct DivisionUpdater {
    spec: DivisionSpec,
    generation: AtomicU64,
}

impl DivisionUpdater {
    pub fn new(spec: DivisionSpec) -> Self {
        Self {
            spec,
            generation: AtomicU64::new(0),
        }
    }

    pub fn spec(&self) -> &DivisionSpec {
        &self.spec
    }

    pub fn wire(&self, doc: &Document) -> Result<(), PageError> {
        doc.options(self.spec.division_id)?;
        doc.options(self.spec.scribes_id)?;
        doc.options(self.spec.providers_id)?;
        Ok(())
    }

    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn begin(&self, doc: &Document) -> Result<DivisionChange, PageError> {
        let division = doc.value(self.spec.division_id)?.to_string();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(DivisionChange {
            generation,
            division,
        })
    }

    pub async fn fetch<T: Transport>(
        &self,
        transport: &T,
        change: &DivisionChange,
    ) -> Result<ScribesProviders, PageError> {
        let body = serde_json::to_value(DivisionRequest {
            division: change.division.clone(),
        })?;
        let response = transport.post_json(self.spec.endpoint, &body).await?;
        if !response.status.is_success() {
            return Err(PageError::status(self.spec.endpoint, response.status));
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Replaces both dependent selectors, unless a newer change has been
    /// started since `change` was. Callers that run `begin` and `fetch`
    /// concurrently for several changes rely on this to drop late answers;
    /// `on_change` runs the steps back to back.
    pub fn apply(
        &self,
        doc: &mut Document,
        change: &DivisionChange,
        lists: ScribesProviders,
    ) -> Result<UpdateOutcome, PageError> {
        let latest = self.latest_generation();
        if change.generation != latest {
            debug!(
                "dropping scribes/providers for {} (generation {} < {latest})",
                change.division, change.generation
            );
            return Ok(UpdateOutcome::Stale {
                generation: change.generation,
                latest,
            });
        }

        let scribes = lists.scribes.len();
        let providers = lists.providers.len();
        doc.replace_options(self.spec.scribes_id, to_options(&lists.scribes))?;
        doc.replace_options(self.spec.providers_id, to_options(&lists.providers))?;
        info!(
            "division {}: {scribes} scribes, {providers} providers",
            change.division
        );

        Ok(UpdateOutcome::Applied { scribes, providers })
    }

    pub async fn on_change<T: Transport>(
        &self,
        doc: &mut Document,
        transport: &T,
    ) -> Result<UpdateOutcome, PageError> {
        let change = self.begin(doc)?;
        match self.fetch(transport, &change).await {
            Ok(lists) => self.apply(doc, &change, lists),
            Err(err) => {
                error!("fetching scribes/providers for {} failed: {err}", change.division);
                Ok(UpdateOutcome::Failed {
                    message: err.to_string(),
                })
            }
        }
    }
}

fn to_options(values: &[String]) -> Vec<SelectOption> {
    values.iter().map(|value| SelectOption::same(value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingTransport};

    fn labels(doc: &Document, id: &str) -> Vec<String> {
        doc.options(id)
            .unwrap()
            .iter()
            .map(|option| option.label.clone())
            .collect()
    }

    fn seeded_page() -> Document {
        let mut doc = Document::tracker_page();
        doc.replace_options("qaf-scribe", vec![SelectOption::same("Old scribe")])
            .unwrap();
        doc.replace_options("qaf-provider", vec![
            SelectOption::same("Old A"),
            SelectOption::same("Old B"),
            SelectOption::same("Old C"),
        ])
        .unwrap();
        doc
    }

    #[tokio::test]
    async fn change_posts_division_and_replaces_options() {
        let mut doc = seeded_page();
        doc.set_value("qaf-division", "North").unwrap();
        let transport = RecordingTransport::new()
            .reply(200, r#"{"scribes":["S1"],"providers":["P1","P2"]}"#);
        let updater = DivisionUpdater::default();

        let outcome = updater.on_change(&mut doc, &transport).await.unwrap();

        assert_eq!(outcome, UpdateOutcome::Applied {
            scribes: 1,
            providers: 2
        });
        assert_eq!(transport.calls(), vec![Call::Json {
            path: "/get_scribes_providers_per_division".to_string(),
            body: serde_json::json!({ "division": "North" }),
        }]);
        assert_eq!(labels(&doc, "qaf-scribe"), vec!["S1"]);
        assert_eq!(labels(&doc, "qaf-provider"), vec!["P1", "P2"]);
        let provider = &doc.options("qaf-provider").unwrap()[1];
        assert_eq!(provider.value, provider.label);
    }

    #[tokio::test]
    async fn malformed_json_keeps_prior_options() {
        let mut doc = seeded_page();
        let transport = RecordingTransport::new().reply(200, "<html>oops</html>");
        let updater = DivisionUpdater::default();

        let outcome = updater.on_change(&mut doc, &transport).await.unwrap();

        assert!(matches!(outcome, UpdateOutcome::Failed { .. }));
        assert_eq!(labels(&doc, "qaf-scribe"), vec!["Old scribe"]);
        assert_eq!(labels(&doc, "qaf-provider").len(), 3);
    }

    #[tokio::test]
    async fn error_status_keeps_prior_options() {
        let mut doc = seeded_page();
        let transport = RecordingTransport::new().reply(500, "");
        let updater = DivisionUpdater::default();

        let outcome = updater.on_change(&mut doc, &transport).await.unwrap();

        assert!(matches!(outcome, UpdateOutcome::Failed { .. }));
        assert_eq!(labels(&doc, "qaf-scribe"), vec!["Old scribe"]);
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut doc = seeded_page();
        let updater = DivisionUpdater::default();

        doc.set_value("qaf-division", "North").unwrap();
        let first = updater.begin(&doc).unwrap();
        doc.set_value("qaf-division", "South").unwrap();
        let second = updater.begin(&doc).unwrap();

        let newer = ScribesProviders {
            scribes: vec!["South scribe".into()],
            providers: vec!["South provider".into()],
        };
        let older = ScribesProviders {
            scribes: vec!["North scribe".into()],
            providers: vec![],
        };

        assert!(matches!(
            updater.apply(&mut doc, &second, newer).unwrap(),
            UpdateOutcome::Applied { .. }
        ));
        assert_eq!(updater.apply(&mut doc, &first, older).unwrap(), UpdateOutcome::Stale {
            generation: 1,
            latest: 2
        });
        assert_eq!(labels(&doc, "qaf-scribe"), vec!["South scribe"]);
        assert_eq!(labels(&doc, "qaf-provider"), vec!["South provider"]);
    }
}

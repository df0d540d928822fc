use crate::errors::PageError;
use crate::models::{FormPayload, FormValue};
use reqwest::{
    Client, StatusCode,
    multipart::{Form, Part},
};
use std::future::Future;

#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// The page's view of the server. Paths are absolute on the server
/// (`/submit_prospective`); implementations resolve them.
pub trait Transport {
    fn post_form(
        &self,
        path: &str,
        payload: &FormPayload,
    ) -> impl Future<Output = Result<Response, PageError>> + Send;

    fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<Response, PageError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

impl Transport for HttpTransport {
    async fn post_form(&self, path: &str, payload: &FormPayload) -> Result<Response, PageError> {
        let form = multipart_form(payload)?;
        let response = self.client.post(self.url(path)).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(Response { status, body })
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Response, PageError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(Response { status, body })
    }
}

fn multipart_form(payload: &FormPayload) -> Result<Form, PageError> {
    let mut form = Form::new();
    for (name, value) in &payload.fields {
        form = match value {
            FormValue::Text { value } => form.text(name.clone(), value.clone()),
            FormValue::File {
                file_name,
                content_type,
                bytes,
            } => {
                let mut part = Part::bytes(bytes.clone()).file_name(file_name.clone());
                if let Some(mime) = content_type {
                    part = part.mime_str(mime)?;
                }
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PopupSpec;
    use crate::dom::Document;
    use crate::errors::ErrorKind;
    use crate::models::Event;
    use crate::popup::{Popup, SubmitOutcome};

    fn file_payload(content_type: &str) -> FormPayload {
        let mut payload = FormPayload::default();
        payload.fields.insert("scribe-solo-date".to_string(), FormValue::File {
            file_name: "solo.txt".to_string(),
            content_type: Some(content_type.to_string()),
            bytes: b"2021-12-01".to_vec(),
        });
        payload
    }

    #[test]
    fn multipart_rejects_bad_content_type() {
        assert!(multipart_form(&file_payload("text/plain")).is_ok());
        let err = multipart_form(&file_payload("not a mime type")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transport);
    }

    #[tokio::test]
    async fn bad_content_type_fails_the_submission() {
        // Never contacted: building the form fails first.
        let transport = HttpTransport::new("http://127.0.0.1:9");
        let popup = Popup::new(PopupSpec::new_scribe());
        let mut doc = Document::tracker_page();
        doc.set_file("scribe-solo-date", "solo.txt", Some("not a mime type"), Vec::new())
            .unwrap();

        let outcome = popup
            .submit(&mut doc, &mut Event::new(), &transport, Some("/home"))
            .await
            .unwrap();

        assert!(matches!(outcome, SubmitOutcome::Failed { .. }));
        assert!(doc.navigations.is_empty());
    }
}

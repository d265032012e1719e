use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::EventId,
    protocol::{
        CreateEventResponse, Event, Facilitator, NewEvent, NewParent, VolunteerProvisioning,
    },
};

use crate::{config::ClientSettings, error::ApiFailure, session::Credentials};

pub type ApiResult<T> = Result<T, ApiFailure>;

/// Facilitator-scoped endpoints of the volunteer backend. Every call is
/// attempted exactly once.
#[async_trait]
pub trait FacilitatorApi: Send + Sync {
    async fn fetch_profile(&self, creds: &Credentials) -> ApiResult<Facilitator>;
    async fn list_events(&self, creds: &Credentials) -> ApiResult<Vec<Event>>;
    async fn create_event(&self, creds: &Credentials, draft: &NewEvent) -> ApiResult<Event>;
    async fn update_event(&self, creds: &Credentials, event: &Event) -> ApiResult<Event>;
    async fn delete_event(&self, creds: &Credentials, id: EventId) -> ApiResult<()>;
    async fn create_parent(&self, creds: &Credentials, draft: &NewParent) -> ApiResult<()>;
    async fn create_volunteer(
        &self,
        creds: &Credentials,
        body: &VolunteerProvisioning,
    ) -> ApiResult<()>;
}

pub struct HttpFacilitatorApi {
    http: Client,
    api_url: String,
}

impl HttpFacilitatorApi {
    pub fn new(settings: &ClientSettings) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn facilitator_url(&self, creds: &Credentials, suffix: &str) -> String {
        format!(
            "{}/volunteers/facilitator/{}{suffix}",
            self.api_url, creds.user_id.0
        )
    }

    fn authorized(&self, builder: RequestBuilder, creds: &Credentials) -> RequestBuilder {
        builder.header(reqwest::header::AUTHORIZATION, creds.bearer())
    }

    async fn send(&self, builder: RequestBuilder, creds: &Credentials) -> ApiResult<Response> {
        let response = self.authorized(builder, creds).send().await?;
        ensure_success(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, creds: &Credentials, url: String) -> ApiResult<T> {
        let response = self.send(self.http.get(url), creds).await?;
        decode_json(response).await
    }
}

async fn ensure_success(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiFailure::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

#[async_trait]
impl FacilitatorApi for HttpFacilitatorApi {
    async fn fetch_profile(&self, creds: &Credentials) -> ApiResult<Facilitator> {
        self.get_json(creds, self.facilitator_url(creds, "")).await
    }

    async fn list_events(&self, creds: &Credentials) -> ApiResult<Vec<Event>> {
        let events: Option<Vec<Event>> = self
            .get_json(creds, self.facilitator_url(creds, "/events"))
            .await?;
        Ok(events.unwrap_or_default())
    }

    async fn create_event(&self, creds: &Credentials, draft: &NewEvent) -> ApiResult<Event> {
        let url = self.facilitator_url(creds, "/events");
        let response = self.send(self.http.post(url).json(draft), creds).await?;
        let created: CreateEventResponse = decode_json(response).await?;
        Ok(created.event)
    }

    async fn update_event(&self, creds: &Credentials, event: &Event) -> ApiResult<Event> {
        let url = self.facilitator_url(creds, &format!("/events/{}", event.id.0));
        let response = self
            .authorized(self.http.put(url).json(event), creds)
            .send()
            .await?;
        // Error bodies are not guaranteed to be JSON; only parse after success.
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiFailure::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn delete_event(&self, creds: &Credentials, id: EventId) -> ApiResult<()> {
        let url = self.facilitator_url(creds, &format!("/events/{}", id.0));
        self.send(self.http.delete(url), creds).await?;
        Ok(())
    }

    async fn create_parent(&self, creds: &Credentials, draft: &NewParent) -> ApiResult<()> {
        let url = self.facilitator_url(creds, "/parents");
        self.send(self.http.post(url).json(draft), creds).await?;
        Ok(())
    }

    async fn create_volunteer(
        &self,
        creds: &Credentials,
        body: &VolunteerProvisioning,
    ) -> ApiResult<()> {
        let url = self.facilitator_url(creds, "/volunteers");
        self.send(self.http.post(url).json(body), creds).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;

//! Blocking HTTP transport backed by ureq.

use todo_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};

/// Executes `HttpRequest`s with a shared ureq agent.
///
/// ureq's status-code-as-error behavior is disabled so 4xx/5xx responses
/// come back as data and the access layer interprets them. Only failures to
/// get any response at all become `ApiError::Transport`.
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let content_type = req
            .headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map_or("application/json", |(_, value)| value.as_str());

        let response = match (req.method, req.body.as_deref()) {
            (HttpMethod::Get, _) => self.agent.get(&req.url).call(),
            (HttpMethod::Post, Some(body)) => self
                .agent
                .post(&req.url)
                .content_type(content_type)
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => self.agent.post(&req.url).send_empty(),
            (HttpMethod::Patch, Some(body)) => self
                .agent
                .patch(&req.url)
                .content_type(content_type)
                .send(body.as_bytes()),
            (HttpMethod::Patch, None) => self.agent.patch(&req.url).send_empty(),
            // DELETE carries the id as its body; ureq needs to be told.
            (HttpMethod::Delete, Some(body)) => self
                .agent
                .delete(&req.url)
                .force_send_body()
                .content_type(content_type)
                .send(body.as_bytes()),
            (HttpMethod::Delete, None) => self.agent.delete(&req.url).call(),
        };
        let mut response = response.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

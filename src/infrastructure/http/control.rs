//! The kill switch: detaching the billing account from a project

use async_trait::async_trait;
use tracing::warn;

use super::client::HttpClientTrait;
use crate::domain::billing::ServiceControl;
use crate::domain::DomainError;

const DEFAULT_BILLING_BASE_URL: &str = "https://cloudbilling.googleapis.com";

/// Disables billable services by clearing the project's billing account.
/// This is the provider's recommended hard stop for runaway spend; it takes
/// effect immediately and requires manual re-attachment afterwards.
#[derive(Debug)]
pub struct BillingServiceControl<C: HttpClientTrait> {
    client: C,
    bearer: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> BillingServiceControl<C> {
    pub fn new(client: C, auth_token: impl Into<String>) -> Self {
        Self::with_base_url(client, auth_token, DEFAULT_BILLING_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        auth_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_token = auth_token.into();
        let bearer = if auth_token.is_empty() {
            None
        } else {
            Some(format!("Bearer {}", auth_token))
        };

        Self {
            client,
            bearer,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn billing_info_url(&self, project_id: &str) -> String {
        format!("{}/v1/projects/{}/billingInfo", self.base_url, project_id)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        match &self.bearer {
            Some(bearer) => vec![("Authorization", bearer.as_str())],
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> ServiceControl for BillingServiceControl<C> {
    async fn disable_services(&self, project_id: &str) -> Result<(), DomainError> {
        let body = serde_json::json!({ "billingAccountName": "" });
        self.client
            .put_json(&self.billing_info_url(project_id), self.headers(), &body)
            .await?;

        warn!(project = project_id, "Billing account detached, services disabled");
        Ok(())
    }
}

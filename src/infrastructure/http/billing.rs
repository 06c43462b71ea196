//! Billing API connector: project billing info and budget lookups

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::client::HttpClientTrait;
use crate::domain::billing::{BillingSource, Money};
use crate::domain::DomainError;

const DEFAULT_BILLING_BASE_URL: &str = "https://cloudbilling.googleapis.com";
const PROVIDER: &str = "billing-api";

/// REST connector for the cloud billing API
#[derive(Debug)]
pub struct BillingApiClient<C: HttpClientTrait> {
    client: C,
    bearer: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> BillingApiClient<C> {
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

    /// `billing_account` is a full resource name like
    /// `billingAccounts/012345-ABCDEF`, used verbatim in the path.
    fn budget_url(&self, billing_account: &str, budget_id: &str) -> String {
        format!("{}/v1/{}/budgets/{}", self.base_url, billing_account, budget_id)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        match &self.bearer {
            Some(bearer) => vec![("Authorization", bearer.as_str())],
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> BillingSource for BillingApiClient<C> {
    async fn billing_account(&self, project_id: &str) -> Result<String, DomainError> {
        let json = self
            .client
            .get_json(&self.billing_info_url(project_id), self.headers(), &[])
            .await?;

        let info: WireBillingInfo = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Failed to parse billing info: {}", e))
        })?;

        if info.billing_account_name.is_empty() {
            return Err(DomainError::configuration(format!(
                "project {} has no billing account attached",
                project_id
            )));
        }

        debug!(project = project_id, account = %info.billing_account_name, "Resolved billing account");
        Ok(info.billing_account_name)
    }

    async fn fetch_budget(
        &self,
        billing_account: &str,
        budget_id: &str,
    ) -> Result<Money, DomainError> {
        let json = self
            .client
            .get_json(
                &self.budget_url(billing_account, budget_id),
                self.headers(),
                &[],
            )
            .await?;

        let budget: WireBudget = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Failed to parse budget: {}", e))
        })?;

        let amount = budget
            .amount
            .and_then(|amount| amount.specified_amount)
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "budget {} has no specified amount",
                    budget_id
                ))
            })?;

        let units = match &amount.units {
            None => 0,
            Some(serde_json::Value::String(text)) => text.parse::<i64>().map_err(|_| {
                DomainError::provider(
                    PROVIDER,
                    format!("unparsable budget units {:?} for {}", text, budget_id),
                )
            })?,
            Some(serde_json::Value::Number(number)) => number.as_i64().ok_or_else(|| {
                DomainError::provider(
                    PROVIDER,
                    format!("non-integer budget units for {}", budget_id),
                )
            })?,
            Some(other) => {
                return Err(DomainError::provider(
                    PROVIDER,
                    format!("unexpected budget units {:?} for {}", other, budget_id),
                ));
            }
        };

        Ok(Money::new(amount.currency_code, units, amount.nanos))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBillingInfo {
    #[serde(default)]
    billing_account_name: String,
}

#[derive(Debug, Deserialize)]
struct WireBudget {
    #[serde(default)]
    amount: Option<WireBudgetAmount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBudgetAmount {
    #[serde(default)]
    specified_amount: Option<WireMoney>,
}

/// Money as the API encodes it; `units` arrives as a string for the same
/// precision reasons as int64 samples.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMoney {
    #[serde(default)]
    currency_code: String,
    #[serde(default)]
    units: Option<serde_json::Value>,
    #[serde(default)]
    nanos: i32,
}

#[cfg(test)]
mod tests {
    use super::super::client::mock::MockHttpClient;
    use super::*;

    const INFO_URL: &str = "http://stub/v1/projects/demo-project/billingInfo";
    const BUDGET_URL: &str =
        "http://stub/v1/billingAccounts/012345-ABCDEF/budgets/monthly-cap";

    fn source(client: MockHttpClient) -> BillingApiClient<MockHttpClient> {
        BillingApiClient::with_base_url(client, "token", "http://stub")
    }

    #[tokio::test]
    async fn test_resolves_billing_account_name() {
        let client = MockHttpClient::new().with_response(
            INFO_URL,
            serde_json::json!({
                "name": "projects/demo-project/billingInfo",
                "billingAccountName": "billingAccounts/012345-ABCDEF",
                "billingEnabled": true
            }),
        );

        let account = source(client).billing_account("demo-project").await.unwrap();
        assert_eq!(account, "billingAccounts/012345-ABCDEF");
    }

    #[tokio::test]
    async fn test_detached_project_is_a_configuration_error() {
        let client = MockHttpClient::new().with_response(
            INFO_URL,
            serde_json::json!({"name": "projects/demo-project/billingInfo"}),
        );

        let error = source(client).billing_account("demo-project").await.unwrap_err();
        assert!(matches!(error, DomainError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_fetches_budget_with_string_units() {
        let client = MockHttpClient::new().with_response(
            BUDGET_URL,
            serde_json::json!({
                "name": "billingAccounts/012345-ABCDEF/budgets/monthly-cap",
                "amount": {
                    "specifiedAmount": {
                        "currencyCode": "USD",
                        "units": "104",
                        "nanos": 500000000
                    }
                }
            }),
        );

        let money = source(client)
            .fetch_budget("billingAccounts/012345-ABCDEF", "monthly-cap")
            .await
            .unwrap();
        assert_eq!(money, Money::new("USD", 104, 500_000_000));
        assert_eq!(money.amount(), 104.5);
    }

    #[tokio::test]
    async fn test_fetches_budget_with_numeric_units() {
        let client = MockHttpClient::new().with_response(
            BUDGET_URL,
            serde_json::json!({
                "amount": {"specifiedAmount": {"currencyCode": "USD", "units": 50}}
            }),
        );

        let money = source(client)
            .fetch_budget("billingAccounts/012345-ABCDEF", "monthly-cap")
            .await
            .unwrap();
        assert_eq!(money, Money::new("USD", 50, 0));
    }

    #[tokio::test]
    async fn test_budget_without_amount_is_a_configuration_error() {
        let client = MockHttpClient::new()
            .with_response(BUDGET_URL, serde_json::json!({"name": "x"}));

        let error = source(client)
            .fetch_budget("billingAccounts/012345-ABCDEF", "monthly-cap")
            .await
            .unwrap_err();
        assert!(matches!(error, DomainError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_unparsable_units_is_a_provider_error() {
        let client = MockHttpClient::new().with_response(
            BUDGET_URL,
            serde_json::json!({
                "amount": {"specifiedAmount": {"currencyCode": "USD", "units": "lots"}}
            }),
        );

        let error = source(client)
            .fetch_budget("billingAccounts/012345-ABCDEF", "monthly-cap")
            .await
            .unwrap_err();
        assert!(matches!(error, DomainError::Provider { .. }));
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let client = MockHttpClient::new().with_error(INFO_URL, "HTTP 500: boom");

        assert!(source(client).billing_account("demo-project").await.is_err());
    }
}

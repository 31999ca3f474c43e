use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart::Form;

use crate::{FormPayload, FormRelay, RelayConfig, RelayError, RelayReceipt};

/// Posts the form as `multipart/form-data`, the encoding a browser uses for
/// a plain `<form>` submission.
pub struct HttpFormRelay {
    config: RelayConfig,
    client: reqwest::Client,
}

impl HttpFormRelay {
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        reqwest::Url::parse(&config.endpoint)
            .map_err(|_| RelayError::InvalidEndpoint(config.endpoint.clone()))?;
        let mut builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    fn form(payload: &FormPayload) -> Form {
        payload
            .fields()
            .into_iter()
            .fold(Form::new(), |form, (k, v)| form.text(k, v.to_string()))
    }
}

#[async_trait]
impl FormRelay for HttpFormRelay {
    async fn submit(&self, payload: &FormPayload) -> Result<RelayReceipt, RelayError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header(ACCEPT, self.config.accept.as_str())
            .multipart(Self::form(payload))
            .send()
            .await?;

        let receipt = RelayReceipt {
            status: response.status().as_u16(),
        };
        if !receipt.is_success() {
            // Delivered but not accepted; the caller still treats it as sent.
            let body = response.text().await.unwrap_or_default();
            log::warn!(
                "form relay {} answered {}: {}",
                self.config.endpoint,
                receipt.status,
                body
            );
        }
        Ok(receipt)
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

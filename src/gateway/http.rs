use super::failure::{FailureContext, RequestKind, classify_failure};
use super::fields::{
    DecisionPatch, FormPayload, NewDecision, ProductInput, SubmenuFields, validate_files,
};
use super::Gateway;
use crate::api::{ApiNode, ApiProduct, ApiSubmenu};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::model::{DecisionNode, NodeId, Product, ProductId, Submenu, SubmenuId};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

const USER_AGENT: &str = concat!("trilhas/", env!("CARGO_PKG_VERSION"));

/// Some deployments wrap resources in `{"data": ...}`, others send them bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

pub struct HttpGatewayBuilder {
    config: GatewayConfig,
    client: Option<Client>,
}

impl HttpGatewayBuilder {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Uses a preconfigured client instead of building one from the config.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<HttpGateway, GatewayError> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.config.timeout())
                .user_agent(USER_AGENT)
                .build()
                .map_err(|e| GatewayError::Network(format!("failed to build HTTP client: {e}")))?,
        };

        log::info!("Gateway ready for {}", self.config.base_url());
        Ok(HttpGateway {
            config: self.config,
            client,
        })
    }
}

/// [`Gateway`] over the backend's REST API.
pub struct HttpGateway {
    config: GatewayConfig,
    client: Client,
}

impl HttpGateway {
    pub fn builder(config: GatewayConfig) -> HttpGatewayBuilder {
        HttpGatewayBuilder::new(config)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Appends `segments` to the configured base URL, keeping any base path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.config.base_url().clone();
        url.path_segments_mut()
            .map_err(|_| {
                GatewayError::InvalidInput(format!(
                    "'{}' cannot be used as a base URL",
                    self.config.base_url()
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn multipart(&self, form: &FormPayload) -> Result<Form, GatewayError> {
        validate_files(&form.files, self.config.max_upload_bytes())?;

        let mut multipart = Form::new();
        for (name, value) in &form.fields {
            multipart = multipart.text(name.clone(), value.clone());
        }
        for file in &form.files {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
            if let Some(mime) = &file.mime_type {
                part = part.mime_str(mime).map_err(|e| {
                    GatewayError::InvalidInput(format!("{}: {e}", file.file_name))
                })?;
            }
            multipart = multipart.part("arquivos[]", part);
        }
        Ok(multipart)
    }

    /// Sends the request and returns the body of a successful response.
    async fn send(
        &self,
        request: RequestBuilder,
        ctx: FailureContext<'_>,
    ) -> Result<String, GatewayError> {
        let response = request.send().await.map_err(|e| {
            log::error!("Request failed before a response arrived: {e}");
            GatewayError::Network(e.to_string())
        })?;

        let status = response.status();
        let url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if status.is_success() {
            log::debug!("{} {} -> {}", status.as_u16(), url.path(), body.len());
            Ok(body)
        } else {
            let err = classify_failure(status.as_u16(), &body, &ctx);
            log::warn!("{} {}: {}", status.as_u16(), url.path(), err);
            Err(err)
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, GatewayError> {
        let url = self.endpoint(segments)?;
        log::debug!("GET {url}");
        let body = self
            .send(self.client.get(url), FailureContext::new(RequestKind::Read))
            .await?;
        decode(&body)
    }

    async fn submit_form<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        form: &FormPayload,
    ) -> Result<T, GatewayError> {
        let url = self.endpoint(segments)?;
        let multipart = self.multipart(form)?;
        let file_names = form.file_names();
        log::debug!(
            "POST {url} ({} fields, {} files)",
            form.fields.len(),
            file_names.len()
        );

        let ctx = FailureContext::new(RequestKind::Write).with_files(&file_names);
        let body = self
            .send(self.client.post(url).multipart(multipart), ctx)
            .await?;
        decode(&body)
    }

    async fn remove(&self, segments: &[&str], kind: RequestKind) -> Result<(), GatewayError> {
        let url = self.endpoint(segments)?;
        log::debug!("DELETE {url}");
        self.send(self.client.delete(url), FailureContext::new(kind))
            .await
            .map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, GatewayError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(Envelope::into_inner)
        .map_err(|e| GatewayError::Decode(e.to_string()))
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list_decisions(&self) -> Result<Vec<ApiNode>, GatewayError> {
        self.fetch(&["decisoes"]).await
    }

    async fn list_all_decisions(&self) -> Result<Vec<ApiNode>, GatewayError> {
        self.fetch(&["decisoes", "all"]).await
    }

    async fn get_decision(&self, id: NodeId) -> Result<DecisionNode, GatewayError> {
        let raw: ApiNode = self.fetch(&["decisoes", id.to_string().as_str()]).await?;
        Ok(DecisionNode::from(raw))
    }

    async fn create_decision(&self, fields: &NewDecision) -> Result<DecisionNode, GatewayError> {
        let form = fields.to_form()?;
        let raw: ApiNode = self.submit_form(&["decisoes"], &form).await?;
        log::info!("Created step {}", raw.id);
        Ok(DecisionNode::from(raw))
    }

    async fn update_decision(
        &self,
        id: NodeId,
        patch: &DecisionPatch,
    ) -> Result<DecisionNode, GatewayError> {
        let form = patch.to_form();
        let raw: ApiNode = self
            .submit_form(&["decisoes", id.to_string().as_str()], &form)
            .await?;
        Ok(DecisionNode::from(raw))
    }

    async fn delete_decision(&self, id: NodeId) -> Result<(), GatewayError> {
        self.remove(&["decisoes", id.to_string().as_str()], RequestKind::DeleteDecision(id))
            .await?;
        log::info!("Deleted step {id}");
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>, GatewayError> {
        let raw: Vec<ApiProduct> = self.fetch(&["produtos"]).await?;
        Ok(raw.into_iter().map(Product::from).collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, GatewayError> {
        let raw: ApiProduct = self.fetch(&["produtos", id.to_string().as_str()]).await?;
        Ok(Product::from(raw))
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product, GatewayError> {
        let payload = input.to_payload()?;
        let url = self.endpoint(&["produtos"])?;
        log::debug!("POST {url}");
        let body = self
            .send(
                self.client.post(url).json(&payload),
                FailureContext::new(RequestKind::Write),
            )
            .await?;
        let raw: ApiProduct = decode(&body)?;
        Ok(Product::from(raw))
    }

    async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, GatewayError> {
        let payload = input.to_payload()?;
        let url = self.endpoint(&["produtos", id.to_string().as_str()])?;
        log::debug!("PUT {url}");
        let body = self
            .send(
                self.client.put(url).json(&payload),
                FailureContext::new(RequestKind::Write),
            )
            .await?;
        let raw: ApiProduct = decode(&body)?;
        Ok(Product::from(raw))
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), GatewayError> {
        self.remove(&["produtos", id.to_string().as_str()], RequestKind::DeleteOther)
            .await
    }

    async fn create_submenu(&self, fields: &SubmenuFields) -> Result<Submenu, GatewayError> {
        let form = fields.to_create_form()?;
        let raw: ApiSubmenu = self.submit_form(&["submenus"], &form).await?;
        Ok(Submenu::from(raw))
    }

    async fn update_submenu(
        &self,
        id: SubmenuId,
        fields: &SubmenuFields,
    ) -> Result<Submenu, GatewayError> {
        let form = fields.to_update_form();
        let raw: ApiSubmenu = self
            .submit_form(&["submenus", id.to_string().as_str()], &form)
            .await?;
        Ok(Submenu::from(raw))
    }

    async fn delete_submenu(&self, id: SubmenuId) -> Result<(), GatewayError> {
        self.remove(&["submenus", id.to_string().as_str()], RequestKind::DeleteOther)
            .await
    }
}

//! Request payloads and their multipart field layout.
//!
//! Decision and submenu writes go out as `multipart/form-data`; the text parts are
//! built here as plain `(name, value)` pairs so the layout can be checked without a
//! network stack. `HttpGateway` turns a [`FormPayload`] into a reqwest form.

use crate::api::ApiProductPayload;
use crate::error::{FileRejection, GatewayError};
use crate::model::{GoTo, NodeId, ProductId, ProductKind};

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Checks every file against the upload limit and reports all offenders at once.
pub fn validate_files(files: &[FileUpload], max_bytes: u64) -> Result<(), GatewayError> {
    let rejections: Vec<FileRejection> = files
        .iter()
        .filter_map(|file| {
            let reason = if file.bytes.is_empty() {
                "file is empty".to_string()
            } else if file.bytes.len() as u64 > max_bytes {
                format!(
                    "file is {} bytes, the limit is {} bytes",
                    file.bytes.len(),
                    max_bytes
                )
            } else {
                return None;
            };
            Some(FileRejection {
                file_name: file.file_name.clone(),
                reason,
            })
        })
        .collect();

    if rejections.is_empty() {
        Ok(())
    } else {
        Err(GatewayError::FileValidation(rejections))
    }
}

/// Link between a node (or submenu) and a product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductLink {
    pub product_id: ProductId,
    pub recommended: bool,
    pub order: Option<i64>,
}

/// The text parts and files of a multipart request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FileUpload>,
}

impl FormPayload {
    fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// First value sent under `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.file_name.clone()).collect()
    }

    fn push_products(&mut self, products: &[ProductLink]) {
        for (idx, link) in products.iter().enumerate() {
            self.push(
                format!("produtos[{idx}][produto_id]"),
                link.product_id.to_string(),
            );
            self.push(
                format!("produtos[{idx}][recomendado]"),
                if link.recommended { "1" } else { "0" },
            );
            let order = link.order.unwrap_or(idx as i64 + 1);
            self.push(format!("produtos[{idx}][ordem]"), order.to_string());
        }
    }
}

/// Fields for `POST /decisoes`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDecision {
    pub description: String,
    pub title: Option<String>,
    pub parent_id: Option<NodeId>,
    pub go_to: Option<GoTo>,
    pub order: Option<i64>,
    pub files: Vec<FileUpload>,
    pub products: Vec<ProductLink>,
}

impl NewDecision {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_parent(mut self, parent_id: NodeId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_go_to(mut self, go_to: GoTo) -> Self {
        self.go_to = Some(go_to);
        self
    }

    pub fn with_file(mut self, file: FileUpload) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_product(mut self, link: ProductLink) -> Self {
        self.products.push(link);
        self
    }

    pub fn to_form(&self) -> Result<FormPayload, GatewayError> {
        if self.description.trim().is_empty() {
            return Err(GatewayError::InvalidInput(
                "a step needs a description".to_string(),
            ));
        }

        let mut form = FormPayload::default();
        form.push("descricao", self.description.trim());
        if let Some(title) = self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            form.push("titulo", title.trim());
        }
        if let Some(parent_id) = self.parent_id {
            form.push("id_pai", parent_id.to_string());
        }
        if let Some(go_to) = self.go_to.as_ref().filter(|g| !g.is_empty()) {
            form.push("go_to", go_to.to_transport());
        }
        if let Some(order) = self.order {
            form.push("ordem", order.to_string());
        }
        form.push_products(&self.products);
        form.files = self.files.clone();
        Ok(form)
    }
}

/// Partial update for `POST /decisoes/{id}` with `_method=PUT`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionPatch {
    pub description: Option<String>,
    pub title: Option<String>,
    pub order: Option<i64>,
    /// `Some(empty)` clears the go-to list on the backend.
    pub go_to: Option<GoTo>,
    pub products: Option<Vec<ProductLink>>,
    pub files: Vec<FileUpload>,
}

impl DecisionPatch {
    /// A patch that only moves the node to a new 1-based position.
    pub fn order(order: i64) -> Self {
        Self {
            order: Some(order),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.title.is_none()
            && self.order.is_none()
            && self.go_to.is_none()
            && self.products.is_none()
            && self.files.is_empty()
    }

    pub fn to_form(&self) -> FormPayload {
        let mut form = FormPayload::default();
        form.push("_method", "PUT");
        if let Some(description) = &self.description {
            form.push("descricao", description.trim());
        }
        if let Some(title) = &self.title {
            form.push("titulo", title.trim());
        }
        if let Some(order) = self.order {
            form.push("ordem", order.to_string());
        }
        if let Some(go_to) = &self.go_to {
            form.push("go_to", go_to.to_transport());
        }
        if let Some(products) = &self.products {
            form.push_products(products);
        }
        form.files = self.files.clone();
        form
    }
}

/// Fields for submenu create (`POST /submenus`) and update (`POST /submenus/{id}`, `_method=PUT`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmenuFields {
    pub decision_id: Option<NodeId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub products: Option<Vec<ProductLink>>,
    pub files: Vec<FileUpload>,
}

impl SubmenuFields {
    pub fn to_create_form(&self) -> Result<FormPayload, GatewayError> {
        let Some(decision_id) = self.decision_id else {
            return Err(GatewayError::InvalidInput(
                "a submenu must belong to a step".to_string(),
            ));
        };
        if self.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
            return Err(GatewayError::InvalidInput(
                "a submenu needs a title".to_string(),
            ));
        }

        let mut form = FormPayload::default();
        form.push("decisao_id", decision_id.to_string());
        self.push_common(&mut form);
        Ok(form)
    }

    pub fn to_update_form(&self) -> FormPayload {
        let mut form = FormPayload::default();
        form.push("_method", "PUT");
        if let Some(decision_id) = self.decision_id {
            form.push("decisao_id", decision_id.to_string());
        }
        self.push_common(&mut form);
        form
    }

    fn push_common(&self, form: &mut FormPayload) {
        if let Some(title) = &self.title {
            form.push("titulo", title.trim());
        }
        if let Some(description) = &self.description {
            form.push("descricao", description.trim());
        }
        if let Some(products) = &self.products {
            form.push_products(products);
        }
        form.files = self.files.clone();
    }
}

/// Body of product create/update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub kind: ProductKind,
    pub price: Option<f64>,
    pub external_link: Option<String>,
    pub image_url: Option<String>,
    pub active: bool,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, kind: ProductKind) -> Self {
        Self {
            name: name.into(),
            kind,
            active: true,
            ..Self::default()
        }
    }

    pub fn to_payload(&self) -> Result<ApiProductPayload, GatewayError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(GatewayError::InvalidInput(
                "a product needs a name".to_string(),
            ));
        }
        if self.price.is_some_and(|p| !p.is_finite() || p < 0.0) {
            return Err(GatewayError::InvalidInput(
                "price must be a non-negative number".to_string(),
            ));
        }

        Ok(ApiProductPayload {
            nome: name.to_string(),
            descricao: self.description.trim().to_string(),
            tipo: self.kind.as_wire().to_string(),
            preco: self.price,
            link: non_blank(self.external_link.as_deref()),
            imagem: non_blank(self.image_url.as_deref()),
            ativo: self.active,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

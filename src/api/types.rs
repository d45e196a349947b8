use super::lenient::{bool_like, decimal_like};
use crate::model::{AttachmentId, GoTo, NodeId, ProductId, SubmenuId};
use serde::{Deserialize, Serialize};

/// A decision node exactly as `GET /decisoes` returns it, nested via `all_children`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiNode {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub id_pai: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_to: Option<GoTo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordem: Option<i64>,
    #[serde(default, alias = "anexos", skip_serializing_if = "Option::is_none")]
    pub documentos: Option<Vec<ApiDocument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submenus: Option<Vec<ApiSubmenu>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produtos: Option<Vec<ApiProductRef>>,
    #[serde(default, alias = "children", skip_serializing_if = "Option::is_none")]
    pub all_children: Option<Vec<ApiNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A stored document (`documentos[]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiDocument {
    pub id: AttachmentId,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub caminho: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_presignada: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSubmenu {
    pub id: SubmenuId,
    #[serde(default)]
    pub decisao_id: Option<NodeId>,
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default, alias = "anexos", skip_serializing_if = "Option::is_none")]
    pub documentos: Option<Vec<ApiDocument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produtos: Option<Vec<ApiProductRef>>,
}

/// A product as `GET /produtos` returns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiProduct {
    pub id: ProductId,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default, deserialize_with = "decimal_like")]
    pub preco: Option<f64>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub imagem: Option<String>,
    #[serde(default, deserialize_with = "bool_like")]
    pub ativo: Option<bool>,
}

/// Relation columns of a node/submenu product link, when the backend nests them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiPivot {
    #[serde(default, deserialize_with = "bool_like")]
    pub recomendado: Option<bool>,
    #[serde(default)]
    pub ordem: Option<i64>,
}

/// A product referenced from a node or submenu. The relation columns arrive either
/// inline or nested under `pivot`; inline values win.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiProductRef {
    #[serde(flatten)]
    pub produto: ApiProduct,
    #[serde(default, deserialize_with = "bool_like", skip_serializing_if = "Option::is_none")]
    pub recomendado: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordem: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<ApiPivot>,
}

/// JSON body sent by `POST /produtos` and `PUT /produtos/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiProductPayload {
    pub nome: String,
    pub descricao: String,
    pub tipo: String,
    pub preco: Option<f64>,
    pub link: Option<String>,
    pub imagem: Option<String>,
    pub ativo: bool,
}

/// Failure body. Laravel-style: `message` plus an optional per-field `errors` map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Map<String, serde_json::Value>>,
}

//! The tree normalizer: backend wire shapes into canonical model types.
//!
//! Field mapping:
//!
//! | wire            | canonical     |
//! |-----------------|---------------|
//! | `descricao`     | `description` |
//! | `titulo`        | `title`       |
//! | `id_pai`        | `parent_id`   |
//! | `go_to`         | `go_to`       |
//! | `ordem`         | `order`       |
//! | `documentos`    | `attachments` |
//! | `all_children`  | `children`    |
//!
//! Conversion is deterministic and side-effect free. Siblings (and product links)
//! are ordered by their `order` key, unordered entries last, ties kept in arrival order.

use super::attachment::Attachment;
use super::definition::{DecisionNode, Product, ProductKind, ProductRef, Submenu};
use crate::api::{ApiDocument, ApiNode, ApiProduct, ApiProductRef, ApiSubmenu};
use itertools::Itertools;

/// Converts the nested `GET /decisoes` payload (or the flat `GET /decisoes/all` one)
/// into canonical nodes.
pub fn normalize(raw: Vec<ApiNode>) -> Vec<DecisionNode> {
    sort_by_order(raw.into_iter().map(DecisionNode::from), |node| node.order)
}

fn sort_by_order<T>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> Option<i64>) -> Vec<T> {
    // `sorted_by_key` is a stable sort.
    items
        .sorted_by_key(|item| match key(item) {
            Some(order) => (false, order),
            None => (true, 0),
        })
        .collect()
}

impl From<ApiNode> for DecisionNode {
    fn from(raw: ApiNode) -> Self {
        let children = raw.all_children.map(normalize).unwrap_or_default();
        DecisionNode {
            id: raw.id,
            title: raw.titulo,
            description: raw.descricao.unwrap_or_default(),
            parent_id: raw.id_pai,
            go_to: raw.go_to.unwrap_or_default(),
            order: raw.ordem,
            attachments: convert_documents(raw.documentos),
            submenus: raw
                .submenus
                .unwrap_or_default()
                .into_iter()
                .map(Submenu::from)
                .collect(),
            products: convert_product_refs(raw.produtos),
            children,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            highlighted: false,
        }
    }
}

fn convert_documents(raw: Option<Vec<ApiDocument>>) -> Vec<Attachment> {
    raw.unwrap_or_default()
        .into_iter()
        .map(Attachment::from)
        .collect()
}

fn convert_product_refs(raw: Option<Vec<ApiProductRef>>) -> Vec<ProductRef> {
    sort_by_order(
        raw.unwrap_or_default().into_iter().map(ProductRef::from),
        |link| link.order,
    )
}

impl From<ApiDocument> for Attachment {
    fn from(raw: ApiDocument) -> Self {
        Attachment {
            id: raw.id,
            name: raw.nome.unwrap_or_default(),
            mime_type: raw.tipo.filter(|t| !t.is_empty()),
            storage_path: raw.caminho.unwrap_or_default(),
            signed_url: raw.url_presignada.filter(|url| !url.is_empty()),
        }
    }
}

impl From<ApiSubmenu> for Submenu {
    fn from(raw: ApiSubmenu) -> Self {
        Submenu {
            id: raw.id,
            decision_id: raw.decisao_id,
            title: raw.titulo.unwrap_or_default(),
            description: raw.descricao.unwrap_or_default(),
            attachments: convert_documents(raw.documentos),
            products: convert_product_refs(raw.produtos),
        }
    }
}

impl From<ApiProduct> for Product {
    fn from(raw: ApiProduct) -> Self {
        Product {
            id: raw.id,
            name: raw.nome.unwrap_or_default(),
            description: raw.descricao.unwrap_or_default(),
            kind: raw
                .tipo
                .as_deref()
                .map(ProductKind::from_wire)
                .unwrap_or_default(),
            price: raw.preco,
            external_link: raw.link.filter(|l| !l.is_empty()),
            image_url: raw.imagem.filter(|i| !i.is_empty()),
            // Products are active unless the backend says otherwise.
            active: raw.ativo.unwrap_or(true),
        }
    }
}

impl From<ApiProductRef> for ProductRef {
    fn from(raw: ApiProductRef) -> Self {
        let pivot = raw.pivot.unwrap_or_default();
        ProductRef {
            recommended: raw.recomendado.or(pivot.recomendado).unwrap_or(false),
            order: raw.ordem.or(pivot.ordem),
            product: Product::from(raw.produto),
        }
    }
}

use super::attachment::Attachment;
use super::go_to::GoTo;

/// Backend-assigned identifier of a decision node.
pub type NodeId = u64;
/// Backend-assigned identifier of a product. Independent id space from nodes.
pub type ProductId = u64;
/// Backend-assigned identifier of a submenu.
pub type SubmenuId = u64;

/// A step in a playbook tree. Root nodes (no parent) are the playbooks ("trilhas") themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionNode {
    pub id: NodeId,
    pub title: Option<String>,
    pub description: String,
    pub parent_id: Option<NodeId>,
    /// "Next step" targets. Only meaningful on root nodes.
    pub go_to: GoTo,
    /// Advisory sort key among siblings. Gaps and duplicates are tolerated.
    pub order: Option<i64>,
    pub attachments: Vec<Attachment>,
    pub submenus: Vec<Submenu>,
    pub products: Vec<ProductRef>,
    pub children: Vec<DecisionNode>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Set by the search engine when this node itself matched the current term.
    pub highlighted: bool,
}

impl DecisionNode {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The label lists should show: the title, or the description when the title is absent or blank.
    pub fn display_name(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.description,
        }
    }

    /// Every document reachable from the detail panel: the node's own attachments
    /// followed by the attachments of each submenu, in submenu order.
    pub fn all_documents(&self) -> Vec<&Attachment> {
        self.attachments
            .iter()
            .chain(self.submenus.iter().flat_map(|s| s.attachments.iter()))
            .collect()
    }

    /// Copies every field except `children`, which is replaced by the given list.
    pub fn with_children(&self, children: Vec<DecisionNode>) -> DecisionNode {
        DecisionNode {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            parent_id: self.parent_id,
            go_to: self.go_to.clone(),
            order: self.order,
            attachments: self.attachments.clone(),
            submenus: self.submenus.clone(),
            products: self.products.clone(),
            children,
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
            highlighted: self.highlighted,
        }
    }
}

/// A secondary content block attached to a node. Has no children of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submenu {
    pub id: SubmenuId,
    pub decision_id: Option<NodeId>,
    pub title: String,
    pub description: String,
    pub attachments: Vec<Attachment>,
    pub products: Vec<ProductRef>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProductKind {
    #[default]
    Service,
    Product,
}

impl ProductKind {
    /// Lenient parse of the backend's `tipo` field. Anything unrecognised is a service.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "produto" | "product" => ProductKind::Product,
            _ => ProductKind::Service,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            ProductKind::Service => "servico",
            ProductKind::Product => "produto",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub kind: ProductKind,
    pub price: Option<f64>,
    pub external_link: Option<String>,
    pub image_url: Option<String>,
    pub active: bool,
}

/// A product as referenced from a node or submenu.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRef {
    pub product: Product,
    pub recommended: bool,
    pub order: Option<i64>,
}

impl ProductRef {
    pub fn id(&self) -> ProductId {
        self.product.id
    }
}

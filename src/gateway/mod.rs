//! The remote data gateway.
//!
//! [`Gateway`] is the seam between the client core and the playbook backend. The
//! stores and the reorder protocol only ever talk to `dyn Gateway`, so tests drive
//! them with an in-memory implementation while [`HttpGateway`] speaks HTTP.

pub mod failure;
pub mod fields;
pub mod http;

pub use failure::{FailureContext, RequestKind, classify_failure};
pub use fields::{
    DecisionPatch, FileUpload, FormPayload, NewDecision, ProductInput, ProductLink,
    SubmenuFields, validate_files,
};
pub use http::{HttpGateway, HttpGatewayBuilder};

use crate::api::ApiNode;
use crate::error::GatewayError;
use crate::model::{DecisionNode, NodeId, Product, ProductId, Submenu, SubmenuId};
use async_trait::async_trait;

#[async_trait]
pub trait Gateway: Send + Sync {
    /// `GET /decisoes`: the nested tree, as the backend sends it.
    async fn list_decisions(&self) -> Result<Vec<ApiNode>, GatewayError>;

    /// `GET /decisoes/all`: every node, flat.
    async fn list_all_decisions(&self) -> Result<Vec<ApiNode>, GatewayError>;

    async fn get_decision(&self, id: NodeId) -> Result<DecisionNode, GatewayError>;

    async fn create_decision(&self, fields: &NewDecision) -> Result<DecisionNode, GatewayError>;

    async fn update_decision(
        &self,
        id: NodeId,
        patch: &DecisionPatch,
    ) -> Result<DecisionNode, GatewayError>;

    /// Fails with [`GatewayError::HasChildren`] when the node still has child steps.
    async fn delete_decision(&self, id: NodeId) -> Result<(), GatewayError>;

    async fn list_products(&self) -> Result<Vec<Product>, GatewayError>;

    async fn get_product(&self, id: ProductId) -> Result<Product, GatewayError>;

    async fn create_product(&self, input: &ProductInput) -> Result<Product, GatewayError>;

    async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, GatewayError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), GatewayError>;

    async fn create_submenu(&self, fields: &SubmenuFields) -> Result<Submenu, GatewayError>;

    async fn update_submenu(
        &self,
        id: SubmenuId,
        fields: &SubmenuFields,
    ) -> Result<Submenu, GatewayError>;

    async fn delete_submenu(&self, id: SubmenuId) -> Result<(), GatewayError>;
}

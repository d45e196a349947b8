//! Session-owned caches of backend state.
//!
//! The backend is the source of truth. [`TrilhaStore`] holds a point-in-time copy
//! of the step tree and reloads it after every mutation; [`ProductCatalog`] patches
//! its product list in place from the mutation responses.

use crate::api::ApiNode;
use crate::error::GatewayError;
use crate::gateway::{DecisionPatch, Gateway, NewDecision, ProductInput};
use crate::model::{DecisionNode, NodeId, Product, ProductId, find, normalize};

/// Identifies one load. Results carrying an outdated ticket are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Default)]
pub struct TrilhaStore {
    tree: Vec<DecisionNode>,
    loading: bool,
    error: Option<GatewayError>,
    generation: u64,
}

impl TrilhaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with an already normalized tree.
    pub fn with_tree(tree: Vec<DecisionNode>) -> Self {
        Self {
            tree,
            ..Self::default()
        }
    }

    pub fn tree(&self) -> &[DecisionNode] {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Vec<DecisionNode> {
        &mut self.tree
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&GatewayError> {
        self.error.as_ref()
    }

    pub fn find(&self, id: NodeId) -> Option<&DecisionNode> {
        find(&self.tree, id)
    }

    /// Starts a load. Any ticket issued before this one becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        LoadTicket(self.generation)
    }

    /// Applies the outcome of a load. Returns `false` when the result was stale and
    /// has been dropped.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<ApiNode>, GatewayError>,
    ) -> bool {
        if ticket.0 != self.generation {
            log::debug!(
                "Discarding late tree response (ticket {}, current {})",
                ticket.0,
                self.generation
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(raw) => {
                self.tree = normalize(raw);
                log::debug!("Loaded {} root steps", self.tree.len());
            }
            Err(err) => {
                log::error!("Failed to load steps: {err}");
                self.error = Some(err);
            }
        }
        true
    }

    /// Makes every outstanding ticket stale, e.g. when the view holding the store goes away.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    pub async fn reload(&mut self, gateway: &dyn Gateway) -> Result<(), GatewayError> {
        let ticket = self.begin_load();
        let result = gateway.list_decisions().await;
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.complete_load(ticket, result);
        outcome
    }

    pub async fn create(
        &mut self,
        gateway: &dyn Gateway,
        fields: &NewDecision,
    ) -> Result<DecisionNode, GatewayError> {
        self.start_mutation();
        let created = self.finish_mutation(gateway.create_decision(fields).await)?;
        self.reload_after_mutation(gateway).await;
        Ok(created)
    }

    pub async fn update(
        &mut self,
        gateway: &dyn Gateway,
        id: NodeId,
        patch: &DecisionPatch,
    ) -> Result<DecisionNode, GatewayError> {
        self.start_mutation();
        let updated = self.finish_mutation(gateway.update_decision(id, patch).await)?;
        self.reload_after_mutation(gateway).await;
        Ok(updated)
    }

    /// Deletes exactly one node. A backend refusal because of child steps comes back
    /// as [`GatewayError::HasChildren`] and leaves the tree untouched.
    pub async fn delete(&mut self, gateway: &dyn Gateway, id: NodeId) -> Result<(), GatewayError> {
        self.start_mutation();
        self.finish_mutation(gateway.delete_decision(id).await)?;
        self.reload_after_mutation(gateway).await;
        Ok(())
    }

    fn start_mutation(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish_mutation<T>(&mut self, result: Result<T, GatewayError>) -> Result<T, GatewayError> {
        self.loading = false;
        result.inspect_err(|err| self.error = Some(err.clone()))
    }

    async fn reload_after_mutation(&mut self, gateway: &dyn Gateway) {
        // The mutation itself succeeded; a failed refresh only leaves the cache stale.
        if let Err(err) = self.reload(gateway).await {
            log::warn!("Reload after mutation failed: {err}");
        }
    }
}

#[derive(Debug, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
    loading: bool,
    error: Option<GatewayError>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&GatewayError> {
        self.error.as_ref()
    }

    pub async fn load(&mut self, gateway: &dyn Gateway) -> Result<(), GatewayError> {
        self.loading = true;
        self.error = None;
        let result = gateway.list_products().await;
        self.loading = false;
        match result {
            Ok(products) => {
                self.products = products;
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to load products: {err}");
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Creates a product and appends it to the local list.
    pub async fn add(
        &mut self,
        gateway: &dyn Gateway,
        input: &ProductInput,
    ) -> Result<Product, GatewayError> {
        let created = self.record(gateway.create_product(input).await)?;
        self.products.push(created.clone());
        Ok(created)
    }

    /// Updates a product and replaces the local entry with the backend's version.
    pub async fn update(
        &mut self,
        gateway: &dyn Gateway,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, GatewayError> {
        let updated = self.record(gateway.update_product(id, input).await)?;
        for product in self.products.iter_mut().filter(|p| p.id == id) {
            *product = updated.clone();
        }
        Ok(updated)
    }

    pub async fn remove(&mut self, gateway: &dyn Gateway, id: ProductId) -> Result<(), GatewayError> {
        self.record(gateway.delete_product(id).await)?;
        self.products.retain(|p| p.id != id);
        Ok(())
    }

    fn record<T>(&mut self, result: Result<T, GatewayError>) -> Result<T, GatewayError> {
        result.inspect_err(|err| self.error = Some(err.clone()))
    }
}

//! Common test utilities: playbook fixtures and an in-memory gateway.
#![allow(dead_code)]

use async_trait::async_trait;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use trilhas::api::{ApiNode, ApiProduct};
use trilhas::error::GatewayError;
use trilhas::gateway::{DecisionPatch, Gateway, NewDecision, ProductInput, SubmenuFields};
use trilhas::model::{DecisionNode, NodeId, Product, ProductId, Submenu, SubmenuId};

/// A nested `GET /decisoes` payload exercising the lenient parts of the wire format:
/// out-of-order siblings, a null `ordem`, a comma string `go_to`, a decimal string
/// price, integer booleans and pivot columns.
pub const PLAYBOOK_JSON: &str = r#"[
  {
    "id": 10,
    "titulo": "Pós-venda",
    "descricao": "Acompanhamento do cliente",
    "id_pai": null,
    "go_to": null,
    "ordem": 2,
    "all_children": []
  },
  {
    "id": 1,
    "titulo": "Vendas consultivas",
    "descricao": "Trilha principal",
    "id_pai": null,
    "go_to": "10, 99",
    "ordem": 1,
    "documentos": [
      {
        "id": 100,
        "nome": "roteiro.pdf",
        "caminho": "docs/roteiro.pdf",
        "tipo": "application/pdf",
        "url_presignada": "https://cdn.example.com/roteiro.pdf?sig=abc"
      }
    ],
    "produtos": [
      {
        "id": 7,
        "nome": "Plano Pro",
        "descricao": "Plano completo",
        "tipo": "produto",
        "preco": "199,90",
        "ativo": 1,
        "pivot": { "recomendado": 1, "ordem": 1 }
      }
    ],
    "all_children": [
      {
        "id": 2,
        "titulo": null,
        "descricao": "Descoberta",
        "id_pai": 1,
        "ordem": null,
        "all_children": [
          {
            "id": 3,
            "descricao": "Etapa de Qualificação do lead",
            "id_pai": 2,
            "documentos": [
              { "id": 101, "nome": "checklist.png", "caminho": "docs/checklist.png", "tipo": "image/png" }
            ]
          }
        ]
      },
      {
        "id": 4,
        "titulo": "Apresentação",
        "descricao": "Demonstrar a solução",
        "id_pai": 1,
        "ordem": 1,
        "all_children": null
      }
    ]
  }
]"#;

pub fn playbook_raw() -> Vec<ApiNode> {
    serde_json::from_str(PLAYBOOK_JSON).expect("fixture must parse")
}

/// Builds a canonical node with a description and children.
pub fn node(id: NodeId, description: &str, children: Vec<DecisionNode>) -> DecisionNode {
    DecisionNode {
        id,
        description: description.to_string(),
        children,
        ..Default::default()
    }
}

pub fn titled(id: NodeId, title: &str, description: &str, children: Vec<DecisionNode>) -> DecisionNode {
    DecisionNode {
        title: Some(title.to_string()),
        ..node(id, description, children)
    }
}

/// Three levels where only the grandchild `3` mentions "qualificação".
///
/// ```text
/// 1 Vendas consultivas
/// ├── 2 Descoberta
/// │   └── 3 Etapa de qualificação do lead
/// └── 4 Apresentação
/// 10 Pós-venda
/// └── 11 Pesquisa de satisfação
/// ```
pub fn qualification_tree() -> Vec<DecisionNode> {
    vec![
        titled(
            1,
            "Vendas consultivas",
            "Trilha principal",
            vec![
                node(2, "Descoberta", vec![node(3, "Etapa de qualificação do lead", vec![])]),
                node(4, "Apresentação", vec![]),
            ],
        ),
        titled(
            10,
            "Pós-venda",
            "Acompanhamento",
            vec![node(11, "Pesquisa de satisfação", vec![])],
        ),
    ]
}

/// Siblings `[A(1), B(2), C(3)]` at the root, A with one child.
pub fn abc_raw() -> Vec<ApiNode> {
    vec![
        api_node(1, "A", None, Some(1), vec![api_node(11, "A1", Some(1), Some(1), vec![])]),
        api_node(2, "B", None, Some(2), vec![]),
        api_node(3, "C", None, Some(3), vec![]),
    ]
}

pub fn api_node(
    id: NodeId,
    description: &str,
    parent: Option<NodeId>,
    order: Option<i64>,
    children: Vec<ApiNode>,
) -> ApiNode {
    ApiNode {
        id,
        descricao: Some(description.to_string()),
        id_pai: parent,
        ordem: order,
        all_children: Some(children),
        ..Default::default()
    }
}

pub fn ids(nodes: &[DecisionNode]) -> Vec<NodeId> {
    nodes.iter().map(|n| n.id).collect()
}

pub fn product(id: ProductId, name: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        active: true,
        ..Default::default()
    }
}

/// Every call a [`MockGateway`] received, with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListDecisions,
    ListAllDecisions,
    GetDecision(NodeId),
    CreateDecision(NewDecision),
    UpdateDecision(NodeId, DecisionPatch),
    DeleteDecision(NodeId),
    ListProducts,
    GetProduct(ProductId),
    CreateProduct(ProductInput),
    UpdateProduct(ProductId, ProductInput),
    DeleteProduct(ProductId),
    CreateSubmenu(SubmenuFields),
    UpdateSubmenu(SubmenuId, SubmenuFields),
    DeleteSubmenu(SubmenuId),
}

#[derive(Default)]
struct MockState {
    decisions: Vec<ApiNode>,
    products: Vec<Product>,
    calls: Vec<Call>,
    fail_next_write: Option<GatewayError>,
    fail_lists: Option<GatewayError>,
    next_id: u64,
}

/// An in-memory backend. Writes mutate its copy of the tree the way the real backend
/// does: an order update moves the node and renumbers its siblings, and deleting a
/// node with children is refused.
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    pub fn new(decisions: Vec<ApiNode>) -> Self {
        Self {
            state: Mutex::new(MockState {
                decisions,
                next_id: 1000,
                ..Default::default()
            }),
        }
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        self.state.lock().unwrap().products = products;
        self
    }

    /// Makes the next create/update/delete fail with `err`.
    pub fn fail_next_write(&self, err: GatewayError) {
        self.state.lock().unwrap().fail_next_write = Some(err);
    }

    /// Makes every list call fail with `err`.
    pub fn fail_lists(&self, err: GatewayError) {
        self.state.lock().unwrap().fail_lists = Some(err);
    }

    pub fn set_decisions(&self, decisions: Vec<ApiNode>) {
        self.state.lock().unwrap().decisions = decisions;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        let is_write = !matches!(
            call,
            Call::ListDecisions
                | Call::ListAllDecisions
                | Call::GetDecision(_)
                | Call::ListProducts
                | Call::GetProduct(_)
        );
        let is_list = matches!(
            call,
            Call::ListDecisions | Call::ListAllDecisions | Call::ListProducts
        );
        state.calls.push(call);
        if is_write {
            if let Some(err) = state.fail_next_write.take() {
                return Err(err);
            }
        }
        if is_list {
            if let Some(err) = state.fail_lists.clone() {
                return Err(err);
            }
        }
        Ok(())
    }
}

fn not_found(what: &str, id: u64) -> GatewayError {
    GatewayError::Api {
        status: 404,
        message: format!("{what} {id} not found"),
    }
}

/// The sibling list holding `id`, and its index in it.
fn siblings_of(nodes: &mut Vec<ApiNode>, id: NodeId) -> Option<(&mut Vec<ApiNode>, usize)> {
    match nodes.iter().position(|n| n.id == id) {
        Some(idx) => Some((nodes, idx)),
        None => nodes.iter_mut().find_map(|node| {
            node.all_children
                .as_mut()
                .and_then(|children| siblings_of(children, id))
        }),
    }
}

fn find_api(nodes: &[ApiNode], id: NodeId) -> Option<&ApiNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = node.all_children.as_deref().and_then(|c| find_api(c, id)) {
            return Some(found);
        }
    }
    None
}

fn flatten_api(nodes: &[ApiNode], out: &mut Vec<ApiNode>) {
    for node in nodes {
        let mut flat = node.clone();
        flat.all_children = None;
        out.push(flat);
        flatten_api(node.all_children.as_deref().unwrap_or_default(), out);
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn list_decisions(&self) -> Result<Vec<ApiNode>, GatewayError> {
        self.record(Call::ListDecisions)?;
        Ok(self.state.lock().unwrap().decisions.clone())
    }

    async fn list_all_decisions(&self) -> Result<Vec<ApiNode>, GatewayError> {
        self.record(Call::ListAllDecisions)?;
        let mut flat = Vec::new();
        flatten_api(&self.state.lock().unwrap().decisions, &mut flat);
        Ok(flat)
    }

    async fn get_decision(&self, id: NodeId) -> Result<DecisionNode, GatewayError> {
        self.record(Call::GetDecision(id))?;
        let state = self.state.lock().unwrap();
        find_api(&state.decisions, id)
            .cloned()
            .map(DecisionNode::from)
            .ok_or_else(|| not_found("decision", id))
    }

    async fn create_decision(&self, fields: &NewDecision) -> Result<DecisionNode, GatewayError> {
        self.record(Call::CreateDecision(fields.clone()))?;
        fields.to_form()?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created = ApiNode {
            id: state.next_id,
            titulo: fields.title.clone(),
            descricao: Some(fields.description.clone()),
            id_pai: fields.parent_id,
            go_to: fields.go_to.clone(),
            ordem: fields.order,
            ..Default::default()
        };

        match fields.parent_id {
            None => state.decisions.push(created.clone()),
            Some(parent) => {
                let (siblings, idx) = siblings_of(&mut state.decisions, parent)
                    .ok_or_else(|| not_found("decision", parent))?;
                siblings[idx]
                    .all_children
                    .get_or_insert_with(Vec::new)
                    .push(created.clone());
            }
        }
        Ok(DecisionNode::from(created))
    }

    async fn update_decision(
        &self,
        id: NodeId,
        patch: &DecisionPatch,
    ) -> Result<DecisionNode, GatewayError> {
        self.record(Call::UpdateDecision(id, patch.clone()))?;
        let mut state = self.state.lock().unwrap();
        let (siblings, idx) =
            siblings_of(&mut state.decisions, id).ok_or_else(|| not_found("decision", id))?;

        if let Some(description) = &patch.description {
            siblings[idx].descricao = Some(description.clone());
        }
        if let Some(title) = &patch.title {
            siblings[idx].titulo = Some(title.clone());
        }
        if let Some(go_to) = &patch.go_to {
            siblings[idx].go_to = Some(go_to.clone());
        }
        let mut position = idx;
        if let Some(order) = patch.order {
            let target = (order.max(1) as usize - 1).min(siblings.len() - 1);
            let moved = siblings.remove(idx);
            siblings.insert(target, moved);
            for (i, sibling) in siblings.iter_mut().enumerate() {
                sibling.ordem = Some(i as i64 + 1);
            }
            position = target;
        }
        Ok(DecisionNode::from(siblings[position].clone()))
    }

    async fn delete_decision(&self, id: NodeId) -> Result<(), GatewayError> {
        self.record(Call::DeleteDecision(id))?;
        let mut state = self.state.lock().unwrap();
        let (siblings, idx) =
            siblings_of(&mut state.decisions, id).ok_or_else(|| not_found("decision", id))?;
        if siblings[idx]
            .all_children
            .as_ref()
            .is_some_and(|c| !c.is_empty())
        {
            return Err(GatewayError::HasChildren {
                id,
                message: "Não é possível excluir: existem etapas filhas".to_string(),
            });
        }
        siblings.remove(idx);
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>, GatewayError> {
        self.record(Call::ListProducts)?;
        Ok(self.state.lock().unwrap().products.clone())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, GatewayError> {
        self.record(Call::GetProduct(id))?;
        let state = self.state.lock().unwrap();
        state
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found("product", id))
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product, GatewayError> {
        self.record(Call::CreateProduct(input.clone()))?;
        let payload = input.to_payload()?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created = Product::from(ApiProduct {
            id: state.next_id,
            nome: Some(payload.nome),
            descricao: Some(payload.descricao),
            tipo: Some(payload.tipo),
            preco: payload.preco,
            link: payload.link,
            imagem: payload.imagem,
            ativo: Some(payload.ativo),
        });
        state.products.push(created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, GatewayError> {
        self.record(Call::UpdateProduct(id, input.clone()))?;
        let payload = input.to_payload()?;
        let mut state = self.state.lock().unwrap();
        let existing = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("product", id))?;
        *existing = Product::from(ApiProduct {
            id,
            nome: Some(payload.nome),
            descricao: Some(payload.descricao),
            tipo: Some(payload.tipo),
            preco: payload.preco,
            link: payload.link,
            imagem: payload.imagem,
            ativo: Some(payload.ativo),
        });
        Ok(existing.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), GatewayError> {
        self.record(Call::DeleteProduct(id))?;
        let mut state = self.state.lock().unwrap();
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        if state.products.len() == before {
            return Err(not_found("product", id));
        }
        Ok(())
    }

    async fn create_submenu(&self, fields: &SubmenuFields) -> Result<Submenu, GatewayError> {
        self.record(Call::CreateSubmenu(fields.clone()))?;
        fields.to_create_form()?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        Ok(Submenu {
            id: state.next_id,
            decision_id: fields.decision_id,
            title: fields.title.clone().unwrap_or_default(),
            description: fields.description.clone().unwrap_or_default(),
            ..Default::default()
        })
    }

    async fn update_submenu(
        &self,
        id: SubmenuId,
        fields: &SubmenuFields,
    ) -> Result<Submenu, GatewayError> {
        self.record(Call::UpdateSubmenu(id, fields.clone()))?;
        Ok(Submenu {
            id,
            decision_id: fields.decision_id,
            title: fields.title.clone().unwrap_or_default(),
            description: fields.description.clone().unwrap_or_default(),
            ..Default::default()
        })
    }

    async fn delete_submenu(&self, id: SubmenuId) -> Result<(), GatewayError> {
        self.record(Call::DeleteSubmenu(id))
    }
}

/// What a [`serve_once`] server received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// e.g. `GET /api/decisoes HTTP/1.1`
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Accepts one connection on a loopback port, records the request and answers with
/// `status` and a JSON `body`. Returns the base URL (with an `/api` base path) and a
/// handle yielding the recorded request.
pub fn serve_once(status: u16, body: &str) -> (String, JoinHandle<RecordedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback port");
    let addr = listener.local_addr().expect("local address");
    let body = body.to_string();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept connection");
        let request = read_request(&mut BufReader::new(stream.try_clone().expect("clone stream")));
        let response = format!(
            "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write response");
        stream.flush().expect("flush response");
        request
    });

    (format!("http://{addr}/api"), handle)
}

fn read_request(reader: &mut impl BufRead) -> RecordedRequest {
    let mut request_line = String::new();
    reader.read_line(&mut request_line).expect("read request line");

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read header");
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let header = |name: &str| {
        headers
            .iter()
            .find(|(key, _): &&(String, String)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    };
    let mut body = Vec::new();
    if let Some(len) = header("content-length").and_then(|v| v.parse::<usize>().ok()) {
        body.resize(len, 0);
        reader.read_exact(&mut body).expect("read body");
    } else if header("transfer-encoding").is_some_and(|v| v.eq_ignore_ascii_case("chunked")) {
        loop {
            let mut size_line = String::new();
            reader.read_line(&mut size_line).expect("read chunk size");
            let size = usize::from_str_radix(size_line.trim(), 16).expect("chunk size");
            let mut chunk = vec![0; size + 2];
            reader.read_exact(&mut chunk).expect("read chunk");
            if size == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..size]);
        }
    }

    RecordedRequest {
        request_line: request_line.trim_end().to_string(),
        headers,
        body,
    }
}

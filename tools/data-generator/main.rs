use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use std::fs;
use trilhas::api::{ApiDocument, ApiNode, ApiPivot, ApiProduct, ApiProductRef, ApiSubmenu};
use trilhas::model::{GoTo, NodeId};

/// A CLI tool to generate a random playbook in the backend's JSON format
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_playbook.json")]
    output: String,

    /// Number of root steps
    #[arg(long, default_value_t = 4)]
    roots: usize,

    /// Maximum nesting depth below a root
    #[arg(long, default_value_t = 3)]
    depth: usize,

    /// Maximum number of children per step
    #[arg(long, default_value_t = 4)]
    max_children: usize,
}

const STAGES: [&str; 8] = [
    "Prospecção",
    "Qualificação",
    "Apresentação",
    "Proposta",
    "Negociação",
    "Fechamento",
    "Pós-venda",
    "Follow-up",
];

const ACTIONS: [&str; 8] = [
    "Ligar para o cliente",
    "Enviar material de apoio",
    "Agendar demonstração",
    "Levantar necessidades",
    "Validar orçamento",
    "Apresentar estudo de caso",
    "Confirmar decisor",
    "Registrar objeções",
];

const PRODUCTS: [&str; 5] = [
    "Consultoria inicial",
    "Plano Básico",
    "Plano Profissional",
    "Suporte Premium",
    "Treinamento In Company",
];

/// Hands out unique ids across every generated entity kind.
struct IdSeq(u64);

impl IdSeq {
    fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.roots == 0 {
        eprintln!("Error: --roots must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating playbook ({} roots, depth up to {}, up to {} children per step)...",
        cli.roots, cli.depth, cli.max_children
    );

    let catalog = generate_products();
    let mut ids = IdSeq(0);
    let mut roots: Vec<ApiNode> = (0..cli.roots)
        .map(|position| {
            let id = ids.next();
            generate_node(&mut rng, &mut ids, &catalog, &cli, id, None, position, 0)
        })
        .collect();

    // Roots lead to the roots that follow them.
    let root_ids: Vec<NodeId> = roots.iter().map(|r| r.id).collect();
    for (idx, root) in roots.iter_mut().enumerate() {
        let next: GoTo = root_ids.iter().skip(idx + 1).take(2).copied().collect();
        if !next.is_empty() {
            root.go_to = Some(next);
        }
    }

    let total = count(&roots);
    let json_output = serde_json::to_string_pretty(&roots)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated {} steps and saved them to '{}'",
        total, cli.output
    );

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn generate_node(
    rng: &mut ThreadRng,
    ids: &mut IdSeq,
    catalog: &[ApiProduct],
    cli: &Cli,
    id: NodeId,
    parent: Option<NodeId>,
    position: usize,
    depth: usize,
) -> ApiNode {
    let (titulo, descricao) = if depth == 0 {
        let stage = STAGES[position % STAGES.len()];
        (Some(stage.to_string()), format!("Etapa de {}", stage.to_lowercase()))
    } else {
        let action = ACTIONS[rng.random_range(0..ACTIONS.len())];
        let title = rng.random_bool(0.5).then(|| action.to_string());
        (title, format!("{action} ({depth}.{})", position + 1))
    };

    let child_count = if depth < cli.depth {
        rng.random_range(0..=cli.max_children)
    } else {
        0
    };
    let children: Vec<ApiNode> = (0..child_count)
        .map(|child_position| {
            let child_id = ids.next();
            generate_node(rng, ids, catalog, cli, child_id, Some(id), child_position, depth + 1)
        })
        .collect();

    let documents = generate_documents(rng, ids);
    let submenus = if rng.random_bool(0.2) {
        vec![ApiSubmenu {
            id: ids.next(),
            decisao_id: Some(id),
            titulo: Some("Materiais extras".to_string()),
            descricao: Some("Conteúdo complementar desta etapa".to_string()),
            documentos: Some(generate_documents(rng, ids)),
            produtos: Some(pick_products(rng, catalog)),
        }]
    } else {
        Vec::new()
    };

    ApiNode {
        id,
        titulo,
        descricao: Some(descricao),
        id_pai: parent,
        go_to: None,
        ordem: Some(position as i64 + 1),
        documentos: Some(documents),
        submenus: Some(submenus),
        produtos: Some(pick_products(rng, catalog)),
        all_children: Some(children),
        created_at: None,
        updated_at: None,
    }
}

fn generate_documents(rng: &mut ThreadRng, ids: &mut IdSeq) -> Vec<ApiDocument> {
    let count = rng.random_range(0..=2);
    (0..count)
        .map(|_| {
            let id = ids.next();
            let (name, mime) = if rng.random_bool(0.5) {
                (format!("roteiro-{id}.pdf"), "application/pdf")
            } else {
                (format!("slide-{id}.png"), "image/png")
            };
            ApiDocument {
                id,
                caminho: Some(format!("documentos/{name}")),
                nome: Some(name),
                tipo: Some(mime.to_string()),
                url_presignada: None,
            }
        })
        .collect()
}

fn generate_products() -> Vec<ApiProduct> {
    PRODUCTS
        .iter()
        .enumerate()
        .map(|(idx, name)| ApiProduct {
            id: idx as u64 + 1,
            nome: Some(name.to_string()),
            descricao: Some(format!("{name} para novos clientes")),
            tipo: Some(if idx % 2 == 0 { "servico" } else { "produto" }.to_string()),
            preco: Some(490.0 * (idx as f64 + 1.0)),
            link: None,
            imagem: None,
            ativo: Some(true),
        })
        .collect()
}

fn pick_products(rng: &mut ThreadRng, catalog: &[ApiProduct]) -> Vec<ApiProductRef> {
    let count = rng.random_range(0..=2).min(catalog.len());
    let start = rng.random_range(0..catalog.len());
    (0..count)
        .map(|offset| ApiProductRef {
            produto: catalog[(start + offset) % catalog.len()].clone(),
            recomendado: None,
            ordem: None,
            pivot: Some(ApiPivot {
                recomendado: Some(offset == 0),
                ordem: Some(offset as i64 + 1),
            }),
        })
        .collect()
}

fn count(nodes: &[ApiNode]) -> usize {
    nodes
        .iter()
        .map(|n| 1 + n.all_children.as_deref().map_or(0, count))
        .sum()
}

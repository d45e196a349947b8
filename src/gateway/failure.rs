//! Maps a failed HTTP response to a `GatewayError`.

use crate::api::ApiErrorBody;
use crate::error::{FileRejection, GatewayError};
use crate::model::NodeId;

/// Structured code the backend can send for a delete blocked by child steps.
pub const HAS_CHILDREN_CODE: &str = "HAS_CHILDREN";

// Fallback only: the backend does not always send `code`.
const HAS_CHILDREN_HINTS: [&str; 6] = [
    "filho",
    "filha",
    "child",
    "sub-etapa",
    "foreign key",
    "constraint",
];

/// What the failed request was doing, so the body can be read in context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Read,
    Write,
    DeleteDecision(NodeId),
    DeleteOther,
}

#[derive(Debug, Clone, Copy)]
pub struct FailureContext<'a> {
    pub kind: RequestKind,
    /// Names of the files sent with the request, in `arquivos[]` order.
    pub file_names: &'a [String],
}

impl<'a> FailureContext<'a> {
    pub fn new(kind: RequestKind) -> Self {
        Self {
            kind,
            file_names: &[],
        }
    }

    pub fn with_files(mut self, file_names: &'a [String]) -> Self {
        self.file_names = file_names;
        self
    }
}

pub fn classify_failure(status: u16, body: &str, ctx: &FailureContext<'_>) -> GatewayError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = failure_message(status, body, &parsed);

    if let RequestKind::DeleteDecision(id) = ctx.kind {
        let structured = parsed.code.as_deref() == Some(HAS_CHILDREN_CODE);
        if structured || mentions_children(&message) {
            return GatewayError::HasChildren { id, message };
        }
    }

    if status == 422 {
        let rejections = file_rejections(&parsed, ctx.file_names);
        if !rejections.is_empty() {
            return GatewayError::FileValidation(rejections);
        }
    }

    GatewayError::Api { status, message }
}

fn failure_message(status: u16, body: &str, parsed: &ApiErrorBody) -> String {
    parsed
        .message
        .as_deref()
        .or(parsed.error.as_deref())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .or_else(|| {
            let trimmed = body.trim();
            // An HTML error page is noise, not a message.
            (!trimmed.is_empty() && !trimmed.starts_with('<')).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| format!("HTTP {status}"))
}

fn mentions_children(message: &str) -> bool {
    let lower = message.to_lowercase();
    HAS_CHILDREN_HINTS.iter().any(|hint| lower.contains(hint))
}

/// Reads Laravel-style `errors: {"arquivos.N": ["..."]}` entries.
fn file_rejections(parsed: &ApiErrorBody, file_names: &[String]) -> Vec<FileRejection> {
    let Some(errors) = &parsed.errors else {
        return Vec::new();
    };

    let mut indexed: Vec<(usize, FileRejection)> = errors
        .iter()
        .filter_map(|(key, value)| {
            let index: usize = key.strip_prefix("arquivos.")?.parse().ok()?;
            let file_name = file_names
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("arquivo {}", index + 1));
            Some((
                index,
                FileRejection {
                    file_name,
                    reason: reason_text(value),
                },
            ))
        })
        .collect();

    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, rejection)| rejection).collect()
}

fn reason_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}


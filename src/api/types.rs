//! Tipos de dados para requisições e respostas da API de geração de briefs.
//!
//! Todas as structs derivam `Serialize` e `Deserialize` para conversão JSON
//! conforme o formato dos endpoints `/api/generate` e `/api/status/{job_id}`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Corpo da requisição para `POST /api/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// URL do site da marca a ser analisado.
    pub url: String,
}

/// Resposta de sucesso de `POST /api/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Identificador opaco do job atribuído pelo backend.
    pub job_id: String,
}

/// Status reportado pelo backend para um job.
///
/// Apenas `completed` e `failed` são terminais. Qualquer outra string
/// (o backend usa "processing" enquanto trabalha) cai em [`JobStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => JobStatus::Pending,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Other(value),
        }
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        value.to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Resultado de um job concluído.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefResult {
    /// Link para o documento gerado (o artefato do job).
    pub coda_url: String,
    /// Nome da marca identificado pelo backend, quando disponível.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    /// Momento de conclusão em ISO 8601, como enviado pelo backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Resposta de `GET /api/status/{job_id}`.
///
/// Valor transitório: é renderizado e descartado a cada verificação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: JobStatus,
    /// Percentual informado pelo backend. Use [`progress_percent`](Self::progress_percent)
    /// para exibição.
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<BriefResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusSnapshot {
    /// Progresso limitado ao intervalo 0..=100.
    pub fn progress_percent(&self) -> u8 {
        self.progress.clamp(0, 100) as u8
    }
}

/// Resposta de `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Resposta de `GET /debug`: estado das integrações e erros recentes do backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    #[serde(default)]
    pub api_status: serde_json::Value,
    #[serde(default)]
    pub recent_errors: Vec<serde_json::Value>,
    #[serde(default)]
    pub error_count: u64,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

/// Corpo de erro devolvido pelo backend (`{"error": "..."}`).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

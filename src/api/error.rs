//! Tipos de erro para o cliente da API de geração de briefs.
//!
//! Define [`ApiError`] com variantes para respostas HTTP sem sucesso,
//! corpos que não puderam ser decodificados e falhas de rede.

use thiserror::Error;

/// Erros que podem ocorrer ao falar com o backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// O backend respondeu com status fora da faixa 2xx.
    /// `message` é o campo `error` do corpo JSON ou o texto bruto do corpo.
    #[error("backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// O corpo da resposta não corresponde ao formato esperado.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A URL base configurada não pode receber caminhos de endpoint.
    #[error("invalid base URL: {0}")]
    BaseUrl(String),

    /// Falha de rede subjacente (DNS, conexão recusada, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

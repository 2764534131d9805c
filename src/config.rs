//! Configuração do briefgen carregada a partir de `briefgen.toml`.
//!
//! A struct [`BriefConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `BRIEFGEN_BASE_URL` tem precedência sobre o arquivo,
//! e as flags da CLI têm precedência sobre ambos.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::controller::{PollSettings, RetryPolicy};

pub const CONFIG_FILE: &str = "briefgen.toml";
pub const BASE_URL_ENV: &str = "BRIEFGEN_BASE_URL";

/// Configuração de nível superior carregada de `briefgen.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BriefConfig {
    /// Endereço do backend de geração de briefs.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Intervalo entre verificações de status, em milissegundos.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Timeout para estabelecer conexão com o backend.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Timeout total de cada requisição.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Falhas consecutivas de verificação toleradas antes de desistir.
    /// `0` significa tentar indefinidamente.
    #[serde(default = "default_max_status_failures")]
    pub max_status_failures: u32,

    /// Atraso base em milissegundos para backoff exponencial.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Teto do backoff em milissegundos.
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

// Porta padrão do backend Flask.
fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_status_failures() -> u32 {
    5
}

fn default_backoff_base_ms() -> u64 {
    2000
}

fn default_backoff_max_ms() -> u64 {
    30_000
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_ms: default_poll_interval_ms(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_status_failures: default_max_status_failures(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

impl BriefConfig {
    /// Carrega a configuração de `briefgen.toml` no diretório atual,
    /// aplicando em seguida as variáveis de ambiente.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Path::new(CONFIG_FILE))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Lê `path`, usando valores padrão se o arquivo não existir.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str::<BriefConfig>(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Aplica sobreposições vindas do ambiente; `lookup` abstrai `std::env::var`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(BASE_URL_ENV)
            && !url.is_empty()
        {
            self.base_url = url;
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.poll_interval_ms),
            retry: RetryPolicy {
                max_consecutive_failures: match self.max_status_failures {
                    0 => None,
                    n => Some(n),
                },
                backoff_base: Duration::from_millis(self.backoff_base_ms),
                backoff_max: Duration::from_millis(self.backoff_max_ms),
            },
        }
    }
}

//! Interface de linha de comando do briefgen baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (generate, interactive,
//! status, health, diagnostics) e flags globais que sobrepõem `briefgen.toml`.

use clap::{Parser, Subcommand};

use crate::config::BriefConfig;

/// briefgen: gera briefs criativos a partir da URL de uma marca.
#[derive(Debug, Parser)]
#[command(name = "briefgen", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Endereço do backend (sobrepõe `briefgen.toml` e `BRIEFGEN_BASE_URL`).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Intervalo entre verificações de status, em milissegundos.
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,

    /// Falhas consecutivas de verificação toleradas (0 = sem limite).
    #[arg(long, global = true)]
    pub max_failures: Option<u32>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Envia uma URL e acompanha o job até o resultado.
    Generate {
        /// URL do site da marca.
        url: String,
    },

    /// Formulário interativo: digite uma URL e pressione Enter.
    Interactive,

    /// Mostra o status atual de um job existente.
    Status {
        /// Identificador do job retornado pelo backend.
        job_id: String,
    },

    /// Verifica se o backend está respondendo.
    Health,

    /// Mostra o relatório de diagnóstico do backend (`/debug`).
    Diagnostics,
}

impl Cli {
    /// Aplica as flags globais por cima da configuração carregada.
    pub fn apply_overrides(&self, config: &mut BriefConfig) {
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(ms) = self.interval_ms {
            config.poll_interval_ms = ms;
        }
        if let Some(max) = self.max_failures {
            config.max_status_failures = max;
        }
    }
}

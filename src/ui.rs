//! Interface de terminal do briefgen: barra de progresso e saída colorida.
//!
//! Usa as crates `indicatif` para a barra de progresso e `console` para
//! estilização com cores. O [`TerminalView`] implementa [`View`] e mostra
//! no terminal cada seção do formulário de briefs.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::api::BriefResult;
use crate::controller::Section;
use crate::view::View;

#[derive(Default)]
struct Screen {
    // Barra ativa enquanto a seção de progresso está visível.
    bar: Option<ProgressBar>,
    // Texto da seção de resultado, impresso quando ela é exibida.
    result: Option<String>,
    // Texto da seção de erro, impresso quando ela é exibida.
    error: Option<String>,
}

/// Renderização do formulário no terminal.
///
/// Progresso aparece como barra (verde), resultado com link em verde,
/// erros em vermelho e alertas em amarelo.
pub struct TerminalView {
    screen: Mutex<Screen>,
    hidden: bool,
    green: Style,
    red: Style,
    yellow: Style,
    cyan: Style,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            screen: Mutex::new(Screen::default()),
            hidden: false,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            cyan: Style::new().cyan().underlined(),
        }
    }

    /// Variante sem desenho da barra, para ambientes sem terminal.
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::new()
        }
    }

    fn screen(&self) -> MutexGuard<'_, Screen> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn new_bar(&self) -> ProgressBar {
        let pb = ProgressBar::new(100);
        if self.hidden {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{bar:40.green/white}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    fn format_result(&self, result: &BriefResult) -> String {
        let mut text = format!(
            "  {} Brief ready: {}",
            self.green.apply_to("✓"),
            self.cyan.apply_to(&result.coda_url)
        );
        if let Some(brand) = &result.brand_name {
            text.push_str(&format!("\n    Brand: {brand}"));
        }
        if let Some(at) = &result.completed_at {
            text.push_str(&format!("\n    Completed at: {at}"));
        }
        text
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for TerminalView {
    fn alert(&self, message: &str) {
        eprintln!("  {} {message}", self.yellow.apply_to("!"));
    }

    fn clear_input(&self) {
        tracing::trace!("input cleared");
    }

    fn set_submit_enabled(&self, enabled: bool) {
        tracing::trace!(enabled, "submit control");
    }

    fn show_section(&self, section: Section) {
        let mut screen = self.screen();
        if let Some(bar) = screen.bar.take() {
            bar.finish_and_clear();
        }
        match section {
            Section::Input => {
                screen.result = None;
                screen.error = None;
            }
            Section::Progress => {
                screen.bar = Some(self.new_bar());
            }
            Section::Result => {
                if let Some(text) = screen.result.take() {
                    println!("{text}");
                }
            }
            Section::Error => {
                if let Some(message) = screen.error.take() {
                    println!("  {} {message}", self.red.apply_to("✗"));
                }
            }
        }
    }

    fn set_progress(&self, percent: u8, message: &str) {
        if let Some(bar) = &self.screen().bar {
            bar.set_position(u64::from(percent));
            bar.set_message(message.to_string());
        }
    }

    fn set_result(&self, result: &BriefResult) {
        let text = self.format_result(result);
        self.screen().result = Some(text);
    }

    fn set_error(&self, message: &str) {
        self.screen().error = Some(message.to_string());
    }
}

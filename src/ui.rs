//! Interface de terminal do restocker: spinner e saída colorida.
//!
//! Usa as crates `indicatif` para o spinner de progresso e `console` para
//! estilização com cores. O [`RunProgress`] acompanha visualmente uma
//! execução completa, que entre esperas e polls pode levar vários minutos.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::orchestrator::RunSummary;
use crate::state_machine::RunStatus;

/// Indicador visual de progresso para uma execução no terminal.
///
/// Exibe um spinner animado enquanto as venues são processadas e, ao final,
/// uma linha colorida por venue: verde para sucesso, vermelho para falha.
pub struct RunProgress {
    // Barra de progresso/spinner do indicatif.
    pb: ProgressBar,
    // Estilo verde para venues bem-sucedidas.
    green: Style,
    // Estilo vermelho para venues com falha.
    red: Style,
    // Estilo amarelo para estados intermediários.
    yellow: Style,
}

impl RunProgress {
    /// Inicia o spinner para uma execução com `venue_count` venues.
    pub fn start(venue_count: usize) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("Restocking {venue_count} venue(s)..."));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Finaliza o spinner e exibe uma linha de resultado por venue.
    pub fn complete(&self, summary: &RunSummary) {
        self.pb.finish_and_clear();
        for report in &summary.reports {
            let (mark, style) = match report.status {
                RunStatus::Completed => ("✓", &self.green),
                RunStatus::Failed => ("✗", &self.red),
                _ => ("•", &self.yellow),
            };
            println!(
                "  {} [{}] {}",
                style.apply_to(mark),
                report.venue_id,
                report.result
            );
        }
    }

    /// Imprime o mapa de resultados formatado em JSON com cabeçalho colorido.
    pub fn print_results(&self, summary: &RunSummary) {
        let header_style = if summary.failed() == 0 {
            &self.green
        } else {
            &self.red
        };
        println!();
        println!("{}", header_style.apply_to("─── Run Results ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(&summary.results()).unwrap_or_default()
        );
    }
}

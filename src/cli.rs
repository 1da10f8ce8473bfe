//! Interface de linha de comando do restocker baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (run, status,
//! reset-wait) e a flag global --verbose.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// restocker: repõe automaticamente itens Wolt marcados fora de estoque.
#[derive(Debug, Parser)]
#[command(name = "restocker", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Executa o ciclo de reposição para as venues configuradas.
    Run {
        /// Caminho alternativo para o arquivo JSON de venues.
        #[arg(long)]
        venues: Option<PathBuf>,

        /// Processa apenas a venue indicada (repetível).
        #[arg(long = "venue", value_name = "VENUE_ID")]
        venue_ids: Vec<String>,
    },

    /// Mostra as esperas aprendidas por venue.
    Status,

    /// Esquece a espera aprendida de uma venue (ou de todas).
    ResetWait {
        /// Venue a resetar; omita para limpar todas.
        venue_id: Option<String>,
    },
}

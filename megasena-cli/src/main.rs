mod analysis;
mod display;
mod import;
mod notify;
mod orchestrator;
mod source;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use megasena_db::db::{count_draws, db_path, load_history, migrate, open_db};
use megasena_db::state::state_path;

use crate::analysis::compute_frequencies;
use crate::display::{
    display_cycle, display_draws, display_frequencies, display_import_summary,
};
use crate::notify::TelegramConfig;
use crate::orchestrator::{run_cycle, Config, CycleOutcome};

#[derive(Parser)]
#[command(name = "megasena", about = "Previsão e conferência automática da Mega-Sena")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Executar um ciclo: buscar concurso novo, conferir, prever e notificar
    Run {
        /// Número de jogos a gerar
        #[arg(short, long, default_value = "3")]
        games: usize,

        /// Seed para a reprodutibilidade
        #[arg(long)]
        seed: Option<u64>,

        /// Endpoint do último resultado
        #[arg(long, env = "MEGASENA_API_URL", default_value = source::DEFAULT_API_URL)]
        api_url: String,

        /// Arquivo de estado do preditor
        #[arg(long, env = "MEGASENA_STATE_FILE")]
        state_file: Option<PathBuf>,

        /// Token do bot do Telegram
        #[arg(long, env = "TELEGRAM_TOKEN", default_value = "", hide_env_values = true)]
        telegram_token: String,

        /// IDs de chat do Telegram, separados por vírgula
        #[arg(long, env = "TELEGRAM_CHAT_IDS", value_delimiter = ',')]
        telegram_chat_ids: Vec<String>,
    },

    /// Importar o histórico de um CSV (limpo ou bruto da Caixa)
    Import {
        /// CSV limpo (Concurso;Dezena1;...;Dezena6)
        #[arg(long, default_value = "megasena_historico_limpo.csv")]
        clean: PathBuf,

        /// CSV bruto da Caixa
        #[arg(long, default_value = "mega.csv")]
        raw: PathBuf,
    },

    /// Listar os últimos concursos
    List {
        /// Quantidade de concursos a exibir
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Frequência das dezenas sobre todo o histórico
    Stats {
        /// Quantidade de dezenas no ranking
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Exibir o caminho da base de dados
    DbPath,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Run {
            games,
            seed,
            api_url,
            state_file,
            telegram_token,
            telegram_chat_ids,
        } => {
            let config = Config {
                state_path: state_file.unwrap_or_else(state_path),
                api_url,
                telegram: TelegramConfig {
                    token: telegram_token,
                    chat_ids: telegram_chat_ids
                        .into_iter()
                        .map(|id| id.trim().to_string())
                        .filter(|id| !id.is_empty())
                        .collect(),
                },
                game_count: games.max(1),
                seed,
            };
            cmd_run(&conn, &config)
        }
        Command::Import { clean, raw } => cmd_import(&conn, &clean, &raw),
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { top } => cmd_stats(&conn, top),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn cmd_run(conn: &megasena_db::rusqlite::Connection, config: &Config) -> Result<()> {
    match run_cycle(conn, config)? {
        CycleOutcome::NoNewDraw { latest_id } => {
            println!(
                "Histórico já atualizado (último concurso: {}). Nenhuma ação necessária.",
                latest_id
            );
        }
        CycleOutcome::Completed(report) => display_cycle(&report),
    }
    Ok(())
}

fn cmd_import(
    conn: &megasena_db::rusqlite::Connection,
    clean: &PathBuf,
    raw: &PathBuf,
) -> Result<()> {
    let result = import::import_csv(conn, clean, raw)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &megasena_db::rusqlite::Connection, last: usize) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vazia. Execute primeiro: megasena import");
        return Ok(());
    }
    let loaded = load_history(conn)?;
    if loaded.skipped > 0 {
        eprintln!(
            "Aviso: {} linha(s) malformada(s) ignorada(s).",
            loaded.skipped
        );
    }
    let start = loaded.draws.len().saturating_sub(last);
    display_draws(&loaded.draws[start..]);
    Ok(())
}

fn cmd_stats(conn: &megasena_db::rusqlite::Connection, top: usize) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vazia. Execute primeiro: megasena import");
        return Ok(());
    }
    let loaded = load_history(conn)?;
    let snapshot = compute_frequencies(&loaded.draws);
    display_frequencies(&snapshot, top);
    Ok(())
}

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub use crate::models::PredictorState;

pub fn state_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("predictor_state.json");
    path
}

/// Estado ausente ou corrompido vale como estado zerado, nunca como erro.
pub fn load_state(path: &Path) -> PredictorState {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return PredictorState::default(),
    };
    match serde_json::from_str(&contents) {
        Ok(state) => state,
        Err(e) => {
            eprintln!(
                "Aviso: estado do preditor ilegível em {:?} ({}). Recomeçando do zero.",
                path, e
            );
            PredictorState::default()
        }
    }
}

/// Grava em um arquivo temporário ao lado e renomeia por cima, para que uma
/// queda no meio da escrita não corrompa o estado anterior.
pub fn save_state(path: &Path, state: &PredictorState) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Não foi possível criar o diretório {:?}", parent))?;
    }
    let contents =
        serde_json::to_string_pretty(state).context("Falha ao serializar o estado")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)
        .with_context(|| format!("Não foi possível escrever {:?}", tmp))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Não foi possível substituir {:?}", path))?;
    Ok(())
}

pub fn record_outcome(state: &mut PredictorState, max_hits: u8) {
    match max_hits {
        6 => state.six_match += 1,
        5 => state.five_match += 1,
        4 => state.four_match += 1,
        _ => {}
    }
}

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;

use megasena_db::models::{Draw, GAME_SIZE};

pub const DEFAULT_API_URL: &str =
    "https://loteriascaixa-api.herokuapp.com/api/megasena/latest";

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct LatestPayload {
    concurso: u32,
    dezenas: Vec<String>,
}

/// Consulta o último concurso publicado. Retorna `None` quando o concurso da
/// API não é mais novo que `after_id`; erros de conexão ou de formato sobem
/// para o chamador, que os trata como "nenhum concurso novo".
pub fn fetch_latest(api_url: &str, after_id: u32) -> Result<Option<Draw>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("Não foi possível criar o cliente HTTP")?;

    let payload: LatestPayload = client
        .get(api_url)
        .send()
        .with_context(|| format!("Falha de conexão com {}", api_url))?
        .error_for_status()
        .context("A API respondeu com erro")?
        .json()
        .context("Resposta da API em formato inesperado")?;

    parse_payload(payload, after_id)
}

fn parse_payload(payload: LatestPayload, after_id: u32) -> Result<Option<Draw>> {
    if payload.concurso <= after_id {
        return Ok(None);
    }
    if payload.dezenas.len() != GAME_SIZE {
        bail!(
            "A API retornou {} dezenas para o concurso {}",
            payload.dezenas.len(),
            payload.concurso
        );
    }

    let mut numbers = [0u8; GAME_SIZE];
    for (slot, raw) in numbers.iter_mut().zip(&payload.dezenas) {
        *slot = raw
            .trim()
            .parse()
            .with_context(|| format!("Dezena inválida na API: '{}'", raw))?;
    }
    numbers.sort();

    Ok(Some(Draw::new(payload.concurso, numbers)?))
}

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use megasena_db::db::insert_draw;
use megasena_db::models::{Draw, GAME_SIZE};
use megasena_db::rusqlite::Connection;

/// Posições do id do concurso e das seis dezenas em um registro CSV.
struct CsvLayout {
    id_idx: usize,
    number_idxs: [usize; GAME_SIZE],
}

/// CSV limpo: `Concurso;Dezena1;...;Dezena6`, separado por ponto e vírgula.
const CLEAN_LAYOUT: CsvLayout = CsvLayout {
    id_idx: 0,
    number_idxs: [1, 2, 3, 4, 5, 6],
};

/// CSV bruto da Caixa: separado por vírgula, duas linhas de preâmbulo,
/// data na coluna 1 e dezenas nas colunas 2 a 7.
const RAW_LAYOUT: CsvLayout = CsvLayout {
    id_idx: 0,
    number_idxs: [2, 3, 4, 5, 6, 7],
};

const RAW_PREAMBLE_LINES: u32 = 2;

pub struct ImportResult {
    pub source: PathBuf,
    pub total_records: u32,
    pub inserted: u32,
    pub duplicates: u32,
    pub errors: u32,
}

/// Prefere o CSV limpo quando existe; caso contrário processa o bruto.
/// A escolha é por disponibilidade do arquivo, nunca por tentativa e erro.
pub fn import_csv(conn: &Connection, clean: &Path, raw: &Path) -> Result<ImportResult> {
    if clean.exists() {
        import_clean_csv(conn, clean)
    } else if raw.exists() {
        import_raw_csv(conn, raw)
    } else {
        bail!(
            "Nenhum arquivo de histórico encontrado ({:?} ou {:?})",
            clean,
            raw
        );
    }
}

pub fn import_clean_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Não foi possível abrir {:?}", path))?;
    import_records(conn, path, reader, &CLEAN_LAYOUT, 0)
}

pub fn import_raw_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Não foi possível abrir {:?}", path))?;
    import_records(conn, path, reader, &RAW_LAYOUT, RAW_PREAMBLE_LINES)
}

fn import_records<R: std::io::Read>(
    conn: &Connection,
    path: &Path,
    mut reader: csv::Reader<R>,
    layout: &CsvLayout,
    skip_lines: u32,
) -> Result<ImportResult> {
    let tx = conn
        .unchecked_transaction()
        .context("Não foi possível iniciar a transação")?;

    let mut result = ImportResult {
        source: path.to_path_buf(),
        total_records: 0,
        inserted: 0,
        duplicates: 0,
        errors: 0,
    };

    for (line, record_result) in reader.records().enumerate() {
        if (line as u32) < skip_lines {
            continue;
        }
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(&record, layout) {
                Ok(draw) => match insert_draw(&tx, &draw) {
                    Ok(true) => result.inserted += 1,
                    Ok(false) => result.duplicates += 1,
                    Err(e) => {
                        eprintln!("Erro ao inserir registro {}: {}", result.total_records, e);
                        result.errors += 1;
                    }
                },
                Err(e) => {
                    eprintln!("Linha {} descartada: {}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                eprintln!("Erro de leitura na linha {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Falha no commit da importação")?;
    Ok(result)
}

fn parse_record(record: &csv::StringRecord, layout: &CsvLayout) -> Result<Draw> {
    let get = |idx: usize| -> Result<&str> {
        record
            .get(idx)
            .map(|s| s.trim())
            .with_context(|| format!("Campo ausente no índice {}", idx))
    };

    let raw_id = get(layout.id_idx)?;
    let id: u32 = raw_id
        .parse()
        .with_context(|| format!("Concurso inválido: '{}'", raw_id))?;

    let mut numbers = [0u8; GAME_SIZE];
    for (slot, &idx) in numbers.iter_mut().zip(&layout.number_idxs) {
        let raw = get(idx)?;
        *slot = raw
            .parse()
            .with_context(|| format!("Dezena inválida: '{}' (índice {})", raw, idx))?;
    }
    numbers.sort();

    Draw::new(id, numbers)
}

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{validate_numbers, Draw};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    id  INTEGER PRIMARY KEY,
    n1  INTEGER NOT NULL,
    n2  INTEGER NOT NULL,
    n3  INTEGER NOT NULL,
    n4  INTEGER NOT NULL,
    n5  INTEGER NOT NULL,
    n6  INTEGER NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("megasena.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Não foi possível criar o diretório {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Não foi possível abrir a base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Falha na migração do schema")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (id, n1, n2, n3, n4, n5, n6)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            draw.id,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
        ],
    )
    .context("Falha ao inserir o concurso")?;
    Ok(changed > 0)
}

pub struct LoadedHistory {
    pub draws: Vec<Draw>,
    /// Linhas persistidas que falharam na validação e foram descartadas.
    pub skipped: u32,
}

pub fn load_history(conn: &Connection) -> Result<LoadedHistory> {
    let mut stmt = conn.prepare(
        "SELECT id, n1, n2, n3, n4, n5, n6 FROM draws ORDER BY id ASC",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                [
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, i64>(6)?,
                ],
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut draws = Vec::with_capacity(rows.len());
    let mut skipped = 0u32;
    for (id, raw_numbers) in rows {
        match parse_row(id, &raw_numbers) {
            Some(draw) => draws.push(draw),
            None => skipped += 1,
        }
    }
    Ok(LoadedHistory { draws, skipped })
}

fn parse_row(id: i64, raw_numbers: &[i64; 6]) -> Option<Draw> {
    if id <= 0 || id > u32::MAX as i64 {
        return None;
    }
    let mut numbers = [0u8; 6];
    for (slot, &raw) in numbers.iter_mut().zip(raw_numbers) {
        *slot = u8::try_from(raw).ok()?;
    }
    validate_numbers(&numbers).ok()?;
    Some(Draw {
        id: id as u32,
        numbers,
    })
}

pub fn latest_id(conn: &Connection) -> Result<u32> {
    let id: u32 = conn.query_row("SELECT COALESCE(MAX(id), 0) FROM draws", [], |row| {
        row.get(0)
    })?;
    Ok(id)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

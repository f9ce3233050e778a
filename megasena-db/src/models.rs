use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Maior dezena sorteável na Mega-Sena.
pub const POOL_SIZE: u8 = 60;
/// Dezenas por jogo.
pub const GAME_SIZE: usize = 6;

pub type Game = [u8; GAME_SIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    pub id: u32,
    pub numbers: Game,
}

impl Draw {
    pub fn new(id: u32, numbers: Game) -> Result<Self> {
        validate_numbers(&numbers)?;
        Ok(Self { id, numbers })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberFrequency {
    pub number: u8,
    pub count: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionSet {
    /// Concurso para o qual os jogos foram gerados.
    pub target_draw_id: u32,
    pub games: Vec<Game>,
    /// Sem histórico utilizável: jogos sorteados uniformemente.
    pub insufficient_history: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTier {
    Sena,
    Quina,
    Quadra,
    Nenhum,
}

impl HitTier {
    pub fn from_hits(hits: u8) -> Self {
        match hits {
            6 => HitTier::Sena,
            5 => HitTier::Quina,
            4 => HitTier::Quadra,
            _ => HitTier::Nenhum,
        }
    }
}

impl std::fmt::Display for HitTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HitTier::Sena => write!(f, "SENA"),
            HitTier::Quina => write!(f, "QUINA"),
            HitTier::Quadra => write!(f, "QUADRA"),
            HitTier::Nenhum => write!(f, "—"),
        }
    }
}

pub fn validate_numbers(numbers: &Game) -> Result<()> {
    for &n in numbers {
        if n < 1 || n > POOL_SIZE {
            bail!("Dezena {} fora do intervalo (1-{})", n, POOL_SIZE);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Dezena em duplicidade: {}", numbers[i]);
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PredictorState {
    pub last_predicted_draw_id: u32,
    pub last_predictions: Vec<Game>,
    pub six_match: u32,
    pub five_match: u32,
    pub four_match: u32,
}

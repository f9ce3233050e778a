use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use megasena_db::models::{Game, NumberFrequency, PredictionSet, GAME_SIZE, POOL_SIZE};

const HOT_COUNT: usize = 15;
const COLD_COUNT: usize = 15;
const MAX_POOL: usize = 20;

/// Gera `game_count` jogos para o concurso `target_draw_id`, com viés para as
/// dezenas mais e menos frequentes do histórico. Com snapshot vazio os jogos
/// saem uniformes e o resultado é marcado como "histórico insuficiente".
pub fn generate(
    snapshot: &[NumberFrequency],
    target_draw_id: u32,
    game_count: usize,
    seed: Option<u64>,
) -> PredictionSet {
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    if snapshot.is_empty() {
        let games = (0..game_count).map(|_| uniform_game(&mut rng)).collect();
        return PredictionSet {
            target_draw_id,
            games,
            insufficient_history: true,
        };
    }

    let mut ranked = snapshot.to_vec();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.number.cmp(&b.number)));
    let hot: Vec<u8> = ranked.iter().take(HOT_COUNT).map(|f| f.number).collect();
    ranked.sort_by(|a, b| a.count.cmp(&b.count).then(a.number.cmp(&b.number)));
    let cold: Vec<u8> = ranked.iter().take(COLD_COUNT).map(|f| f.number).collect();

    let mut pool = hot;
    for n in cold {
        if !pool.contains(&n) {
            pool.push(n);
        }
    }
    pool.sort();

    let games = (0..game_count)
        .map(|_| game_from_pool(&pool, &mut rng))
        .collect();

    PredictionSet {
        target_draw_id,
        games,
        insufficient_history: false,
    }
}

fn game_from_pool(pool: &[u8], rng: &mut StdRng) -> Game {
    let mut current: Vec<u8> = pool.to_vec();

    while current.len() < GAME_SIZE {
        let n = rng.random_range(1..=POOL_SIZE);
        if !current.contains(&n) {
            current.push(n);
        }
    }

    // o recorte para 20 dezenas é refeito a cada jogo
    while current.len() > MAX_POOL {
        let idx = rng.random_range(0..current.len());
        current.swap_remove(idx);
    }

    let mut picked = [0u8; GAME_SIZE];
    for slot in picked.iter_mut() {
        let idx = rng.random_range(0..current.len());
        *slot = current.swap_remove(idx);
    }
    picked.sort();
    picked
}

fn uniform_game(rng: &mut StdRng) -> Game {
    let mut available: Vec<u8> = (1..=POOL_SIZE).collect();
    let mut picked = [0u8; GAME_SIZE];
    for slot in picked.iter_mut() {
        let idx = rng.random_range(0..available.len());
        *slot = available.swap_remove(idx);
    }
    picked.sort();
    picked
}

use megasena_db::models::{Game, HitTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationScore {
    pub max_hits: u8,
    /// Índice 1-based do primeiro jogo que atingiu `max_hits`; 0 se não havia jogos.
    pub best_game: usize,
}

impl ValidationScore {
    pub fn tier(&self) -> HitTier {
        HitTier::from_hits(self.max_hits)
    }
}

/// Compara cada jogo com o resultado sorteado e devolve o melhor acerto.
/// Empates ficam com o primeiro jogo na ordem de iteração.
pub fn validate(games: &[Game], drawn: &Game) -> ValidationScore {
    let mut best = ValidationScore {
        max_hits: 0,
        best_game: 0,
    };
    for (i, game) in games.iter().enumerate() {
        let hits = game.iter().filter(|n| drawn.contains(n)).count() as u8;
        if best.best_game == 0 || hits > best.max_hits {
            best = ValidationScore {
                max_hits: hits,
                best_game: i + 1,
            };
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_five_hits() {
        let score = validate(&[[1, 2, 3, 4, 5, 6]], &[1, 2, 3, 4, 5, 7]);
        assert_eq!(score.max_hits, 5);
        assert_eq!(score.best_game, 1);
        assert_eq!(score.tier(), HitTier::Quina);
    }

    #[test]
    fn test_validate_second_game_wins() {
        let score = validate(
            &[[1, 2, 3, 4, 5, 6], [1, 2, 3, 4, 5, 7]],
            &[1, 2, 3, 4, 5, 7],
        );
        assert_eq!(score.max_hits, 6);
        assert_eq!(score.best_game, 2);
        assert_eq!(score.tier(), HitTier::Sena);
    }

    #[test]
    fn test_validate_tie_keeps_first() {
        let score = validate(
            &[[1, 2, 3, 4, 5, 6], [1, 2, 3, 4, 5, 6]],
            &[1, 2, 3, 10, 11, 12],
        );
        assert_eq!(score.max_hits, 3);
        assert_eq!(score.best_game, 1);
        assert_eq!(score.tier(), HitTier::Nenhum);
    }

    #[test]
    fn test_validate_no_hits_still_reports_game() {
        let score = validate(&[[1, 2, 3, 4, 5, 6]], &[10, 20, 30, 40, 50, 60]);
        assert_eq!(score.max_hits, 0);
        assert_eq!(score.best_game, 1);
    }

    #[test]
    fn test_validate_empty_set() {
        let score = validate(&[], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(score.max_hits, 0);
        assert_eq!(score.best_game, 0);
    }
}

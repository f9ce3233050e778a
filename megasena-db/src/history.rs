use thiserror::Error;

use crate::models::{validate_numbers, Draw};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("concurso {id} fora de ordem (último registrado: {latest})")]
    OrderingViolation { id: u32, latest: u32 },
    #[error("concurso {id} inválido: {reason}")]
    Validation { id: u32, reason: String },
}

/// Sequência ordenada e sem duplicatas de concursos passados.
#[derive(Debug, Clone, Default)]
pub struct History {
    draws: Vec<Draw>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monta o histórico a partir de concursos já persistidos, ordenando por
    /// id e descartando duplicatas (a primeira ocorrência vence).
    pub fn from_draws(mut draws: Vec<Draw>) -> Self {
        draws.sort_by_key(|d| d.id);
        draws.dedup_by_key(|d| d.id);
        Self { draws }
    }

    pub fn append(&mut self, draw: Draw) -> Result<(), HistoryError> {
        let latest = self.latest_id();
        if draw.id <= latest {
            return Err(HistoryError::OrderingViolation { id: draw.id, latest });
        }
        if let Err(e) = validate_numbers(&draw.numbers) {
            return Err(HistoryError::Validation {
                id: draw.id,
                reason: e.to_string(),
            });
        }
        self.draws.push(draw);
        Ok(())
    }

    pub fn latest_id(&self) -> u32 {
        self.draws.last().map(|d| d.id).unwrap_or(0)
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(id: u32) -> Draw {
        Draw::new(id, [1, 12, 23, 34, 45, 56]).unwrap()
    }

    #[test]
    fn test_latest_id_empty() {
        assert_eq!(History::new().latest_id(), 0);
    }

    #[test]
    fn test_append_increasing() {
        let mut history = History::new();
        history.append(draw(1)).unwrap();
        history.append(draw(2)).unwrap();
        history.append(draw(10)).unwrap();
        assert_eq!(history.latest_id(), 10);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_append_out_of_order_rejected() {
        let mut history = History::new();
        history.append(draw(5)).unwrap();

        let err = history.append(draw(5)).unwrap_err();
        assert!(matches!(err, HistoryError::OrderingViolation { id: 5, latest: 5 }));

        let err = history.append(draw(3)).unwrap_err();
        assert!(matches!(err, HistoryError::OrderingViolation { id: 3, latest: 5 }));

        assert_eq!(history.len(), 1);
        assert_eq!(history.latest_id(), 5);
    }

    #[test]
    fn test_append_invalid_numbers_rejected() {
        let mut history = History::new();
        let bad = Draw {
            id: 1,
            numbers: [1, 1, 2, 3, 4, 5],
        };
        let err = history.append(bad).unwrap_err();
        assert!(matches!(err, HistoryError::Validation { id: 1, .. }));
        assert!(history.is_empty());
    }

    #[test]
    fn test_from_draws_sorts_and_dedups() {
        let history = History::from_draws(vec![draw(3), draw(1), draw(3), draw(2)]);
        let ids: Vec<u32> = history.draws().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}

use anyhow::{Context, Result};
use std::path::PathBuf;

use megasena_db::db::{self, insert_draw};
use megasena_db::history::History;
use megasena_db::models::{Draw, NumberFrequency, PredictionSet};
use megasena_db::rusqlite::Connection;
use megasena_db::state::{self, PredictorState};

use crate::analysis::validator::{self, ValidationScore};
use crate::analysis::{compute_frequencies, sampler};
use crate::display;
use crate::notify::{self, TelegramConfig};
use crate::source;

/// Dependências do ciclo, montadas uma vez na entrada do programa.
#[derive(Debug, Clone)]
pub struct Config {
    pub state_path: PathBuf,
    pub api_url: String,
    pub telegram: TelegramConfig,
    pub game_count: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// A previsão anterior foi feita para este concurso e pôde ser conferida.
    Scored(ValidationScore),
    /// O concurso chegado não é o que a previsão anterior esperava.
    LineageBroken { expected: u32, actual: u32 },
}

#[derive(Debug)]
pub struct CycleReport {
    pub new_draw: Draw,
    pub validation: ValidationOutcome,
    pub state: PredictorState,
    pub prediction: PredictionSet,
    pub frequencies: Vec<NumberFrequency>,
}

#[derive(Debug)]
pub enum CycleOutcome {
    NoNewDraw { latest_id: u32 },
    Completed(CycleReport),
}

/// Parte pura do ciclo: confere a previsão anterior contra o concurso novo,
/// atualiza os contadores, anexa o concurso ao histórico e gera a próxima
/// previsão (sempre para `new_draw.id + 1`).
pub fn process_new_draw(
    history: &mut History,
    state: &PredictorState,
    new_draw: Draw,
    game_count: usize,
    seed: Option<u64>,
) -> Result<CycleReport> {
    let validation = if state.last_predicted_draw_id == new_draw.id
        && !state.last_predictions.is_empty()
    {
        ValidationOutcome::Scored(validator::validate(
            &state.last_predictions,
            &new_draw.numbers,
        ))
    } else {
        ValidationOutcome::LineageBroken {
            expected: state.last_predicted_draw_id,
            actual: new_draw.id,
        }
    };

    history.append(new_draw).with_context(|| {
        format!("Concurso {} rejeitado pelo histórico", new_draw.id)
    })?;

    let frequencies = compute_frequencies(history.draws());
    let prediction = sampler::generate(&frequencies, new_draw.id + 1, game_count, seed);

    let mut next_state = state.clone();
    if let ValidationOutcome::Scored(score) = &validation {
        state::record_outcome(&mut next_state, score.max_hits);
    }
    next_state.last_predicted_draw_id = prediction.target_draw_id;
    next_state.last_predictions = prediction.games.clone();

    Ok(CycleReport {
        new_draw,
        validation,
        state: next_state,
        prediction,
        frequencies,
    })
}

/// Um ciclo completo: carregar histórico, buscar concurso novo, conferir,
/// gerar, persistir e notificar. Só a falha no carregamento do histórico é
/// fatal; a indisponibilidade da API vira um ciclo sem concurso novo.
pub fn run_cycle(conn: &Connection, config: &Config) -> Result<CycleOutcome> {
    let loaded = db::load_history(conn).context("Falha fatal ao carregar o histórico")?;
    if loaded.skipped > 0 {
        eprintln!(
            "Aviso: {} linha(s) malformada(s) ignorada(s) no histórico.",
            loaded.skipped
        );
    }
    let mut history = History::from_draws(loaded.draws);
    let state = state::load_state(&config.state_path);

    let new_draw = match source::fetch_latest(&config.api_url, history.latest_id()) {
        Ok(Some(draw)) => draw,
        Ok(None) => {
            return Ok(CycleOutcome::NoNewDraw {
                latest_id: history.latest_id(),
            })
        }
        Err(e) => {
            eprintln!(
                "Aviso: consulta à API falhou ({:#}). Nova tentativa na próxima execução.",
                e
            );
            return Ok(CycleOutcome::NoNewDraw {
                latest_id: history.latest_id(),
            });
        }
    };

    let report = process_new_draw(
        &mut history,
        &state,
        new_draw,
        config.game_count,
        config.seed,
    )?;

    // o commit do concurso espera o estado ser gravado: ou o ciclo inteiro
    // persiste, ou nada persiste
    let tx = conn
        .unchecked_transaction()
        .context("Não foi possível iniciar a transação")?;
    insert_draw(&tx, &report.new_draw)?;
    state::save_state(&config.state_path, &report.state)?;
    tx.commit().context("Falha ao gravar o histórico")?;

    // notificação estritamente depois da persistência, sempre best-effort
    if config.telegram.enabled() {
        let message = display::format_telegram_message(&report);
        match notify::send_all(&config.telegram, &message) {
            Ok(delivery) => {
                println!(
                    "Notificação: {} enviada(s), {} falha(s).",
                    delivery.delivered(),
                    delivery.failed()
                );
                for outcome in &delivery.outcomes {
                    if let Err(e) = &outcome.result {
                        eprintln!("  Chat {}: {:#}", outcome.chat_id, e);
                    }
                }
            }
            Err(e) => eprintln!("Aviso: notificação não enviada ({:#}).", e),
        }
    } else {
        println!("Notificação desabilitada (token ou chats ausentes).");
    }

    Ok(CycleOutcome::Completed(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(id: u32) -> Draw {
        Draw::new(id, [5, 10, 15, 20, 25, 30]).unwrap()
    }

    fn history_100_to_105() -> History {
        History::from_draws((100..=105).map(draw).collect())
    }

    #[test]
    fn test_cycle_scores_prior_prediction() {
        let mut history = history_100_to_105();
        let state = PredictorState {
            last_predicted_draw_id: 106,
            last_predictions: vec![
                [31, 32, 33, 34, 35, 36],
                [1, 2, 41, 42, 43, 44],
                [1, 2, 3, 4, 51, 52],
            ],
            six_match: 0,
            five_match: 2,
            four_match: 9,
        };
        // acerta 4 dezenas do terceiro jogo
        let new_draw = Draw::new(106, [1, 2, 3, 4, 58, 59]).unwrap();

        let report = process_new_draw(&mut history, &state, new_draw, 3, Some(42)).unwrap();

        match report.validation {
            ValidationOutcome::Scored(score) => {
                assert_eq!(score.max_hits, 4);
                assert_eq!(score.best_game, 3);
            }
            other => panic!("esperava Scored, veio {:?}", other),
        }
        assert_eq!(report.state.four_match, 10);
        assert_eq!(report.state.five_match, 2);
        assert_eq!(report.state.six_match, 0);

        assert_eq!(report.prediction.target_draw_id, 107);
        assert_eq!(report.state.last_predicted_draw_id, 107);
        assert_eq!(report.state.last_predictions, report.prediction.games);
        assert_eq!(report.prediction.games.len(), 3);

        assert_eq!(history.latest_id(), 106);
    }

    #[test]
    fn test_cycle_lineage_broken_skips_scoring() {
        let mut history = history_100_to_105();
        let state = PredictorState {
            last_predicted_draw_id: 50,
            last_predictions: vec![[1, 2, 3, 4, 5, 6]],
            six_match: 1,
            five_match: 2,
            four_match: 3,
        };
        let new_draw = Draw::new(106, [1, 2, 3, 4, 5, 6]).unwrap();

        let report = process_new_draw(&mut history, &state, new_draw, 3, Some(42)).unwrap();

        assert_eq!(
            report.validation,
            ValidationOutcome::LineageBroken {
                expected: 50,
                actual: 106
            }
        );
        assert_eq!(report.state.six_match, 1);
        assert_eq!(report.state.five_match, 2);
        assert_eq!(report.state.four_match, 3);
        assert_eq!(report.prediction.target_draw_id, 107);
    }

    #[test]
    fn test_cycle_first_run_has_no_lineage() {
        let mut history = History::new();
        let state = PredictorState::default();
        let new_draw = Draw::new(1, [1, 2, 3, 4, 5, 6]).unwrap();

        let report = process_new_draw(&mut history, &state, new_draw, 2, Some(1)).unwrap();

        assert!(matches!(
            report.validation,
            ValidationOutcome::LineageBroken {
                expected: 0,
                actual: 1
            }
        ));
        assert_eq!(report.prediction.target_draw_id, 2);
        assert_eq!(report.prediction.games.len(), 2);
        // o concurso recém-chegado já conta para as frequências
        assert_eq!(report.frequencies.len(), 60);
        assert!(!report.prediction.insufficient_history);
    }

    #[test]
    fn test_cycle_out_of_order_draw_aborts() {
        let mut history = history_100_to_105();
        let state = PredictorState::default();
        let stale = draw(105);

        assert!(process_new_draw(&mut history, &state, stale, 3, None).is_err());
        assert_eq!(history.len(), 6);
    }
}

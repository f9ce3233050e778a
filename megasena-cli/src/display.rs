use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use megasena_db::models::{Draw, HitTier, NumberFrequency, PredictionSet};

use crate::analysis::top_frequencies;
use crate::import::ImportResult;
use crate::orchestrator::{CycleReport, ValidationOutcome};

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Nenhum concurso para exibir.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Concurso", "Dezenas"]);

    for draw in draws {
        table.add_row(vec![draw.id.to_string(), format_numbers(&draw.numbers)]);
    }
    println!("{table}");
}

pub fn display_frequencies(snapshot: &[NumberFrequency], top: usize) {
    if snapshot.is_empty() {
        println!("Histórico vazio: sem frequências para exibir.");
        return;
    }

    println!("\n📊 Dezenas mais frequentes (top {})\n", top);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Dezena", "Frequência", "Porcentagem"]);

    for freq in top_frequencies(snapshot, top) {
        table.add_row(vec![
            Cell::new(format!("{:02}", freq.number)),
            Cell::new(freq.count.to_string()),
            Cell::new(format!("{:.2} %", freq.percentage)),
        ]);
    }
    println!("{table}");
}

pub fn display_prediction(prediction: &PredictionSet) {
    println!(
        "\n🎲 Jogos recomendados para o concurso {}\n",
        prediction.target_draw_id
    );
    if prediction.insufficient_history {
        println!("(histórico insuficiente: jogos sorteados uniformemente)");
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Dezenas"]);

    for (i, game) in prediction.games.iter().enumerate() {
        table.add_row(vec![format!("{}", i + 1), format_numbers(game)]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Importação concluída ({:?}):", result.source);
    println!("  Linhas lidas       : {}", result.total_records);
    println!("  Inseridas          : {}", result.inserted);
    println!("  Duplicatas         : {}", result.duplicates);
    if result.errors > 0 {
        println!("  Linhas descartadas : {}", result.errors);
    }
}

pub fn display_cycle(report: &CycleReport) {
    println!(
        "\n🎰 Concurso {} registrado: {}",
        report.new_draw.id,
        format_numbers(&report.new_draw.numbers)
    );

    match &report.validation {
        ValidationOutcome::Scored(score) => {
            let tier_cell = match score.tier() {
                HitTier::Sena => Cell::new("SENA").fg(Color::Green),
                HitTier::Quina => Cell::new("QUINA").fg(Color::Green),
                HitTier::Quadra => Cell::new("QUADRA").fg(Color::Yellow),
                HitTier::Nenhum => Cell::new("—").fg(Color::White),
            };
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Acertos", "Melhor jogo", "Faixa"]);
            table.add_row(vec![
                Cell::new(score.max_hits.to_string()),
                Cell::new(score.best_game.to_string()),
                tier_cell,
            ]);
            println!("{table}");
        }
        ValidationOutcome::LineageBroken { expected: 0, .. } => {
            println!("Sem previsão anterior para conferir (primeira execução).");
        }
        ValidationOutcome::LineageBroken { expected, actual } => {
            println!(
                "Linhagem quebrada: previsão era para o concurso {}, chegou o {}. Conferência pulada.",
                expected, actual
            );
        }
    }

    println!(
        "Placar acumulado: sena {} | quina {} | quadra {}",
        report.state.six_match, report.state.five_match, report.state.four_match
    );

    display_prediction(&report.prediction);
    display_frequencies(&report.frequencies, 10);
}

/// Mensagem HTML para o Telegram: resultado, conferência, placar, jogos e
/// tabela das dez dezenas mais frequentes.
pub fn format_telegram_message(report: &CycleReport) -> String {
    let mut message = format!(
        "<b>🎰 NOVA PREVISÃO MEGA-SENA AUTOMÁTICA</b>\n\
         Último concurso sorteado: <b>{}</b>\n\
         Resultado: <b>{}</b>\n\n",
        report.new_draw.id,
        format_numbers(&report.new_draw.numbers)
    );

    match &report.validation {
        ValidationOutcome::Scored(score) => {
            message.push_str(&format!(
                "Conferência da previsão anterior: <b>{} acerto(s)</b> (jogo {}, faixa {})\n",
                score.max_hits,
                score.best_game,
                score.tier()
            ));
        }
        ValidationOutcome::LineageBroken { expected: 0, .. } => {
            message.push_str("Sem previsão anterior para conferir.\n");
        }
        ValidationOutcome::LineageBroken { expected, actual } => {
            message.push_str(&format!(
                "Linhagem quebrada (previsão para {}, sorteado {}): conferência pulada.\n",
                expected, actual
            ));
        }
    }
    message.push_str(&format!(
        "Placar: sena {} | quina {} | quadra {}\n\n",
        report.state.six_match, report.state.five_match, report.state.four_match
    ));

    message.push_str(&format!(
        "🧠 <b>Próximos {} jogos recomendados (concurso {}):</b>\n",
        report.prediction.games.len(),
        report.prediction.target_draw_id
    ));
    if report.prediction.insufficient_history {
        message.push_str("(histórico insuficiente: jogos uniformes)\n");
    }
    for (i, game) in report.prediction.games.iter().enumerate() {
        message.push_str(&format!(
            "  Jogo {}: <code>{}</code>\n",
            i + 1,
            format_numbers(game)
        ));
    }

    if !report.frequencies.is_empty() {
        message.push_str("\n📊 <b>Dezenas mais frequentes (Top 10):</b>\n<pre>");
        for freq in top_frequencies(&report.frequencies, 10) {
            message.push_str(&format!(
                "{:02}  {:>5}  {:6.2} %\n",
                freq.number, freq.count, freq.percentage
            ));
        }
        message.push_str("</pre>");
    }

    message
}

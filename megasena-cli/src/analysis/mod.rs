pub mod sampler;
pub mod validator;

use megasena_db::models::{Draw, NumberFrequency, GAME_SIZE, POOL_SIZE};

/// Frequência de cada dezena sobre todo o histórico. Histórico vazio retorna
/// um vetor vazio: sem sinal, o gerador cai na amostragem uniforme.
pub fn compute_frequencies(draws: &[Draw]) -> Vec<NumberFrequency> {
    if draws.is_empty() {
        return Vec::new();
    }

    let mut counts = [0u32; POOL_SIZE as usize];
    for draw in draws {
        for &n in &draw.numbers {
            let idx = (n - 1) as usize;
            if idx < counts.len() {
                counts[idx] += 1;
            }
        }
    }

    let total = (draws.len() * GAME_SIZE) as f64;
    (1..=POOL_SIZE)
        .map(|n| {
            let count = counts[(n - 1) as usize];
            NumberFrequency {
                number: n,
                count,
                percentage: count as f64 / total * 100.0,
            }
        })
        .collect()
}

/// Top-k por frequência decrescente; empates resolvidos pela dezena menor.
pub fn top_frequencies(snapshot: &[NumberFrequency], k: usize) -> Vec<NumberFrequency> {
    let mut sorted = snapshot.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then(a.number.cmp(&b.number)));
    sorted.truncate(k);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_frequencies_empty() {
        assert!(compute_frequencies(&[]).is_empty());
    }

    #[test]
    fn test_compute_frequencies_single_draw() {
        let draw = Draw::new(1, [1, 2, 3, 4, 5, 6]).unwrap();
        let snapshot = compute_frequencies(&[draw]);
        assert_eq!(snapshot.len(), 60);

        for freq in &snapshot[..6] {
            assert_eq!(freq.count, 1);
            assert!((freq.percentage - 100.0 / 6.0).abs() < 1e-9);
        }
        for freq in &snapshot[6..] {
            assert_eq!(freq.count, 0);
            assert_eq!(freq.percentage, 0.0);
        }

        let sum: f64 = snapshot.iter().map(|f| f.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_frequencies_percentage_sums_to_100() {
        let draws = vec![
            Draw::new(1, [1, 2, 3, 4, 5, 6]).unwrap(),
            Draw::new(2, [1, 2, 3, 10, 20, 30]).unwrap(),
            Draw::new(3, [40, 41, 42, 43, 44, 45]).unwrap(),
        ];
        let snapshot = compute_frequencies(&draws);
        let sum: f64 = snapshot.iter().map(|f| f.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(snapshot[0].count, 2);
    }

    #[test]
    fn test_top_frequencies_tie_break_by_number() {
        let draws = vec![
            Draw::new(1, [1, 2, 3, 4, 5, 6]).unwrap(),
            Draw::new(2, [4, 5, 6, 7, 8, 9]).unwrap(),
        ];
        let snapshot = compute_frequencies(&draws);
        let top = top_frequencies(&snapshot, 5);

        // 4, 5 e 6 aparecem duas vezes; o empate entre os demais cai na menor dezena
        assert_eq!(top[0].number, 4);
        assert_eq!(top[1].number, 5);
        assert_eq!(top[2].number, 6);
        assert_eq!(top[3].number, 1);
        assert_eq!(top[4].number, 2);
    }
}

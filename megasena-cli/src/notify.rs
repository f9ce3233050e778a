use anyhow::{anyhow, Context, Result};
use futures_util::future::join_all;
use serde_json::json;
use std::time::Duration;

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Default)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_ids: Vec<String>,
}

impl TelegramConfig {
    pub fn enabled(&self) -> bool {
        !self.token.is_empty() && !self.chat_ids.is_empty()
    }
}

#[derive(Debug)]
pub struct DeliveryOutcome {
    pub chat_id: String,
    pub result: Result<()>,
}

#[derive(Debug)]
pub struct DeliveryReport {
    pub outcomes: Vec<DeliveryOutcome>,
}

impl DeliveryReport {
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }
}

/// Dispara uma entrega independente por chat e coleta os resultados.
/// A falha de um destinatário não cancela nem contamina os demais.
pub fn send_all(config: &TelegramConfig, message: &str) -> Result<DeliveryReport> {
    let runtime = tokio::runtime::Runtime::new()
        .context("Não foi possível iniciar o runtime de notificação")?;

    let url = format!("https://api.telegram.org/bot{}/sendMessage", config.token);
    let client = reqwest::Client::builder()
        .timeout(DELIVERY_TIMEOUT)
        .build()
        .context("Não foi possível criar o cliente HTTP")?;

    let outcomes = runtime.block_on(async {
        let handles: Vec<_> = config
            .chat_ids
            .iter()
            .map(|chat_id| {
                let client = client.clone();
                let url = url.clone();
                let chat_id = chat_id.clone();
                let text = message.to_string();
                (
                    chat_id.clone(),
                    tokio::spawn(async move { send_one(&client, &url, &chat_id, &text).await }),
                )
            })
            .collect();

        let (chat_ids, tasks): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        let joined = join_all(tasks).await;

        chat_ids
            .into_iter()
            .zip(joined)
            .map(|(chat_id, task_result)| DeliveryOutcome {
                chat_id,
                result: match task_result {
                    Ok(result) => result,
                    Err(e) => Err(anyhow!("Tarefa de envio interrompida: {}", e)),
                },
            })
            .collect()
    });

    Ok(DeliveryReport { outcomes })
}

async fn send_one(
    client: &reqwest::Client,
    url: &str,
    chat_id: &str,
    text: &str,
) -> Result<()> {
    let body = json!({
        "chat_id": chat_id,
        "text": text,
        "parse_mode": "HTML",
    });
    client
        .post(url)
        .json(&body)
        .send()
        .await
        .context("Falha de conexão com o Telegram")?
        .error_for_status()
        .context("O Telegram recusou a mensagem")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_requires_token_and_chats() {
        assert!(!TelegramConfig::default().enabled());
        assert!(!TelegramConfig {
            token: "t".into(),
            chat_ids: vec![],
        }
        .enabled());
        assert!(!TelegramConfig {
            token: String::new(),
            chat_ids: vec!["1".into()],
        }
        .enabled());
        assert!(TelegramConfig {
            token: "t".into(),
            chat_ids: vec!["1".into()],
        }
        .enabled());
    }

    #[test]
    fn test_report_counts() {
        let report = DeliveryReport {
            outcomes: vec![
                DeliveryOutcome {
                    chat_id: "1".into(),
                    result: Ok(()),
                },
                DeliveryOutcome {
                    chat_id: "2".into(),
                    result: Err(anyhow!("timeout")),
                },
                DeliveryOutcome {
                    chat_id: "3".into(),
                    result: Ok(()),
                },
            ],
        };
        assert_eq!(report.delivered(), 2);
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn test_send_all_empty_recipients() {
        let config = TelegramConfig {
            token: "t".into(),
            chat_ids: vec![],
        };
        let report = send_all(&config, "oi").unwrap();
        assert!(report.outcomes.is_empty());
    }
}

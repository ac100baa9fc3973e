use crate::domain::model::OutputRecord;
use chrono::NaiveDate;

/// Telegram legacy Markdown 的保留字元
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '[' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Telegram rejects `sendMessage` texts longer than this. It counts UTF-16
/// code units, and emoji take two.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

fn message_len(text: &str) -> usize {
    text.encode_utf16().count()
}

fn render_entry(record: &OutputRecord) -> String {
    let link = if record.imdb_link.is_empty() {
        "#"
    } else {
        record.imdb_link.as_str()
    };

    format!(
        "📺 *{}*\n└ 📱 {}\n└ 🔗 [Ficha no IMDB]({})\n\n",
        escape_markdown(&record.title),
        escape_markdown(&record.services_label()),
        link
    )
}

fn remaining_line(count: usize) -> String {
    format!("➕ mais {} títulos\n", count)
}

/// Renders the digest as one message that always fits in a single
/// `sendMessage` call. Entries that do not fit are counted in a closing line.
pub fn render_message(date: NaiveDate, records: &[OutputRecord]) -> String {
    let mut message = format!("🎬 *Novidades do Dia ({})*\n\n", date.format("%d/%m"));
    // 預留結尾行的空間，數字以最大可能值估算
    let reserved = message_len(&remaining_line(records.len()));

    for (index, record) in records.iter().enumerate() {
        let entry = render_entry(record);
        let is_last = index + 1 == records.len();
        let budget = if is_last {
            TELEGRAM_MESSAGE_LIMIT
        } else {
            TELEGRAM_MESSAGE_LIMIT.saturating_sub(reserved)
        };

        if message_len(&message) + message_len(&entry) > budget {
            let omitted = records.len() - index;
            tracing::warn!(
                "⚠️ Message limit reached; {} of {} titles left out",
                omitted,
                records.len()
            );
            message.push_str(&remaining_line(omitted));
            return message;
        }
        message.push_str(&entry);
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn record(title: &str, services: &[&str], imdb_link: &str) -> OutputRecord {
        OutputRecord {
            title: title.to_string(),
            kind: None,
            services: services.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            imdb_link: imdb_link.to_string(),
            critic_score: None,
            user_rating: None,
            poster_url: None,
        }
    }

    #[test]
    fn test_render_message_layout() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let records = vec![
            record(
                "Dune",
                &["Netflix", "Max (HBO)"],
                "https://www.imdb.com/title/tt1160419",
            ),
            record("Sem Link", &["Mubi"], ""),
        ];

        let message = render_message(date, &records);

        assert_eq!(
            message,
            "🎬 *Novidades do Dia (19/10)*\n\n\
             📺 *Dune*\n\
             └ 📱 Max (HBO), Netflix\n\
             └ 🔗 [Ficha no IMDB](https://www.imdb.com/title/tt1160419)\n\n\
             📺 *Sem Link*\n\
             └ 📱 Mubi\n\
             └ 🔗 [Ficha no IMDB](#)\n\n"
        );
    }

    #[test]
    fn test_titles_are_escaped() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let message = render_message(date, &[record("The *Best*_Show", &["Netflix"], "")]);

        assert!(message.starts_with("🎬 *Novidades do Dia (02/01)*"));
        assert!(message.contains("📺 *The \\*Best\\*\\_Show*"));
    }

    #[test]
    fn test_service_names_are_escaped() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let message = render_message(date, &[record("Filme", &["Star_Plus", "*Extra*"], "")]);

        assert!(message.contains("└ 📱 \\*Extra\\*, Star\\_Plus\n"));
    }

    #[test]
    fn test_long_digest_stays_within_message_limit() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let records: Vec<OutputRecord> = (0..250)
            .map(|i| {
                record(
                    &format!("Lançamento número {} com um título bem comprido", i),
                    &["Netflix", "Max (HBO)", "Apple TV (Aluguel/iTunes)"],
                    &format!("https://www.imdb.com/title/tt{:07}", i),
                )
            })
            .collect();

        let message = render_message(date, &records);

        assert!(message.encode_utf16().count() <= TELEGRAM_MESSAGE_LIMIT);
        assert!(message.chars().count() <= TELEGRAM_MESSAGE_LIMIT);
        assert!(message.contains("📺 *Lançamento número 0 com"));

        let shown = message.matches("📺 ").count();
        assert!(shown > 0 && shown < records.len());
        assert!(message.ends_with(&format!("➕ mais {} títulos\n", records.len() - shown)));
    }

    #[test]
    fn test_digest_that_fits_has_no_remaining_line() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let records: Vec<OutputRecord> = (0..10)
            .map(|i| record(&format!("Filme {}", i), &["Netflix"], ""))
            .collect();

        let message = render_message(date, &records);

        assert_eq!(message.matches("📺 ").count(), 10);
        assert!(!message.contains("➕"));
    }
}

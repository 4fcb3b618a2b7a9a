//! HTML markup for the handoff board.
//!
//! Every backend-supplied text field goes through [`escape_html`] before it is
//! interpolated, so a summary containing `<script>` shows up as text.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::render::{HANDOFFS_EMPTY, HANDOFFS_FAILED};
use crate::types::Handoff;

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds the card markup for one handoff.
pub fn handoff_card(handoff: &Handoff) -> String {
    // Known priorities are plain lowercase words; only unrecognized ones need escaping.
    let priority = escape_html(handoff.priority.as_str());
    let customer = handoff
        .customer()
        .map(|name| {
            format!(
                r#"<div class="handoff-customer">Cliente: {}</div>"#,
                escape_html(name)
            )
        })
        .unwrap_or_default();
    let team = handoff
        .routed_team
        .as_deref()
        .map(|team| {
            format!(
                r#"<div class="handoff-team">Equipo: {}</div>"#,
                escape_html(team)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="handoff-card">
    <div class="handoff-header">
        <div>
            <div class="handoff-reason">{reason}</div>
            {customer}{team}
        </div>
        <span class="priority-badge priority-{priority}">{priority}</span>
    </div>
    <div class="handoff-summary">{summary}</div>
    <div class="handoff-suggested">
        <div class="handoff-suggested-label">💡 Próxima respuesta sugerida:</div>
        <div class="handoff-suggested-text">{suggested}</div>
    </div>
    <div class="handoff-meta">
        <div>Conversación: {conversation}</div>
        <div>{timestamp}</div>
    </div>
</div>"#,
        reason = escape_html(&handoff.reason),
        summary = escape_html(&handoff.summary),
        suggested = escape_html(&handoff.suggested_response),
        conversation = escape_html(&handoff.conversation_id),
        timestamp = escape_html(&handoff.time_label()),
    )
}

/// Builds the inner markup of the handoff container.
///
/// An empty list yields exactly one placeholder; otherwise one card per
/// handoff, in order.
pub fn handoff_list(handoffs: &[Handoff]) -> String {
    if handoffs.is_empty() {
        return format!(r#"<div class="empty-state">{HANDOFFS_EMPTY}</div>"#);
    }
    handoffs
        .iter()
        .map(handoff_card)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Inner markup of the handoff container when the fetch failed.
pub fn handoff_error() -> String {
    format!(r#"<div class="empty-state">{HANDOFFS_FAILED}</div>"#)
}

/// Builds a standalone page showing the handoff board.
pub fn handoff_board(title: &str, handoffs: &[Handoff]) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
<style>
body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;background:#f5f5f5;color:#222;margin:0;padding:20px}}
.handoff-card{{background:#fff;border-radius:10px;padding:16px;margin-bottom:12px;box-shadow:0 1px 3px rgba(0,0,0,.1)}}
.handoff-header{{display:flex;justify-content:space-between;align-items:flex-start}}
.handoff-reason{{font-weight:600}}
.handoff-customer,.handoff-team{{font-size:12px;color:#666;margin-top:4px}}
.priority-badge{{font-size:11px;text-transform:uppercase;padding:2px 8px;border-radius:10px;background:#eee}}
.priority-urgent{{background:#fdd;color:#a00}}
.priority-high{{background:#ffe9c7;color:#8a5300}}
.priority-medium{{background:#e0f0ff;color:#004a8a}}
.priority-low{{background:#e3f7e3;color:#1d6b1d}}
.handoff-summary{{margin:10px 0}}
.handoff-suggested{{background:#fafafa;border-left:3px solid #7a5cff;padding:8px}}
.handoff-suggested-label{{font-size:12px;color:#666}}
.handoff-meta{{display:flex;justify-content:space-between;font-size:12px;color:#888;margin-top:10px}}
.empty-state{{text-align:center;color:#888;padding:40px}}
</style>
</head>
<body>
<div id="handoffsContainer">
{list}
</div>
</body>
</html>
"##,
        title = escape_html(title),
        list = handoff_list(handoffs),
    )
}

/// Writes the page built by [`handoff_board`] to `path`.
pub fn write_handoff_board(path: &Path, title: &str, handoffs: &[Handoff]) -> Result<()> {
    fs::write(path, handoff_board(title, handoffs))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::Priority;

    fn handoff(reason: &str, priority: Priority) -> Handoff {
        Handoff {
            conversation_id: "conv_1_abc".to_string(),
            reason: reason.to_string(),
            priority,
            summary: "Resumen".to_string(),
            suggested_response: "Te llamamos".to_string(),
            customer_name: None,
            routed_team: None,
            timestamp: "2024-06-10T17:20:00".to_string(),
        }
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("máquina"), "máquina");
    }

    #[test]
    fn card_fields_are_literal_text() {
        let mut record = handoff("<b>urgente</b>", Priority::High);
        record.summary = "a < b && c > d".to_string();
        record.suggested_response = "<img src=x onerror=alert(1)>".to_string();
        record.customer_name = Some("Ana \"La Jefa\"".to_string());

        let card = handoff_card(&record);
        assert!(card.contains("&lt;b&gt;urgente&lt;/b&gt;"));
        assert!(card.contains("a &lt; b &amp;&amp; c &gt; d"));
        assert!(card.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(card.contains("Cliente: Ana &quot;La Jefa&quot;"));
        assert!(!card.contains("<b>"));
        assert!(!card.contains("<img"));
    }

    #[test]
    fn card_priority_and_meta() {
        let card = handoff_card(&handoff("Pago", Priority::Urgent));
        assert!(card.contains(r#"<span class="priority-badge priority-urgent">urgent</span>"#));
        assert!(card.contains("Conversación: conv_1_abc"));
        assert!(card.contains("10/06/2024, 17:20"));
        assert!(!card.contains("handoff-customer"));
    }

    #[test]
    fn unknown_priority_is_escaped() {
        let card = handoff_card(&handoff("x", Priority::Other("\"><b>".to_string())));
        assert!(!card.contains("\"><b>"));
    }

    #[test]
    fn empty_list_has_one_placeholder() {
        let list = handoff_list(&[]);
        assert_eq!(list.matches("empty-state").count(), 1);
        assert!(list.contains(HANDOFFS_EMPTY));
        assert!(!list.contains("handoff-card"));
    }

    #[test]
    fn cards_keep_input_order() {
        let records = vec![
            handoff("primero", Priority::Low),
            handoff("segundo", Priority::Medium),
            handoff("tercero", Priority::High),
        ];
        let list = handoff_list(&records);
        assert_eq!(list.matches(r#"class="handoff-card""#).count(), 3);
        let first = list.find("primero").unwrap();
        let second = list.find("segundo").unwrap();
        let third = list.find("tercero").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn board_wraps_list() {
        let board = handoff_board("Handoffs <internos>", &[]);
        assert!(board.starts_with("<!DOCTYPE html>"));
        assert!(board.contains("<title>Handoffs &lt;internos&gt;</title>"));
        assert!(board.contains(HANDOFFS_EMPTY));
        assert!(handoff_error().contains(HANDOFFS_FAILED));
    }

    #[test]
    fn board_is_written_to_disk() {
        let path = std::env::temp_dir().join(format!(
            "support-chat-board-{}.html",
            std::process::id()
        ));
        write_handoff_board(&path, "Handoffs", &[handoff("Pago", Priority::Low)]).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(written.contains("<title>Handoffs</title>"));
        assert_eq!(written.matches(r#"class="handoff-card""#).count(), 1);
    }

    #[test]
    fn unwritable_board_is_an_io_error() {
        let path = std::env::temp_dir()
            .join("support-chat-missing-dir")
            .join("nested")
            .join("board.html");
        let err = write_handoff_board(&path, "Handoffs", &[]).unwrap_err();
        assert!(matches!(err, Error::Io { .. }), "{err}");
        assert!(std::error::Error::source(&err).is_some());
    }
}

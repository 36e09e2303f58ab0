//! 纯渲染函数：状态进，字符串出。终端前端在每次状态更新后调用。

use crate::session::SessionState;
use crate::types::{ChatMessage, Role};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// 按终端显示宽度把一行切成不超过 `width` 列的若干段，宽字符占两列
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut used = 0;

    for ch in line.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > width && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(ch);
        used += ch_width;
    }
    rows.push(current);
    rows
}

/// 把文本折成显示行，`\n` 另起一行
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    text.split('\n').flat_map(|line| wrap_line(line, width)).collect()
}

/// 输入框高度：内容折行后的行数，夹在 [min_rows, max_rows] 之间
pub fn input_box_height(text: &str, width: usize, min_rows: usize, max_rows: usize) -> usize {
    let max_rows = max_rows.max(min_rows);
    wrap(text, width).len().clamp(min_rows, max_rows)
}

/// 画一个随内容伸缩的框，超出 `max_rows` 时只显示末尾几行
pub fn render_input_box(text: &str, width: usize, min_rows: usize, max_rows: usize) -> String {
    let inner = width.saturating_sub(4).max(2);
    let height = input_box_height(text, inner, min_rows, max_rows);
    let lines = wrap(text, inner);
    let skip = lines.len().saturating_sub(height);

    let mut out = String::new();
    out.push_str(&format!("┌{}┐\n", "─".repeat(inner + 2)));
    for row in 0..height {
        let content = lines.get(skip + row).map(String::as_str).unwrap_or("");
        let pad = inner.saturating_sub(UnicodeWidthStr::width(content));
        out.push_str(&format!("│ {}{} │\n", content, " ".repeat(pad)));
    }
    out.push_str(&format!("└{}┘", "─".repeat(inner + 2)));
    out
}

pub fn render_message(message: &ChatMessage, width: usize) -> String {
    let label = match message.role {
        Role::User => "🧑 你",
        Role::Assistant => "🤖 AI",
    };
    let body = wrap(&message.text, width.saturating_sub(3)).join("\n   ");
    format!("{}\n   {}", label, body)
}

/// 渲染整段对话
pub fn render_transcript(state: &SessionState, width: usize) -> String {
    if state.messages.is_empty() {
        return format!("📭 {} 暂无消息", state.active_agent);
    }
    state
        .messages
        .iter()
        .map(|m| render_message(m, width))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// 侧栏：agent 列表，当前 agent 前加标记
pub fn render_sidebar(state: &SessionState) -> String {
    state
        .agents
        .iter()
        .map(|name| {
            if *name == state.active_agent {
                format!("▶ {}", name)
            } else {
                format!("  {}", name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn status_line(state: &SessionState) -> String {
    let marker = if state.loading { " ⏳" } else { "" };
    format!(
        "[{}] 模型：{}{}",
        state.active_agent, state.settings.model, marker
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn height_grows_with_content_and_clamps() {
        assert_eq!(input_box_height("", 10, 1, 5), 1);
        assert_eq!(input_box_height("short", 10, 1, 5), 1);
        assert_eq!(input_box_height("abcdefghijk", 10, 1, 5), 2);
        assert_eq!(input_box_height("a\nb\nc", 10, 1, 5), 3);
        assert_eq!(input_box_height(&"x".repeat(100), 10, 1, 5), 5);
        assert_eq!(input_box_height("", 10, 3, 5), 3);
    }

    #[test]
    fn height_counts_trailing_newline() {
        assert_eq!(input_box_height("line\n", 10, 1, 5), 2);
    }

    #[test]
    fn wrap_counts_wide_chars_as_two_columns() {
        assert_eq!(wrap("你好世界", 4), vec!["你好", "世界"]);
        assert_eq!(wrap("你好世界", 5), vec!["你好", "世界"]);
        assert_eq!(wrap("ab你好", 4), vec!["ab你", "好"]);
    }

    #[test]
    fn height_uses_display_width() {
        assert_eq!(input_box_height("你好你好你好", 6, 1, 5), 2);
    }

    #[test]
    fn input_box_rows_line_up_with_wide_chars() {
        let rendered = render_input_box("你好你好你好你好", 10, 1, 6);
        let widths: Vec<usize> = rendered.lines().map(UnicodeWidthStr::width).collect();
        assert_eq!(widths.len(), 5);
        assert!(widths.iter().all(|w| *w == 10), "row widths: {:?}", widths);
    }

    #[test]
    fn input_box_rows_line_up_with_mixed_text() {
        let rendered = render_input_box("hi 你好\n世界 ok", 12, 1, 6);
        let widths: Vec<usize> = rendered.lines().map(UnicodeWidthStr::width).collect();
        assert!(widths.iter().all(|w| *w == 12), "row widths: {:?}", widths);
    }

    #[test]
    fn input_box_shows_tail_when_too_tall() {
        let rendered = render_input_box("1\n2\n3\n4", 10, 1, 2);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains('3'));
        assert!(lines[2].contains('4'));
    }

    #[test]
    fn transcript_lists_messages_in_order() {
        let mut state = SessionState::new("Main", "Main", Settings::default());
        assert!(render_transcript(&state, 40).contains("暂无消息"));

        state.messages.push(ChatMessage::user("ping"));
        state.messages.push(ChatMessage::assistant("pong"));
        let out = render_transcript(&state, 40);
        let ping = out.find("ping").unwrap();
        let pong = out.find("pong").unwrap();
        assert!(ping < pong);
    }

    #[test]
    fn sidebar_marks_active_agent() {
        let mut state = SessionState::new("Main", "Main", Settings::default());
        state.add_agent("Ops");
        state.active_agent = "Ops".to_string();
        assert_eq!(render_sidebar(&state), "  Main\n▶ Ops");
    }
}

//! Plain text and Markdown export

use super::markup::strip_markup;
use super::ExportRequest;

pub fn render_text(request: &ExportRequest<'_>) -> String {
    format!(
        "{}\n\n{}\n\n{}\n",
        request.title,
        strip_markup(request.content),
        request.footer()
    )
}

pub fn render_markdown(request: &ExportRequest<'_>) -> String {
    format!(
        "# {}\n\n{}\n\n---\n*{}*\n",
        request.title,
        strip_markup(request.content),
        request.footer()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request<'a>(content: &'a str) -> ExportRequest<'a> {
        ExportRequest {
            title: "Notes",
            content,
            generated_at: NaiveDate::from_ymd_opt(2025, 1, 15)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_render_text() {
        assert_eq!(
            render_text(&request("<p>Hello</p><p>World</p>")),
            "Notes\n\nHello\nWorld\n\n\nGenerated on: 2025-01-15 09:15:00\n"
        );
    }

    #[test]
    fn test_render_markdown() {
        assert_eq!(
            render_markdown(&request("a &amp; b")),
            "# Notes\n\na & b\n\n---\n*Generated on: 2025-01-15 09:15:00*\n"
        );
    }
}

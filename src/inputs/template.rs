use tracing::error;

use crate::models::{Template, TemplateCategory};

/// Marker that turns a template line into a category header
pub const GENRE_MARKER: &str = ",#genre#";

enum Section {
    /// No category header seen yet
    Preamble,
    /// Under a header whose title was empty
    Discarding,
    Collecting(TemplateCategory),
}

/// Parse template text into ordered categories.
///
/// Blank and `#` lines are skipped. Structural problems are logged and the
/// offending entries dropped: channel lines before the first header, and
/// headers with an empty title together with the channel lines under them.
pub fn parse_template(content: &str) -> Template {
    let mut template = Template::default();
    let mut section = Section::Preamble;

    for (line_num, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.contains(GENRE_MARKER) {
            if let Section::Collecting(category) = section {
                template.categories.push(category);
            }

            let title = line.replacen(GENRE_MARKER, "", 1);
            let title = title.trim();
            section = if title.is_empty() {
                error!(line = line_num + 1, "Template category has an empty title");
                Section::Discarding
            } else {
                Section::Collecting(TemplateCategory::new(title))
            };
            continue;
        }

        match &mut section {
            Section::Collecting(category) => category.channels.push(line.to_string()),
            Section::Preamble | Section::Discarding => {
                error!(line = line_num + 1, channel = line, "Template channel has no category");
            }
        }
    }

    if let Section::Collecting(category) = section {
        template.categories.push(category);
    }

    template
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_categories_in_order() {
        let template = parse_template(
            "央视频道,#genre#\nCCTV1\nCCTV2\n\n卫视频道 ,#genre#\r\n 湖南卫视 \n浙江卫视\n",
        );

        assert_eq!(template.categories.len(), 2);
        assert_eq!(template.categories[0].title, "央视频道");
        assert_eq!(template.categories[0].channels, vec!["CCTV1", "CCTV2"]);
        assert_eq!(template.categories[1].title, "卫视频道");
        assert_eq!(template.categories[1].channels, vec!["湖南卫视", "浙江卫视"]);
        assert_eq!(template.channel_count(), 4);
    }

    #[test]
    #[traced_test]
    fn test_orphan_channels_are_dropped() {
        let template = parse_template("CCTV1\n央视频道,#genre#\nCCTV2\n");
        assert_eq!(template.categories.len(), 1);
        assert_eq!(template.categories[0].channels, vec!["CCTV2"]);
        assert!(logs_contain("Template channel has no category"));
    }

    #[test]
    fn test_untitled_category_is_dropped() {
        let template = parse_template(",#genre#\nCCTV1\n卫视,#genre#\n湖南卫视\n");
        assert_eq!(template.categories.len(), 1);
        assert_eq!(template.categories[0].title, "卫视");
        assert_eq!(template.categories[0].channels, vec!["湖南卫视"]);
    }

    #[test]
    fn test_empty_category_is_kept() {
        let template = parse_template("央视,#genre#\n卫视,#genre#\n湖南卫视\n");
        assert_eq!(template.categories.len(), 2);
        assert!(template.categories[0].channels.is_empty());
    }

    #[test]
    fn test_comment_lines_are_ignored() {
        let template = parse_template("# header\n央视,#genre#\n# CCTV1\nCCTV2\n");
        assert_eq!(template.categories[0].channels, vec!["CCTV2"]);
    }

    #[test]
    fn test_no_categories() {
        assert!(parse_template("").is_empty());
        assert!(parse_template("CCTV1\nCCTV2\n").is_empty());
    }
}

//! Result table layout.
//!
//! Rows are rendered once, on arrival, and the rendered cells are what the
//! table shows and what the CSV export reads.

use crate::ResultRecord;

pub const PLACEHOLDER: &str = "-";
pub const FULLTEXT_FREE: &str = "免费";
pub const FULLTEXT_PAID: &str = "付费";

pub const TABLE_HEADERS: [&str; 14] = [
    "发表年份",
    "数据收集年份",
    "国家",
    "研究类型",
    "研究对象",
    "样本量",
    "推荐补充剂量/用法",
    "作用机理",
    "证据等级",
    "结论摘要",
    "标题",
    "翻译标题",
    "PMID",
    "全文状态",
];

pub const EXPORT_HEADERS: [&str; 13] = [
    "发表年份",
    "数据收集年份",
    "国家",
    "研究类型",
    "研究对象",
    "样本量",
    "推荐补充剂量",
    "作用机理",
    "证据等级",
    "结论摘要",
    "标题",
    "PMID",
    "全文状态",
];

/// Indices into `TABLE_HEADERS` for each `EXPORT_HEADERS` column.
const EXPORT_COLUMNS: [usize; 13] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 13];

/// Record fields shown verbatim in columns 0..=9.
const PLAIN_FIELDS: [&str; 10] = [
    "发表年份",
    "数据收集年份",
    "国家",
    "研究类型",
    "研究对象",
    "样本量",
    "推荐补充剂量/用法",
    "作用机理",
    "证据等级",
    "结论摘要",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    cells: Vec<String>,
}

impl RenderedRow {
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or(PLACEHOLDER)
    }
}

pub fn render_row(record: &ResultRecord) -> RenderedRow {
    let text = |value: Option<&str>| value.unwrap_or(PLACEHOLDER).to_string();

    let mut cells: Vec<String> = PLAIN_FIELDS
        .iter()
        .map(|name| text(record.field(name)))
        .collect();
    cells.push(text(record.field("标题").or_else(|| record.field("原文标题"))));
    cells.push(text(record.field("翻译标题")));
    cells.push(text(record.field("PMID")));
    cells.push(fulltext_label(record.field("免费全文状态")).to_string());

    RenderedRow { cells }
}

fn fulltext_label(status: Option<&str>) -> &str {
    let Some(status) = status.map(str::trim) else {
        return PLACEHOLDER;
    };
    match status {
        PLACEHOLDER => PLACEHOLDER,
        "可用" | "免费" | "提取中" | "已提取" => FULLTEXT_FREE,
        "付费" | "需要订阅" => FULLTEXT_PAID,
        other if other.contains(FULLTEXT_FREE) => FULLTEXT_FREE,
        _ => FULLTEXT_PAID,
    }
}

pub(crate) fn export_projection(rows: &[RenderedRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            EXPORT_COLUMNS
                .iter()
                .map(|&column| row.cell(column).to_string())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_render_as_placeholder() {
        let row = render_row(&ResultRecord::new().with_field("标题", "Study A"));
        assert_eq!(row.cells().len(), TABLE_HEADERS.len());
        assert_eq!(row.cell(10), "Study A");
        assert_eq!(row.cell(0), PLACEHOLDER);
        assert_eq!(row.cell(13), PLACEHOLDER);
    }

    #[test]
    fn title_falls_back_to_original_title() {
        let record = ResultRecord::new()
            .with_field("标题", "  ")
            .with_field("原文标题", "Original");
        assert_eq!(render_row(&record).cell(10), "Original");
    }

    #[test]
    fn fulltext_status_collapses_to_free_or_paid() {
        assert_eq!(fulltext_label(Some("可用")), FULLTEXT_FREE);
        assert_eq!(fulltext_label(Some("已提取")), FULLTEXT_FREE);
        assert_eq!(fulltext_label(Some("需要订阅")), FULLTEXT_PAID);
        assert_eq!(fulltext_label(Some("部分免费")), FULLTEXT_FREE);
        assert_eq!(fulltext_label(Some("unknown")), FULLTEXT_PAID);
        assert_eq!(fulltext_label(None), PLACEHOLDER);
    }

    #[test]
    fn export_projection_skips_translated_title() {
        let record = ResultRecord::new()
            .with_field("标题", "Title")
            .with_field("翻译标题", "译名")
            .with_field("PMID", "123");
        let projected = export_projection(&[render_row(&record)]);
        assert_eq!(projected[0].len(), EXPORT_HEADERS.len());
        assert_eq!(projected[0][10], "Title");
        assert_eq!(projected[0][11], "123");
        assert!(!projected[0].iter().any(|cell| cell == "译名"));
    }
}

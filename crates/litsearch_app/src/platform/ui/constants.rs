use ratatui::layout::Constraint;

/// Rows given to the log pane, borders included.
pub const LOG_PANE_HEIGHT: u16 = 10;
/// Keyword field height, borders included.
pub const KEYWORD_HEIGHT: u16 = 3;

pub const MODAL_WIDTH: u16 = 60;
pub const MODAL_HEIGHT: u16 = 11;

/// One entry per column of `TABLE_HEADERS`.
pub const COLUMN_WIDTHS: [Constraint; 14] = [
    Constraint::Length(8),  // 发表年份
    Constraint::Length(12), // 数据收集年份
    Constraint::Length(8),  // 国家
    Constraint::Length(10), // 研究类型
    Constraint::Fill(1),    // 研究对象
    Constraint::Length(8),  // 样本量
    Constraint::Fill(1),    // 推荐补充剂量/用法
    Constraint::Fill(1),    // 作用机理
    Constraint::Length(8),  // 证据等级
    Constraint::Fill(2),    // 结论摘要
    Constraint::Fill(2),    // 标题
    Constraint::Fill(2),    // 翻译标题
    Constraint::Length(10), // PMID
    Constraint::Length(8),  // 全文状态
];

/// Index of the full-text column in `TABLE_HEADERS`.
pub const FULLTEXT_COLUMN: usize = 13;

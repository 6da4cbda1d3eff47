pub mod formatter;

pub use formatter::{
    format_breakdown, format_describe, format_extraction, format_json, format_presets,
    format_ranked_table, format_record_detail, format_score, format_score_line,
    should_use_colors,
};

//! Parsed document data
//!
//! The document parser is an external collaborator: it turns a stored binary
//! document into this structured form. The pipeline consumes it as plain
//! data and never looks at the binary itself.

use serde::{Deserialize, Serialize};

/// Structured content of a parsed paper
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Extracted title, if any
    pub title: Option<String>,

    /// Full body text
    #[serde(default)]
    pub full_text: String,

    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,

    #[serde(default)]
    pub headings: Vec<Heading>,

    #[serde(default)]
    pub tables: Vec<TableInfo>,

    /// Fonts encountered in the body
    #[serde(default)]
    pub fonts: Vec<FontUsage>,

    #[serde(default)]
    pub page_setup: PageSetup,
}

/// One body paragraph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    /// 1-based position in the document
    pub index: usize,
    pub text: String,
    /// Named style, if the source format carries one
    pub style: Option<String>,
}

/// One heading with its outline level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heading {
    /// Outline level, 1 = top
    pub level: u8,
    pub text: String,
}

/// One table summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    pub index: usize,
    pub rows: usize,
    pub cols: usize,
    pub caption: Option<String>,
}

/// One font encountered in the document body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontUsage {
    /// Font family name; None when a run carries no explicit font
    pub name: Option<String>,
    /// Point size, if set explicitly
    pub size_pt: Option<f64>,
}

/// Page geometry, margins in EMU (914,400 EMU per inch, 360,000 per cm)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageSetup {
    pub left_margin_emu: Option<i64>,
    pub right_margin_emu: Option<i64>,
    pub top_margin_emu: Option<i64>,
    pub bottom_margin_emu: Option<i64>,
    pub page_width_emu: Option<i64>,
    pub page_height_emu: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_partial_json() {
        // Sidecar files only carry the fields the parser could extract
        let doc: ParsedDocument = serde_json::from_str(
            r#"{
                "title": "Research on Lightweight Web Frameworks",
                "full_text": "Body text here.",
                "headings": [{"level": 1, "text": "Introduction"}]
            }"#,
        )
        .unwrap();

        assert_eq!(
            doc.title.as_deref(),
            Some("Research on Lightweight Web Frameworks")
        );
        assert_eq!(doc.headings.len(), 1);
        assert!(doc.fonts.is_empty());
        assert!(doc.page_setup.left_margin_emu.is_none());
    }
}

//! Text rendering for analysis results.
//!
//! Produces a Markdown report of a [`FashionAnalysis`], with section
//! headings in the user's language. Terminal shells print it as-is.

use crate::model::{FashionAnalysis, Language};
use std::fmt::Write as _;

struct Headings {
    score: &'static str,
    items: &'static str,
    palette: &'static str,
    strengths: &'static str,
    suggestions: &'static str,
    occasions: &'static str,
}

fn headings(language: Language) -> Headings {
    match language {
        Language::Zh => Headings {
            score: "综合评分",
            items: "单品",
            palette: "配色",
            strengths: "亮点",
            suggestions: "改进建议",
            occasions: "适合场合",
        },
        Language::En => Headings {
            score: "Overall score",
            items: "Items",
            palette: "Color palette",
            strengths: "Strengths",
            suggestions: "Suggestions",
            occasions: "Occasions",
        },
        Language::Id => Headings {
            score: "Skor keseluruhan",
            items: "Item",
            palette: "Palet warna",
            strengths: "Kelebihan",
            suggestions: "Saran",
            occasions: "Acara",
        },
    }
}

/// Renders an analysis as Markdown.
///
/// Empty lists are left out rather than rendered as empty sections.
pub fn render_analysis(analysis: &FashionAnalysis, language: Language) -> String {
    let h = headings(language);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# {}", analysis.style);
    let _ = writeln!(
        out,
        "**{}:** {}/{}\n",
        h.score,
        analysis.overall_score,
        FashionAnalysis::MAX_SCORE
    );
    let _ = writeln!(out, "{}", analysis.summary);

    if !analysis.items.is_empty() {
        let _ = writeln!(out, "\n## {}", h.items);
        for item in &analysis.items {
            let _ = writeln!(
                out,
                "- **{}** ({}, {}): {}",
                item.name, item.category, item.color, item.comment
            );
        }
    }

    if !analysis.color_palette.is_empty() {
        let _ = writeln!(out, "\n## {}", h.palette);
        let _ = writeln!(out, "{}", analysis.color_palette.join(" · "));
    }

    for (title, entries) in [
        (h.strengths, &analysis.strengths),
        (h.suggestions, &analysis.suggestions),
        (h.occasions, &analysis.occasions),
    ] {
        if entries.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n## {}", title);
        for entry in entries {
            let _ = writeln!(out, "- {}", entry);
        }
    }

    out
}

//! The JSON summary variant.
//!
//! Unlike freeform text, section order here comes from `timestamp_seconds`:
//! sections are sorted ascending before rendering, and each one's image range
//! ends at the next sorted section's timestamp. No subtitle excerpts.

use super::blocks::BodyBuilder;
use super::inline::format_inline;
use super::{Heading, RenderOptions, SummarySection};
use crate::error::{Result, YoyakuError};
use crate::storyboard::match_images;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredSummary {
    pub title: String,
    pub summary: String,
    pub sections: Vec<StructuredSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredSection {
    pub heading: String,
    #[serde(deserialize_with = "seconds")]
    pub timestamp_seconds: u32,
    pub content: String,
}

/// Accept any non-negative JSON number; fractions are truncated.
fn seconds<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "timestamp_seconds must be a non-negative number, got {}",
            value
        )));
    }
    Ok(value as u32)
}

impl StructuredSummary {
    /// Parse a model reply.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| YoyakuError::Summary(format!("Malformed structured summary: {}", e)))
    }

    /// Section timestamps in the order given.
    pub fn timestamps(&self) -> Vec<u32> {
        self.sections.iter().map(|s| s.timestamp_seconds).collect()
    }

    /// Sections sorted by timestamp; ties keep their original order.
    pub fn sorted_sections(&self) -> Vec<&StructuredSection> {
        let mut sections: Vec<&StructuredSection> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.timestamp_seconds);
        sections
    }

    /// JSON Schema sent to the model for strict structured output.
    pub fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "summary": {"type": "string"},
                "sections": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "heading": {"type": "string"},
                            "timestamp_seconds": {"type": "integer", "minimum": 0},
                            "content": {"type": "string"}
                        },
                        "required": ["heading", "timestamp_seconds", "content"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["title", "summary", "sections"],
            "additionalProperties": false
        })
    }
}

/// Title and overview first, then one timestamped section per entry.
pub fn partition(summary: &StructuredSummary, options: &RenderOptions) -> Vec<SummarySection> {
    let mut sections = Vec::with_capacity(summary.sections.len() + 1);

    let mut intro = BodyBuilder::new();
    for line in summary.summary.lines() {
        intro.push_line(line);
    }
    sections.push(SummarySection {
        heading: Some(Heading {
            level: 1,
            html: format_inline(&summary.title),
        }),
        body: intro.finish(),
        ..SummarySection::default()
    });

    let sorted = summary.sorted_sections();
    for (i, section) in sorted.iter().enumerate() {
        let start = section.timestamp_seconds;
        let end = sorted.get(i + 1).map(|next| next.timestamp_seconds as f64);

        let mut body = BodyBuilder::new();
        for line in section.content.lines().filter(|l| !l.trim().is_empty()) {
            body.push_line(line);
        }

        sections.push(SummarySection {
            heading: Some(Heading {
                level: 2,
                html: format_inline(&section.heading),
            }),
            body: body.finish(),
            timestamp: Some(start),
            images: match_images(start as f64, end, &options.images, &options.match_config),
            subtitle_excerpt: None,
        });
    }

    sections
}

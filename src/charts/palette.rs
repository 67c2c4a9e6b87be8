//! Fixed colour assignments.
//!
//! Colours are CSS strings (hex or named) so the figure JSON can be handed to
//! Plotly unchanged; `css_to_rgb` converts them for the Plotters back-end.

use crate::domain::{CampaignId, Gender};

/// Plotly's default qualitative sequence.
const QUALITATIVE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880", "#FF97FF", "#FECB52",
];

/// Campaigns with a fixed colour.
const FIXED_CAMPAIGNS: [(&str, &str); 3] = [("1178", "#636EFA"), ("936", "#EF553B"), ("916", "#00CC96")];

pub fn gender_color(gender: Gender) -> &'static str {
    match gender {
        Gender::M => "lightblue",
        Gender::F => "pink",
    }
}

/// Colour per campaign for one figure.
///
/// The three known campaigns always get their fixed colour. Any other campaign
/// takes the next unused colour of the qualitative sequence, in the order the
/// campaigns were given, so the mapping is deterministic for a given list.
#[derive(Debug, Clone)]
pub struct CampaignPalette {
    entries: Vec<(CampaignId, &'static str)>,
}

impl CampaignPalette {
    pub fn for_campaigns(campaigns: &[CampaignId]) -> Self {
        let mut spare = QUALITATIVE
            .iter()
            .copied()
            .filter(|c| !FIXED_CAMPAIGNS.iter().any(|(_, fixed)| fixed == c))
            .cycle();

        let entries = campaigns
            .iter()
            .map(|id| {
                let fixed = FIXED_CAMPAIGNS
                    .iter()
                    .find(|(known, _)| *known == id.as_str())
                    .map(|(_, color)| *color);
                // `spare` cycles over a non-empty list, so `next` always yields.
                let color = fixed.or_else(|| spare.next()).unwrap_or(QUALITATIVE[0]);
                (id.clone(), color)
            })
            .collect();

        Self { entries }
    }

    pub fn color(&self, campaign: &CampaignId) -> &'static str {
        self.entries
            .iter()
            .find(|(id, _)| id == campaign)
            .map(|(_, color)| *color)
            .unwrap_or(QUALITATIVE[0])
    }
}

/// Convert `#RRGGBB` or one of the named colours used here to RGB.
pub fn css_to_rgb(color: &str) -> Option<(u8, u8, u8)> {
    match color.to_ascii_lowercase().as_str() {
        "lightblue" => return Some((0xAD, 0xD8, 0xE6)),
        "pink" => return Some((0xFF, 0xC0, 0xCB)),
        "white" => return Some((0xFF, 0xFF, 0xFF)),
        _ => {}
    }

    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

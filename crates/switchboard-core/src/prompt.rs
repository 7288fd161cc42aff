//! Prompt builders for campaign scripts.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

pub const CREATIVE_DIRECTOR_SYSTEM_PROMPT: &str = "You are a world-class creative director.";

/// Inputs for a 30-second ad script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignBrief {
    pub product_name: String,
    pub audience: String,
    pub mood: String,
    pub platform: String,
    /// Feeling the viewer should leave with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_core: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_truth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_point: Option<String>,
    /// Who actually pays, when that differs from the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_purchaser: Option<String>,
}

/// Agency-style brief asking for four scenes totalling 30 seconds.
///
/// Optional brief fields add a line each; absent or blank fields add nothing.
pub fn build_script_prompt(brief: &CampaignBrief) -> String {
    let mut prompt = String::from(
        "You are a world-class creative director at an independent agency known for \
         award-winning, human-first advertising.\n\nCAMPAIGN BRIEF:\n",
    );

    let _ = writeln!(prompt, "- Product: {}", brief.product_name);
    let _ = writeln!(prompt, "- Target Audience: {}", brief.audience);
    if let Some(purchaser) = present(&brief.real_purchaser) {
        let _ = writeln!(
            prompt,
            "  REAL PURCHASER: {purchaser}. Write for them, not only for the user."
        );
    }
    let _ = writeln!(prompt, "- Mood/Vibe: {}", brief.mood);
    let _ = writeln!(prompt, "- Platform: {}", brief.platform);
    if let Some(core) = present(&brief.emotional_core) {
        let _ = writeln!(prompt, "EMOTIONAL CORE: viewers should feel {core}.");
    }
    if let Some(truth) = present(&brief.human_truth) {
        let _ = writeln!(prompt, "HUMAN TRUTH: build on \"{truth}\".");
    }
    if let Some(pain) = present(&brief.pain_point) {
        let _ = writeln!(prompt, "PAIN POINT: speak to \"{pain}\".");
    }

    prompt.push_str(
        "\nCREATIVE DIRECTION:\n\
         1. Sell the human story, not the feature list.\n\
         2. Hook within three seconds. Lead with emotion, not explanation.\n\
         3. Follow an arc: hook, conflict, resolution with the product, call to action.\n\
         4. Keep moments authentic. Hint rather than tell.\n\
         5. Make bold choices worth an award.\n\
         \n\
         FORMAT (4 scenes, 30 seconds total):\n\
         Scene 1 (3-5s): [HOOK] Visual + Audio\n\
         Scene 2 (8-10s): [CONFLICT] Visual + Audio\n\
         Scene 3 (10-12s): [RESOLUTION] Visual + Audio\n\
         Scene 4 (5-7s): [CTA] Visual + Audio\n",
    );
    prompt
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

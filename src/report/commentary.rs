//! Fixed report text.
//!
//! The narrative and the quoted test results are reproduced as written; none
//! of it is derived from the loaded rows.

use crate::domain::CampaignId;
use crate::stats::{GenderCtrTests, PUBLISHED};

pub const TITLE: &str = "📊 Facebook A/B Testing Results by Gender";

pub const INTRO: &str = "This dashboard analyzes performance data from a Facebook advertising A/B test campaign.
We compare metrics across **gender segments** to understand behavior and trends.";

/// Heading above the pairwise grid, naming the campaigns it plots.
pub fn pairwise_subheader(campaigns: &[CampaignId]) -> String {
    let ids: Vec<&str> = campaigns.iter().map(CampaignId::as_str).collect();
    format!("🔍 Metric Relationships by Campaign (Campaign IDs: {})", ids.join(", "))
}

pub const KEY_METRICS_SUBHEADER: &str = "🔢 Key Metrics by Gender";

pub const STACKED_NOTES: &str = "1. Males (M) accounted for majority of ad spending across all campaigns.
2. Campaign 1178 has the highest spent with alot allocated to M.
3. Female spending remains low across all campaigns.
4. Females show lower engagement in clicks and conversion rates but still remain stable across campaigns.
Futher investigation on why males show significantly higher engagement and coversion rate should be explored.";

pub const AB_SUBHEADER: &str = "A/B testing between genders";

pub const CTR_BOX_SUBHEADER: &str = "📈 CTR Distribution by Gender";

pub const CONVERSION_BOX_SUBHEADER: &str = "🎯 Conversion Rate by Gender";

pub const HYPOTHESES: &str = "**Hypotheses:**

- **H₀ (Null Hypothesis):** There is no difference in the distribution of Click-Through Rates (CTR) between male and female users.
- **H₁ (Alternative Hypothesis):** There is a difference in the distribution of CTR between male and female users.";

pub const NORMALITY_VERDICT: &str = "Failed Normalcy Test, therefore use **ManUWitney** as test statistic.";

pub const SUMMARY_SUBHEADER: &str = "📊 Campaign Summary by Gender";

pub const CONCLUSION: &str = "✅ Since the p-value is significantly less than 0.05, we **reject the null hypothesis**.
📊 **Conclusion:** There is a **statistically significant difference** in CTR between male and female users.";

pub const CTR_ANALYSIS: &str = "#### CTR Analysis by Gender

1. Females(F) have significantly higher CTR than Males (M), suggesting that they egage more with ad content compared with Males.
2. Despite higher ad spend and clicks from male audiences in previous graphs, they convert less effectively in terms of CTR.
3. Female users may be more receptive to the campaign messaging, leading to higher engagement despite lower total ad spend.
4. Campaign optimizations should focus on improving male engagement, as they represent a **costly but inefficient audience**.
5. Increased spending on Female user ad campaigns could tap into the higher Female CTR market.  ";

pub fn shapiro_male_line() -> String {
    format!("Shapiro-Wilk Test for Male CTR: p-value = **{:e}**", PUBLISHED.shapiro_male_ctr_p)
}

pub fn shapiro_female_line() -> String {
    format!("Shapiro-Wilk Test for Female CTR: p-value = **{:e}**", PUBLISHED.shapiro_female_ctr_p)
}

pub fn mann_whitney_lines() -> String {
    format!(
        "Mann-Whitney U Test Results: U-statistic = **{}**, p-value = **{}**\nThe CTR difference between male and female is **statistically significant**",
        PUBLISHED.mann_whitney_u, PUBLISHED.mann_whitney_p_text
    )
}

/// Markdown for test results recomputed from the loaded rows.
pub fn recomputed_block(tests: &GenderCtrTests) -> String {
    let sw_m = &tests.shapiro_male;
    let sw_f = &tests.shapiro_female;
    let mw = &tests.mann_whitney;
    format!(
        "#### Recomputed from loaded rows\n\n\
         - Shapiro-Wilk, Male CTR (n={}): W = {:.4}, p-value = {:e}\n\
         - Shapiro-Wilk, Female CTR (n={}): W = {:.4}, p-value = {:e}\n\
         - Mann-Whitney U (M n={}, F n={}): U-statistic = {}, p-value = {:e}",
        sw_m.n, sw_m.w, sw_m.p_value, sw_f.n, sw_f.w, sw_f.p_value, mw.n_x, mw.n_y, mw.u, mw.p_value
    )
}

use super::{escape, fill, page, status};
use crate::models::{AnalysisResult, PlanDay};
use crate::plan::{is_reflection, render_plan};

#[derive(Debug, Clone, Default)]
pub struct StatsView {
    pub analysis: Option<AnalysisResult>,
    pub plan: Option<Vec<PlanDay>>,
    pub error: Option<String>,
}

impl StatsView {
    fn has_results(&self) -> bool {
        self.analysis
            .as_ref()
            .is_some_and(AnalysisResult::has_results)
    }
}

pub fn render_stats(view: &StatsView) -> String {
    // The intro disappears once the user has asked for an analysis.
    let intro = if view.analysis.is_none() && view.error.is_none() {
        INTRO_HTML
    } else {
        ""
    };

    let body = fill(
        STATS_HTML,
        &[
            ("INTRO", intro),
            ("ERROR", status(view.error.as_deref(), "error").as_str()),
            ("RESULTS", render_results(view).as_str()),
            ("PLAN", render_plan_section(view).as_str()),
        ],
    );
    page("Statistics", Some("/statistics"), &body)
}

fn render_results(view: &StatsView) -> String {
    let Some(analysis) = view.analysis.as_ref().filter(|_| view.has_results()) else {
        return String::new();
    };

    let mut html = String::from(r#"<section class="card" aria-live="polite">"#);
    if let Some(average) = analysis.average {
        html.push_str(&format!(
            r#"<div>Average mood rate: <strong id="average">{average:.2}</strong></div>"#
        ));
    }
    if !analysis.summary.is_empty() {
        html.push_str(&format!(
            r#"<div class="card soft" id="summary">{}</div>"#,
            escape(&analysis.summary)
        ));
    }
    if !analysis.suggestions.is_empty() {
        let items = analysis
            .suggestions
            .iter()
            .map(|suggestion| format!("<li>{}</li>", escape(suggestion)))
            .collect::<Vec<_>>()
            .join("");
        html.push_str(&format!(
            r#"<div><h3>Suggestions</h3><ul id="suggestions">{items}</ul></div>"#
        ));
    }

    // The plan button only exists once there is an analysis to show. The
    // analysis rides along so the page can show it again next to the plan.
    let carried = serde_json::to_string(analysis).unwrap_or_default();
    html.push_str(&fill(
        PLAN_BUTTON_HTML,
        &[("ANALYSIS", escape(&carried).as_str())],
    ));
    html.push_str("</section>");
    html
}

fn render_plan_section(view: &StatsView) -> String {
    let Some(plan) = view.plan.as_ref().filter(|plan| !plan.is_empty()) else {
        return String::new();
    };

    let days = plan
        .iter()
        .map(|day| {
            let items = day
                .items
                .iter()
                .enumerate()
                .map(|(index, line)| {
                    let class = if is_reflection(day, index) {
                        r#" class="reflection""#
                    } else {
                        ""
                    };
                    format!("<li{class}>{}</li>", escape(line))
                })
                .collect::<Vec<_>>()
                .join("");
            format!(
                r#"<div class="mood plan-day"><strong>Day {}</strong><ul>{items}</ul></div>"#,
                day.day
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    fill(
        PLAN_HTML,
        &[
            ("DAYS", days.as_str()),
            ("PLAN_TEXT", escape(&render_plan(plan)).as_str()),
        ],
    )
}

const INTRO_HTML: &str = r#"<p class="subtitle">Analyze the moods you've recorded over time. Our AI will summarize your patterns and share caring, practical suggestions to help you improve or maintain your well-being. After the analysis, you can generate a personalized 7-day plan for happier, healthier days.</p>"#;

const STATS_HTML: &str = r#"<section class="center">
      <h1>Statistics</h1>
      {{INTRO}}
      <form method="post" action="/statistics/analyze" style="margin-top:16px">
        <button type="submit" aria-label="Analyze my moods">Analyze my moods</button>
      </form>
    </section>
    {{ERROR}}
    {{RESULTS}}
    {{PLAN}}"#;

const PLAN_BUTTON_HTML: &str = r#"<form method="post" action="/statistics/plan">
        <input type="hidden" name="analysis" value="{{ANALYSIS}}" />
        <button type="submit" aria-label="Create 7-day plan">Create 7-Day Plan</button>
      </form>"#;

const PLAN_HTML: &str = r#"<section class="card" id="plan-section">
      <h2>Your 7-Day Plan</h2>
      {{DAYS}}
      <form method="post" action="/statistics/plan/download" class="card" style="border:none;padding:0">
        <label for="plan-text">Plan as text</label>
        <textarea id="plan-text" name="plan" rows="8" readonly>{{PLAN_TEXT}}</textarea>
        <div class="row">
          <button class="secondary" type="button" onclick="navigator.clipboard.writeText(document.getElementById('plan-text').value).then(() => alert('Plan copied to clipboard!'), () => alert('Could not copy. Try “Download .txt”.'))">Copy plan</button>
          <button class="secondary" type="submit">Download .txt</button>
        </div>
      </form>
    </section>"#;

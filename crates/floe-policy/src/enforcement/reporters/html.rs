//! HTML reporter: self-contained HTML report with inline CSS.
//!
//! Produces a single HTML file with no external resources: a summary table
//! by severity and rule, then violations grouped by model.

use std::fmt::Write as _;

use floe_core::constants::VERSION;
use floe_core::errors::ReportError;

use super::{escape_html, Reporter};
use crate::enforcement::result::EnforcementResult;
use crate::enforcement::violation::{rule_title, Severity, Violation};

/// Self-contained HTML reporter.
pub struct HtmlReporter {
    pub title: String,
}

impl HtmlReporter {
    pub fn new() -> Self {
        Self {
            title: "Floe Policy Enforcement Report".to_string(),
        }
    }

    fn severity_class(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "severity-error",
            Severity::Warning => "severity-warning",
        }
    }

    fn write_summary(html: &mut String, result: &EnforcementResult) {
        let s = &result.summary;
        let overall_class = if result.passed { "summary-pass" } else { "summary-fail" };
        let _ = writeln!(html, "<div class=\"summary {overall_class}\">");
        let _ = writeln!(
            html,
            "<span class=\"summary-result\">{}</span>",
            if result.passed { "PASSED" } else { "FAILED" }
        );
        let _ = writeln!(
            html,
            "<span class=\"summary-detail\">level {} &middot; {} models &middot; {} violations &middot; {} overrides applied</span>",
            result.enforcement_level, s.total_models, s.total_violations, s.overrides_applied
        );
        html.push_str("</div>\n");

        html.push_str("<div class=\"panel\">\n<h2>By severity</h2>\n");
        html.push_str("<table class=\"counts\">\n<thead><tr><th>Severity</th><th>Count</th></tr></thead>\n<tbody>\n");
        let _ = writeln!(
            html,
            "<tr class=\"severity-error\"><td><span class=\"badge\">error</span></td><td>{}</td></tr>",
            s.error_count
        );
        let _ = writeln!(
            html,
            "<tr class=\"severity-warning\"><td><span class=\"badge\">warning</span></td><td>{}</td></tr>",
            s.warning_count
        );
        html.push_str("</tbody>\n</table>\n");

        if !s.violations_by_rule.is_empty() {
            html.push_str("<h2>By rule</h2>\n");
            html.push_str("<table class=\"counts\">\n<thead><tr><th>Rule</th><th>Description</th><th>Count</th></tr></thead>\n<tbody>\n");
            for (rule_id, count) in &s.violations_by_rule {
                let _ = writeln!(
                    html,
                    "<tr><td class=\"rule\">{}</td><td>{}</td><td>{count}</td></tr>",
                    escape_html(rule_id),
                    escape_html(rule_title(rule_id))
                );
            }
            html.push_str("</tbody>\n</table>\n");
        }
        html.push_str("</div>\n");
    }

    fn write_violation(html: &mut String, violation: &Violation) {
        let sev_cls = Self::severity_class(violation.severity);
        let _ = writeln!(html, "<tr class=\"{sev_cls}\">");

        let override_badge = match &violation.override_applied {
            Some(pattern) => format!(
                " <span class=\"badge badge-override\" title=\"{}\">OVERRIDE</span>",
                escape_html(pattern)
            ),
            None => String::new(),
        };
        let _ = writeln!(
            html,
            "<td><span class=\"badge\">{}</span>{override_badge}</td>",
            violation.severity
        );
        let _ = writeln!(
            html,
            "<td class=\"rule\"><a href=\"{}\">{}</a></td>",
            escape_html(&violation.documentation_url),
            escape_html(&violation.rule_id)
        );
        let _ = writeln!(
            html,
            "<td class=\"location\">{}</td>",
            escape_html(violation.column.as_deref().unwrap_or("-"))
        );

        let mut msg = escape_html(&violation.message);
        let _ = write!(
            msg,
            "<br><span class=\"suggestion\">Fix: {}</span>",
            escape_html(&violation.suggestion)
        );
        if let Some(impact) = violation.downstream_impact.as_ref().filter(|i| !i.is_empty()) {
            let names: Vec<String> = impact.iter().map(|m| escape_html(m)).collect();
            let _ = write!(
                msg,
                "<br><span class=\"impact\">Downstream impact ({}): {}</span>",
                impact.len(),
                names.join(", ")
            );
        }
        let _ = writeln!(html, "<td>{msg}</td>");
        html.push_str("</tr>\n");
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for HtmlReporter {
    fn name(&self) -> &'static str {
        "html"
    }

    fn generate(&self, result: &EnforcementResult) -> Result<String, ReportError> {
        let mut html = String::with_capacity(8192);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
        let _ = writeln!(html, "<title>{}</title>", escape_html(&self.title));
        html.push_str("<style>\n");
        html.push_str(INLINE_CSS);
        html.push_str("</style>\n</head>\n<body>\n");

        html.push_str("<div class=\"container\">\n");
        let _ = writeln!(html, "<h1>{}</h1>", escape_html(&self.title));

        Self::write_summary(&mut html, result);

        if !result.policy_warnings.is_empty() {
            html.push_str("<div class=\"warnings\">\n");
            for warning in &result.policy_warnings {
                let _ = writeln!(
                    html,
                    "<p class=\"warning-item\">&#x26A0; {}</p>",
                    escape_html(warning)
                );
            }
            html.push_str("</div>\n");
        }

        if result.violations_by_model.is_empty() {
            html.push_str("<p class=\"no-violations\">No violations</p>\n");
        }

        for (model_id, violations) in &result.violations_by_model {
            let has_error = violations.iter().any(Violation::is_error);
            let model_cls = if has_error { "model model-error" } else { "model model-warning" };
            let model_name = violations.first().map_or(model_id.as_str(), |v| v.model_name.as_str());
            let _ = writeln!(html, "<div class=\"{model_cls}\">");
            let _ = writeln!(
                html,
                "<h2>{} <span class=\"model-id\">{}</span></h2>",
                escape_html(model_name),
                escape_html(model_id)
            );
            html.push_str("<table class=\"violations\">\n");
            html.push_str("<thead><tr><th>Severity</th><th>Rule</th><th>Column</th><th>Message</th></tr></thead>\n");
            html.push_str("<tbody>\n");
            for violation in violations {
                Self::write_violation(&mut html, violation);
            }
            html.push_str("</tbody>\n</table>\n</div>\n");
        }

        let _ = writeln!(html, "<footer>Generated by Floe v{VERSION}</footer>");
        html.push_str("</div>\n</body>\n</html>\n");
        Ok(html)
    }
}

const INLINE_CSS: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f5f5f5; color: #333; line-height: 1.6; }
.container { max-width: 1200px; margin: 0 auto; padding: 20px; }
h1 { margin-bottom: 16px; font-size: 24px; }
h2 { font-size: 18px; margin-bottom: 8px; }
.summary { padding: 16px; border-radius: 8px; margin-bottom: 24px; display: flex; align-items: center; gap: 16px; }
.summary-pass { background: #d4edda; border: 1px solid #c3e6cb; }
.summary-fail { background: #f8d7da; border: 1px solid #f5c6cb; }
.summary-result { font-size: 20px; font-weight: 700; }
.summary-detail { font-size: 14px; color: #555; }
.panel, .model { background: #fff; border-radius: 8px; padding: 16px; margin-bottom: 16px; border: 1px solid #ddd; }
.model-error { border-left: 4px solid #dc3545; }
.model-warning { border-left: 4px solid #ffc107; }
.model-id { font-size: 13px; color: #666; font-weight: 400; font-family: 'SF Mono', Monaco, Consolas, monospace; }
.no-violations { color: #28a745; font-style: italic; }
.counts { border-collapse: collapse; font-size: 13px; margin-bottom: 12px; }
.counts th, .counts td { text-align: left; padding: 4px 12px; border-bottom: 1px solid #eee; }
.violations { width: 100%; border-collapse: collapse; font-size: 13px; }
.violations th { text-align: left; padding: 8px; background: #f8f9fa; border-bottom: 2px solid #dee2e6; }
.violations td { padding: 8px; border-bottom: 1px solid #eee; vertical-align: top; }
.badge { padding: 2px 8px; border-radius: 4px; font-size: 11px; font-weight: 600; text-transform: uppercase; }
.severity-error .badge { background: #f8d7da; color: #721c24; }
.severity-warning .badge { background: #fff3cd; color: #856404; }
.badge-override { background: #e2e3e5; color: #383d41; margin-left: 4px; }
.location { font-family: 'SF Mono', Monaco, Consolas, monospace; font-size: 12px; white-space: nowrap; }
.rule { font-family: 'SF Mono', Monaco, Consolas, monospace; font-size: 12px; color: #6f42c1; }
.suggestion { color: #28a745; font-size: 12px; }
.impact { color: #6c757d; font-size: 12px; }
.warnings { margin-bottom: 16px; }
.warning-item { color: #856404; font-size: 13px; padding: 4px 0; }
footer { text-align: center; color: #999; font-size: 12px; margin-top: 32px; padding: 16px 0; }
"#;

//! Chat webhook payloads (Discord embed format)

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::summary::RunSummary;

/// Red, used when at least one test failed.
pub const COLOR_ALERT: u32 = 15_158_332;
/// Green, used when nothing failed.
pub const COLOR_SUCCESS: u32 = 3_066_993;
/// Blue, used for the run-started message.
pub const COLOR_INFO: u32 = 3_447_003;

/// How many failed tests are listed before the rest is summarised.
pub const MAX_LISTED_FAILURES: usize = 5;

const SHORT_COMMIT_LEN: usize = 7;
const LOCAL_REPORT_PATH: &str = "playwright-report/index.html";
const FOOTER_TEXT: &str = "🤖 loginsuite · Playwright";
const AUTHOR_NAME: &str = "Playwright Test Runner";
const ICON_URL: &str = "https://playwright.dev/img/playwright-logo.svg";

/// Body of one webhook POST. Always carries exactly one embed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    /// RFC 3339, UTC.
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl EmbedField {
    fn new(name: &str, value: String, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value,
            inline,
        }
    }
}

impl WebhookMessage {
    /// Message sent before the suite starts.
    pub fn run_started(branch: &str, commit: &str, now: DateTime<Local>) -> Self {
        let info = format!(
            "**Branch:** {}\n**Commit:** `{}`\n**Started:** {}",
            branch,
            short_commit(commit),
            now.format("%Y-%m-%d %H:%M:%S %:z")
        );

        Self::single(Embed {
            title: "🚀 Starting Playwright tests".to_string(),
            description: "⏳ **Test run started...**".to_string(),
            color: COLOR_INFO,
            fields: vec![EmbedField::new("📋 Run", info, false)],
            timestamp: utc_timestamp(now),
            footer: Some(EmbedFooter {
                text: FOOTER_TEXT.to_string(),
                icon_url: None,
            }),
            author: None,
        })
    }

    /// Message describing a finished run.
    ///
    /// Color and status text depend only on whether anything failed.
    pub fn run_finished(
        summary: &RunSummary,
        repository_url: Option<&str>,
        now: DateTime<Local>,
    ) -> Self {
        let failed = !summary.is_success();
        let (color, status, headline) = if failed {
            (COLOR_ALERT, "❌ FAILED", "🚨 **Run failed!**")
        } else {
            (COLOR_SUCCESS, "✅ PASSED", "🎉 **Run completed successfully!**")
        };

        let mut fields = vec![
            EmbedField::new(
                "📊 Summary",
                format!(
                    "**Total:** {}\n**✅ Passed:** {}\n**❌ Failed:** {}\n**⏭️ Skipped:** {}",
                    summary.total, summary.passed, summary.failed, summary.skipped
                ),
                true,
            ),
            EmbedField::new(
                "⏱️ Run",
                format!(
                    "**Duration:** {}\n**Branch:** {}\n**Commit:** `{}`",
                    summary.duration,
                    summary.branch,
                    short_commit(&summary.commit)
                ),
                true,
            ),
            EmbedField::new(
                "🔗 Links",
                links(summary.report_url.as_deref(), repository_url),
                false,
            ),
        ];

        if failed && !summary.failed_tests.is_empty() {
            fields.push(EmbedField::new(
                "💥 Failed tests",
                failed_test_list(&summary.failed_tests),
                false,
            ));
        }

        Self::single(Embed {
            title: format!("🧪 Playwright tests {}", status),
            description: headline.to_string(),
            color,
            fields,
            timestamp: utc_timestamp(now),
            footer: Some(EmbedFooter {
                text: FOOTER_TEXT.to_string(),
                icon_url: Some(ICON_URL.to_string()),
            }),
            author: Some(EmbedAuthor {
                name: AUTHOR_NAME.to_string(),
                icon_url: Some(ICON_URL.to_string()),
            }),
        })
    }

    fn single(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
        }
    }
}

/// First seven characters of a commit hash.
pub fn short_commit(commit: &str) -> String {
    commit.chars().take(SHORT_COMMIT_LEN).collect()
}

fn utc_timestamp(now: DateTime<Local>) -> String {
    now.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn links(report_url: Option<&str>, repository_url: Option<&str>) -> String {
    let mut lines = Vec::new();
    if let Some(url) = report_url {
        lines.push(format!("[📋 View report]({})", url));
    }
    if let Some(url) = repository_url {
        lines.push(format!("[📂 Repository]({})", url));
    }
    if lines.is_empty() {
        lines.push(format!("📋 HTML report: `{}`", LOCAL_REPORT_PATH));
    }
    lines.join("\n")
}

fn failed_test_list(failed_tests: &[String]) -> String {
    let mut value = failed_tests
        .iter()
        .take(MAX_LISTED_FAILURES)
        .map(|t| format!("• {}", t))
        .collect::<Vec<_>>()
        .join("\n");

    if failed_tests.len() > MAX_LISTED_FAILURES {
        value.push_str(&format!(
            "\n... and {} more",
            failed_tests.len() - MAX_LISTED_FAILURES
        ));
    }
    value
}

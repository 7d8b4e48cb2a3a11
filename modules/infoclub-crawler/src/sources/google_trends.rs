// Google Trends via the widget API behind trends.google.com.
//
// Every query is two requests: `explore` hands out one token per widget
// (TIMESERIES, RELATED_QUERIES, ...), then `widgetdata/<kind>` returns the
// data for that token. All responses carry an anti-XSSI `)]}'` prefix.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::traits::TrendsSource;

const TRENDS_URL: &str = "https://trends.google.com";
const HOST_LANGUAGE: &str = "ko";
/// Minutes offset of KST from UTC, as the API expects it.
const TIMEZONE_OFFSET: &str = "540";
const TIMEFRAME: &str = "now 7-d";
/// The API compares at most five keywords per request.
pub const MAX_KEYWORDS: usize = 5;
/// Related queries kept per keyword.
pub const MAX_RELATED: usize = 10;

const TIMESERIES_WIDGET: &str = "TIMESERIES";
const RELATED_QUERIES_WIDGET: &str = "RELATED_QUERIES";

// ---------------------------------------------------------------------------
// Interest statistics
// ---------------------------------------------------------------------------

/// Interest-over-time samples (0..=100) per keyword.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterestTimeline {
    series: Vec<(String, Vec<u32>)>,
}

impl InterestTimeline {
    pub fn new(series: Vec<(String, Vec<u32>)>) -> Self {
        Self { series }
    }

    pub fn values(&self, keyword: &str) -> Option<&[u32]> {
        self.series
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, v)| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|(_, v)| v.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Surging,
    Rising,
    Falling,
    Flat,
}

impl TrendDirection {
    /// Compare the latest sample against the truncated average.
    pub fn classify(latest: u32, average: u32) -> Self {
        let (latest, average) = (latest as f64, average as f64);
        if latest > average * 1.3 {
            TrendDirection::Surging
        } else if latest > average {
            TrendDirection::Rising
        } else if latest < average * 0.7 {
            TrendDirection::Falling
        } else {
            TrendDirection::Flat
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrendDirection::Surging => "📈 급상승",
            TrendDirection::Rising => "↗️ 상승",
            TrendDirection::Falling => "📉 하락",
            TrendDirection::Flat => "→ 보합",
        }
    }
}

/// Summary statistics of one keyword's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordInterest {
    pub average: u32,
    pub max: u32,
    pub latest: u32,
}

impl KeywordInterest {
    /// `None` when the keyword has no samples.
    pub fn from_samples(samples: &[u32]) -> Option<Self> {
        let latest = *samples.last()?;
        let sum: u64 = samples.iter().map(|&v| v as u64).sum();
        Some(Self {
            average: (sum / samples.len() as u64) as u32,
            max: samples.iter().copied().max().unwrap_or(0),
            latest,
        })
    }

    pub fn direction(&self) -> TrendDirection {
        TrendDirection::classify(self.latest, self.average)
    }

    /// Text stored in `traffic_volume`, e.g. `↗️ 상승 (현재:55, 평균:48, 최고:100)`.
    pub fn traffic_label(&self) -> String {
        format!(
            "{} (현재:{}, 평균:{}, 최고:{})",
            self.direction().label(),
            self.latest,
            self.average,
            self.max
        )
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Widget {
    pub id: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub request: serde_json::Value,
}

impl Widget {
    /// Keyword a per-keyword widget (RELATED_QUERIES_0, ...) is scoped to.
    fn restricted_keyword(&self) -> Option<String> {
        self.request
            .pointer("/restriction/complexKeywordsRestriction/keyword/0/value")
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
struct TimelineResponse {
    default: TimelineData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineData {
    #[serde(default)]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Deserialize)]
struct TimelinePoint {
    #[serde(default)]
    value: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct RelatedResponse {
    default: RankedData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankedData {
    #[serde(default)]
    ranked_list: Vec<RankedList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankedList {
    #[serde(default)]
    ranked_keyword: Vec<RankedKeyword>,
}

#[derive(Debug, Deserialize)]
struct RankedKeyword {
    query: String,
}

/// Drop the `)]}'` guard (and the trailing comma some endpoints add).
pub fn strip_xssi(body: &str) -> &str {
    body.trim_start()
        .strip_prefix(")]}'")
        .unwrap_or(body)
        .trim_start_matches(',')
        .trim_start()
}

pub fn parse_explore(body: &str) -> Result<Vec<Widget>> {
    let response: ExploreResponse =
        serde_json::from_str(strip_xssi(body)).context("Failed to parse trends explore response")?;
    Ok(response.widgets)
}

/// Each timeline point holds one value per compared keyword, in request order.
pub fn parse_timeline(body: &str, keywords: &[&str]) -> Result<InterestTimeline> {
    let response: TimelineResponse =
        serde_json::from_str(strip_xssi(body)).context("Failed to parse trends timeline")?;

    let series = keywords
        .iter()
        .enumerate()
        .map(|(i, keyword)| {
            let samples = response
                .default
                .timeline_data
                .iter()
                .filter_map(|point| point.value.get(i).copied())
                .collect();
            (keyword.to_string(), samples)
        })
        .collect();

    Ok(InterestTimeline::new(series))
}

/// First ranked list is "top", second is "rising". Only "top" is used.
pub fn parse_top_queries(body: &str) -> Result<Vec<String>> {
    let response: RelatedResponse =
        serde_json::from_str(strip_xssi(body)).context("Failed to parse related queries")?;

    Ok(response
        .default
        .ranked_list
        .into_iter()
        .next()
        .map(|top| {
            top.ranked_keyword
                .into_iter()
                .map(|k| k.query)
                .take(MAX_RELATED)
                .collect()
        })
        .unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct GoogleTrendsClient {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTrendsClient {
    pub fn new() -> Self {
        Self::with_base_url(TRENDS_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .cookie_store(true)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Google rejects widget calls without the session cookie set by the landing page.
    async fn warm_up(&self, geo: &str) {
        if let Err(e) = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[("geo", geo)])
            .send()
            .await
        {
            debug!(error = %e, "trends: cookie warm-up failed");
        }
    }

    async fn get_text(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&[("hl", HOST_LANGUAGE), ("tz", TIMEZONE_OFFSET)])
            .query(params)
            .send()
            .await
            .with_context(|| format!("Trends request to {path} failed"))?;

        let status = resp.status();
        let body = resp.text().await.context("Failed to read trends response")?;
        if !status.is_success() {
            let preview: String = body.chars().take(200).collect();
            bail!("Google Trends returned {status} for {path}: {preview}");
        }
        Ok(body)
    }

    async fn explore(&self, keywords: &[&str], geo: &str) -> Result<Vec<Widget>> {
        self.warm_up(geo).await;

        let items: Vec<_> = keywords
            .iter()
            .map(|k| json!({ "keyword": k, "time": TIMEFRAME, "geo": geo }))
            .collect();
        let req = json!({ "comparisonItem": items, "category": 0, "property": "" }).to_string();

        let body = self
            .get_text("/trends/api/explore", &[("req", req.as_str())])
            .await?;
        parse_explore(&body)
    }

    async fn widget_data(&self, kind: &str, widget: &Widget) -> Result<String> {
        let req = widget.request.to_string();
        self.get_text(
            &format!("/trends/api/widgetdata/{kind}"),
            &[("req", req.as_str()), ("token", widget.token.as_str())],
        )
        .await
    }
}

impl Default for GoogleTrendsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrendsSource for GoogleTrendsClient {
    async fn interest_over_time(&self, keywords: &[&str], geo: &str) -> Result<InterestTimeline> {
        let keywords = &keywords[..keywords.len().min(MAX_KEYWORDS)];
        let widgets = self.explore(keywords, geo).await?;
        let timeseries = widgets
            .iter()
            .find(|w| w.id == TIMESERIES_WIDGET)
            .ok_or_else(|| anyhow!("explore response has no {TIMESERIES_WIDGET} widget"))?;

        let body = self.widget_data("multiline", timeseries).await?;
        let timeline = parse_timeline(&body, keywords)?;
        info!(geo, keywords = keywords.len(), "trends: timeline fetched");
        Ok(timeline)
    }

    async fn related_queries(
        &self,
        keywords: &[&str],
        geo: &str,
    ) -> Result<Vec<(String, Vec<String>)>> {
        let keywords = &keywords[..keywords.len().min(MAX_KEYWORDS)];
        let widgets = self.explore(keywords, geo).await?;

        let mut related = Vec::new();
        let related_widgets = widgets
            .iter()
            .filter(|w| w.id.starts_with(RELATED_QUERIES_WIDGET));
        for (i, widget) in related_widgets.enumerate() {
            let keyword = widget
                .restricted_keyword()
                .or_else(|| keywords.get(i).map(|k| k.to_string()))
                .unwrap_or_default();
            let body = self.widget_data("relatedsearches", widget).await?;
            related.push((keyword, parse_top_queries(&body)?));
        }

        info!(geo, keywords = related.len(), "trends: related queries fetched");
        Ok(related)
    }
}

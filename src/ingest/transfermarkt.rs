use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE, DNT, HeaderMap, HeaderName, HeaderValue,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use super::RosterSource;
use crate::http_client::http_client;
use crate::player::{Player, Popularity, UNKNOWN};
use crate::store::DATE_FORMAT;

pub const LEAGUE_URL: &str = "https://www.transfermarkt.com/premier-league/startseite/wettbewerb/GB1";
const BASE_URL: &str = "https://www.transfermarkt.com";
const MAX_ATTEMPTS: u32 = 3;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:123.0) Gecko/20100101 Firefox/123.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.3 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
];

const APPEARANCE_TERMS: &[&str] = &["games", "appearances", "played", "apps", "matches"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopularityMode {
    Appearances,
    MarketValue,
}

impl PopularityMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "appearances" | "apps" => Some(PopularityMode::Appearances),
            "market_value" | "value" => Some(PopularityMode::MarketValue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub league_url: String,
    pub popularity: PopularityMode,
    /// Appearances-mode only: players below this are left out.
    pub min_appearances: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Added to both delay bounds per retry.
    pub retry_step: Duration,
    /// Rate-limited responses wait between 1x and 2x this, times the attempt.
    pub rate_limit_backoff: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            league_url: LEAGUE_URL.to_string(),
            popularity: PopularityMode::MarketValue,
            min_appearances: 5,
            min_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(15),
            retry_step: Duration::from_secs(5),
            rate_limit_backoff: Duration::from_secs(15),
        }
    }
}

pub struct TransfermarktScraper {
    config: ScrapeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLink {
    pub name: String,
    pub url: String,
}

impl TransfermarktScraper {
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }

    /// GET with randomized pacing and up to three attempts.
    /// Returns `None` once attempts run out or the body is not HTML.
    fn fetch_page(&self, client: &Client, url: &str) -> Option<String> {
        for attempt in 0..MAX_ATTEMPTS {
            let delay = self.request_delay(attempt);
            debug!(url, delay_secs = delay.as_secs_f64(), "waiting before request");
            thread::sleep(delay);

            let resp = match client.get(url).headers(browser_headers()).send() {
                Ok(resp) => resp,
                Err(err) => {
                    warn!(url, attempt, "request failed: {err}");
                    continue;
                }
            };

            let status = resp.status();
            if status.is_success() {
                let is_html = resp
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|v| v.contains("text/html"));
                if !is_html {
                    warn!(url, "received non-HTML response");
                    return None;
                }
                match resp.text() {
                    Ok(body) => return Some(body),
                    Err(err) => {
                        warn!(url, attempt, "failed reading body: {err}");
                        continue;
                    }
                }
            }

            if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE {
                let backoff = self.rate_limit_delay(attempt);
                warn!(
                    url,
                    %status,
                    backoff_secs = backoff.as_secs_f64(),
                    "rate limited, backing off"
                );
                thread::sleep(backoff);
            } else {
                warn!(url, %status, attempt, "unexpected status");
            }
        }

        warn!(url, "giving up after {MAX_ATTEMPTS} attempts");
        None
    }

    fn request_delay(&self, attempt: u32) -> Duration {
        let step = self.config.retry_step * attempt;
        random_between(self.config.min_delay + step, self.config.max_delay + step)
    }

    fn rate_limit_delay(&self, attempt: u32) -> Duration {
        let base = self.config.rate_limit_backoff * (attempt + 1);
        random_between(base, base * 2)
    }
}

impl RosterSource for TransfermarktScraper {
    fn name(&self) -> &str {
        "transfermarkt"
    }

    fn fetch_roster(&self, as_of: NaiveDate) -> Result<Vec<Player>> {
        let client = http_client()?;

        info!(url = %self.config.league_url, "fetching league page");
        let Some(league_html) = self.fetch_page(client, &self.config.league_url) else {
            warn!("league page unavailable, nothing scraped");
            return Ok(Vec::new());
        };

        let teams = parse_team_links(&league_html)?;
        info!(teams = teams.len(), "found teams");

        let mut players = Vec::new();
        for team in &teams {
            info!(team = %team.name, "fetching squad");
            let Some(html) = self.fetch_page(client, &team.url) else {
                continue;
            };
            match parse_squad(&html, &team.name, as_of, &self.config) {
                Ok(rows) => {
                    info!(team = %team.name, players = rows.len(), "parsed squad");
                    players.extend(rows);
                }
                Err(err) => warn!(team = %team.name, "failed to parse squad: {err}"),
            }
        }

        info!(players = players.len(), "scrape finished");
        Ok(players)
    }
}

/// Team links from the league table, first occurrence of each name only.
pub fn parse_team_links(html: &str) -> Result<Vec<TeamLink>> {
    let doc = Html::parse_document(html);
    let link_sel = selector("div#yw1 table.items tbody tr td.hauptlink a[href*='/verein/']")?;

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for link in doc.select(&link_sel) {
        let name = element_text(&link);
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name.clone()) {
            debug!(team = %name, "skipping duplicate team");
            continue;
        }
        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{BASE_URL}{href}")
        };
        out.push(TeamLink { name, url });
    }
    Ok(out)
}

/// Players from one squad page. Missing attributes fall back to 0 or
/// "Unknown"; rows without a name link are skipped.
pub fn parse_squad(
    html: &str,
    team: &str,
    as_of: NaiveDate,
    config: &ScrapeConfig,
) -> Result<Vec<Player>> {
    let doc = Html::parse_document(html);
    let row_sel = selector("table.items > tbody > tr:not(.table-header)")?;
    let header_sel = selector("table.items > thead > tr")?;
    let th_sel = selector("th")?;
    let name_sel = selector("td.hauptlink a")?;
    let inline_position_sel = selector("table.inline-table tr:nth-child(2) td")?;
    let flag_sel = selector("img.flaggenrahmen")?;
    let value_sel = selector("td.rechts.hauptlink")?;

    let header_titles: Vec<String> = doc
        .select(&header_sel)
        .next()
        .map(|header| {
            header
                .select(&th_sel)
                .map(|th| element_text(&th).to_lowercase())
                .collect()
        })
        .unwrap_or_default();
    let age_col = header_titles.iter().position(|title| title.contains("age"));

    let appearance_col = if config.popularity == PopularityMode::Appearances {
        let col = header_titles
            .iter()
            .position(|title| APPEARANCE_TERMS.iter().any(|term| title.contains(term)));
        if col.is_none() {
            warn!(team, "no appearances column in squad table");
        }
        col
    } else {
        None
    };

    let last_updated = as_of.format(DATE_FORMAT).to_string();
    let mut out = Vec::new();

    for row in doc.select(&row_sel) {
        let Some(name_link) = row.select(&name_sel).next() else {
            continue;
        };
        let name = element_text(&name_link);
        if name.is_empty() {
            continue;
        }

        let cells = direct_cells(&row);

        let position = row
            .select(&inline_position_sel)
            .next()
            .map(|cell| element_text(&cell))
            .or_else(|| cells.get(1).map(element_text))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let age = squad_age(&cells, age_col);

        let flag = row.select(&flag_sel).next();
        let nation = flag
            .and_then(|img| img.value().attr("title"))
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let nation_code = flag
            .and_then(|img| img.value().attr("src"))
            .map(flag_code)
            .unwrap_or_default();

        let popularity = match config.popularity {
            PopularityMode::Appearances => {
                let apps = appearance_col
                    .and_then(|idx| cells.get(idx))
                    .map(|cell| parse_appearances(&element_text(cell)))
                    .unwrap_or(0);
                if apps < config.min_appearances {
                    debug!(player = %name, apps, "skipped, not enough appearances");
                    continue;
                }
                Popularity::Appearances(apps)
            }
            PopularityMode::MarketValue => {
                let value = row
                    .select(&value_sel)
                    .next()
                    .map(|cell| parse_market_value(&element_text(&cell)))
                    .unwrap_or(0);
                Popularity::market_value(value)
            }
        };

        out.push(Player::new(
            name,
            nation,
            nation_code,
            team,
            position,
            age,
            popularity,
            last_updated.clone(),
        ));
    }

    Ok(out)
}

/// "23 (2)" and "23/4" keep the leading count; anything unreadable is 0.
pub fn parse_appearances(raw: &str) -> u32 {
    let text = raw.trim();
    let head = text
        .split(['(', '/'])
        .next()
        .map(str::trim)
        .unwrap_or_default();
    head.parse::<u32>().unwrap_or(0)
}

/// "€45.00m" → 45_000_000, "€800k" → 800_000, "-" → 0.
pub fn parse_market_value(raw: &str) -> u64 {
    let s = raw
        .trim()
        .trim_start_matches('€')
        .trim()
        .to_ascii_lowercase();
    let (number, scale) = if let Some(n) = s.strip_suffix("bn") {
        (n, 1_000_000_000.0)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 1_000_000.0)
    } else if let Some(n) = s.strip_suffix("th.") {
        (n, 1_000.0)
    } else if let Some(n) = s.strip_suffix('k') {
        (n, 1_000.0)
    } else {
        (s.as_str(), 1.0)
    };
    match number.trim().replace(',', "").parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => (v * scale).round() as u64,
        _ => 0,
    }
}

// Squad tables show "Jun 6, 2001 (23)" or a bare "23" under an age header.
// Without a header, the first centred cell is taken as the age.
fn squad_age(cells: &[ElementRef<'_>], age_col: Option<usize>) -> u32 {
    if let Some(cell) = age_col.and_then(|idx| cells.get(idx)) {
        let text = element_text(cell);
        return age_in_parens(&text)
            .or_else(|| text.parse::<u32>().ok())
            .unwrap_or(0);
    }
    cells
        .iter()
        .find(|cell| cell.value().classes().any(|c| c == "zentriert"))
        .map(element_text)
        .filter(|text| text.as_str() != "-")
        .and_then(|text| text.parse::<u32>().ok())
        .unwrap_or(0)
}

fn age_in_parens(text: &str) -> Option<u32> {
    let start = text.rfind('(')?;
    let end = text[start..].find(')')? + start;
    text[start + 1..end].trim().parse::<u32>().ok()
}

fn flag_code(src: &str) -> String {
    let file = src.rsplit('/').next().unwrap_or_default();
    let stem = file.split(['.', '?']).next().unwrap_or_default();
    stem.to_uppercase()
}

fn direct_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "td")
        .collect()
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector '{css}': {e}"))
}

fn browser_headers() -> HeaderMap {
    let mut rng = rand::thread_rng();
    let agent = USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0]);

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(agent));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("document"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("navigate"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("none"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-user"),
        HeaderValue::from_static("?1"),
    );
    headers
}

fn random_between(lo: Duration, hi: Duration) -> Duration {
    if hi <= lo {
        return lo;
    }
    let secs = rand::thread_rng().gen_range(lo.as_secs_f64()..hi.as_secs_f64());
    Duration::from_secs_f64(secs)
}

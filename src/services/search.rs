//! Relevance scoring and link resolution for the site search.
//!
//! Candidates come from the content layer already narrowed down by a
//! substring filter. Each one is scored on its first translation, linked to
//! its localized page, and ranked. Candidates that score nothing or cannot be
//! linked are dropped.

use crate::models::{Article, Destination, DestinationSummary, DestinationType};
use crate::services::content_service::ContentService;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

const NAME_CONTAINS: u32 = 10;
const SUMMARY_CONTAINS: u32 = 5;
const DESCRIPTION_CONTAINS: u32 = 2;
const NAME_EXACT: u32 = 15;
const NAME_PREFIX: u32 = 5;
const PARENT_NAME_EXACT: u32 = 10;
const PARENT_NAME_CONTAINS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult<T> {
    pub entity: T,
    pub score: u32,
    /// Localized site path of the entity
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub destinations: Vec<ScoredResult<Destination>>,
    pub articles: Vec<ScoredResult<Article>>,
    /// Set when a candidate fetch failed and results may be incomplete.
    pub degraded: bool,
}

/// Trims and lower-cases a raw query. Returns `None` for blank input.
#[must_use]
pub fn normalize_term(raw: &str) -> Option<String> {
    let term = raw.trim().to_lowercase();
    (!term.is_empty()).then_some(term)
}

fn lowered(value: Option<&String>) -> String {
    value.map(|v| v.to_lowercase()).unwrap_or_default()
}

/// Shared weight table for a name/title, SEO summary and description.
fn text_score(name: &str, summary: &str, description: &str, term: &str) -> u32 {
    let mut score = 0;

    if name.contains(term) {
        score += NAME_CONTAINS;
    }
    if summary.contains(term) {
        score += SUMMARY_CONTAINS;
    }
    if description.contains(term) {
        score += DESCRIPTION_CONTAINS;
    }

    if name == term {
        score += NAME_EXACT;
    } else if name.starts_with(term) {
        score += NAME_PREFIX;
    }

    score
}

/// Scores a destination against an already normalized `term`.
#[must_use]
pub fn score_destination(destination: &Destination, term: &str) -> u32 {
    let mut score = destination.primary_translation().map_or(0, |t| {
        text_score(
            &lowered(t.destination_name.as_ref()),
            &lowered(t.seo_summary.as_ref()),
            &lowered(t.description.as_ref()),
            term,
        )
    });

    let region = destination
        .region()
        .and_then(DestinationSummary::name)
        .map(str::to_lowercase);
    let province = destination
        .province()
        .and_then(DestinationSummary::name)
        .map(str::to_lowercase);

    if region.as_deref() == Some(term) {
        score += PARENT_NAME_EXACT;
    }
    if province.as_deref() == Some(term) {
        score += PARENT_NAME_EXACT;
    }
    if [&region, &province]
        .into_iter()
        .flatten()
        .any(|name| name.contains(term))
    {
        score += PARENT_NAME_CONTAINS;
    }

    score
}

/// Scores an article against an already normalized `term`.
#[must_use]
pub fn score_article(article: &Article, term: &str) -> u32 {
    article.primary_translation().map_or(0, |t| {
        text_score(
            &lowered(t.title.as_ref()),
            &lowered(t.seo_summary.as_ref()),
            &lowered(t.description.as_ref()),
            term,
        )
    })
}

/// Search link of a destination.
///
/// Municipalities link below their province without the region segment.
#[must_use]
pub fn destination_path(destination: &Destination, lang: &str) -> Option<String> {
    let slug = destination.slug()?;

    match destination.kind {
        DestinationType::Region => Some(format!("/{lang}/{slug}")),
        DestinationType::Province => {
            let region = destination.region().and_then(DestinationSummary::slug)?;
            Some(format!("/{lang}/{region}/{slug}"))
        }
        DestinationType::Municipality => {
            let province = destination.province().and_then(DestinationSummary::slug)?;
            Some(format!("/{lang}/{province}/{slug}"))
        }
    }
}

#[must_use]
pub fn article_path(article: &Article, lang: &str) -> Option<String> {
    article
        .slug()
        .map(|slug| format!("/{lang}/magazine/{slug}"))
}

/// Scores, links and orders candidates by descending score.
///
/// The sort is stable, so candidates with equal scores keep the order the
/// backend returned them in.
pub fn rank<T>(
    candidates: Vec<T>,
    score: impl Fn(&T) -> u32,
    link: impl Fn(&T) -> Option<String>,
) -> Vec<ScoredResult<T>> {
    let mut ranked: Vec<ScoredResult<T>> = candidates
        .into_iter()
        .filter_map(|entity| {
            let score = score(&entity);
            if score == 0 {
                return None;
            }
            let link = link(&entity)?;
            Some(ScoredResult {
                entity,
                score,
                link,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

#[must_use]
pub fn rank_destinations(
    candidates: Vec<Destination>,
    term: &str,
    lang: &str,
) -> Vec<ScoredResult<Destination>> {
    rank(
        candidates,
        |d| score_destination(d, term),
        |d| destination_path(d, lang),
    )
}

#[must_use]
pub fn rank_articles(
    candidates: Vec<Article>,
    term: &str,
    lang: &str,
) -> Vec<ScoredResult<Article>> {
    rank(
        candidates,
        |a| score_article(a, term),
        |a| article_path(a, lang),
    )
}

pub struct SearchService {
    content: Arc<dyn ContentService>,
    candidate_limit: usize,
}

impl SearchService {
    #[must_use]
    pub fn new(content: Arc<dyn ContentService>, candidate_limit: usize) -> Self {
        Self {
            content,
            candidate_limit,
        }
    }

    pub async fn search(&self, query: &str, lang: &str) -> SearchResults {
        let Some(term) = normalize_term(query) else {
            debug!("Ignoring blank search query");
            return SearchResults::default();
        };

        metrics::counter!("search_queries_total").increment(1);

        let (destinations, articles) = tokio::join!(
            self.content
                .search_destinations(&term, lang, self.candidate_limit),
            self.content.search_articles(&term, lang, self.candidate_limit)
        );

        let degraded = destinations.is_failed() || articles.is_failed();
        if degraded {
            warn!(term, lang, "Search ran against incomplete candidates");
        }

        let destinations = rank_destinations(destinations.into_vec(), &term, lang);
        let articles = rank_articles(articles.into_vec(), &term, lang);

        info!(
            term,
            lang,
            destinations = destinations.len(),
            articles = articles.len(),
            "Search completed"
        );

        SearchResults {
            query: term,
            destinations,
            articles,
            degraded,
        }
    }
}

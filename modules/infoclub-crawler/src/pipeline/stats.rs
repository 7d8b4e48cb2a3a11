/// Counters from one crawl cycle of a single source.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlStats {
    pub source: &'static str,
    /// Listings (subreddits, regions, keyword groups) that could not be fetched.
    pub fetch_failures: u32,
    pub items_fetched: u32,
    pub items_rejected: u32,
    pub items_stored: u32,
    pub store_failures: u32,
    pub insights_generated: u32,
}

impl CrawlStats {
    pub fn new(source: &'static str) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }
}

impl std::fmt::Display for CrawlStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== {} Crawl Complete ===", self.source)?;
        writeln!(f, "Items fetched:   {}", self.items_fetched)?;
        writeln!(f, "Items rejected:  {}", self.items_rejected)?;
        writeln!(f, "Items stored:    {}", self.items_stored)?;
        writeln!(f, "Store failures:  {}", self.store_failures)?;
        writeln!(f, "Fetch failures:  {}", self.fetch_failures)?;
        if self.insights_generated > 0 {
            writeln!(f, "AI insights:     {}", self.insights_generated)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_counters() {
        let stats = CrawlStats {
            items_fetched: 12,
            items_stored: 9,
            items_rejected: 3,
            ..CrawlStats::new("Reddit")
        };
        let text = stats.to_string();
        assert!(text.contains("=== Reddit Crawl Complete ==="));
        assert!(text.contains("Items stored:    9"));
        assert!(!text.contains("AI insights"));
    }
}

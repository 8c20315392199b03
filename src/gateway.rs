//! Client for the central bank's daily rates feed.

use std::time::Duration;

use chrono::{Local, NaiveDate};
use log::{debug, info};
use reqwest::Client;

use crate::error::FeedError;
use crate::exchange_rate::{OBSERVED_AT_FORMAT, RateSnapshot};
use crate::store::RateStore;
use crate::val_curs::ValCurs;

pub struct CbrClient {
    client: Client,
    feed_url: String,
    probe_url: String,
}

impl CbrClient {
    pub fn new(feed_url: &str, probe_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            feed_url: feed_url.to_string(),
            probe_url: probe_url.to_string(),
        })
    }

    /// HEAD request to a stable host. Any HTTP response counts as online.
    pub async fn is_online(&self) -> bool {
        let online = self.client.head(&self.probe_url).send().await.is_ok();
        debug!("connectivity probe {}: online={online}", self.probe_url);
        online
    }

    /// Fetches today's rates, appends them under one run timestamp and
    /// returns them with the domestic `RUB = 1.0` entry added.
    pub async fn fetch_current(&self, store: &RateStore) -> Result<RateSnapshot, FeedError> {
        let observed_at = Local::now().format(OBSERVED_AT_FORMAT).to_string();
        self.fetch_into(&self.feed_url, &observed_at, store).await
    }

    /// Fetches the rates the bank set for `date` and stores them at midnight of that date.
    pub async fn fetch_for_date(
        &self,
        date: NaiveDate,
        store: &RateStore,
    ) -> Result<RateSnapshot, FeedError> {
        let url = get_url(&self.feed_url, date);
        let observed_at = date
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.format(OBSERVED_AT_FORMAT).to_string())
            .unwrap_or_else(|| format!("{date} 00:00"));
        self.fetch_into(&url, &observed_at, store).await
    }

    async fn fetch_into(
        &self,
        url: &str,
        observed_at: &str,
        store: &RateStore,
    ) -> Result<RateSnapshot, FeedError> {
        let val_curs = self.get_val_curs(url).await?;
        let observations = val_curs.observations(observed_at)?;
        info!(
            "fetched {} rates (feed date {})",
            observations.len(),
            val_curs.date.as_deref().unwrap_or("unknown")
        );

        store.append_all(&observations).await?;

        let snapshot: RateSnapshot = observations.into_iter().collect();
        Ok(snapshot.with_domestic())
    }

    async fn get_val_curs(&self, url: &str) -> Result<ValCurs, FeedError> {
        let text = self.load_xml(url).await?;
        ValCurs::from_xml(&text)
    }

    async fn load_xml(&self, url: &str) -> Result<String, FeedError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::SourceUnreachable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(FeedError::SourceUnreachable(format!(
                "{url} answered {}",
                resp.status()
            )));
        }

        resp.text()
            .await
            .map_err(|e| FeedError::SourceUnreachable(e.to_string()))
    }
}

fn get_url(feed_url: &str, date: NaiveDate) -> String {
    format!("{feed_url}?date_req={}", date.format("%d/%m/%Y"))
}

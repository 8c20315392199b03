//! Resolves the session's rate snapshot at startup.

use anyhow::Result;
use chrono::{Days, Local, NaiveDate};
use log::{error, info, warn};

use crate::error::StoreError;
use crate::exchange_rate::RateSnapshot;
use crate::gateway::CbrClient;
use crate::store::RateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// Fetched from the feed during this run.
    Live,
    /// Read back from the store.
    Stored,
    /// Nothing available; only the domestic currency.
    Empty,
}

#[derive(Debug, Clone)]
pub struct LoadedRates {
    pub snapshot: RateSnapshot,
    pub source: RateSource,
}

/// Live rates when reachable, else the last stored snapshot, else `{RUB: 1.0}`.
/// Never fails: every feed or store error degrades to the next option.
pub async fn load_rates(client: &CbrClient, store: &RateStore, offline: bool) -> LoadedRates {
    if !offline && client.is_online().await {
        match client.fetch_current(store).await {
            Ok(snapshot) => {
                return LoadedRates {
                    snapshot,
                    source: RateSource::Live,
                };
            }
            Err(e) => warn!("live rates unavailable, using stored snapshot: {e}"),
        }
    }

    match store.latest_snapshot().await {
        Ok(snapshot) => {
            info!("using stored rates from {}", snapshot.label());
            LoadedRates {
                snapshot: snapshot.with_domestic(),
                source: RateSource::Stored,
            }
        }
        Err(e) => {
            match e {
                StoreError::NoData => warn!("no stored rates, only RUB is available"),
                e => error!("cannot read stored rates: {e}"),
            }
            LoadedRates {
                snapshot: RateSnapshot::domestic_only(),
                source: RateSource::Empty,
            }
        }
    }
}

/// Fetches and stores the rates of each day from today back `days` days.
/// Returns how many days were stored.
pub async fn backfill(client: &CbrClient, store: &RateStore, days: u64) -> Result<usize> {
    let end_date = Local::now().date_naive();
    let start_date = end_date
        .checked_sub_days(Days::new(days))
        .ok_or(anyhow::anyhow!("Can't get previous date for {}", end_date))?;

    iterate(client, store, start_date, end_date).await
}

async fn iterate(
    client: &CbrClient,
    store: &RateStore,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<usize> {
    if start_date > end_date {
        return Err(anyhow::anyhow!("Start date must be before end date"));
    }

    let mut current_date = end_date;
    let mut stored = 0;

    while current_date >= start_date {
        let snapshot = client.fetch_for_date(current_date, store).await?;
        info!("stored {} rates for {}", snapshot.len() - 1, current_date);
        stored += 1;

        current_date = current_date
            .pred_opt()
            .ok_or(anyhow::anyhow!("Can't get pred date for {}", current_date))?;
    }

    Ok(stored)
}

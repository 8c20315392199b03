use std::str::FromStr;

use log::debug;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::Serialize;

use crate::currency;
use crate::error::FeedError;
use crate::exchange_rate::RateObservation;

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Valute {
    #[serde(rename = "CharCode")]
    pub char_code: String,
    #[serde(rename = "Nominal")]
    pub nominal: String,
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ValCurs {
    #[serde(rename = "@Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Valute", default)]
    pub valute: Vec<Valute>,
}

impl ValCurs {
    pub fn from_xml(text: &str) -> Result<Self, FeedError> {
        quick_xml::de::from_str(text).map_err(|e| FeedError::MalformedFeed(e.to_string()))
    }

    /// Normalizes every entry to roubles per one unit, stamped with `observed_at`.
    pub fn observations(&self, observed_at: &str) -> Result<Vec<RateObservation>, FeedError> {
        if self.valute.is_empty() {
            return Err(FeedError::MalformedFeed("feed has no Valute entries".into()));
        }

        self.valute
            .iter()
            .map(|valute| {
                let code = valute.code()?;
                let rate = valute.rate()?;
                debug!("{code}: {rate}");
                Ok(RateObservation {
                    code,
                    rate,
                    observed_at: observed_at.to_string(),
                })
            })
            .collect()
    }
}

impl Valute {
    fn code(&self) -> Result<String, FeedError> {
        let code = self.char_code.trim();
        if !currency::is_valid_code(code) {
            return Err(FeedError::MalformedFeed(format!(
                "bad CharCode {:?}",
                self.char_code
            )));
        }
        Ok(code.to_string())
    }

    fn rate(&self) -> Result<f64, FeedError> {
        let nominal: u32 = self
            .nominal
            .trim()
            .parse()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                FeedError::MalformedFeed(format!(
                    "bad Nominal {:?} for {}",
                    self.nominal, self.char_code
                ))
            })?;

        let value = Decimal::from_str(&normalize_decimal_string(self.value.trim())).map_err(|e| {
            FeedError::MalformedFeed(format!("bad Value {:?} for {}: {e}", self.value, self.char_code))
        })?;

        (value / Decimal::from(nominal))
            .to_f64()
            .filter(|rate| *rate > 0.0)
            .ok_or_else(|| {
                FeedError::MalformedFeed(format!(
                    "non-positive rate {:?} for {}",
                    self.value, self.char_code
                ))
            })
    }
}

fn normalize_decimal_string(s: &str) -> String {
    s.replace(',', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="windows-1251"?>
<ValCurs Date="15.10.2026" name="Foreign Currency Market">
    <Valute ID="R01235">
        <NumCode>840</NumCode>
        <CharCode>USD</CharCode>
        <Nominal>1</Nominal>
        <Name>Доллар США</Name>
        <Value>81,5012</Value>
        <VunitRate>81,5012</VunitRate>
    </Valute>
    <Valute ID="R01820">
        <NumCode>392</NumCode>
        <CharCode>JPY</CharCode>
        <Nominal>100</Nominal>
        <Name>Японских иен</Name>
        <Value>53,7000</Value>
        <VunitRate>0,537</VunitRate>
    </Valute>
</ValCurs>"#;

    #[test]
    fn test_parse_feed() {
        let val_curs = ValCurs::from_xml(FEED).unwrap();

        assert_eq!(val_curs.date.as_deref(), Some("15.10.2026"));
        assert_eq!(val_curs.valute.len(), 2);
        assert_eq!(val_curs.valute[1].char_code, "JPY");
    }

    #[test]
    fn test_observations_divide_by_nominal() {
        let val_curs = ValCurs::from_xml(FEED).unwrap();

        let observations = val_curs.observations("2026-10-15 09:30").unwrap();

        assert_eq!(observations[0].code, "USD");
        assert!((observations[0].rate - 81.5012).abs() < 1e-9);
        assert!((observations[1].rate - 0.537).abs() < 1e-9);
        assert!(observations.iter().all(|o| o.observed_at == "2026-10-15 09:30"));
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let xml = "<ValCurs><Valute><CharCode>USD</CharCode><Value>81,5</Value></Valute></ValCurs>";

        let result = ValCurs::from_xml(xml);

        assert!(matches!(result, Err(FeedError::MalformedFeed(_))));
    }

    #[test]
    fn test_bad_entries_are_malformed() {
        for (code, nominal, value) in [
            ("US", "1", "81,5"),
            ("USD", "0", "81,5"),
            ("USD", "ten", "81,5"),
            ("USD", "1", "abc"),
            ("USD", "1", "0,0"),
        ] {
            let val_curs = ValCurs {
                date: None,
                valute: vec![Valute {
                    char_code: code.to_string(),
                    nominal: nominal.to_string(),
                    value: value.to_string(),
                }],
            };
            assert!(
                matches!(
                    val_curs.observations("2026-10-15 09:30"),
                    Err(FeedError::MalformedFeed(_))
                ),
                "{code} {nominal} {value}"
            );
        }
    }

    #[test]
    fn test_empty_feed_is_malformed() {
        let val_curs = ValCurs::from_xml(r#"<ValCurs Date="15.10.2026"></ValCurs>"#).unwrap();

        assert!(matches!(
            val_curs.observations("2026-10-15 09:30"),
            Err(FeedError::MalformedFeed(_))
        ));
    }
}

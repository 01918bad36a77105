// tests/integration_tests.rs

use chrono::NaiveDate;
use mockito::{mock, Matcher};
use quote_service::{FetchError, PriceSeriesFetcher, QuoteClient, TickerMetadata};
use secrecy::SecretString;
use std::error::Error;
use std::sync::Arc;

fn client() -> QuoteClient {
    QuoteClient::new(mockito::server_url(), SecretString::from("demo".to_string()))
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

fn daily_body(symbol: &str, closes: &[(&str, &str)]) -> String {
    let series: Vec<String> = closes
        .iter()
        .map(|(day, close)| {
            format!(
                r#""{day}": {{"1. open": "{close}", "2. high": "{close}", "3. low": "{close}", "4. close": "{close}", "5. adjusted close": "{close}", "6. volume": "1000", "7. dividend amount": "0.0000", "8. split coefficient": "1.0"}}"#
            )
        })
        .collect();

    format!(
        r#"{{
            "Meta Data": {{
                "1. Information": "Daily Time Series with Splits and Dividend Events",
                "2. Symbol": "{symbol}",
                "3. Last Refreshed": "2024-01-05",
                "4. Output Size": "Full size",
                "5. Time Zone": "US/Eastern"
            }},
            "Time Series (Daily)": {{ {} }}
        }}"#,
        series.join(",")
    )
}

fn daily_matcher(symbol: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("function".into(), "TIME_SERIES_DAILY_ADJUSTED".into()),
        Matcher::UrlEncoded("symbol".into(), symbol.into()),
        Matcher::UrlEncoded("apikey".into(), "demo".into()),
    ])
}

#[tokio::test]
async fn test_daily_series_uses_adjusted_close_in_range() -> Result<(), Box<dyn Error>> {
    let body = r#"{
        "Meta Data": {"2. Symbol": "IBM"},
        "Time Series (Daily)": {
            "2024-01-05": {"4. close": "160.00", "5. adjusted close": "159.50"},
            "2024-01-04": {"4. close": "158.00", "5. adjusted close": "157.50"},
            "2024-01-03": {"4. close": "156.00", "5. adjusted close": "155.50"},
            "2024-01-02": {"4. close": "154.00", "5. adjusted close": "153.50"}
        }
    }"#;

    let _mock = mock("GET", "/query")
        .match_query(daily_matcher("IBM"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create();

    // End date is exclusive.
    let points = client()
        .daily_series("IBM", date("2024-01-03"), date("2024-01-05"))
        .await?;

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].date, date("2024-01-03"));
    assert_eq!(points[0].price, 155.50);
    assert_eq!(points[1].date, date("2024-01-04"));
    assert_eq!(points[1].price, 157.50);

    Ok(())
}

#[tokio::test]
async fn test_crypto_series_uses_digital_currency_endpoint() -> Result<(), Box<dyn Error>> {
    let body = r#"{
        "Meta Data": {
            "1. Information": "Daily Prices and Volumes for Digital Currency",
            "2. Digital Currency Code": "ETH",
            "3. Digital Currency Name": "Ethereum",
            "4. Market Code": "USD",
            "5. Market Name": "United States Dollar",
            "6. Last Refreshed": "2024-01-06 00:00:00",
            "7. Time Zone": "UTC"
        },
        "Time Series (Digital Currency Daily)": {
            "2024-01-06": {"1. open": "2240.0", "2. high": "2260.0", "3. low": "2200.0", "4. close": "2250.0", "5. volume": "100.0"},
            "2024-01-05": {"1. open": "2230.0", "2. high": "2250.0", "3. low": "2210.0", "4. close": "2240.0", "5. volume": "100.0"}
        }
    }"#;

    let _mock = mock("GET", "/query")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("function".into(), "DIGITAL_CURRENCY_DAILY".into()),
            Matcher::UrlEncoded("symbol".into(), "ETH".into()),
            Matcher::UrlEncoded("market".into(), "USD".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create();

    let points = client()
        .daily_series("ETH-USD", date("2024-01-01"), date("2024-02-01"))
        .await?;

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].price, 2240.0);
    assert_eq!(points[1].price, 2250.0);

    Ok(())
}

#[tokio::test]
async fn test_provider_error_message_is_api_error() {
    let _mock = mock("GET", "/query")
        .match_query(daily_matcher("NOSUCH"))
        .with_status(200)
        .with_body(r#"{"Error Message": "Invalid API call. Please retry or visit the documentation."}"#)
        .create();

    let result = client()
        .daily_series("NOSUCH", date("2024-01-01"), date("2024-02-01"))
        .await;

    match result {
        Err(FetchError::Api(message)) => assert!(message.starts_with("Invalid API call")),
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_series_is_decode_error() {
    let _mock = mock("GET", "/query")
        .match_query(daily_matcher("BADBAR"))
        .with_status(200)
        .with_body(
            r#"{"Time Series (Daily)": {"2024-01-02": {"4. close": "10.0", "5. adjusted close": "abc"}}}"#,
        )
        .create();

    let result = client()
        .daily_series("BADBAR", date("2024-01-01"), date("2024-02-01"))
        .await;

    assert!(matches!(result, Err(FetchError::Decode(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_overview_response() -> Result<(), Box<dyn Error>> {
    let body = r#"
    {
        "Symbol": "KO",
        "AssetType": "Common Stock",
        "Name": "Coca-Cola Company",
        "Exchange": "NYSE",
        "Currency": "USD",
        "Sector": "MANUFACTURING",
        "MarketCapitalization": "261950407000",
        "PERatio": "24.33",
        "DividendYield": "0.0322",
        "Beta": "0.583"
    }"#;

    let _mock = mock("GET", "/query")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("function".into(), "OVERVIEW".into()),
            Matcher::UrlEncoded("symbol".into(), "KO".into()),
            Matcher::UrlEncoded("apikey".into(), "demo".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create();

    let metadata = client().overview("KO").await?;

    assert_eq!(metadata.name.as_deref(), Some("Coca-Cola Company"));
    assert_eq!(metadata.sector.as_deref(), Some("MANUFACTURING"));
    assert_eq!(metadata.market_cap, Some(261950407000));
    assert_eq!(metadata.pe_ratio, Some(24.33));
    assert_eq!(metadata.dividend_yield, Some(0.0322));

    Ok(())
}

#[tokio::test]
async fn test_overview_for_unknown_symbol_is_no_data() {
    let _mock = mock("GET", "/query")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("function".into(), "OVERVIEW".into()),
            Matcher::UrlEncoded("symbol".into(), "ZZZZ".into()),
        ]))
        .with_status(200)
        .with_body("{}")
        .create();

    let result = client().overview("ZZZZ").await;
    assert!(matches!(result, Err(FetchError::NoData)));
}

#[tokio::test]
async fn test_fetcher_drops_missing_tickers_and_memoizes() -> Result<(), Box<dyn Error>> {
    let good = mock("GET", "/query")
        .match_query(daily_matcher("MEMO"))
        .with_status(200)
        .with_body(daily_body(
            "MEMO",
            &[("2024-01-02", "10.0"), ("2024-01-03", "11.0"), ("2024-01-04", "12.1")],
        ))
        .expect(1)
        .create();

    let bad = mock("GET", "/query")
        .match_query(daily_matcher("GONE"))
        .with_status(200)
        .with_body(r#"{"Error Message": "Invalid API call."}"#)
        .expect(1)
        .create();

    let fetcher = PriceSeriesFetcher::new(Arc::new(client()));
    let tickers = vec!["MEMO".to_string(), "GONE".to_string()];

    let first = fetcher
        .fetch(&tickers, date("2024-01-01"), date("2024-02-01"))
        .await?;
    let second = fetcher
        .fetch(&tickers, date("2024-01-01"), date("2024-02-01"))
        .await?;

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fetcher.cached_entries(), 1);

    let symbols: Vec<&str> = first.matrix.columns().map(|(symbol, _)| symbol).collect();
    assert_eq!(symbols, vec!["MEMO"]);
    assert_eq!(
        first.matrix.column("MEMO").unwrap(),
        &[Some(10.0), Some(11.0), Some(12.1)]
    );
    assert_eq!(first.missing.len(), 1);
    assert_eq!(first.missing[0].symbol, "GONE");

    good.assert();
    bad.assert();

    Ok(())
}

#[tokio::test]
async fn test_fetcher_does_not_cache_rate_limited_outcome() -> Result<(), Box<dyn Error>> {
    let limited = mock("GET", "/query")
        .match_query(daily_matcher("BUSY"))
        .with_status(200)
        .with_body(r#"{"Note": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."}"#)
        .expect(2)
        .create();

    let fetcher = PriceSeriesFetcher::new(Arc::new(client()));
    let tickers = vec!["BUSY".to_string()];

    let first = fetcher
        .fetch(&tickers, date("2024-01-01"), date("2024-02-01"))
        .await?;
    assert!(first.matrix.is_empty());
    assert!(matches!(first.missing[0].error, FetchError::RateLimited(_)));

    fetcher
        .fetch(&tickers, date("2024-01-01"), date("2024-02-01"))
        .await?;

    assert_eq!(fetcher.cached_entries(), 0);
    limited.assert();

    Ok(())
}

#[tokio::test]
async fn test_server_error_status_is_api_error() {
    let _mock = mock("GET", "/query")
        .match_query(daily_matcher("DOWN"))
        .with_status(503)
        .with_body("service unavailable")
        .create();

    let result = client()
        .daily_series("DOWN", date("2024-01-01"), date("2024-02-01"))
        .await;

    match result {
        Err(FetchError::Api(message)) => assert_eq!(message, "service unavailable"),
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetcher_memoizes_metadata() -> Result<(), Box<dyn Error>> {
    let overview = mock("GET", "/query")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("function".into(), "OVERVIEW".into()),
            Matcher::UrlEncoded("symbol".into(), "PEP".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"Symbol": "PEP", "Sector": "MANUFACTURING", "PERatio": "26.1"}"#)
        .expect(1)
        .create();
    let empty = mock("GET", "/query")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("function".into(), "OVERVIEW".into()),
            Matcher::UrlEncoded("symbol".into(), "VOO".into()),
        ]))
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create();

    let fetcher = PriceSeriesFetcher::new(Arc::new(client()));

    let first = fetcher.metadata("PEP").await?;
    let second = fetcher.metadata("PEP").await?;
    assert_eq!(first, second);
    assert_eq!(first.sector.as_deref(), Some("MANUFACTURING"));

    assert_eq!(fetcher.metadata("VOO").await?, TickerMetadata::default());
    assert_eq!(fetcher.metadata("VOO").await?, TickerMetadata::default());

    overview.assert();
    empty.assert();

    Ok(())
}

#[tokio::test]
async fn test_fetcher_retries_rate_limited_metadata() {
    let limited = mock("GET", "/query")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("function".into(), "OVERVIEW".into()),
            Matcher::UrlEncoded("symbol".into(), "SLOW".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"Information": "Our standard API rate limit is 25 requests per day."}"#)
        .expect(2)
        .create();

    let fetcher = PriceSeriesFetcher::new(Arc::new(client()));

    assert!(matches!(fetcher.metadata("SLOW").await, Err(FetchError::RateLimited(_))));
    assert!(matches!(fetcher.metadata("SLOW").await, Err(FetchError::RateLimited(_))));

    limited.assert();
}

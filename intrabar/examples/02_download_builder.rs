mod common;
use std::time::Duration;

use intrabar::{Interval, IntradayRequest, Intrabar, Period, RetryConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();
    let intrabar = Intrabar::builder()
        .with_connector(common::intraday_connector()?)
        .retry(RetryConfig {
            retry_count: 2,
            ..RetryConfig::default()
        })
        .request_timeout(Duration::from_secs(30))
        .build()?;

    let report = intrabar
        .download()
        .symbols(&["AAPL", "MSFT", "GOOG"])?
        .request(IntradayRequest::new(Interval::minutes(5)?).period(Period::days(5)))
        .run()
        .await?;

    if let Some(resp) = report.response {
        for entry in resp.entries {
            println!("{}: {} candles", entry.symbol, entry.series.candles.len());
        }
    } else {
        eprintln!("no data returned");
    }

    if !report.warnings.is_empty() {
        eprintln!("warnings:");
        for w in report.warnings {
            eprintln!("- {w}");
        }
    }

    Ok(())
}

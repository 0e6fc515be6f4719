mod common;
use chrono::NaiveDate;
use intrabar::{Intrabar, TickRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();
    let intrabar = Intrabar::builder()
        .with_connector(common::tick_connector()?)
        .build()?;

    let start = NaiveDate::from_ymd_opt(2014, 1, 1).ok_or("bad start date")?;
    let end = NaiveDate::from_ymd_opt(2014, 1, 31).ok_or("bad end date")?;
    let series = intrabar
        .ticks("AUD/USD", &TickRequest::new(start, end)?)
        .await?;

    println!("{}: {} ticks", series.symbol, series.ticks.len());
    if let (Some(first), Some(last)) = (series.ticks.first(), series.ticks.last()) {
        println!("first {} bid={} ask={}", first.ts, first.bid, first.ask);
        println!("last  {} bid={} ask={}", last.ts, last.bid, last.ask);
    }
    Ok(())
}

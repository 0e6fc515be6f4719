mod common;
use intrabar::{Interval, IntradayRequest, Intrabar, Period, estimate_step_seconds};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();
    let intrabar = Intrabar::builder()
        .with_connector(common::intraday_connector()?)
        .build()?;

    let req = IntradayRequest::new(Interval::MINUTE).period(Period::days(3));
    let series = intrabar.intraday("GOOG", &req).await?;

    println!(
        "{}: {} candles, observed step {:?}s",
        series.symbol,
        series.candles.len(),
        estimate_step_seconds(&series.candles)
    );
    for c in series.candles.iter().take(5) {
        println!(
            "{}  o={} h={} l={} c={} v={}",
            c.ts, c.open, c.high, c.low, c.close, c.volume
        );
    }
    Ok(())
}

//! Fetches the last 30 days of count production data for account 76 and saves all
//! four downloads to the user's download directory.
//!
//! Needs `COUNTPROD_WAREHOUSE_URL` and `COUNTPROD_ACCESS_TOKEN`.

use chrono::Local;
use countprod::{default_download_dir, CountProd, CountProdError, FetchRequest, Session};
use std::env;

#[tokio::main]
async fn main() -> Result<(), CountProdError> {
    configure_polars_display();
    let client = CountProd::from_env()?;
    let request = FetchRequest::default_for(Local::now().date_naive())?;
    println!("Fetching {} days of data for account {}", request.range.days(), request.account_id);

    let mut session = Session::new();
    if let Err(e) = session.fetch_request(&client, &request).await {
        eprintln!("{}", e.user_message());
        return Err(e);
    }
    let Some(dataset) = session.dataset() else {
        return Ok(());
    };

    let summary = dataset.summary();
    println!(
        "{} rows, {} columns, {} missing values, {} rows with missing data ({}%)",
        summary.rows,
        summary.columns,
        summary.total_missing(),
        summary.rows_with_missing,
        summary.rows_with_missing_percent()
    );
    println!(
        "Fetched in {:.2?}, ~{:.2} MB in memory, ~{:.2} MB as Parquet",
        dataset.fetch_time(),
        summary.estimated_mb(),
        summary.estimated_parquet_mb()
    );
    for detail in summary.missing_details() {
        println!("  {:<24} {:>6} ({}%)", detail.column, detail.missing, detail.percent);
    }
    println!("{}", dataset.complete().preview().frame);

    let dir = default_download_dir();
    for download in dataset.downloads()? {
        let path = download.save_in(&dir).await?;
        println!("Saved {} ({} bytes)", path.display(), download.len());
    }
    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
}
